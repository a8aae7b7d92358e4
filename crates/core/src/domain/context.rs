use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::reply::Reply;
use crate::domain::user_info::UserInfo;
use crate::flows::states::DialogueStep;

/// Conversation state owned and persisted by the caller between turns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub step: DialogueStep,
    pub user_info: UserInfo,
}

impl ConversationContext {
    pub fn new(step: DialogueStep, user_info: UserInfo) -> Self {
        Self { step, user_info }
    }

    pub fn at_step(step: DialogueStep) -> Self {
        Self { step, user_info: UserInfo::default() }
    }

    /// Lenient decoding: a missing or unrecognised `step` means `faq_mode`, a
    /// missing or non-object `userInfo` means no details collected yet.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let step = map
            .get("step")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<DialogueStep>().ok())
            .unwrap_or_default();
        let user_info = map.remove("userInfo").map(UserInfo::from_json).unwrap_or_default();

        Self { step, user_info }
    }

    /// Caller-side merge: adopt the reply's step when it names one and overlay
    /// its user info field by field.
    pub fn apply(&self, reply: &Reply) -> Self {
        let step = reply.next_step.unwrap_or(self.step);
        let user_info = match &reply.user_info {
            Some(update) => self.user_info.overlay(update),
            None => self.user_info.clone(),
        };
        Self { step, user_info }
    }
}

impl<'de> Deserialize<'de> for ConversationContext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}
