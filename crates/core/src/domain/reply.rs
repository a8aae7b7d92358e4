use serde::{Deserialize, Serialize};

use crate::domain::quick_reply::QuickReply;
use crate::domain::user_info::UserInfo;
use crate::flows::states::DialogueStep;

/// Resolver output. `next_step` and `user_info` are only present when the
/// caller should replace what it holds; absence means "keep yours".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub response: String,
    pub quick_replies: Vec<QuickReply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<DialogueStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl Reply {
    pub fn new(response: impl Into<String>, quick_replies: Vec<QuickReply>) -> Self {
        Self { response: response.into(), quick_replies, next_step: None, user_info: None }
    }

    pub fn with_next_step(mut self, step: DialogueStep) -> Self {
        self.next_step = Some(step);
        self
    }

    pub fn with_user_info(mut self, user_info: Option<UserInfo>) -> Self {
        self.user_info = user_info;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Reply;
    use crate::domain::quick_reply::QuickReply;
    use crate::domain::user_info::UserInfo;
    use crate::flows::states::DialogueStep;

    #[test]
    fn optional_keys_are_omitted_when_absent() {
        let reply = Reply::new("bye", Vec::new());

        assert_eq!(
            serde_json::to_value(&reply).expect("encode reply"),
            json!({"response": "bye", "quickReplies": []})
        );
    }

    #[test]
    fn serializes_camel_case_wire_shape() {
        let reply = Reply::new("Got it!", vec![QuickReply::echo("demo", "Demo")])
            .with_next_step(DialogueStep::AskName)
            .with_user_info(Some(UserInfo::default().with_project_type("business")));

        assert_eq!(
            serde_json::to_value(&reply).expect("encode reply"),
            json!({
                "response": "Got it!",
                "quickReplies": [{"id": "demo", "label": "Demo", "value": "demo"}],
                "nextStep": "ask_name",
                "userInfo": {"projectType": "business"}
            })
        );
    }
}
