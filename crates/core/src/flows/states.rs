use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::user_info::UserInfo;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowType {
    LeadCapture,
}

/// Position in the conversation. `FaqMode` and `Collected` are at rest; the
/// four `Ask*` steps form the ordered capture sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStep {
    #[default]
    FaqMode,
    AskProjectType,
    AskName,
    AskEmail,
    AskReason,
    Collected,
}

impl DialogueStep {
    pub const ALL: [DialogueStep; 6] = [
        DialogueStep::FaqMode,
        DialogueStep::AskProjectType,
        DialogueStep::AskName,
        DialogueStep::AskEmail,
        DialogueStep::AskReason,
        DialogueStep::Collected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FaqMode => "faq_mode",
            Self::AskProjectType => "ask_project_type",
            Self::AskName => "ask_name",
            Self::AskEmail => "ask_email",
            Self::AskReason => "ask_reason",
            Self::Collected => "collected",
        }
    }

    /// True while the lead-capture sequence owns the conversation.
    pub fn is_guided(self) -> bool {
        matches!(self, Self::AskProjectType | Self::AskName | Self::AskEmail | Self::AskReason)
    }
}

impl fmt::Display for DialogueStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown dialogue step `{0}`")]
pub struct UnknownStep(pub String);

impl FromStr for DialogueStep {
    type Err = UnknownStep;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == value)
            .ok_or_else(|| UnknownStep(value.to_string()))
    }
}

/// What the caller should say after a capture step ran.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    PromptForName,
    PromptForEmail { name: String },
    RepromptEmail,
    PromptForReason,
    ConfirmCollected { name: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionOutcome {
    pub from: DialogueStep,
    pub to: DialogueStep,
    pub action: FlowAction,
    /// Updated record, or `None` when the input was rejected and nothing changed.
    pub user_info: Option<UserInfo>,
}
