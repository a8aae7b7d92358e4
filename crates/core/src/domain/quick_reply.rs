use serde::{Deserialize, Serialize};

/// A suggested next message. Selecting it sends `value` back verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), value: value.into() }
    }

    /// Builds a reply whose id doubles as the echoed value.
    pub fn echo(value: &str, label: &str) -> Self {
        Self::new(value, label, value)
    }
}
