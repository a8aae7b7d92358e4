use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqCategory {
    Pricing,
    Features,
    Support,
    Demo,
}

impl FaqCategory {
    /// Declaration order; keyword matching scans categories in this order.
    pub const ALL: [FaqCategory; 4] =
        [FaqCategory::Pricing, FaqCategory::Features, FaqCategory::Support, FaqCategory::Demo];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::Features => "features",
            Self::Support => "support",
            Self::Demo => "demo",
        }
    }

    /// Exact lookup by quick-reply value; callers pass an already lower-cased value.
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }

    /// Whether answering this category starts the lead-capture dialogue.
    pub fn starts_lead_capture(self) -> bool {
        matches!(self, Self::Demo)
    }
}

impl fmt::Display for FaqCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::FaqCategory;

    #[test]
    fn from_value_is_exact() {
        assert_eq!(FaqCategory::from_value("pricing"), Some(FaqCategory::Pricing));
        assert_eq!(FaqCategory::from_value("demo"), Some(FaqCategory::Demo));
        assert_eq!(FaqCategory::from_value("Pricing"), None);
        assert_eq!(FaqCategory::from_value("pricing "), None);
    }

    #[test]
    fn only_demo_starts_lead_capture() {
        let starters: Vec<_> =
            FaqCategory::ALL.into_iter().filter(|c| c.starts_lead_capture()).collect();
        assert_eq!(starters, vec![FaqCategory::Demo]);
    }
}
