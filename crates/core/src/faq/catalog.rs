//! Static FAQ content, keyword index and goodbye phrases.
//!
//! The standard catalog is built once on first use and shared read-only by
//! every caller for the life of the process.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::domain::quick_reply::QuickReply;
use crate::faq::category::FaqCategory;

const PRICING_RESPONSE: &str = "Our pricing is flexible to fit your needs:

• **Starter**: $29/month - Perfect for small teams
• **Professional**: $79/month - Most popular choice
• **Enterprise**: Custom pricing - For large organizations

All plans include a 14-day free trial. Would you like to know more about any specific plan?";

const FEATURES_RESPONSE: &str = "Here are our key features:

• 🔄 **Real-time Sync** - Stay updated across all devices
• 🔒 **Enterprise Security** - SOC2 & GDPR compliant
• 📊 **Advanced Analytics** - Deep insights into your data
• 🔗 **Integrations** - Connect with 100+ tools
• 👥 **Team Collaboration** - Work together seamlessly

Want me to elaborate on any specific feature?";

const SUPPORT_RESPONSE: &str = "I'd be happy to connect you with our support team!

You can reach us through:
• 📧 Email: support@company.com
• 💬 Live Chat: Available 24/7
• 📞 Phone: 1-800-XXX-XXXX (9am-6pm EST)

Would you like me to collect your information so our team can reach out to you?";

const DEMO_RESPONSE: &str =
    "Great choice! 🎉 Our product demo showcases all the powerful features we offer.

Quick question — is this chatbot for a personal project or a business website?";

const PRICING_KEYWORDS: &[&str] =
    &["price", "pricing", "cost", "how much", "subscription", "plan", "payment"];
const FEATURES_KEYWORDS: &[&str] =
    &["feature", "features", "what can", "capabilities", "functionality", "does it"];
const SUPPORT_KEYWORDS: &[&str] =
    &["support", "help", "contact", "reach", "speak", "human", "agent", "phone", "email"];
const DEMO_KEYWORDS: &[&str] = &["demo", "trial", "try", "test", "see", "show me"];

const GOODBYE_PHRASES: &[&str] = &["bye", "goodbye", "that's all, thanks!", "thanks"];

static STANDARD_CATALOG: LazyLock<FaqCatalog> = LazyLock::new(FaqCatalog::build_standard);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub category: FaqCategory,
    pub response: String,
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: FaqCategory,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqCatalog {
    entries: Vec<FaqEntry>,
    keyword_index: Vec<KeywordRule>,
    default_quick_replies: Vec<QuickReply>,
    goodbye_phrases: Vec<String>,
}

impl FaqCatalog {
    pub fn new(
        entries: Vec<FaqEntry>,
        keyword_index: Vec<KeywordRule>,
        default_quick_replies: Vec<QuickReply>,
        goodbye_phrases: Vec<String>,
    ) -> Self {
        Self { entries, keyword_index, default_quick_replies, goodbye_phrases }
    }

    pub fn standard() -> &'static FaqCatalog {
        &STANDARD_CATALOG
    }

    pub fn entry(&self, category: FaqCategory) -> Option<&FaqEntry> {
        self.entries.iter().find(|entry| entry.category == category)
    }

    /// Quick-reply value lookup. `normalized` must already be trimmed and lower-cased.
    pub fn exact_match(&self, normalized: &str) -> Option<FaqCategory> {
        FaqCategory::from_value(normalized).filter(|category| self.entry(*category).is_some())
    }

    /// First rule, in index order, with any keyword inside `normalized`.
    pub fn keyword_match(&self, normalized: &str) -> Option<FaqCategory> {
        self.keyword_index
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| normalized.contains(keyword.as_str())))
            .map(|rule| rule.category)
            .filter(|category| self.entry(*category).is_some())
    }

    pub fn is_goodbye(&self, normalized: &str) -> bool {
        self.goodbye_phrases.iter().any(|phrase| phrase == normalized)
    }

    pub fn default_quick_replies(&self) -> &[QuickReply] {
        &self.default_quick_replies
    }

    /// The entry's own follow-ups, or the default set when it has none.
    pub fn quick_replies_for(&self, entry: &FaqEntry) -> Vec<QuickReply> {
        if entry.quick_replies.is_empty() {
            self.default_quick_replies.clone()
        } else {
            entry.quick_replies.clone()
        }
    }

    pub fn keyword_index(&self) -> &[KeywordRule] {
        &self.keyword_index
    }

    /// Human-readable problems that would make resolution surprising.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for category in FaqCategory::ALL {
            match self.entry(category) {
                None => issues.push(format!("category `{category}` has no FAQ entry")),
                Some(entry) if entry.response.trim().is_empty() => {
                    issues.push(format!("category `{category}` has an empty response"));
                }
                Some(_) => {}
            }
            let has_keywords = self
                .keyword_index
                .iter()
                .any(|rule| rule.category == category && !rule.keywords.is_empty());
            if !has_keywords {
                issues.push(format!("category `{category}` has no keywords"));
            }
        }

        let mut seen = BTreeSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.category) {
                issues.push(format!("category `{}` has more than one FAQ entry", entry.category));
            }
        }

        for rule in &self.keyword_index {
            for keyword in &rule.keywords {
                if keyword.is_empty() {
                    issues.push(format!("category `{}` has an empty keyword", rule.category));
                } else if *keyword != keyword.to_lowercase() {
                    issues.push(format!(
                        "keyword `{keyword}` for `{}` is not lower-case and can never match",
                        rule.category
                    ));
                }
            }
        }

        if self.default_quick_replies.is_empty() {
            issues.push("default quick replies are empty".to_string());
        }
        for reply in &self.default_quick_replies {
            if self.exact_match(&reply.value).is_none() {
                issues.push(format!(
                    "default quick reply `{}` does not resolve to a FAQ entry",
                    reply.value
                ));
            }
        }

        for phrase in &self.goodbye_phrases {
            if *phrase != phrase.trim().to_lowercase() {
                issues.push(format!("goodbye phrase `{phrase}` is not normalized"));
            }
        }

        issues
    }

    fn build_standard() -> Self {
        let pricing = QuickReply::echo("pricing", "💰 Pricing");
        let features = QuickReply::echo("features", "✨ Features");
        let support = QuickReply::echo("support", "🎧 Contact Support");
        let demo = QuickReply::echo("demo", "🚀 Request Demo");

        let entries = vec![
            FaqEntry {
                category: FaqCategory::Pricing,
                response: PRICING_RESPONSE.to_string(),
                quick_replies: vec![features.clone(), demo.clone()],
            },
            FaqEntry {
                category: FaqCategory::Features,
                response: FEATURES_RESPONSE.to_string(),
                quick_replies: vec![pricing.clone(), demo.clone()],
            },
            FaqEntry {
                category: FaqCategory::Support,
                response: SUPPORT_RESPONSE.to_string(),
                quick_replies: vec![demo.clone(), pricing.clone()],
            },
            FaqEntry {
                category: FaqCategory::Demo,
                response: DEMO_RESPONSE.to_string(),
                quick_replies: vec![
                    QuickReply::echo("personal", "🧑‍💻 Personal Project"),
                    QuickReply::echo("business", "🏢 Business Website"),
                ],
            },
        ];

        let keyword_index = [
            (FaqCategory::Pricing, PRICING_KEYWORDS),
            (FaqCategory::Features, FEATURES_KEYWORDS),
            (FaqCategory::Support, SUPPORT_KEYWORDS),
            (FaqCategory::Demo, DEMO_KEYWORDS),
        ]
        .into_iter()
        .map(|(category, keywords)| KeywordRule {
            category,
            keywords: keywords.iter().map(|keyword| (*keyword).to_string()).collect(),
        })
        .collect();

        Self::new(
            entries,
            keyword_index,
            vec![pricing, features, support, demo],
            GOODBYE_PHRASES.iter().map(|phrase| (*phrase).to_string()).collect(),
        )
    }
}
