pub mod config;
pub mod domain;
pub mod errors;
pub mod faq;
pub mod flows;
pub mod validation;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::context::ConversationContext;
pub use domain::quick_reply::QuickReply;
pub use domain::reply::Reply;
pub use domain::user_info::UserInfo;
pub use errors::{require_message, InterfaceError};
pub use faq::{FaqCatalog, FaqCategory, FaqEntry};
pub use flows::{
    DialogueFlow, DialogueStep, FlowAction, FlowEngine, FlowTransitionError, LeadCaptureFlow,
};
pub use validation::is_valid_email;
