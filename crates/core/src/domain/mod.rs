pub mod context;
pub mod quick_reply;
pub mod reply;
pub mod user_info;
