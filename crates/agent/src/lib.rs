//! Dialogue resolution for the concierge assistant.
//!
//! Every inbound message is resolved in a fixed priority order:
//! 1. **Guided step** - an active lead-capture step owns the message outright
//! 2. **Quick-reply value** - exact FAQ key such as `pricing`
//! 3. **Goodbye** - exact closing phrase
//! 4. **Keyword** - first FAQ category with a substring hit
//! 5. **Fallback** - ask the user to rephrase
//!
//! Resolution is pure: the caller owns the conversation context and merges
//! each returned [`Reply`](concierge_core::Reply) back into it.

pub mod messages;
pub mod responder;

pub use responder::{resolve, Resolution, Responder};
