pub mod engine;
pub mod states;

pub use engine::{DialogueFlow, FlowEngine, FlowTransitionError, LeadCaptureFlow};
pub use states::{DialogueStep, FlowAction, FlowType, TransitionOutcome, UnknownStep};
