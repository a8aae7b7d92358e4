use thiserror::Error;

use crate::domain::user_info::UserInfo;
use crate::flows::states::{DialogueStep, FlowAction, FlowType, TransitionOutcome};
use crate::validation::is_valid_email;

pub trait DialogueFlow {
    fn flow_type(&self) -> FlowType;
    fn entry_step(&self) -> DialogueStep;
    fn transition(
        &self,
        current: DialogueStep,
        input: &str,
        user_info: &UserInfo,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

/// Project type → name → email → reason, then rest in `Collected`.
#[derive(Clone, Debug, Default)]
pub struct LeadCaptureFlow;

impl DialogueFlow for LeadCaptureFlow {
    fn flow_type(&self) -> FlowType {
        FlowType::LeadCapture
    }

    fn entry_step(&self) -> DialogueStep {
        DialogueStep::AskProjectType
    }

    fn transition(
        &self,
        current: DialogueStep,
        input: &str,
        user_info: &UserInfo,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_lead_capture(current, input, user_info)
    }
}

#[derive(Clone, Debug)]
pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: DialogueFlow,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow.flow_type()
    }

    pub fn entry_step(&self) -> DialogueStep {
        self.flow.entry_step()
    }

    pub fn apply(
        &self,
        current: DialogueStep,
        input: &str,
        user_info: &UserInfo,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, input, user_info)
    }
}

impl Default for FlowEngine<LeadCaptureFlow> {
    fn default() -> Self {
        Self::new(LeadCaptureFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("step {state} is at rest and does not capture input")]
    NotCapturing { state: DialogueStep },
}

fn transition_lead_capture(
    current: DialogueStep,
    input: &str,
    user_info: &UserInfo,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use DialogueStep::{AskEmail, AskName, AskProjectType, AskReason, Collected, FaqMode};

    let (to, action, user_info) = match current {
        AskProjectType => (
            AskName,
            FlowAction::PromptForName,
            Some(user_info.with_project_type(input.to_lowercase())),
        ),
        AskName => (
            AskEmail,
            FlowAction::PromptForEmail { name: input.to_string() },
            Some(user_info.with_name(input)),
        ),
        AskEmail if !is_valid_email(input) => (AskEmail, FlowAction::RepromptEmail, None),
        AskEmail => (AskReason, FlowAction::PromptForReason, Some(user_info.with_email(input))),
        AskReason => (
            Collected,
            FlowAction::ConfirmCollected { name: user_info.greeting_name().to_string() },
            Some(user_info.with_reason(input)),
        ),
        FaqMode | Collected => {
            return Err(FlowTransitionError::NotCapturing { state: current });
        }
    };

    Ok(TransitionOutcome { from: current, to, action, user_info })
}
