use concierge_core::domain::context::ConversationContext;
use concierge_core::domain::reply::Reply;
use concierge_core::faq::{FaqCatalog, FaqCategory};
use concierge_core::flows::{
    DialogueFlow, DialogueStep, FlowAction, FlowEngine, LeadCaptureFlow, TransitionOutcome,
};
use tracing::{debug, warn};

use crate::messages;

/// Which rule answered a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    GuidedStep(DialogueStep),
    QuickReply(FaqCategory),
    Goodbye,
    Keyword(FaqCategory),
    Fallback,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GuidedStep(_) => "guided_step",
            Self::QuickReply(_) => "quick_reply",
            Self::Goodbye => "goodbye",
            Self::Keyword(_) => "keyword",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Responder<F = LeadCaptureFlow> {
    catalog: &'static FaqCatalog,
    engine: FlowEngine<F>,
}

impl Responder<LeadCaptureFlow> {
    pub fn standard() -> Self {
        Self::new(FaqCatalog::standard(), LeadCaptureFlow)
    }
}

impl Default for Responder<LeadCaptureFlow> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<F> Responder<F>
where
    F: DialogueFlow,
{
    pub fn new(catalog: &'static FaqCatalog, flow: F) -> Self {
        Self { catalog, engine: FlowEngine::new(flow) }
    }

    pub fn catalog(&self) -> &'static FaqCatalog {
        self.catalog
    }

    pub fn greeting(&self) -> Reply {
        Reply::new(messages::WELCOME, self.catalog.default_quick_replies().to_vec())
            .with_next_step(DialogueStep::FaqMode)
    }

    /// Picks the rule that owns `message`. The order of checks is part of the contract.
    pub fn classify(&self, message: &str, context: &ConversationContext) -> Resolution {
        if context.step.is_guided() {
            return Resolution::GuidedStep(context.step);
        }

        let normalized = message.trim().to_lowercase();
        if let Some(category) = self.catalog.exact_match(&normalized) {
            return Resolution::QuickReply(category);
        }
        if self.catalog.is_goodbye(&normalized) {
            return Resolution::Goodbye;
        }
        if let Some(category) = self.catalog.keyword_match(&normalized) {
            return Resolution::Keyword(category);
        }
        Resolution::Fallback
    }

    pub fn resolve(&self, message: &str, context: &ConversationContext) -> Reply {
        let resolution = self.classify(message, context);
        let reply = match resolution {
            Resolution::GuidedStep(step) => self.guided_reply(step, message.trim(), context),
            Resolution::QuickReply(category) | Resolution::Keyword(category) => {
                self.faq_reply(category, context.step)
            }
            Resolution::Goodbye => Reply::new(messages::GOODBYE, Vec::new()),
            Resolution::Fallback => self.fallback_reply(context.step),
        };

        debug!(
            event_name = "dialogue.message.resolved",
            resolution = resolution.as_str(),
            from_step = %context.step,
            next_step = reply.next_step.map(DialogueStep::as_str).unwrap_or("unchanged"),
            user_info_updated = reply.user_info.is_some(),
            "message resolved"
        );

        reply
    }

    fn guided_reply(&self, step: DialogueStep, input: &str, context: &ConversationContext) -> Reply {
        match self.engine.apply(step, input, &context.user_info) {
            Ok(outcome) => self.outcome_reply(outcome),
            Err(error) => {
                warn!(
                    event_name = "dialogue.flow.rejected",
                    step = %step,
                    error = %error,
                    "guided step rejected input"
                );
                self.fallback_reply(context.step)
            }
        }
    }

    fn outcome_reply(&self, outcome: TransitionOutcome) -> Reply {
        let (response, quick_replies) = match &outcome.action {
            FlowAction::PromptForName => (messages::ASK_NAME.to_string(), Vec::new()),
            FlowAction::PromptForEmail { name } => (messages::ask_email(name), Vec::new()),
            FlowAction::RepromptEmail => (messages::INVALID_EMAIL.to_string(), Vec::new()),
            FlowAction::PromptForReason => (messages::ASK_REASON.to_string(), Vec::new()),
            FlowAction::ConfirmCollected { name } => (
                messages::lead_collected(name),
                self.catalog.default_quick_replies().to_vec(),
            ),
        };

        Reply::new(response, quick_replies)
            .with_next_step(outcome.to)
            .with_user_info(outcome.user_info)
    }

    fn faq_reply(&self, category: FaqCategory, current: DialogueStep) -> Reply {
        let Some(entry) = self.catalog.entry(category) else {
            return self.fallback_reply(current);
        };

        let next_step =
            if category.starts_lead_capture() { self.engine.entry_step() } else { current };
        Reply::new(entry.response.clone(), self.catalog.quick_replies_for(entry))
            .with_next_step(next_step)
    }

    fn fallback_reply(&self, current: DialogueStep) -> Reply {
        Reply::new(messages::FALLBACK, self.catalog.default_quick_replies().to_vec())
            .with_next_step(current)
    }
}

/// Resolves `message` with the standard catalog and lead-capture flow.
pub fn resolve(message: &str, context: &ConversationContext) -> Reply {
    Responder::standard().resolve(message, context)
}
