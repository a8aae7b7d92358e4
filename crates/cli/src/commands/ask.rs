use concierge_agent::Responder;
use concierge_core::domain::context::ConversationContext;
use concierge_core::errors::require_message;

use crate::commands::CommandResult;

const CLI_CORRELATION_ID: &str = "cli";

pub fn run(message: &str, context: Option<&str>) -> CommandResult {
    let message = match require_message(Some(message), CLI_CORRELATION_ID) {
        Ok(message) => message,
        Err(error) => {
            return CommandResult::failure("ask", "missing_message", error.user_message(), 2);
        }
    };

    let context = match context.map(serde_json::from_str::<ConversationContext>) {
        None => ConversationContext::default(),
        Some(Ok(context)) => context,
        Some(Err(error)) => {
            return CommandResult::failure(
                "ask",
                "invalid_context",
                format!("--context is not valid JSON: {error}"),
                2,
            );
        }
    };

    let reply = Responder::standard().resolve(message, &context);
    match serde_json::to_string_pretty(&reply) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure(
            "ask",
            "serialization",
            format!("reply could not be serialized: {error}"),
            1,
        ),
    }
}
