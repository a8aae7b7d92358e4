use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use concierge_agent::Responder;
use concierge_core::domain::context::ConversationContext;
use concierge_core::domain::reply::Reply;
use concierge_core::errors::{require_message, InterfaceError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    pub responder: Arc<Responder>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub context: Option<ConversationContext>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatError {
    pub error: String,
    pub correlation_id: String,
}

impl From<InterfaceError> for ChatError {
    fn from(error: InterfaceError) -> Self {
        Self {
            error: error.user_message().to_string(),
            correlation_id: error.correlation_id().to_string(),
        }
    }
}

pub fn router(state: ChatState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/greeting", get(greeting))
        .with_state(state)
}

pub async fn chat(
    State(state): State<ChatState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Reply>, (StatusCode, Json<ChatError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(request) = body.map_err(|rejection| {
        warn!(
            event_name = "chat.request.rejected",
            correlation_id = %correlation_id,
            reason = %rejection.body_text(),
            "chat request body could not be decoded"
        );
        bad_request(InterfaceError::bad_request(rejection.body_text(), correlation_id.clone()))
    })?;

    let message =
        require_message(request.message.as_deref(), correlation_id.clone()).map_err(|error| {
            warn!(
                event_name = "chat.request.rejected",
                correlation_id = %correlation_id,
                reason = %error,
                "chat request has no message"
            );
            bad_request(error)
        })?;

    let context = request.context.unwrap_or_default();
    let reply = state.responder.resolve(message, &context);

    info!(
        event_name = "chat.message.resolved",
        correlation_id = %correlation_id,
        from_step = %context.step,
        next_step = reply.next_step.map(|step| step.as_str()).unwrap_or("unchanged"),
        quick_reply_count = reply.quick_replies.len(),
        "chat message resolved"
    );

    Ok(Json(reply))
}

pub async fn greeting(State(state): State<ChatState>) -> Json<Reply> {
    Json(state.responder.greeting())
}

fn bad_request(error: InterfaceError) -> (StatusCode, Json<ChatError>) {
    (StatusCode::BAD_REQUEST, Json(ChatError::from(error)))
}
