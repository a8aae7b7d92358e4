use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use concierge_core::config::ServerConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::bootstrap::Application;
use crate::chat::{self, ChatState};
use crate::health;

pub fn router(app: &Application) -> Router {
    chat::router(ChatState { responder: app.responder.clone() })
        .merge(health::router())
        .layer(cors_layer(&app.config.server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if server.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(
                    event_name = "system.cors.origin_skipped",
                    correlation_id = "bootstrap",
                    origin = %origin,
                    error = %error,
                    "allowed origin is not a valid header value"
                );
                None
            }
        })
        .collect::<Vec<_>>();
    layer.allow_origin(AllowOrigin::list(origins))
}
