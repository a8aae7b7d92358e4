use std::sync::Arc;

use concierge_agent::Responder;
use concierge_core::config::AppConfig;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub responder: Arc<Responder>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("faq catalog is inconsistent: {0}")]
    Catalog(String),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let responder = Responder::standard();
    let issues = responder.catalog().integrity_issues();
    if !issues.is_empty() {
        return Err(BootstrapError::Catalog(issues.join("; ")));
    }
    info!(
        event_name = "system.bootstrap.catalog_checked",
        correlation_id = "bootstrap",
        categories = concierge_core::faq::FaqCategory::ALL.len(),
        "faq catalog loaded"
    );

    Ok(Application { config, responder: Arc::new(responder) })
}
