use thiserror::Error;

/// Request-level failures raised by a transport before the resolver runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("missing message")]
    MissingMessage { correlation_id: String },
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn missing_message(correlation_id: impl Into<String>) -> Self {
        Self::MissingMessage { correlation_id: correlation_id.into() }
    }

    pub fn bad_request(message: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), correlation_id: correlation_id.into() }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingMessage { .. } => "Message is required",
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::MissingMessage { correlation_id } | Self::BadRequest { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

/// Rejects a message that is absent or blank once trimmed.
pub fn require_message(
    message: Option<&str>,
    correlation_id: impl Into<String>,
) -> Result<&str, InterfaceError> {
    match message.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(InterfaceError::missing_message(correlation_id)),
    }
}
