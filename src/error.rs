//! Error types for the notification relay.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures of the entity lookup collaborator itself.
///
/// A lookup that completes but finds nothing is not an error; it is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{entity} lookup unavailable: {reason}")]
    Unavailable { entity: String, reason: String },
}

/// Errors raised while turning a domain event into a queued envelope.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Entity not found: {entity} with id {id}")]
    EntityNotFound { entity: String, id: String },

    #[error("Notification {event_type} is not supported")]
    Unsupported { event_type: String },

    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

impl DispatchError {
    pub(crate) fn not_found(entity: &str, id: Option<i64>) -> Self {
        Self::EntityNotFound {
            entity: entity.to_string(),
            id: id.map_or_else(|| "<unset>".to_string(), |id| id.to_string()),
        }
    }
}

/// Inbound reply validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid payload: {text:?} is not a recognized response")]
    InvalidPayload { text: String },
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
