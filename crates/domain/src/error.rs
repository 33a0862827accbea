/// Shared error type used across all Huddle crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("no company record found: {0}")]
    RecordNotFound(String),

    #[error("no contacts found in company record: {0}")]
    NoContacts(String),

    #[error("failed to create bot: {0}")]
    BotCreation(String),

    #[error("request to {service} timed out")]
    UpstreamTimeout { service: &'static str },

    #[error("failed to connect to {service}: {message}")]
    UpstreamUnavailable {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned {status}: {body}")]
    UpstreamRejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error originated in an outbound collaborator call.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout { .. }
                | Self::UpstreamUnavailable { .. }
                | Self::UpstreamRejected { .. }
        )
    }
}
