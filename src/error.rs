use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a [`NodeAdapter`](crate::adapter::NodeAdapter).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Forbidden")]
    Forbidden,

    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    /// The data source refused the request. `detail` carries the
    /// server-provided explanation, when there is one.
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },

    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

pub const FORBIDDEN_MESSAGE: &str =
    "Your ACL token does not provide the required permissions. Contact your administrator if this is an error.";

/// Extract a message suitable for display from an adapter error.
///
/// Returns `None` when the error carries nothing a user could act on;
/// callers supply their own fallback text.
pub fn message_from_adapter_error(err: &AdapterError) -> Option<String> {
    match err {
        AdapterError::Forbidden => Some(FORBIDDEN_MESSAGE.to_string()),
        AdapterError::NodeNotFound(id) => Some(format!("Node {} not found", id)),
        AdapterError::Rejected { detail, .. } => detail
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        AdapterError::Unavailable(_) => None,
    }
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Invalid query parameter {param}: {value:?}")]
    InvalidQuery { param: &'static str, value: String },

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
