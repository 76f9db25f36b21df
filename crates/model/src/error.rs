use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred while fetching an answer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The service responded with a service-unavailable class status
    /// (502 or 503).
    ServiceUnavailable,
    /// The request never got a response, e.g. the connection failed.
    Network,
    /// The service responded with any other non-success status.
    Status,
    /// A success status whose body could not be parsed.
    MalformedResponse,
    /// A success response without a usable answer.
    EmptyAnswer,
    /// Any other errors.
    Other,
}

impl ErrorKind {
    /// Returns `true` if errors of this kind are likely temporary and a
    /// retry may succeed.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::ServiceUnavailable | ErrorKind::Network)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ServiceUnavailable => write!(f, "Service unavailable"),
            ErrorKind::Network => write!(f, "Network error"),
            ErrorKind::Status => write!(f, "Request failed"),
            ErrorKind::MalformedResponse => write!(f, "Malformed response"),
            ErrorKind::EmptyAnswer => write!(f, "Empty answer from server"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}
