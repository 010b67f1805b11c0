use std::fmt;

/// Anything that went wrong between dispatching a request and decoding its
/// reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportError {
    Connect(String),
    Timeout,
    Status { status: u16, body: String },
    Decode(String),
    Request(String),
}

impl TransportError {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            TransportError::Connect(_) => "connect",
            TransportError::Timeout => "timeout",
            TransportError::Status { .. } => "status",
            TransportError::Decode(_) => "decode",
            TransportError::Request(_) => "request",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(message) => write!(f, "connect failed: {message}"),
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Status { status, body } => {
                write!(f, "unexpected status {status}: {body}")
            }
            TransportError::Decode(message) => write!(f, "invalid response body: {message}"),
            TransportError::Request(message) => write!(f, "request failed: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}
