use thiserror::Error;

/// Failure of a single API request. Callers degrade every variant to an
/// empty result; the variant only reaches the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with status {code}")]
    Status { code: u16 },

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status { code },
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}
