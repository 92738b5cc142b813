use thiserror::Error;

/// Errors returned by generated client methods.
///
/// Generated code never recovers from any of these: each one is returned to
/// the caller as soon as it happens.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Route produced a string that is not a valid absolute URL.
    #[error("invalid request url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Synthesized header value contained invalid characters.
    #[error("invalid value for header `{name}`")]
    Header { name: &'static str },

    /// JSON body could not be serialized. No request was sent.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("call was canceled")]
    Canceled,

    #[error("call deadline exceeded")]
    DeadlineExceeded,

    /// Error raised by a user supplied hook.
    #[error(transparent)]
    Hook(Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    /// Wrap an arbitrary error raised inside a custom hook.
    pub fn hook(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Hook(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
