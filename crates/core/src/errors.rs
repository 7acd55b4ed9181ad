use thiserror::Error;

use crate::price::NormalizeError;

/// Failure classes exposed by the comparison endpoint. Each variant carries
/// the caller-visible detail; transport mapping (status code plus error
/// class) lives on the variant so every interface agrees on it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("upstream agent failure: {detail}")]
    UpstreamAgent { detail: String },
    #[error("upstream agent output could not be parsed: {detail}")]
    UpstreamParse { detail: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CompareError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn upstream_agent(detail: impl Into<String>) -> Self {
        Self::UpstreamAgent { detail: detail.into() }
    }

    pub fn upstream_parse(detail: impl Into<String>) -> Self {
        Self::UpstreamParse { detail: detail.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// HTTP status the variant maps to. Upstream failures are gateway
    /// errors: the service itself is healthy but its dependency is not.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::UpstreamAgent { .. } | Self::UpstreamParse { .. } => 502,
            Self::Internal { .. } => 500,
        }
    }

    /// Stable machine-readable class for the error body and log fields.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::UpstreamAgent { .. } => "upstream_agent",
            Self::UpstreamParse { .. } => "upstream_parse",
            Self::Internal { .. } => "internal",
        }
    }

    /// Caller-visible detail string.
    pub fn detail(&self) -> &str {
        match self {
            Self::BadRequest { message } | Self::Internal { message } => message,
            Self::UpstreamAgent { detail } | Self::UpstreamParse { detail } => detail,
        }
    }
}

impl From<NormalizeError> for CompareError {
    fn from(value: NormalizeError) -> Self {
        Self::UpstreamParse { detail: value.to_string() }
    }
}
