use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Remote visibility of a submitted post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishStatus {
    #[default]
    Draft,
    Public,
    Unlisted,
}

impl PublishStatus {
    /// Wire value expected by the publish API.
    pub fn as_str(self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Public => "public",
            PublishStatus::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown publish status: {0}")]
pub struct UnknownPublishStatus(pub String);

impl FromStr for PublishStatus {
    type Err = UnknownPublishStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(PublishStatus::Draft),
            "public" => Ok(PublishStatus::Public),
            "unlisted" => Ok(PublishStatus::Unlisted),
            other => Err(UnknownPublishStatus(other.to_string())),
        }
    }
}

/// Failure from a single submission attempt against the publish API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishError {
    pub kind: PublishFailure,
    pub message: String,
}

impl PublishError {
    pub fn new(kind: PublishFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PublishError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
}

impl fmt::Display for PublishFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishFailure::InvalidUrl => write!(f, "invalid url"),
            PublishFailure::HttpStatus(code) => write!(f, "http status {code}"),
            PublishFailure::Timeout => write!(f, "timeout"),
            PublishFailure::Network => write!(f, "network error"),
            PublishFailure::InvalidResponse => write!(f, "invalid response"),
        }
    }
}
