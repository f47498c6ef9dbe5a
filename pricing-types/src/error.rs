//! Error types for the pricing service.

/// Domain-level errors (invalid values).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount must be a finite number, got {0}")]
    InvalidAmount(String),
}

/// Upstream rate feed failures. None of these reach a visitor: the rate
/// service folds each into a fallback table.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Upstream responded with HTTP {0}")]
    Status(u16),

    #[error("Upstream unreachable: {0}")]
    Network(String),

    #[error("Upstream payload rejected: {0}")]
    Shape(String),
}

impl FeedError {
    /// Short tag written into the `error` field of the rates response.
    pub fn reason(&self) -> &'static str {
        match self {
            FeedError::Status(_) => "upstream",
            FeedError::Network(_) => "network",
            FeedError::Shape(_) => "invalid_payload",
        }
    }
}

/// Hosted auth backend failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Auth backend unreachable: {0}")]
    Unavailable(String),

    #[error("Auth backend responded with HTTP {0}")]
    Status(u16),

    #[error("Auth backend payload rejected: {0}")]
    Decode(String),
}

/// Application-level errors (for HTTP responses).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
}
