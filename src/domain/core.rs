// src/domain/core.rs
use thiserror::Error;
use uuid::Uuid;

pub type UserId = String;
pub type AuctionId = Uuid;
pub type BidId = Uuid;

/// Failure classification returned to callers of the core.
///
/// Every variant carries a reason meant for humans. Details coming from a
/// backing store are logged where they happen and never copied in here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("Store unavailable")]
    StoreUnavailable,

    #[error("Operation cancelled")]
    Cancelled,
}

impl Errors {
    pub fn validation(reason: impl Into<String>) -> Self {
        Errors::ValidationFailed(reason.into())
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Errors::NotFound(reason.into())
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Errors::PreconditionFailed(reason.into())
    }

    /// Business-rule rejections. Callers should not retry these.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Errors::ValidationFailed(_) | Errors::PreconditionFailed(_))
    }
}
