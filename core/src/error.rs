use crate::DocId;
use thiserror::Error;

/// Errors raised by index lookups and mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("term not found: {0}")]
    TermNotFound(String),

    #[error("document not found: {0}")]
    DocumentNotFound(DocId),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// Every variant is a lookup miss on caller input; none are retryable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::TermNotFound(_) | IndexError::DocumentNotFound(_))
    }
}
