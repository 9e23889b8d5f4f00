use thiserror::Error;

/// Result type for log pricing operations
pub type LogPricingResult<T> = Result<T, LogPricingError>;

/// Errors raised at the edges of the pricing core.
///
/// The computation pipeline itself never fails; these cover catalog decoding,
/// textual enumerations supplied by callers, and the quote commit callback.
#[derive(Debug, Error)]
pub enum LogPricingError {
    /// Catalog payload could not be decoded
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The quote sink rejected the items
    #[error("Quote commit failed: {0}")]
    QuoteCommit(String),
}
