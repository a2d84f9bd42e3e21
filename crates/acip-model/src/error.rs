use thiserror::Error;

/// Errors surfaced by the recommendation engine.
///
/// The engine is pure and never performs I/O, so the only failure mode a
/// caller can trigger is malformed input. Unrecognized vaccine names are
/// deliberately *not* errors; they route to the default recommendation.
#[derive(Debug, Error)]
pub enum CatchUpError {
    /// A date string failed strict `YYYY-MM-DD` parsing. The engine never
    /// coerces a bad date into a fallback value.
    #[error("invalid {field} value {value:?}: expected YYYY-MM-DD")]
    InvalidDate { field: String, value: String },

    #[error("{0}")]
    Message(String),
}

impl CatchUpError {
    /// Builds a [`CatchUpError::InvalidDate`] for the named request field.
    pub fn invalid_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        CatchUpError::InvalidDate {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatchUpError>;
