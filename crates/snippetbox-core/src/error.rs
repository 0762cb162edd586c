//! Error types for the snippet store.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`SnippetModel`](crate::SnippetModel) operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No live snippet matches the request.
    #[error("no matching record found")]
    NoRecord,

    /// The expiry offset does not produce a representable timestamp.
    #[error("invalid expiry offset: {0} days")]
    InvalidExpiry(i64),

    /// SQLite error (connectivity, constraint, decoding).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_no_record() {
        assert_eq!(Error::NoRecord.to_string(), "no matching record found");
    }

    #[test]
    fn error_display_invalid_expiry() {
        assert_eq!(
            Error::InvalidExpiry(-3).to_string(),
            "invalid expiry offset: -3 days"
        );
    }

    #[test]
    fn error_from_rusqlite() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Database(_)));
    }
}
