use thiserror::Error;

/// Result type for trellis-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type.
///
/// The first four variants are registry/configuration invariant violations:
/// they indicate an inconsistent tree construction by the caller, abort the
/// current layout pass, and are never retried. The registry is left
/// unchanged by a failed call.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A cell already occupies the target (row, column) slot.
    #[error("cell already exists at column {column}, row {row}")]
    DuplicateCell {
        /// Target column.
        column: usize,
        /// Target row.
        row: usize,
    },

    /// A span-all-rows cell cannot share a column with other cells.
    #[error("span conflict: {0}")]
    SpanConflict(String),

    /// Incompatible stretch/fit-to-grid/span combination.
    #[error("configuration: {0}")]
    Configuration(String),

    /// A row or column index fell outside the registry's range.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}
