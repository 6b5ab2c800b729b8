//! Error types for feature table construction.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Feature table error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A column's length does not match the table's row count.
    #[error("column '{column}' has {actual} rows, table has {expected}")]
    ColumnLength {
        /// Name of the offending column.
        column: String,
        /// Row count established by the table.
        expected: usize,
        /// Row count of the rejected column.
        actual: usize,
    },
}
