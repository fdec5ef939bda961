//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The number of rows changed by an update or delete, zero when nothing matched.
pub type RowsAffected = usize;
