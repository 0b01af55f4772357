use model::core::data_type::DataType;
use thiserror::Error;

/// Raised while a query specification is assembled, before any statement
/// is compiled or any storage is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The same alias was declared twice (the base alias included).
    #[error("Alias '{0}' is declared more than once")]
    DuplicateAlias(String),

    /// A column reference names an alias that is not in scope.
    #[error("Alias '{alias}' referenced by column '{column}' is not in scope")]
    DanglingAlias { alias: String, column: String },

    /// The alias resolves, but its relation has no such column.
    #[error("Relation '{relation}' has no column '{column}'")]
    UnknownColumn { relation: String, column: String },

    /// The right-hand side cannot be compared with the column's declared type.
    #[error("Column '{column}' of type {expected} cannot be compared with {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    /// The operator makes no sense for the column's declared type.
    #[error("Operator '{op}' is not supported for column '{column}' of type {data_type}")]
    UnsupportedOperator {
        column: String,
        op: String,
        data_type: DataType,
    },

    /// A pattern does not compile as a regular expression.
    #[error("Invalid pattern for column '{column}': {reason}")]
    InvalidPattern { column: String, reason: String },

    /// A join was declared without an `ON` condition.
    #[error("Join on alias '{0}' has no join condition")]
    MissingJoinCondition(String),

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// `index * size` does not fit a storage offset.
    #[error("Page {index} of size {size} is out of range")]
    PageOutOfRange { index: u64, size: u64 },

    /// A sort property that is not on the allow-list.
    #[error("Unknown sort property: {0}")]
    UnknownSortProperty(String),

    /// `DISTINCT` rows can only be ordered by projected (base) columns.
    #[error("Cannot order distinct rows by '{0}': column is not projected")]
    OrderingOutsideProjection(String),
}

/// Raised by the statement compiler when a valid specification cannot be
/// expressed in the target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    #[error("Unresolved alias '{alias}' for column '{column}'")]
    UnresolvedAlias { alias: String, column: String },

    #[error("{dialect} cannot render operator '{op}' for column '{column}'")]
    UnsupportedOperator {
        dialect: String,
        op: String,
        column: String,
    },
}
