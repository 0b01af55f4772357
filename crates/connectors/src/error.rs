use thiserror::Error;

/// All errors coming from executing a statement.
#[derive(Debug, Error)]
pub enum DbError {
    /// PostgreSQL driver error.
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// MySQL driver error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// A returned column could not be decoded as its declared type.
    #[error("Failed to decode column '{column}': {reason}")]
    Decode { column: String, reason: String },

    /// The statement referenced a relation the storage does not know.
    #[error("Relation does not exist: {0}")]
    UnknownRelation(String),

    /// The connection was lost or refused.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The statement shape is not one this executor can run.
    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors happening during adapter or connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Postgres connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),
}
