use crate::{
    error::ConnectorError,
    executor::RelationalExecutor,
    sql::{mysql::adapter::MySqlAdapter, postgres::adapter::PgAdapter},
};
use std::{fmt, str::FromStr, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Postgres,
    MySql,
}

impl FromStr for DataFormat {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DataFormat::Postgres),
            "mysql" | "mariadb" => Ok(DataFormat::MySql),
            other => Err(ConnectorError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Postgres => f.write_str("postgres"),
            DataFormat::MySql => f.write_str("mysql"),
        }
    }
}

impl DataFormat {
    /// Guesses the format from a URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let (scheme, _) = url.split_once("://")?;
        scheme.parse().ok()
    }
}

#[derive(Clone)]
pub enum Adapter {
    MySql(MySqlAdapter),
    Postgres(PgAdapter),
}

impl Adapter {
    pub async fn connect(format: DataFormat, conn_str: &str) -> Result<Self, ConnectorError> {
        match format {
            DataFormat::MySql => {
                let adapter = MySqlAdapter::connect(conn_str).await?;
                Ok(Adapter::MySql(adapter))
            }
            DataFormat::Postgres => {
                let adapter = PgAdapter::connect(conn_str).await?;
                Ok(Adapter::Postgres(adapter))
            }
        }
    }

    pub fn executor(&self) -> &dyn RelationalExecutor {
        match self {
            Adapter::MySql(adapter) => adapter,
            Adapter::Postgres(adapter) => adapter,
        }
    }

    pub fn into_shared(self) -> Arc<dyn RelationalExecutor> {
        match self {
            Adapter::MySql(adapter) => Arc::new(adapter),
            Adapter::Postgres(adapter) => Arc::new(adapter),
        }
    }
}
