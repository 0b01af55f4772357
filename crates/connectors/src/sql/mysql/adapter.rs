use crate::{
    error::{ConnectorError, DbError},
    executor::RelationalExecutor,
    sql::{mysql::params::positional, row::DbRow},
};
use async_trait::async_trait;
use model::records::row::RowData;
use mysql_async::{Opts, Pool, Row, prelude::Queryable};
use planner::query::{
    compiler::{COUNT_COLUMN, Statement},
    dialect::{self, Dialect},
};
use tracing::debug;

#[derive(Clone)]
pub struct MySqlAdapter {
    pool: Pool,
    dialect: dialect::MySql,
}

impl MySqlAdapter {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let opts = Opts::from_url(url).map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        let pool = Pool::new(opts);
        // Checks credentials up front.
        drop(pool.get_conn().await?);
        Ok(MySqlAdapter {
            pool,
            dialect: dialect::MySql,
        })
    }

    /// Runs one statement on a pooled connection. The connection goes back
    /// to the pool when it is dropped, whether the call completes or not.
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, DbError> {
        debug!(kind = %statement.kind, sql = %statement.sql, "Executing MySQL statement");
        let mut conn = self.pool.get_conn().await?;
        let rows = conn
            .exec(statement.sql.as_str(), positional(&statement.params))
            .await?;
        Ok(rows)
    }

    pub async fn close(self) -> Result<(), DbError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl RelationalExecutor for MySqlAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<RowData>, DbError> {
        let rows = self.query(statement).await?;
        rows.iter()
            .map(|row| DbRow::MySqlRow(row).to_row_data(&statement.entity, &statement.columns))
            .collect()
    }

    async fn fetch_count(&self, statement: &Statement) -> Result<u64, DbError> {
        let rows = self.query(statement).await?;
        match rows.first() {
            Some(row) => DbRow::MySqlRow(row).try_get_count(COUNT_COLUMN),
            None => Err(DbError::UnsupportedStatement(format!(
                "count statement returned no row: {}",
                statement.sql
            ))),
        }
    }

    async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get_conn().await?;
        conn.ping().await?;
        Ok(())
    }
}
