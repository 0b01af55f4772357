use crate::{
    error::{ConnectorError, DbError},
    executor::RelationalExecutor,
    sql::{
        postgres::{params::PgBindings, utils::connect_client},
        row::DbRow,
    },
};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::{
    compiler::{COUNT_COLUMN, Statement},
    dialect::{self, Dialect},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = Arc::new(RwLock::new(connect_client(url).await?));
        Ok(PgAdapter {
            client,
            dialect: dialect::Postgres,
        })
    }

    async fn query(&self, statement: &Statement) -> Result<Vec<tokio_postgres::Row>, DbError> {
        debug!(kind = %statement.kind, sql = %statement.sql, "Executing Postgres statement");
        let client = self.client.read().await;
        let prepared = client.prepare(&statement.sql).await?;
        let bindings = PgBindings::new(&statement.params, prepared.params());
        Ok(client.query(&prepared, &bindings.refs()).await?)
    }
}

#[async_trait]
impl RelationalExecutor for PgAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<RowData>, DbError> {
        let rows = self.query(statement).await?;
        rows.iter()
            .map(|row| DbRow::PostgresRow(row).to_row_data(&statement.entity, &statement.columns))
            .collect()
    }

    async fn fetch_count(&self, statement: &Statement) -> Result<u64, DbError> {
        let rows = self.query(statement).await?;
        match rows.first() {
            Some(row) => DbRow::PostgresRow(row).try_get_count(COUNT_COLUMN),
            None => Err(DbError::UnsupportedStatement(format!(
                "count statement returned no row: {}",
                statement.sql
            ))),
        }
    }

    async fn ping(&self) -> Result<(), DbError> {
        let client = self.client.read().await;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }
}
