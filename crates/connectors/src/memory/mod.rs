//! An in-process executor over tables of [`RowData`].
//!
//! Statements are run from their AST rather than their SQL text, with the
//! same three-valued filter semantics the planner uses. Used by tests; it
//! also records which statements ran and can inject failures or latency.

mod select;

use crate::{error::DbError, executor::RelationalExecutor};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::{
    compiler::{Statement, StatementKind},
    dialect::{self, Dialect},
};
use select::{Tables, run_count, run_select};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct Failure {
    on: Option<StatementKind>,
    message: String,
}

#[derive(Clone, Default)]
pub struct MemoryExecutor {
    tables: Arc<RwLock<Tables>>,
    executed: Arc<Mutex<Vec<StatementKind>>>,
    failure: Arc<Mutex<Option<Failure>>>,
    latency: Option<Duration>,
    dialect: dialect::Postgres,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every statement, e.g. to exercise cancellation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn insert_all(&self, table: &str, rows: impl IntoIterator<Item = RowData>) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Makes the next statements of `on` (any kind when `None`) fail with
    /// a connection error until [`MemoryExecutor::clear_failure`].
    pub fn fail_on(&self, on: Option<StatementKind>, message: &str) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(Failure {
                on,
                message: message.to_string(),
            });
        }
    }

    pub fn clear_failure(&self) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = None;
        }
    }

    /// Kinds of the statements run so far, in order.
    pub fn executed(&self) -> Vec<StatementKind> {
        self.executed
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn clear_log(&self) {
        if let Ok(mut log) = self.executed.lock() {
            log.clear();
        }
    }

    async fn begin(&self, statement: &Statement) -> Result<(), DbError> {
        debug!(kind = %statement.kind, sql = %statement.sql, "Executing in-memory statement");
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Ok(mut log) = self.executed.lock() {
            log.push(statement.kind);
        }
        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        match failure {
            Some(Failure { on, message }) if on.is_none_or(|kind| kind == statement.kind) => {
                Err(DbError::Connection(message))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RelationalExecutor for MemoryExecutor {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<RowData>, DbError> {
        self.begin(statement).await?;
        let tables = self.tables.read().await;
        run_select(&tables, &statement.select, &statement.entity, &statement.columns)
    }

    async fn fetch_count(&self, statement: &Statement) -> Result<u64, DbError> {
        self.begin(statement).await?;
        let tables = self.tables.read().await;
        run_count(&tables, &statement.select, &statement.entity)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
