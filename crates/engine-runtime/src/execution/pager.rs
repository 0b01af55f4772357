use crate::error::{PageError, StorageError};
use connectors::executor::RelationalExecutor;
use model::{pagination::page::Page, records::row::RowData};
use planner::query::{
    compiler::{CompiledQuery, Statement, StatementCompiler},
    specification::QuerySpec,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs a [`QuerySpec`] as a count statement followed by a data statement
/// and assembles the [`Page`].
///
/// Both statements come from one compilation, so `total_elements` always
/// counts the rows the data statement pages through. The pair is not run
/// in a transaction: a concurrent writer can make the two disagree.
///
/// Rows come back in the specification's ordering. Without one, storage
/// decides the order and consecutive pages may overlap; add a tie-breaker
/// on a unique column when pages must be disjoint.
#[derive(Clone)]
pub struct PagedExecutor {
    executor: Arc<dyn RelationalExecutor>,
}

impl PagedExecutor {
    pub fn new(executor: Arc<dyn RelationalExecutor>) -> Self {
        PagedExecutor { executor }
    }

    pub fn executor(&self) -> &Arc<dyn RelationalExecutor> {
        &self.executor
    }

    /// Compiles `spec` for the executor's dialect without running it.
    pub fn compile(&self, spec: QuerySpec) -> Result<CompiledQuery, PageError> {
        Ok(StatementCompiler::new(self.executor.dialect()).compile(spec)?)
    }

    /// Fetches one page. An unpaged specification yields a single page
    /// holding every row. The data statement is skipped when the count is
    /// zero.
    pub async fn execute_page(&self, spec: QuerySpec) -> Result<Page<RowData>, PageError> {
        let compiled = self.compile(spec)?;
        let total = self.run_count(&compiled.count).await?;

        let (index, size) = match compiled.window {
            Some(window) => (window.index, window.size),
            None => (0, total),
        };

        if total == 0 {
            debug!(index, size, "No matching rows, skipping data statement");
            return Ok(Page::empty(index, size));
        }

        let rows = self.run_rows(&compiled.data).await?;
        debug!(index, size, total, fetched = rows.len(), "Assembled page");
        Ok(Page::new(rows, index, size, total))
    }

    /// Like [`PagedExecutor::execute_page`], but gives up with
    /// [`PageError::Cancelled`] once `cancel` fires. The in-flight
    /// statement future is dropped, which releases its connection.
    pub async fn execute_page_with_cancel(
        &self,
        spec: QuerySpec,
        cancel: &CancellationToken,
    ) -> Result<Page<RowData>, PageError> {
        if cancel.is_cancelled() {
            return Err(PageError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Page request cancelled");
                Err(PageError::Cancelled)
            }
            page = self.execute_page(spec) => page,
        }
    }

    /// Every row matching `spec`, ignoring its pagination window.
    pub async fn fetch_all(&self, spec: QuerySpec) -> Result<Vec<RowData>, PageError> {
        let compiled = self.compile(spec.without_pagination())?;
        self.run_rows(&compiled.data).await
    }

    /// [`PagedExecutor::fetch_all`], abandoned once `cancel` fires.
    pub async fn fetch_all_with_cancel(
        &self,
        spec: QuerySpec,
        cancel: &CancellationToken,
    ) -> Result<Vec<RowData>, PageError> {
        if cancel.is_cancelled() {
            return Err(PageError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Fetch cancelled");
                Err(PageError::Cancelled)
            }
            rows = self.fetch_all(spec) => rows,
        }
    }

    /// Number of rows matching `spec`, ignoring its pagination window.
    pub async fn count(&self, spec: QuerySpec) -> Result<u64, PageError> {
        let compiled = self.compile(spec)?;
        self.run_count(&compiled.count).await
    }

    async fn run_count(&self, statement: &Statement) -> Result<u64, PageError> {
        self.executor
            .fetch_count(statement)
            .await
            .map_err(|source| storage_error(statement, source))
    }

    async fn run_rows(&self, statement: &Statement) -> Result<Vec<RowData>, PageError> {
        self.executor
            .fetch_rows(statement)
            .await
            .map_err(|source| storage_error(statement, source))
    }
}

fn storage_error(statement: &Statement, source: connectors::error::DbError) -> PageError {
    PageError::Storage(StorageError {
        kind: statement.kind,
        source,
    })
}
