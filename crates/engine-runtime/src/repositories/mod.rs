//! Search repositories over the mapping-domain relations.
//!
//! Each repository turns an optional-criteria filter and a [`PageRequest`]
//! into a validated [`QuerySpec`] and runs it through a [`PagedExecutor`].

pub mod game_version;
pub mod mapping_type;
pub mod record;
pub mod release;
pub mod schema;

use crate::{
    error::RepositoryError,
    execution::pager::PagedExecutor,
    repositories::record::Record,
};
use model::pagination::{
    page::Page,
    request::{PageRequest, SortDirection},
};
use planner::query::{
    predicate::ColumnRef,
    specification::{QuerySpec, QuerySpecBuilder, SortFields},
};
use tokio_util::sync::CancellationToken;

/// Applies the request's window and sort. Without a requested sort the
/// newest rows come first; `id` breaks ties either way.
pub(crate) fn paged(
    query: QuerySpecBuilder,
    request: &PageRequest,
    sort_fields: &SortFields,
) -> QuerySpecBuilder {
    let alias = query.base_alias().to_string();
    let query = if request.sort.is_empty() {
        query.order_by(ColumnRef::qualified(&alias, "created_on"), SortDirection::Desc)
    } else {
        query
    };
    query
        .pageable(request, sort_fields)
        .tie_breaker(ColumnRef::qualified(&alias, "id"))
}

/// Sort properties shared by every mapping-domain relation.
pub(crate) fn common_sort_fields(alias: &str) -> SortFields {
    SortFields::new()
        .field("id", ColumnRef::qualified(alias, "id"))
        .field("name", ColumnRef::qualified(alias, "name"))
        .field("created_on", ColumnRef::qualified(alias, "created_on"))
}

/// The execution half every repository shares.
#[derive(Clone)]
pub(crate) struct Searcher {
    pager: PagedExecutor,
    cancel: CancellationToken,
}

impl Searcher {
    pub(crate) fn new(pager: PagedExecutor) -> Self {
        Searcher {
            pager,
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub(crate) async fn page<R: Record>(&self, spec: QuerySpec) -> Result<Page<R>, RepositoryError> {
        let page = self.pager.execute_page_with_cancel(spec, &self.cancel).await?;
        page.try_map(|row| R::from_row(&row))
    }

    pub(crate) async fn first<R: Record>(&self, spec: QuerySpec) -> Result<Option<R>, RepositoryError> {
        let rows = self.pager.fetch_all_with_cancel(spec, &self.cancel).await?;
        rows.first().map(R::from_row).transpose()
    }
}
