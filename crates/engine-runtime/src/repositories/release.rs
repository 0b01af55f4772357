//! Release search. Criteria are composed declaratively: every absent field
//! yields a disabled predicate that drops out of the final filter.

use crate::{
    error::RepositoryError,
    execution::pager::PagedExecutor,
    repositories::{
        Searcher, common_sort_fields, paged,
        record::{Fields, Record},
        schema,
    },
};
use chrono::{DateTime, Utc};
use model::{
    pagination::{page::Page, request::PageRequest},
    records::row::RowData,
};
use planner::{
    error::ValidationError,
    query::{
        join::JoinSpec,
        predicate::Predicate,
        specification::{QuerySpec, QuerySpecBuilder},
    },
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub name: String,
    pub game_version_id: Uuid,
    pub mapping_type_id: Uuid,
    pub is_snapshot: bool,
}

impl Record for Release {
    const ENTITY: &'static str = "Release";

    fn from_row(row: &RowData) -> Result<Self, RepositoryError> {
        let fields = Fields::new(row, Self::ENTITY);
        Ok(Release {
            id: fields.uuid("id")?,
            created_by: fields.opt_uuid("created_by")?,
            created_on: fields.timestamp("created_on")?,
            name: fields.string("name")?,
            game_version_id: fields.uuid("game_version_id")?,
            mapping_type_id: fields.uuid("mapping_type_id")?,
            is_snapshot: fields.bool("is_snapshot")?,
        })
    }
}

/// Optional search criteria; `None` means "do not narrow".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseFilter {
    pub name_regex: Option<String>,
    pub game_version_id: Option<Uuid>,
    pub mapping_type_id: Option<Uuid>,
    pub is_snapshot: Option<bool>,
    /// Only releases containing this mapping.
    pub mapping_id: Option<Uuid>,
    /// Only releases created by this user.
    pub user_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct ReleaseRepository {
    searcher: Searcher,
}

impl ReleaseRepository {
    pub fn new(pager: PagedExecutor) -> Self {
        ReleaseRepository {
            searcher: Searcher::new(pager),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.searcher = self.searcher.with_cancellation(cancel);
        self
    }

    /// The query behind [`ReleaseRepository::find_all_by`].
    ///
    /// Component rows are only joined when a mapping is requested; the
    /// join can match a release several times, so the query is DISTINCT.
    pub fn search_spec(
        filter: &ReleaseFilter,
        request: &PageRequest,
    ) -> Result<QuerySpec, ValidationError> {
        let mut query = QuerySpecBuilder::new(schema::release(), "r");
        if filter.mapping_id.is_some() {
            query = query
                .join(
                    JoinSpec::inner(schema::release_component(), "rc")
                        .on(Predicate::equals_column("r.id", "rc.release_id")),
                )
                .distinct(true);
        }

        let criteria = Predicate::all([
            Predicate::matches_opt("r.name", filter.name_regex.clone()),
            Predicate::equals_opt("r.game_version_id", filter.game_version_id),
            Predicate::equals_opt("r.mapping_type_id", filter.mapping_type_id),
            Predicate::equals_opt("r.is_snapshot", filter.is_snapshot),
            // `rc` only exists when the join above was added.
            Predicate::when_present(filter.mapping_id, |id| Predicate::equals("rc.mapping_id", id)),
            Predicate::equals_opt("r.created_by", filter.user_id),
        ]);

        paged(query.filter(criteria), request, &common_sort_fields("r")).build()
    }

    pub async fn find_all_by(
        &self,
        filter: &ReleaseFilter,
        request: &PageRequest,
    ) -> Result<Page<Release>, RepositoryError> {
        let spec = Self::search_spec(filter, request)?;
        self.searcher.page(spec).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Release>, RepositoryError> {
        let spec = QuerySpecBuilder::new(schema::release(), "r")
            .filter(Predicate::equals("r.id", id))
            .build()?;
        self.searcher.first(spec).await
    }
}
