//! Mapping type search, composed through [`FilterBuilder`] callbacks.

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
        filter::FilterBuilder,
        predicate::Predicate,
        specification::{QuerySpec, QuerySpecBuilder},
    },
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingType {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub name: String,
    pub visible: bool,
    pub editable: bool,
    pub state_in: Option<String>,
    pub state_out: Option<String>,
}

impl Record for MappingType {
    const ENTITY: &'static str = "MappingType";

    fn from_row(row: &RowData) -> Result<Self, RepositoryError> {
        let fields = Fields::new(row, Self::ENTITY);
        Ok(MappingType {
            id: fields.uuid("id")?,
            created_by: fields.opt_uuid("created_by")?,
            created_on: fields.timestamp("created_on")?,
            name: fields.string("name")?,
            visible: fields.bool("visible")?,
            editable: fields.bool("editable")?,
            state_in: fields.opt_string("state_in")?,
            state_out: fields.opt_string("state_out")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingTypeFilter {
    pub name_regex: Option<String>,
    pub editable: Option<bool>,
    /// Hides mapping types that are not visible outside the system.
    pub externally_visible_only: bool,
}

#[derive(Clone)]
pub struct MappingTypeRepository {
    searcher: Searcher,
}

impl MappingTypeRepository {
    pub fn new(pager: PagedExecutor) -> Self {
        MappingTypeRepository {
            searcher: Searcher::new(pager),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.searcher = self.searcher.with_cancellation(cancel);
        self
    }

    pub fn search_spec(
        filter: &MappingTypeFilter,
        request: &PageRequest,
    ) -> Result<QuerySpec, ValidationError> {
        let request = request.clone();
        FilterBuilder::new(QuerySpecBuilder::new(schema::mapping_type(), "m"))
            .add_callback_when(filter.name_regex.clone(), |query, regex| {
                query.filter(Predicate::matches_pattern("m.name", regex))
            })
            .add_callback_when(filter.editable, |query, editable| {
                query.filter(Predicate::equals("m.editable", editable))
            })
            .add_callback_when(filter.externally_visible_only.then_some(()), |query, _| {
                query.filter(Predicate::equals("m.visible", true))
            })
            .add_callback(move |query| paged(query, &request, &common_sort_fields("m")))
            .build()
    }

    pub async fn find_all_by(
        &self,
        filter: &MappingTypeFilter,
        request: &PageRequest,
    ) -> Result<Page<MappingType>, RepositoryError> {
        let spec = Self::search_spec(filter, request)?;
        self.searcher.page(spec).await
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        externally_visible_only: bool,
    ) -> Result<Option<MappingType>, RepositoryError> {
        let spec = FilterBuilder::new(QuerySpecBuilder::new(schema::mapping_type(), "m"))
            .add_callback(move |query| query.filter(Predicate::equals("m.id", id)))
            .add_callback_when(externally_visible_only.then_some(()), |query, _| {
                query.filter(Predicate::equals("m.visible", true))
            })
            .build()?;
        self.searcher.first(spec).await
    }
}
