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
        predicate::Predicate,
        specification::{QuerySpec, QuerySpecBuilder},
    },
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameVersion {
    pub id: Uuid,
    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub name: String,
    pub is_pre_release: bool,
    pub is_snapshot: bool,
}

impl Record for GameVersion {
    const ENTITY: &'static str = "GameVersion";

    fn from_row(row: &RowData) -> Result<Self, RepositoryError> {
        let fields = Fields::new(row, Self::ENTITY);
        Ok(GameVersion {
            id: fields.uuid("id")?,
            created_by: fields.opt_uuid("created_by")?,
            created_on: fields.timestamp("created_on")?,
            name: fields.string("name")?,
            is_pre_release: fields.bool("is_pre_release")?,
            is_snapshot: fields.bool("is_snapshot")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameVersionFilter {
    pub name_regex: Option<String>,
    pub is_pre_release: Option<bool>,
    pub is_snapshot: Option<bool>,
}

#[derive(Clone)]
pub struct GameVersionRepository {
    searcher: Searcher,
}

impl GameVersionRepository {
    pub fn new(pager: PagedExecutor) -> Self {
        GameVersionRepository {
            searcher: Searcher::new(pager),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.searcher = self.searcher.with_cancellation(cancel);
        self
    }

    pub fn search_spec(
        filter: &GameVersionFilter,
        request: &PageRequest,
    ) -> Result<QuerySpec, ValidationError> {
        let criteria = Predicate::matches_opt("g.name", filter.name_regex.clone())
            .and(Predicate::equals_opt("g.is_pre_release", filter.is_pre_release))
            .and(Predicate::equals_opt("g.is_snapshot", filter.is_snapshot));
        let query = QuerySpecBuilder::new(schema::game_version(), "g").filter(criteria);
        paged(query, request, &common_sort_fields("g")).build()
    }

    pub async fn find_all_by(
        &self,
        filter: &GameVersionFilter,
        request: &PageRequest,
    ) -> Result<Page<GameVersion>, RepositoryError> {
        let spec = Self::search_spec(filter, request)?;
        self.searcher.page(spec).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GameVersion>, RepositoryError> {
        let spec = QuerySpecBuilder::new(schema::game_version(), "g")
            .filter(Predicate::equals("g.id", id))
            .build()?;
        self.searcher.first(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PageError, execution::pager::PagedExecutor};
    use connectors::memory::MemoryExecutor;
    use model::{
        core::{data_type::DataType, value::Value},
        records::row::FieldValue,
    };
    use std::sync::Arc;

    fn version(name: &str, pre_release: bool, day: u32) -> RowData {
        let created_on = chrono::NaiveDate::from_ymd_opt(2024, 1, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
            .and_utc();
        RowData::new(
            "game_version",
            vec![
                FieldValue::new("id", Some(Value::Uuid(Uuid::new_v4())), DataType::Uuid),
                FieldValue::new("created_by", None, DataType::Uuid),
                FieldValue::new("created_on", Some(Value::Timestamp(created_on)), DataType::Timestamp),
                FieldValue::new("name", Some(Value::from(name)), DataType::String),
                FieldValue::new("is_pre_release", Some(Value::Boolean(pre_release)), DataType::Boolean),
                FieldValue::new("is_snapshot", Some(Value::Boolean(false)), DataType::Boolean),
            ],
        )
    }

    async fn repository() -> (GameVersionRepository, Vec<RowData>) {
        let rows = vec![
            version("1.20", false, 1),
            version("1.21-pre1", true, 2),
            version("1.21", false, 3),
        ];
        let memory = MemoryExecutor::new();
        memory.insert_all("game_version", rows.clone()).await;
        let pager = PagedExecutor::new(Arc::new(memory));
        (GameVersionRepository::new(pager), rows)
    }

    #[tokio::test]
    async fn test_newest_first_by_default() {
        let (repository, _) = repository().await;
        let page = repository
            .find_all_by(&GameVersionFilter::default(), &PageRequest::first(2))
            .await
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["1.21", "1.21-pre1"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_filter_by_flags_and_name() {
        let (repository, _) = repository().await;
        let filter = GameVersionFilter {
            name_regex: Some(r"^1\.21".into()),
            is_pre_release: Some(false),
            ..Default::default()
        };
        let page = repository.find_all_by(&filter, &PageRequest::first(10)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "1.21");
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let (repository, rows) = repository().await;
        let id = rows[1].get_value("id").as_uuid().unwrap();

        let found = repository.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "1.21-pre1");
        assert!(found.is_pre_release);
        assert!(repository.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_honours_cancellation() {
        let (repository, rows) = repository().await;
        let id = rows[0].get_value("id").as_uuid().unwrap();
        let token = CancellationToken::new();
        let repository = repository.with_cancellation(token.clone());

        token.cancel();
        let err = repository.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Page(PageError::Cancelled)));
    }
}
