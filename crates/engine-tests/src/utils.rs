#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use connectors::memory::MemoryExecutor;
use engine_runtime::execution::pager::PagedExecutor;
use model::{
    core::{data_type::DataType, value::Value},
    records::row::{FieldValue, RowData},
};
use std::sync::Arc;
use uuid::Uuid;

pub const GAME_VERSION_OLD: Uuid = Uuid::from_u128(0x100);
pub const GAME_VERSION_NEW: Uuid = Uuid::from_u128(0x101);
pub const MAPPING_TYPE: Uuid = Uuid::from_u128(0x200);
pub const MAPPING_A: Uuid = Uuid::from_u128(0x300);
pub const MAPPING_B: Uuid = Uuid::from_u128(0x301);
pub const USER: Uuid = Uuid::from_u128(0x400);

/// The five releases every scenario runs against, in insertion order.
pub const RELEASE_NAMES: [&str; 5] = ["a1", "a2", "b1", "b2", "b3"];

pub struct ReleaseFixture {
    pub name: &'static str,
    pub game_version_id: Uuid,
    pub is_snapshot: bool,
    pub created_by: Option<Uuid>,
    pub mappings: &'static [Uuid],
}

pub fn release_fixtures() -> Vec<ReleaseFixture> {
    vec![
        ReleaseFixture {
            name: "a1",
            game_version_id: GAME_VERSION_OLD,
            is_snapshot: false,
            created_by: Some(USER),
            mappings: &[MAPPING_A, MAPPING_B],
        },
        ReleaseFixture {
            name: "a2",
            game_version_id: GAME_VERSION_NEW,
            is_snapshot: true,
            created_by: Some(USER),
            mappings: &[MAPPING_A],
        },
        ReleaseFixture {
            name: "b1",
            game_version_id: GAME_VERSION_OLD,
            is_snapshot: false,
            created_by: None,
            mappings: &[],
        },
        ReleaseFixture {
            name: "b2",
            game_version_id: GAME_VERSION_NEW,
            is_snapshot: false,
            created_by: None,
            mappings: &[MAPPING_B],
        },
        ReleaseFixture {
            name: "b3",
            game_version_id: GAME_VERSION_OLD,
            is_snapshot: true,
            created_by: Some(USER),
            mappings: &[MAPPING_B],
        },
    ]
}

/// Stable id of the n-th fixture release.
pub fn release_id(index: usize) -> Uuid {
    Uuid::from_u128(0x500 + index as u128)
}

/// Releases are created one day apart, oldest first.
pub fn created_on(index: usize) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 3, 1 + index as u32)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid fixture date")
        .and_utc()
}

fn field(name: &str, value: impl Into<Value>, data_type: DataType) -> FieldValue {
    let value = value.into();
    FieldValue::new(name, (!value.is_null()).then_some(value), data_type)
}

pub fn release_rows() -> Vec<RowData> {
    release_fixtures()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            RowData::new(
                "release",
                vec![
                    field("id", release_id(i), DataType::Uuid),
                    field("created_by", r.created_by, DataType::Uuid),
                    field("created_on", created_on(i), DataType::Timestamp),
                    field("name", r.name, DataType::String),
                    field("game_version_id", r.game_version_id, DataType::Uuid),
                    field("mapping_type_id", MAPPING_TYPE, DataType::Uuid),
                    field("is_snapshot", r.is_snapshot, DataType::Boolean),
                ],
            )
        })
        .collect()
}

pub fn component_rows() -> Vec<RowData> {
    let mut rows = Vec::new();
    for (i, release) in release_fixtures().iter().enumerate() {
        for mapping in release.mappings {
            rows.push(RowData::new(
                "release_component",
                vec![
                    field("id", Uuid::new_v4(), DataType::Uuid),
                    field("created_by", Value::Null, DataType::Uuid),
                    field("created_on", created_on(i), DataType::Timestamp),
                    field("release_id", release_id(i), DataType::Uuid),
                    field("mapping_id", *mapping, DataType::Uuid),
                ],
            ));
        }
    }
    rows
}

pub async fn seeded_memory() -> MemoryExecutor {
    let memory = MemoryExecutor::new();
    memory.insert_all("release", release_rows()).await;
    memory.insert_all("release_component", component_rows()).await;
    memory
}

/// A paged executor over the seeded fixture, plus the executor itself for
/// inspecting which statements ran.
pub async fn seeded_pager() -> (PagedExecutor, MemoryExecutor) {
    let memory = seeded_memory().await;
    (PagedExecutor::new(Arc::new(memory.clone())), memory)
}

pub fn row_names(rows: &[RowData]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get_value("name").as_str().map(String::from))
        .collect()
}
