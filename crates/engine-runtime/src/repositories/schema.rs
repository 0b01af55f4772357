//! Relations of the mapping domain.

use model::core::data_type::DataType;
use planner::query::schema::{ColumnDef, Relation};

fn audited(mut columns: Vec<ColumnDef>) -> Vec<ColumnDef> {
    let mut all = vec![
        ColumnDef::new("id", DataType::Uuid),
        ColumnDef::new("created_by", DataType::Uuid).nullable(),
        ColumnDef::new("created_on", DataType::Timestamp),
    ];
    all.append(&mut columns);
    all
}

pub fn game_version() -> Relation {
    Relation::new(
        "game_version",
        audited(vec![
            ColumnDef::new("name", DataType::String),
            ColumnDef::new("is_pre_release", DataType::Boolean),
            ColumnDef::new("is_snapshot", DataType::Boolean),
        ]),
    )
}

pub fn mapping_type() -> Relation {
    Relation::new(
        "mapping_type",
        audited(vec![
            ColumnDef::new("name", DataType::String),
            ColumnDef::new("visible", DataType::Boolean),
            ColumnDef::new("editable", DataType::Boolean),
            ColumnDef::new("state_in", DataType::String).nullable(),
            ColumnDef::new("state_out", DataType::String).nullable(),
        ]),
    )
}

pub fn release() -> Relation {
    Relation::new(
        "release",
        audited(vec![
            ColumnDef::new("name", DataType::String),
            ColumnDef::new("game_version_id", DataType::Uuid),
            ColumnDef::new("mapping_type_id", DataType::Uuid),
            ColumnDef::new("is_snapshot", DataType::Boolean),
        ]),
    )
}

/// Links a release to the mappings it contains.
pub fn release_component() -> Relation {
    Relation::new(
        "release_component",
        audited(vec![
            ColumnDef::new("release_id", DataType::Uuid),
            ColumnDef::new("mapping_id", DataType::Uuid),
        ]),
    )
}
