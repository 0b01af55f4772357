//! Named relations and their typed columns.

use crate::{query::ast::common::TableRef, table_ref};
use model::core::data_type::DataType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnDef {
    pub fn new(name: &str, data_type: DataType) -> Self {
        ColumnDef {
            name: name.to_string(),
            data_type,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A table a query can select from or join to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl Relation {
    pub fn new(name: &str, columns: Vec<ColumnDef>) -> Self {
        Relation {
            name: name.to_string(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn table_ref(&self) -> TableRef {
        table_ref!(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let rel = Relation::new(
            "release",
            vec![
                ColumnDef::new("id", DataType::Uuid),
                ColumnDef::new("name", DataType::String),
                ColumnDef::new("created_by", DataType::Uuid).nullable(),
            ],
        );
        assert_eq!(rel.column("NAME").map(|c| c.data_type), Some(DataType::String));
        assert!(rel.column("created_by").unwrap().nullable);
        assert!(rel.column("missing").is_none());
        assert_eq!(rel.table_ref().name, "release");
    }
}
