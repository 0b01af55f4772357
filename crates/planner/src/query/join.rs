use crate::query::{ast::common::JoinKind, predicate::Predicate, schema::Relation};

/// An additional relation brought into a query under its own alias.
///
/// The condition may reference only the base alias and this join's own
/// alias. Any other alias, including one of an earlier join, is rejected
/// when the query specification is built.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub relation: Relation,
    pub alias: String,
    pub on: Option<Predicate>,
}

impl JoinSpec {
    pub fn join(kind: JoinKind, relation: Relation, alias: &str) -> Self {
        JoinSpec {
            kind,
            relation,
            alias: alias.to_string(),
            on: None,
        }
    }

    pub fn inner(relation: Relation, alias: &str) -> Self {
        Self::join(JoinKind::Inner, relation, alias)
    }

    pub fn left(relation: Relation, alias: &str) -> Self {
        Self::join(JoinKind::Left, relation, alias)
    }

    pub fn on(mut self, condition: Predicate) -> Self {
        self.on = Some(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::schema::ColumnDef;
    use model::core::data_type::DataType;

    #[test]
    fn test_join_builder() {
        let rc = Relation::new(
            "release_component",
            vec![ColumnDef::new("release_id", DataType::Uuid)],
        );
        let join = JoinSpec::inner(rc, "rc").on(Predicate::equals_column("r.id", "rc.release_id"));
        assert_eq!(join.kind, JoinKind::Inner);
        assert_eq!(join.alias, "rc");
        assert!(join.on.is_some());
        assert_eq!(JoinSpec::left(join.relation.clone(), "x").kind, JoinKind::Left);
    }
}
