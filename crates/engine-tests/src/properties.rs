#[cfg(test)]
mod tests {
    use crate::utils::{
        GAME_VERSION_NEW, GAME_VERSION_OLD, MAPPING_A, MAPPING_B, USER, release_rows, seeded_pager,
    };
    use engine_runtime::repositories::{
        release::{ReleaseFilter, ReleaseRepository},
        schema,
    };
    use model::{
        core::value::Value,
        pagination::request::{PageRequest, SortOrder},
        records::row::RowData,
    };
    use planner::{
        error::ValidationError,
        query::{
            filter::FilterBuilder,
            join::JoinSpec,
            predicate::{CompareOp, Predicate},
            specification::QuerySpecBuilder,
        },
    };
    use proptest::prelude::*;
    use std::{collections::HashSet, future::Future};
    use uuid::Uuid;

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime")
            .block_on(future)
    }

    fn arb_pattern() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("^a".to_string()),
            Just("^b".to_string()),
            Just("1$".to_string()),
            Just("[23]".to_string()),
            Just(".".to_string()),
            Just("^z".to_string()),
        ]
    }

    fn arb_uuid(choices: Vec<Uuid>) -> impl Strategy<Value = Option<Uuid>> {
        prop::option::of(prop::sample::select(choices))
    }

    fn arb_filter() -> impl Strategy<Value = ReleaseFilter> {
        (
            prop::option::of(arb_pattern()),
            arb_uuid(vec![GAME_VERSION_OLD, GAME_VERSION_NEW, Uuid::nil()]),
            prop::option::of(any::<bool>()),
            arb_uuid(vec![MAPPING_A, MAPPING_B]),
            arb_uuid(vec![USER, Uuid::nil()]),
        )
            .prop_map(
                |(name_regex, game_version_id, is_snapshot, mapping_id, user_id)| ReleaseFilter {
                    name_regex,
                    game_version_id,
                    mapping_type_id: None,
                    is_snapshot,
                    mapping_id,
                    user_id,
                },
            )
    }

    fn arb_sort() -> impl Strategy<Value = Vec<SortOrder>> {
        prop::collection::vec(
            prop_oneof![
                Just(SortOrder::asc("name")),
                Just(SortOrder::desc("name")),
                Just(SortOrder::asc("created_on")),
                Just(SortOrder::desc("created_on")),
            ],
            0..2,
        )
    }

    fn request(index: u64, size: u64, sort: &[SortOrder]) -> PageRequest {
        PageRequest {
            index,
            size,
            sort: sort.to_vec(),
        }
    }

    /// A comparison over one release column, built from a value that may be
    /// absent, paired with whether it was.
    fn arb_optional_comparison() -> impl Strategy<Value = (Predicate, bool)> {
        prop_oneof![
            prop::option::of(any::<bool>())
                .prop_map(|v| (Predicate::equals_opt("is_snapshot", v), v.is_none())),
            arb_uuid(vec![GAME_VERSION_OLD, GAME_VERSION_NEW])
                .prop_map(|v| (Predicate::equals_opt("game_version_id", v), v.is_none())),
            prop::option::of(arb_pattern()).prop_map(|p| {
                let absent = p.is_none();
                (Predicate::matches_opt("name", p), absent)
            }),
            prop::option::of(any::<bool>()).prop_map(|v| {
                let predicate = Predicate::when_present(v, |v| {
                    Predicate::compare("is_snapshot", CompareOp::NotEq, v)
                });
                (predicate, v.is_none())
            }),
        ]
    }

    fn names(rows: &[RowData]) -> Vec<Value> {
        rows.iter().map(|row| row.get_value("name")).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn count_matches_unpaged_fetch(filter in arb_filter(), sort in arb_sort(), size in 1u64..4) {
            let spec = ReleaseRepository::search_spec(&filter, &request(0, size, &sort)).unwrap();
            let (count, all) = block_on(async {
                let (pager, _) = seeded_pager().await;
                let count = pager.count(spec.clone()).await.unwrap();
                let all = pager.fetch_all(spec.clone()).await.unwrap();
                (count, all)
            });
            prop_assert_eq!(count, all.len() as u64);
        }

        #[test]
        fn pages_concatenate_to_the_full_result(filter in arb_filter(), sort in arb_sort(), size in 1u64..7) {
            let (pages, all) = block_on(async {
                let (pager, _) = seeded_pager().await;
                let first = ReleaseRepository::search_spec(&filter, &request(0, size, &sort)).unwrap();
                let all = pager.fetch_all(first.clone()).await.unwrap();

                let mut pages = Vec::new();
                let mut page = pager.execute_page(first).await.unwrap();
                let total_pages = page.total_pages;
                for index in 1..=total_pages {
                    pages.append(&mut page.items);
                    if index < total_pages {
                        let spec = ReleaseRepository::search_spec(&filter, &request(index, size, &sort))
                            .unwrap();
                        page = pager.execute_page(spec).await.unwrap();
                    }
                }
                (pages, all)
            });

            let ids: HashSet<Value> = pages.iter().map(|r| r.get_value("id")).collect();
            prop_assert_eq!(ids.len(), pages.len());
            prop_assert_eq!(names(&pages), names(&all));
        }

        #[test]
        fn repeated_execution_is_idempotent(filter in arb_filter(), sort in arb_sort(), index in 0u64..3, size in 1u64..4) {
            let spec = ReleaseRepository::search_spec(&filter, &request(index, size, &sort)).unwrap();
            let (first, second) = block_on(async {
                let (pager, _) = seeded_pager().await;
                let first = pager.execute_page(spec.clone()).await.unwrap();
                let second = pager.execute_page(spec).await.unwrap();
                (first, second)
            });
            prop_assert_eq!(first, second);
        }

        #[test]
        fn absent_values_never_narrow((comparison, absent) in arb_optional_comparison()) {
            if absent {
                let rows = release_rows();
                prop_assert!(rows.iter().all(|row| comparison.matches(row)));
                prop_assert_eq!(comparison.simplify(), Predicate::Always);
            }
        }

        #[test]
        fn absent_callbacks_never_register(value in prop::option::of(any::<bool>())) {
            let builder = FilterBuilder::new(QuerySpecBuilder::new(schema::release(), "r"))
                .add_callback_when(value, |query, v| query.filter(Predicate::equals("r.is_snapshot", v)));
            prop_assert_eq!(builder.len(), usize::from(value.is_some()));
            let spec = builder.build().unwrap();
            prop_assert_eq!(spec.predicate() == &Predicate::Always, value.is_none());
        }

        #[test]
        fn forward_join_references_are_rejected(joins in 2usize..5, seed in any::<(usize, usize)>()) {
            let from = seed.0 % (joins - 1);
            let to = from + 1 + seed.1 % (joins - from - 1);

            let mut query = QuerySpecBuilder::new(schema::release(), "r");
            for i in 0..joins {
                let alias = format!("c{i}");
                let on = if i == from {
                    Predicate::equals_column(format!("{alias}.release_id").as_str(), format!("c{to}.release_id").as_str())
                } else {
                    Predicate::equals_column("r.id", format!("{alias}.release_id").as_str())
                };
                query = query.join(JoinSpec::left(schema::release_component(), &alias).on(on));
            }

            let err = query.build().unwrap_err();
            let is_dangling = matches!(err, ValidationError::DanglingAlias { alias, .. } if alias == format!("c{to}"));
            prop_assert!(is_dangling);
        }
    }
}
