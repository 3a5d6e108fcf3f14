// Unit tests for userdir-tui
// These tests work with the public API only

fn mk_user(id: u64, name: &str) -> userdir_tui::User {
    userdir_tui::User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        ..Default::default()
    }
}

#[cfg(test)]
mod store_tests {
    use super::mk_user;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use userdir_tui::{Mutation, UserStore};

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64),
        Update(u64),
        Delete(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..20).prop_map(Op::Add),
            (0u64..20).prop_map(Op::Update),
            (0u64..20).prop_map(Op::Delete),
        ]
    }

    proptest! {
        /// Property: no sequence of mutations produces two records with one id
        #[test]
        fn ids_stay_unique(ops in prop::collection::vec(op(), 1..60)) {
            let mut store = UserStore::with_users(vec![mk_user(1, "Bob"), mk_user(2, "Amy")]);
            for op in ops {
                let before = store.len();
                match op {
                    Op::Add(id) => {
                        let existed = store.get(id).is_some();
                        let res = store.add(mk_user(id, "New"));
                        if existed {
                            prop_assert_eq!(res, Mutation::DuplicateId);
                            prop_assert_eq!(store.len(), before);
                        } else {
                            prop_assert_eq!(res, Mutation::Applied);
                            prop_assert_eq!(store.users()[0].id, id);
                        }
                    }
                    Op::Update(id) => {
                        let pos = store.users().iter().position(|u| u.id == id);
                        let res = store.update(mk_user(id, "Changed"));
                        prop_assert_eq!(store.len(), before);
                        match pos {
                            Some(p) => {
                                prop_assert_eq!(res, Mutation::Applied);
                                prop_assert_eq!(&store.users()[p].name, "Changed");
                            }
                            None => prop_assert_eq!(res, Mutation::NotFound),
                        }
                    }
                    Op::Delete(id) => {
                        let existed = store.get(id).is_some();
                        let res = store.delete(id);
                        if existed {
                            prop_assert_eq!(res, Mutation::Applied);
                            prop_assert_eq!(store.len(), before - 1);
                            prop_assert!(store.get(id).is_none());
                        } else {
                            prop_assert_eq!(res, Mutation::NotFound);
                            prop_assert_eq!(store.len(), before);
                        }
                    }
                }
                let ids: HashSet<u64> = store.users().iter().map(|u| u.id).collect();
                prop_assert_eq!(ids.len(), store.len());
            }
        }

        /// Property: allocated ids never collide with stored ones
        #[test]
        fn next_id_is_always_free(seed in prop::collection::vec(0u64..1000, 0..30)) {
            let users = seed.iter().copied().collect::<HashSet<_>>().into_iter().map(|id| mk_user(id, "U")).collect();
            let mut store = UserStore::with_users(users);
            for _ in 0..5 {
                let id = store.next_id();
                prop_assert!(store.get(id).is_none());
                prop_assert_eq!(store.add(mk_user(id, "Local")), Mutation::Applied);
            }
        }
    }
}

#[cfg(test)]
mod search_tests {
    use super::mk_user;
    use userdir_tui::search::{SortField, SortOrder, SortSpec, derive_view};

    fn names(users: &[userdir_tui::User]) -> Vec<String> {
        users.iter().map(|u| u.name.clone()).collect()
    }

    #[test]
    fn full_email_query_includes_record() {
        let users = vec![mk_user(1, "Bob"), mk_user(2, "Amy")];
        let v = derive_view(&users, "amy@example.com", SortSpec::None);
        assert_eq!(names(&v), vec!["Amy"]);
    }

    #[test]
    fn clearing_query_restores_store_order() {
        let users = vec![mk_user(3, "Cid"), mk_user(1, "Bob"), mk_user(2, "Amy")];
        assert_eq!(derive_view(&users, "bob", SortSpec::None).len(), 1);
        assert!(derive_view(&users, "nobody-here", SortSpec::None).is_empty());
        let v = derive_view(&users, "", SortSpec::None);
        assert_eq!(names(&v), vec!["Cid", "Bob", "Amy"]);
    }

    #[test]
    fn id_sort_is_numeric_not_lexicographic() {
        let users = vec![mk_user(10, "Ten"), mk_user(2, "Two"), mk_user(1, "One")];
        let spec = SortSpec::By {
            field: SortField::Id,
            order: SortOrder::Ascending,
        };
        let v = derive_view(&users, "", spec);
        assert_eq!(v.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 10]);
    }

    #[test]
    fn name_descending_is_exact_reverse_without_ties() {
        let users = vec![mk_user(1, "Dee"), mk_user(2, "Amy"), mk_user(3, "Cid"), mk_user(4, "bob")];
        let asc = derive_view(&users, "", SortSpec::default());
        let mut desc = derive_view(&users, "", SortSpec::default().toggle_order());
        desc.reverse();
        assert_eq!(asc, desc);
        assert_eq!(names(&asc), vec!["Amy", "bob", "Cid", "Dee"]);
    }

    #[test]
    fn pipeline_does_not_touch_input() {
        let users = vec![mk_user(2, "Bob"), mk_user(1, "Amy")];
        let snapshot = users.clone();
        let _ = derive_view(&users, "a", SortSpec::default());
        assert_eq!(users, snapshot);
    }

    #[test]
    fn search_performance_large_dataset() {
        use std::time::Instant;

        let users: Vec<_> = (0..10_000).map(|i| mk_user(i, &format!("user{i}"))).collect();
        let start = Instant::now();
        let v = derive_view(&users, "user5000", SortSpec::default());
        let duration = start.elapsed();

        assert_eq!(v.len(), 1);
        assert!(duration.as_millis() < 500, "Search took too long: {duration:?}");
    }
}

#[cfg(test)]
mod validate_tests {
    use userdir_tui::validate::{
        UserDraft, ValidationError, is_non_empty, is_valid_email, is_valid_website,
    };

    #[test]
    fn predicates_match_documented_examples() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("abc"));
        assert!(is_valid_website("example.com"));
        assert!(is_valid_website(""));
        assert!(!is_valid_website("not a domain"));
        assert!(!is_non_empty(""));
    }

    #[test]
    fn rejected_draft_builds_nothing() {
        let draft = UserDraft {
            name: "Amy".into(),
            email: "amy@x.io".into(),
            website: "nope".into(),
            ..Default::default()
        };
        assert_eq!(draft.into_new_user(1), Err(ValidationError::InvalidWebsite));
    }
}

#[cfg(test)]
mod end_to_end {
    use super::mk_user;
    use userdir_tui::UserStore;
    use userdir_tui::search::{SortSpec, derive_view};

    #[test]
    fn add_then_delete_with_name_sort() {
        let mut store = UserStore::with_users(vec![mk_user(1, "Bob"), mk_user(2, "Amy")]);
        let shown = |s: &UserStore| -> Vec<String> {
            derive_view(s.users(), "", SortSpec::default())
                .into_iter()
                .map(|u| u.name)
                .collect()
        };
        assert_eq!(shown(&store), vec!["Amy", "Bob"]);

        store.add(mk_user(3, "Cid"));
        assert_eq!(store.users()[0].name, "Cid");
        assert_eq!(shown(&store), vec!["Amy", "Bob", "Cid"]);

        store.delete(2);
        assert_eq!(shown(&store), vec!["Bob", "Cid"]);
    }
}
