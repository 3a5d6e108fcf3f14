//! Query pipeline: filter the store by free text, then sort for display.
//!
//! The display list is always rebuilt from the full store collection, so
//! widening the query brings back every record it hid.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::app::AppState;
use crate::model::User;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// How the filtered list is ordered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortSpec {
    /// Keep store order.
    None,
    By { field: SortField, order: SortOrder },
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::By {
            field: SortField::Name,
            order: SortOrder::Ascending,
        }
    }
}

impl SortSpec {
    /// none -> name -> id -> none. A newly chosen field starts ascending.
    pub fn cycle_field(self) -> Self {
        match self {
            SortSpec::None => SortSpec::By {
                field: SortField::Name,
                order: SortOrder::Ascending,
            },
            SortSpec::By {
                field: SortField::Name,
                ..
            } => SortSpec::By {
                field: SortField::Id,
                order: SortOrder::Ascending,
            },
            SortSpec::By {
                field: SortField::Id,
                ..
            } => SortSpec::None,
        }
    }

    pub fn toggle_order(self) -> Self {
        match self {
            SortSpec::None => SortSpec::None,
            SortSpec::By { field, order } => SortSpec::By {
                field,
                order: order.flipped(),
            },
        }
    }

    /// Short label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            SortSpec::None => "none",
            SortSpec::By {
                field: SortField::Name,
                order: SortOrder::Ascending,
            } => "A-Z",
            SortSpec::By {
                field: SortField::Name,
                order: SortOrder::Descending,
            } => "Z-A",
            SortSpec::By {
                field: SortField::Id,
                order: SortOrder::Ascending,
            } => "id ↑",
            SortSpec::By {
                field: SortField::Id,
                order: SortOrder::Descending,
            } => "id ↓",
        }
    }
}

/// Case-insensitive substring match on name or email.
pub fn matches_query(user: &User, query_lower: &str) -> bool {
    query_lower.is_empty()
        || user.name.to_lowercase().contains(query_lower)
        || user.email.to_lowercase().contains(query_lower)
}

/// Base letters only: decomposed, accents dropped, lower case.
fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Name collation in three levels: base letters, then accents, then case
/// (lower case first). "Émile" sorts with the E names, after "Emile".
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| {
            let fold = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<String>();
            fold(a).cmp(&fold(b))
        })
        .then_with(|| b.cmp(a))
}

/// Build the display sequence. `users` is never modified.
pub fn derive_view(users: &[User], query: &str, sort: SortSpec) -> Vec<User> {
    let q = query.to_lowercase();
    let mut out: Vec<User> = users.iter().filter(|u| matches_query(u, &q)).cloned().collect();

    if let SortSpec::By { field, order } = sort {
        // `sort_by` is stable, so equal keys keep their filtered order.
        out.sort_by(|a, b| {
            let ord = match field {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => compare_names(&a.name, &b.name),
            };
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }
    out
}

/// Recompute `app.users` from the store, query and sort, keeping the selection in range.
pub fn apply_search(app: &mut AppState) {
    app.users = derive_view(app.store.users(), &app.search_query, app.sort);
    app.selected_user_index = app.selected_user_index.min(app.users.len().saturating_sub(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_user(id: u64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    fn sample() -> Vec<User> {
        vec![
            mk_user(10, "Bob", "bob@work.io"),
            mk_user(2, "amy", "amy@home.net"),
            mk_user(1, "Cid", "cid@work.io"),
        ]
    }

    #[test]
    fn filter_on_name_or_email_case_insensitive() {
        let v = derive_view(&sample(), "WORK", SortSpec::None);
        assert_eq!(names(&v), vec!["Bob", "Cid"]);
        let v = derive_view(&sample(), "AmY", SortSpec::None);
        assert_eq!(names(&v), vec!["amy"]);
        let v = derive_view(&sample(), "cid@work.io", SortSpec::None);
        assert_eq!(names(&v), vec!["Cid"]);
        assert!(derive_view(&sample(), "zzz", SortSpec::None).is_empty());
    }

    #[test]
    fn special_characters_are_literal() {
        assert!(derive_view(&sample(), "[", SortSpec::None).is_empty());
        assert_eq!(derive_view(&sample(), "@", SortSpec::None).len(), 3);
    }

    #[test]
    fn none_sort_preserves_store_order() {
        let v = derive_view(&sample(), "", SortSpec::None);
        assert_eq!(names(&v), vec!["Bob", "amy", "Cid"]);
    }

    #[test]
    fn id_sort_is_numeric() {
        let spec = SortSpec::By {
            field: SortField::Id,
            order: SortOrder::Ascending,
        };
        let v = derive_view(&sample(), "", spec);
        assert_eq!(v.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 10]);
    }

    #[test]
    fn name_sort_ignores_case_and_reverses() {
        let asc = derive_view(&sample(), "", SortSpec::default());
        assert_eq!(names(&asc), vec!["amy", "Bob", "Cid"]);
        let desc = derive_view(&sample(), "", SortSpec::default().toggle_order());
        let mut rev = names(&asc);
        rev.reverse();
        assert_eq!(names(&desc), rev);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let users = vec![
            mk_user(1, "Zoe", "z@x.io"),
            mk_user(2, "Émile", "e@x.io"),
            mk_user(3, "Adam", "a@x.io"),
            mk_user(4, "Ångström", "o@x.io"),
            mk_user(5, "Emile", "e2@x.io"),
        ];
        let v = derive_view(&users, "", SortSpec::default());
        assert_eq!(names(&v), vec!["Adam", "Ångström", "Emile", "Émile", "Zoe"]);
        assert_eq!(compare_names("émile", "Émile"), Ordering::Less);
    }

    #[test]
    fn ties_keep_filtered_order_in_both_directions() {
        let users = vec![
            mk_user(1, "Sam", "first@x.io"),
            mk_user(2, "Ann", "ann@x.io"),
            mk_user(3, "Sam", "second@x.io"),
        ];
        let asc = derive_view(&users, "", SortSpec::default());
        assert_eq!(asc.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 1, 3]);
        let desc = derive_view(&users, "", SortSpec::default().toggle_order());
        assert_eq!(desc.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    fn sort_spec_cycles() {
        let s = SortSpec::None.cycle_field();
        assert_eq!(s.label(), "A-Z");
        let s = s.cycle_field();
        assert_eq!(s.label(), "id ↑");
        assert_eq!(s.toggle_order().label(), "id ↓");
        assert_eq!(s.cycle_field(), SortSpec::None);
        assert_eq!(SortSpec::None.toggle_order(), SortSpec::None);
    }

    #[test]
    fn apply_search_clamps_selection() {
        let mut app = AppState::with_store(crate::store::UserStore::with_users(sample()));
        app.selected_user_index = 2;
        app.search_query = "amy".into();
        apply_search(&mut app);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.selected_user_index, 0);
    }
}
