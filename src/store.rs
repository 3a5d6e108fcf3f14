//! In-memory user collection.
//!
//! [`UserStore`] is the single source of truth for every view. It is only
//! changed through the methods below; callers hold it by reference inside
//! [`crate::app::AppState`] and never keep a copy of the list.

use tracing::debug;

use crate::model::{User, UserId};

/// Outcome of a store mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// No record with that id; nothing changed.
    NotFound,
    /// An insert reused an id already in the store; nothing changed.
    DuplicateId,
}

#[derive(Clone, Debug)]
pub struct UserStore {
    users: Vec<User>,
    loading: bool,
    next_id: UserId,
}

impl UserStore {
    /// Empty store in the loading state, waiting for the first fetch.
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            loading: true,
            next_id: 1,
        }
    }

    /// Store pre-filled with `users` and not loading. Mostly for tests.
    pub fn with_users(users: Vec<User>) -> Self {
        let mut store = Self::new();
        store.set_all(users);
        store
    }

    /// Replace the whole collection with what the remote source returned.
    pub fn set_all(&mut self, users: Vec<User>) {
        debug!(count = users.len(), "store: set_all");
        for u in &users {
            self.observe_id(u.id);
        }
        self.users = users;
        self.loading = false;
    }

    /// Insert at the front.
    pub fn add(&mut self, user: User) -> Mutation {
        if self.users.iter().any(|u| u.id == user.id) {
            debug!(id = user.id, "store: add rejected, duplicate id");
            return Mutation::DuplicateId;
        }
        debug!(id = user.id, "store: add");
        self.observe_id(user.id);
        self.users.insert(0, user);
        Mutation::Applied
    }

    /// Replace the record with the same id, keeping its position.
    pub fn update(&mut self, user: User) -> Mutation {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                debug!(id = user.id, "store: update");
                *slot = user;
                Mutation::Applied
            }
            None => {
                debug!(id = user.id, "store: update ignored, id not found");
                Mutation::NotFound
            }
        }
    }

    pub fn delete(&mut self, id: UserId) -> Mutation {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        if self.users.len() == before {
            debug!(id, "store: delete ignored, id not found");
            Mutation::NotFound
        } else {
            debug!(id, "store: delete");
            Mutation::Applied
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Allocate an id for a local insert.
    ///
    /// Always above every id this store has held and every id handed out before.
    pub fn next_id(&mut self) -> UserId {
        let id = self.next_id;
        self.next_id = id.saturating_add(1);
        id
    }

    fn observe_id(&mut self, id: UserId) {
        if id >= self.next_id {
            self.next_id = id.saturating_add(1);
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
