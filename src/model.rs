//! Domain types for the user directory.
//!
//! The remote service sends more fields than we keep (`username`, `geo`,
//! `catchPhrase`, ...); serde ignores them on decode.

use serde::{Deserialize, Serialize};

/// Identifier of a user record. Unique within a [`crate::store::UserStore`].
pub type UserId = u64;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

impl Address {
    /// True when no address line carries any text (local inserts).
    pub fn is_empty(&self) -> bool {
        self.street.is_empty() && self.city.is_empty() && self.zipcode.is_empty()
    }

    /// "city, zipcode", skipping whichever part is missing.
    pub fn locality(&self) -> String {
        match (self.city.is_empty(), self.zipcode.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.zipcode),
            (false, true) => self.city.clone(),
            (true, false) => self.zipcode.clone(),
            (true, true) => String::new(),
        }
    }
}

/// A single directory entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
}

impl User {
    /// Upper-cased first letter of the name, used as the avatar.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}
