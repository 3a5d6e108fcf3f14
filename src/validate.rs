//! Form validation for user records.
//!
//! The predicates are shape checks only; they are not RFC validators.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{Address, Company, User, UserId};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(www\.)?[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.[a-zA-Z]{2,}$")
        .expect("Invalid regex")
});

const NEW_USER_COMPANY: &str = "Local Company";
const EDITED_USER_COMPANY: &str = "Company";

pub fn is_non_empty(s: &str) -> bool {
    !s.trim().is_empty()
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Website is optional, so the empty string passes.
pub fn is_valid_website(s: &str) -> bool {
    s.is_empty() || WEBSITE_RE.is_match(s)
}

/// Why a form submission was rejected. The display text is shown to the operator as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name and Email are required fields.")]
    MissingRequired,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid website (e.g., example.com, site.net, etc.)")]
    InvalidWebsite,
}

/// In-progress contents of the add/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub website: String,
}

impl UserDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            company: user.company.name.clone(),
            phone: user.phone.clone(),
            website: user.website.clone(),
        }
    }

    /// Check the draft without consuming it so a rejected form keeps its input.
    /// Email and website are checked as they will be stored, with outer
    /// whitespace trimmed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_non_empty(&self.name) || !is_non_empty(&self.email) {
            return Err(ValidationError::MissingRequired);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_valid_website(self.website.trim()) {
            return Err(ValidationError::InvalidWebsite);
        }
        Ok(())
    }

    /// Build a fresh record for a local insert.
    pub fn into_new_user(&self, id: UserId) -> Result<User, ValidationError> {
        self.validate()?;
        Ok(User {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: Company {
                name: or_default(&self.company, NEW_USER_COMPANY),
            },
            address: Address::default(),
            phone: self.phone.trim().to_string(),
            website: self.website.trim().to_string(),
        })
    }

    /// Build the edited version of `existing`; id and address are carried over.
    pub fn apply_to(&self, existing: &User) -> Result<User, ValidationError> {
        self.validate()?;
        Ok(User {
            id: existing.id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: Company {
                name: or_default(&self.company, EDITED_USER_COMPANY),
            },
            address: existing.address.clone(),
            phone: self.phone.trim().to_string(),
            website: self.website.trim().to_string(),
        })
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    let t = value.trim();
    if t.is_empty() { fallback.to_string() } else { t.to_string() }
}
