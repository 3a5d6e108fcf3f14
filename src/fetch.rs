//! Remote user source.
//!
//! [`HttpUserSource`] talks to a JSONPlaceholder-style service:
//! `GET {base}/users` and `GET {base}/users/{id}`. Fetches run on a worker
//! thread and report back over a channel as [`FetchEvent`]s; the UI thread
//! is the only one that touches the store.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{User, UserId};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Where user records come from.
pub trait UserSource: Send + Sync {
    fn fetch_users(&self) -> Result<Vec<User>, FetchError>;

    /// `Ok(None)` when the service says the user does not exist.
    fn fetch_user(&self, id: UserId) -> Result<Option<User>, FetchError>;
}

pub struct HttpUserSource {
    http: Client,
    base_url: String,
}

impl HttpUserSource {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(FetchError::InvalidUrl("URL cannot be empty".into()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FetchError::InvalidUrl(format!(
                "{base_url}: must start with http:// or https://"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("userdir-tui/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_text(&self, url: &str) -> Result<(StatusCode, String), FetchError> {
        debug!(url, "GET");
        let response = self.http.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        Ok((status, body))
    }
}

impl UserSource for HttpUserSource {
    fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let url = format!("{}/users", self.base_url);
        let (status, body) = self.get_text(&url)?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let users: Vec<User> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        info!(count = users.len(), "fetched user list");
        Ok(users)
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<User>, FetchError> {
        let url = format!("{}/users/{}", self.base_url, id);
        let (status, body) = self.get_text(&url)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        // JSONPlaceholder answers unknown ids with `{}` on some routes.
        if value.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }
        let user: User =
            serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Some(user))
    }
}

/// Result of a background fetch, delivered to the event loop.
#[derive(Debug)]
pub enum FetchEvent {
    Users(Result<Vec<User>, FetchError>),
    User {
        id: UserId,
        result: Result<Option<User>, FetchError>,
    },
}

pub fn spawn_list_fetch(source: Arc<dyn UserSource>, tx: Sender<FetchEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = source.fetch_users();
        // Receiver gone means the app already exited.
        let _ = tx.send(FetchEvent::Users(result));
    })
}

pub fn spawn_user_fetch(
    source: Arc<dyn UserSource>,
    id: UserId,
    tx: Sender<FetchEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = source.fetch_user(id);
        let _ = tx.send(FetchEvent::User { id, result });
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(HttpUserSource::new(""), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(
            HttpUserSource::new("ftp://example.com"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn trims_trailing_slashes() {
        let src = HttpUserSource::new("http://localhost:8080//").unwrap();
        assert_eq!(src.base_url(), "http://localhost:8080");
    }
}
