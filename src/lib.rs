//! Library crate for userdir-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state and update loop (`app`)
//! - Command-line configuration (`config`)
//! - Error and result types (`error`)
//! - Remote user source (`fetch`)
//! - Domain types (`model`)
//! - Query pipeline: filter and sort (`search`)
//! - In-memory user store (`store`)
//! - UI rendering and widgets (`ui`)
//! - Form validation (`validate`)
//!
//! It is used by the `userdir-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod search;
pub mod store;
pub mod ui;
pub mod validate;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
pub use model::{User, UserId};
pub use store::{Mutation, UserStore};
