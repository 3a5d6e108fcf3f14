//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::fetch::DEFAULT_BASE_URL;
use crate::model::UserId;

#[derive(Parser, Debug, Clone)]
#[command(name = "userdir-tui", version, about = "Browse, search and edit a remote user directory")]
pub struct Config {
    /// Base URL of the user service (`{base}/users`, `{base}/users/{id}`).
    #[arg(long, env = "USERDIR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Open the detail page of this user id at startup.
    #[arg(long, value_name = "ID")]
    pub user: Option<UserId>,

    /// Theme file; created with defaults when missing.
    #[arg(long, value_name = "PATH", default_value = "theme.conf")]
    pub theme: PathBuf,

    /// Keybindings file; created with defaults when missing.
    #[arg(long, value_name = "PATH", default_value = "keybinds.conf")]
    pub keybinds: PathBuf,

    /// Write logs to this file. Logging is off without it.
    #[arg(long, env = "USERDIR_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
