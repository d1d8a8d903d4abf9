//! Configuration and settings management
//!
//! Loads settings from environment variables (optionally via `.env` and
//! `config/` files) and exposes the allow-lists and the upload size cap.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default per-file upload cap in MiB when `MAX_FILE_SIZE_MB` is unset.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Comma-separated list of allowed Telegram usernames
    #[serde(rename = "allowed_usernames")]
    pub allowed_usernames_str: Option<String>,

    /// Comma-separated list of allowed numeric user/chat IDs
    #[serde(rename = "allowed_chat_ids")]
    pub allowed_chat_ids_str: Option<String>,

    /// Per-file upload size cap in MiB
    #[serde(rename = "max_file_size_mb")]
    pub max_file_size_mb_str: Option<String>,
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails, in particular when the
    /// required `TELEGRAM_TOKEN` is absent.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add in a local configuration file
            // This file shouldn't be checked into git
            .add_source(File::with_name("config/local").required(false))
            // Settings from environment variables directly.
            // Environment::default() auto-converts UPPER_SNAKE_CASE to
            // snake_case; ignore_empty treats empty env vars as unset.
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }

    /// Returns the set of usernames that are allowed to use the bot
    #[must_use]
    pub fn allowed_usernames(&self) -> HashSet<String> {
        self.allowed_usernames_str
            .as_ref()
            .map(|s| {
                s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the set of numeric Telegram IDs that are allowed to use the bot
    #[must_use]
    pub fn allowed_chat_ids(&self) -> HashSet<i64> {
        self.allowed_chat_ids_str
            .as_ref()
            .map(|s| {
                s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .filter_map(|id| id.parse::<i64>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the given identity may use the bot.
    ///
    /// True iff the username is in the username allow-list or the numeric id
    /// is in the id allow-list. An absent identity is never allowed.
    #[must_use]
    pub fn is_allowed(&self, username: Option<&str>, user_id: Option<i64>) -> bool {
        if username.is_some_and(|u| self.allowed_usernames().contains(u)) {
            return true;
        }
        user_id.is_some_and(|id| self.allowed_chat_ids().contains(&id))
    }

    /// Per-file upload size cap in MiB
    #[must_use]
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_mb_str
            .as_ref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB)
    }

    /// Per-file upload size cap in bytes
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb().saturating_mul(1024 * 1024)
    }
}
