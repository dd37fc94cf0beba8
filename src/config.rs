//! Configuration loading and management
//!
//! Handles parsing of `taskgrid.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "taskgrid.toml";

/// File name used for the stored token when `auth.token_path` is not set.
pub const TOKEN_FILE_NAME: &str = "taskgrid-token.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet document id (the long id in the sheet URL)
    #[serde(default)]
    pub spreadsheet_id: String,

    /// API endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Sheet (tab) names and ids inside the document
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Auth/session configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the Sheets values/batchUpdate endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth2 userinfo endpoint used by `login` to resolve the profile
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,

    /// OAuth2 revocation endpoint used by `logout`
    #[serde(default = "default_revoke_url")]
    pub revoke_url: String,
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

fn default_userinfo_url() -> String {
    "https://www.googleapis.com/oauth2/v2/userinfo".to_string()
}

fn default_revoke_url() -> String {
    "https://oauth2.googleapis.com/revoke".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            userinfo_url: default_userinfo_url(),
            revoke_url: default_revoke_url(),
        }
    }
}

/// Sheet (tab) layout inside the spreadsheet document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Tasks sheet name (11 columns, A:K)
    #[serde(default = "default_tasks_sheet")]
    pub tasks: String,

    /// Numeric sheet id of the tasks sheet, used for structural row deletion
    #[serde(default)]
    pub tasks_sheet_id: i64,

    /// Users master sheet name (3 columns, A:C)
    #[serde(default = "default_users_sheet")]
    pub users: String,

    /// Categories master sheet name (1 column, A:A)
    #[serde(default = "default_categories_sheet")]
    pub categories: String,
}

fn default_tasks_sheet() -> String {
    "タスク".to_string()
}

fn default_users_sheet() -> String {
    "ユーザーマスタ".to_string()
}

fn default_categories_sheet() -> String {
    "カテゴリマスタ".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks_sheet(),
            tasks_sheet_id: 0,
            users: default_users_sheet(),
            categories: default_categories_sheet(),
        }
    }
}

/// Auth/session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where the signed-in token is stored; defaults to a file next to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a `taskgrid.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a path, or return defaults when the file is
    /// absent. A present-but-broken file is an error, not a silent default.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The spreadsheet id, or a user error pointing at `init`
    pub fn require_spreadsheet_id(&self) -> Result<&str> {
        let id = self.spreadsheet_id.trim();
        if id.is_empty() {
            return Err(Error::InvalidConfig(
                "spreadsheet_id is not set".to_string(),
            ));
        }
        Ok(id)
    }

    /// Token storage path: the configured override, or a sibling of the config file
    pub fn token_path(&self, config_path: &Path) -> PathBuf {
        match &self.auth.token_path {
            Some(path) => path.clone(),
            None => match config_path.parent() {
                Some(parent) => parent.join(TOKEN_FILE_NAME),
                None => PathBuf::from(TOKEN_FILE_NAME),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        validate_url(&self.api.base_url, "api.base_url")?;
        validate_url(&self.api.userinfo_url, "api.userinfo_url")?;
        validate_url(&self.api.revoke_url, "api.revoke_url")?;
        validate_sheet_name(&self.sheets.tasks, "sheets.tasks")?;
        validate_sheet_name(&self.sheets.users, "sheets.users")?;
        validate_sheet_name(&self.sheets.categories, "sheets.categories")?;
        if self.sheets.tasks_sheet_id < 0 {
            return Err(Error::InvalidConfig(
                "sheets.tasks_sheet_id must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_sheet_name(name: &str, field: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidConfig(format!(
            "{field}: sheet name cannot be empty"
        )));
    }
    Ok(())
}

fn validate_url(url: &str, field: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig(format!(
            "{field}: URL cannot be empty"
        )));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::InvalidConfig(format!(
            "{field}: URL must start with http:// or https://"
        )));
    }
    Ok(())
}
