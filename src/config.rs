use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sheets: SheetsConfig,
    pub github: GithubConfig,
    pub backup: BackupConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Name of the database holding the People, Questions and Interactions
    /// collections.
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth access token presented as a bearer token to the sheet API.
    pub token: String,
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
    /// Upper bound on any single mirror attempt, so a slow sheet service
    /// cannot stall a request past the durable write.
    #[serde(default = "default_sheets_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_github_token_url")]
    pub token_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BackupConfig {
    pub form_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file path. When absent, logs go to the console only.
    pub path: Option<String>,
    /// Maximum size of a single log file in megabytes before rolling.
    #[serde(default = "default_log_size")]
    pub size: u64,
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_sheets_timeout() -> u64 {
    10
}

fn default_github_token_url() -> String {
    "https://github.com/login/oauth/access_token".to_string()
}

fn default_log_size() -> u64 {
    10
}

fn default_log_max_files() -> usize {
    5
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read configuration file: {}", path))?;
    let config: Config = toml::from_str(&config_text)
        .with_context(|| format!("Failed to parse configuration file: {}", path))?;
    Ok(config)
}
