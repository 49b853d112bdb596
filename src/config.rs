use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_HOST: &str = "https://dev.azure.com";
const DEFAULT_BIND: &str = "0.0.0.0:7071";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub azure_devops: Option<AzureDevOpsConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AzureDevOpsConfig {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub personal_access_token: String,
    /// Replaces `https://dev.azure.com/<organization>`, e.g. for an on-prem server.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl AppConfig {
    /// Provider settings, rejected when the organization or token is blank.
    pub fn azure_devops(&self) -> Result<&AzureDevOpsConfig> {
        let Some(cfg) = &self.azure_devops else {
            bail!(
                "Azure DevOps is not configured. Set Organization and PersonalAccessToken or add [azure_devops] to {}",
                config_path().display()
            );
        };
        if cfg.organization.trim().is_empty() {
            bail!("Azure DevOps organization must not be empty");
        }
        if cfg.personal_access_token.trim().is_empty() {
            bail!("Azure DevOps personal access token must not be empty");
        }
        Ok(cfg)
    }

    pub fn bind(&self) -> String {
        self.server
            .as_ref()
            .map(|s| s.bind.clone())
            .unwrap_or_else(default_bind)
    }
}

impl AzureDevOpsConfig {
    pub fn base_url(&self) -> Result<String> {
        match &self.base_url {
            Some(endpoint) => normalize_base_url(endpoint),
            None => Ok(format!("{DEFAULT_HOST}/{}", self.organization.trim())),
        }
    }
}

fn normalize_base_url(endpoint: &str) -> Result<String> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        bail!("base_url must not be empty");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kanban-done")
        .join("config.toml")
}

/// Reads the config file, then lets the process environment override it.
pub fn load_config() -> Result<AppConfig> {
    let mut config = load_config_from(&config_path())?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(org) = var("Organization") {
        config
            .azure_devops
            .get_or_insert_with(AzureDevOpsConfig::default)
            .organization = org;
    }
    if let Some(token) = var("PersonalAccessToken") {
        config
            .azure_devops
            .get_or_insert_with(AzureDevOpsConfig::default)
            .personal_access_token = token;
    }
    if let Some(url) = var("AZURE_DEVOPS_BASE_URL") {
        config
            .azure_devops
            .get_or_insert_with(AzureDevOpsConfig::default)
            .base_url = Some(url);
    }
    if let Some(bind) = var("KANBAN_DONE_BIND") {
        config.server = Some(ServerConfig { bind });
    }
}
