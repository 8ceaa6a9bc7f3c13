//! Configuration management for sitenav.
//!
//! Parses `sitenav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `urls.servlet`
//! - `urls.vanity_prefix`
//! - `urls.dispatcher`
//! - `store.plan`

mod expand;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "sitenav.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site plan path.
    pub plan: Option<PathBuf>,
    /// Override traversal depth.
    pub max_depth: Option<i32>,
    /// Override preview date.
    pub effective_date: Option<NaiveDateTime>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tree building configuration.
    pub navigation: NavigationConfig,
    /// URL assembly configuration.
    pub urls: UrlsConfig,
    /// Site plan location (path is a relative string from TOML).
    store: StoreConfigRaw,

    /// Resolved site plan path (set after loading).
    #[serde(skip)]
    pub plan_path: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Tree building configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Attribute holding the display label.
    pub link_label_attribute: String,
    /// Attribute holding the vanity path.
    pub path_attribute: String,
    /// Deepest level to expand; negative means unbounded.
    pub max_depth: i32,
    /// Preview date for start/end date filtering.
    #[serde(deserialize_with = "deserialize_date")]
    pub effective_date: Option<NaiveDateTime>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            link_label_attribute: "linktext".to_owned(),
            path_attribute: "path".to_owned(),
            max_depth: -1,
            effective_date: None,
        }
    }
}

/// URL assembly configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    /// Servlet path for default URLs.
    pub servlet: String,
    /// Prefix prepended to vanity paths.
    pub vanity_prefix: String,
    /// Wrapper page name; when unset the site plan property is used.
    pub dispatcher: Option<String>,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            servlet: "/cs/ContentServer".to_owned(),
            vanity_prefix: String::new(),
            dispatcher: None,
        }
    }
}

/// Raw store configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StoreConfigRaw {
    plan: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`store.plan`").
        field: String,
        /// Error message (e.g., "${`SITE_PLAN`} not set").
        message: String,
    },
}

/// Parse a date in the content repository's timestamp form.
///
/// Accepts what [`sitenav_store::parse_jdbc_date`] accepts.
///
/// # Errors
///
/// Returns `ConfigError::Validation` naming the accepted format.
pub fn parse_date(value: &str) -> Result<NaiveDateTime, ConfigError> {
    sitenav_store::parse_jdbc_date(value).ok_or_else(|| {
        ConfigError::Validation(format!(
            "invalid date '{}', expected YYYY-MM-DD HH:MM:SS",
            value.trim()
        ))
    })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Require a string field to contain something besides whitespace.
fn require_non_blank(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be blank")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sitenav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(plan) = &settings.plan {
            self.plan_path.clone_from(plan);
        }
        if let Some(max_depth) = settings.max_depth {
            self.navigation.max_depth = max_depth;
        }
        if let Some(date) = settings.effective_date {
            self.navigation.effective_date = Some(date);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            plan_path: base.join("siteplan.yaml"),
            ..Self::default()
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_blank(
            &self.navigation.link_label_attribute,
            "navigation.link_label_attribute",
        )?;
        require_non_blank(&self.navigation.path_attribute, "navigation.path_attribute")?;
        require_non_blank(&self.urls.servlet, "urls.servlet")?;
        if let Some(dispatcher) = &self.urls.dispatcher {
            require_non_blank(dispatcher, "urls.dispatcher")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.urls.servlet = expand::expand_env(&self.urls.servlet, "urls.servlet")?;
        self.urls.vanity_prefix =
            expand::expand_env(&self.urls.vanity_prefix, "urls.vanity_prefix")?;
        expand::expand_opt(&mut self.urls.dispatcher, "urls.dispatcher")?;
        expand::expand_opt(&mut self.store.plan, "store.plan")?;
        Ok(())
    }

    /// Resolve the plan path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.plan_path = config_dir.join(self.store.plan.as_deref().unwrap_or("siteplan.yaml"));
    }
}
