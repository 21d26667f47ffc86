//! Client configuration parsed from `PUBLIC_*` environment values.
//!
//! SYSTEM CONTEXT
//! ==============
//! Native callers read the process environment at runtime
//! ([`ClientConfig::from_env`]); WASM builds bake values in at compile time
//! ([`ClientConfig::from_build_env`]). Both funnel through
//! [`ClientConfig::from_lookup`] so parsing is testable without touching the
//! real environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";
pub const DEFAULT_APP_NAME: &str = "SIA";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A value was present but could not be parsed.
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Auth service origin, without trailing slash.
    pub api_url: String,
    /// Path prefix joined between `api_url` and every endpoint.
    pub api_prefix: String,
    /// Where unauthenticated visitors are sent.
    pub login_path: String,
    /// Landing page after a successful login.
    pub dashboard_path: String,
    pub app_name: String,
    pub app_env: String,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_owned(),
            app_name: DEFAULT_APP_NAME.to_owned(),
            app_env: "development".to_owned(),
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PUBLIC_API_URL`: default `http://localhost:3000`
    /// - `PUBLIC_API_PREFIX`: default `/api/v1`
    /// - `PUBLIC_LOGIN_PATH`: default `/login`
    /// - `PUBLIC_DASHBOARD_PATH`: default `/dashboard`
    /// - `PUBLIC_APP_NAME`, `PUBLIC_APP_ENV`
    /// - `PUBLIC_ENABLE_DEBUG`: `true`/`false`
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean flag is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from values captured at compile time.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean flag is malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                "PUBLIC_API_URL" => option_env!("PUBLIC_API_URL"),
                "PUBLIC_API_PREFIX" => option_env!("PUBLIC_API_PREFIX"),
                "PUBLIC_LOGIN_PATH" => option_env!("PUBLIC_LOGIN_PATH"),
                "PUBLIC_DASHBOARD_PATH" => option_env!("PUBLIC_DASHBOARD_PATH"),
                "PUBLIC_APP_NAME" => option_env!("PUBLIC_APP_NAME"),
                "PUBLIC_APP_ENV" => option_env!("PUBLIC_APP_ENV"),
                "PUBLIC_ENABLE_DEBUG" => option_env!("PUBLIC_ENABLE_DEBUG"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean flag is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_url = get("PUBLIC_API_URL")
            .unwrap_or(defaults.api_url)
            .trim_end_matches('/')
            .to_owned();
        let api_prefix = get("PUBLIC_API_PREFIX").map_or(defaults.api_prefix, |p| normalize_prefix(&p));
        let login_path = get("PUBLIC_LOGIN_PATH").map_or(defaults.login_path, |p| normalize_path(&p));
        let dashboard_path = get("PUBLIC_DASHBOARD_PATH").map_or(defaults.dashboard_path, |p| normalize_path(&p));
        let app_name = get("PUBLIC_APP_NAME").unwrap_or(defaults.app_name);
        let app_env = get("PUBLIC_APP_ENV").unwrap_or(defaults.app_env);
        let debug = match get("PUBLIC_ENABLE_DEBUG") {
            Some(raw) => parse_flag("PUBLIC_ENABLE_DEBUG", &raw)?,
            None => defaults.debug,
        };

        Ok(Self { api_url, api_prefix, login_path, dashboard_path, app_name, app_env, debug })
    }

    /// Base URL every endpoint is appended to.
    pub fn api_base(&self) -> String {
        format!("{}{}", self.api_url, self.api_prefix.trim_end_matches('/'))
    }
}

/// Like [`normalize_path`], but a root prefix becomes empty so the base URL
/// never ends in `/`.
fn normalize_prefix(raw: &str) -> String {
    match normalize_path(raw).as_str() {
        "/" => String::new(),
        prefix => prefix.to_owned(),
    }
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: raw.to_owned() }),
    }
}
