use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const SETTINGS_FILE_NAME: &str = "focusflow.toml";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid api_base_url '{url}': {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },
    #[error("no API key configured; set GEMINI_API_KEY or api_key in focusflow.toml")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, SettingsError> {
        toml::from_str(raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Later names win, so `APP__*` overrides the bare variable names.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        for name in ["GEMINI_API_KEY", "API_KEY", "APP__API_KEY"] {
            if let Some(v) = non_empty(name) {
                self.api_key = Some(v);
            }
        }
        if let Some(v) = non_empty("APP__MODEL") {
            self.model = v;
        }
        if let Some(v) = non_empty("APP__API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = non_empty("APP__REQUEST_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = Some(parsed),
                Err(err) => {
                    warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS: {err}")
                }
            }
        }
    }

    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_base_url.trim().trim_end_matches('/');
        Url::parse(raw).map_err(|source| SettingsError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            source,
        })
    }

    pub fn api_key(&self) -> Result<&str, SettingsError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingApiKey)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Explicit path, then `./focusflow.toml`, then the per-user config directory.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("focusflow").join(SETTINGS_FILE_NAME))
        .filter(|path| path.is_file())
}

pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = match resolve_settings_path(explicit) {
        Some(path) => {
            let raw = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "loaded settings file");
            Settings::from_toml_str(&raw, &path)?
        }
        None => Settings::default(),
    };

    settings.apply_env_overrides(|name| std::env::var(name).ok());
    settings.base_url()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_target_public_endpoint() {
        let settings = Settings::default();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(
            settings.base_url().expect("url").as_str(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert!(matches!(settings.api_key(), Err(SettingsError::MissingApiKey)));
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn toml_fields_override_defaults() {
        let settings = Settings::from_toml_str(
            "api_key = \"file-key\"\nmodel = \"gemini-test\"\nrequest_timeout_secs = 30\n",
            Path::new("focusflow.toml"),
        )
        .expect("parse");
        assert_eq!(settings.api_key().expect("key"), "file-key");
        assert_eq!(settings.model, "gemini-test");
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn env_overrides_prefer_app_prefixed_names() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(lookup(&[
            ("GEMINI_API_KEY", "plain"),
            ("APP__API_KEY", "prefixed"),
            ("APP__MODEL", "gemini-env"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]));
        assert_eq!(settings.api_key.as_deref(), Some("prefixed"));
        assert_eq!(settings.model, "gemini-env");
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut settings = Settings {
            api_key: Some("kept".into()),
            ..Settings::default()
        };
        settings.apply_env_overrides(lookup(&[("GEMINI_API_KEY", "  ")]));
        assert_eq!(settings.api_key.as_deref(), Some("kept"));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let settings = Settings {
            api_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn malformed_file_reports_path() {
        let err = Settings::from_toml_str("model = [", Path::new("broken.toml"))
            .expect_err("parse should fail");
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn explicit_missing_file_is_a_read_error() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("focusflow_missing_{suffix}.toml"));
        assert!(matches!(
            load_settings(Some(&path)),
            Err(SettingsError::Read { .. })
        ));
    }
}
