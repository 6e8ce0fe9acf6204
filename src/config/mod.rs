use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::submission::{formspree::DEFAULT_ENDPOINT_BASE, SubmissionConfig};

pub const HOME_ENV: &str = "QUOTE_WIZARD_HOME";
pub const FORM_ID_ENV: &str = "QUOTE_WIZARD_FORM_ID";
const DEFAULT_DIR_NAME: &str = "quote_wizard";
const CONFIG_FILE_NAME: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    pub endpoint_base: String,
    pub request_timeout_secs: u64,
    pub site_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            form_id: None,
            endpoint_base: DEFAULT_ENDPOINT_BASE.into(),
            request_timeout_secs: 10,
            site_name: "Proknacks".into(),
        }
    }
}

impl Config {
    /// Applies `QUOTE_WIZARD_FORM_ID` when it is set to a non-blank value.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_form_id_override(env::var(FORM_ID_ENV).ok());
        self
    }

    pub fn apply_form_id_override(&mut self, value: Option<String>) {
        if let Some(form_id) = value.filter(|form_id| !form_id.trim().is_empty()) {
            self.form_id = Some(form_id);
        }
    }

    pub fn submission_config(&self) -> SubmissionConfig {
        match &self.form_id {
            Some(form_id) => SubmissionConfig::new(form_id.as_str()),
            None => SubmissionConfig::unconfigured(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Loads and stores [`Config`] as JSON under the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `QUOTE_WIZARD_HOME` when set, the platform config directory
    /// otherwise.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(base_dir())
    }

    /// The directory is created on the first `save`, not here.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            path: base.join(CONFIG_FILE_NAME),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.submission_config().is_configured());
    }

    #[test]
    fn tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path(Path::new("/a/config.json")),
            PathBuf::from("/a/config.json.tmp")
        );
    }

    #[test]
    fn override_replaces_form_id() {
        let mut config = Config {
            form_id: Some("from-file".into()),
            ..Config::default()
        };
        config.apply_form_id_override(None);
        assert_eq!(config.form_id.as_deref(), Some("from-file"));
        config.apply_form_id_override(Some("".into()));
        assert_eq!(config.form_id.as_deref(), Some("from-file"));
        config.apply_form_id_override(Some("   ".into()));
        assert_eq!(config.form_id.as_deref(), Some("from-file"));
        config.apply_form_id_override(Some("from-env".into()));
        assert_eq!(config.submission_config().form_id(), Some("from-env"));
    }

    #[test]
    fn constructing_a_manager_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("never-created");
        let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
        assert!(!base.exists());
        assert_eq!(manager.load().unwrap(), Config::default());
        assert!(!base.exists());
    }

    #[test]
    fn timeout_is_never_zero() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
