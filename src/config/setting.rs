use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::config::utils::get_settings_path;

/// Current settings schema version. Bump when the on-disk shape
/// changes and add a branch to `migrate`.
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

// Global settings instance
pub static SETTINGS: Lazy<RwLock<Settings>> = Lazy::new(|| RwLock::new(Settings::default()));

/// Which AI backend satisfies generate/list-models requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Local,
    Hosted,
}

/// AI provider configuration.
///
/// `model` and `api_key` are independent of `kind`: switching backends
/// does not revalidate or reset a previously selected model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSetting {
    pub kind: ProviderKind,
    // Selected model identifier, if any
    pub model: Option<String>,
    // API key for the hosted backend
    pub api_key: Option<String>,
    // Base URL of the local inference daemon
    pub local_base_url: String,
    // Base URL of the hosted model catalog
    pub hosted_base_url: String,
}

impl Default for ProviderSetting {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Local,
            model: None,
            api_key: None,
            local_base_url: "http://localhost:11434".to_string(),
            hosted_base_url: "https://api.studio.nebius.com/v1".to_string(),
        }
    }
}

/// History storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSetting {
    // Hard cap on retained history items; oldest are evicted first
    pub max_history_items: usize,
}

impl Default for StorageSetting {
    fn default() -> Self {
        Self {
            max_history_items: 1000,
        }
    }
}

/// Main settings struct, persisted as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub schema_version: u32,
    // UI theme: "system", "light" or "dark"
    pub theme: String,
    pub provider: ProviderSetting,
    pub storage: StorageSetting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            theme: "system".to_string(),
            provider: ProviderSetting::default(),
            storage: StorageSetting::default(),
        }
    }
}

impl Settings {
    /// Get a clone of the current global settings.
    pub fn get_instance() -> Self {
        SETTINGS.read().unwrap().clone()
    }

    /// Load settings from disk.
    ///
    /// If a path is given it is used directly, otherwise the default
    /// config location applies. A missing file creates and saves the
    /// defaults; an older schema is migrated in place. Any other read
    /// failure propagates without touching the file, so a transient
    /// error never clobbers existing settings with defaults.
    pub fn load(settings_path: Option<PathBuf>) -> Result<Self> {
        let path = if let Some(path) = settings_path {
            path
        } else {
            get_settings_path()?
        };

        match fs::read_to_string(&path) {
            Ok(raw) => {
                let value: Value =
                    serde_json::from_str(&raw).with_context(|| "Failed to parse settings file")?;
                let settings = Self::migrate(value)?;

                SETTINGS.write().unwrap().clone_from(&settings);

                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let defaults = Settings::default();
                defaults.save(Some(path))?;
                Ok(defaults)
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read settings file: {:?}", path))
            }
        }
    }

    /// Save settings to disk and update the global instance.
    pub fn save(&self, settings_path: Option<PathBuf>) -> Result<()> {
        let path = if let Some(path) = settings_path {
            path
        } else {
            get_settings_path()?
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;

        SETTINGS.write().unwrap().clone_from(self);

        Ok(())
    }

    /// Migrate a raw settings document to the current schema.
    ///
    /// Version 0 is the legacy layout of independent top-level scalars
    /// (`aiProvider`, `selectedModel`, `apiKey`, `theme`) which are
    /// lifted into the structured form. Unknown future versions fail
    /// rather than guess.
    fn migrate(value: Value) -> Result<Self> {
        let version = value
            .get("schema_version")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;

        match version {
            0 => {
                let mut settings = Settings::default();
                if let Some(theme) = value.get("theme").and_then(Value::as_str) {
                    settings.theme = theme.to_string();
                }
                if let Some(provider) = value.get("aiProvider").and_then(Value::as_str) {
                    settings.provider.kind = match provider {
                        "hosted" => ProviderKind::Hosted,
                        _ => ProviderKind::Local,
                    };
                }
                if let Some(model) = value.get("selectedModel").and_then(Value::as_str) {
                    settings.provider.model = Some(model.to_string());
                }
                if let Some(key) = value.get("apiKey").and_then(Value::as_str) {
                    settings.provider.api_key = Some(key.to_string());
                }
                Ok(settings)
            }
            SETTINGS_SCHEMA_VERSION => {
                serde_json::from_value(value).with_context(|| "Failed to decode settings")
            }
            other => anyhow::bail!("Unsupported settings schema version: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, SETTINGS_SCHEMA_VERSION);
        assert_eq!(settings.theme, "system");
        assert_eq!(settings.provider.kind, ProviderKind::Local);
        assert_eq!(settings.provider.local_base_url, "http://localhost:11434");
        assert_eq!(settings.storage.max_history_items, 1000);
    }

    #[test]
    #[serial]
    fn test_settings_save_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.provider.model = Some("qwen2.5".to_string());
        settings.save(Some(path.clone()))?;

        let loaded = Settings::load(Some(path))?;
        assert_eq!(loaded.provider.model.as_deref(), Some("qwen2.5"));
        assert_eq!(loaded.theme, settings.theme);

        Ok(())
    }

    #[test]
    #[serial]
    fn test_migrate_legacy_scalars() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("settings.json");

        let legacy = serde_json::json!({
            "theme": "dark",
            "aiProvider": "hosted",
            "selectedModel": "meta-llama/Meta-Llama-3.1-8B-Instruct",
            "apiKey": "secret"
        });
        std::fs::write(&path, serde_json::to_string(&legacy)?)?;

        let loaded = Settings::load(Some(path))?;
        assert_eq!(loaded.schema_version, SETTINGS_SCHEMA_VERSION);
        assert_eq!(loaded.theme, "dark");
        assert_eq!(loaded.provider.kind, ProviderKind::Hosted);
        assert_eq!(
            loaded.provider.model.as_deref(),
            Some("meta-llama/Meta-Llama-3.1-8B-Instruct")
        );
        assert_eq!(loaded.provider.api_key.as_deref(), Some("secret"));

        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_missing_file_writes_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("nested").join("settings.json");

        let loaded = Settings::load(Some(path.clone()))?;
        assert_eq!(loaded.theme, "system");
        assert!(path.exists());

        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_read_failure_does_not_write_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        // A directory at the settings path makes read_to_string fail
        // with something other than NotFound.
        let path = temp_dir.path().join("settings.json");
        std::fs::create_dir(&path)?;

        assert!(Settings::load(Some(path.clone())).is_err());
        // The failing target was left alone, not replaced by defaults.
        assert!(path.is_dir());

        Ok(())
    }

    #[test]
    #[serial]
    fn test_unknown_future_version_is_rejected() {
        let value = serde_json::json!({ "schema_version": 99 });
        assert!(Settings::migrate(value).is_err());
    }
}
