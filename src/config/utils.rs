use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Whether we are running in a development build.
///
/// Checks the CLIPSAGE_ENV environment variable first, then falls back
/// to the compile-time debug_assertions flag.
pub fn is_development() -> bool {
    if let Ok(env_val) = env::var("CLIPSAGE_ENV") {
        return env_val == "development";
    }
    cfg!(debug_assertions)
}

/// Get the configuration directory.
///
/// Development and production builds use separate directories so state
/// never mixes between them.
pub fn get_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

    let config_dir = if is_development() {
        base_dir.join("clipsage-dev")
    } else {
        base_dir.join("clipsage")
    };

    Ok(config_dir)
}

/// Get the data directory used by the persistent store.
///
/// The CLIPSAGE_DATA_DIR environment variable overrides the default.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var("CLIPSAGE_DATA_DIR") {
        return Ok(PathBuf::from(path));
    }
    Ok(get_config_dir()?.join("data"))
}

/// Get the settings file path.
///
/// The CLIPSAGE_SETTINGS_PATH environment variable overrides the
/// default location under the config directory.
pub fn get_settings_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("CLIPSAGE_SETTINGS_PATH") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("settings.json"))
}
