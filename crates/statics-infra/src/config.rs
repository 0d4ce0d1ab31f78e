//! Per-save configuration loader.
//!
//! Reads `statics.toml` from the save's `KerbalStatics` folder and
//! deserializes it into [`StaticsConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use statics_types::config::StaticsConfig;

/// Load configuration from `{statics_dir}/statics.toml`.
///
/// - If the file does not exist, returns [`StaticsConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Fields missing from the file take their defaults.
pub async fn load_statics_config(statics_dir: &Path) -> StaticsConfig {
    let config_path = statics_dir.join(statics_core::service::persistence::CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No statics.toml found at {}, using defaults", config_path.display());
            return StaticsConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return StaticsConfig::default();
        }
    };

    match toml::from_str::<StaticsConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            StaticsConfig::default()
        }
    }
}
