//! Config file parsing for `~/.config/bookmeta/config.toml`.

use serde::{Deserialize, Serialize};

/// Vault-relative locations the batch driver works with.
///
/// Empty strings mean "not configured": the driver rejects an empty
/// input folder, while empty output locations fall back to the vault
/// root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub input_folder: String,
    #[serde(default)]
    pub metadata_folder: String,
    #[serde(default)]
    pub template_path: String,
    #[serde(default)]
    pub output_folder: String,
}

/// Load settings from the default path (`~/.config/bookmeta/config.toml`).
/// A missing or malformed file silently yields defaults.
pub fn load_config() -> Settings {
    let config_path = match config_path() {
        Some(p) => p,
        None => return Settings::default(),
    };

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(_) => return Settings::default(),
    };

    match toml::from_str::<Settings>(&content) {
        Ok(cfg) => cfg,
        Err(_) => Settings::default(),
    }
}

/// Return the default config file path (for init and show).
pub fn config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("bookmeta");
        p.push("config.toml");
        p
    })
}
