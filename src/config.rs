use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::error::{BilledError, Result};

pub const DEFAULT_DATA_ROOT: &str = "~/Documents/Billed";
pub const DEFAULT_ATTACHMENT_BASE_URL: &str = "https://images.com";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub data_root: String,
    #[serde(default = "default_attachment_base_url")]
    pub attachment_base_url: String,
}

fn default_attachment_base_url() -> String {
    DEFAULT_ATTACHMENT_BASE_URL.to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
            attachment_base_url: default_attachment_base_url(),
        }
    }
}

impl AppSettings {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }

    pub fn bills_path(&self) -> PathBuf {
        self.root().join("data").join("bills.json")
    }

    pub fn session_path(&self) -> PathBuf {
        self.root().join("session.json")
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "billed", "app") {
        return proj_dirs.config_dir().join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

/// `Ok(None)` when no settings file exists yet.
pub fn load_settings_from(path: &Path) -> Result<Option<AppSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| BilledError::Config(format!("{}: {}", path.display(), e)))
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let toml_str =
        toml::to_string_pretty(settings).map_err(|e| BilledError::Config(e.to_string()))?;
    fs::write(path, toml_str)?;
    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}

pub fn load_settings() -> Result<Option<AppSettings>> {
    load_settings_from(&get_config_path())
}

pub fn save_settings(settings: &AppSettings) -> Result<()> {
    save_settings_to(&get_config_path(), settings)
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_settings() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings_from(&dir.path().join("settings.toml")).unwrap(), None);
    }

    #[test]
    fn round_trips_and_defaults_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = AppSettings {
            data_root: "/srv/billed".into(),
            attachment_base_url: "https://cdn.test".into(),
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), Some(settings));

        fs::write(&path, "data_root = \"/srv/billed\"\n").unwrap();
        let loaded = load_settings_from(&path).unwrap().unwrap();
        assert_eq!(loaded.attachment_base_url, DEFAULT_ATTACHMENT_BASE_URL);
        assert_eq!(loaded.bills_path(), PathBuf::from("/srv/billed/data/bills.json"));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "data_root = ").unwrap();
        assert!(matches!(load_settings_from(&path), Err(BilledError::Config(_))));
    }

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_home_dir("/tmp/billed"), "/tmp/billed");
    }
}
