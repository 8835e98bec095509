use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "t4";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("t4_config.json"))
    }

    pub fn history_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("history.csv"))
            .unwrap_or_else(|| PathBuf::from("t4_history.csv"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("t4.log"))
            .unwrap_or_else(|| PathBuf::from("t4.log"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }
}
