use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "splitr";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn categories_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().join("categories.json"))
            .unwrap_or_else(|| PathBuf::from("splitr_categories.json"))
    }

    pub fn history_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().join("history.csv"))
            .unwrap_or_else(|| PathBuf::from("splitr_history.csv"))
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("splitr_config.json"))
    }

    /// Log file under $HOME/.local/state/splitr, like other state.
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("splitr.log")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join("splitr.log"))
                .unwrap_or_else(|| PathBuf::from("splitr.log"))
        }
    }
}
