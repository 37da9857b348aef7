use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "keytype")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("keytype_config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("keytype");
            Some(state_dir.join("keytype.log"))
        } else {
            ProjectDirs::from("", "", "keytype")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("keytype.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_file_name() {
        assert!(AppDirs::config_path().ends_with("config.json"));
    }

    #[test]
    fn test_log_path_file_name() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("keytype.log"));
        }
    }
}
