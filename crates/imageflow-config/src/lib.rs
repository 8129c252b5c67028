pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable pointing at a settings file
pub const CONFIG_PATH_ENV: &str = "IMAGEFLOW_CONFIG_PATH";

/// Environment variable pointing at the workflow directory
pub const WORKFLOW_DIR_ENV: &str = "IMAGEFLOW_WORKFLOW_DIR";

const SETTINGS_FILE: &str = "config.yaml";

/// Workflow directory layout shipped next to the binary or in the working tree
const BUNDLED_WORKFLOW_DIR: &str = "daisy_workflows/image_import";

/// User defaults, overridden by command-line flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub workflow_dir: Option<PathBuf>,
    pub zone: Option<String>,
    pub network: Option<String>,
    pub subnet: Option<String>,
    pub labels: Option<String>,
}

/// imageflowの設定ディレクトリ (`~/.config/imageflow`) を取得
///
/// ディレクトリは作成しない
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("imageflow");
    Ok(config_dir)
}

/// Load settings from `IMAGEFLOW_CONFIG_PATH` or `~/.config/imageflow/config.yaml`.
///
/// A missing file, or no config directory at all, yields the defaults.
pub fn load_settings() -> Result<Settings> {
    let path = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => PathBuf::from(path),
        Err(_) => match get_config_dir() {
            Ok(dir) => dir.join(SETTINGS_FILE),
            Err(ConfigError::ConfigDirNotFound) => return Ok(Settings::default()),
            Err(e) => return Err(e),
        },
    };
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!(path = %path.display(), "No settings file");
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings = serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidSettings {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

/// Locate the directory holding the import workflow templates
///
/// 以下の優先順位で検索:
/// 1. 環境変数 IMAGEFLOW_WORKFLOW_DIR
/// 2. settings の workflow_dir
/// 3. 実行ファイルの隣の daisy_workflows/image_import
/// 4. カレントディレクトリの daisy_workflows/image_import
pub fn find_workflow_dir(settings: &Settings) -> Result<PathBuf> {
    // 1. 環境変数
    if let Ok(dir) = std::env::var(WORKFLOW_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Ok(path);
        }
    }

    // 2. 設定ファイル
    if let Some(dir) = &settings.workflow_dir
        && dir.is_dir()
    {
        return Ok(dir.clone());
    }

    // 3. 実行ファイルの隣
    if let Ok(exe) = std::env::current_exe()
        && let Some(exe_dir) = exe.parent()
    {
        let path = exe_dir.join(BUNDLED_WORKFLOW_DIR);
        if path.is_dir() {
            return Ok(path);
        }
    }

    // 4. カレントディレクトリ
    let path = std::env::current_dir()?.join(BUNDLED_WORKFLOW_DIR);
    if path.is_dir() {
        return Ok(path);
    }

    Err(ConfigError::WorkflowDirNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_get_config_dir_does_not_create() {
        let temp_dir = tempfile::tempdir().unwrap();

        // dirs::config_dir は Linux では XDG_CONFIG_HOME を見る
        let result = temp_env::with_var("XDG_CONFIG_HOME", Some(temp_dir.path()), get_config_dir);

        let config_dir = result.unwrap();
        assert!(config_dir.ends_with("imageflow"));
        if cfg!(target_os = "linux") {
            assert_eq!(config_dir, temp_dir.path().join("imageflow"));
            assert!(!config_dir.exists());
        }
    }

    #[test]
    #[serial]
    fn test_load_settings_from_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_dir = temp_dir.path().join("imageflow");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.yaml"), "subnet: import-subnet\n").unwrap();

        let settings = temp_env::with_vars(
            [
                ("XDG_CONFIG_HOME", Some(temp_dir.path().as_os_str())),
                (CONFIG_PATH_ENV, None),
            ],
            load_settings,
        )
        .unwrap();

        if cfg!(target_os = "linux") {
            assert_eq!(settings.subnet.as_deref(), Some("import-subnet"));
        }
    }

    #[test]
    fn test_load_settings_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&temp_dir.path().join("config.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_partial() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "zone: us-central1-c\nlabels: team=infra\n").unwrap();

        let settings = load_settings_from(&path).unwrap();

        assert_eq!(settings.zone.as_deref(), Some("us-central1-c"));
        assert_eq!(settings.labels.as_deref(), Some("team=infra"));
        assert!(settings.workflow_dir.is_none());
        assert!(settings.network.is_none());
    }

    #[test]
    fn test_load_settings_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "zone: [unterminated").unwrap();

        let result = load_settings_from(&path);
        assert!(matches!(result, Err(ConfigError::InvalidSettings { .. })));
    }

    #[test]
    #[serial]
    fn test_load_settings_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(&path, "network: import-net\n").unwrap();

        let settings = temp_env::with_var(CONFIG_PATH_ENV, Some(&path), load_settings).unwrap();

        assert_eq!(settings.network.as_deref(), Some("import-net"));
    }

    #[test]
    #[serial]
    fn test_find_workflow_dir_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            workflow_dir: Some(temp_dir.path().join("ignored")),
            ..Default::default()
        };

        let result = temp_env::with_var(WORKFLOW_DIR_ENV, Some(temp_dir.path()), || {
            find_workflow_dir(&settings)
        })
        .unwrap();

        assert_eq!(result, temp_dir.path());
    }

    #[test]
    #[serial]
    fn test_find_workflow_dir_from_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            workflow_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };

        // 存在しないディレクトリを指す環境変数は無視される
        let missing = temp_dir.path().join("missing");
        let result = temp_env::with_var(WORKFLOW_DIR_ENV, Some(&missing), || {
            find_workflow_dir(&settings)
        })
        .unwrap();

        assert_eq!(result, temp_dir.path());
    }

    #[test]
    #[serial]
    fn test_find_workflow_dir_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        fs::create_dir_all(temp_dir.path().join(BUNDLED_WORKFLOW_DIR)).unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();
        let result = temp_env::with_var_unset(WORKFLOW_DIR_ENV, || {
            find_workflow_dir(&Settings::default())
        });
        std::env::set_current_dir(original_dir).unwrap();

        assert!(result.unwrap().ends_with(BUNDLED_WORKFLOW_DIR));
    }

    #[test]
    #[serial]
    fn test_find_workflow_dir_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();
        let result = temp_env::with_var_unset(WORKFLOW_DIR_ENV, || {
            find_workflow_dir(&Settings::default())
        });
        std::env::set_current_dir(original_dir).unwrap();

        assert!(matches!(result, Err(ConfigError::WorkflowDirNotFound)));
    }
}
