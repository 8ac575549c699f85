use std::fs;
use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::io::storage::FileStorage;
use crate::model::config::AppConfig;

/// Name of the data directory created by `tp init`
pub const DATA_DIR: &str = ".taskpad";

/// Template written to `config.toml` on init
const CONFIG_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Error type for locating or creating a workspace
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a taskpad workspace: no .taskpad/ directory found (run `tp init`)")]
    NotFound,
    #[error("{0} already exists (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A located data directory with its parsed config
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config: AppConfig,
}

impl Workspace {
    /// Storage backend writing next to the config file
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }
}

/// Walk up from `start` looking for a `.taskpad/` directory with a config.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join(config_io::CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotFound);
        }
    }
}

/// Load the workspace rooted at `root`.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(WorkspaceError::NotFound);
    }
    let (config, _doc) = config_io::read_config(&data_dir)?;
    Ok(Workspace {
        root: root.to_path_buf(),
        data_dir,
        config,
    })
}

/// Create `.taskpad/` with the default config under `root`.
///
/// Existing task data is never touched; `force` only rewrites the config.
pub fn init_workspace(root: &Path, force: bool) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join(DATA_DIR);
    let config_path = data_dir.join(config_io::CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(WorkspaceError::AlreadyExists(data_dir));
    }
    fs::create_dir_all(&data_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::info!(path = %data_dir.display(), "workspace initialized");
    load_workspace(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RendererKind;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_discover() {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(tmp.path(), false).unwrap();
        assert_eq!(ws.data_dir, tmp.path().join(DATA_DIR));
        assert_eq!(ws.config.storage.key, "todos");
        assert_eq!(ws.config.ui.renderer, RendererKind::List);

        // Discover from a nested directory
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_workspace(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn test_discover_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_workspace(tmp.path()),
            Err(WorkspaceError::NotFound)
        ));
    }

    #[test]
    fn test_init_twice_requires_force() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), false).unwrap();
        assert!(matches!(
            init_workspace(tmp.path(), false),
            Err(WorkspaceError::AlreadyExists(_))
        ));
        assert!(init_workspace(tmp.path(), true).is_ok());
    }

    #[test]
    fn test_force_keeps_task_data() {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(tmp.path(), false).unwrap();
        let data = ws.data_dir.join("todos.json");
        fs::write(&data, "[]").unwrap();
        init_workspace(tmp.path(), true).unwrap();
        assert_eq!(fs::read_to_string(&data).unwrap(), "[]");
    }

    #[test]
    fn test_load_missing_workspace() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_workspace(tmp.path()),
            Err(WorkspaceError::NotFound)
        ));
    }
}
