use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;
use crate::render::RendererKind;

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for format-preserving edits.
pub fn read_config(data_dir: &Path) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: AppConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    crate::io::storage::atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        ConfigError::WriteError {
            path: config_path,
            source: e,
        }
    })
}

/// Set the default view in the config document
pub fn set_renderer(doc: &mut toml_edit::DocumentMut, kind: RendererKind) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["renderer"] = toml_edit::value(kind.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# my list
[storage]
key = "todos"

[ui]
renderer = "list" # default
show_key_hints = false
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(&config_path, sample_config()).unwrap();

        let (config, doc) = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.renderer, RendererKind::List);
        write_config(tmp.path(), &doc).unwrap();

        let written = fs::read_to_string(&config_path).unwrap();
        assert_eq!(written, sample_config());
    }

    #[test]
    fn test_set_renderer_preserves_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_renderer(&mut doc, RendererKind::Card);
        let result = doc.to_string();
        assert!(result.starts_with("# my list"));
        let config: AppConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.ui.renderer, RendererKind::Card);
        assert!(!config.ui.show_key_hints);
    }

    #[test]
    fn test_set_renderer_creates_ui_table() {
        let mut doc: toml_edit::DocumentMut = "[storage]\nkey = \"x\"\n".parse().unwrap();
        set_renderer(&mut doc, RendererKind::Compact);
        let config: AppConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.ui.renderer, RendererKind::Compact);
        assert_eq!(config.storage.key, "x");
    }

    #[test]
    fn test_read_missing_config() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_read_invalid_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[ui\nrenderer=").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
