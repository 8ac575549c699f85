use std::path::PathBuf;

use crate::cli::commands::InitArgs;
use crate::cli::output::print_json;
use crate::io::workspace;

#[derive(serde::Serialize)]
struct InitJson {
    data_dir: String,
    key: String,
    view: String,
}

/// Create `.taskpad/` in the target directory (cwd or `-C`).
pub fn cmd_init(
    args: InitArgs,
    dir: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(format!("not a directory: {}", root.display()).into());
    }

    let ws = workspace::init_workspace(&root, args.force)?;

    if json {
        print_json(&InitJson {
            data_dir: ws.data_dir.display().to_string(),
            key: ws.config.storage.key.clone(),
            view: ws.config.ui.renderer.to_string(),
        })?;
    } else {
        println!("initialized {}", ws.data_dir.display());
    }
    Ok(())
}
