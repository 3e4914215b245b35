use crate::error::ThemeError;
use crate::theme::Theme;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a theme from a JSON file, or from every `*.json` file in a
/// directory merged in file name order.
pub fn load_theme(path: &Path) -> Result<Theme, ThemeError> {
    if path.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

/// Load and deep-merge several theme sources. Later sources win.
pub fn load_themes<P: AsRef<Path>>(paths: &[P]) -> Result<Theme, ThemeError> {
    let mut theme = Theme::new();
    for path in paths {
        theme.merge(load_theme(path.as_ref())?);
    }
    Ok(theme)
}

fn load_dir(dir: &Path) -> Result<Theme, ThemeError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| ThemeError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    if files.is_empty() {
        return Err(ThemeError::Empty { path: dir.to_path_buf() });
    }
    files.sort();

    let mut theme = Theme::new();
    for file in &files {
        theme.merge(load_file(file)?);
    }
    Ok(theme)
}

fn load_file(path: &Path) -> Result<Theme, ThemeError> {
    let data = fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
    let value: serde_json::Value =
        serde_json::from_str(&data).map_err(|e| ThemeError::json(path, e))?;
    let theme = Theme::from_json(value).ok_or_else(|| ThemeError::NotAnObject {
        path: path.to_path_buf(),
    })?;
    debug!(path = %path.display(), entries = theme.len(), "loaded theme");
    Ok(theme)
}
