use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading theme and option sources.
///
/// Generation itself never fails: malformed leaves and unresolvable
/// references degrade to literal output instead.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but its top level is not an object.
    #[error("Theme in {} must be a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    /// A directory was given but it holds no `*.json` files.
    #[error("No theme files found in {}", path.display())]
    Empty { path: PathBuf },
}

impl ThemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
