//! Description loading errors.

use std::path::PathBuf;

/// Error returned when a stylesheet description cannot be loaded.
///
/// Loading only checks the outer shape (a mapping of class names). Everything
/// inside the class blocks is validated by [`compile`](crate::compile).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The stylesheet file could not be read.
    #[error("failed to read stylesheet '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported stylesheet format for '{}' (expected .yaml, .yml or .json)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The text is not valid YAML.
    #[error("invalid YAML stylesheet: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The text is not valid JSON.
    #[error("invalid JSON stylesheet: {0}")]
    Json(#[from] serde_json::Error),

    /// The document root is not a mapping of class names.
    #[error("stylesheet root must be a mapping of class names, found {found}")]
    NotAMapping { found: &'static str },

    /// A top-level key is not a usable class name.
    #[error("class names must be non-empty strings, found {found}")]
    InvalidClassName { found: String },
}
