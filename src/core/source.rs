//! Metadata document loading — JSON, TOML and YAML files (or JSON on stdin).
//!
//! Parsing goes through each format's own `Value` type and is then converted
//! into the crate's [`Value`] model, keeping document key order.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::value::{Metadata, Value, ValueKind};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot infer a metadata format from {0:?} (expected .json, .toml, .yaml or .yml)")]
    UnknownFormat(PathBuf),
    #[error("io error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{format} parse error: {message}")]
    Parse { format: Format, message: String },
    #[error("metadata root must be a mapping, found a {0:?}")]
    NotAMapping(ValueKind),
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Toml => "TOML",
            Format::Yaml => "YAML",
        })
    }
}

/// `true` when `path` means "read standard input".
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Load a metadata document from `path`.  `-` reads JSON from stdin.
pub fn load_path(path: &Path) -> Result<Metadata, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let (text, format) = if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(io_err)?;
        (buf, Format::Json)
    } else {
        let format =
            Format::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?;
        (std::fs::read_to_string(path).map_err(io_err)?, format)
    };

    debug!(path = %path.display(), %format, bytes = text.len(), "loading metadata");
    parse_str(&text, format)
}

/// Parse an in-memory document.
pub fn parse_str(text: &str, format: Format) -> Result<Metadata, LoadError> {
    let parse_err = |message: String| LoadError::Parse { format, message };

    let value: Value = match format {
        Format::Json => serde_json::from_str::<serde_json::Value>(text)
            .map_err(|e| parse_err(e.to_string()))?
            .into(),
        Format::Toml => toml::from_str::<toml::Table>(text)
            .map(toml::Value::Table)
            .map_err(|e| parse_err(e.to_string()))?
            .into(),
        Format::Yaml => serde_yaml::from_str::<serde_yaml::Value>(text)
            .map_err(|e| parse_err(e.to_string()))?
            .into(),
    };

    match value {
        Value::Mapping(m) => Ok(m),
        other => Err(LoadError::NotAMapping(other.kind())),
    }
}
