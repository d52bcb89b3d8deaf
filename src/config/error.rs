use std::path::PathBuf;
use thiserror::Error;

use super::file::Format;
use super::value::ValueKind;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("key cannot be empty")]
    EmptyPath,

    #[error("key \"{key}\" not found")]
    KeyNotFound { key: String },

    #[error("invalid index {index} (sequence has {len} elements)")]
    IndexInvalid { index: usize, len: usize },

    #[error("expected {expected} at segment \"{segment}\", got {actual}")]
    SegmentTypeMismatch {
        segment: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("expected {expected} at \"{path}\", got {actual}")]
    LeafTypeMismatch {
        path: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {format} config '{path}': {source}")]
    ParseError {
        path: PathBuf,
        format: Format,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config root of '{path}' must be a map, got {actual}")]
    RootNotMap { path: PathBuf, actual: ValueKind },

    #[error("unrecognized config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("failed to decode config at \"{path}\": {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}
