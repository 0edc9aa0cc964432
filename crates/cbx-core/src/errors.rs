use std::path::PathBuf;

/// Failures that stop a `cbx` run.
///
/// An absent `.env` or session file never shows up here; skipped owner-id scan
/// files are reported through `owner::ScanOutcome` instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `$HOME` could not be resolved.
    #[error("config error: {0}")]
    Config(String),

    /// Reading a source or writing into ContentBot failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The source session is not a JSON object, or could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The destination directory overlaps a source directory.
    #[error("invalid path: {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
