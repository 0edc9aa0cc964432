//! Minimal `KEY=VALUE` reader for the source projects' `.env` files.

use std::{fs, io, path::Path};

use crate::Result;

/// Contents of one environment file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvFile {
    /// Size of the file in characters.
    pub chars: usize,
    /// `(key, value)` pairs in file order. Duplicate keys are kept.
    pub entries: Vec<(String, String)>,
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Only the first
/// `=` splits; key and value are trimmed and the value is otherwise kept as-is.
pub fn parse_env(text: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        out.push((key.to_string(), v.trim().to_string()));
    }

    out
}

/// Read and parse an environment file. A missing file yields `Ok(None)`.
pub fn read_env_file(path: &Path) -> Result<Option<EnvFile>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Ok(Some(EnvFile {
        chars: text.chars().count(),
        entries: parse_env(&text),
    }))
}
