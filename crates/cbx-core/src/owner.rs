//! Best-effort guess of the bot owner's Telegram id.
//!
//! Any JSON object under the source trees whose key mentions `user`, `owner`
//! or `admin` and holds a number-like value is a candidate. The first one in
//! path order wins; nothing checks that it is a real user id.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Value written when no candidate is found.
pub const OWNER_ID_PLACEHOLDER: &str = "YOUR_TELEGRAM_ID";

/// Files of this size or larger are not read.
pub const MAX_SCAN_BYTES: u64 = 1024 * 1024;

const KEY_HINTS: [&str; 3] = ["user", "owner", "admin"];

/// Result of scanning a single JSON file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Candidate(String),
    NoCandidate,
    NotAnObject,
    TooLarge(u64),
    Unreadable,
    Unparsable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerGuess {
    pub owner_id: String,
    /// File the id came from; `None` means the placeholder is in use.
    pub source: Option<PathBuf>,
    pub scanned: Vec<(PathBuf, ScanOutcome)>,
}

impl OwnerGuess {
    pub fn is_placeholder(&self) -> bool {
        self.source.is_none()
    }
}

/// Scan every `*.json` file below the source directories, in path order.
pub fn guess_owner_id(cfg: &Config) -> OwnerGuess {
    let mut scanned = Vec::new();
    let mut found: Option<(String, PathBuf)> = None;

    for root in cfg.source_dirs() {
        for path in collect_json_files(root) {
            let outcome = scan_json_file(&path);
            match &outcome {
                ScanOutcome::Candidate(id) if found.is_none() => {
                    found = Some((id.clone(), path.clone()));
                }
                ScanOutcome::TooLarge(len) => {
                    debug!(path = %path.display(), bytes = len, "skipped oversized json");
                }
                ScanOutcome::Unreadable | ScanOutcome::Unparsable => {
                    debug!(path = %path.display(), outcome = ?outcome, "skipped json");
                }
                _ => {}
            }
            scanned.push((path, outcome));
        }
    }

    match found {
        Some((owner_id, source)) => {
            info!(owner_id = %owner_id, path = %source.display(), "owner id found");
            OwnerGuess {
                owner_id,
                source: Some(source),
                scanned,
            }
        }
        None => {
            warn!("owner id not found; set it manually");
            OwnerGuess {
                owner_id: OWNER_ID_PLACEHOLDER.to_string(),
                source: None,
                scanned,
            }
        }
    }
}

/// Recursively list files ending in `.json`, sorted by path.
///
/// Symlinked files are scanned; symlinked directories are not descended into.
/// Unreadable directories are skipped.
pub fn collect_json_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let Ok(rd) = fs::read_dir(&dir) else {
            continue;
        };
        for ent in rd.flatten() {
            let Ok(ft) = ent.file_type() else {
                continue;
            };
            let path = ent.path();
            if ft.is_dir() {
                stack.push(path);
                continue;
            }
            if !ent.file_name().to_string_lossy().ends_with(".json") {
                continue;
            }
            let is_file = ft.is_file()
                || (ft.is_symlink() && fs::metadata(&path).is_ok_and(|md| md.is_file()));
            if is_file {
                out.push(path);
            }
        }
    }

    out.sort();
    out
}

/// Inspect one JSON file for an owner-id candidate.
pub fn scan_json_file(path: &Path) -> ScanOutcome {
    let Ok(md) = fs::metadata(path) else {
        return ScanOutcome::Unreadable;
    };
    if md.len() >= MAX_SCAN_BYTES {
        return ScanOutcome::TooLarge(md.len());
    }

    let Ok(txt) = fs::read_to_string(path) else {
        return ScanOutcome::Unreadable;
    };
    let Ok(v) = serde_json::from_str::<Value>(&txt) else {
        return ScanOutcome::Unparsable;
    };

    match find_candidate(&v) {
        Some(id) => ScanOutcome::Candidate(id),
        None if v.is_object() => ScanOutcome::NoCandidate,
        None => ScanOutcome::NotAnObject,
    }
}

/// First top-level key (document order) that looks like an owner id.
pub fn find_candidate(v: &Value) -> Option<String> {
    let obj = v.as_object()?;
    obj.iter().find_map(|(key, value)| {
        if !is_owner_key(key) {
            return None;
        }
        numeric_id(value)
    })
}

fn is_owner_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    KEY_HINTS.iter().any(|h| lower.contains(h))
}

fn numeric_id(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => n.as_u64().map(|x| x.to_string()),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.clone())
        }
        _ => None,
    }
}
