use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Environment file name used by every project involved.
pub const ENV_FILE_NAME: &str = ".env";
/// Serialized Telegram session file name (source and destination).
pub const SESSION_FILE_NAME: &str = ".session.json";
/// Helper module written next to the copied session.
pub const HELPER_FILE_NAME: &str = "session_helper.py";

/// Directories the extractor reads from and writes to.
///
/// Passed explicitly into every operation; nothing in the crate reaches for
/// global paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// IKAR project (bot token, LLM and OpenRouter keys, ElevenLabs keys).
    pub ikar_dir: PathBuf,
    /// telegram_parser project (Telegram API credentials and session).
    pub parser_dir: PathBuf,
    /// ContentBot project being provisioned.
    pub contentbot_dir: PathBuf,
}

impl Config {
    pub fn new(
        ikar_dir: impl Into<PathBuf>,
        parser_dir: impl Into<PathBuf>,
        contentbot_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ikar_dir: ikar_dir.into(),
            parser_dir: parser_dir.into(),
            contentbot_dir: contentbot_dir.into(),
        }
    }

    /// Default layout: the three projects live side by side in `home`.
    pub fn from_home(home: &Path) -> Self {
        Self::new(
            home.join("IKAR"),
            home.join("telegram_parser"),
            home.join("ContentBot"),
        )
    }

    /// Resolve directories from `$HOME`, with optional per-directory overrides
    /// (`CBX_IKAR_DIR`, `CBX_PARSER_DIR`, `CBX_CONTENTBOT_DIR`).
    pub fn load() -> Result<Self> {
        let home = home_dir().ok_or_else(|| Error::Config("HOME is not set".to_string()))?;
        let mut cfg = Self::from_home(&home);

        if let Some(p) = env_path("CBX_IKAR_DIR") {
            cfg.ikar_dir = p;
        }
        if let Some(p) = env_path("CBX_PARSER_DIR") {
            cfg.parser_dir = p;
        }
        if let Some(p) = env_path("CBX_CONTENTBOT_DIR") {
            cfg.contentbot_dir = p;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject a destination that coincides with a source; writing there would
    /// clobber the very files being read.
    pub fn validate(&self) -> Result<()> {
        for src in [&self.ikar_dir, &self.parser_dir] {
            if src == &self.contentbot_dir {
                return Err(Error::InvalidPath {
                    path: self.contentbot_dir.clone(),
                    reason: "destination directory is also a source directory".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn source_dirs(&self) -> [&Path; 2] {
        [&self.ikar_dir, &self.parser_dir]
    }

    pub fn ikar_env(&self) -> PathBuf {
        self.ikar_dir.join(ENV_FILE_NAME)
    }

    pub fn parser_env(&self) -> PathBuf {
        self.parser_dir.join(ENV_FILE_NAME)
    }

    pub fn parser_session(&self) -> PathBuf {
        self.parser_dir.join(SESSION_FILE_NAME)
    }

    pub fn contentbot_env(&self) -> PathBuf {
        self.contentbot_dir.join(ENV_FILE_NAME)
    }

    pub fn contentbot_session(&self) -> PathBuf {
        self.contentbot_dir.join(SESSION_FILE_NAME)
    }

    pub fn contentbot_helper(&self) -> PathBuf {
        self.contentbot_dir.join(HELPER_FILE_NAME)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    let v = env::var_os(key)?;
    if v.is_empty() {
        None
    } else {
        Some(PathBuf::from(v))
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
