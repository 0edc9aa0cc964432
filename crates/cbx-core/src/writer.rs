use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    config::Config,
    secrets::{SecretMap, SecretSlot},
    session::{save_session, SessionObject},
    Result,
};

/// Static helper module dropped into the destination project.
pub const SESSION_HELPER_SOURCE: &str = include_str!("../templates/session_helper.py");

/// Render the ContentBot `.env`.
///
/// Only credentials and the owner id vary; every other value is a fixed
/// default for the operator to adjust.
pub fn render_env(secrets: &SecretMap, owner_id: &str, generated_at: &str) -> String {
    let api_id = secrets.single_or(SecretSlot::ApiId, "your_api_id");
    let api_hash = secrets.single_or(SecretSlot::ApiHash, "your_api_hash");
    let bot_token = secrets.single_or(SecretSlot::TelegramBotToken, "your_bot_token");
    let openai_key = secrets.single_or(SecretSlot::OpenAiApiKey, "your_openai_key");
    let llm_api = secrets.single_or(SecretSlot::LlmApi, "your_llm_api");

    format!(
        r#"# Generated by cbx on {generated_at}

# Telegram API (from telegram_parser)
API_ID={api_id}
API_HASH={api_hash}
BOT_TOKEN={bot_token}
ADMIN_BOT_TOKEN=your_admin_bot_token

# OpenAI/LLM (from IKAR/telegram_parser)
OPENAI_API_KEY={openai_key}
LLM_API={llm_api}

# Admin (set manually if not detected)
ADMIN_CHAT_ID={owner_id}
OWNER_ID={owner_id}

# Payment Systems (optional)
YOOMONEY_TOKEN=your_yoomoney_token
CRYPTO_WALLET=your_crypto_wallet

# Database
DATABASE_URL=./data/contentbot.db

# Pricing
MONTHLY_PRICE=3000
CHANNEL_SETUP_PRICE=10000
PREMIUM_PRICE=15000

# Content Settings
MAX_CHANNELS_PER_USER=5
POSTS_PER_DAY=10
MAX_POST_LENGTH=4000

# Session file (copied from telegram_parser)
SESSION_FILE=.session.json
"#
    )
}

/// Write the destination `.env`, replacing any previous one.
pub fn write_env_file(
    cfg: &Config,
    secrets: &SecretMap,
    owner_id: &str,
    generated_at: &str,
) -> Result<PathBuf> {
    let path = cfg.contentbot_env();
    ensure_parent(&path)?;
    fs::write(&path, render_env(secrets, owner_id, generated_at))?;
    info!(path = %path.display(), "env file written");
    Ok(path)
}

/// Copy the session into the destination project. Without a session, or with
/// an empty one, nothing is written and `Ok(None)` is returned.
pub fn write_session_file(
    cfg: &Config,
    session: Option<&SessionObject>,
) -> Result<Option<PathBuf>> {
    let Some(session) = session.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let path = cfg.contentbot_session();
    ensure_parent(&path)?;
    save_session(&path, session)?;
    info!(path = %path.display(), "session copied");
    Ok(Some(path))
}

pub fn write_session_helper(cfg: &Config) -> Result<PathBuf> {
    let path = cfg.contentbot_helper();
    ensure_parent(&path)?;
    fs::write(&path, SESSION_HELPER_SOURCE)?;
    info!(path = %path.display(), "session helper written");
    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
