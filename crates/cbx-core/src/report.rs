//! Run orchestration and the console summary.

use std::{fmt::Write as _, path::PathBuf};

use crate::{
    config::Config,
    extractor::{extract, Extraction, SourceStatus},
    owner::{guess_owner_id, OwnerGuess},
    secrets::SecretValue,
    utils::{generated_timestamp, mask_secret},
    writer::{write_env_file, write_session_file, write_session_helper},
    Result,
};

/// What a run harvested and wrote.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub extraction: Extraction,
    pub owner: OwnerGuess,
    pub contentbot_dir: PathBuf,
    pub env_path: PathBuf,
    pub session_path: Option<PathBuf>,
    pub helper_path: PathBuf,
}

/// Extract, guess the owner, then write `.env`, session and helper in that
/// order. The first failing write aborts the run; earlier writes stay.
pub fn run(cfg: &Config) -> Result<RunReport> {
    let extraction = extract(cfg)?;
    let owner = guess_owner_id(cfg);

    let env_path = write_env_file(
        cfg,
        &extraction.secrets,
        &owner.owner_id,
        &generated_timestamp(),
    )?;
    let session_path = write_session_file(cfg, extraction.session.as_ref())?;
    let helper_path = write_session_helper(cfg)?;

    Ok(RunReport {
        extraction,
        owner,
        contentbot_dir: cfg.contentbot_dir.clone(),
        env_path,
        session_path,
        helper_path,
    })
}

/// Human-readable summary printed at the end of a run.
pub fn render_summary(report: &RunReport) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "EXTRACTION SUMMARY");
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "Sources:");
    for src in &report.extraction.sources {
        let state = match src.status {
            SourceStatus::Missing => "missing".to_string(),
            SourceStatus::Loaded { matched, .. } => format!("found, {matched} used"),
        };
        let _ = writeln!(out, "  {} ({}): {state}", src.label, src.path.display());
    }
    let _ = writeln!(out);

    let secrets = &report.extraction.secrets;
    if secrets.is_empty() {
        let _ = writeln!(out, "No API keys found");
    } else {
        let _ = writeln!(out, "API keys found:");
        for (slot, value) in secrets.iter() {
            match value {
                SecretValue::List(xs) => {
                    let _ = writeln!(out, "  {slot}: {} keys", xs.len());
                }
                SecretValue::Single(v) => {
                    let _ = writeln!(out, "  {slot}: {}", mask_secret(v));
                }
            }
        }
    }

    match &report.extraction.session {
        Some(s) if !s.is_empty() => {
            let _ = writeln!(out, "\nTelegram session: {} auth keys", s.auth_key_count());
            if s.is_valid() {
                let _ = writeln!(out, "  Ready to use without re-authorization");
            } else {
                let _ = writeln!(out, "  Missing required keys; re-authorization may be needed");
            }
        }
        _ => {
            let _ = writeln!(out, "\nTelegram session: not found");
        }
    }

    let _ = writeln!(out, "\nFiles written to {}:", report.contentbot_dir.display());
    let _ = writeln!(out, "  {} - main settings", report.env_path.display());
    if let Some(p) = &report.session_path {
        let _ = writeln!(out, "  {} - Telegram authorization", p.display());
    }
    let _ = writeln!(out, "  {} - session helper", report.helper_path.display());

    let _ = writeln!(out, "\nNEXT STEPS:");
    let mut steps = vec![
        "Create an admin bot via @BotFather".to_string(),
        "Set ADMIN_BOT_TOKEN in .env".to_string(),
    ];
    if report.owner.is_placeholder() {
        steps.push("Look up your Telegram id via @userinfobot".to_string());
        steps.push("Set OWNER_ID and ADMIN_CHAT_ID in .env".to_string());
    } else {
        steps.push(format!(
            "Confirm OWNER_ID={} is your Telegram id",
            report.owner.owner_id
        ));
    }
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {step}", i + 1);
    }
    let _ = writeln!(out, "{rule}");

    out
}
