use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    dotenv::read_env_file,
    secrets::{find_rule, SecretMap, SecretSlot, SourceRule, IKAR_RULES, PARSER_RULES},
    session::{load_session, SessionObject},
    utils::mask_secret,
    Result,
};

/// Outcome of reading one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    Missing,
    Loaded {
        /// File size in characters (env files) or top-level keys (session).
        size: usize,
        /// Entries that landed in a slot or, for the session, 1.
        matched: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReport {
    pub label: &'static str,
    pub path: PathBuf,
    pub status: SourceStatus,
}

/// Everything harvested from the source projects.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub secrets: SecretMap,
    pub session: Option<SessionObject>,
    pub sources: Vec<SourceReport>,
}

/// Read both source `.env` files (IKAR first) and the telegram_parser session.
pub fn extract(cfg: &Config) -> Result<Extraction> {
    let mut out = Extraction::default();

    let ikar = extract_env_source("IKAR .env", &cfg.ikar_env(), IKAR_RULES, &mut out.secrets)?;
    out.sources.push(ikar);

    let parser = extract_env_source(
        "telegram_parser .env",
        &cfg.parser_env(),
        PARSER_RULES,
        &mut out.secrets,
    )?;
    out.sources.push(parser);

    let session_path = cfg.parser_session();
    let session = load_session(&session_path)?;
    let status = match &session {
        Some(s) => {
            info!(
                path = %session_path.display(),
                keys = s.len(),
                auth_keys = s.auth_key_count(),
                "telegram session loaded"
            );
            SourceStatus::Loaded {
                size: s.len(),
                matched: 1,
            }
        }
        None => {
            warn!(path = %session_path.display(), "telegram session file not found");
            SourceStatus::Missing
        }
    };
    out.sources.push(SourceReport {
        label: "telegram_parser session",
        path: session_path,
        status,
    });
    out.session = session;

    Ok(out)
}

/// Merge every recognized key of one `.env` file into `secrets`.
pub fn extract_env_source(
    label: &'static str,
    path: &Path,
    rules: &[SourceRule],
    secrets: &mut SecretMap,
) -> Result<SourceReport> {
    let Some(env) = read_env_file(path)? else {
        warn!(source = label, path = %path.display(), "env file not found");
        return Ok(SourceReport {
            label,
            path: path.to_path_buf(),
            status: SourceStatus::Missing,
        });
    };

    info!(source = label, chars = env.chars, "env file found");

    let mut matched = 0usize;
    for (key, value) in &env.entries {
        let Some(rule) = find_rule(rules, key) else {
            continue;
        };
        let slot = rule.slot;
        if !secrets.merge_with(slot, value.as_str(), rule.policy()) {
            continue;
        }
        matched += 1;

        let shown = if slot.is_public() {
            value.clone()
        } else {
            mask_secret(value)
        };
        if slot == SecretSlot::ElevenApiKeys {
            debug!(source = label, key = %key, "speech api key collected");
        } else {
            info!(source = label, slot = %slot, value = %shown, "secret found");
        }
    }

    Ok(SourceReport {
        label,
        path: path.to_path_buf(),
        status: SourceStatus::Loaded {
            size: env.chars,
            matched,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{secrets::SecretValue, utils::scratch_dir};
    use std::fs;

    fn project(prefix: &str) -> (PathBuf, Config) {
        let root = scratch_dir(prefix);
        let cfg = Config::from_home(&root);
        fs::create_dir_all(&cfg.ikar_dir).unwrap();
        fs::create_dir_all(&cfg.parser_dir).unwrap();
        (root, cfg)
    }

    #[test]
    fn maps_every_recognized_key() {
        let (root, cfg) = project("extract-map");
        fs::write(
            cfg.ikar_env(),
            "# ikar\nTELEGRAM_BOT_TOKEN=123:abc\nLLM_API=llm-key\nUNRELATED=zzz\n",
        )
        .unwrap();
        fs::write(
            cfg.parser_env(),
            "TG_API_ID=111\nTG_API_HASH=deadbeef\nTELEGRAM_BOT_TOKEN=ignored\n",
        )
        .unwrap();

        let ex = extract(&cfg).unwrap();
        let s = &ex.secrets;
        assert_eq!(s.single(SecretSlot::TelegramBotToken), Some("123:abc"));
        assert_eq!(s.single(SecretSlot::LlmApi), Some("llm-key"));
        assert_eq!(s.single(SecretSlot::ApiId), Some("111"));
        assert_eq!(s.single(SecretSlot::ApiHash), Some("deadbeef"));
        assert_eq!(s.len(), 4);
        assert!(ex.session.is_none());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn speech_keys_accumulate_in_file_order() {
        let (root, cfg) = project("extract-eleven");
        fs::write(
            cfg.ikar_env(),
            "ELEVEN_API_KEY=e1\nOTHER=x\nELEVEN_API_KEY2=e2\nELEVEN_API_KEY3=e3\n",
        )
        .unwrap();

        let ex = extract(&cfg).unwrap();
        assert_eq!(
            ex.secrets.get(SecretSlot::ElevenApiKeys),
            Some(&SecretValue::List(vec![
                "e1".to_string(),
                "e2".to_string(),
                "e3".to_string()
            ]))
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn openai_key_first_source_wins() {
        let (root, cfg) = project("extract-openai");
        fs::write(cfg.ikar_env(), "OPENROUTER_API_KEY=from-ikar\n").unwrap();
        fs::write(cfg.parser_env(), "OPENROUTER_API_KEY=from-parser\n").unwrap();

        let ex = extract(&cfg).unwrap();
        assert_eq!(ex.secrets.single(SecretSlot::OpenAiApiKey), Some("from-ikar"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn openai_key_last_line_wins_within_ikar() {
        let (root, cfg) = project("extract-openai-ikar");
        fs::write(
            cfg.ikar_env(),
            "OPENROUTER_API_KEY=first\nOPENROUTER_API_KEY1=second\n",
        )
        .unwrap();
        fs::write(cfg.parser_env(), "OPENROUTER_API_KEY=from-parser\n").unwrap();

        let ex = extract(&cfg).unwrap();
        assert_eq!(ex.secrets.single(SecretSlot::OpenAiApiKey), Some("second"));
        assert_eq!(
            ex.sources[0].status,
            SourceStatus::Loaded {
                size: 52,
                matched: 2
            }
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn openai_key_falls_back_to_parser() {
        let (root, cfg) = project("extract-openai-fallback");
        fs::write(cfg.ikar_env(), "OPENROUTER_API_KEY2=not-taken\n").unwrap();
        fs::write(cfg.parser_env(), "OPENROUTER_API_KEY2=from-parser\n").unwrap();

        let ex = extract(&cfg).unwrap();
        assert_eq!(
            ex.secrets.single(SecretSlot::OpenAiApiKey),
            Some("from-parser")
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_sources_are_reported_not_fatal() {
        let (root, cfg) = project("extract-missing");

        let ex = extract(&cfg).unwrap();
        assert!(ex.secrets.is_empty());
        assert_eq!(ex.sources.len(), 3);
        assert!(ex
            .sources
            .iter()
            .all(|s| s.status == SourceStatus::Missing));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn loads_session_and_reports_counts() {
        let (root, cfg) = project("extract-session");
        fs::write(cfg.parser_env(), "TG_API_ID=7\nX=1\n").unwrap();
        fs::write(
            cfg.parser_session(),
            r#"{"timeOffset": 0, "2authKey": "a", "2serverSalt": "b"}"#,
        )
        .unwrap();

        let ex = extract(&cfg).unwrap();
        assert_eq!(ex.session.as_ref().map(|s| s.len()), Some(3));
        assert_eq!(
            ex.sources[1].status,
            SourceStatus::Loaded {
                size: 16,
                matched: 1
            }
        );
        assert_eq!(
            ex.sources[2].status,
            SourceStatus::Loaded {
                size: 3,
                matched: 1
            }
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn malformed_session_is_an_error() {
        let (root, cfg) = project("extract-bad-session");
        fs::write(cfg.parser_session(), "{not json").unwrap();
        assert!(extract(&cfg).is_err());
        let _ = fs::remove_dir_all(&root);
    }
}
