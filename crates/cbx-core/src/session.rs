//! Telegram session document copied from telegram_parser, plus the read-back
//! helper used to confirm the copy is usable.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Keys a session must contain to be usable without re-authorization.
pub const REQUIRED_SESSION_KEYS: [&str; 3] = ["timeOffset", "2authKey", "2serverSalt"];

/// Authentication-session document, kept verbatim and in original key order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionObject(Map<String, Value>);

impl SessionObject {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys mentioning `authKey` (one per data center).
    pub fn auth_key_count(&self) -> usize {
        self.0.keys().filter(|k| k.contains("authKey")).count()
    }

    pub fn time_offset(&self) -> Option<&Value> {
        self.0.get("timeOffset")
    }

    pub fn is_valid(&self) -> bool {
        REQUIRED_SESSION_KEYS.iter().all(|k| self.contains_key(k))
    }

    /// Compact JSON form, as handed to an MTProto client.
    pub fn to_session_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// Load a session file. A missing file yields `Ok(None)`; malformed JSON or a
/// non-object document is an error.
pub fn load_session(path: &Path) -> Result<Option<SessionObject>> {
    let txt = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let data: SessionObject = serde_json::from_str(&txt)?;
    Ok(Some(data))
}

/// Write a session file pretty-printed with two-space indentation, replacing
/// any existing file.
pub fn save_session(path: &Path, data: &SessionObject) -> Result<()> {
    let txt = serde_json::to_string_pretty(data)?;
    fs::write(path, txt)?;
    Ok(())
}

/// Read-back view over a copied session file.
#[derive(Clone, Debug)]
pub struct SessionHelper {
    data: Option<SessionObject>,
}

impl SessionHelper {
    /// Open `path`; a missing file leaves the helper unloaded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = load_session(path.as_ref())?;
        Ok(Self { data })
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_valid(&self) -> bool {
        self.data.as_ref().is_some_and(SessionObject::is_valid)
    }

    pub fn session_string(&self) -> Result<Option<String>> {
        self.data
            .as_ref()
            .map(SessionObject::to_session_string)
            .transpose()
    }

    pub fn stats(&self) -> String {
        let Some(data) = &self.data else {
            return "Session not loaded".to_string();
        };
        let offset = data
            .time_offset()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "Session holds {} auth keys, offset: {offset}",
            data.auth_key_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;
    use serde_json::json;

    fn session(v: Value) -> SessionObject {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn counts_auth_keys() {
        let s = session(json!({
            "timeOffset": 0,
            "2authKey": "aa",
            "4authKey": "bb",
            "2serverSalt": "cc",
            "dcId": 2
        }));
        assert_eq!(s.auth_key_count(), 2);
        assert!(s.is_valid());
    }

    #[test]
    fn validity_requires_exact_key_names() {
        let s = session(json!({ "timeOffset": 0, "1authKey": "aa", "1serverSalt": "cc" }));
        assert_eq!(s.auth_key_count(), 1);
        assert!(!s.is_valid());
    }

    #[test]
    fn rejects_non_object_document() {
        let dir = scratch_dir("session-array");
        let path = dir.join(".session.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(load_session(&path).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_preserves_key_order_and_indent() {
        let dir = scratch_dir("session-save");
        let path = dir.join(".session.json");
        let raw = r#"{"zeta": 1, "timeOffset": 5, "alpha": "x"}"#;
        let s: SessionObject = serde_json::from_str(raw).unwrap();

        save_session(&path, &s).unwrap();
        let txt = fs::read_to_string(&path).unwrap();
        assert_eq!(
            txt,
            "{\n  \"zeta\": 1,\n  \"timeOffset\": 5,\n  \"alpha\": \"x\"\n}"
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn helper_round_trip_valid_and_invalid() {
        let dir = scratch_dir("session-helper");

        let good = dir.join("good.json");
        save_session(
            &good,
            &session(json!({ "timeOffset": -3, "2authKey": "k", "2serverSalt": "s" })),
        )
        .unwrap();
        let h = SessionHelper::open(&good).unwrap();
        assert!(h.is_loaded());
        assert!(h.is_valid());
        assert_eq!(h.stats(), "Session holds 1 auth keys, offset: -3");

        let bad = dir.join("bad.json");
        save_session(&bad, &session(json!({ "timeOffset": 0, "2authKey": "k" }))).unwrap();
        assert!(!SessionHelper::open(&bad).unwrap().is_valid());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn helper_without_file() {
        let dir = scratch_dir("session-none");
        let h = SessionHelper::open(dir.join(".session.json")).unwrap();
        assert!(!h.is_loaded());
        assert!(!h.is_valid());
        assert_eq!(h.session_string().unwrap(), None);
        assert_eq!(h.stats(), "Session not loaded");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn session_string_is_compact() {
        let s = session(json!({ "timeOffset": 1, "2authKey": "k" }));
        assert_eq!(
            s.to_session_string().unwrap(),
            r#"{"timeOffset":1,"2authKey":"k"}"#
        );
    }
}
