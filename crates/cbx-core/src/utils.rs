use chrono::Local;

// ============== Timestamp Helpers ==============

/// Local timestamp stamped into generated files.
pub fn generated_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

// ============== Display Helpers ==============

/// Number of leading characters kept visible when a secret is printed.
pub const MASK_VISIBLE_CHARS: usize = 20;

/// Shorten a secret for logs and the summary: the first 20 characters followed
/// by `...`. Values at or under the limit are shown whole.
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() <= MASK_VISIBLE_CHARS {
        return value.to_string();
    }
    let head: String = value.chars().take(MASK_VISIBLE_CHARS).collect();
    format!("{head}...")
}

// ============== Test Helpers ==============

#[cfg(test)]
pub(crate) fn scratch_dir(prefix: &str) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let pid = std::process::id();
    let dir = std::path::PathBuf::from(format!("/tmp/cbx-{prefix}-{pid}-{n}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secrets_are_not_masked() {
        assert_eq!(mask_secret("12345"), "12345");
        assert_eq!(mask_secret(&"a".repeat(20)), "a".repeat(20));
    }

    #[test]
    fn long_secrets_keep_first_twenty_chars() {
        let masked = mask_secret("sk-or-v1-0123456789abcdefghijklmnop");
        assert_eq!(masked, "sk-or-v1-0123456789a...");
    }

    #[test]
    fn masking_counts_chars_not_bytes() {
        let value = "ключ".repeat(10);
        let masked = mask_secret(&value);
        assert_eq!(masked.chars().count(), MASK_VISIBLE_CHARS + 3);
    }
}
