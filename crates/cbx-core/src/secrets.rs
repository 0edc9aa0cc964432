//! The closed set of secrets the extractor knows about, and how each one is
//! merged when several sources provide it.

use std::{collections::BTreeMap, fmt};

/// Logical secret slots written into the ContentBot `.env`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecretSlot {
    ApiId,
    ApiHash,
    TelegramBotToken,
    OpenAiApiKey,
    LlmApi,
    ElevenApiKeys,
}

/// What happens when a slot that already has a value is matched again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the value seen first.
    First,
    /// Replace with the value seen last.
    Last,
    /// Collect every value, in order.
    Append,
}

impl SecretSlot {
    pub const ALL: [SecretSlot; 6] = [
        SecretSlot::ApiId,
        SecretSlot::ApiHash,
        SecretSlot::TelegramBotToken,
        SecretSlot::OpenAiApiKey,
        SecretSlot::LlmApi,
        SecretSlot::ElevenApiKeys,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SecretSlot::ApiId => "API_ID",
            SecretSlot::ApiHash => "API_HASH",
            SecretSlot::TelegramBotToken => "TELEGRAM_BOT_TOKEN",
            SecretSlot::OpenAiApiKey => "OPENAI_API_KEY",
            SecretSlot::LlmApi => "LLM_API",
            SecretSlot::ElevenApiKeys => "ELEVEN_API_KEYS",
        }
    }

    pub fn policy(self) -> MergePolicy {
        match self {
            SecretSlot::OpenAiApiKey => MergePolicy::First,
            SecretSlot::ElevenApiKeys => MergePolicy::Append,
            SecretSlot::ApiId
            | SecretSlot::ApiHash
            | SecretSlot::TelegramBotToken
            | SecretSlot::LlmApi => MergePolicy::Last,
        }
    }

    /// Whether the value is safe to log unmasked.
    pub fn is_public(self) -> bool {
        matches!(self, SecretSlot::ApiId)
    }
}

impl fmt::Display for SecretSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecretValue {
    Single(String),
    List(Vec<String>),
}

impl SecretValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            SecretValue::Single(s) => Some(s),
            SecretValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SecretValue::List(xs) => Some(xs),
            SecretValue::Single(_) => None,
        }
    }
}

/// Extracted secrets keyed by slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecretMap {
    values: BTreeMap<SecretSlot, SecretValue>,
}

impl SecretMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `value` into `slot` according to the slot's policy.
    ///
    /// Returns `true` when the map changed.
    pub fn merge(&mut self, slot: SecretSlot, value: impl Into<String>) -> bool {
        self.merge_with(slot, value, slot.policy())
    }

    /// Merge with an explicit policy instead of the slot's own.
    pub fn merge_with(
        &mut self,
        slot: SecretSlot,
        value: impl Into<String>,
        policy: MergePolicy,
    ) -> bool {
        let value = value.into();
        match policy {
            MergePolicy::First => {
                if self.values.contains_key(&slot) {
                    return false;
                }
                self.values.insert(slot, SecretValue::Single(value));
            }
            MergePolicy::Last => {
                self.values.insert(slot, SecretValue::Single(value));
            }
            MergePolicy::Append => match self.values.get_mut(&slot) {
                Some(SecretValue::List(xs)) => xs.push(value),
                _ => {
                    self.values.insert(slot, SecretValue::List(vec![value]));
                }
            },
        }
        true
    }

    pub fn get(&self, slot: SecretSlot) -> Option<&SecretValue> {
        self.values.get(&slot)
    }

    /// Single value for `slot`, if present.
    pub fn single(&self, slot: SecretSlot) -> Option<&str> {
        self.get(slot).and_then(SecretValue::as_single)
    }

    /// Single value for `slot`, or `fallback` when absent.
    pub fn single_or<'a>(&'a self, slot: SecretSlot, fallback: &'a str) -> &'a str {
        self.single(slot).unwrap_or(fallback)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SecretSlot, &SecretValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How a source key name is matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyMatcher {
    Exact(&'static str),
    Prefix(&'static str),
}

impl KeyMatcher {
    pub fn matches(self, key: &str) -> bool {
        match self {
            KeyMatcher::Exact(name) => key == name,
            KeyMatcher::Prefix(prefix) => key.starts_with(prefix),
        }
    }
}

/// Maps a source `.env` key to a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceRule {
    pub matcher: KeyMatcher,
    pub slot: SecretSlot,
    /// Overrides the slot's policy for values coming through this rule.
    pub policy: Option<MergePolicy>,
}

impl SourceRule {
    pub fn policy(&self) -> MergePolicy {
        self.policy.unwrap_or(self.slot.policy())
    }

    const fn with_policy(self, policy: MergePolicy) -> Self {
        SourceRule {
            policy: Some(policy),
            ..self
        }
    }
}

const fn exact(name: &'static str, slot: SecretSlot) -> SourceRule {
    SourceRule {
        matcher: KeyMatcher::Exact(name),
        slot,
        policy: None,
    }
}

const fn prefix(prefix: &'static str, slot: SecretSlot) -> SourceRule {
    SourceRule {
        matcher: KeyMatcher::Prefix(prefix),
        slot,
        policy: None,
    }
}

/// Keys recognized in the IKAR `.env`.
///
/// IKAR is read first; its OpenRouter keys replace each other within the file,
/// and the resulting value is the one later sources cannot displace.
pub const IKAR_RULES: &[SourceRule] = &[
    exact("OPENROUTER_API_KEY", SecretSlot::OpenAiApiKey).with_policy(MergePolicy::Last),
    exact("OPENROUTER_API_KEY1", SecretSlot::OpenAiApiKey).with_policy(MergePolicy::Last),
    exact("TELEGRAM_BOT_TOKEN", SecretSlot::TelegramBotToken),
    exact("LLM_API", SecretSlot::LlmApi),
    prefix("ELEVEN_API", SecretSlot::ElevenApiKeys),
];

/// Keys recognized in the telegram_parser `.env`.
pub const PARSER_RULES: &[SourceRule] = &[
    exact("TG_API_ID", SecretSlot::ApiId),
    exact("TG_API_HASH", SecretSlot::ApiHash),
    prefix("OPENROUTER_API_KEY", SecretSlot::OpenAiApiKey),
];

/// First rule whose matcher accepts `key`.
pub fn find_rule<'a>(rules: &'a [SourceRule], key: &str) -> Option<&'a SourceRule> {
    rules.iter().find(|r| r.matcher.matches(key))
}
