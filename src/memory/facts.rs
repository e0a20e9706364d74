use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Category of user-asserted information the extractor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    Name,
    Identity,
    Fact,
    Repeat,
    Feeling,
}

impl FactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactKind::Name => "name",
            FactKind::Identity => "identity",
            FactKind::Fact => "fact",
            FactKind::Repeat => "repeat",
            FactKind::Feeling => "feeling",
        }
    }
}

/// What a rule pulled out of an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    Text(String),
    Flag,
}

/// How a rule turns a triggered utterance into a value.
enum Capture {
    /// First capture group, trimmed. Misses when the pattern does not match.
    Pattern(Regex),
    /// Presence of any trigger is the whole fact.
    Flag,
}

/// One independent extraction rule: a cheap substring trigger followed by
/// the capture that produces the value.
struct ExtractionRule {
    kind: FactKind,
    triggers: &'static [&'static str],
    capture: Capture,
}

impl ExtractionRule {
    fn text(kind: FactKind, triggers: &'static [&'static str], pattern: &str) -> Self {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("built-in pattern for {} is invalid: {e}", kind.as_str()));
        Self {
            kind,
            triggers,
            capture: Capture::Pattern(regex),
        }
    }

    fn flag(kind: FactKind, triggers: &'static [&'static str]) -> Self {
        Self {
            kind,
            triggers,
            capture: Capture::Flag,
        }
    }

    fn apply(&self, original: &str, lower: &str) -> Option<FactValue> {
        if !self.triggers.iter().any(|t| lower.contains(t)) {
            return None;
        }
        match &self.capture {
            Capture::Flag => Some(FactValue::Flag),
            Capture::Pattern(regex) => {
                let value = regex.captures(original)?.get(1)?.as_str().trim();
                Some(FactValue::Text(value.to_string()))
            }
        }
    }
}

const FEELING_PHRASES: &[&str] = &["great", "not so well", "upset", "not sure how i feel"];

static RULES: LazyLock<Vec<ExtractionRule>> = LazyLock::new(|| {
    vec![
        ExtractionRule::text(FactKind::Name, &["my name is"], r"my name is ([\w\s]+)"),
        ExtractionRule::text(FactKind::Identity, &["you are"], r"you are ([\w\s]+)"),
        ExtractionRule::text(FactKind::Fact, &["learn", "fact"], r"learn\.? (.+)"),
        ExtractionRule::text(
            FactKind::Repeat,
            &["repeat after me"],
            r"repeat after me: (.+)",
        ),
        ExtractionRule::flag(FactKind::Feeling, FEELING_PHRASES),
    ]
});

/// Facts found in a single utterance. At most one value per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFacts {
    values: BTreeMap<FactKind, FactValue>,
}

impl ExtractedFacts {
    pub fn get(&self, kind: FactKind) -> Option<&FactValue> {
        self.values.get(&kind)
    }

    /// Captured text for `kind`, if any.
    pub fn text(&self, kind: FactKind) -> Option<&str> {
        match self.values.get(&kind) {
            Some(FactValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn contains(&self, kind: FactKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn kinds(&self) -> impl Iterator<Item = FactKind> + '_ {
        self.values.keys().copied()
    }
}

/// Extract facts from an utterance using the built-in rule table.
///
/// Rules recognized (case-insensitive):
/// - "my name is X"
/// - "you are X"
/// - "learn X" / "learn. X"
/// - "repeat after me: X"
/// - a feeling phrase ("great", "upset", ...)
///
/// A rule whose trigger is present but whose pattern does not match is
/// simply absent from the result.
pub fn extract_facts(utterance: &str) -> ExtractedFacts {
    let lower = utterance.to_lowercase();
    let mut facts = ExtractedFacts::default();

    for rule in RULES.iter() {
        if let Some(value) = rule.apply(utterance, &lower) {
            facts.values.entry(rule.kind).or_insert(value);
        }
    }

    if !facts.is_empty() {
        debug!(kinds = ?facts.values.keys().collect::<Vec<_>>(), "extracted facts");
    }
    facts
}

/// A fact the session has learned about the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedFact {
    pub value: String,
    pub learned_at: DateTime<Utc>,
}

/// Most recently learned value per fact kind. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactTable {
    facts: BTreeMap<FactKind, LearnedFact>,
}

impl FactTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any earlier one of the same kind.
    pub fn learn(&mut self, kind: FactKind, value: impl Into<String>) {
        let value = value.into();
        debug!(kind = kind.as_str(), value = %value, "learned fact");
        self.facts.insert(
            kind,
            LearnedFact {
                value,
                learned_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, kind: FactKind) -> Option<&str> {
        self.facts.get(&kind).map(|f| f.value.as_str())
    }

    pub fn entry(&self, kind: FactKind) -> Option<&LearnedFact> {
        self.facts.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactKind, &LearnedFact)> {
        self.facts.iter().map(|(k, v)| (*k, v))
    }
}
