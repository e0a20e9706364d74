use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::ResponseConfig;
use crate::error::{Error, Result};
use crate::markov::{AdjacencyModel, sample_phrase};
use crate::memory::facts::{FactKind, FactTable, extract_facts};
use crate::memory::log::MemoryLog;

/// Reply templates. `{name}` and `{fact}` are the only placeholders.
#[derive(Debug, Clone)]
pub struct ResponseTemplates {
    pub identity: String,
    pub generic: String,
    pub name_ack: String,
    pub fact_ack: String,
    pub feelings: Vec<String>,
}

impl ResponseTemplates {
    pub fn from_config(config: &ResponseConfig) -> Result<Self> {
        if config.feelings.is_empty() {
            return Err(Error::Config(
                "at least one feeling response is required".into(),
            ));
        }
        Ok(Self {
            identity: config.identity.clone(),
            generic: config.generic.clone(),
            name_ack: config.name_ack.clone(),
            fact_ack: config.fact_ack.clone(),
            feelings: config.feelings.clone(),
        })
    }
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        let config = ResponseConfig::default();
        Self {
            identity: config.identity,
            generic: config.generic,
            name_ack: config.name_ack,
            fact_ack: config.fact_ack,
            feelings: config.feelings,
        }
    }
}

/// Which branch produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    NameLearned,
    FactLearned,
    Repeat,
    Feeling,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
}

/// Compose the reply to one utterance.
///
/// Priority, first match wins:
/// 1. name learned -> acknowledgment
/// 2. fact learned -> acknowledgment (an identity, if present, is stored first)
/// 3. repeat request -> captured text verbatim
/// 4. feeling phrase -> random canned feeling reply
/// 5. otherwise a template prefix plus a phrase sampled from `log`
///
/// Only branches 1 and 2 (and the identity side effect) touch `facts`.
/// The log is read, never written.
pub fn compose<R: Rng + ?Sized>(
    utterance: &str,
    log: &MemoryLog,
    facts: &mut FactTable,
    templates: &ResponseTemplates,
    rng: &mut R,
) -> Reply {
    let extracted = extract_facts(utterance);

    if let Some(name) = extracted.text(FactKind::Name) {
        facts.learn(FactKind::Name, name);
        return Reply {
            text: templates.name_ack.replace("{name}", name),
            kind: ReplyKind::NameLearned,
        };
    }

    // Stored, but never answered on its own.
    if let Some(identity) = extracted.text(FactKind::Identity) {
        facts.learn(FactKind::Identity, identity);
    }

    if let Some(fact) = extracted.text(FactKind::Fact) {
        facts.learn(FactKind::Fact, fact);
        return Reply {
            text: templates.fact_ack.replace("{fact}", fact),
            kind: ReplyKind::FactLearned,
        };
    }

    if let Some(text) = extracted.text(FactKind::Repeat) {
        return Reply {
            text: text.to_string(),
            kind: ReplyKind::Repeat,
        };
    }

    if extracted.contains(FactKind::Feeling) {
        if let Some(feeling) = templates.feelings.choose(rng) {
            return Reply {
                text: feeling.clone(),
                kind: ReplyKind::Feeling,
            };
        }
    }

    let mut text = match facts.get(FactKind::Name) {
        Some(name) => templates.identity.replace("{name}", name),
        None => templates.generic.clone(),
    };

    let model = AdjacencyModel::build(log.iter());
    let phrase = sample_phrase(&model, rng);
    debug!(model_words = model.len(), phrase = %phrase, "generated phrase");
    if !phrase.is_empty() {
        text.push(' ');
        text.push_str(&phrase);
    }

    Reply {
        text: text.trim().to_string(),
        kind: ReplyKind::Generated,
    }
}
