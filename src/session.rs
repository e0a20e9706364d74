use rand::Rng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::composer::{Reply, ResponseTemplates, compose};
use crate::config::{self, SkybotConfig};
use crate::error::{Error, Result};
use crate::memory::MemoryStore;
use crate::memory::facts::FactTable;
use crate::store::TranscriptStore;

/// Utterances that end the conversation instead of getting a reply.
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

pub fn is_exit(utterance: &str) -> bool {
    let trimmed = utterance.trim();
    EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w))
}

/// Result of handing one utterance to the session.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The user asked to leave. Nothing was composed or persisted.
    Exit,
    /// The reply, plus any error from persisting the turn. The reply is
    /// valid either way and the utterance has been remembered.
    Reply {
        reply: Reply,
        persist_error: Option<Error>,
    },
}

impl TurnOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            TurnOutcome::Exit => None,
            TurnOutcome::Reply { reply, .. } => Some(&reply.text),
        }
    }
}

/// One user's conversation. Owns its memory, its store, and its source of
/// randomness; turns are processed one at a time.
pub struct Session<S: TranscriptStore, R: Rng = StdRng> {
    memory: MemoryStore,
    templates: ResponseTemplates,
    greeting: String,
    store: S,
    rng: R,
}

impl<S: TranscriptStore, R: Rng> Session<S, R> {
    /// Validate `config`, then seed memory from what `store` already holds.
    pub fn open(config: &SkybotConfig, store: S, rng: R) -> Result<Self> {
        config::validate(config)?;
        let templates = ResponseTemplates::from_config(&config.responses)?;

        let history = store.load_history()?;
        let facts = match store.load_facts() {
            Ok(facts) => facts.unwrap_or_default(),
            Err(err @ Error::Facts(_)) => {
                warn!(error = %err, "ignoring unreadable fact snapshot");
                FactTable::new()
            }
            Err(err) => return Err(err),
        };
        let memory = MemoryStore::restore(config.memory.max_size, history, facts)?;

        info!(
            remembered = memory.log.len(),
            max_size = memory.log.max_size(),
            facts = memory.facts.len(),
            "session opened"
        );

        Ok(Self {
            memory,
            templates,
            greeting: config.responses.greeting.clone(),
            store,
            rng,
        })
    }

    /// Process one utterance: compose the reply, persist the turn, then
    /// remember the utterance.
    pub fn turn(&mut self, utterance: &str) -> TurnOutcome {
        if is_exit(utterance) {
            info!("exit requested");
            return TurnOutcome::Exit;
        }

        let facts_before = self.memory.facts.clone();
        let reply = compose(
            utterance,
            &self.memory.log,
            &mut self.memory.facts,
            &self.templates,
            &mut self.rng,
        );

        let persist_error = self.persist(utterance, &reply.text, facts_before).err();
        if let Some(err) = &persist_error {
            warn!(error = %err, "failed to persist turn");
        }

        self.memory.remember(utterance);

        TurnOutcome::Reply {
            reply,
            persist_error,
        }
    }

    fn persist(
        &mut self,
        utterance: &str,
        reply: &str,
        facts_before: FactTable,
    ) -> Result<()> {
        // Every write is attempted; the first failure is reported.
        let recorded = self.store.record_turn(utterance, reply);
        let saved = if self.memory.facts != facts_before {
            self.store.save_facts(&self.memory.facts)
        } else {
            Ok(())
        };
        recorded.and(saved)
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
