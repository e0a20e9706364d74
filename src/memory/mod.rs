pub mod facts;
pub mod log;

use facts::FactTable;
use log::MemoryLog;

use crate::error::Result;

/// Everything the bot remembers during a session: the bounded utterance
/// log that feeds generation and the table of learned user facts.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    pub log: MemoryLog,
    pub facts: FactTable,
}

impl MemoryStore {
    /// Create an empty store holding at most `max_size` utterances.
    pub fn new(max_size: usize) -> Result<Self> {
        Ok(Self {
            log: MemoryLog::new(max_size)?,
            facts: FactTable::new(),
        })
    }

    /// Create a store seeded from prior conversation lines and facts.
    pub fn restore<I, S>(max_size: usize, history: I, facts: FactTable) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            log: MemoryLog::seeded(max_size, history)?,
            facts,
        })
    }

    /// Record a user utterance once its turn is finished.
    pub fn remember(&mut self, utterance: &str) {
        self.log.append(utterance);
    }
}
