use std::collections::VecDeque;

use crate::error::{Error, Result};

/// Bounded FIFO log of past utterances. This is the corpus the adjacency
/// model is rebuilt from on every generation request.
///
/// Length never exceeds `max_size`; when an append overflows the log the
/// single oldest entry rolls off and the rest keep their order.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    max_size: usize,
    entries: VecDeque<String>,
}

impl MemoryLog {
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(Error::Config("memory size must be > 0".into()));
        }
        Ok(Self {
            max_size,
            entries: VecDeque::with_capacity(max_size + 1),
        })
    }

    /// Build a log from prior history, keeping only the newest `max_size`
    /// non-blank lines.
    pub fn seeded<I, S>(max_size: usize, history: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut log = Self::new(max_size)?;
        for line in history {
            let line = line.into();
            if line.trim().is_empty() {
                continue;
            }
            log.entries.push_back(line);
            if log.entries.len() > max_size {
                log.entries.pop_front();
            }
        }
        Ok(log)
    }

    /// Record an utterance as the most recent entry, then bound the log.
    pub fn append(&mut self, utterance: impl Into<String>) {
        self.entries.push_back(utterance.into());
        self.bound();
    }

    /// Drop the oldest entry if the log is over capacity. Removes at most
    /// one entry since each append grows the log by exactly one.
    pub fn bound(&mut self) -> Option<String> {
        if self.entries.len() > self.max_size {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_is_noop_under_capacity() {
        let mut log = MemoryLog::new(2).unwrap();
        log.entries.push_back("a".into());
        assert_eq!(log.bound(), None);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn bound_removes_only_one_entry() {
        let mut log = MemoryLog::new(1).unwrap();
        log.entries.extend(["a".to_string(), "b".into(), "c".into()]);
        assert_eq!(log.bound().as_deref(), Some("a"));
        assert_eq!(log.len(), 2);
    }
}
