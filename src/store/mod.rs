use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::fs_util::ensure_data_dir;
use crate::memory::facts::FactTable;

/// Durable side of a session: where past turns are read from at startup
/// and where each finished turn is written.
pub trait TranscriptStore {
    /// Prior conversation lines, oldest first. Empty when nothing exists yet.
    fn load_history(&self) -> Result<Vec<String>>;

    /// Append one finished turn to the conversation log and the diary.
    /// Both writes are attempted even if the first one fails.
    fn record_turn(&mut self, utterance: &str, reply: &str) -> Result<()>;

    /// Previously saved facts, if this store keeps them.
    fn load_facts(&self) -> Result<Option<FactTable>> {
        Ok(None)
    }

    /// Save the current fact table, if this store keeps one.
    fn save_facts(&mut self, _facts: &FactTable) -> Result<()> {
        Ok(())
    }
}

/// Plain-text, append-only files:
///
/// - conversation log: `User: ...` / `Bot: ...` line pairs
/// - diary: one narrative line per turn
/// - optional JSON fact snapshot
#[derive(Debug, Clone)]
pub struct FileStore {
    conversation_path: PathBuf,
    diary_path: PathBuf,
    facts_path: Option<PathBuf>,
}

impl FileStore {
    pub fn new(
        conversation_path: impl Into<PathBuf>,
        diary_path: impl Into<PathBuf>,
        facts_path: Option<PathBuf>,
    ) -> Self {
        Self {
            conversation_path: conversation_path.into(),
            diary_path: diary_path.into(),
            facts_path,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            config.conversation_path(),
            config.diary_path(),
            config.facts_path(),
        )
    }

    pub fn conversation_path(&self) -> &Path {
        &self.conversation_path
    }

    pub fn diary_path(&self) -> &Path {
        &self.diary_path
    }

    pub fn facts_path(&self) -> Option<&Path> {
        self.facts_path.as_deref()
    }
}

/// The narrative line written to the diary for one turn.
pub fn diary_entry(utterance: &str, reply: &str) -> String {
    format!("Diary Entry: User said: {utterance}. I responded with: {reply}")
}

fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    let persist_err = |source: std::io::Error| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_data_dir(parent).map_err(persist_err)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(persist_err)?;

    let mut buf = String::new();
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }
    file.write_all(buf.as_bytes()).map_err(persist_err)
}

impl TranscriptStore for FileStore {
    fn load_history(&self) -> Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.conversation_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::History {
                    path: self.conversation_path.clone(),
                    source,
                });
            }
        };

        let lines: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
        info!(
            path = %self.conversation_path.display(),
            lines = lines.len(),
            "loaded conversation history"
        );
        Ok(lines)
    }

    fn record_turn(&mut self, utterance: &str, reply: &str) -> Result<()> {
        let conversation = append_lines(
            &self.conversation_path,
            &[format!("User: {utterance}"), format!("Bot: {reply}")],
        );
        let diary = append_lines(&self.diary_path, &[diary_entry(utterance, reply)]);
        conversation.and(diary)?;
        debug!("recorded turn");
        Ok(())
    }

    fn load_facts(&self) -> Result<Option<FactTable>> {
        let Some(path) = &self.facts_path else {
            return Ok(None);
        };
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::History {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save_facts(&mut self, facts: &FactTable) -> Result<()> {
        let Some(path) = &self.facts_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_data_dir(parent).map_err(|source| Error::Persistence {
                path: path.clone(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(facts)?;
        std::fs::write(path, json).map_err(|source| Error::Persistence {
            path: path.clone(),
            source,
        })
    }
}
