use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::fs_util::home_dir;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SkybotConfig {
    pub memory: MemoryConfig,
    pub storage: StorageConfig,
    pub responses: ResponseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Maximum number of utterances kept as generation corpus.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
        }
    }
}

fn default_max_size() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the conversation log, diary, and fact snapshot.
    /// Defaults to `~/.skybot`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_conversation_file")]
    pub conversation_file: String,
    #[serde(default = "default_diary_file")]
    pub diary_file: String,
    /// When set, learned facts survive restarts.
    pub facts_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            conversation_file: default_conversation_file(),
            diary_file: default_diary_file(),
            facts_file: None,
        }
    }
}

fn default_conversation_file() -> String {
    "data.txt".into()
}
fn default_diary_file() -> String {
    "diary.txt".into()
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home_dir().unwrap_or_else(|_| PathBuf::from(".")).join(".skybot"))
    }

    pub fn conversation_path(&self) -> PathBuf {
        self.data_dir().join(&self.conversation_file)
    }

    pub fn diary_path(&self) -> PathBuf {
        self.data_dir().join(&self.diary_file)
    }

    pub fn facts_path(&self) -> Option<PathBuf> {
        self.facts_file.as_ref().map(|f| self.data_dir().join(f))
    }
}

/// Canned reply text. `{name}` and `{fact}` are substituted at reply time.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_identity")]
    pub identity: String,
    #[serde(default = "default_generic")]
    pub generic: String,
    #[serde(default = "default_name_ack")]
    pub name_ack: String,
    #[serde(default = "default_fact_ack")]
    pub fact_ack: String,
    #[serde(default = "default_feelings")]
    pub feelings: Vec<String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            identity: default_identity(),
            generic: default_generic(),
            name_ack: default_name_ack(),
            fact_ack: default_fact_ack(),
            feelings: default_feelings(),
        }
    }
}

fn default_greeting() -> String {
    "Hello! I'm Sky! Chat with me!".into()
}
fn default_identity() -> String {
    "Hi, I'm {name}! I am an AI language model developed by Tick Studios! \
     I am hoping to pass a Turing test someday. Want to ask me something?"
        .into()
}
fn default_generic() -> String {
    "I don't know much yet. Can you teach me something?".into()
}
fn default_name_ack() -> String {
    "Got it! I'll remember that your name is '{name}'.".into()
}
fn default_fact_ack() -> String {
    "Got it! I'll remember that: '{fact}'".into()
}
fn default_feelings() -> Vec<String> {
    vec![
        "It's great!".into(),
        "It's not so well.".into(),
        "I'm upset.".into(),
        "I'm not sure how I feel.".into(),
    ]
}

/// Load configuration from file or use defaults.
///
/// Search order:
/// 1. explicit path (`--config` / `SKYBOT_CONFIG`)
/// 2. `~/.skybot/config.toml`
/// 3. Zero-config defaults (no file needed)
pub fn load(explicit: Option<&Path>) -> Result<SkybotConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = parse(&content)
            .map_err(|e| Error::Config(format!("invalid config at {}: {e}", path.display())))?;

        info!("loaded config from {}", path.display());
        Ok(config)
    } else if explicit.is_some() {
        Err(Error::Config(format!(
            "config file {} does not exist",
            path.display()
        )))
    } else {
        info!("no config file found, using zero-config defaults");
        Ok(SkybotConfig::default())
    }
}

/// Parse and validate a TOML document.
pub fn parse(content: &str) -> Result<SkybotConfig> {
    let config: SkybotConfig =
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn default_config_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|_| PathBuf::from("."));
    home.join(".skybot").join("config.toml")
}

/// Validate the config and return clear error messages.
pub fn validate(config: &SkybotConfig) -> Result<()> {
    if config.memory.max_size == 0 {
        return Err(Error::Config("memory.max_size must be > 0".into()));
    }

    if config.responses.feelings.is_empty() {
        return Err(Error::Config(
            "responses.feelings must contain at least one reply".into(),
        ));
    }

    if config.storage.conversation_file.trim().is_empty()
        || config.storage.diary_file.trim().is_empty()
    {
        return Err(Error::Config(
            "storage.conversation_file and storage.diary_file must be non-empty".into(),
        ));
    }

    Ok(())
}
