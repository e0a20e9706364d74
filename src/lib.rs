//! skybot: a small conversational agent that learns simple facts about its
//! user and answers with phrases stitched together from its own memory.

pub mod composer;
pub mod config;
pub mod error;
pub mod fs_util;
pub mod markov;
pub mod memory;
pub mod session;
pub mod store;

pub use error::{Error, Result};
