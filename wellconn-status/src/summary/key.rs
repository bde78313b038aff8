//! Summary vector key naming
//!
//! Completion vectors are named `KEYWORD:WELL:I,J,K`, e.g. `CPI:OP_1:12,4,7`.
//! Connection discovery accepts exactly that shape, with an upper-case well
//! name of at most eight characters.

use crate::types::{ConnectionId, Result, StatusError};
use regex::Regex;

/// Format a completion vector key
pub fn completion_key(keyword: &str, well: &str, i: u32, j: u32, k: u32) -> String {
    format!("{}:{}:{},{},{}", keyword, well, i, j, k)
}

/// Compiled matcher for the connection keys of one keyword
#[derive(Debug, Clone)]
pub struct ConnectionKeyPattern {
    regex: Regex,
}

impl ConnectionKeyPattern {
    /// Compile the pattern `^KEYWORD:WELL:I,J,K$` for `keyword`
    pub fn new(keyword: &str) -> Result<Self> {
        let pattern = format!(
            r"^{}:([A-Z0-9_-]{{1,8}}):([0-9]+),([0-9]+),([0-9]+)$",
            regex::escape(keyword)
        );
        let regex = Regex::new(&pattern).map_err(|e| {
            StatusError::InvalidKeyword(format!("{:?}: {}", keyword, e))
        })?;
        Ok(Self { regex })
    }

    /// Parse a key as a connection, or `None` for any other vector
    ///
    /// Zero cell coordinates are rejected since grid cells are 1-based.
    pub fn parse(&self, key: &str) -> Option<ConnectionId> {
        let caps = self.regex.captures(key)?;
        let coord = |n: usize| caps.get(n)?.as_str().parse::<u32>().ok();
        ConnectionId::new(&caps[1], coord(2)?, coord(3)?, coord(4)?).ok()
    }
}

/// Parse a single key as a connection of the given keyword
///
/// Compiles the pattern on every call; use [`ConnectionKeyPattern`] when
/// scanning many keys.
pub fn parse_connection_key(key: &str, keyword: &str) -> Option<ConnectionId> {
    ConnectionKeyPattern::new(keyword).ok()?.parse(key)
}
