//! Status extraction configuration
//!
//! Minimal settings for connection discovery and aggregation. Output format
//! and file locations belong to the application layer.

use serde::{Deserialize, Serialize};

/// Summary keyword of the per-connection flow indicator
pub const DEFAULT_KEYWORD: &str = "CPI";

/// Configuration for status extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Summary keyword whose completion vectors denote connections
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Scan connections on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,

    /// Sort connections by (well, i, j, k) before scanning
    #[serde(default = "default_true")]
    pub sort_connections: bool,
}

fn default_keyword() -> String {
    DEFAULT_KEYWORD.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            parallel: false,
            sort_connections: true,
        }
    }
}

impl StatusConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the flow indicator keyword
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Builder method: enable or disable the parallel scan
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Builder method: keep the source order of connections instead of sorting
    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sort_connections = enabled;
        self
    }
}
