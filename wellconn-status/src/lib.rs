//! Well Connection Status Library
//!
//! Converts dense per-timestep connection flow indicator vectors (`CPI`)
//! from reservoir simulation summaries into a sparse log holding only the
//! dates at which a connection opens or shuts.
//!
//! # Architecture
//!
//! - [`detector`]: lazy open/shut transition scan over one connection's series
//! - [`aggregator`]: runs the detector over every connection and tags events
//!   with the connection identity
//! - [`summary`]: reads Eclipse SMSPEC/UNSMRY files and picks out the
//!   connection vectors
//!
//! The detector and aggregator are pure transforms and log nothing. Writing
//! the resulting events (CSV, JSON) is left to the application layer
//! (wellconn-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use wellconn_status::{Aggregator, StatusConfig, SummaryCase};
//! use std::path::Path;
//!
//! let case = SummaryCase::load(Path::new("MODEL.DATA")).unwrap();
//! let config = StatusConfig::new().with_parallel(true);
//! let series = case.connection_series(&config.keyword).unwrap();
//!
//! let events = Aggregator::new(config).aggregate(&series).unwrap();
//! for event in events {
//!     println!("{} {} {},{},{} {}", event.date, event.well, event.i, event.j, event.k, event.status);
//! }
//! ```

// Public modules
pub mod aggregator;
pub mod config;
pub mod detector;
pub mod summary;
pub mod types;

// Re-export main types for convenience
pub use aggregator::{aggregate, connection_events, Aggregator};
pub use config::StatusConfig;
pub use detector::{status_changes, StatusChanges};
pub use summary::SummaryCase;
pub use types::{
    ConnectionId, ConnectionSeries, Result, Status, StatusError, StatusEvent, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
