//! Core types for the connection status library
//!
//! This module defines the connection identity, the per-connection flow
//! indicator series handed over by the summary source, and the sparse
//! status events produced by the detector.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the library
///
/// Simulator report dates carry no time zone, so a naive date-time is used.
pub type Timestamp = NaiveDateTime;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, StatusError>;

/// Maximum length of an Eclipse well name
pub const MAX_WELL_NAME_LEN: usize = 8;

/// Errors that can occur while reading summaries or extracting status changes
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("Connection {connection}: {timestamps} timestamps but {values} values")]
    LengthMismatch {
        connection: ConnectionId,
        timestamps: usize,
        values: usize,
    },

    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    #[error("Invalid flow indicator keyword {0}")]
    InvalidKeyword(String),

    #[error("Malformed summary file: {0}")]
    SummaryFormat(String),

    #[error("Required keyword {keyword} not found in {file}")]
    MissingKeyword { keyword: String, file: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Open/shut status of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Shut,
}

impl Status {
    /// The literal token written to output tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Shut => "SHUT",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a well-to-grid-cell connection
///
/// Ordering is by (well, i, j, k), which is the order the aggregator
/// processes connections in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId {
    /// Well name (1-8 characters of `A-Z a-z 0-9 _ -`)
    pub well: String,
    pub i: u32,
    pub j: u32,
    pub k: u32,
}

impl ConnectionId {
    /// Create a validated connection identity
    pub fn new(well: impl Into<String>, i: u32, j: u32, k: u32) -> Result<Self> {
        let well = well.into();
        if !is_valid_well_name(&well) {
            return Err(StatusError::InvalidConnection(format!(
                "well name {:?} must be 1-{} characters of letters, digits, '_' or '-'",
                well, MAX_WELL_NAME_LEN
            )));
        }
        if i == 0 || j == 0 || k == 0 {
            return Err(StatusError::InvalidConnection(format!(
                "cell ({},{},{}) of well {} is not 1-based",
                i, j, k, well
            )));
        }
        Ok(Self { well, i, j, k })
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{},{}", self.well, self.i, self.j, self.k)
    }
}

/// Check a well name against the restricted Eclipse alphabet
pub fn is_valid_well_name(well: &str) -> bool {
    !well.is_empty()
        && well.len() <= MAX_WELL_NAME_LEN
        && well
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// One connection's flow indicator history
///
/// `timestamps` and `values` are index-aligned. The aggregator checks the
/// lengths before scanning; nothing here enforces it so that upstream data
/// problems surface as [`StatusError::LengthMismatch`] at processing time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSeries {
    pub id: ConnectionId,
    pub timestamps: Vec<Timestamp>,
    pub values: Vec<f64>,
}

impl ConnectionSeries {
    pub fn new(id: ConnectionId, timestamps: Vec<Timestamp>, values: Vec<f64>) -> Self {
        Self {
            id,
            timestamps,
            values,
        }
    }

    /// Number of observations (the shorter side if the series is malformed)
    pub fn len(&self) -> usize {
        self.timestamps.len().min(self.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail with [`StatusError::LengthMismatch`] unless both sides are aligned
    pub fn check_aligned(&self) -> Result<()> {
        if self.timestamps.len() != self.values.len() {
            return Err(StatusError::LengthMismatch {
                connection: self.id.clone(),
                timestamps: self.timestamps.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }
}

/// One row of the sparse status log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub date: Timestamp,
    pub well: String,
    pub i: u32,
    pub j: u32,
    pub k: u32,
    pub status: Status,
}

impl StatusEvent {
    /// Tag a detected change with the owning connection's identity
    pub fn new(id: &ConnectionId, date: Timestamp, status: Status) -> Self {
        Self {
            date,
            well: id.well.clone(),
            i: id.i,
            j: id.j,
            k: id.k,
            status,
        }
    }
}
