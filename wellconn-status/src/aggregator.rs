//! Connection aggregation
//!
//! Runs the transition detector over every connection of a case and
//! concatenates the tagged events into one ordered collection. Events of one
//! connection stay contiguous and in chronological order.

use crate::config::StatusConfig;
use crate::types::{ConnectionSeries, Result, StatusEvent};
use rayon::prelude::*;

/// Aggregates status events over all connections of a case
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: StatusConfig,
}

impl Aggregator {
    /// Create an aggregator with the given configuration
    pub fn new(config: StatusConfig) -> Self {
        Self { config }
    }

    /// Configuration this aggregator was built with
    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Build the sparse status log for a set of connections
    ///
    /// Fails with `LengthMismatch` on the first connection whose timestamps
    /// and values are not aligned; nothing is returned for the other
    /// connections in that case.
    pub fn aggregate(&self, series: &[ConnectionSeries]) -> Result<Vec<StatusEvent>> {
        let mut ordered: Vec<&ConnectionSeries> = series.iter().collect();
        if self.config.sort_connections {
            ordered.sort_by(|a, b| a.id.cmp(&b.id));
        }

        let per_connection: Vec<Vec<StatusEvent>> = if self.config.parallel {
            ordered
                .par_iter()
                .map(|s| connection_events(s))
                .collect::<Result<_>>()?
        } else {
            ordered
                .iter()
                .map(|s| connection_events(s))
                .collect::<Result<_>>()?
        };

        let total = per_connection.iter().map(Vec::len).sum();
        let mut events = Vec::with_capacity(total);
        for chunk in per_connection {
            events.extend(chunk);
        }

        Ok(events)
    }
}

/// Aggregate with the default configuration (sorted, sequential)
pub fn aggregate(series: &[ConnectionSeries]) -> Result<Vec<StatusEvent>> {
    Aggregator::default().aggregate(series)
}

/// Detect and tag the events of a single connection
pub fn connection_events(series: &ConnectionSeries) -> Result<Vec<StatusEvent>> {
    Ok(series
        .status_changes()?
        .map(|(date, status)| StatusEvent::new(&series.id, date, status))
        .collect())
}
