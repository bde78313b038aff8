//! Transition detection
//!
//! Scans one connection's flow indicator series and yields only the
//! timesteps where the connection changes between open and shut.
//!
//! A value is "flowing" when it is strictly greater than zero. Zero,
//! negative and NaN values all count as shut. The connection is taken to be
//! shut immediately before the first observation, so a series that is
//! already flowing at its first timestep opens there.

use crate::types::{ConnectionSeries, Result, Status, Timestamp};

/// Lazy iterator over the (date, status) changes of a single series
///
/// Cloning the iterator before it is consumed gives an independent rescan
/// of the same data.
#[derive(Debug, Clone)]
pub struct StatusChanges<'a> {
    timestamps: &'a [Timestamp],
    values: &'a [f64],
    index: usize,
    was_flowing: bool,
}

impl<'a> StatusChanges<'a> {
    /// Create a detector over index-aligned timestamps and values
    ///
    /// Callers must pass slices of equal length; only the common prefix is
    /// scanned otherwise. Use [`ConnectionSeries::status_changes`] to get the
    /// length check.
    pub fn new(timestamps: &'a [Timestamp], values: &'a [f64]) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            timestamps,
            values,
            index: 0,
            was_flowing: false,
        }
    }
}

impl<'a> Iterator for StatusChanges<'a> {
    type Item = (Timestamp, Status);

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.timestamps.len().min(self.values.len());

        while self.index < len {
            let t = self.index;
            self.index += 1;

            let flowing = is_flowing(self.values[t]);
            let change = match (self.was_flowing, flowing) {
                (false, true) => Some(Status::Open),
                (true, false) => Some(Status::Shut),
                _ => None,
            };
            self.was_flowing = flowing;

            if let Some(status) = change {
                return Some((self.timestamps[t], status));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.timestamps.len().min(self.values.len());
        (0, Some(len.saturating_sub(self.index)))
    }
}

impl std::iter::FusedIterator for StatusChanges<'_> {}

/// Flow indicator boundary: anything not strictly positive is shut
#[inline]
pub fn is_flowing(value: f64) -> bool {
    value > 0.0
}

/// Detect status changes over a pair of index-aligned slices
pub fn status_changes<'a>(timestamps: &'a [Timestamp], values: &'a [f64]) -> StatusChanges<'a> {
    StatusChanges::new(timestamps, values)
}

impl ConnectionSeries {
    /// Detect this connection's status changes
    ///
    /// Fails with `LengthMismatch` if timestamps and values are not aligned.
    pub fn status_changes(&self) -> Result<StatusChanges<'_>> {
        self.check_aligned()?;
        Ok(StatusChanges::new(&self.timestamps, &self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<Timestamp> {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|d| start + chrono::Duration::days(d as i64 * 30))
            .collect()
    }

    fn detect(values: &[f64]) -> Vec<(Timestamp, Status)> {
        let ts = dates(values.len());
        status_changes(&ts, values).collect()
    }

    fn statuses(values: &[f64]) -> Vec<(usize, Status)> {
        let ts = dates(values.len());
        status_changes(&ts, values)
            .map(|(date, status)| (ts.iter().position(|t| *t == date).unwrap(), status))
            .collect()
    }

    #[test]
    fn test_open_shut_reopen() {
        assert_eq!(
            statuses(&[0.0, 0.0, 5.0, 5.0, 0.0, 3.0, 0.0]),
            vec![
                (2, Status::Open),
                (4, Status::Shut),
                (5, Status::Open),
                (6, Status::Shut),
            ]
        );
    }

    #[test]
    fn test_never_open_is_empty() {
        assert!(detect(&[0.0, 0.0, 0.0, 0.0]).is_empty());
    }

    #[test]
    fn test_always_open_emits_single_open() {
        let ts = dates(3);
        let events: Vec<_> = status_changes(&ts, &[7.0, 7.0, 7.0]).collect();
        assert_eq!(events, vec![(ts[0], Status::Open)]);
    }

    #[test]
    fn test_alternating_every_step() {
        assert_eq!(
            statuses(&[5.0, 0.0, 5.0, 0.0]),
            vec![
                (0, Status::Open),
                (1, Status::Shut),
                (2, Status::Open),
                (3, Status::Shut),
            ]
        );
    }

    #[test]
    fn test_empty_series() {
        assert!(detect(&[]).is_empty());
    }

    #[test]
    fn test_value_changes_while_open_are_ignored() {
        assert_eq!(
            statuses(&[0.0, 1.0, 2.5, 0.1, 9.0]),
            vec![(1, Status::Open)]
        );
    }

    #[test]
    fn test_negative_and_nan_count_as_shut() {
        assert_eq!(
            statuses(&[-1.0, 2.0, -3.0, f64::NAN, 4.0]),
            vec![(1, Status::Open), (2, Status::Shut), (4, Status::Open)]
        );
        assert!(detect(&[-1.0, f64::NAN, 0.0]).is_empty());
    }

    #[test]
    fn test_rescan_is_identical() {
        let ts = dates(7);
        let values = [0.0, 0.0, 5.0, 5.0, 0.0, 3.0, 0.0];
        let detector = status_changes(&ts, &values);
        let first: Vec<_> = detector.clone().collect();
        let second: Vec<_> = detector.collect();
        assert_eq!(first, second);
        assert_eq!(first, status_changes(&ts, &values).collect::<Vec<_>>());
    }

    #[test]
    fn test_alternation_and_bound() {
        let values = [3.0, 0.0, 0.0, 1.0, 1.0, 0.0, 2.0, 0.0, 0.0, 8.0];
        let events = statuses(&values);
        assert!(events.len() <= values.len());
        assert_eq!(events[0].1, Status::Open);
        for pair in events.windows(2) {
            assert_ne!(pair[0].1, pair[1].1);
            assert!(pair[0].0 < pair[1].0);
        }
        // Series ends flowing, so the event count is odd
        assert_eq!(events.len() % 2, 1);
    }

    #[test]
    fn test_series_length_check() {
        let id = crate::types::ConnectionId::new("W1", 1, 1, 1).unwrap();
        let series = ConnectionSeries::new(id, dates(2), vec![1.0]);
        assert!(series.status_changes().is_err());
    }
}
