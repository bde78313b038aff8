//! End-to-end tests: binary summary files to status events

mod common;

use chrono::{Duration, NaiveDate};
use common::{write_case, Vector};
use std::fs;
use wellconn_status::{
    Aggregator, Status, StatusConfig, StatusError, SummaryCase, Timestamp,
};

const TIMES: [f32; 7] = [0.0, 31.0, 60.0, 91.0, 121.0, 152.0, 182.0];

fn vectors() -> Vec<Vector<'static>> {
    vec![
        Vector { keyword: "TIME", wgname: ":+:+:+:+", num: 0, unit: "DAYS" },
        Vector { keyword: "CPI", wgname: "OP_1", num: 1, unit: "" },
        Vector { keyword: "CPI", wgname: "INJ", num: 11, unit: "" },
        Vector { keyword: "CPI", wgname: "OP_2", num: 5, unit: "" },
        Vector { keyword: "WOPR", wgname: "OP_1", num: 0, unit: "SM3/DAY" },
        Vector { keyword: "FOPT", wgname: ":+:+:+:+", num: 0, unit: "SM3" },
    ]
}

fn rows() -> Vec<Vec<f32>> {
    let op1 = [0.0, 0.0, 5.0, 5.0, 0.0, 3.0, 0.0];
    (0..TIMES.len())
        .map(|t| vec![TIMES[t], op1[t], 7.0, 0.0, 100.0, 10.0 * t as f32])
        .collect()
}

fn date(days: f32) -> Timestamp {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(days as i64)
}

#[test]
fn test_case_to_status_log() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let datafile = write_case(dir.path(), (3, 2, 2), &[1, 1, 2000], &vectors(), &rows());

    let case = SummaryCase::load(&datafile).unwrap();
    assert_eq!(case.dates().len(), 7);
    assert_eq!(case.dates()[2], date(60.0));
    assert!(case.vector("WOPR:OP_1").is_some());
    assert!(case.vector("CPI:INJ:2,2,2").is_some());

    let series = case.connection_series("CPI").unwrap();
    assert_eq!(series.len(), 3);

    let events = Aggregator::new(StatusConfig::new()).aggregate(&series).unwrap();
    let rows: Vec<_> = events
        .iter()
        .map(|e| (e.date, e.well.as_str(), (e.i, e.j, e.k), e.status))
        .collect();

    assert_eq!(
        rows,
        vec![
            (date(0.0), "INJ", (2, 2, 2), Status::Open),
            (date(60.0), "OP_1", (1, 1, 1), Status::Open),
            (date(121.0), "OP_1", (1, 1, 1), Status::Shut),
            (date(152.0), "OP_1", (1, 1, 1), Status::Open),
            (date(182.0), "OP_1", (1, 1, 1), Status::Shut),
        ]
    );
}

#[test]
fn test_parallel_case_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let datafile = write_case(dir.path(), (3, 2, 2), &[1, 1, 2000], &vectors(), &rows());
    let series = SummaryCase::load(&datafile).unwrap().connection_series("CPI").unwrap();

    let sequential = Aggregator::default().aggregate(&series).unwrap();
    let parallel = Aggregator::new(StatusConfig::new().with_parallel(true))
        .aggregate(&series)
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_missing_time_vector() {
    let dir = tempfile::tempdir().unwrap();
    let vectors = vec![Vector { keyword: "CPI", wgname: "OP_1", num: 1, unit: "" }];
    let rows = vec![vec![1.0], vec![0.0]];
    let datafile = write_case(dir.path(), (1, 1, 1), &[1, 1, 2000], &vectors, &rows);

    let err = SummaryCase::load(&datafile).unwrap_err();
    assert!(matches!(err, StatusError::MissingKeyword { ref keyword, .. } if keyword == "TIME"));
}

#[test]
fn test_truncated_unsmry() {
    let dir = tempfile::tempdir().unwrap();
    let datafile = write_case(dir.path(), (3, 2, 2), &[1, 1, 2000], &vectors(), &rows());

    let unsmry = dir.path().join("CASE.UNSMRY");
    let bytes = fs::read(&unsmry).unwrap();
    fs::write(&unsmry, &bytes[..bytes.len() - 6]).unwrap();

    let err = SummaryCase::load(&datafile).unwrap_err();
    assert!(matches!(err, StatusError::SummaryFormat(_)));
}

#[test]
fn test_short_params_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = rows();
    rows[3].pop();
    let datafile = write_case(dir.path(), (3, 2, 2), &[1, 1, 2000], &vectors(), &rows);

    let err = SummaryCase::load(&datafile).unwrap_err();
    assert!(matches!(err, StatusError::SummaryFormat(_)));
}

#[test]
fn test_case_without_connections() {
    let dir = tempfile::tempdir().unwrap();
    let vectors = vec![
        Vector { keyword: "TIME", wgname: ":+:+:+:+", num: 0, unit: "DAYS" },
        Vector { keyword: "FOPT", wgname: ":+:+:+:+", num: 0, unit: "SM3" },
    ];
    let rows = vec![vec![0.0, 0.0], vec![1.0, 5.0]];
    let datafile = write_case(dir.path(), (1, 1, 1), &[1, 1, 2000], &vectors, &rows);

    let series = SummaryCase::load(&datafile).unwrap().connection_series("CPI").unwrap();
    assert!(series.is_empty());
    assert!(Aggregator::default().aggregate(&series).unwrap().is_empty());
}
