//! Summary data source
//!
//! Loads an Eclipse summary case (SMSPEC + unified UNSMRY) into named
//! vectors sharing one timestamp axis, and picks out the per-connection flow
//! indicator vectors that the aggregator consumes.

use crate::types::{ConnectionSeries, Result, StatusError, Timestamp};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub mod ecl;
pub mod key;
pub mod smspec;

pub use ecl::{EclArray, EclData, EclReader, EclType};
pub use key::{completion_key, parse_connection_key, ConnectionKeyPattern};
pub use smspec::SummarySpec;

/// Named summary vectors aligned to a shared date axis
#[derive(Debug, Clone, Default)]
pub struct SummaryCase {
    dates: Vec<Timestamp>,
    keys: Vec<String>,
    vectors: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl SummaryCase {
    /// Build a case from in-memory vectors
    ///
    /// Later duplicates of a key are ignored. Every vector must have one
    /// value per date.
    pub fn new(
        dates: Vec<Timestamp>,
        vectors: impl IntoIterator<Item = (String, Vec<f64>)>,
    ) -> Result<Self> {
        let mut case = Self {
            dates,
            ..Self::default()
        };
        for (key, values) in vectors {
            if values.len() != case.dates.len() {
                return Err(StatusError::SummaryFormat(format!(
                    "vector {} has {} values for {} dates",
                    key,
                    values.len(),
                    case.dates.len()
                )));
            }
            case.insert(key, values);
        }
        Ok(case)
    }

    /// Load the summary belonging to a case
    ///
    /// `case` may name the DATA file, either summary file, or the bare case
    /// path; `CASE.SMSPEC` and `CASE.UNSMRY` are read from alongside it.
    pub fn load(case: &Path) -> Result<Self> {
        let (smspec, unsmry) = summary_paths(case);
        Self::from_files(&smspec, &unsmry)
    }

    /// Load from explicit SMSPEC and UNSMRY paths
    pub fn from_files(smspec: &Path, unsmry: &Path) -> Result<Self> {
        log::info!("Loading summary specification: {:?}", smspec);
        let smspec_file = open(smspec)?;
        log::info!("Loading summary data: {:?}", unsmry);
        let unsmry_file = open(unsmry)?;
        Self::from_readers(BufReader::new(smspec_file), BufReader::new(unsmry_file))
    }

    /// Load from SMSPEC and UNSMRY byte streams
    pub fn from_readers<S: Read, U: Read>(spec_reader: S, data_reader: U) -> Result<Self> {
        let spec = SummarySpec::read(spec_reader)?;
        let columns = smspec::read_unsmry(data_reader, spec.len())?;

        let time_index = spec.index_of("TIME").ok_or_else(|| StatusError::MissingKeyword {
            keyword: "TIME".to_string(),
            file: "SMSPEC".to_string(),
        })?;
        let dates = columns[time_index]
            .iter()
            .map(|&elapsed| spec.timestamp(time_index, elapsed))
            .collect::<Result<Vec<_>>>()?;

        let mut case = Self {
            dates,
            ..Self::default()
        };
        for (index, values) in columns.into_iter().enumerate() {
            if let Some(key) = spec.key(index) {
                case.insert(key, values);
            }
        }

        log::info!(
            "Summary loaded: {} vectors over {} timesteps",
            case.keys.len(),
            case.dates.len()
        );
        Ok(case)
    }

    fn insert(&mut self, key: String, values: Vec<f64>) {
        if self.index.contains_key(&key) {
            log::debug!("Ignoring duplicate summary vector {}", key);
            return;
        }
        self.index.insert(key.clone(), self.keys.len());
        self.keys.push(key);
        self.vectors.push(values);
    }

    /// Shared timestamp axis
    pub fn dates(&self) -> &[Timestamp] {
        &self.dates
    }

    /// All vector keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn vector(&self, key: &str) -> Option<&[f64]> {
        self.index.get(key).map(|&i| self.vectors[i].as_slice())
    }

    /// Series for every vector whose key names a connection of `keyword`
    pub fn connection_series(&self, keyword: &str) -> Result<Vec<ConnectionSeries>> {
        let pattern = ConnectionKeyPattern::new(keyword)?;
        let series: Vec<_> = self
            .keys
            .iter()
            .zip(&self.vectors)
            .filter_map(|(key, values)| {
                let id = pattern.parse(key)?;
                Some(ConnectionSeries::new(id, self.dates.clone(), values.clone()))
            })
            .collect();

        log::info!(
            "Found {} {} connection vectors among {} summary vectors",
            series.len(),
            keyword,
            self.keys.len()
        );
        Ok(series)
    }
}

/// Resolve the SMSPEC and UNSMRY paths of a case
///
/// A `.DATA`, `.SMSPEC` or `.UNSMRY` extension is replaced; any other path is
/// treated as the case base name. Lower-case extensions give lower-case
/// summary extensions.
pub fn summary_paths(case: &Path) -> (PathBuf, PathBuf) {
    let ext = case.extension().and_then(|e| e.to_str());
    let known = ext.map_or(false, |e| {
        ["DATA", "SMSPEC", "UNSMRY"].contains(&e.to_ascii_uppercase().as_str())
    });
    let lower = known && ext.map_or(false, |e| e.chars().all(|c| c.is_ascii_lowercase()));
    let (smspec_ext, unsmry_ext) = if lower {
        ("smspec", "unsmry")
    } else {
        ("SMSPEC", "UNSMRY")
    };

    if known {
        (case.with_extension(smspec_ext), case.with_extension(unsmry_ext))
    } else {
        (append_extension(case, smspec_ext), append_extension(case, unsmry_ext))
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        StatusError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}
