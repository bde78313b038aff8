//! SMSPEC and UNSMRY parsing
//!
//! The SMSPEC file describes the summary vectors (one column per entry of
//! `KEYWORDS`); the unified UNSMRY file holds one `PARAMS` row per ministep.

use super::ecl::{EclArray, EclReader};
use super::key::completion_key;
use crate::types::{Result, StatusError, Timestamp};
use chrono::{Duration, NaiveDate};
use std::io::Read;

/// Well/group name used by Eclipse for vectors without a well
const DUMMY_WELL: &str = ":+:+:+:+";

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Parsed SMSPEC header
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySpec {
    /// Grid dimensions (nx, ny, nz)
    pub dims: (u32, u32, u32),
    /// Simulation start date
    pub start: Timestamp,
    pub keywords: Vec<String>,
    pub wgnames: Vec<String>,
    pub nums: Vec<i32>,
    pub units: Vec<String>,
}

impl SummarySpec {
    /// Read an SMSPEC file from any reader
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut dimens = None;
        let mut keywords = None;
        let mut wgnames = None;
        let mut nums = None;
        let mut units = None;
        let mut startdat = None;

        for array in EclReader::new(reader) {
            let array = array?;
            log::debug!("SMSPEC keyword {} ({} items)", array.keyword, array.data.len());
            match array.keyword.as_str() {
                "DIMENS" => dimens = Some(ints(&array)?),
                "KEYWORDS" => keywords = Some(strings(&array)?),
                "WGNAMES" | "NAMES" => wgnames = Some(strings(&array)?),
                "NUMS" => nums = Some(ints(&array)?),
                "UNITS" => units = Some(strings(&array)?),
                "STARTDAT" => startdat = Some(ints(&array)?),
                _ => {}
            }
        }

        let keywords = keywords.ok_or_else(|| missing("KEYWORDS"))?;
        let dimens = dimens.ok_or_else(|| missing("DIMENS"))?;
        let startdat = startdat.ok_or_else(|| missing("STARTDAT"))?;
        let nlist = keywords.len();

        if dimens.len() < 4 {
            return Err(StatusError::SummaryFormat(format!(
                "DIMENS has {} items, expected at least 4",
                dimens.len()
            )));
        }
        if dimens[0] as usize != nlist {
            log::warn!(
                "DIMENS declares {} vectors but KEYWORDS has {}",
                dimens[0],
                nlist
            );
        }

        let wgnames = wgnames.unwrap_or_else(|| vec![DUMMY_WELL.to_string(); nlist]);
        let nums = nums.unwrap_or_else(|| vec![0; nlist]);
        let units = units.unwrap_or_else(|| vec![String::new(); nlist]);
        for (name, len) in [
            ("WGNAMES", wgnames.len()),
            ("NUMS", nums.len()),
            ("UNITS", units.len()),
        ] {
            if len != nlist {
                return Err(StatusError::SummaryFormat(format!(
                    "{} has {} items but KEYWORDS has {}",
                    name, len, nlist
                )));
            }
        }

        Ok(Self {
            dims: (
                dimension(dimens[1])?,
                dimension(dimens[2])?,
                dimension(dimens[3])?,
            ),
            start: parse_startdat(&startdat)?,
            keywords,
            wgnames,
            nums,
            units,
        })
    }

    /// Number of vectors (columns in each PARAMS row)
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Column index of the first vector with the given key
    pub fn index_of(&self, key: &str) -> Option<usize> {
        (0..self.len()).find(|&index| self.key(index).as_deref() == Some(key))
    }

    /// Summary key of column `index`, or `None` for unnamed placeholders
    pub fn key(&self, index: usize) -> Option<String> {
        let keyword = self.keywords.get(index)?;
        let wgname = &self.wgnames[index];
        let num = self.nums[index];
        let has_well = !wgname.is_empty() && wgname != DUMMY_WELL;

        match keyword.chars().next()? {
            'C' if has_well && num > 0 => {
                let (i, j, k) = self.cell_ijk(num)?;
                Some(completion_key(keyword, wgname, i, j, k))
            }
            'C' => None,
            'W' | 'G' if has_well => Some(format!("{}:{}", keyword, wgname)),
            'W' | 'G' => None,
            'B' if num > 0 => {
                let (i, j, k) = self.cell_ijk(num)?;
                Some(format!("{}:{},{},{}", keyword, i, j, k))
            }
            'R' if num > 0 => Some(format!("{}:{}", keyword, num)),
            _ => Some(keyword.clone()),
        }
    }

    /// Convert a 1-based global cell index to 1-based (i, j, k)
    pub fn cell_ijk(&self, num: i32) -> Option<(u32, u32, u32)> {
        let (nx, ny, nz) = self.dims;
        if num <= 0 || nx == 0 || ny == 0 {
            return None;
        }
        // nx * ny can exceed u32 on large grids
        let (nx, ny) = (u64::from(nx), u64::from(ny));
        let g = (num - 1) as u64;
        let k = u32::try_from(g / (nx * ny) + 1).ok()?;
        if nz > 0 && k > nz {
            return None;
        }
        Some(((g % nx + 1) as u32, ((g / nx) % ny + 1) as u32, k))
    }

    /// Convert a TIME value to a timestamp, honouring the TIME unit
    pub fn timestamp(&self, time_index: usize, elapsed: f64) -> Result<Timestamp> {
        let scale = match self.units.get(time_index).map(String::as_str) {
            Some("HOURS") => MILLIS_PER_HOUR,
            _ => MILLIS_PER_DAY,
        };
        let millis = (elapsed * scale).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 / 2.0 {
            return Err(StatusError::SummaryFormat(format!(
                "TIME value {} is out of range",
                elapsed
            )));
        }
        self.start
            .checked_add_signed(Duration::milliseconds(millis as i64))
            .ok_or_else(|| {
                StatusError::SummaryFormat(format!("TIME value {} is out of range", elapsed))
            })
    }
}

/// Read all PARAMS rows of a unified summary file as columns
pub fn read_unsmry<R: Read>(reader: R, nlist: usize) -> Result<Vec<Vec<f64>>> {
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); nlist];
    let mut steps = 0usize;

    for array in EclReader::new(reader) {
        let array = array?;
        if array.keyword != "PARAMS" {
            continue;
        }
        let row = array.to_f64().ok_or_else(|| {
            StatusError::SummaryFormat("PARAMS is not a REAL or DOUB array".to_string())
        })?;
        if row.len() != nlist {
            return Err(StatusError::SummaryFormat(format!(
                "PARAMS row {} has {} values, expected {}",
                steps,
                row.len(),
                nlist
            )));
        }
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
        steps += 1;
    }

    log::debug!("Read {} ministeps of {} vectors", steps, nlist);
    Ok(columns)
}

fn parse_startdat(values: &[i32]) -> Result<Timestamp> {
    let field = |i: usize| values.get(i).copied().unwrap_or(0);
    let invalid = || StatusError::SummaryFormat(format!("invalid STARTDAT {:?}", values));

    if values.len() < 3 {
        return Err(invalid());
    }
    let (day, month, year) = (field(0), field(1), field(2));
    let (hour, minute, micros) = (field(3), field(4), field(5));
    if [day, month, hour, minute, micros].iter().any(|v| *v < 0) {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|date| {
            date.and_hms_micro_opt(
                hour as u32,
                minute as u32,
                (micros / 1_000_000) as u32,
                (micros % 1_000_000) as u32,
            )
        })
        .ok_or_else(invalid)
}

fn ints(array: &EclArray) -> Result<Vec<i32>> {
    array.as_ints().map(<[i32]>::to_vec).ok_or_else(|| {
        StatusError::SummaryFormat(format!("{} is not an INTE array", array.keyword))
    })
}

fn strings(array: &EclArray) -> Result<Vec<String>> {
    array.as_strings().map(<[String]>::to_vec).ok_or_else(|| {
        StatusError::SummaryFormat(format!("{} is not a string array", array.keyword))
    })
}

fn dimension(value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| StatusError::SummaryFormat(format!("negative grid dimension {}", value)))
}

fn missing(keyword: &str) -> StatusError {
    StatusError::MissingKeyword {
        keyword: keyword.to_string(),
        file: "SMSPEC".to_string(),
    }
}
