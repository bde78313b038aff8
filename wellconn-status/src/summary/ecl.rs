//! Eclipse unformatted binary file reader
//!
//! Eclipse output files are a flat sequence of named arrays. Each array is
//! a 16-byte header record followed by its data records:
//!
//! ```text
//! [len=16] KEYWORD(8) COUNT(i32) TYPE(4) [len=16]
//! [len] data ... [len]   (repeated until COUNT elements are read)
//! ```
//!
//! Every record is framed by big-endian i32 byte counts, and all numeric
//! data is big-endian. Writers split data into blocks of 1000 numbers or
//! 105 strings, but the reader only relies on the record markers.

use crate::types::{Result, StatusError};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

/// Element type of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EclType {
    Inte,
    Real,
    Doub,
    Logi,
    /// Fixed-width string of the given byte length (`CHAR` is 8)
    Char(usize),
    Mess,
}

impl EclType {
    /// Parse the 4-character type tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "INTE" => Some(EclType::Inte),
            "REAL" => Some(EclType::Real),
            "DOUB" => Some(EclType::Doub),
            "LOGI" => Some(EclType::Logi),
            "CHAR" => Some(EclType::Char(8)),
            "MESS" => Some(EclType::Mess),
            _ => {
                let width = tag.strip_prefix("C0")?.parse::<usize>().ok()?;
                (width > 0).then_some(EclType::Char(width))
            }
        }
    }

    /// Size of one element in bytes
    pub fn element_size(&self) -> usize {
        match self {
            EclType::Inte | EclType::Real | EclType::Logi => 4,
            EclType::Doub => 8,
            EclType::Char(width) => *width,
            EclType::Mess => 0,
        }
    }
}

/// Decoded array payload
#[derive(Debug, Clone, PartialEq)]
pub enum EclData {
    Inte(Vec<i32>),
    Real(Vec<f32>),
    Doub(Vec<f64>),
    Logi(Vec<bool>),
    Char(Vec<String>),
    Mess,
}

impl EclData {
    pub fn len(&self) -> usize {
        match self {
            EclData::Inte(v) => v.len(),
            EclData::Real(v) => v.len(),
            EclData::Doub(v) => v.len(),
            EclData::Logi(v) => v.len(),
            EclData::Char(v) => v.len(),
            EclData::Mess => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named array read from a file
#[derive(Debug, Clone, PartialEq)]
pub struct EclArray {
    /// Keyword with trailing blanks removed
    pub keyword: String,
    pub data: EclData,
}

impl EclArray {
    pub fn as_ints(&self) -> Option<&[i32]> {
        match &self.data {
            EclData::Inte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match &self.data {
            EclData::Char(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric payload widened to f64 (REAL or DOUB arrays)
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match &self.data {
            EclData::Real(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            EclData::Doub(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Lazy reader over the arrays of an unformatted Eclipse file
pub struct EclReader<R: Read> {
    reader: R,
    finished: bool,
}

impl<R: Read> EclReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
        }
    }

    /// Read the next array, or `None` at a clean end of file
    fn read_array(&mut self) -> Result<Option<EclArray>> {
        // Only an end of file before the first marker byte is clean
        let mut marker = [0u8; 4];
        loop {
            match self.reader.read(&mut marker[..1]) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.read_exact(&mut marker[1..])?;
        let head = i32::from_be_bytes(marker);
        if head != 16 {
            return Err(format_error(format!(
                "expected 16-byte array header, found record of {} bytes",
                head
            )));
        }

        let mut keyword = [0u8; 8];
        self.read_exact(&mut keyword)?;
        let count = self.reader.read_i32::<BigEndian>().map_err(truncated)?;
        let mut tag = [0u8; 4];
        self.read_exact(&mut tag)?;
        self.expect_tail(head)?;

        let keyword = decode_string(&keyword);
        let tag = decode_string(&tag);
        let ecl_type = EclType::parse(&tag)
            .ok_or_else(|| format_error(format!("unknown type {:?} for {}", tag, keyword)))?;
        if count < 0 {
            return Err(format_error(format!(
                "negative element count {} for {}",
                count, keyword
            )));
        }

        let count = count as usize;
        let size = count.checked_mul(ecl_type.element_size()).ok_or_else(|| {
            format_error(format!("element count {} for {} is too large", count, keyword))
        })?;
        let payload = self.read_payload(size, &keyword)?;
        let data = decode_payload(ecl_type, count, &payload);

        log::trace!("Read {} ({} x {})", keyword, count, tag);
        Ok(Some(EclArray { keyword, data }))
    }

    /// Concatenate data records until `expected` bytes are collected
    ///
    /// `expected` comes from an untrusted header, so the buffer only grows
    /// as records actually arrive.
    fn read_payload(&mut self, expected: usize, keyword: &str) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        while payload.len() < expected {
            let len = self.reader.read_i32::<BigEndian>().map_err(truncated)?;
            if len <= 0 || payload.len() + len as usize > expected {
                return Err(format_error(format!(
                    "data record of {} bytes overruns {} ({} of {} bytes read)",
                    len,
                    keyword,
                    payload.len(),
                    expected
                )));
            }
            let start = payload.len();
            payload.resize(start + len as usize, 0);
            self.read_exact(&mut payload[start..])?;
            self.expect_tail(len)?;
        }
        Ok(payload)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf).map_err(truncated)
    }

    fn expect_tail(&mut self, head: i32) -> Result<()> {
        let tail = self.reader.read_i32::<BigEndian>().map_err(truncated)?;
        if tail != head {
            return Err(format_error(format!(
                "record marker mismatch: head {} tail {}",
                head, tail
            )));
        }
        Ok(())
    }
}

impl<R: Read> Iterator for EclReader<R> {
    type Item = Result<EclArray>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_array() {
            Ok(Some(array)) => Some(Ok(array)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                // Framing is lost after an error, so stop here
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn decode_payload(ecl_type: EclType, count: usize, payload: &[u8]) -> EclData {
    let mut cursor = payload;
    // Lengths were checked against the header, so reads below cannot fail
    match ecl_type {
        EclType::Inte => EclData::Inte(
            (0..count)
                .filter_map(|_| cursor.read_i32::<BigEndian>().ok())
                .collect(),
        ),
        EclType::Real => EclData::Real(
            (0..count)
                .filter_map(|_| cursor.read_f32::<BigEndian>().ok())
                .collect(),
        ),
        EclType::Doub => EclData::Doub(
            (0..count)
                .filter_map(|_| cursor.read_f64::<BigEndian>().ok())
                .collect(),
        ),
        EclType::Logi => EclData::Logi(
            (0..count)
                .filter_map(|_| cursor.read_i32::<BigEndian>().ok())
                .map(|v| v != 0)
                .collect(),
        ),
        EclType::Char(width) => {
            EclData::Char(payload.chunks(width).map(decode_string).collect())
        }
        EclType::Mess => EclData::Mess,
    }
}

fn decode_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

fn format_error(message: String) -> StatusError {
    StatusError::SummaryFormat(message)
}

fn truncated(e: io::Error) -> StatusError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        format_error("unexpected end of file inside a record".to_string())
    } else {
        StatusError::IoError(e)
    }
}
