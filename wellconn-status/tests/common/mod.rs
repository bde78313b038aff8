//! Writers for Eclipse binary summary fixtures

use byteorder::{BigEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf};

const NUMERIC_BLOCK: usize = 1000;
const STRING_BLOCK: usize = 105;

fn record(out: &mut Vec<u8>, body: &[u8]) {
    out.write_i32::<BigEndian>(body.len() as i32).unwrap();
    out.extend_from_slice(body);
    out.write_i32::<BigEndian>(body.len() as i32).unwrap();
}

fn header(out: &mut Vec<u8>, keyword: &str, count: usize, tag: &str) {
    let mut body = format!("{:<8}", keyword).into_bytes();
    body.write_i32::<BigEndian>(count as i32).unwrap();
    body.extend_from_slice(tag.as_bytes());
    record(out, &body);
}

pub fn write_ints(out: &mut Vec<u8>, keyword: &str, values: &[i32]) {
    header(out, keyword, values.len(), "INTE");
    for block in values.chunks(NUMERIC_BLOCK) {
        let mut body = Vec::new();
        for v in block {
            body.write_i32::<BigEndian>(*v).unwrap();
        }
        record(out, &body);
    }
}

pub fn write_reals(out: &mut Vec<u8>, keyword: &str, values: &[f32]) {
    header(out, keyword, values.len(), "REAL");
    for block in values.chunks(NUMERIC_BLOCK) {
        let mut body = Vec::new();
        for v in block {
            body.write_f32::<BigEndian>(*v).unwrap();
        }
        record(out, &body);
    }
}

pub fn write_chars(out: &mut Vec<u8>, keyword: &str, values: &[&str]) {
    header(out, keyword, values.len(), "CHAR");
    for block in values.chunks(STRING_BLOCK) {
        let body: Vec<u8> = block
            .iter()
            .flat_map(|s| format!("{:<8}", s).into_bytes())
            .collect();
        record(out, &body);
    }
}

/// One summary vector of a fixture case
pub struct Vector<'a> {
    pub keyword: &'a str,
    pub wgname: &'a str,
    pub num: i32,
    pub unit: &'a str,
}

/// Write CASE.SMSPEC and CASE.UNSMRY into `dir`, returning the CASE.DATA path
///
/// `rows` holds one PARAMS row per ministep, in `vectors` order.
pub fn write_case(
    dir: &Path,
    dims: (i32, i32, i32),
    startdat: &[i32],
    vectors: &[Vector],
    rows: &[Vec<f32>],
) -> PathBuf {
    let mut smspec = Vec::new();
    write_ints(&mut smspec, "INTEHEAD", &[1, 100]);
    write_ints(
        &mut smspec,
        "DIMENS",
        &[vectors.len() as i32, dims.0, dims.1, dims.2, 0, -1],
    );
    let keywords: Vec<&str> = vectors.iter().map(|v| v.keyword).collect();
    write_chars(&mut smspec, "KEYWORDS", &keywords);
    let wgnames: Vec<&str> = vectors.iter().map(|v| v.wgname).collect();
    write_chars(&mut smspec, "WGNAMES", &wgnames);
    let nums: Vec<i32> = vectors.iter().map(|v| v.num).collect();
    write_ints(&mut smspec, "NUMS", &nums);
    let units: Vec<&str> = vectors.iter().map(|v| v.unit).collect();
    write_chars(&mut smspec, "UNITS", &units);
    write_ints(&mut smspec, "STARTDAT", startdat);

    let mut unsmry = Vec::new();
    for (step, row) in rows.iter().enumerate() {
        write_ints(&mut unsmry, "SEQHDR", &[step as i32]);
        write_ints(&mut unsmry, "MINISTEP", &[step as i32]);
        write_reals(&mut unsmry, "PARAMS", row);
    }

    fs::write(dir.join("CASE.SMSPEC"), smspec).unwrap();
    fs::write(dir.join("CASE.UNSMRY"), unsmry).unwrap();
    dir.join("CASE.DATA")
}
