//! `.tsf` gravimetric continuous second files.
//!
//! A 42-line text header, then one row per second: six integer datetime
//! fields followed by ten 10 Hz signal samples. Only the device number part
//! (leading filename component) and the time range matter for ingestion;
//! TSF files do not take part in intersections.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::FormatError;

pub const TSF_EXTENSION: &str = "tsf";
const TSF_FIRST_LINE_INDEX: usize = 42;
const TSF_SIGNAL_FREQUENCY: i64 = 10;

/// One parsed `.tsf` file (range only; the signal itself is not retained).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsfRecord {
    pub path: PathBuf,
    pub dev_num_part: String,
    pub datetime_start: NaiveDateTime,
    pub datetime_stop: NaiveDateTime,
}

impl TsfRecord {
    /// Parse a `.tsf` file header and time range.
    ///
    /// # Errors
    ///
    /// `WrongFormat` for a non-tsf extension, `Malformed` for truncated or
    /// unparseable content.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        if path.extension().and_then(|e| e.to_str()) != Some(TSF_EXTENSION) {
            return Err(FormatError::wrong_format(path, "tsf"));
        }

        let content = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() <= TSF_FIRST_LINE_INDEX {
            return Err(FormatError::malformed(path, "header-only file"));
        }

        let first = parse_line_datetime(path, lines[TSF_FIRST_LINE_INDEX])?;
        let last = parse_line_datetime(path, lines[lines.len() - 1])?;

        let dev_num_part = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('_').next())
            .unwrap_or_default()
            .to_string();
        if dev_num_part.is_empty() {
            return Err(FormatError::malformed(path, "missing device number part"));
        }

        // Each row stamps the end of its second; the first sample of the
        // first row lands 0.9 s before the stamp at 10 Hz.
        let datetime_start =
            first + Duration::milliseconds(-1000 + 1000 / TSF_SIGNAL_FREQUENCY);

        Ok(Self {
            path: path.to_path_buf(),
            dev_num_part,
            datetime_start,
            datetime_stop: last,
        })
    }
}

fn parse_line_datetime(path: &Path, line: &str) -> Result<NaiveDateTime, FormatError> {
    let fields: Vec<i64> = line
        .split_whitespace()
        .take(6)
        .map_while(|f| f.parse().ok())
        .collect();
    if fields.len() != 6 {
        return Err(FormatError::malformed(path, format!("bad datetime row: {line}")));
    }
    #[allow(clippy::cast_possible_truncation)]
    NaiveDate::from_ymd_opt(fields[0] as i32, fields[1] as u32, fields[2] as u32)
        .and_then(|d| d.and_hms_opt(fields[3] as u32, fields[4] as u32, fields[5] as u32))
        .ok_or_else(|| FormatError::malformed(path, format!("invalid datetime: {line}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn parses_range_and_device() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = String::new();
        for i in 0..42 {
            writeln!(body, "[header {i}]").unwrap();
        }
        writeln!(body, "2021 09 06 03 10 00 1 2 3 4 5 6 7 8 9 10").unwrap();
        writeln!(body, "2021 09 06 03 10 01 1 2 3 4 5 6 7 8 9 10").unwrap();
        let path = dir.path().join("0041_1081.tsf");
        std::fs::write(&path, body).unwrap();

        let record = TsfRecord::open(&path).unwrap();
        assert_eq!(record.dev_num_part, "0041");
        assert_eq!(
            record.datetime_stop,
            NaiveDate::from_ymd_opt(2021, 9, 6)
                .unwrap()
                .and_hms_opt(3, 10, 1)
                .unwrap()
        );
        // Start backs off to the first 10 Hz sample of the first row.
        assert_eq!(
            record.datetime_stop - record.datetime_start,
            Duration::milliseconds(1900)
        );
    }

    #[test]
    fn truncated_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0041_1081.tsf");
        std::fs::write(&path, "short\n").unwrap();
        assert!(matches!(
            TsfRecord::open(&path),
            Err(FormatError::Malformed { .. })
        ));
    }
}
