//! CG-6 `.dat` gravimetric minute files.
//!
//! Layout: a 21-line instrument header (first line carries the `CG-6 Survey`
//! signature, the third line ends with the device serial number), then one
//! tab-separated row per minute: station, date, time, corrected gravity
//! value, trailing instrument columns.
//!
//! A file whose minute stamps are not uniformly 60 seconds apart is rejected
//! wholesale; it yields an error, not a partial record.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};

use crate::error::FormatError;

pub const DAT_EXTENSION: &str = "dat";
const DAT_HEADER_FIRST_LINE: &str = "/\t\tCG-6 Survey";
const DAT_FIRST_LINE_INDEX: usize = 21;
const SERIAL_LINE_INDEX: usize = 2;

/// One parsed gravimetric minute file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatRecord {
    pub path: PathBuf,
    pub device_number: String,
    pub station: String,
    pub datetime_start: NaiveDateTime,
    pub datetime_stop: NaiveDateTime,
    /// (timestamp, corrected gravity value), uniformly 60 s apart.
    pub measures: Vec<(NaiveDateTime, f64)>,
}

/// Whether a file carries the CG-6 survey header signature.
pub fn is_dat_file(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .map(|content| {
            content
                .lines()
                .next()
                .is_some_and(|line| line.trim_end() == DAT_HEADER_FIRST_LINE)
        })
        .unwrap_or(false)
}

impl DatRecord {
    /// Parse a `.dat` file, validating the 60-second minute grid.
    ///
    /// # Errors
    ///
    /// `WrongFormat` when the extension or header signature does not match;
    /// `Malformed` for truncated headers, unparseable rows, or non-uniform
    /// minute spacing.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        if path.extension().and_then(|e| e.to_str()) != Some(DAT_EXTENSION) {
            return Err(FormatError::wrong_format(path, "dat"));
        }

        let content = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.first().copied() != Some(DAT_HEADER_FIRST_LINE) {
            return Err(FormatError::wrong_format(path, "dat"));
        }
        if lines.len() <= DAT_FIRST_LINE_INDEX {
            return Err(FormatError::malformed(path, "header-only file"));
        }

        let device_number = lines[SERIAL_LINE_INDEX]
            .split('\t')
            .next_back()
            .unwrap_or_default()
            .to_string();
        if device_number.is_empty() {
            return Err(FormatError::malformed(path, "missing device serial"));
        }

        let mut measures = Vec::new();
        let mut station = String::new();
        for line in &lines[DAT_FIRST_LINE_INDEX..] {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 4 {
                return Err(FormatError::malformed(path, format!("short row: {line}")));
            }
            let datetime_val =
                NaiveDateTime::parse_from_str(&format!("{} {}", fields[1], fields[2]), "%Y-%m-%d %H:%M:%S")
                    .map_err(|e| FormatError::malformed(path, format!("bad timestamp: {e}")))?;
            let value: f64 = fields[3]
                .parse()
                .map_err(|e| FormatError::malformed(path, format!("bad gravity value: {e}")))?;
            station = fields[0].to_string();
            measures.push((datetime_val, value));
        }

        if measures.is_empty() {
            return Err(FormatError::malformed(path, "no measure rows"));
        }
        if !is_uniform_minute_grid(&measures) {
            return Err(FormatError::malformed(
                path,
                "minute stamps are not uniformly 60 s apart",
            ));
        }

        // The instrument stamps the end of each averaging minute.
        let datetime_start = measures[0].0 - Duration::minutes(1);
        let datetime_stop = measures[measures.len() - 1].0;

        Ok(Self {
            path: path.to_path_buf(),
            device_number,
            station,
            datetime_start,
            datetime_stop,
            measures,
        })
    }
}

fn is_uniform_minute_grid(measures: &[(NaiveDateTime, f64)]) -> bool {
    measures
        .windows(2)
        .all(|w| (w[1].0 - w[0].0).num_seconds() == 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn write_dat(dir: &Path, name: &str, minutes: &[(&str, f64)]) -> PathBuf {
        let mut body = String::new();
        body.push_str("/\t\tCG-6 Survey\n");
        body.push_str("/\tSurvey Name:\tS1081\n");
        body.push_str("/\tInstrument Serial Number:\tCG6-0041\n");
        for _ in 3..21 {
            body.push_str("/\theader\n");
        }
        for (time, value) in minutes {
            writeln!(body, "1081\t2021-09-06\t{time}\t{value}\t0.1\t0.2").unwrap();
        }
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parses_uniform_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dat(
            dir.path(),
            "a.dat",
            &[
                ("03:10:00", 2567.001),
                ("03:11:00", 2567.002),
                ("03:12:00", 2567.003),
            ],
        );

        let record = DatRecord::open(&path).unwrap();
        assert_eq!(record.device_number, "CG6-0041");
        assert_eq!(record.station, "1081");
        assert_eq!(record.measures.len(), 3);
        // Start is one minute before the first stamp.
        assert_eq!(
            record.datetime_stop - record.datetime_start,
            Duration::minutes(3)
        );
    }

    #[test]
    fn gap_rejects_file_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        // Gap: 03:10, 03:11, 03:13 (missing 03:12).
        let path = write_dat(
            dir.path(),
            "gap.dat",
            &[
                ("03:10:00", 2567.001),
                ("03:11:00", 2567.002),
                ("03:13:00", 2567.003),
            ],
        );

        let result = DatRecord::open(&path);
        assert!(matches!(result, Err(FormatError::Malformed { .. })));
    }

    #[test]
    fn wrong_signature_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.dat");
        std::fs::write(&path, "not a survey\n").unwrap();
        assert!(matches!(
            DatRecord::open(&path),
            Err(FormatError::WrongFormat { .. })
        ));
        assert!(!is_dat_file(&path));
    }

    #[test]
    fn non_dat_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.txt");
        std::fs::write(&path, "/\t\tCG-6 Survey\n").unwrap();
        assert!(matches!(
            DatRecord::open(&path),
            Err(FormatError::WrongFormat { .. })
        ));
    }
}
