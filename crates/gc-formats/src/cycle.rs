//! Cycle-marker files: per-minute accept/reject review output.
//!
//! Tab-separated with the fixed header `seans\tcycle\tzabrak\tpopravka`:
//! session index, cycle index, reject flag (0/1), correction placeholder.
//! The same four-column layout is what the export aggregator writes back.

use std::path::{Path, PathBuf};

use crate::error::FormatError;

/// Fixed header shared by cycle-marker inputs and correction exports.
pub const CYCLE_HEADER: &str = "seans\tcycle\tzabrak\tpopravka";

/// One accept/reject marker row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleMarker {
    /// Link index within the chain.
    pub session: i64,
    /// Minute index within the link.
    pub cycle: i64,
    pub is_bad: bool,
    pub correction: f64,
}

/// Path of the reviewed cycle-marker file belonging to a chain file: same
/// directory, `chain` filename prefix replaced with `cycles`.
#[must_use]
pub fn cycle_file_for(chain_path: &Path) -> PathBuf {
    let name = chain_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let marker_name = name
        .strip_prefix("chain")
        .map_or_else(|| format!("cycles_{name}"), |rest| format!("cycles{rest}"));
    chain_path.with_file_name(marker_name)
}

/// Parse a cycle-marker file.
///
/// # Errors
///
/// `WrongFormat` when the header row does not match, `Malformed` for rows
/// that do not parse.
pub fn parse_cycle_file(path: &Path) -> Result<Vec<CycleMarker>, FormatError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
    let mut lines = content.lines();

    if lines.next().map(str::trim_end) != Some(CYCLE_HEADER) {
        return Err(FormatError::wrong_format(path, "cycle-marker"));
    }

    let mut markers = Vec::new();
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            return Err(FormatError::malformed(path, format!("short row: {line}")));
        }
        let parse_err =
            |e: &dyn std::fmt::Display| FormatError::malformed(path, format!("bad row '{line}': {e}"));
        markers.push(CycleMarker {
            session: fields[0].parse().map_err(|e| parse_err(&e))?,
            cycle: fields[1].parse().map_err(|e| parse_err(&e))?,
            is_bad: match fields[2] {
                "0" => false,
                "1" => true,
                other => {
                    return Err(FormatError::malformed(
                        path,
                        format!("reject flag must be 0 or 1, got {other}"),
                    ));
                }
            },
            correction: fields[3].parse().map_err(|e| parse_err(&e))?,
        });
    }
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marker_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain_K07_2021-09-06.txt");
        std::fs::write(
            &path,
            "seans\tcycle\tzabrak\tpopravka\n0\t0\t0\t0.0\n0\t1\t1\t0.0\n1\t0\t0\t-0.0042\n",
        )
        .unwrap();

        let markers = parse_cycle_file(&path).unwrap();
        assert_eq!(markers.len(), 3);
        assert!(markers[1].is_bad);
        assert_eq!(markers[2].session, 1);
        assert_eq!(markers[2].correction, -0.0042);
    }

    #[test]
    fn marker_path_mirrors_chain_name() {
        assert_eq!(
            cycle_file_for(Path::new("/data/chains/chain_K07_2021-09-06.txt")),
            PathBuf::from("/data/chains/cycles_K07_2021-09-06.txt")
        );
    }

    #[test]
    fn wrong_header_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "a\tb\tc\td\n0\t0\t0\t0\n").unwrap();
        assert!(matches!(
            parse_cycle_file(&path),
            Err(FormatError::WrongFormat { .. })
        ));
    }

    #[test]
    fn non_binary_flag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_flag.txt");
        std::fs::write(&path, "seans\tcycle\tzabrak\tpopravka\n0\t0\t2\t0.0\n").unwrap();
        assert!(matches!(
            parse_cycle_file(&path),
            Err(FormatError::Malformed { .. })
        ));
    }
}
