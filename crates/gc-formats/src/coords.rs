//! Station coordinate tables.
//!
//! Comma-separated rows of station name and WGS-84 x/y; column positions and
//! the number of leading rows to skip are caller-supplied, since survey
//! offices export these tables in varying shapes.

use std::path::Path;

use crate::error::FormatError;

/// One station coordinate row.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub station: String,
    pub x_wgs84: f64,
    pub y_wgs84: f64,
}

/// Column layout of a coordinate table.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateColumns {
    pub name: usize,
    pub x_wgs84: usize,
    pub y_wgs84: usize,
    pub skip_rows: usize,
}

impl Default for CoordinateColumns {
    fn default() -> Self {
        Self {
            name: 0,
            x_wgs84: 1,
            y_wgs84: 2,
            skip_rows: 1,
        }
    }
}

/// Parse a coordinate table.
///
/// # Errors
///
/// `Malformed` for rows missing the configured columns or non-numeric
/// coordinates.
pub fn parse_coordinates(
    path: &Path,
    columns: CoordinateColumns,
) -> Result<Vec<Coordinate>, FormatError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;

    let mut coords = Vec::new();
    for line in content.lines().skip(columns.skip_rows) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let needed = columns.name.max(columns.x_wgs84).max(columns.y_wgs84);
        if fields.len() <= needed {
            return Err(FormatError::malformed(path, format!("short row: {line}")));
        }
        let parse = |s: &str| -> Result<f64, FormatError> {
            s.parse()
                .map_err(|e| FormatError::malformed(path, format!("bad coordinate '{s}': {e}")))
        };
        coords.push(Coordinate {
            station: fields[columns.name].to_string(),
            x_wgs84: parse(fields[columns.x_wgs84])?,
            y_wgs84: parse(fields[columns.y_wgs84])?,
        });
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coords.csv");
        std::fs::write(&path, "name,x,y\n1081,61.25,73.39\n5014,60.95,72.80\n").unwrap();

        let coords = parse_coordinates(&path, CoordinateColumns::default()).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].station, "1081");
        assert_eq!(coords[1].y_wgs84, 72.80);
    }

    #[test]
    fn short_row_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coords.csv");
        std::fs::write(&path, "name,x,y\n1081,61.25\n").unwrap();
        assert!(parse_coordinates(&path, CoordinateColumns::default()).is_err());
    }
}
