use serde::{Deserialize, Serialize};

/// Number of trailing serial digits used in export paths and TSF
/// cross-referencing.
const SHORT_NUMBER_LEN: usize = 4;

/// A physical gravimeter, identified by its full serial number.
///
/// Created on first observation; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gravimeter {
    pub id: i64,
    pub number: String,
}

impl Gravimeter {
    /// Short serial suffix used for file naming and cross-referencing.
    #[must_use]
    pub fn short_number(&self) -> &str {
        let start = self.number.len().saturating_sub(SHORT_NUMBER_LEN);
        &self.number[start..]
    }
}

/// A physical seismometer, identified by its serial/part number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seismometer {
    pub id: i64,
    pub number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_number_takes_trailing_digits() {
        let grav = Gravimeter {
            id: 1,
            number: "CG6-220541418".to_string(),
        };
        assert_eq!(grav.short_number(), "1418");
    }

    #[test]
    fn short_number_handles_short_serials() {
        let grav = Gravimeter {
            id: 1,
            number: "458".to_string(),
        };
        assert_eq!(grav.short_number(), "458");
    }
}
