//! Character offset ranges
//!
//! DWUG encodes target-token and sentence positions as `start:end` character
//! offsets into the use context.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{KgError, Result};

/// Half-open character range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: u32,
    pub end: u32,
}

impl OffsetRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Parse `"start:end"`.
    ///
    /// Exactly one colon, two non-negative integers, `start <= end`.
    /// `location` names the offending cell in the error.
    pub fn parse(value: &str, location: &str) -> Result<Self> {
        let malformed = || KgError::MalformedRange {
            location: location.to_string(),
            value: value.to_string(),
        };

        let (start, end) = value.split_once(':').ok_or_else(malformed)?;
        let start: u32 = start.parse().map_err(|_| malformed())?;
        let end: u32 = end.parse().map_err(|_| malformed())?;

        if start > end {
            return Err(malformed());
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_parse_valid() {
        let range = OffsetRange::parse("12:19", "x").unwrap();
        assert_eq!(range, OffsetRange::new(12, 19));
        assert_eq!(range.len(), 7);
        assert_eq!(range.to_string(), "12:19");
        assert!(OffsetRange::parse("0:0", "x").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        for bad in ["", "12", "12:", ":19", "a:b", "1:2:3", "-1:4", "19:12", " 1:2"] {
            let err = OffsetRange::parse(bad, "foo/uses.csv").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_error_names_value_and_location() {
        let err = OffsetRange::parse("7-9", "circle/uses.csv identifier 's1'").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'7-9'"));
        assert!(msg.contains("circle/uses.csv identifier 's1'"));
    }
}
