//! Semantic relatedness judgment scale

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{KgError, Result};

/// DURel relatedness category (codes 0..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Undecidable = 0,
    Unrelated = 1,
    DistantlyRelated = 2,
    CloselyRelated = 3,
    Identical = 4,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Undecidable,
        Category::Unrelated,
        Category::DistantlyRelated,
        Category::CloselyRelated,
        Category::Identical,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Undecidable => "Undecidable",
            Category::Unrelated => "Unrelated",
            Category::DistantlyRelated => "Distantly Related",
            Category::CloselyRelated => "Closely Related",
            Category::Identical => "Identical",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Parse the `judgment` column: exactly one of `0`..`4`
    pub fn parse(value: &str, location: &str) -> Result<Self> {
        let unrecognized = || KgError::UnrecognizedCategory {
            location: location.to_string(),
            value: value.to_string(),
        };
        match value.as_bytes() {
            [digit @ b'0'..=b'4'] => Self::from_code(digit - b'0').ok_or_else(unrecognized),
            _ => Err(unrecognized()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
