//! Node colors
//!
//! Annotation labels are colored by how much their judgments disagree, read
//! from the `num_labels` export. Annotators and labels without a row are red.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const ANNOTATOR_COLOR: &str = "#f20c1f";

const DISTINCT_COLORS: [(&str, &str); 5] = [
    ("1", "#168ff2"),
    ("2", "#ff7f00"),
    ("3", "#1fed18"),
    ("4", "#f781bf"),
    ("5", "#fafa43"),
];

const RANGE_COLORS: [(&str, &str); 5] = [
    ("0", "#0730b8"),
    ("1", "#9e4603"),
    ("2", "#039c12"),
    ("3", "#cf086f"),
    ("4", "#9c038d"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Bucket by number of distinct categories (1..=5)
    Distinct,
    /// Bucket by max - min category (0..=4)
    Range,
}

impl ColorMode {
    pub const ALL: [ColorMode; 2] = [ColorMode::Distinct, ColorMode::Range];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Distinct => "distinct",
            ColorMode::Range => "range",
        }
    }

    fn buckets(&self) -> &'static [(&'static str, &'static str); 5] {
        match self {
            ColorMode::Distinct => &DISTINCT_COLORS,
            ColorMode::Range => &RANGE_COLORS,
        }
    }

    /// Color of one `num_labels` row, `None` when the value is off the scale
    pub fn color_for(&self, row: &NumLabelsRow) -> Option<&'static str> {
        let value = match self {
            ColorMode::Distinct => row.num_distinct_lbls.trim(),
            ColorMode::Range => row.range.trim(),
        };
        self.buckets()
            .iter()
            .find(|(bucket, _)| *bucket == value)
            .map(|(_, color)| *color)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        let title = match self {
            ColorMode::Distinct => "distinct labels",
            ColorMode::Range => "label range",
        };
        let mut entries: Vec<LegendEntry> = self
            .buckets()
            .iter()
            .map(|(bucket, color)| LegendEntry {
                label: format!("{} {}", bucket, title),
                color: color.to_string(),
            })
            .collect();
        entries.push(LegendEntry {
            label: "annotator".to_string(),
            color: ANNOTATOR_COLOR.to_string(),
        });
        entries
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distinct" => Ok(ColorMode::Distinct),
            "range" => Ok(ColorMode::Range),
            other => Err(format!("unknown color mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// One row of `num_labels.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumLabelsRow {
    pub annotation_lbl: String,
    pub num_distinct_lbls: String,
    pub num_total_lbls: String,
    pub range: String,
}

/// Annotation label -> color, red for anything unlisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    colors: BTreeMap<String, String>,
}

impl ColorMap {
    pub fn from_rows(mode: ColorMode, rows: &[NumLabelsRow]) -> Self {
        let colors = rows
            .iter()
            .filter_map(|row| {
                mode.color_for(row)
                    .map(|color| (row.annotation_lbl.clone(), color.to_string()))
            })
            .collect();
        Self { colors }
    }

    pub fn color(&self, label: &str) -> &str {
        self.colors
            .get(label)
            .map(String::as_str)
            .unwrap_or(ANNOTATOR_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
