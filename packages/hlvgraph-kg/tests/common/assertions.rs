//! Assertion helpers

use std::path::Path;

use hlvgraph_kg::GraphStore;

/// Both stores hold exactly the same triples
pub fn assert_same_triples(left: &impl GraphStore, right: &impl GraphStore) {
    let left = left.triples().expect("left triples");
    let right = right.triples().expect("right triples");
    pretty_assertions::assert_eq!(left, right);
}

/// CSV export as lines, header first
pub fn read_csv_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
        .lines()
        .map(str::to_string)
        .collect()
}
