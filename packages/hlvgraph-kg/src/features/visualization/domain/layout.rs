//! Force-directed layout
//!
//! Fruchterman-Reingold over an undirected `petgraph` graph. Nodes repel each
//! other with `k² / d`, edges attract with `d² / k`, and the step size cools
//! linearly to zero over the configured iterations. Start positions are
//! derived from a BLAKE3 hash of each node key, so the same graph always gets
//! the same layout.

use std::collections::BTreeMap;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;

/// Node key -> `[x, y]`
pub type Positions = BTreeMap<String, [f64; 2]>;

const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub iterations: usize,
    pub k: f64,
    pub scale: f64,
}

impl From<&LayoutConfig> for LayoutParams {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            iterations: config.iterations,
            k: config.optimal_distance,
            scale: config.scale,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        (&LayoutConfig::default()).into()
    }
}

/// Graph to lay out; node keys are unique strings
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    graph: UnGraph<String, ()>,
    index: BTreeMap<String, NodeIndex>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, key: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(key) {
            return *idx;
        }
        let idx = self.graph.add_node(key.to_string());
        self.index.insert(key.to_string(), idx);
        idx
    }

    /// Adds both endpoints as needed; parallel edges are collapsed
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        if a != b && self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Content hash of the node set, edge set and layout parameters
    pub fn fingerprint(&self, params: &LayoutParams) -> String {
        let mut hasher = blake3::Hasher::new();
        for key in self.index.keys() {
            hasher.update(b"n\0");
            hasher.update(key.as_bytes());
            hasher.update(b"\n");
        }

        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (self.graph[a].as_str(), self.graph[b].as_str());
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        edges.sort_unstable();
        for (a, b) in edges {
            hasher.update(b"e\0");
            hasher.update(a.as_bytes());
            hasher.update(b"\0");
            hasher.update(b.as_bytes());
            hasher.update(b"\n");
        }

        hasher.update(
            format!("p\0{}\0{}\0{}", params.iterations, params.k, params.scale).as_bytes(),
        );
        hasher.finalize().to_hex().to_string()
    }
}

/// Deterministic start position in `[0, 1)²`
fn seed_position(key: &str) -> [f64; 2] {
    let hash = blake3::hash(key.as_bytes());
    let bytes = hash.as_bytes();
    let mut x = [0u8; 8];
    let mut y = [0u8; 8];
    x.copy_from_slice(&bytes[0..8]);
    y.copy_from_slice(&bytes[8..16]);
    // 53 significant bits -> uniform in [0, 1)
    let unit = |raw: [u8; 8]| (u64::from_le_bytes(raw) >> 11) as f64 / (1u64 << 53) as f64;
    [unit(x), unit(y)]
}

pub fn spring_layout(graph: &LayoutGraph, params: &LayoutParams) -> Positions {
    let g = &graph.graph;
    let n = g.node_count();
    let mut positions = Positions::new();

    if n == 0 {
        return positions;
    }
    if n == 1 {
        for key in graph.index.keys() {
            positions.insert(key.clone(), [0.0, 0.0]);
        }
        return positions;
    }

    let mut pos: Vec<[f64; 2]> = g.node_indices().map(|i| seed_position(&g[i])).collect();
    let neighbors: Vec<Vec<usize>> = g
        .node_indices()
        .map(|i| g.neighbors(i).map(|j| j.index()).collect())
        .collect();

    let k = params.k;
    let extent = |pos: &[[f64; 2]]| {
        let (mut min_x, mut max_x, mut min_y, mut max_y) =
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in pos {
            min_x = min_x.min(p[0]);
            max_x = max_x.max(p[0]);
            min_y = min_y.min(p[1]);
            max_y = max_y.max(p[1]);
        }
        (max_x - min_x).max(max_y - min_y)
    };
    let mut t = extent(&pos) * 0.1;
    let dt = t / (params.iterations as f64 + 1.0);

    let mut disp = vec![[0.0f64; 2]; n];
    for _ in 0..params.iterations {
        for d in disp.iter_mut() {
            *d = [0.0, 0.0];
        }

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let repulse = k * k / (dist * dist);
                disp[i][0] += dx * repulse;
                disp[i][1] += dy * repulse;
            }
            for &j in &neighbors[i] {
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let attract = dist / k;
                disp[i][0] -= dx * attract;
                disp[i][1] -= dy * attract;
            }
        }

        for i in 0..n {
            let length = (disp[i][0] * disp[i][0] + disp[i][1] * disp[i][1])
                .sqrt()
                .max(MIN_DISTANCE);
            pos[i][0] += disp[i][0] * t / length;
            pos[i][1] += disp[i][1] * t / length;
        }
        t -= dt;
    }

    rescale(&mut pos, params.scale);
    for i in g.node_indices() {
        positions.insert(g[i].clone(), pos[i.index()]);
    }
    positions
}

/// Center on the mean and scale so the largest coordinate magnitude is `scale`
fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut lim = 0.0f64;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] *= scale / lim;
            p[1] *= scale / lim;
        }
    }
}
