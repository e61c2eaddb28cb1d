//! Edge matching, well-formedness and connected components.
//!
//! Every non-degenerate canonical edge is bucketed by its quantized start
//! point. An edge's partners are looked up in the 27 cells around the
//! point where a partner would start: its end for a reversed match, its
//! start for a same-direction duplicate.

use std::collections::HashMap;
use std::fmt;

use patchwork_math::{Point3, Tolerances};
use patchwork_patch::{boundary_edges, Edge, Patch};

/// A violation of the manifold rules found while matching edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyIssue {
    /// More than one edge runs backwards along this edge.
    Overmatched {
        /// Owning patch.
        patch: usize,
        /// Edge number within the patch.
        edge: usize,
        /// `(patch, edge)` of every matching edge.
        matches: Vec<(usize, usize)>,
    },
    /// Two edges of an oriented surface run the same way, so the patches
    /// touch without opposing.
    SameDirection {
        /// First patch.
        patch: usize,
        /// Edge number within the first patch.
        edge: usize,
        /// Second patch.
        other_patch: usize,
        /// Edge number within the second patch.
        other_edge: usize,
    },
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyIssue::Overmatched {
                patch,
                edge,
                matches,
            } => {
                write!(f, "patch {patch} edge {edge} is shared by {} edges:", matches.len())?;
                for (p, e) in matches {
                    write!(f, " {p}/{e}")?;
                }
                Ok(())
            }
            TopologyIssue::SameDirection {
                patch,
                edge,
                other_patch,
                other_edge,
            } => write!(
                f,
                "patch {patch} edge {edge} runs the same way as patch {other_patch} edge {other_edge}"
            ),
        }
    }
}

// =============================================================================
// Point buckets
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey {
    x: i64,
    y: i64,
    z: i64,
}

impl CellKey {
    fn from_point(p: &Point3, cell: f64) -> Self {
        Self {
            x: (p.x / cell).floor() as i64,
            y: (p.y / cell).floor() as i64,
            z: (p.z / cell).floor() as i64,
        }
    }
}

/// Indices bucketed by a quantized point.
pub(crate) struct PointGrid {
    cell: f64,
    buckets: HashMap<CellKey, Vec<usize>>,
}

impl PointGrid {
    pub(crate) fn new(cell: f64) -> Self {
        Self {
            cell,
            buckets: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, p: &Point3, index: usize) {
        self.buckets
            .entry(CellKey::from_point(p, self.cell))
            .or_default()
            .push(index);
    }

    /// Indices bucketed in the cell of `p` or any neighbouring cell.
    pub(crate) fn near(&self, p: &Point3) -> Vec<usize> {
        let k = CellKey::from_point(p, self.cell);
        let mut out = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = CellKey {
                        x: k.x + dx,
                        y: k.y + dy,
                        z: k.z + dz,
                    };
                    if let Some(bucket) = self.buckets.get(&key) {
                        out.extend_from_slice(bucket);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }
}

/// Bucket cell size for points of `edges`.
pub(crate) fn cell_size_for(edges: &[Edge], tol: &Tolerances) -> f64 {
    let scale = edges
        .iter()
        .flat_map(|e| e.points.iter())
        .fold(0.0_f64, |m, p| m.max(p.coords.amax()));
    tol.cell_size(scale)
}

// =============================================================================
// Edge analysis
// =============================================================================

/// Result of matching every edge of a surface.
pub(crate) struct EdgeAnalysis {
    /// Non-degenerate canonical edges with owner indices set.
    pub edges: Vec<Edge>,
    /// Accepted partners of each edge.
    pub matches: Vec<Vec<usize>>,
    pub issues: Vec<TopologyIssue>,
}

impl EdgeAnalysis {
    /// Edges no other edge matches.
    pub fn unmatched(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .zip(&self.matches)
            .filter(|(_, m)| m.is_empty())
            .map(|(e, _)| e)
    }
}

pub(crate) fn analyze(patches: &[Patch], oriented: bool, tol: &Tolerances) -> EdgeAnalysis {
    let edges: Vec<Edge> = patches
        .iter()
        .enumerate()
        .flat_map(|(index, patch)| {
            boundary_edges(patch).into_iter().map(move |mut e| {
                e.patch = index;
                e
            })
        })
        .filter(|e| !e.is_degenerate(tol))
        .collect();

    let mut grid = PointGrid::new(cell_size_for(&edges, tol));
    for (i, e) in edges.iter().enumerate() {
        grid.insert(&e.start(), i);
    }

    let mut matches = Vec::with_capacity(edges.len());
    let mut issues = Vec::new();
    for (i, e) in edges.iter().enumerate() {
        let reversed: Vec<usize> = grid
            .near(&e.end())
            .into_iter()
            .filter(|&j| j != i && e.matches_reversed(&edges[j], tol))
            .collect();
        let forward: Vec<usize> = grid
            .near(&e.start())
            .into_iter()
            .filter(|&j| j != i && e.matches_forward(&edges[j], tol))
            .collect();

        let accepted = if oriented {
            for &j in forward.iter().filter(|&&j| j > i) {
                issues.push(TopologyIssue::SameDirection {
                    patch: e.patch,
                    edge: e.number,
                    other_patch: edges[j].patch,
                    other_edge: edges[j].number,
                });
            }
            reversed
        } else {
            let mut all = reversed;
            all.extend(forward);
            all
        };
        if accepted.len() > 1 {
            issues.push(TopologyIssue::Overmatched {
                patch: e.patch,
                edge: e.number,
                matches: accepted
                    .iter()
                    .map(|&j| (edges[j].patch, edges[j].number))
                    .collect(),
            });
        }
        matches.push(accepted);
    }

    for issue in &issues {
        tracing::debug!(%issue, "topology issue");
    }
    EdgeAnalysis {
        edges,
        matches,
        issues,
    }
}

// =============================================================================
// Components
// =============================================================================

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], i: usize, j: usize) {
    let pi = find(parent, i);
    let pj = find(parent, j);
    if pi != pj {
        parent[pi.max(pj)] = pi.min(pj);
    }
}

/// Component label of every patch, numbered by lowest patch index, plus
/// the number of components.
pub(crate) fn component_labels(patch_count: usize, analysis: &EdgeAnalysis) -> (usize, Vec<usize>) {
    let mut parent: Vec<usize> = (0..patch_count).collect();
    for (e, partners) in analysis.edges.iter().zip(&analysis.matches) {
        for &j in partners {
            union(&mut parent, e.patch, analysis.edges[j].patch);
        }
    }
    let mut label_of_root = HashMap::new();
    let mut labels = Vec::with_capacity(patch_count);
    for i in 0..patch_count {
        let root = find(&mut parent, i);
        let next = label_of_root.len();
        labels.push(*label_of_root.entry(root).or_insert(next));
    }
    (label_of_root.len(), labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_grid_finds_neighbours_across_cells() {
        let mut grid = PointGrid::new(1.0);
        grid.insert(&Point3::new(0.999, 0.0, 0.0), 0);
        grid.insert(&Point3::new(1.001, 0.0, 0.0), 1);
        grid.insert(&Point3::new(5.0, 0.0, 0.0), 2);
        assert_eq!(grid.near(&Point3::new(1.0, 0.0, 0.0)), vec![0, 1]);
        assert_eq!(grid.near(&Point3::new(-0.5, 0.0, 0.0)), vec![0]);
    }

    #[test]
    fn test_union_find_labels_by_lowest_index() {
        let mut parent: Vec<usize> = (0..5).collect();
        union(&mut parent, 4, 1);
        union(&mut parent, 3, 2);
        union(&mut parent, 2, 4);
        assert_eq!(find(&mut parent, 3), 1);
        assert_eq!(find(&mut parent, 0), 0);
    }

    #[test]
    fn test_issue_display() {
        let issue = TopologyIssue::Overmatched {
            patch: 2,
            edge: 1,
            matches: vec![(0, 3), (5, 0)],
        };
        assert_eq!(issue.to_string(), "patch 2 edge 1 is shared by 2 edges: 0/3 5/0");
    }
}
