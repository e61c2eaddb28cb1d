//! Disjoint partitioning of a surface iterator for parallel consumers.

use std::ops::Range;

use patchwork_patch::Patch;

use crate::error::{Result, SurfaceError};
use crate::iter::{SurfaceCursor, SurfaceIterator};

/// Drains a base iterator and hands out cursors over contiguous, disjoint
/// index ranges of the drained patches.
///
/// The first `len % n` partitions hold one extra patch. Partition
/// membership depends only on `len` and `n`.
#[derive(Debug, Clone)]
pub struct SurfaceIteratorSplitter {
    patches: Vec<Patch>,
    oriented: bool,
    ranges: Vec<Range<usize>>,
}

impl SurfaceIteratorSplitter {
    /// Split `base` into `n` partitions.
    pub fn new(n: usize, mut base: impl SurfaceIterator) -> Result<Self> {
        if n == 0 {
            return Err(SurfaceError::InvalidPartitionCount);
        }
        let oriented = base.is_oriented();
        let mut patches = Vec::new();
        while !base.is_done() {
            patches.push(base.current_patch()?);
            base.next()?;
        }
        let (size, extra) = (patches.len() / n, patches.len() % n);
        let mut ranges = Vec::with_capacity(n);
        let mut start = 0;
        for i in 0..n {
            let end = start + size + usize::from(i < extra);
            ranges.push(start..end);
            start = end;
        }
        tracing::debug!(patches = patches.len(), partitions = n, "split surface iterator");
        Ok(Self {
            patches,
            oriented,
            ranges,
        })
    }

    /// Number of partitions.
    pub fn partition_count(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of patches across all partitions.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// True if the base iterator yielded no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Index range of partition `i` within the drained sequence.
    pub fn range(&self, i: usize) -> Option<Range<usize>> {
        self.ranges.get(i).cloned()
    }

    /// Cursor over partition `i`.
    pub fn partition(&self, i: usize) -> Option<SurfaceCursor<'_>> {
        let range = self.ranges.get(i)?;
        Some(SurfaceCursor::new(&self.patches[range.clone()], self.oriented))
    }

    /// Cursors over every partition, in order.
    pub fn partitions(&self) -> Vec<SurfaceCursor<'_>> {
        self.ranges
            .iter()
            .map(|r| SurfaceCursor::new(&self.patches[r.clone()], self.oriented))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::count_patches;
    use patchwork_math::Point3;

    fn strip(n: usize) -> Vec<Patch> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                Patch::planar_triangle(&[
                    Point3::new(x, 0.0, 0.0),
                    Point3::new(x, 1.0, 0.0),
                    Point3::new(x + 1.0, 0.0, 0.0),
                ])
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_partition_sizes() {
        let patches = strip(10);
        let splitter = SurfaceIteratorSplitter::new(3, SurfaceCursor::new(&patches, true)).unwrap();
        assert_eq!(splitter.partition_count(), 3);
        assert_eq!(splitter.len(), 10);
        assert_eq!(splitter.range(0), Some(0..4));
        assert_eq!(splitter.range(1), Some(4..7));
        assert_eq!(splitter.range(2), Some(7..10));
        assert!(splitter.partition(3).is_none());
    }

    #[test]
    fn test_partitions_cover_disjointly() {
        let patches = strip(7);
        let splitter = SurfaceIteratorSplitter::new(4, SurfaceCursor::new(&patches, true)).unwrap();
        let mut seen = Vec::new();
        for mut part in splitter.partitions() {
            assert!(part.is_oriented());
            while !part.is_done() {
                seen.push(part.current_patch().unwrap().point(0).unwrap().x);
                part.next().unwrap();
            }
        }
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_more_partitions_than_patches() {
        let patches = strip(2);
        let splitter = SurfaceIteratorSplitter::new(5, SurfaceCursor::new(&patches, false)).unwrap();
        let counts: Vec<usize> = splitter
            .partitions()
            .iter_mut()
            .map(|p| count_patches(p).unwrap())
            .collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_zero_partitions_rejected() {
        let patches = strip(2);
        let err = SurfaceIteratorSplitter::new(0, SurfaceCursor::new(&patches, true)).unwrap_err();
        assert_eq!(err, SurfaceError::InvalidPartitionCount);
    }
}
