//! Depth-first subdivision of any surface iterator.

use patchwork_patch::{Patch, PatchKind};
use patchwork_subdiv::quarter;

use crate::error::{Result, SurfaceError};
use crate::iter::SurfaceIterator;

/// Decorates a [`SurfaceIterator`], yielding every source patch split
/// `level` times: exactly `4^level` children per source patch, child 0
/// first at every depth.
///
/// Uses an explicit stack of at most `3 * level + 1` entries instead of
/// recursion.
pub struct SubdivisionIterator<I> {
    base: I,
    level: u32,
    stack: Vec<(Patch, u32)>,
    source_id: usize,
}

impl<I: SurfaceIterator> SubdivisionIterator<I> {
    /// Subdivide every patch of `base` to depth `level`.
    pub fn new(base: I, level: u32) -> Result<Self> {
        tracing::debug!(level, "starting subdivision iterator");
        let mut it = Self {
            base,
            level,
            stack: Vec::with_capacity(3 * level as usize + 1),
            source_id: 0,
        };
        it.load_source()?;
        Ok(it)
    }

    /// Index of the current patch's source within the base iterator.
    pub fn source_id(&self) -> usize {
        self.source_id
    }

    /// Subdivision depth.
    pub fn level(&self) -> u32 {
        self.level
    }

    fn load_source(&mut self) -> Result<()> {
        if !self.base.is_done() {
            let patch = self.base.current_patch()?;
            self.stack.push((patch, self.level));
            self.descend();
        }
        Ok(())
    }

    /// Split the top of the stack until a leaf is on top.
    fn descend(&mut self) {
        while self.stack.last().is_some_and(|(_, remaining)| *remaining > 0) {
            if let Some((patch, remaining)) = self.stack.pop() {
                for child in quarter(&patch).into_iter().rev() {
                    self.stack.push((child, remaining - 1));
                }
            }
        }
    }

    fn leaf(&self) -> Result<&Patch> {
        self.stack
            .last()
            .map(|(p, _)| p)
            .ok_or(SurfaceError::IteratorExhausted)
    }
}

impl<I: SurfaceIterator> SurfaceIterator for SubdivisionIterator<I> {
    fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    fn current_segment(&self, buf: &mut [f64]) -> Result<PatchKind> {
        let patch = self.leaf()?;
        let kind = patch.kind();
        let needed = kind.coord_len();
        if buf.len() < needed {
            return Err(SurfaceError::BufferTooSmall {
                kind,
                needed,
                got: buf.len(),
            });
        }
        buf[..needed].copy_from_slice(patch.coords());
        Ok(kind)
    }

    fn next(&mut self) -> Result<()> {
        if self.stack.pop().is_none() {
            return Err(SurfaceError::IteratorExhausted);
        }
        if self.stack.is_empty() {
            self.base.next()?;
            self.source_id += 1;
            self.load_source()?;
        } else {
            self.descend();
        }
        Ok(())
    }

    fn is_oriented(&self) -> bool {
        self.base.is_oriented()
    }

    fn current_tag(&self) -> Option<&str> {
        self.stack.last().and_then(|(p, _)| p.tag())
    }

    fn current_patch(&self) -> Result<Patch> {
        self.leaf().cloned()
    }
}
