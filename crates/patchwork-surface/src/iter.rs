//! Forward-only surface cursors.

use patchwork_math::Transform;
use patchwork_patch::{Patch, PatchKind};

use crate::error::{Result, SurfaceError};

/// A forward-only cursor over the patches of a surface.
///
/// Not restartable: a second traversal needs a fresh iterator. Calling
/// [`current_segment`](Self::current_segment) or [`next`](Self::next) once
/// [`is_done`](Self::is_done) returns true fails with
/// [`SurfaceError::IteratorExhausted`].
pub trait SurfaceIterator: Send {
    /// True once every patch has been visited.
    fn is_done(&self) -> bool;

    /// Copy the current patch's coordinates into `buf` and return its kind.
    fn current_segment(&self, buf: &mut [f64]) -> Result<PatchKind>;

    /// Advance to the next patch.
    fn next(&mut self) -> Result<()>;

    /// True if the underlying surface is oriented.
    fn is_oriented(&self) -> bool;

    /// Tag of the current patch, if any.
    fn current_tag(&self) -> Option<&str>;

    /// The current patch as an owned value, tag included.
    fn current_patch(&self) -> Result<Patch> {
        let mut buf = [0.0; 48];
        let kind = self.current_segment(&mut buf)?;
        let patch = Patch::new(kind, &buf)?;
        Ok(match self.current_tag() {
            Some(tag) => patch.with_tag(tag),
            None => patch,
        })
    }

    /// Adapt into a standard iterator of owned patches.
    fn into_patches(self) -> Patches<Self>
    where
        Self: Sized,
    {
        Patches {
            inner: self,
            failed: false,
        }
    }
}

impl<I: SurfaceIterator + ?Sized> SurfaceIterator for Box<I> {
    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    fn current_segment(&self, buf: &mut [f64]) -> Result<PatchKind> {
        (**self).current_segment(buf)
    }

    fn next(&mut self) -> Result<()> {
        (**self).next()
    }

    fn is_oriented(&self) -> bool {
        (**self).is_oriented()
    }

    fn current_tag(&self) -> Option<&str> {
        (**self).current_tag()
    }

    fn current_patch(&self) -> Result<Patch> {
        (**self).current_patch()
    }
}

impl<I: SurfaceIterator + ?Sized> SurfaceIterator for &mut I {
    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    fn current_segment(&self, buf: &mut [f64]) -> Result<PatchKind> {
        (**self).current_segment(buf)
    }

    fn next(&mut self) -> Result<()> {
        (**self).next()
    }

    fn is_oriented(&self) -> bool {
        (**self).is_oriented()
    }

    fn current_tag(&self) -> Option<&str> {
        (**self).current_tag()
    }

    fn current_patch(&self) -> Result<Patch> {
        (**self).current_patch()
    }
}

/// Count the patches remaining in `iter`, consuming them.
pub fn count_patches(iter: &mut impl SurfaceIterator) -> Result<usize> {
    let mut n = 0;
    while !iter.is_done() {
        n += 1;
        iter.next()?;
    }
    Ok(n)
}

/// Cursor over a slice of patches with an optional transform applied to
/// every control point as it is read.
#[derive(Debug, Clone)]
pub struct SurfaceCursor<'a> {
    patches: &'a [Patch],
    index: usize,
    oriented: bool,
    transform: Option<Transform>,
}

impl<'a> SurfaceCursor<'a> {
    /// Cursor over `patches`.
    pub fn new(patches: &'a [Patch], oriented: bool) -> Self {
        Self {
            patches,
            index: 0,
            oriented,
            transform: None,
        }
    }

    /// Apply `transform` to every patch read through this cursor.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Number of patches not yet visited, the current one included.
    pub fn remaining(&self) -> usize {
        self.patches.len() - self.index
    }

    fn current(&self) -> Result<&'a Patch> {
        self.patches
            .get(self.index)
            .ok_or(SurfaceError::IteratorExhausted)
    }
}

impl SurfaceIterator for SurfaceCursor<'_> {
    fn is_done(&self) -> bool {
        self.index >= self.patches.len()
    }

    fn current_segment(&self, buf: &mut [f64]) -> Result<PatchKind> {
        let patch = self.current()?;
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
        if let Some(t) = &self.transform {
            t.apply_coords(&mut buf[..needed]);
        }
        Ok(kind)
    }

    fn next(&mut self) -> Result<()> {
        if self.is_done() {
            return Err(SurfaceError::IteratorExhausted);
        }
        self.index += 1;
        Ok(())
    }

    fn is_oriented(&self) -> bool {
        self.oriented
    }

    fn current_tag(&self) -> Option<&str> {
        self.patches.get(self.index).and_then(|p| p.tag())
    }

    fn current_patch(&self) -> Result<Patch> {
        let patch = self.current()?;
        Ok(match &self.transform {
            Some(t) => patch.transformed(t),
            None => patch.clone(),
        })
    }
}

/// Standard-iterator adapter over a [`SurfaceIterator`].
///
/// Yields each patch once; after an error it yields that error and stops.
#[derive(Debug)]
pub struct Patches<I> {
    inner: I,
    failed: bool,
}

impl<I: SurfaceIterator> Iterator for Patches<I> {
    type Item = Result<Patch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.inner.is_done() {
            return None;
        }
        let item = self
            .inner
            .current_patch()
            .and_then(|p| SurfaceIterator::next(&mut self.inner).map(|()| p));
        self.failed = item.is_err();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_math::Point3;

    fn triangles(n: usize) -> Vec<Patch> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                Patch::planar_triangle(&[
                    Point3::new(x, 0.0, 0.0),
                    Point3::new(x, 1.0, 0.0),
                    Point3::new(x + 1.0, 0.0, 0.0),
                ])
                .unwrap()
                .with_tag(format!("t{i}"))
            })
            .collect()
    }

    #[test]
    fn test_cursor_visits_every_patch() {
        let patches = triangles(3);
        let mut cursor = SurfaceCursor::new(&patches, true);
        let mut buf = [0.0; 48];
        let mut seen = Vec::new();
        while !cursor.is_done() {
            let kind = cursor.current_segment(&mut buf).unwrap();
            assert_eq!(kind, PatchKind::PlanarTriangle);
            seen.push((buf[0], cursor.current_tag().map(str::to_owned)));
            cursor.next().unwrap();
        }
        assert_eq!(
            seen,
            vec![
                (0.0, Some("t0".to_owned())),
                (1.0, Some("t1".to_owned())),
                (2.0, Some("t2".to_owned()))
            ]
        );
    }

    #[test]
    fn test_exhausted_cursor_errors() {
        let patches = triangles(1);
        let mut cursor = SurfaceCursor::new(&patches, true);
        cursor.next().unwrap();
        assert!(cursor.is_done());
        let mut buf = [0.0; 9];
        assert_eq!(
            cursor.current_segment(&mut buf),
            Err(SurfaceError::IteratorExhausted)
        );
        assert_eq!(cursor.next(), Err(SurfaceError::IteratorExhausted));
        assert!(cursor.current_patch().is_err());
    }

    #[test]
    fn test_small_buffer_rejected() {
        let patches = triangles(1);
        let cursor = SurfaceCursor::new(&patches, true);
        let mut buf = [0.0; 8];
        assert_eq!(
            cursor.current_segment(&mut buf),
            Err(SurfaceError::BufferTooSmall {
                kind: PatchKind::PlanarTriangle,
                needed: 9,
                got: 8
            })
        );
    }

    #[test]
    fn test_transform_applied_lazily() {
        let patches = triangles(2);
        let mut cursor =
            SurfaceCursor::new(&patches, true).with_transform(Transform::translation(0.0, 0.0, 2.0));
        let mut buf = [0.0; 9];
        cursor.next().unwrap();
        cursor.current_segment(&mut buf).unwrap();
        assert_eq!(&buf[..3], &[1.0, 0.0, 2.0]);
        assert_eq!(cursor.current_patch().unwrap().point(2), Some(Point3::new(2.0, 0.0, 2.0)));
        // the stored patch is untouched
        assert_eq!(patches[1].point(0), Some(Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_patches_adapter_and_count() {
        let patches = triangles(4);
        let collected: Vec<Patch> = SurfaceCursor::new(&patches, false)
            .into_patches()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(collected, patches);
        let mut cursor = SurfaceCursor::new(&patches, false);
        cursor.next().unwrap();
        assert_eq!(cursor.remaining(), 3);
        assert_eq!(count_patches(&mut cursor).unwrap(), 3);
        assert!(cursor.is_done());
    }

    #[test]
    fn test_boxed_iterator() {
        let patches = triangles(2);
        let mut boxed: Box<dyn SurfaceIterator + '_> = Box::new(SurfaceCursor::new(&patches, true));
        assert!(boxed.is_oriented());
        assert_eq!(count_patches(&mut boxed).unwrap(), 2);
    }
}
