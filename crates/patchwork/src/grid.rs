//! Composite bicubic grids built from a shared control net.

use patchwork_math::Point3;
use patchwork_patch::Patch;
use patchwork_surface::Surface;

use crate::error::{KernelError, Result};

/// A `cols x rows` grid of bicubic patches over one control net.
///
/// The net holds `(3 cols + 1) x (3 rows + 1)` points in row-major order,
/// `points[j * net_cols + i]`. Patch `(a, b)` takes net columns
/// `3a..=3a+3` and rows `3b..=3b+3`, so neighbouring patches read their
/// shared edge from the same points and match exactly.
#[derive(Debug, Clone)]
pub struct PatchGrid {
    cols: usize,
    rows: usize,
    points: Vec<Point3>,
    tag: Option<String>,
}

impl PatchGrid {
    /// Grid with every net point at the origin.
    pub fn new(cols: usize, rows: usize) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(KernelError::InvalidGrid(format!(
                "grid needs at least one patch, got {cols}x{rows}"
            )));
        }
        let len = (3 * cols + 1) * (3 * rows + 1);
        Ok(Self {
            cols,
            rows,
            points: vec![Point3::origin(); len],
            tag: None,
        })
    }

    /// Grid whose net point `(i, j)` is `f(i, j)`.
    pub fn from_fn(cols: usize, rows: usize, mut f: impl FnMut(usize, usize) -> Point3) -> Result<Self> {
        let mut grid = Self::new(cols, rows)?;
        let net_cols = grid.net_cols();
        for (k, p) in grid.points.iter_mut().enumerate() {
            *p = f(k % net_cols, k / net_cols);
        }
        Ok(grid)
    }

    /// Tag every patch produced by this grid.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Patches along u.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Patches along v.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Net points along u.
    pub fn net_cols(&self) -> usize {
        3 * self.cols + 1
    }

    /// Net points along v.
    pub fn net_rows(&self) -> usize {
        3 * self.rows + 1
    }

    /// Net point `(i, j)`.
    pub fn point(&self, i: usize, j: usize) -> Option<&Point3> {
        if i >= self.net_cols() || j >= self.net_rows() {
            return None;
        }
        self.points.get(j * self.net_cols() + i)
    }

    /// Move net point `(i, j)`.
    pub fn set_point(&mut self, i: usize, j: usize, p: Point3) -> Result<()> {
        let (net_cols, net_rows) = (self.net_cols(), self.net_rows());
        if i >= net_cols || j >= net_rows {
            return Err(KernelError::InvalidGrid(format!(
                "net point ({i}, {j}) outside {net_cols}x{net_rows}"
            )));
        }
        self.points[j * net_cols + i] = p;
        Ok(())
    }

    /// Bicubic patch `(a, b)`.
    pub fn patch(&self, a: usize, b: usize) -> Result<Patch> {
        if a >= self.cols || b >= self.rows {
            return Err(KernelError::InvalidGrid(format!(
                "patch ({a}, {b}) outside {}x{}",
                self.cols, self.rows
            )));
        }
        let net_cols = self.net_cols();
        let mut control = [Point3::origin(); 16];
        for j in 0..4 {
            for i in 0..4 {
                control[4 * j + i] = self.points[(3 * b + j) * net_cols + 3 * a + i];
            }
        }
        let patch = Patch::cubic_patch(&control)?;
        Ok(match &self.tag {
            Some(tag) => patch.with_tag(tag.clone()),
            None => patch,
        })
    }

    /// Append every patch, row by row, to `surface`.
    pub fn append_to(&self, surface: &mut Surface) -> Result<()> {
        for b in 0..self.rows {
            for a in 0..self.cols {
                surface.append(self.patch(a, b)?);
            }
        }
        tracing::debug!(cols = self.cols, rows = self.rows, patches = surface.size(), "appended patch grid");
        Ok(())
    }

    /// New oriented surface holding the grid.
    pub fn to_surface(&self) -> Result<Surface> {
        let mut surface = Surface::new();
        self.append_to(&mut surface)?;
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(cols: usize, rows: usize) -> PatchGrid {
        PatchGrid::from_fn(cols, rows, |i, j| Point3::new(i as f64 / 3.0, j as f64 / 3.0, 0.0)).unwrap()
    }

    #[test]
    fn test_net_dimensions() {
        let grid = plane(2, 3);
        assert_eq!(grid.net_cols(), 7);
        assert_eq!(grid.net_rows(), 10);
        assert_eq!(grid.point(6, 9), Some(&Point3::new(2.0, 3.0, 0.0)));
        assert_eq!(grid.point(7, 0), None);
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(matches!(PatchGrid::new(0, 2), Err(KernelError::InvalidGrid(_))));
    }

    #[test]
    fn test_patch_corners_and_tag() {
        let grid = plane(2, 2).with_tag("sheet");
        let patch = grid.patch(1, 0).unwrap();
        assert_eq!(patch.point(0), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(patch.point(15), Some(Point3::new(2.0, 1.0, 0.0)));
        assert_eq!(patch.tag(), Some("sheet"));
        assert!(grid.patch(2, 0).is_err());
    }

    #[test]
    fn test_grid_is_single_component_with_one_boundary_loop() {
        let surface = plane(3, 2).to_surface().unwrap();
        assert_eq!(surface.size(), 6);
        assert!(surface.is_well_formed());
        assert_eq!(surface.number_of_components(), 1);
        let boundary = surface.boundary();
        assert_eq!(boundary.subpaths.len(), 1);
        assert!(boundary.subpaths[0].closed);
        assert_eq!(boundary.segment_count(), 10);
    }

    #[test]
    fn test_set_point_bounds() {
        let mut grid = plane(1, 1);
        grid.set_point(1, 1, Point3::new(0.3, 0.3, 1.0)).unwrap();
        assert_eq!(grid.patch(0, 0).unwrap().point(5).unwrap().z, 1.0);
        assert!(grid.set_point(4, 0, Point3::origin()).is_err());
    }
}
