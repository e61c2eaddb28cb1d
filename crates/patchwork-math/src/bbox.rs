use crate::Point3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// A box containing a single point.
    pub fn from_point(p: &Point3) -> Self {
        Self { min: *p, max: *p }
    }

    /// Smallest box containing all points, or `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bbox = Self::from_point(iter.next()?);
        for p in iter {
            bbox.add_point(p);
        }
        Some(bbox)
    }

    /// Grow the box to include `p`.
    pub fn add_point(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow the box to include `other`.
    pub fn union(&mut self, other: &BoundingBox) {
        self.add_point(&other.min);
        self.add_point(&other.max);
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Largest absolute coordinate of either corner.
    pub fn max_abs_coord(&self) -> f64 {
        self.min.coords.amax().max(self.max.coords.amax())
    }
}
