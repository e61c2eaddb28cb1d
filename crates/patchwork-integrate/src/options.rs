//! Options for mass-property computations.

use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, Result};

/// Surfaces with at least this many patches compute their center of mass
/// in parallel unless told otherwise.
pub const MIN_PARALLEL_SIZE_CM: usize = 64;

/// Surfaces with at least this many patches compute their moments in
/// parallel unless told otherwise.
pub const MIN_PARALLEL_SIZE_M: usize = 32;

/// Fewest patches worth handing to one worker when the partition count is
/// chosen automatically.
pub const MIN_PARTITION_SIZE: usize = 16;

/// Largest Gauss-Legendre order accepted in [`MeasureOrders`].
pub const MAX_MEASURE_ORDER: usize = 64;

/// Gauss-Legendre orders used by the area and volume integrals.
///
/// The defaults integrate bicubic area to rounding accuracy and are exact
/// for the volume of bicubic patches and cubic triangles.
///
/// ```toml
/// [integration.orders]
/// area_patch = 10
/// volume_triangle = 6
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureOrders {
    /// Points per axis for the area of bicubic patches and cubic vertices.
    pub area_patch: usize,
    /// Collapsed-rule order for the area of cubic triangles.
    pub area_triangle: usize,
    /// Points per axis for the volume of bicubic patches and cubic vertices.
    pub volume_patch: usize,
    /// Collapsed-rule order for the volume of cubic triangles.
    pub volume_triangle: usize,
}

impl Default for MeasureOrders {
    fn default() -> Self {
        Self {
            area_patch: 8,
            area_triangle: 8,
            volume_patch: 9,
            volume_triangle: 5,
        }
    }
}

impl MeasureOrders {
    /// Validate that every order lies in `1..=MAX_MEASURE_ORDER`.
    pub fn validate(&self) -> Result<()> {
        for (name, order) in [
            ("area_patch", self.area_patch),
            ("area_triangle", self.area_triangle),
            ("volume_patch", self.volume_patch),
            ("volume_triangle", self.volume_triangle),
        ] {
            if !(1..=MAX_MEASURE_ORDER).contains(&order) {
                return Err(IntegrationError::InvalidOptions(format!(
                    "orders.{name} must be between 1 and {MAX_MEASURE_ORDER}, got {order}"
                )));
            }
        }
        Ok(())
    }
}

/// Shared knobs for integrating over a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationOptions {
    /// Switch nearly flat patches to reduced quadrature orders.
    pub flatness_limit: Option<f64>,
    /// Force parallel (`true`) or sequential (`false`) execution; `None`
    /// decides by surface size.
    pub parallel: Option<bool>,
    /// Number of partitions; `None` derives it from the surface size and
    /// the available parallelism.
    pub partitions: Option<usize>,
    /// Quadrature orders for area and volume.
    pub orders: MeasureOrders,
}

impl IntegrationOptions {
    /// Validate options.
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.flatness_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(IntegrationError::InvalidOptions(
                    "flatness_limit must be positive".into(),
                ));
            }
        }
        if self.partitions == Some(0) {
            return Err(IntegrationError::InvalidOptions(
                "partitions must be at least 1".into(),
            ));
        }
        self.orders.validate()
    }

    /// Number of partitions to use for `size` patches, or `None` to run
    /// sequentially. `threshold` is the size at which execution turns
    /// parallel when [`parallel`](Self::parallel) is unset.
    pub fn plan(&self, size: usize, threshold: usize) -> Option<usize> {
        let parallel = self.parallel.unwrap_or(size >= threshold);
        if !parallel {
            return None;
        }
        Some(self.partitions.unwrap_or_else(|| default_partitions(size)))
    }
}

/// `min(available parallelism, ceil(size / MIN_PARTITION_SIZE))`, at least 1.
pub fn default_partitions(size: usize) -> usize {
    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    threads.min(size.div_ceil(MIN_PARTITION_SIZE)).max(1)
}

/// Options for [`center_of_mass_of`](crate::center_of_mass_of).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterOfMassOptions {
    /// Known volume; computed alongside the first moments when absent.
    pub volume: Option<f64>,
    /// Integration knobs.
    #[serde(flatten)]
    pub integration: IntegrationOptions,
}

/// Options for [`moments_of`](crate::moments_of).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentOptions {
    /// Known volume; computed alongside the second moments when absent.
    pub volume: Option<f64>,
    /// Integration knobs.
    #[serde(flatten)]
    pub integration: IntegrationOptions,
}

impl From<IntegrationOptions> for CenterOfMassOptions {
    fn from(integration: IntegrationOptions) -> Self {
        Self {
            volume: None,
            integration,
        }
    }
}

impl From<IntegrationOptions> for MomentOptions {
    fn from(integration: IntegrationOptions) -> Self {
        Self {
            volume: None,
            integration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(IntegrationOptions::default().validate().is_ok());
        assert_eq!(CenterOfMassOptions::default().volume, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = IntegrationOptions {
            partitions: Some(0),
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(IntegrationError::InvalidOptions(_))));
        let negative = IntegrationOptions {
            flatness_limit: Some(-0.1),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
        let no_points = IntegrationOptions {
            orders: MeasureOrders {
                volume_patch: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = no_points.validate().unwrap_err();
        assert!(err.to_string().contains("orders.volume_patch"), "{err}");
    }

    #[test]
    fn test_measure_orders_bounds() {
        assert!(MeasureOrders::default().validate().is_ok());
        let max = MeasureOrders {
            area_patch: MAX_MEASURE_ORDER,
            area_triangle: 1,
            ..Default::default()
        };
        assert!(max.validate().is_ok());
        let huge = MeasureOrders {
            area_triangle: MAX_MEASURE_ORDER + 1,
            ..Default::default()
        };
        assert!(matches!(huge.validate(), Err(IntegrationError::InvalidOptions(_))));
    }

    #[test]
    fn test_plan() {
        let auto = IntegrationOptions::default();
        assert_eq!(auto.plan(10, MIN_PARALLEL_SIZE_CM), None);
        let n = auto.plan(1000, MIN_PARALLEL_SIZE_CM).unwrap();
        assert!(n >= 1 && n <= 1000usize.div_ceil(MIN_PARTITION_SIZE));
        let forced = IntegrationOptions {
            parallel: Some(true),
            partitions: Some(3),
            ..Default::default()
        };
        assert_eq!(forced.plan(1, MIN_PARALLEL_SIZE_M), Some(3));
        let off = IntegrationOptions {
            parallel: Some(false),
            ..Default::default()
        };
        assert_eq!(off.plan(1000, MIN_PARALLEL_SIZE_M), None);
    }

    #[test]
    fn test_default_partitions_bounded() {
        assert_eq!(default_partitions(0), 1);
        assert_eq!(default_partitions(MIN_PARTITION_SIZE), 1);
        assert!(default_partitions(10_000) >= 1);
    }
}
