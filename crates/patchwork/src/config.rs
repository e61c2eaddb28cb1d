//! Kernel configuration loaded from TOML.

use patchwork_integrate::{
    area_parallel_with_orders, area_with_orders, volume_parallel_with_orders, volume_with_orders, CenterOfMassOptions,
    IntegrationOptions, MomentOptions, MIN_PARALLEL_SIZE_M,
};
use patchwork_math::{Point3, Tolerances};
use patchwork_surface::Surface;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Settings shared by every surface and integral a client creates.
///
/// ```toml
/// [tolerances]
/// ulps = 16.0
///
/// [integration]
/// parallel = true
/// partitions = 4
///
/// [integration.orders]
/// area_patch = 10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Tolerances used for edge matching.
    pub tolerances: Tolerances,
    /// Defaults for mass-property integrals.
    pub integration: IntegrationOptions,
}

impl KernelConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| KernelError::InvalidSettings(e.to_string()))
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let tol = &self.tolerances;
        if !tol.ulps.is_finite() || tol.ulps < 0.0 {
            return Err(KernelError::InvalidSettings(format!(
                "tolerances.ulps must be a non-negative number, got {}",
                tol.ulps
            )));
        }
        if !tol.min_scale.is_finite() || tol.min_scale <= 0.0 {
            return Err(KernelError::InvalidSettings(format!(
                "tolerances.min_scale must be positive, got {}",
                tol.min_scale
            )));
        }
        self.integration
            .validate()
            .map_err(|e| KernelError::InvalidSettings(e.to_string()))
    }

    /// Empty oriented surface using these tolerances.
    pub fn surface(&self) -> Surface {
        Surface::new().with_tolerances(self.tolerances)
    }

    /// Center-of-mass options with the configured integration settings.
    pub fn center_of_mass_options(&self) -> CenterOfMassOptions {
        CenterOfMassOptions::from(self.integration)
    }

    /// Moment options with the configured integration settings.
    pub fn moment_options(&self) -> MomentOptions {
        MomentOptions::from(self.integration)
    }

    /// Area of `surface` with the configured orders and parallelism.
    pub fn area_of(&self, surface: &Surface) -> Result<f64> {
        let orders = &self.integration.orders;
        let area = match self.integration.plan(surface.size(), MIN_PARALLEL_SIZE_M) {
            Some(partitions) => area_parallel_with_orders(surface.iter(), partitions, orders)?,
            None => area_with_orders(surface.iter(), orders)?,
        };
        Ok(area)
    }

    /// Volume enclosed by `surface`, measured from its bounding-box center,
    /// with the configured orders and parallelism.
    pub fn volume_of(&self, surface: &Surface) -> Result<f64> {
        let orders = &self.integration.orders;
        let reference = surface.bounds().map_or_else(Point3::origin, |b| b.center());
        let volume = match self.integration.plan(surface.size(), MIN_PARALLEL_SIZE_M) {
            Some(partitions) => volume_parallel_with_orders(surface.iter(), &reference, partitions, orders)?,
            None => volume_with_orders(surface.iter(), &reference, orders)?,
        };
        Ok(volume)
    }
}
