//! Solver configuration
//!
//! Plain `serde`-friendly structs describing grid geometry, model constants,
//! and the per-frame sub-step budget. Validation happens once, in
//! [`SolverConfig::validate`], before any field is allocated.

use serde::{Deserialize, Serialize};

use crate::error::{Axis, ConfigError};
use crate::solver::{BoundaryPolicy, NucleusShape, ResolutionPreset, ScreenMapping};

/// Default cell spacing (simulation length units per cell)
pub const DEFAULT_SPACING: f32 = 0.03;

/// Default explicit time step
pub const DEFAULT_TIME_STEP: f32 = 1.0e-4;

/// Default number of coupled sub-steps per external frame
pub const DEFAULT_SUBSTEPS_PER_FRAME: u32 = 10;

/// Grid geometry and time step
///
/// `depth = None` describes a planar (rank 2) grid. `Some(nz)` describes a
/// rank 3 volume whose PDE evolves on the mid-depth slice only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells along x
    pub width: usize,
    /// Cells along y
    pub height: usize,
    /// Cells along z, `None` for a planar grid
    pub depth: Option<usize>,
    /// Spacing along x
    pub dx: f32,
    /// Spacing along y
    pub dy: f32,
    /// Spacing along z (ignored for planar grids)
    pub dz: f32,
    /// Explicit time step
    pub dt: f32,
    /// Neighbor resolution at the grid edge
    pub boundary: BoundaryPolicy,
}

impl GridConfig {
    /// Planar grid with periodic boundaries
    pub fn planar(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: None,
            dx: DEFAULT_SPACING,
            dy: DEFAULT_SPACING,
            dz: DEFAULT_SPACING,
            dt: DEFAULT_TIME_STEP,
            boundary: BoundaryPolicy::Periodic,
        }
    }

    /// Volumetric grid with zero-flux (clamped) boundaries
    pub fn volumetric(width: usize, height: usize, depth: usize) -> Self {
        Self {
            depth: Some(depth),
            boundary: BoundaryPolicy::Neumann,
            ..Self::planar(width, height)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroExtent { axis: Axis::X });
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroExtent { axis: Axis::Y });
        }
        if self.depth == Some(0) {
            return Err(ConfigError::ZeroExtent { axis: Axis::Z });
        }

        let mut spacings = vec![(Axis::X, self.dx), (Axis::Y, self.dy)];
        if self.depth.is_some() {
            spacings.push((Axis::Z, self.dz));
        }
        for (axis, value) in spacings {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSpacing { axis, value });
            }
        }

        if self.dx != self.dy {
            return Err(ConfigError::NonUniformPlanarSpacing {
                dx: self.dx,
                dy: self.dy,
            });
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        Ok(())
    }
}

/// Kobayashi model constants
///
/// Defaults reproduce the classic hexagonal snowflake run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Relaxation time `τ`
    pub tau: f32,
    /// Mean interfacial-energy coefficient `ε̄`
    pub epsilon_bar: f32,
    /// Latent heat release coefficient `K`
    pub latent_heat: f32,
    /// Anisotropy strength `δ`
    pub anisotropy_strength: f32,
    /// Anisotropy mode number `k` (6 gives hexagonal symmetry)
    pub anisotropy_mode: f32,
    /// Undercooling forcing amplitude `α`
    pub alpha: f32,
    /// Undercooling forcing steepness `γ`
    pub gamma: f32,
    /// Equilibrium temperature `T_eq`
    pub equilibrium_temperature: f32,
    /// Interface noise amplitude `a` (0 disables the noise term)
    pub noise_amplitude: f32,
}

impl ModelParams {
    /// First constant that is NaN or infinite, with its name
    pub fn first_non_finite(&self) -> Option<(&'static str, f32)> {
        [
            ("tau", self.tau),
            ("epsilon_bar", self.epsilon_bar),
            ("latent_heat", self.latent_heat),
            ("anisotropy_strength", self.anisotropy_strength),
            ("anisotropy_mode", self.anisotropy_mode),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("equilibrium_temperature", self.equilibrium_temperature),
            ("noise_amplitude", self.noise_amplitude),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            tau: 0.0003,
            epsilon_bar: 0.010,
            latent_heat: 1.6,
            anisotropy_strength: 0.05,
            anisotropy_mode: 6.0,
            alpha: 0.9,
            gamma: 10.0,
            equilibrium_temperature: 1.0,
            noise_amplitude: 0.0,
        }
    }
}

/// Complete solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Grid geometry and time step
    pub grid: GridConfig,
    /// Model constants
    pub model: ModelParams,
    /// Initial seed shape, `None` picks the default for the grid rank
    pub nucleus: Option<NucleusShape>,
    /// Screen reference used by the orientation brush
    pub screen: ScreenMapping,
    /// Coupled derivative/evolution passes per external frame
    pub substeps_per_frame: u32,
    /// Seed for the interface noise generator
    pub noise_seed: u64,
}

impl SolverConfig {
    /// Planar configuration with default model constants
    pub fn planar(width: usize, height: usize) -> Self {
        Self::with_grid(GridConfig::planar(width, height))
    }

    /// Volumetric configuration with default model constants
    pub fn volumetric(width: usize, height: usize, depth: usize) -> Self {
        Self::with_grid(GridConfig::volumetric(width, height, depth))
    }

    /// Configuration sized from a resolution preset
    ///
    /// `depth = None` builds a planar grid.
    pub fn from_preset(preset: ResolutionPreset, depth: Option<usize>) -> Self {
        let (width, height) = preset.grid_dimensions();
        match depth {
            Some(depth) => Self::volumetric(width, height, depth),
            None => Self::planar(width, height),
        }
    }

    fn with_grid(grid: GridConfig) -> Self {
        Self {
            grid,
            model: ModelParams::default(),
            nucleus: None,
            screen: ScreenMapping::default(),
            substeps_per_frame: DEFAULT_SUBSTEPS_PER_FRAME,
            noise_seed: 42,
        }
    }

    /// Seed shape actually used: explicit choice, else cross (2D) or sphere (3D)
    pub fn effective_nucleus(&self) -> NucleusShape {
        self.nucleus.unwrap_or(if self.grid.depth.is_some() {
            NucleusShape::default_sphere()
        } else {
            NucleusShape::Cross
        })
    }

    /// Check every precondition the solver relies on
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: empty axes, bad spacing or
    /// time step, non-positive `tau`, a non-finite model constant, a bad
    /// sphere radius, zero sub-steps, or a degenerate screen reference extent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if !(self.model.tau.is_finite() && self.model.tau > 0.0) {
            return Err(ConfigError::InvalidRelaxationTime {
                value: self.model.tau,
            });
        }
        if let Some((name, value)) = self.model.first_non_finite() {
            return Err(ConfigError::NonFiniteModelParameter { name, value });
        }
        if let NucleusShape::Sphere { radius } = self.effective_nucleus() {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(ConfigError::InvalidNucleusRadius { value: radius });
            }
        }
        if self.substeps_per_frame == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        let ScreenMapping {
            reference_width,
            reference_height,
        } = self.screen;
        let extent_ok = |v: f32| v.is_finite() && v > 0.0;
        if !(extent_ok(reference_width) && extent_ok(reference_height)) {
            return Err(ConfigError::InvalidScreenExtent {
                width: reference_width,
                height: reference_height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_planar_is_valid() {
        let config = SolverConfig::planar(250, 250);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid.boundary, BoundaryPolicy::Periodic);
        assert_eq!(config.substeps_per_frame, 10);
        assert_eq!(config.effective_nucleus(), NucleusShape::Cross);
    }

    #[test]
    fn test_volumetric_defaults() {
        let config = SolverConfig::volumetric(40, 40, 9);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid.boundary, BoundaryPolicy::Neumann);
        assert_eq!(
            config.effective_nucleus(),
            NucleusShape::Sphere { radius: 3.0 }
        );
    }

    #[test]
    fn test_rejects_zero_extent() {
        let mut config = SolverConfig::planar(0, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroExtent { axis: Axis::X })
        );
        config = SolverConfig::volumetric(10, 10, 0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroExtent { axis: Axis::Z })
        );
    }

    #[test]
    fn test_rejects_bad_spacing() {
        let mut config = SolverConfig::planar(10, 10);
        config.grid.dy = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSpacing {
                axis: Axis::Y,
                value: 0.0
            })
        );

        config.grid.dy = 0.05;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonUniformPlanarSpacing { dx: 0.03, dy: 0.05 })
        );
    }

    #[test]
    fn test_planar_ignores_depth_spacing() {
        let mut config = SolverConfig::planar(10, 10);
        config.grid.dz = -1.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_time_and_substeps() {
        let mut config = SolverConfig::planar(10, 10);
        config.grid.dt = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeStep { .. })
        ));

        config = SolverConfig::planar(10, 10);
        config.model.tau = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRelaxationTime { value: 0.0 })
        );

        config = SolverConfig::planar(10, 10);
        config.substeps_per_frame = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSubsteps));
    }

    #[test]
    fn test_rejects_non_finite_model_constant() {
        let mut config = SolverConfig::planar(10, 10);
        config.model.epsilon_bar = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteModelParameter {
                name: "epsilon_bar",
                ..
            })
        ));

        config = SolverConfig::planar(10, 10);
        config.model.latent_heat = f32::INFINITY;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFiniteModelParameter {
                name: "latent_heat",
                value: f32::INFINITY
            })
        );
    }

    #[test]
    fn test_rejects_bad_nucleus_radius() {
        let mut config = SolverConfig::volumetric(16, 16, 8);
        config.nucleus = Some(NucleusShape::Sphere { radius: -2.0 });
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidNucleusRadius { value: -2.0 })
        );

        config.nucleus = Some(NucleusShape::Sphere { radius: f32::NAN });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNucleusRadius { .. })
        ));

        config.nucleus = Some(NucleusShape::Sphere { radius: 0.0 });
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_screen_extent() {
        let mut config = SolverConfig::planar(10, 10);
        config.screen.reference_height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScreenExtent { .. })
        ));
    }

    #[test]
    fn test_from_preset() {
        let config = SolverConfig::from_preset(ResolutionPreset::Standard, None);
        assert_eq!(config.grid.width, 250);
        assert_eq!(config.grid.depth, None);

        let config = SolverConfig::from_preset(ResolutionPreset::Preview, Some(16));
        assert_eq!(config.grid.width, 128);
        assert_eq!(config.grid.depth, Some(16));
    }
}
