//! Crystal Growth Simulation Core Library
//!
//! Dendritic solidification with the Kobayashi phase-field model, extended
//! with a per-cell orientation field that steers the preferred growth
//! direction. Grids may be planar or volumetric; volumetric grids evolve the
//! PDE on their mid-depth slice.
//!
//! ## Structure
//!
//! - [`solver`]: grid geometry, field storage, derivative and evolution
//!   passes, nucleation, orientation field
//! - [`simulation`]: the `CrystalSimulation` controller with display buffer,
//!   statistics, and camera
//! - [`config`] / [`error`]: validated configuration

pub mod config;
pub mod error;
pub mod simulation;
pub mod solver;

// Re-export configuration
pub use config::{GridConfig, ModelParams, SolverConfig};
pub use error::{Axis, ConfigError};

// Re-export controller types
pub use simulation::{CameraState, ColorRamp, CrystalSimulation, DisplayBuffer, SimulationStats};

// Re-export solver types
pub use solver::{
    BoundaryPolicy, BrushStroke, NucleusShape, PhaseFieldSolver, ResolutionPreset, ScreenMapping,
};

#[cfg(test)]
mod test_init {
    #[ctor::ctor]
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}
