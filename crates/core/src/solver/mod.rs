//! Phase-field crystal growth solver
//!
//! This module holds the numerical core: grid geometry and field storage,
//! the derivative pass, the coupled evolution pass, nucleation seeding, and
//! orientation-field management. The controller drives it through the
//! `PhaseFieldSolver` trait.
//!
//! # Sub-step order
//!
//! 1. `step_derivatives`: gradients, Laplacians, interface angle, `ε`, `ε′`
//! 2. `step_evolution`: new `phi` into the back buffer, then `T`, then swap
//!
//! # Example
//!
//! ```rust,ignore
//! use crystal_sim_core::solver::create_phase_field_solver;
//! use crystal_sim_core::SolverConfig;
//!
//! let mut solver = create_phase_field_solver(&SolverConfig::planar(250, 250));
//! solver.step_derivatives();
//! solver.step_evolution();
//! ```

mod cpu;
pub mod derivatives;
pub mod evolution;
mod fields;
pub mod grid;
pub mod nucleation;
pub mod orientation;
pub mod profiler;
mod quality;
mod r#trait;

// Re-exports
pub use cpu::CpuPhaseFieldSolver;
pub use derivatives::{anisotropy, interface_angle, AnisotropyParams, DerivedFields};
pub use evolution::EvolutionParams;
pub use fields::{FieldData, FieldStore};
pub use grid::{BoundaryPolicy, Direction, Grid, PlanarStencil, Rank};
pub use nucleation::{seed_nucleus, NucleusShape};
pub use orientation::{shortest_arc, wrap_angle, BrushStroke, OrientationField, ScreenMapping};
pub use profiler::{FrameTimer, ProfilerScope};
pub use quality::ResolutionPreset;
pub use r#trait::PhaseFieldSolver;

use tracing::info;

use crate::config::SolverConfig;

/// Create a phase-field solver for `config`
///
/// Only the synchronous CPU backend exists. `config` is expected to have
/// passed [`SolverConfig::validate`].
///
/// # Returns
///
/// A boxed `PhaseFieldSolver` trait object
pub fn create_phase_field_solver(config: &SolverConfig) -> Box<dyn PhaseFieldSolver> {
    let grid = &config.grid;
    match grid.depth {
        Some(depth) => info!(
            "Using CPU backend ({}x{}x{} grid, {:?} boundaries)",
            grid.width, grid.height, depth, grid.boundary
        ),
        None => info!(
            "Using CPU backend ({}x{} grid, {:?} boundaries)",
            grid.width, grid.height, grid.boundary
        ),
    }
    Box::new(CpuPhaseFieldSolver::new(config))
}
