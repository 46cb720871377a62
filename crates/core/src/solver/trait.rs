//! Phase-field solver trait definition
//!
//! `PhaseFieldSolver` is the seam between the simulation controller and the
//! numerical backend. The controller only ever drives a solver through this
//! trait, alternating the two passes of each sub-step.

use std::borrow::Cow;

use super::derivatives::DerivedFields;
use super::grid::Grid;
use super::orientation::OrientationField;

/// Backend-agnostic interface for the coupled phase-field/temperature model
pub trait PhaseFieldSolver: Send + Sync {
    /// Recompute every derived array from the current fields
    ///
    /// Must run to completion before the matching
    /// [`step_evolution`](Self::step_evolution).
    fn step_derivatives(&mut self);

    /// Advance `phi` and `T` by one time step using the derived arrays
    fn step_evolution(&mut self);

    /// Zero all fields, uniform orientation, reseed the nucleus
    ///
    /// Also restores any internal random state so repeated resets are
    /// indistinguishable.
    fn reset_fields(&mut self);

    /// Read the order parameter (full grid, row-major)
    ///
    /// # Returns
    ///
    /// Values in `[0, 1]` for a well-behaved run: 0 liquid, 1 solid.
    fn read_phi(&self) -> Cow<'_, [f32]>;

    /// Read the temperature field (full grid, row-major)
    fn read_temperature(&self) -> Cow<'_, [f32]>;

    /// Read orientation angles in `[0, 2π)` (full grid, row-major)
    fn read_orientation(&self) -> Cow<'_, [f32]>;

    /// Derived arrays from the most recent derivative pass
    fn derived(&self) -> &DerivedFields;

    /// Orientation field, for pattern and brush commands
    fn orientation_mut(&mut self) -> &mut OrientationField;

    /// Grid geometry
    fn grid(&self) -> &Grid;
}
