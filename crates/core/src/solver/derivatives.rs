//! Spatial derivatives and anisotropic interfacial energy
//!
//! Each sub-step starts here. For every cell of the active slice:
//!
//! ```text
//! ∂φ/∂x = (φ_E − φ_W) / (2·dx)            central difference
//! ∇²φ, ∇²T                                isotropic 9-point stencil
//! θ     = atan2(−∂φ/∂y, −∂φ/∂x)           outward interface normal
//! ε     = ε̄·(1 + δ·cos(k·(θ − Ω)))
//! ε′    = −ε̄·k·δ·sin(k·(θ − Ω))
//! ```
//!
//! With `Ω = 0` everywhere this is the original Kobayashi formulation.

use std::f32::consts::PI;

use super::fields::FieldData;
use super::grid::{Grid, PlanarStencil, Rank};
use crate::config::ModelParams;

/// Anisotropy constants consumed by the derivative pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnisotropyParams {
    /// Mean interfacial-energy coefficient `ε̄`
    pub epsilon_bar: f32,
    /// Anisotropy strength `δ`
    pub strength: f32,
    /// Mode number `k`
    pub mode: f32,
}

impl From<&ModelParams> for AnisotropyParams {
    fn from(model: &ModelParams) -> Self {
        Self {
            epsilon_bar: model.epsilon_bar,
            strength: model.anisotropy_strength,
            mode: model.anisotropy_mode,
        }
    }
}

/// Scratch arrays recomputed every sub-step
///
/// Only active-slice cells are written; the rest stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    /// `∂φ/∂x`
    pub grad_x: FieldData,
    /// `∂φ/∂y`
    pub grad_y: FieldData,
    /// `∂φ/∂z` (rank 3 only, zero otherwise)
    pub grad_z: FieldData,
    /// `∇²φ`
    pub lap_phi: FieldData,
    /// `∇²T`
    pub lap_t: FieldData,
    /// Interface normal angle `θ`
    pub theta: FieldData,
    /// Anisotropic coefficient `ε`
    pub epsilon: FieldData,
    /// Angular derivative `ε′ = ∂ε/∂θ`
    pub epsilon_deriv: FieldData,
}

impl DerivedFields {
    /// Zeroed scratch space shaped like `grid`
    pub fn new(grid: &Grid) -> Self {
        Self {
            grad_x: FieldData::new(grid),
            grad_y: FieldData::new(grid),
            grad_z: FieldData::new(grid),
            lap_phi: FieldData::new(grid),
            lap_t: FieldData::new(grid),
            theta: FieldData::new(grid),
            epsilon: FieldData::new(grid),
            epsilon_deriv: FieldData::new(grid),
        }
    }

    /// Zero every array
    pub fn clear(&mut self) {
        for field in [
            &mut self.grad_x,
            &mut self.grad_y,
            &mut self.grad_z,
            &mut self.lap_phi,
            &mut self.lap_t,
            &mut self.theta,
            &mut self.epsilon,
            &mut self.epsilon_deriv,
        ] {
            field.fill(0.0);
        }
    }
}

/// Angle of the outward interface normal, folded onto `(-π, π]`
///
/// The normal points down the `φ` gradient, from solid into liquid, so a
/// gradient of `(1, 0)` gives `π`. A zero gradient gives a finite (arbitrary)
/// angle, never NaN.
#[inline]
pub fn interface_angle(grad_x: f32, grad_y: f32) -> f32 {
    let angle = (-grad_y).atan2(-grad_x);
    if angle <= -PI {
        PI
    } else {
        angle
    }
}

/// `(ε, ε′)` for interface angle `theta` relative to orientation `omega`
#[inline]
pub fn anisotropy(theta: f32, omega: f32, params: &AnisotropyParams) -> (f32, f32) {
    let phase = params.mode * (theta - omega);
    let epsilon = params.epsilon_bar * (1.0 + params.strength * phase.cos());
    let epsilon_deriv = -params.epsilon_bar * params.mode * params.strength * phase.sin();
    (epsilon, epsilon_deriv)
}

/// Fill `out` from the current `phi`, `T`, and `Ω`
///
/// # Arguments
///
/// * `phi` - Order parameter, full grid
/// * `temperature` - Temperature, full grid
/// * `orientation` - Orientation angles, full grid
/// * `out` - Derived arrays, overwritten on the active slice
/// * `grid` - Geometry and boundary policy
/// * `params` - Anisotropy constants
pub fn compute_derivatives_cpu(
    phi: &[f32],
    temperature: &[f32],
    orientation: &[f32],
    out: &mut DerivedFields,
    grid: &Grid,
    params: &AnisotropyParams,
) {
    let (dx, dy, dz) = grid.spacing();
    let z = grid.active_slice();

    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let s = PlanarStencil::at(grid, x, y, z);
            let c = s.center;

            let grad_x = (phi[s.east] - phi[s.west]) / (2.0 * dx);
            let grad_y = (phi[s.north] - phi[s.south]) / (2.0 * dy);
            let grad_z = match grid.rank() {
                Rank::Two => 0.0,
                Rank::Three => {
                    let (xi, yi, zi) = (x as isize, y as isize, z as isize);
                    let up = grid.index(xi, yi, zi + 1);
                    let down = grid.index(xi, yi, zi - 1);
                    (phi[up] - phi[down]) / (2.0 * dz)
                }
            };

            let theta = interface_angle(grad_x, grad_y);
            let (epsilon, epsilon_deriv) = anisotropy(theta, orientation[c], params);

            out.grad_x.data[c] = grad_x;
            out.grad_y.data[c] = grad_y;
            out.grad_z.data[c] = grad_z;
            out.lap_phi.data[c] = s.laplacian(phi, dx);
            out.lap_t.data[c] = s.laplacian(temperature, dx);
            out.theta.data[c] = theta;
            out.epsilon.data[c] = epsilon;
            out.epsilon_deriv.data[c] = epsilon_deriv;
        }
    }
}

/// Owner of the derived arrays
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeEngine {
    derived: DerivedFields,
    params: AnisotropyParams,
}

impl DerivativeEngine {
    /// Engine with zeroed scratch space
    pub fn new(grid: &Grid, params: AnisotropyParams) -> Self {
        Self {
            derived: DerivedFields::new(grid),
            params,
        }
    }

    /// Recompute every derived array from the current fields
    pub fn compute(&mut self, phi: &[f32], temperature: &[f32], orientation: &[f32], grid: &Grid) {
        compute_derivatives_cpu(
            phi,
            temperature,
            orientation,
            &mut self.derived,
            grid,
            &self.params,
        );
    }

    /// Results of the last [`compute`](Self::compute)
    pub fn derived(&self) -> &DerivedFields {
        &self.derived
    }

    /// Drop results from a previous run
    pub fn clear(&mut self) {
        self.derived.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn default_params() -> AnisotropyParams {
        AnisotropyParams::from(&ModelParams::default())
    }

    #[test]
    fn test_interface_angle_convention() {
        assert_relative_eq!(interface_angle(1.0, 0.0), PI);
        assert_relative_eq!(interface_angle(-1.0, 0.0), 0.0);
        assert_relative_eq!(interface_angle(0.0, 1.0), -FRAC_PI_2);
        assert_relative_eq!(interface_angle(0.0, -1.0), FRAC_PI_2);
    }

    #[test]
    fn test_interface_angle_zero_gradient_is_finite() {
        assert!(interface_angle(0.0, 0.0).is_finite());
        assert!(interface_angle(-0.0, -0.0).is_finite());
        assert!(interface_angle(1e-30, -1e-30).is_finite());
    }

    #[test]
    fn test_anisotropy_peak_along_axis() {
        let params = default_params();
        let theta = interface_angle(1.0, 0.0);
        let (epsilon, epsilon_deriv) = anisotropy(theta, 0.0, &params);
        // cos(6π) = 1
        assert_relative_eq!(
            epsilon,
            params.epsilon_bar * (1.0 + params.strength),
            max_relative = 1e-5
        );
        assert!(epsilon_deriv.abs() < 1e-7);
    }

    #[test]
    fn test_anisotropy_follows_orientation() {
        let params = default_params();
        let omega = 0.3;
        let (rotated, _) = anisotropy(0.5 + omega, omega, &params);
        let (plain, _) = anisotropy(0.5, 0.0, &params);
        assert_relative_eq!(rotated, plain, max_relative = 1e-5);
    }

    #[test]
    fn test_gradient_central_difference() {
        let grid = Grid::from_config(&GridConfig::planar(8, 8));
        let (dx, _, _) = grid.spacing();
        let phi: Vec<f32> = (0..grid.cell_count())
            .map(|offset| grid.coords(offset).0 as f32)
            .collect();
        let temperature = vec![0.0; grid.cell_count()];
        let orientation = vec![0.0; grid.cell_count()];
        let mut engine = DerivativeEngine::new(&grid, default_params());
        engine.compute(&phi, &temperature, &orientation, &grid);

        let interior = grid.offset_of(4, 4, 0);
        let derived = engine.derived();
        assert_relative_eq!(derived.grad_x.data[interior], 1.0 / dx, max_relative = 1e-5);
        assert_eq!(derived.grad_y.data[interior], 0.0);
        assert_relative_eq!(derived.theta.data[interior], PI);
        assert_relative_eq!(
            derived.epsilon.data[interior],
            0.010 * 1.05,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_seeded_field_has_no_nan() {
        let grid = Grid::from_config(&GridConfig::planar(16, 16));
        let mut phi = FieldData::new(&grid);
        super::super::nucleation::seed_nucleus(
            &mut phi,
            &grid,
            super::super::nucleation::NucleusShape::Cross,
        );
        let temperature = vec![0.0; grid.cell_count()];
        let orientation = vec![0.0; grid.cell_count()];
        let mut engine = DerivativeEngine::new(&grid, default_params());
        engine.compute(phi.as_slice(), &temperature, &orientation, &grid);

        let derived = engine.derived();
        for field in [
            &derived.grad_x,
            &derived.grad_y,
            &derived.lap_phi,
            &derived.theta,
            &derived.epsilon,
            &derived.epsilon_deriv,
        ] {
            assert!(field.data.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_volume_only_active_slice_written() {
        let grid = Grid::from_config(&GridConfig::volumetric(6, 6, 5));
        let phi = vec![1.0; grid.cell_count()];
        let temperature = vec![0.0; grid.cell_count()];
        let orientation = vec![0.0; grid.cell_count()];
        let mut engine = DerivativeEngine::new(&grid, default_params());
        engine.compute(&phi, &temperature, &orientation, &grid);

        let derived = engine.derived();
        let active = grid.slice_range(grid.active_slice());
        assert!(derived.epsilon.data[active].iter().all(|&e| e > 0.0));
        assert!(derived.epsilon.data[grid.slice_range(0)]
            .iter()
            .all(|&e| e == 0.0));
    }
}
