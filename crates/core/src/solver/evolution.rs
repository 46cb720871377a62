//! Coupled phase-field and temperature update
//!
//! Explicit Allen-Cahn step for the order parameter followed by heat
//! diffusion with latent-heat release:
//!
//! ```text
//! ∂φ/∂t = [ ∂y(ε·ε′·∂xφ) − ∂x(ε·ε′·∂yφ) + ∇·(ε²∇φ)
//!          + φ(1−φ)(φ − ½ + m) + a·φ(1−φ)·χ ] / τ
//! ∂T/∂t = ∇²T + K·∂φ/∂t
//! m     = (α/π)·atan(γ·(T_eq − T))
//! ```
//!
//! Reads come only from the input buffers and the derived arrays, writes go
//! only to the output buffers, so no cell ever observes a neighbor's new `φ`.
//! The temperature update uses the cell's own new `φ` for latent heat.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::Rng;

use super::derivatives::DerivedFields;
use super::grid::{Grid, PlanarStencil, Rank};
use crate::config::ModelParams;

/// Constants for one evolution pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionParams {
    /// Time step
    pub dt: f32,
    /// Relaxation time `τ`
    pub tau: f32,
    /// Latent heat coefficient `K`
    pub latent_heat: f32,
    /// Forcing amplitude `α`
    pub alpha: f32,
    /// Forcing steepness `γ`
    pub gamma: f32,
    /// Equilibrium temperature `T_eq`
    pub equilibrium_temperature: f32,
    /// Interface noise amplitude `a`
    pub noise_amplitude: f32,
    /// Cell spacing along x
    pub dx: f32,
    /// Cell spacing along y
    pub dy: f32,
}

impl EvolutionParams {
    /// Combine model constants with grid spacing and time step
    pub fn new(model: &ModelParams, grid: &Grid) -> Self {
        let (dx, dy, _) = grid.spacing();
        Self {
            dt: grid.dt(),
            tau: model.tau,
            latent_heat: model.latent_heat,
            alpha: model.alpha,
            gamma: model.gamma,
            equilibrium_temperature: model.equilibrium_temperature,
            noise_amplitude: model.noise_amplitude,
            dx,
            dy,
        }
    }
}

/// Undercooling forcing `m(T)`, bounded by `±α/2`
#[inline]
pub fn undercooling_forcing(temperature: f32, params: &EvolutionParams) -> f32 {
    (params.alpha / PI) * (params.gamma * (params.equilibrium_temperature - temperature)).atan()
}

/// Advance `phi` and `T` by one explicit step on the active slice
///
/// `derived` must hold derivatives of `phi_in`/`t_in`. For rank 3 grids the
/// inactive slices are copied through unchanged. `rng` is only drawn from when
/// `noise_amplitude` is non-zero.
///
/// # Arguments
///
/// * `phi_in` - Current order parameter
/// * `phi_out` - Receives the new order parameter
/// * `t_in` - Current temperature
/// * `t_out` - Receives the new temperature
/// * `derived` - Derivatives of the current fields
/// * `grid` - Geometry and boundary policy
/// * `params` - Model constants
/// * `rng` - Noise source for the `χ` term
#[allow(clippy::too_many_arguments)]
pub fn step_evolution_cpu(
    phi_in: &[f32],
    phi_out: &mut [f32],
    t_in: &[f32],
    t_out: &mut [f32],
    derived: &DerivedFields,
    grid: &Grid,
    params: &EvolutionParams,
    rng: &mut StdRng,
) {
    if grid.rank() == Rank::Three {
        phi_out.copy_from_slice(phi_in);
        t_out.copy_from_slice(t_in);
    }

    let grad_x = derived.grad_x.as_slice();
    let grad_y = derived.grad_y.as_slice();
    let epsilon = derived.epsilon.as_slice();
    let epsilon_deriv = derived.epsilon_deriv.as_slice();
    let lap_phi = derived.lap_phi.as_slice();
    let lap_t = derived.lap_t.as_slice();

    // ε·ε′·∂φ at a neighbor offset
    let cross_x = |i: usize| epsilon[i] * epsilon_deriv[i] * grad_x[i];
    let cross_y = |i: usize| epsilon[i] * epsilon_deriv[i] * grad_y[i];
    let eps_sq = |i: usize| epsilon[i] * epsilon[i];

    let two_dx = 2.0 * params.dx;
    let two_dy = 2.0 * params.dy;
    let rate = params.dt / params.tau;
    let z = grid.active_slice();

    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let s = PlanarStencil::at(grid, x, y, z);
            let c = s.center;
            let p = phi_in[c];

            let term1 = (cross_x(s.north) - cross_x(s.south)) / two_dy;
            let term2 = -(cross_y(s.east) - cross_y(s.west)) / two_dx;
            let term3 = (eps_sq(s.east) - eps_sq(s.west)) / two_dx * grad_x[c]
                + (eps_sq(s.north) - eps_sq(s.south)) / two_dy * grad_y[c];

            let m = undercooling_forcing(t_in[c], params);
            let mut reaction = p * (1.0 - p) * (p - 0.5 + m);
            if params.noise_amplitude != 0.0 {
                let chi: f32 = rng.random_range(-0.5..0.5);
                reaction += params.noise_amplitude * p * (1.0 - p) * chi;
            }

            let phi_new =
                p + (term1 + term2 + eps_sq(c) * lap_phi[c] + term3 + reaction) * rate;
            phi_out[c] = phi_new;
            t_out[c] = t_in[c] + lap_t[c] * params.dt + params.latent_heat * (phi_new - p);
        }
    }
}
