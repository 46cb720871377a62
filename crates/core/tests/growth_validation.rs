//! Growth validation tests
//!
//! Short runs with the default Kobayashi constants: the seed must grow, every
//! value must stay finite, and symmetries of the setup must survive.

use approx::assert_abs_diff_eq;
use crystal_sim_core::solver::{shortest_arc, Grid};
use crystal_sim_core::{CrystalSimulation, SolverConfig};
use std::f32::consts::FRAC_PI_2;

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

fn phi_mass(sim: &CrystalSimulation) -> f32 {
    sim.read_phi().iter().sum()
}

fn assert_all_finite(sim: &CrystalSimulation) {
    assert!(sim.read_phi().iter().all(|v| v.is_finite()), "phi");
    assert!(sim.read_temperature().iter().all(|v| v.is_finite()), "T");
    assert_eq!(sim.stats().non_finite_cells, 0);
}

#[test]
fn seed_grows_with_default_orientation() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(64, 64)).unwrap();
    let initial_mass = phi_mass(&sim);
    let initial_fraction = sim.stats().solid_fraction;

    for _ in 0..30 {
        assert!(sim.step());
    }

    assert_all_finite(&sim);
    assert!(phi_mass(&sim) > initial_mass);
    assert!(
        sim.stats().solid_fraction > initial_fraction,
        "{} -> {}",
        initial_fraction,
        sim.stats().solid_fraction
    );
    // Latent heat warms the neighbourhood of the growing solid
    assert!(sim.stats().temperature_max > 0.0);
}

#[test]
fn seed_grows_in_vortex_field() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(64, 64)).unwrap();
    sim.set_orientation_vortex(true);
    let initial_mass = phi_mass(&sim);

    for _ in 0..30 {
        sim.step();
    }

    assert_all_finite(&sim);
    assert!(phi_mass(&sim) > initial_mass);
}

#[test]
fn planar_solution_is_mirror_symmetric() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(64, 64)).unwrap();
    for _ in 0..5 {
        sim.step();
    }

    let grid: Grid = *sim.grid();
    let (cx, _, _) = grid.center();
    let phi = sim.read_phi();
    for y in 0..grid.ny() {
        for x in 0..grid.nx() {
            let mirror = (2 * cx + grid.nx() - x) % grid.nx();
            let a = phi[grid.offset_of(x, y, 0)];
            let b = phi[grid.offset_of(mirror, y, 0)];
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }
    }
}

#[test]
fn volumetric_grid_evolves_active_slice_only() {
    let mut sim = CrystalSimulation::init(SolverConfig::volumetric(32, 32, 8)).unwrap();
    let before = sim.read_phi().into_owned();

    for _ in 0..3 {
        sim.step();
    }

    let grid = *sim.grid();
    let after = sim.read_phi();
    for z in (0..grid.nz()).filter(|&z| z != grid.active_slice()) {
        let range = grid.slice_range(z);
        assert_eq!(before[range.clone()], after[range]);
    }
    let active = grid.slice_range(grid.active_slice());
    let mass_before: f32 = before[active.clone()].iter().sum();
    let mass_after: f32 = after[active].iter().sum();
    assert!(mass_after > mass_before);
    assert_all_finite(&sim);
}

#[test]
fn neumann_planar_grid_grows() {
    let mut config = SolverConfig::planar(48, 48);
    config.grid.boundary = crystal_sim_core::BoundaryPolicy::Neumann;
    let mut sim = CrystalSimulation::init(config).unwrap();
    let initial_mass = phi_mass(&sim);
    for _ in 0..10 {
        sim.step();
    }
    assert_all_finite(&sim);
    assert!(phi_mass(&sim) > initial_mass);
}

#[test]
fn vortex_points_tangentially() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(40, 40)).unwrap();
    let grid = *sim.grid();
    let (cx, cy, _) = grid.center();
    let east = grid.offset_of(cx + 5, cy, 0);

    sim.set_orientation_vortex(false);
    assert_abs_diff_eq!(sim.read_orientation()[east], FRAC_PI_2, epsilon = 1e-5);

    sim.set_orientation_vortex(true);
    assert_abs_diff_eq!(sim.read_orientation()[east], 3.0 * FRAC_PI_2, epsilon = 1e-5);

    sim.set_orientation_uniform();
    assert!(sim.read_orientation().iter().all(|&a| a == 0.0));
}

#[test]
fn brush_blends_along_shortest_arc() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(100, 100)).unwrap();
    let grid = *sim.grid();
    let screen = sim.config().screen;
    let (sx, sy) = screen.cell_center(50, 50, &grid);
    let target = grid.offset_of(50, 50, 0);

    // Bring the cell to 2π − 0.1 first
    sim.paint_orientation(sx, sy, -0.1, 1.0, 1.0);
    assert_abs_diff_eq!(
        sim.read_orientation()[target],
        std::f32::consts::TAU - 0.1,
        epsilon = 1e-5
    );

    sim.paint_orientation(sx, sy, 0.1, 20.0, 1.0);
    let result = sim.read_orientation()[target];
    assert!(
        shortest_arc(result - 0.1).abs() < 1e-4,
        "expected ~0.1, got {result}"
    );
}

#[test]
fn brush_off_grid_is_ignored() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(50, 50)).unwrap();
    assert_eq!(sim.paint_orientation(900.0, 10.0, 1.0, 40.0, 1.0), 0);
    assert_eq!(sim.paint_orientation(10.0, -5.0, 1.0, 40.0, 1.0), 0);
    assert!(sim.read_orientation().iter().all(|&a| a == 0.0));
}

#[test]
fn display_tracks_active_slice() {
    let mut sim = CrystalSimulation::init(SolverConfig::planar(32, 32)).unwrap();
    sim.step();
    let grid = *sim.grid();
    let phi = sim.read_phi();
    let ramp = crystal_sim_core::ColorRamp::default();
    for (offset, px) in sim.display_buffer().chunks_exact(4).enumerate() {
        assert_eq!(px, ramp.rgba(phi[offset]));
        assert_eq!(px[3], 255);
    }
    assert_eq!(sim.display_dimensions(), (grid.nx(), grid.ny()));
}
