//! Crystal growth simulation controller
//!
//! `CrystalSimulation` owns the solver and everything a front end needs
//! around it: pause state, the published display buffer, run statistics, and
//! the orbit camera. It has an explicit lifecycle (`init`, `step`, `reset`,
//! `teardown`) and is driven only through its command methods.

pub mod camera;
pub mod display;
mod stats;

pub use camera::CameraState;
pub use display::{relief_heights, ColorRamp, DisplayBuffer, DEFAULT_RELIEF_THICKNESS};
pub use stats::{SimulationStats, SOLID_THRESHOLD};

use std::borrow::Cow;

use tracing::{debug, info, warn};

use crate::config::SolverConfig;
use crate::error::ConfigError;
use crate::solver::{
    create_phase_field_solver, BrushStroke, FrameTimer, Grid, PhaseFieldSolver, ProfilerScope,
};

/// Value-owned simulation state
pub struct CrystalSimulation {
    config: SolverConfig,

    /// Numerical backend
    solver: Box<dyn PhaseFieldSolver>,

    paused: bool,

    /// RGBA image of the active slice, refreshed after each advancing step
    display: DisplayBuffer,
    ramp: ColorRamp,

    camera: CameraState,

    /// Statistics
    stats: SimulationStats,
    frame: u64,
    substeps: u64,
    timer: FrameTimer,
}

impl CrystalSimulation {
    /// Validate `config`, allocate all fields, and seed the nucleus
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`SolverConfig::validate`].
    pub fn init(config: SolverConfig) -> Result<Self, ConfigError> {
        info!("Creating new crystal growth simulation");
        config.validate()?;

        let solver = create_phase_field_solver(&config);
        let grid = *solver.grid();

        info!(
            "Crystal simulation initialized: {}x{}x{} grid, dx={}, dt={}, {} substeps/frame",
            grid.nx(),
            grid.ny(),
            grid.nz(),
            config.grid.dx,
            config.grid.dt,
            config.substeps_per_frame
        );

        let mut simulation = Self {
            config,
            solver,
            paused: false,
            display: DisplayBuffer::new(grid.nx(), grid.ny()),
            ramp: ColorRamp::default(),
            camera: CameraState::default(),
            stats: SimulationStats::default(),
            frame: 0,
            substeps: 0,
            timer: FrameTimer::new(),
        };
        simulation.publish();
        Ok(simulation)
    }

    /// Run one batch of sub-steps unless paused
    ///
    /// Returns `true` when the fields advanced. While paused nothing is
    /// touched, including the display buffer.
    pub fn step(&mut self) -> bool {
        if self.paused {
            return false;
        }

        let scope = ProfilerScope::new("step");
        for _ in 0..self.config.substeps_per_frame {
            self.solver.step_derivatives();
            self.solver.step_evolution();
        }
        self.frame += 1;
        self.substeps += u64::from(self.config.substeps_per_frame);
        self.publish();
        self.timer.record(scope.elapsed_ms());

        debug!(
            "Step {}: {:.2}ms, solid fraction {:.4}",
            self.frame,
            self.timer.last_frame_time_ms(),
            self.stats.solid_fraction
        );
        if self.stats.non_finite_cells > 0 {
            warn!(
                "{} non-finite cells after frame {}",
                self.stats.non_finite_cells, self.frame
            );
        }
        true
    }

    /// Reinitialize every field and reseed the nucleus
    ///
    /// Orientation returns to uniform. Pause state and camera are kept.
    pub fn reset(&mut self) {
        info!("Resetting crystal simulation");
        self.solver.reset_fields();
        self.frame = 0;
        self.substeps = 0;
        self.publish();
    }

    /// End the run, returning the final statistics
    pub fn teardown(self) -> SimulationStats {
        info!(
            "Tearing down crystal simulation after {} frames ({:.2}ms avg)",
            self.frame,
            self.timer.average_frame_time_ms()
        );
        self.stats
    }

    /// Flip run/pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("{}", if self.paused { "Paused" } else { "Running" });
    }

    /// Whether `step` is currently a no-op
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Set `Ω = 0` everywhere
    pub fn set_orientation_uniform(&mut self) {
        info!("Orientation field reset to uniform");
        self.solver.orientation_mut().reset_uniform();
    }

    /// Regenerate `Ω` as a vortex around the grid center
    pub fn set_orientation_vortex(&mut self, clockwise: bool) {
        info!(
            "Orientation field set to {} vortex",
            if clockwise { "clockwise" } else { "counter-clockwise" }
        );
        self.solver.orientation_mut().apply_vortex(clockwise);
    }

    /// Blend `angle` into the orientation field around a screen position
    ///
    /// Radius is in screen units. Radius and blend are clamped; positions
    /// that map outside the grid are ignored. Returns the number of columns
    /// touched.
    pub fn paint_orientation(
        &mut self,
        screen_x: f32,
        screen_y: f32,
        angle: f32,
        radius: f32,
        blend: f32,
    ) -> usize {
        let stroke = BrushStroke::new(screen_x, screen_y, angle)
            .with_radius(radius)
            .with_blend(blend);
        let touched = self
            .solver
            .orientation_mut()
            .paint(&stroke, &self.config.screen);
        debug!(
            "Painted orientation {:.3} at ({:.1}, {:.1}): {} cells",
            angle, screen_x, screen_y, touched
        );
        touched
    }

    /// Orbit the camera by degree deltas
    pub fn rotate_camera(&mut self, delta_x: f32, delta_y: f32) {
        self.camera.rotate(delta_x, delta_y);
    }

    /// Move the camera toward (negative) or away from the origin
    pub fn zoom_camera(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// RGBA bytes of the active slice
    pub fn display_buffer(&self) -> &[u8] {
        self.display.as_bytes()
    }

    /// `(width, height)` of the display buffer
    pub fn display_dimensions(&self) -> (usize, usize) {
        self.display.dimensions()
    }

    /// Order parameter, full grid
    pub fn read_phi(&self) -> Cow<'_, [f32]> {
        self.solver.read_phi()
    }

    /// Temperature, full grid
    pub fn read_temperature(&self) -> Cow<'_, [f32]> {
        self.solver.read_temperature()
    }

    /// Orientation angles, full grid
    pub fn read_orientation(&self) -> Cow<'_, [f32]> {
        self.solver.read_orientation()
    }

    /// Extrusion heights of the active slice
    pub fn relief(&self, thickness: f32) -> Vec<Option<f32>> {
        let range = self.active_range();
        relief_heights(&self.solver.read_phi()[range], thickness)
    }

    /// Grid geometry
    pub fn grid(&self) -> &Grid {
        self.solver.grid()
    }

    /// Camera state
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Statistics as of the last advancing step or reset
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Frame timing
    pub fn frame_timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Configuration the simulation was built from
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn active_range(&self) -> std::ops::Range<usize> {
        let grid = self.solver.grid();
        grid.slice_range(grid.active_slice())
    }

    // Refresh display buffer and statistics from the active slice
    fn publish(&mut self) {
        let range = self.active_range();
        let phi = self.solver.read_phi();
        let temperature = self.solver.read_temperature();
        let phi = &phi[range.clone()];

        self.display.publish(phi, &self.ramp);
        self.stats = SimulationStats {
            frame: self.frame,
            substeps: self.substeps,
            simulation_time: self.substeps as f32 * self.config.grid.dt,
            ..SimulationStats::from_fields(phi, &temperature[range])
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_invalid_config() {
        let mut config = SolverConfig::planar(16, 16);
        config.grid.dx = -1.0;
        assert!(CrystalSimulation::init(config).is_err());
    }

    #[test]
    fn test_init_publishes_seed() {
        let sim = CrystalSimulation::init(SolverConfig::planar(16, 16)).unwrap();
        assert_eq!(sim.display_dimensions(), (16, 16));
        assert_eq!(sim.display_buffer().len(), 16 * 16 * 4);

        let (cx, cy, _) = sim.grid().center();
        let i = (cx + cy * 16) * 4;
        assert_eq!(&sim.display_buffer()[i..i + 4], &[229, 255, 249, 255]);
        assert_eq!(sim.stats().frame, 0);
    }

    #[test]
    fn test_step_advances_counters() {
        let mut sim = CrystalSimulation::init(SolverConfig::planar(16, 16)).unwrap();
        assert!(sim.step());
        assert!(sim.step());
        assert_eq!(sim.stats().frame, 2);
        assert_eq!(sim.stats().substeps, 20);
        assert!((sim.stats().simulation_time - 20.0 * 1e-4).abs() < 1e-7);
        assert_eq!(sim.frame_timer().frames(), 2);
    }

    #[test]
    fn test_pause_short_circuits() {
        let mut sim = CrystalSimulation::init(SolverConfig::planar(16, 16)).unwrap();
        sim.toggle_pause();
        assert!(sim.is_paused());
        assert!(!sim.step());
        assert_eq!(sim.stats().frame, 0);
        sim.toggle_pause();
        assert!(sim.step());
    }

    #[test]
    fn test_reset_keeps_pause_and_camera() {
        let mut sim = CrystalSimulation::init(SolverConfig::planar(16, 16)).unwrap();
        sim.step();
        sim.rotate_camera(5.0, 0.0);
        sim.toggle_pause();
        sim.reset();
        assert!(sim.is_paused());
        assert_eq!(sim.camera().rot_y_deg, 50.0);
        assert_eq!(sim.stats().frame, 0);
        assert_eq!(sim.stats().substeps, 0);
    }

    #[test]
    fn test_teardown_returns_stats() {
        let mut sim = CrystalSimulation::init(SolverConfig::planar(16, 16)).unwrap();
        sim.step();
        let stats = sim.teardown();
        assert_eq!(stats.frame, 1);
    }

    #[test]
    fn test_relief_covers_active_slice() {
        let sim = CrystalSimulation::init(SolverConfig::volumetric(12, 10, 6)).unwrap();
        let relief = sim.relief(DEFAULT_RELIEF_THICKNESS);
        assert_eq!(relief.len(), 120);
        assert!(relief.iter().any(Option::is_some));
    }
}
