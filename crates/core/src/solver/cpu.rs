//! CPU phase-field solver implementation
//!
//! Single-threaded, synchronous backend holding every field as `Vec<f32>`.
//! `phi` and `T` are ping-pong buffered: the evolution pass reads the front
//! buffers, writes the back buffers, then the two are swapped.

use std::borrow::Cow;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::derivatives::{AnisotropyParams, DerivativeEngine, DerivedFields};
use super::evolution::{step_evolution_cpu, EvolutionParams};
use super::fields::{FieldData, FieldStore};
use super::grid::Grid;
use super::nucleation::{seed_nucleus, NucleusShape};
use super::orientation::OrientationField;
use super::PhaseFieldSolver;
use crate::config::SolverConfig;

/// CPU solver for the Kobayashi model with an orientation field
pub struct CpuPhaseFieldSolver {
    store: FieldStore,

    // Back buffers for the evolution pass
    phi_back: FieldData,
    temperature_back: FieldData,

    engine: DerivativeEngine,
    evolution: EvolutionParams,
    nucleus: NucleusShape,

    // Interface noise source, reseeded on reset
    rng: StdRng,
    noise_seed: u64,

    grid: Grid,
}

impl CpuPhaseFieldSolver {
    /// Allocate all fields and seed the nucleus
    ///
    /// `config` is expected to have passed [`SolverConfig::validate`].
    #[must_use]
    pub fn new(config: &SolverConfig) -> Self {
        let grid = Grid::from_config(&config.grid);
        let mut solver = Self {
            store: FieldStore::new(grid),
            phi_back: FieldData::new(&grid),
            temperature_back: FieldData::new(&grid),
            engine: DerivativeEngine::new(&grid, AnisotropyParams::from(&config.model)),
            evolution: EvolutionParams::new(&config.model, &grid),
            nucleus: config.effective_nucleus(),
            rng: StdRng::seed_from_u64(config.noise_seed),
            noise_seed: config.noise_seed,
            grid,
        };
        solver.reset_fields();
        solver
    }

    /// Field storage, for read-only inspection
    pub fn fields(&self) -> &FieldStore {
        &self.store
    }
}

impl PhaseFieldSolver for CpuPhaseFieldSolver {
    fn step_derivatives(&mut self) {
        self.engine.compute(
            self.store.phi().as_slice(),
            self.store.temperature().as_slice(),
            self.store.orientation().as_slice(),
            &self.grid,
        );
    }

    fn step_evolution(&mut self) {
        step_evolution_cpu(
            self.store.phi().as_slice(),
            self.phi_back.as_mut_slice(),
            self.store.temperature().as_slice(),
            self.temperature_back.as_mut_slice(),
            self.engine.derived(),
            &self.grid,
            &self.evolution,
            &mut self.rng,
        );

        // Swap buffers
        std::mem::swap(self.store.phi_mut(), &mut self.phi_back);
        std::mem::swap(self.store.temperature_mut(), &mut self.temperature_back);
    }

    fn reset_fields(&mut self) {
        self.store.clear();
        self.phi_back.fill(0.0);
        self.temperature_back.fill(0.0);
        self.engine.clear();
        self.rng = StdRng::seed_from_u64(self.noise_seed);
        seed_nucleus(self.store.phi_mut(), &self.grid, self.nucleus);
    }

    fn read_phi(&self) -> Cow<'_, [f32]> {
        Cow::Borrowed(self.store.phi().as_slice())
    }

    fn read_temperature(&self) -> Cow<'_, [f32]> {
        Cow::Borrowed(self.store.temperature().as_slice())
    }

    fn read_orientation(&self) -> Cow<'_, [f32]> {
        Cow::Borrowed(self.store.orientation().as_slice())
    }

    fn derived(&self) -> &DerivedFields {
        self.engine.derived()
    }

    fn orientation_mut(&mut self) -> &mut OrientationField {
        self.store.orientation_mut()
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }
}
