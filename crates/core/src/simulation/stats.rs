//! Run statistics over the active slice

use serde::{Deserialize, Serialize};

/// `phi` at or above this counts as solid
pub const SOLID_THRESHOLD: f32 = 0.5;

/// Snapshot of a run, refreshed after every advancing step and every reset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Advancing `step()` calls since the last reset
    pub frame: u64,
    /// Sub-steps since the last reset
    pub substeps: u64,
    /// `substeps · dt`
    pub simulation_time: f32,
    /// Share of active-slice cells with `phi ≥ 0.5`
    pub solid_fraction: f32,
    /// Smallest finite `phi`
    pub phi_min: f32,
    /// Largest finite `phi`
    pub phi_max: f32,
    /// Smallest finite `T`
    pub temperature_min: f32,
    /// Largest finite `T`
    pub temperature_max: f32,
    /// Cells where `phi` or `T` is NaN or infinite
    pub non_finite_cells: usize,
}

impl SimulationStats {
    /// Field statistics for one active slice, counters left at zero
    pub fn from_fields(phi: &[f32], temperature: &[f32]) -> Self {
        let (phi_min, phi_max) = finite_range(phi);
        let (temperature_min, temperature_max) = finite_range(temperature);
        let solid = phi.iter().filter(|&&p| p >= SOLID_THRESHOLD).count();
        let non_finite_cells = phi
            .iter()
            .zip(temperature)
            .filter(|(p, t)| !(p.is_finite() && t.is_finite()))
            .count();

        Self {
            solid_fraction: if phi.is_empty() {
                0.0
            } else {
                solid as f32 / phi.len() as f32
            },
            phi_min,
            phi_max,
            temperature_min,
            temperature_max,
            non_finite_cells,
            ..Self::default()
        }
    }
}

impl std::fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame {} (t={:.4}): solid {:.2}%, phi [{:.3}, {:.3}], T [{:.3}, {:.3}]",
            self.frame,
            self.simulation_time,
            self.solid_fraction * 100.0,
            self.phi_min,
            self.phi_max,
            self.temperature_min,
            self.temperature_max
        )?;
        if self.non_finite_cells > 0 {
            write!(f, ", {} non-finite cells", self.non_finite_cells)?;
        }
        Ok(())
    }
}

// (0, 0) when no finite value exists
fn finite_range(values: &[f32]) -> (f32, f32) {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    match finite.next() {
        Some(first) => finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))),
        None => (0.0, 0.0),
    }
}
