//! Resolution presets for the planar grid
//!
//! Larger grids resolve finer dendrite arms but each sub-step costs
//! proportionally more. Spacing stays fixed; only the cell count changes.

use serde::{Deserialize, Serialize};

/// Preset determining cells per planar axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionPreset {
    /// 128×128, quick interactive checks
    Preview,
    /// 250×250, the classic Kobayashi domain
    Standard,
    /// 400×400, long runs with well-separated side branches
    Fine,
}

impl ResolutionPreset {
    /// Cells along each planar axis
    #[must_use]
    pub const fn cells_per_axis(&self) -> usize {
        match self {
            Self::Preview => 128,
            Self::Standard => 250,
            Self::Fine => 400,
        }
    }

    /// Planar grid dimensions `(width, height)`
    #[must_use]
    pub const fn grid_dimensions(&self) -> (usize, usize) {
        let n = self.cells_per_axis();
        (n, n)
    }

    /// Preset used when the caller has no preference
    #[must_use]
    pub fn recommended() -> Self {
        Self::Standard
    }
}

impl std::fmt::Display for ResolutionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Preview => "preview",
            Self::Standard => "standard",
            Self::Fine => "fine",
        };
        write!(f, "{name}")
    }
}
