//! Nucleation seeding
//!
//! Stamps the initial solid region (`phi = 1`) into an all-liquid field.
//! Only `phi` is touched; temperature and orientation keep their values.

use serde::{Deserialize, Serialize};

use super::fields::FieldData;
use super::grid::Grid;

/// Default sphere radius in grid units
pub const DEFAULT_SPHERE_RADIUS: f32 = 3.0;

/// Shape of the initial solid seed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NucleusShape {
    /// Center cell plus its four in-plane axis neighbors, on the active slice
    Cross,
    /// Every cell within `radius` grid units of the grid center
    Sphere {
        /// Radius in grid units
        radius: f32,
    },
}

impl NucleusShape {
    /// Sphere with the default radius
    pub const fn default_sphere() -> Self {
        Self::Sphere {
            radius: DEFAULT_SPHERE_RADIUS,
        }
    }
}

/// Stamp `shape` at the grid center, returning the number of cells set
pub fn seed_nucleus(phi: &mut FieldData, grid: &Grid, shape: NucleusShape) -> usize {
    let (cx, cy, cz) = grid.center();
    match shape {
        NucleusShape::Cross => {
            let (cx, cy) = (cx as isize, cy as isize);
            let z = grid.active_slice() as isize;
            let arms = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];
            for (dx, dy) in arms {
                phi.data[grid.index(cx + dx, cy + dy, z)] = 1.0;
            }
            arms.len()
        }
        NucleusShape::Sphere { radius } => {
            let mut stamped = 0;
            for (offset, value) in phi.data.iter_mut().enumerate() {
                let (x, y, z) = grid.coords(offset);
                let dx = x as f32 - cx as f32;
                let dy = y as f32 - cy as f32;
                let dz = z as f32 - cz as f32;
                if (dx * dx + dy * dy + dz * dz).sqrt() <= radius {
                    *value = 1.0;
                    stamped += 1;
                }
            }
            stamped
        }
    }
}
