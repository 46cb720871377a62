//! Grid geometry and boundary-aware indexing
//!
//! Cells are stored in one flat array, row-major with x fastest-varying:
//! `offset = x + nx * (y + ny * z)`. Every neighbor lookup goes through the
//! boundary policy, so stencils never need their own edge handling.

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// How out-of-range neighbor coordinates are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Wrap around: the grid is a torus
    Periodic,
    /// Clamp to the nearest edge cell (zero-flux)
    Neumann,
}

impl BoundaryPolicy {
    /// Resolve a possibly out-of-range coordinate on an axis of `n` cells
    #[inline]
    pub fn resolve(self, i: isize, n: usize) -> usize {
        let n = n as isize;
        match self {
            Self::Periodic => i.rem_euclid(n) as usize,
            Self::Neumann => i.clamp(0, n - 1) as usize,
        }
    }
}

/// Grid dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// Planar grid
    Two,
    /// Volumetric grid, PDE evolves on the active slice
    Three,
}

/// Axis-aligned neighbor direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +x
    East,
    /// -x
    West,
    /// +y
    North,
    /// -y
    South,
    /// +z
    Up,
    /// -z
    Down,
}

impl Direction {
    /// Unit step `(dx, dy, dz)` for this direction
    pub const fn delta(self) -> (isize, isize, isize) {
        match self {
            Self::East => (1, 0, 0),
            Self::West => (-1, 0, 0),
            Self::North => (0, 1, 0),
            Self::South => (0, -1, 0),
            Self::Up => (0, 0, 1),
            Self::Down => (0, 0, -1),
        }
    }
}

/// Immutable grid geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    nz: usize,
    rank: Rank,
    dx: f32,
    dy: f32,
    dz: f32,
    dt: f32,
    boundary: BoundaryPolicy,
}

impl Grid {
    /// Build geometry from a (validated) grid configuration
    pub fn from_config(config: &GridConfig) -> Self {
        let (nz, rank) = match config.depth {
            Some(depth) => (depth, Rank::Three),
            None => (1, Rank::Two),
        };
        Self {
            nx: config.width,
            ny: config.height,
            nz,
            rank,
            dx: config.dx,
            dy: config.dy,
            dz: config.dz,
            dt: config.dt,
            boundary: config.boundary,
        }
    }

    /// Cells along x
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along y
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cells along z (1 for planar grids)
    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Grid rank
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Spacing `(dx, dy, dz)`
    pub fn spacing(&self) -> (f32, f32, f32) {
        (self.dx, self.dy, self.dz)
    }

    /// Explicit time step
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Boundary policy
    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Number of cells in one z-slice
    pub fn slice_len(&self) -> usize {
        self.nx * self.ny
    }

    /// Slice on which the PDE evolves: mid-depth, or 0 for planar grids
    pub fn active_slice(&self) -> usize {
        self.nz / 2
    }

    /// Flat offset range covering slice `z`
    pub fn slice_range(&self, z: usize) -> std::ops::Range<usize> {
        let start = z * self.slice_len();
        start..start + self.slice_len()
    }

    /// Integer grid center `(nx/2, ny/2, nz/2)`
    pub fn center(&self) -> (usize, usize, usize) {
        (self.nx / 2, self.ny / 2, self.nz / 2)
    }

    /// Offset of an in-range coordinate
    #[inline]
    pub fn offset_of(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.nx * (y + self.ny * z)
    }

    /// Offset of any integer coordinate, resolved through the boundary policy
    #[inline]
    pub fn index(&self, x: isize, y: isize, z: isize) -> usize {
        let x = self.boundary.resolve(x, self.nx);
        let y = self.boundary.resolve(y, self.ny);
        let z = self.boundary.resolve(z, self.nz);
        self.offset_of(x, y, z)
    }

    /// Coordinate `(x, y, z)` of a flat offset
    #[inline]
    pub fn coords(&self, offset: usize) -> (usize, usize, usize) {
        let x = offset % self.nx;
        let rest = offset / self.nx;
        (x, rest % self.ny, rest / self.ny)
    }

    /// Offset shifted by `(dx, dy, dz)` cells under the boundary policy
    #[inline]
    pub fn offset(&self, offset: usize, dx: isize, dy: isize, dz: isize) -> usize {
        let (x, y, z) = self.coords(offset);
        self.index(x as isize + dx, y as isize + dy, z as isize + dz)
    }

    /// Axis neighbor of a cell under the boundary policy
    #[inline]
    pub fn neighbor(&self, offset: usize, direction: Direction) -> usize {
        let (dx, dy, dz) = direction.delta();
        self.offset(offset, dx, dy, dz)
    }
}

/// Offsets of a cell and its eight in-plane neighbors
///
/// Built once per cell and shared by every stencil evaluated there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanarStencil {
    /// The cell itself
    pub center: usize,
    /// +x
    pub east: usize,
    /// -x
    pub west: usize,
    /// +y
    pub north: usize,
    /// -y
    pub south: usize,
    /// +x +y
    pub north_east: usize,
    /// -x +y
    pub north_west: usize,
    /// +x -y
    pub south_east: usize,
    /// -x -y
    pub south_west: usize,
}

impl PlanarStencil {
    /// Stencil around in-range cell `(x, y, z)`
    #[inline]
    pub fn at(grid: &Grid, x: usize, y: usize, z: usize) -> Self {
        let (xi, yi, zi) = (x as isize, y as isize, z as isize);
        Self {
            center: grid.offset_of(x, y, z),
            east: grid.index(xi + 1, yi, zi),
            west: grid.index(xi - 1, yi, zi),
            north: grid.index(xi, yi + 1, zi),
            south: grid.index(xi, yi - 1, zi),
            north_east: grid.index(xi + 1, yi + 1, zi),
            north_west: grid.index(xi - 1, yi + 1, zi),
            south_east: grid.index(xi + 1, yi - 1, zi),
            south_west: grid.index(xi - 1, yi - 1, zi),
        }
    }

    /// Isotropic 9-point Laplacian of `field` (assumes `dx == dy`)
    ///
    /// `(2·(N+S+E+W) + NE+NW+SE+SW − 12·C) / (3·dx²)`
    #[inline]
    pub fn laplacian(&self, field: &[f32], dx: f32) -> f32 {
        let axis = field[self.east] + field[self.west] + field[self.north] + field[self.south];
        let diagonal = field[self.north_east]
            + field[self.north_west]
            + field[self.south_east]
            + field[self.south_west];
        (2.0 * axis + diagonal - 12.0 * field[self.center]) / (3.0 * dx * dx)
    }
}
