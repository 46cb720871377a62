//! Per-cell field storage
//!
//! `FieldData` is a flat `Vec<f32>` in the grid's row-major order (x fastest).
//! `FieldStore` owns the evolving fields of one simulation: the order
//! parameter `phi`, the temperature `T`, and the orientation field `Ω`.

use super::grid::Grid;
use super::orientation::OrientationField;

/// Flat scalar field with one value per cell
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Values in row-major order (`x + width * (y + height * z)`)
    pub data: Vec<f32>,
    /// Cells along x
    pub width: usize,
    /// Cells along y
    pub height: usize,
    /// Cells along z (1 for planar fields)
    pub depth: usize,
}

impl FieldData {
    /// Zero-filled field shaped like `grid`
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self::with_value(grid, 0.0)
    }

    /// Field shaped like `grid` with every cell set to `value`
    #[must_use]
    pub fn with_value(grid: &Grid, value: f32) -> Self {
        Self {
            data: vec![value; grid.cell_count()],
            width: grid.nx(),
            height: grid.ny(),
            depth: grid.nz(),
        }
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the field has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(x, y, z)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        assert!(
            x < self.width && y < self.height && z < self.depth,
            "Coordinates out of bounds"
        );
        self.data[x + self.width * (y + self.height * z)]
    }

    /// Set value at `(x, y, z)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        assert!(
            x < self.width && y < self.height && z < self.depth,
            "Coordinates out of bounds"
        );
        self.data[x + self.width * (y + self.height * z)] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}

/// Owner of the evolving per-cell fields
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStore {
    grid: Grid,
    phi: FieldData,
    temperature: FieldData,
    orientation: OrientationField,
}

impl FieldStore {
    /// All fields zero-filled, orientation uniform
    pub fn new(grid: Grid) -> Self {
        Self {
            phi: FieldData::new(&grid),
            temperature: FieldData::new(&grid),
            orientation: OrientationField::new(grid),
            grid,
        }
    }

    /// Zero every field and reset orientation to uniform
    pub fn clear(&mut self) {
        self.phi.fill(0.0);
        self.temperature.fill(0.0);
        self.orientation.reset_uniform();
    }

    /// Grid geometry
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Order parameter
    pub fn phi(&self) -> &FieldData {
        &self.phi
    }

    /// Mutable order parameter
    pub fn phi_mut(&mut self) -> &mut FieldData {
        &mut self.phi
    }

    /// Temperature
    pub fn temperature(&self) -> &FieldData {
        &self.temperature
    }

    /// Mutable temperature
    pub fn temperature_mut(&mut self) -> &mut FieldData {
        &mut self.temperature
    }

    /// Orientation field
    pub fn orientation(&self) -> &OrientationField {
        &self.orientation
    }

    /// Mutable orientation field
    pub fn orientation_mut(&mut self) -> &mut OrientationField {
        &mut self.orientation
    }

    /// `phi` restricted to the active slice
    pub fn active_phi(&self) -> &[f32] {
        &self.phi.as_slice()[self.grid.slice_range(self.grid.active_slice())]
    }

    /// `T` restricted to the active slice
    pub fn active_temperature(&self) -> &[f32] {
        &self.temperature.as_slice()[self.grid.slice_range(self.grid.active_slice())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn planar(width: usize, height: usize) -> Grid {
        Grid::from_config(&GridConfig::planar(width, height))
    }

    #[test]
    fn test_field_creation() {
        let field = FieldData::new(&planar(10, 20));
        assert_eq!(field.width, 10);
        assert_eq!(field.height, 20);
        assert_eq!(field.depth, 1);
        assert_eq!(field.len(), 200);
        assert!(field.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_get_set() {
        let grid = Grid::from_config(&GridConfig::volumetric(4, 3, 2));
        let mut field = FieldData::new(&grid);
        field.set(3, 2, 1, 123.45);
        assert_eq!(field.get(3, 2, 1), 123.45);
        assert_eq!(field.data[grid.offset_of(3, 2, 1)], 123.45);
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_bounds_check() {
        let field = FieldData::new(&planar(10, 10));
        let _ = field.get(10, 5, 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = FieldStore::new(planar(6, 6));
        store.phi_mut().fill(1.0);
        store.temperature_mut().fill(-2.0);
        store.orientation_mut().set(0, 1.0);
        store.clear();
        assert!(store.phi().as_slice().iter().all(|&v| v == 0.0));
        assert!(store.temperature().as_slice().iter().all(|&v| v == 0.0));
        assert!(store.orientation().as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_active_slice_views() {
        let grid = Grid::from_config(&GridConfig::volumetric(3, 3, 5));
        let mut store = FieldStore::new(grid);
        let range = grid.slice_range(grid.active_slice());
        store.phi_mut().as_mut_slice()[range].fill(0.5);
        assert_eq!(store.active_phi().len(), 9);
        assert!(store.active_phi().iter().all(|&v| v == 0.5));
        assert_eq!(store.phi().get(0, 0, 0), 0.0);
    }
}
