//! Orientation field `Ω`
//!
//! A per-cell preferred growth direction (Ren et al. 2018 "guiding"). The
//! anisotropy is evaluated on `θ - Ω`, so rotating `Ω` rotates the crystal's
//! preferred arms locally. Three generators write the field:
//!
//! - uniform reset (`Ω = 0`, plain Kobayashi behavior)
//! - vortex: `Ω = atan2(y - cy, x - cx) ± π/2`, tangential to circles around the center
//! - brush: screen-space stroke blended in along the shortest arc
//!
//! Every write leaves the stored angle in `[0, 2π)`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use super::fields::FieldData;
use super::grid::Grid;

/// Brush radius limits in screen units
pub const BRUSH_RADIUS_RANGE: (f32, f32) = (1.0, 400.0);

/// Default brush radius in screen units
pub const DEFAULT_BRUSH_RADIUS: f32 = 20.0;

/// Default brush blend factor
pub const DEFAULT_BRUSH_BLEND: f32 = 0.6;

/// Normalize an angle into `[0, 2π)`
///
/// `rem_euclid` can round tiny negative inputs up to exactly `2π`; those fold to 0.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Normalize an angle difference into `[-π, π)`
#[inline]
pub fn shortest_arc(diff: f32) -> f32 {
    (diff + PI).rem_euclid(TAU) - PI
}

/// Linear map from a fixed reference window to grid cells
///
/// Screen y grows downwards, grid y grows upwards, so y is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenMapping {
    /// Reference window width in screen units
    pub reference_width: f32,
    /// Reference window height in screen units
    pub reference_height: f32,
}

impl Default for ScreenMapping {
    fn default() -> Self {
        Self {
            reference_width: 800.0,
            reference_height: 800.0,
        }
    }
}

impl ScreenMapping {
    /// Grid cell `(x, y)` under a screen position, `None` if off-grid
    pub fn to_grid(&self, screen_x: f32, screen_y: f32, grid: &Grid) -> Option<(usize, usize)> {
        let nx = grid.nx() as f32;
        let ny = grid.ny() as f32;
        let gx = (screen_x / self.reference_width * nx).floor();
        let gy = ny - 1.0 - (screen_y / self.reference_height * ny).floor();
        if !(gx >= 0.0 && gx < nx && gy >= 0.0 && gy < ny) {
            return None;
        }
        Some((gx as usize, gy as usize))
    }

    /// Screen position at the center of grid cell `(x, y)`
    ///
    /// Rows past the top of the grid map to the top screen row.
    pub fn cell_center(&self, x: usize, y: usize, grid: &Grid) -> (f32, f32) {
        let sx = (x as f32 + 0.5) * self.reference_width / grid.nx() as f32;
        let flipped = grid.ny().saturating_sub(1).saturating_sub(y) as f32;
        let sy = (flipped + 0.5) * self.reference_height / grid.ny() as f32;
        (sx, sy)
    }

    /// Screen radius converted to grid cells (scaled along x)
    pub fn grid_radius(&self, radius: f32, grid: &Grid) -> f32 {
        radius * grid.nx() as f32 / self.reference_width
    }
}

/// One brush application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStroke {
    /// Screen x of the brush center
    pub screen_x: f32,
    /// Screen y of the brush center
    pub screen_y: f32,
    /// Target orientation in radians
    pub angle: f32,
    /// Radius in screen units
    pub radius: f32,
    /// Blend factor at the brush center, 1 replaces the angle outright
    pub blend: f32,
}

impl BrushStroke {
    /// Stroke with the default radius and blend
    pub fn new(screen_x: f32, screen_y: f32, angle: f32) -> Self {
        Self {
            screen_x,
            screen_y,
            angle,
            radius: DEFAULT_BRUSH_RADIUS,
            blend: DEFAULT_BRUSH_BLEND,
        }
    }

    /// Override the radius
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Override the blend factor
    pub fn with_blend(mut self, blend: f32) -> Self {
        self.blend = blend;
        self
    }

    /// Radius and blend clamped into their allowed ranges
    ///
    /// NaN radius or blend fall back to the defaults.
    pub fn clamped(&self) -> Self {
        let radius = if self.radius.is_nan() {
            DEFAULT_BRUSH_RADIUS
        } else {
            self.radius.clamp(BRUSH_RADIUS_RANGE.0, BRUSH_RADIUS_RANGE.1)
        };
        let blend = if self.blend.is_nan() {
            DEFAULT_BRUSH_BLEND
        } else {
            self.blend.clamp(0.0, 1.0)
        };
        Self {
            radius,
            blend,
            ..*self
        }
    }
}

/// Per-cell preferred growth direction
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationField {
    grid: Grid,
    angles: FieldData,
}

impl OrientationField {
    /// Uniform (all zero) field
    pub fn new(grid: Grid) -> Self {
        Self {
            angles: FieldData::new(&grid),
            grid,
        }
    }

    /// Angles in flat grid order
    pub fn as_slice(&self) -> &[f32] {
        self.angles.as_slice()
    }

    /// Angle at a flat offset
    pub fn get(&self, offset: usize) -> f32 {
        self.angles.data[offset]
    }

    /// Write one angle, normalized into `[0, 2π)`
    ///
    /// A non-finite angle leaves the cell unchanged.
    pub fn set(&mut self, offset: usize, angle: f32) {
        if angle.is_finite() {
            self.angles.data[offset] = wrap_angle(angle);
        }
    }

    /// Every cell back to `Ω = 0`
    pub fn reset_uniform(&mut self) {
        self.angles.fill(0.0);
    }

    /// Tangential field around the grid center
    ///
    /// Counter-clockwise adds `π/2` to the radial angle, clockwise subtracts it.
    /// Applied to every z-layer.
    pub fn apply_vortex(&mut self, clockwise: bool) {
        let cx = self.grid.nx() as f32 / 2.0;
        let cy = self.grid.ny() as f32 / 2.0;
        let turn = if clockwise { -FRAC_PI_2 } else { FRAC_PI_2 };

        for (offset, angle) in self.angles.data.iter_mut().enumerate() {
            let (x, y, _) = self.grid.coords(offset);
            let radial = (y as f32 - cy).atan2(x as f32 - cx);
            *angle = wrap_angle(radial + turn);
        }
    }

    /// Blend a brush stroke into the field
    ///
    /// Cells within the grid-space radius get `old + arc · blend · falloff`
    /// where `arc` is the shortest signed arc from old to new and falloff is
    /// linear from 1 at the center to 0 at the rim. Strokes centered off-grid
    /// are ignored. Returns the number of columns touched.
    pub fn paint(&mut self, stroke: &BrushStroke, screen: &ScreenMapping) -> usize {
        let stroke = stroke.clamped();
        if !stroke.angle.is_finite() {
            return 0;
        }
        let Some((cx, cy)) = screen.to_grid(stroke.screen_x, stroke.screen_y, &self.grid) else {
            return 0;
        };

        let grid_radius = screen.grid_radius(stroke.radius, &self.grid);
        let reach = grid_radius as isize + 1;
        let (nx, ny) = (self.grid.nx() as isize, self.grid.ny() as isize);
        let mut touched = 0;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let tx = cx as isize + dx;
                let ty = cy as isize + dy;
                if tx < 0 || tx >= nx || ty < 0 || ty >= ny {
                    continue;
                }

                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist > grid_radius {
                    continue;
                }

                let falloff = 1.0 - dist / grid_radius;
                let weight = stroke.blend * falloff;
                for z in 0..self.grid.nz() {
                    let offset = self.grid.offset_of(tx as usize, ty as usize, z);
                    let old = self.angles.data[offset];
                    let arc = shortest_arc(stroke.angle - old);
                    self.angles.data[offset] = wrap_angle(old + arc * weight);
                }
                touched += 1;
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use approx::assert_abs_diff_eq;

    fn planar(width: usize, height: usize) -> Grid {
        Grid::from_config(&GridConfig::planar(width, height))
    }

    #[test]
    fn test_wrap_angle_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!(wrap_angle(-1.0e-9) < TAU);
        assert_abs_diff_eq!(wrap_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(wrap_angle(5.0 * PI), PI, epsilon = 1e-5);
    }

    #[test]
    fn test_shortest_arc_range() {
        assert_abs_diff_eq!(shortest_arc(0.2), 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(shortest_arc(TAU - 0.2), -0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(shortest_arc(-TAU + 0.2), 0.2, epsilon = 1e-5);
        let arc = shortest_arc(3.0 * PI);
        assert!((-PI..=PI).contains(&arc));
    }

    #[test]
    fn test_vortex_direction_east_of_center() {
        let grid = planar(40, 40);
        let mut field = OrientationField::new(grid);
        let east = grid.offset_of(25, 20, 0);

        field.apply_vortex(false);
        assert_abs_diff_eq!(field.get(east), FRAC_PI_2, epsilon = 1e-5);

        field.apply_vortex(true);
        assert_abs_diff_eq!(field.get(east), 3.0 * FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn test_vortex_stays_in_range() {
        let grid = Grid::from_config(&GridConfig::volumetric(9, 7, 3));
        let mut field = OrientationField::new(grid);
        field.apply_vortex(true);
        assert!(field.as_slice().iter().all(|&a| (0.0..TAU).contains(&a)));
    }

    #[test]
    fn test_screen_mapping_flips_y() {
        let grid = planar(100, 100);
        let screen = ScreenMapping::default();
        assert_eq!(screen.to_grid(0.0, 0.0, &grid), Some((0, 99)));
        assert_eq!(screen.to_grid(799.0, 799.0, &grid), Some((99, 0)));
        assert_eq!(screen.to_grid(-1.0, 10.0, &grid), None);
        assert_eq!(screen.to_grid(10.0, 800.0, &grid), None);

        let (sx, sy) = screen.cell_center(50, 50, &grid);
        assert_eq!(screen.to_grid(sx, sy, &grid), Some((50, 50)));

        let (_, top) = screen.cell_center(0, 99, &grid);
        assert_eq!(screen.cell_center(0, 150, &grid).1, top);
    }

    #[test]
    fn test_set_ignores_non_finite_angles() {
        let grid = planar(8, 8);
        let mut field = OrientationField::new(grid);
        field.set(3, 1.5);
        field.set(3, f32::NAN);
        field.set(3, f32::INFINITY);
        assert_eq!(field.get(3), 1.5);

        field.set(4, -FRAC_PI_2);
        assert_abs_diff_eq!(field.get(4), TAU - FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_brush_takes_short_way_around() {
        let grid = planar(100, 100);
        let screen = ScreenMapping::default();
        let mut field = OrientationField::new(grid);
        let target = grid.offset_of(50, 50, 0);
        field.set(target, TAU - 0.1);

        let (sx, sy) = screen.cell_center(50, 50, &grid);
        let stroke = BrushStroke::new(sx, sy, 0.1).with_blend(1.0);
        assert!(field.paint(&stroke, &screen) > 0);

        let result = field.get(target);
        let distance = shortest_arc(result - 0.1).abs();
        assert!(distance < 1e-4, "expected ~0.1, got {result}");
    }

    #[test]
    fn test_brush_falloff_and_reach() {
        let grid = planar(100, 100);
        let screen = ScreenMapping::default();
        let mut field = OrientationField::new(grid);
        let (sx, sy) = screen.cell_center(50, 50, &grid);
        // 40 screen units = 5 cells on a 100-cell grid
        let stroke = BrushStroke::new(sx, sy, 1.0).with_radius(40.0).with_blend(1.0);
        field.paint(&stroke, &screen);

        assert_abs_diff_eq!(field.get(grid.offset_of(50, 50, 0)), 1.0, epsilon = 1e-6);
        let half = field.get(grid.offset_of(52, 50, 0));
        assert!(half > 0.0 && half < 1.0, "partial blend expected, got {half}");
        assert_eq!(field.get(grid.offset_of(56, 50, 0)), 0.0);
    }

    #[test]
    fn test_brush_off_grid_is_noop() {
        let grid = planar(50, 50);
        let mut field = OrientationField::new(grid);
        let stroke = BrushStroke::new(-50.0, 100.0, 2.0).with_blend(1.0);
        assert_eq!(field.paint(&stroke, &ScreenMapping::default()), 0);
        assert!(field.as_slice().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_brush_clamps_inputs() {
        let stroke = BrushStroke::new(0.0, 0.0, 0.0)
            .with_radius(10_000.0)
            .with_blend(3.0)
            .clamped();
        assert_eq!(stroke.radius, BRUSH_RADIUS_RANGE.1);
        assert_eq!(stroke.blend, 1.0);
    }

    #[test]
    fn test_brush_paints_every_layer() {
        let grid = Grid::from_config(&GridConfig::volumetric(20, 20, 3));
        let screen = ScreenMapping::default();
        let mut field = OrientationField::new(grid);
        let (sx, sy) = screen.cell_center(10, 10, &grid);
        field.paint(&BrushStroke::new(sx, sy, 0.5).with_blend(1.0), &screen);
        for z in 0..3 {
            assert_abs_diff_eq!(field.get(grid.offset_of(10, 10, z)), 0.5, epsilon = 1e-6);
        }
    }
}
