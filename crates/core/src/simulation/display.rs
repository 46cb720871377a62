//! Color-mapped display buffer
//!
//! The renderer never reads solver fields. After each step the controller
//! maps the active `phi` slice through a piecewise-linear ramp into one RGBA
//! byte quadruple per cell.

/// Default extrusion height at `phi = 1` for [`relief_heights`]
pub const DEFAULT_RELIEF_THICKNESS: f32 = 0.03;

/// Cells below this `phi` are left out of the relief map
pub const RELIEF_THRESHOLD: f32 = 0.01;

/// Linear RGB color with channels nominally in `[0, 1]`
pub type Rgb = [f32; 3];

#[inline]
fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] * (1.0 - t) + b[0] * t,
        a[1] * (1.0 - t) + b[1] * t,
        a[2] * (1.0 - t) + b[2] * t,
    ]
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

/// Three-segment color ramp over `phi`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    /// Colors at `phi = 0`, first, second, and third breakpoints
    pub stops: [Rgb; 4],
    /// `phi` values where each segment ends
    pub breakpoints: [f32; 3],
}

impl Default for ColorRamp {
    /// Ice palette: black liquid, blue interface, white-cyan solid
    fn default() -> Self {
        Self {
            stops: [
                [0.0, 0.0, 0.0],
                [0.25, 0.50, 0.98],
                [0.36, 1.00, 0.98],
                [0.90, 1.00, 0.98],
            ],
            breakpoints: [0.9, 0.99, 1.0],
        }
    }
}

impl ColorRamp {
    /// Unclamped color for `phi`
    pub fn color(&self, phi: f32) -> Rgb {
        let [b1, b2, b3] = self.breakpoints;
        let [c0, c1, c2, c3] = self.stops;
        if phi <= b1 {
            lerp(c0, c1, phi / b1)
        } else if phi <= b2 {
            lerp(c1, c2, (phi - b1) / (b2 - b1))
        } else {
            lerp(c2, c3, (phi - b2) / (b3 - b2))
        }
    }

    /// Opaque RGBA bytes for `phi`, each channel clamped then truncated
    pub fn rgba(&self, phi: f32) -> [u8; 4] {
        let [r, g, b] = self.color(phi);
        [to_byte(r), to_byte(g), to_byte(b), 255]
    }
}

/// RGBA8 image of the active slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl DisplayBuffer {
    /// Black opaque buffer of `width × height` pixels
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = vec![0; width * height * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Overwrite every pixel from a row-major `phi` slice
    ///
    /// # Panics
    ///
    /// Panics if `phi` does not hold exactly one value per pixel
    pub fn publish(&mut self, phi: &[f32], ramp: &ColorRamp) {
        assert_eq!(
            phi.len(),
            self.width * self.height,
            "phi slice does not match display size"
        );
        for (px, &value) in self.pixels.chunks_exact_mut(4).zip(phi) {
            px.copy_from_slice(&ramp.rgba(value));
        }
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// RGBA of pixel `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (x + y * self.width) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Extrusion height per cell, `None` where the cell is effectively liquid
pub fn relief_heights(phi: &[f32], thickness: f32) -> Vec<Option<f32>> {
    phi.iter()
        .map(|&p| (p >= RELIEF_THRESHOLD).then_some(p * thickness))
        .collect()
}
