use crate::random::RandomSource;

/// Jitter magnitudes for one randomization pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Noise {
    /// Canvas-space jitter in pixels. Offsets are floored to whole pixels.
    pub pixels: f64,
    /// Jitter of normalized lattice coordinates.
    pub local: f64,
}

impl Noise {
    /// Local jitter is the pixel jitter expressed as a fraction of the canvas width.
    pub fn new(pixels: f64, canvas_width: f64) -> Self {
        Self {
            pixels,
            local: pixels / canvas_width,
        }
    }
}

pub trait Perturb {
    fn perturb(&mut self, noise: &Noise, rng: &mut dyn RandomSource);
}
