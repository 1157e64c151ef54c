/// Per-pixel gradient magnitude and direction, row-major.
///
/// Ephemeral: produced by the extractor, consumed by the point sampler,
/// never stored past one mesh build.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeField {
    pub width: usize,
    pub height: usize,
    /// Suppressed gradient magnitude, `>= 0`.
    pub magnitude: Vec<f32>,
    /// Gradient direction in radians, `atan2(gy, gx)`.
    pub direction: Vec<f32>,
}

impl EdgeField {
    pub fn new_zero(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            magnitude: vec![0.0; n],
            direction: vec![0.0; n],
        }
    }

    pub fn magnitude_at(&self, x: usize, y: usize) -> f32 {
        self.magnitude[y * self.width + x]
    }

    pub fn max_magnitude(&self) -> f32 {
        let mut max = 0.0f32;
        for &m in &self.magnitude {
            if m > max {
                max = m;
            }
        }
        max
    }
}
