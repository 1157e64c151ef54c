//! Edge-field extraction for the portrait mesh pipeline.
//!
//! Coordinate convention: pixel centers, so integer `(x, y)` is the center
//! of pixel index `(x, y)`.
//!
//! The pipeline is luminance -> 3x3 Gaussian blur -> Sobel -> non-maximum
//! suppression with the gradient direction bucketed into four bins. The
//! outer 2-pixel margin is excluded from suppression and left at zero.
//!
//! Extraction is a pure function of the input buffer: no randomness, no
//! thresholds. Thresholding against the field's observed maximum is the
//! sampler's job.

mod extract;
mod field;

pub use extract::EdgeExtractor;
pub use field::EdgeField;
