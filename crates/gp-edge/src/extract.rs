use gp_core::{luma_from_rgba, Error, Image};

use crate::field::EdgeField;

/// Suppression is skipped (and the magnitude forced to zero) inside this
/// margin, where the Sobel window leans on clamped samples.
const NMS_MARGIN: usize = 2;

/// Stateful extractor owning reusable scratch buffers.
///
/// Feeding images of a new size reallocates the scratch planes; repeated
/// extraction at one size allocates only the output field.
#[derive(Debug, Clone)]
pub struct EdgeExtractor {
    lum: Image<f32>,
    tmp: Image<f32>,
    gx: Image<f32>,
    gy: Image<f32>,
    mag: Image<f32>,
}

impl EdgeExtractor {
    pub fn new() -> Self {
        Self {
            lum: Image::new_fill(0, 0, 0.0),
            tmp: Image::new_fill(0, 0, 0.0),
            gx: Image::new_fill(0, 0, 0.0),
            gy: Image::new_fill(0, 0, 0.0),
            mag: Image::new_fill(0, 0, 0.0),
        }
    }

    /// Extracts the edge field from an interleaved RGBA buffer.
    pub fn extract_rgba(
        &mut self,
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> Result<EdgeField, Error> {
        let gray = luma_from_rgba(rgba, width, height)?;
        Ok(self.extract_gray(&gray))
    }

    /// Extracts the edge field from an 8-bit luminance image.
    pub fn extract_gray(&mut self, gray: &Image<u8>) -> EdgeField {
        let w = gray.width();
        let h = gray.height();
        self.ensure_dims(w, h);

        if w == 0 || h == 0 {
            return EdgeField::new_zero(w, h);
        }

        {
            let dst = self.lum.data_mut();
            for (dv, &sv) in dst.iter_mut().zip(gray.data().iter()) {
                *dv = sv as f32;
            }
        }

        self.blur_gauss3();
        self.compute_sobel();
        self.suppress_non_maxima()
    }

    fn ensure_dims(&mut self, w: usize, h: usize) {
        if self.lum.width() != w || self.lum.height() != h {
            self.lum = Image::new_fill(w, h, 0.0);
            self.tmp = Image::new_fill(w, h, 0.0);
            self.gx = Image::new_fill(w, h, 0.0);
            self.gy = Image::new_fill(w, h, 0.0);
            self.mag = Image::new_fill(w, h, 0.0);
        }
    }

    /// 3x3 Gaussian (1,2,1)/4 run separably over rows then columns, which
    /// equals the full (1..4..1)/16 kernel. Border samples clamp.
    fn blur_gauss3(&mut self) {
        let w = self.lum.width();
        let h = self.lum.height();

        {
            let src = self.lum.data();
            let dst = self.tmp.data_mut();
            for y in 0..h {
                let row = y * w;
                for x in 0..w {
                    let xm1 = x.saturating_sub(1);
                    let xp1 = (x + 1).min(w - 1);
                    let s = src[row + xm1] + 2.0 * src[row + x] + src[row + xp1];
                    dst[row + x] = 0.25 * s;
                }
            }
        }

        {
            let src = self.tmp.data();
            let dst = self.lum.data_mut();
            for y in 0..h {
                let ym1 = y.saturating_sub(1);
                let yp1 = (y + 1).min(h - 1);
                let r0 = ym1 * w;
                let r1 = y * w;
                let r2 = yp1 * w;
                for x in 0..w {
                    let s = src[r0 + x] + 2.0 * src[r1 + x] + src[r2 + x];
                    dst[r1 + x] = 0.25 * s;
                }
            }
        }
    }

    fn compute_sobel(&mut self) {
        let w = self.lum.width();
        let h = self.lum.height();
        let src = self.lum.data();

        let gx = self.gx.data_mut();
        let gy = self.gy.data_mut();
        let mag = self.mag.data_mut();

        for y in 0..h {
            let ym1 = y.saturating_sub(1);
            let yp1 = (y + 1).min(h - 1);
            for x in 0..w {
                let xm1 = x.saturating_sub(1);
                let xp1 = (x + 1).min(w - 1);

                let p00 = src[ym1 * w + xm1];
                let p01 = src[ym1 * w + x];
                let p02 = src[ym1 * w + xp1];
                let p10 = src[y * w + xm1];
                let p12 = src[y * w + xp1];
                let p20 = src[yp1 * w + xm1];
                let p21 = src[yp1 * w + x];
                let p22 = src[yp1 * w + xp1];

                let gxx = (p02 + 2.0 * p12 + p22) - (p00 + 2.0 * p10 + p20);
                let gyy = (p20 + 2.0 * p21 + p22) - (p00 + 2.0 * p01 + p02);

                let idx = y * w + x;
                gx[idx] = gxx;
                gy[idx] = gyy;
                mag[idx] = (gxx * gxx + gyy * gyy).sqrt();
            }
        }
    }

    /// Keeps a pixel only if its magnitude is >= both neighbors along the
    /// gradient direction, bucketed into horizontal / vertical / the two
    /// diagonals. Everything inside the margin is zeroed.
    fn suppress_non_maxima(&self) -> EdgeField {
        let w = self.lum.width();
        let h = self.lum.height();
        let gx = self.gx.data();
        let gy = self.gy.data();
        let mag = self.mag.data();

        let mut out = EdgeField::new_zero(w, h);
        for (dv, (&gxx, &gyy)) in out.direction.iter_mut().zip(gx.iter().zip(gy.iter())) {
            *dv = gyy.atan2(gxx);
        }

        if w <= 2 * NMS_MARGIN || h <= 2 * NMS_MARGIN {
            return out;
        }

        const TAN22_5: f32 = 0.414_213_57;
        const TAN67_5: f32 = 2.414_213_7;

        for y in NMS_MARGIN..(h - NMS_MARGIN) {
            for x in NMS_MARGIN..(w - NMS_MARGIN) {
                let idx = y * w + x;
                let m = mag[idx];
                if m <= 0.0 {
                    continue;
                }

                let gxx = gx[idx];
                let gyy = gy[idx];
                let ax = gxx.abs();
                let ay = gyy.abs();

                let (i1, i2) = if ay <= ax * TAN22_5 {
                    (idx - 1, idx + 1)
                } else if ay >= ax * TAN67_5 {
                    (idx - w, idx + w)
                } else if gxx * gyy > 0.0 {
                    (idx - w - 1, idx + w + 1)
                } else {
                    (idx - w + 1, idx + w - 1)
                };

                if m >= mag[i1] && m >= mag[i2] {
                    out.magnitude[idx] = m;
                }
            }
        }

        out
    }
}

impl Default for EdgeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use gp_core::Image;

    use super::{EdgeExtractor, NMS_MARGIN};

    fn vertical_step(w: usize, h: usize, step_x: usize) -> Image<u8> {
        let mut data = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                data[y * w + x] = if x >= step_x { 220 } else { 30 };
            }
        }
        Image::from_vec(w, h, data).expect("valid image")
    }

    #[test]
    fn flat_image_has_zero_magnitude() {
        let img = Image::new_fill(48, 36, 128u8);
        let mut ex = EdgeExtractor::new();
        let field = ex.extract_gray(&img);

        assert!(field.magnitude.iter().all(|&m| m == 0.0));
        assert_eq!(field.max_magnitude(), 0.0);
    }

    #[test]
    fn extraction_is_pure() {
        let img = vertical_step(64, 48, 30);
        let mut ex = EdgeExtractor::new();

        let a = ex.extract_gray(&img);
        let b = ex.extract_gray(&img);
        assert_eq!(a, b);

        // A fresh extractor yields the same field as a reused one.
        let c = EdgeExtractor::new().extract_gray(&img);
        assert_eq!(a, c);
    }

    #[test]
    fn vertical_step_responds_near_step_only() {
        let w = 64;
        let h = 48;
        let step_x = 30;
        let img = vertical_step(w, h, step_x);

        let mut ex = EdgeExtractor::new();
        let field = ex.extract_gray(&img);

        assert!(field.max_magnitude() > 0.0);

        for y in NMS_MARGIN..(h - NMS_MARGIN) {
            for x in NMS_MARGIN..(w - NMS_MARGIN) {
                let m = field.magnitude_at(x, y);
                if x + 3 < step_x || x > step_x + 2 {
                    assert_eq!(m, 0.0, "unexpected response at ({x}, {y})");
                }
            }
        }

        // Gradient across a vertical edge is horizontal.
        let mid = h / 2;
        let idx = mid * w + step_x;
        let dir = field.direction[idx];
        assert!(dir.abs() < 0.2 || (dir.abs() - std::f32::consts::PI).abs() < 0.2);
    }

    #[test]
    fn margin_stays_zero() {
        let img = vertical_step(40, 40, 3);
        let mut ex = EdgeExtractor::new();
        let field = ex.extract_gray(&img);

        for y in 0..40 {
            for x in 0..40 {
                if x < NMS_MARGIN || y < NMS_MARGIN || x >= 40 - NMS_MARGIN || y >= 40 - NMS_MARGIN
                {
                    assert_eq!(field.magnitude_at(x, y), 0.0);
                }
            }
        }
    }

    #[test]
    fn rgba_path_matches_gray_path() {
        let w = 32;
        let h = 24;
        let mut rgba = Vec::with_capacity(w * h * 4);
        for y in 0..h {
            for x in 0..w {
                let v = if x >= 16 { 200u8 } else { 40 };
                rgba.extend_from_slice(&[v, v, v, 255]);
                let _ = y;
            }
        }

        let mut ex = EdgeExtractor::new();
        let via_rgba = ex.extract_rgba(&rgba, w, h).expect("valid buffer");

        let gray: Vec<u8> = rgba.chunks_exact(4).map(|p| p[0]).collect();
        let gray = Image::from_vec(w, h, gray).expect("valid image");
        let via_gray = ex.extract_gray(&gray);

        assert_eq!(via_rgba, via_gray);
    }
}
