use crate::Error;

/// Owned row-major pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

/// Converts an interleaved RGBA buffer into an 8-bit luminance image using
/// the Rec. 601 weights `0.299 R + 0.587 G + 0.114 B`. Alpha is ignored.
pub fn luma_from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<Image<u8>, Error> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage);
    }

    let n = width.checked_mul(height).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: rgba.len(),
    })?;

    let expected = n.checked_mul(4).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: rgba.len(),
    })?;

    if rgba.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }

    let mut out = Vec::with_capacity(n);
    for px in rgba.chunks_exact(4) {
        let l = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        out.push(l.round().clamp(0.0, 255.0) as u8);
    }

    Image::from_vec(width, height, out)
}

#[cfg(test)]
mod tests {
    use super::{luma_from_rgba, Image};
    use crate::Error;

    #[test]
    fn from_vec_checks_size() {
        assert!(Image::from_vec(3, 2, vec![0u8; 6]).is_ok());
        assert_eq!(
            Image::from_vec(3, 2, vec![0u8; 5]),
            Err(Error::SizeMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn get_respects_bounds() {
        let img = Image::from_vec(2, 2, vec![1u8, 2, 3, 4]).expect("valid image");
        assert_eq!(img.get(1, 1), Some(&4));
        assert_eq!(img.get(2, 0), None);
        assert_eq!(img.get(0, 2), None);
    }

    #[test]
    fn luma_weights() {
        // Pure red, green, blue, and white pixels.
        let rgba = vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 255, 255, 255,
        ];
        let img = luma_from_rgba(&rgba, 4, 1).expect("valid buffer");
        assert_eq!(img.data(), &[76, 150, 29, 255]);
    }

    #[test]
    fn luma_rejects_truncated_buffer() {
        let rgba = vec![0u8; 15];
        assert!(luma_from_rgba(&rgba, 2, 2).is_err());
    }

    #[test]
    fn luma_rejects_empty_dimensions() {
        assert_eq!(luma_from_rgba(&[], 0, 0), Err(Error::EmptyImage));
        assert_eq!(luma_from_rgba(&[], 4, 0), Err(Error::EmptyImage));
        assert_eq!(luma_from_rgba(&[], 0, 4), Err(Error::EmptyImage));
    }
}
