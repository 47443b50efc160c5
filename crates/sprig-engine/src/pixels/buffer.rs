use image::RgbaImage;

use super::Rgba;

/// Rejected `PixelBuffer` construction input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelBufferError {
    #[error("pixel buffer dimensions must be non-zero (got {width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("expected {expected} bytes for a {width}x{height} RGBA buffer, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Row-major RGBA8 raster.
///
/// Invariant: `data.len() == width * height * 4` and both dimensions are
/// non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Transparent buffer of the given size. Zero dimensions are raised to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// 1×1 transparent buffer used until a sprite's image arrives.
    pub fn placeholder() -> Self {
        Self::new(1, 1)
    }

    /// Buffer with every pixel set to `color`. Zero dimensions are raised to 1.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let data = color.0.repeat(width as usize * height as usize);
        Self { width, height, data }
    }

    /// Wraps raw RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelBufferError> {
        if width == 0 || height == 0 {
            return Err(PixelBufferError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PixelBufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Takes ownership of a decoded image.
    pub fn from_image(image: RgbaImage) -> Result<Self, PixelBufferError> {
        let (w, h) = image.dimensions();
        Self::from_rgba(w, h, image.into_raw())
    }

    pub fn into_image(self) -> RgbaImage {
        // Length invariant holds, so the conversion cannot fail.
        RgbaImage::from_raw(self.width, self.height, self.data)
            .unwrap_or_else(|| RgbaImage::new(1, 1))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixel_unchecked(x, y))
    }

    /// Reads with coordinates clamped to the nearest edge pixel.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgba {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.pixel_unchecked(cx, cy)
    }

    /// Returns `false` (and writes nothing) when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color.0);
        true
    }

    #[inline]
    fn pixel_unchecked(&self, x: u32, y: u32) -> Rgba {
        let i = self.offset(x, y);
        Rgba([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.0);
        }
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_one_transparent_pixel() {
        let b = PixelBuffer::placeholder();
        assert_eq!((b.width(), b.height()), (1, 1));
        assert_eq!(b.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn from_rgba_checks_length() {
        let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            PixelBufferError::LengthMismatch { width: 2, height: 2, expected: 16, actual: 15 }
        );
    }

    #[test]
    fn from_rgba_rejects_zero_size() {
        assert!(matches!(
            PixelBuffer::from_rgba(0, 3, Vec::new()),
            Err(PixelBufferError::ZeroSize { .. })
        ));
    }

    #[test]
    fn pixels_are_row_major() {
        let data: Vec<u8> = (0..24).collect();
        let b = PixelBuffer::from_rgba(3, 2, data).unwrap();
        assert_eq!(b.pixel(0, 0), Some(Rgba([0, 1, 2, 3])));
        assert_eq!(b.pixel(2, 0), Some(Rgba([8, 9, 10, 11])));
        assert_eq!(b.pixel(0, 1), Some(Rgba([12, 13, 14, 15])));
        assert_eq!(b.pixel(3, 0), None);
    }

    #[test]
    fn clamped_reads_stick_to_edges() {
        let mut b = PixelBuffer::new(2, 2);
        b.set_pixel(0, 0, Rgba::opaque(1, 0, 0));
        b.set_pixel(1, 1, Rgba::opaque(2, 0, 0));
        assert_eq!(b.pixel_clamped(-10, -3).r(), 1);
        assert_eq!(b.pixel_clamped(99, 99).r(), 2);
    }

    #[test]
    fn set_pixel_out_of_bounds_is_ignored() {
        let mut b = PixelBuffer::new(1, 1);
        assert!(!b.set_pixel(1, 0, Rgba::WHITE));
        assert_eq!(b, PixelBuffer::placeholder());
    }

    #[test]
    fn image_round_trip_keeps_dimensions() {
        let b = PixelBuffer::filled(4, 3, Rgba::opaque(9, 8, 7));
        let img = b.clone().into_image();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(PixelBuffer::from_image(img).unwrap(), b);
    }
}
