//! Single RGB frame of a sequence.

use super::SequenceError;

/// One frame of tightly packed 8-bit RGB pixels.
///
/// The buffer length is checked at construction, so every other
/// component can index into a `Frame` without revalidating it.
#[derive(Clone)]
pub struct Frame {
    /// Packed RGB bytes, row-major, three bytes per pixel.
    data: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
}

impl Frame {
    /// Creates a frame from a packed RGB buffer.
    ///
    /// The buffer must hold exactly `width * height * 3` bytes.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, SequenceError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(SequenceError::BufferSize {
                width,
                height,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a frame by evaluating `f` at every pixel coordinate.
    ///
    /// Handy for synthetic inputs and derived images such as the
    /// sequence mean.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns a reference to the raw packed RGB data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the RGB triple at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel out of range");
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgb_bytes", &self.data.len())
            .finish()
    }
}
