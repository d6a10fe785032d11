//! Owned ARGB32 pixel surface that rendering writes into.

// ============================================================================
// PixelBuffer
// ============================================================================

/// Rectangular buffer of premultiplied ARGB32 pixels in row-major order.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    data: Vec<u32>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Create a buffer of the given size with every pixel zeroed.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u32) {
        self.data.fill(value);
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 3);
        assert!(buf.pixels().iter().all(|&p| p == 0));
        assert_eq!(buf.pixels().len(), 12);
    }

    #[test]
    fn test_rows_are_disjoint() {
        let mut buf = PixelBuffer::new(3, 2);
        buf.row_mut(0).copy_from_slice(&[1, 2, 3]);
        buf.row_mut(1).copy_from_slice(&[4, 5, 6]);
        assert_eq!(buf.row(0), &[1, 2, 3]);
        assert_eq!(buf.row(1), &[4, 5, 6]);
    }

    #[test]
    fn test_fill() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill(0xff_00_00_00);
        assert!(buf.pixels().iter().all(|&p| p == 0xff_00_00_00));
    }
}
