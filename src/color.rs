//! Color values and the shade tables used when rendering the raster.
//!
//! The canvas itself stores no color; ink and paper colors live in settings
//! and only meet the pixel data at render time, where each downsampled pixel
//! picks a shade by its black-pixel count.

// ============================================================================
// Rgba (f32 precision color)
// ============================================================================

/// RGBA color with f32 components in range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Interpolate between `self` and `c` by parameter `k`.
    pub fn gradient(&self, c: &Rgba, k: f32) -> Rgba {
        Rgba {
            r: self.r + (c.r - self.r) * k,
            g: self.g + (c.g - self.g) * k,
            b: self.b + (c.b - self.b) * k,
            a: self.a + (c.a - self.a) * k,
        }
    }

    /// Pack into premultiplied ARGB32, the layout blitting surfaces expect.
    pub fn premultiplied_argb(&self) -> u32 {
        ((self.a * 255.0) as u32) << 24
            | ((self.r * self.a * 255.0) as u32) << 16
            | ((self.g * self.a * 255.0) as u32) << 8
            | ((self.b * self.a * 255.0) as u32)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Unpack a premultiplied ARGB32 pixel into straight-alpha RGBA bytes, the
/// layout image files expect.
pub fn argb_to_rgba8(pixel: u32) -> [u8; 4] {
    let a = (pixel >> 24) & 0xff;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let unmultiply = |channel: u32| ((channel * 255 + a / 2) / a).min(255) as u8;
    [
        unmultiply((pixel >> 16) & 0xff),
        unmultiply((pixel >> 8) & 0xff),
        unmultiply(pixel & 0xff),
        a as u8,
    ]
}

// ============================================================================
// Shade table
// ============================================================================

/// Shades from `background` to `foreground`, one per possible black-pixel
/// count of a `scale * scale` block. Entry 0 is pure background, entry
/// `scale * scale` pure foreground, all premultiplied ARGB32.
pub fn shade_table(background: &Rgba, foreground: &Rgba, scale: u32) -> Vec<u32> {
    let count = scale * scale + 1;
    let unit = 1.0 / (count - 1) as f32;
    (0..count)
        .map(|shade| {
            background
                .gradient(foreground, shade as f32 * unit)
                .premultiplied_argb()
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let a = Rgba::new(0.0, 0.5, 1.0, 1.0);
        let b = Rgba::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(a.gradient(&b, 0.0), a);
        assert_eq!(a.gradient(&b, 1.0), b);
        let mid = a.gradient(&b, 0.5);
        assert_eq!(mid, Rgba::new(0.5, 0.25, 0.5, 0.5));
    }

    #[test]
    fn test_premultiplied_argb() {
        assert_eq!(Rgba::new(1.0, 0.0, 0.0, 1.0).premultiplied_argb(), 0xff_ff_00_00);
        assert_eq!(Rgba::new(0.0, 0.0, 0.0, 0.0).premultiplied_argb(), 0);
        // Half-opaque white premultiplies each channel by alpha.
        let half = Rgba::new(1.0, 1.0, 1.0, 0.5).premultiplied_argb();
        assert_eq!(half, 0x7f_7f_7f_7f);
    }

    #[test]
    fn test_argb_to_rgba8_unmultiplies() {
        assert_eq!(argb_to_rgba8(0xff_ff_00_00), [255, 0, 0, 255]);
        assert_eq!(argb_to_rgba8(0), [0, 0, 0, 0]);
        // 0x7f of 0x7f alpha rounds back to full channel brightness.
        assert_eq!(argb_to_rgba8(0x7f_7f_7f_7f), [255, 255, 255, 127]);
    }

    #[test]
    fn test_shade_table_spans_colors() {
        let paper = Rgba::new(1.0, 1.0, 1.0, 1.0);
        let ink = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let shades = shade_table(&paper, &ink, 2);
        assert_eq!(shades.len(), 5);
        assert_eq!(shades[0], 0xff_ff_ff_ff);
        assert_eq!(shades[4], 0xff_00_00_00);
        // Interior shades step evenly darker.
        assert_eq!(shades[2], 0xff_7f_7f_7f);
    }

    #[test]
    fn test_shade_table_single_scale() {
        let paper = Rgba::new(0.5, 0.5, 0.5, 1.0);
        let ink = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let shades = shade_table(&paper, &ink, 1);
        assert_eq!(shades.len(), 2);
        assert_eq!(shades[0], 0xff_7f_7f_7f);
        assert_eq!(shades[1], 0xff_00_00_00);
    }
}
