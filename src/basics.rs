//! Foundation types shared by every module: the run length unit, integer
//! rounding helpers, 2D points, and corner rectangles.

use core::ops::{Add, Mul, Sub};

// ============================================================================
// Run
// ============================================================================

/// One run length in a row. Color is implied by index parity: runs at even
/// indices are white (paper), runs at odd indices are black (ink). Every row
/// starts with a white run, which may have length zero when the row's first
/// pixel is black.
pub type Run = u32;

/// Color of the run at `index` within a row.
#[inline]
pub fn run_is_black(index: usize) -> bool {
    index & 1 == 1
}

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Floor toward negative infinity, as `i32`.
#[inline]
pub fn ifloor(v: f32) -> i32 {
    let i = v as i32;
    i - (i as f32 > v) as i32
}

/// Ceiling as `i32`.
#[inline]
pub fn iceil(v: f32) -> i32 {
    v.ceil() as i32
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

pub type PointI = PointBase<i32>;
pub type PointF = PointBase<f32>;

impl PointF {
    /// Squared Euclidean length.
    #[inline]
    pub fn squared_length(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit-length copy. The zero vector is returned unchanged.
    #[inline]
    pub fn normalized(&self) -> PointF {
        let len = self.squared_length().sqrt();
        if len == 0.0 {
            return *self;
        }
        PointF::new(self.x / len, self.y / len)
    }

    /// Quarter turn clockwise in screen coordinates (y down):
    /// `(x, y)` becomes `(y, -x)`.
    #[inline]
    pub fn quarter_right(&self) -> PointF {
        PointF::new(self.y, -self.x)
    }
}

impl<T: Copy + Add<Output = T>> Add for PointBase<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Copy + Sub<Output = T>> Sub for PointBase<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Copy + Mul<Output = T>> Mul<T> for PointBase<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Clip this rectangle to the intersection with `r`.
    /// Returns `true` if the result is a valid (non-empty) rectangle.
    pub fn clip(&mut self, r: &Self) -> bool {
        if self.x2 > r.x2 {
            self.x2 = r.x2;
        }
        if self.y2 > r.y2 {
            self.y2 = r.y2;
        }
        if self.x1 < r.x1 {
            self.x1 = r.x1;
        }
        if self.y1 < r.y1 {
            self.y1 = r.y1;
        }
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns `true` if the rectangle is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }
}

/// Rectangle with `i32` coordinates.
pub type RectI = Rect<i32>;
/// Rectangle with `f32` coordinates.
pub type RectF = Rect<f32>;

// ============================================================================
// Tests
// ============================================================================
