/// Pixel-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whole pixel columns covered by the rectangle.
    pub fn columns(&self) -> usize {
        self.width.max(0.0) as usize
    }

    /// Shrinks each side by the given amount, never below zero size.
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

/// Linear remap of `value` from `[src_lo, src_hi]` onto `[dst_lo, dst_hi]`.
pub fn jmap(value: f32, src_lo: f32, src_hi: f32, dst_lo: f32, dst_hi: f32) -> f32 {
    dst_lo + (value - src_lo) / (src_hi - src_lo) * (dst_hi - dst_lo)
}

/// Frequency at normalised position `t` on a log axis over `[lo, hi]`.
pub fn map_to_log10(t: f32, lo: f32, hi: f32) -> f32 {
    lo * (hi / lo).powf(t)
}

/// Inverse of [`map_to_log10`].
pub fn map_from_log10(value: f32, lo: f32, hi: f32) -> f32 {
    (value / lo).log10() / (hi / lo).log10()
}
