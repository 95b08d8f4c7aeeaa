//! Display geometry as reported by the platform.

/// Pixel bounding box in virtual-screen coordinates (right/bottom exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// One attached display. `index` is its position in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    pub index: usize,
    pub rect: Rect,
}
