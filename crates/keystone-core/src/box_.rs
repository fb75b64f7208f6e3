//! Box - Rectangle regions

/// An axis-aligned integer rectangle
///
/// A small `Copy` type: output canvases and bounding rectangles of
/// transformed corners are passed around by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Check whether the box has zero area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_is_empty() {
        assert!(!Box::new_unchecked(-3, 2, 10, 4).is_empty());
        assert!(Box::new_unchecked(1, 1, 0, 3).is_empty());
        assert!(Box::new_unchecked(1, 1, 3, -2).is_empty());
    }
}
