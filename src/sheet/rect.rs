//! Integer and float rectangles.

use serde::Serialize;

/// Pixel rectangle with a signed origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersection with `bounds`. When the two do not overlap the result
    /// keeps this rectangle's origin and has zero size.
    pub fn clip(&self, bounds: &Rect) -> Rect {
        let left = (self.x as i64).max(bounds.x as i64);
        let top = (self.y as i64).max(bounds.y as i64);
        let right = self.right().min(bounds.right());
        let bottom = self.bottom().min(bounds.bottom());

        if left < right && top < bottom {
            Rect::new(
                left as i32,
                top as i32,
                (right - left) as u32,
                (bottom - top) as u32,
            )
        } else {
            Rect::new(self.x, self.y, 0, 0)
        }
    }

    pub fn to_frect(&self) -> FRect {
        FRect {
            x: self.x as f32,
            y: self.y as f32,
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

/// Float rectangle for sub-pixel positioning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
