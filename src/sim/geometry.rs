//! Axis-aligned rectangle geometry
//!
//! Positions are `glam::Vec2` in tile units with y growing downward. Every
//! hitbox is a rectangle anchored at its owner's top-left position and
//! extending by the hitbox size. Ranges are half-open, so rectangles that
//! only touch along an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier shared by characters and bullets
pub type EntityId = u32;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner (exclusive)
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Half-open overlap test: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    /// Shrink by `eps` on every side
    pub fn inset(&self, eps: f32) -> Rect {
        Rect::new(self.min + eps, (self.size - 2.0 * eps).max(Vec2::ZERO))
    }

    /// Integer tile columns this rectangle covers
    pub fn tile_cols(&self) -> std::ops::RangeInclusive<i32> {
        tile_span(self.min.x, self.max().x)
    }

    /// Integer tile rows this rectangle covers
    pub fn tile_rows(&self) -> std::ops::RangeInclusive<i32> {
        tile_span(self.min.y, self.max().y)
    }
}

/// Tiles covered by the half-open interval `[lo, hi)`
fn tile_span(lo: f32, hi: f32) -> std::ops::RangeInclusive<i32> {
    let first = lo.floor() as i32;
    let last = (hi.ceil() as i32 - 1).max(first);
    first..=last
}

/// Anything with a position and a hitbox
pub trait Entity {
    fn id(&self) -> EntityId;
    fn position(&self) -> Vec2;
    fn hitbox(&self) -> Vec2;

    fn rect(&self) -> Rect {
        Rect::new(self.position(), self.hitbox())
    }

    /// True iff the two hitboxes overlap
    fn is_colliding(&self, other: &dyn Entity) -> bool {
        self.rect().overlaps(&other.rect())
    }
}
