//! Axis-aligned bounding-box geometry
//!
//! Every entity in Nova Strike is a rectangle; all collision detection
//! reduces to AABB overlap tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether the rectangle has fully left a `width` x `height` playfield
    pub fn offscreen(&self, width: f32, height: f32) -> bool {
        self.right() < 0.0 || self.left() > width || self.bottom() < 0.0 || self.top() > height
    }

    /// Same rectangle shrunk by `margin` on every side (for forgiving hitboxes)
    pub fn shrunk(&self, margin: f32) -> Rect {
        let margin = margin.min(self.size.x / 2.0).min(self.size.y / 2.0);
        Rect {
            pos: self.pos + Vec2::splat(margin),
            size: self.size - Vec2::splat(margin * 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(25.0, 25.0, 50.0, 50.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_offscreen() {
        let above = Rect::new(100.0, -50.0, 40.0, 40.0);
        assert!(above.offscreen(800.0, 600.0));

        let below = Rect::new(100.0, 601.0, 40.0, 40.0);
        assert!(below.offscreen(800.0, 600.0));

        // Partially visible counts as on-screen
        let entering = Rect::new(100.0, -20.0, 40.0, 40.0);
        assert!(!entering.offscreen(800.0, 600.0));
    }

    #[test]
    fn test_shrunk_hitbox() {
        let r = Rect::new(10.0, 10.0, 40.0, 40.0);
        let s = r.shrunk(5.0);
        assert_eq!(s.pos, Vec2::new(15.0, 15.0));
        assert_eq!(s.size, Vec2::new(30.0, 30.0));
        // Shrinking never inverts the rect
        let tiny = Rect::new(0.0, 0.0, 4.0, 4.0).shrunk(10.0);
        assert!(tiny.size.x >= 0.0 && tiny.size.y >= 0.0);
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn rect_overlaps_itself(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(r.overlaps(&r));
        }

        #[test]
        fn center_is_inside(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
        ) {
            let r = Rect::new(x, y, w, h);
            let c = r.center();
            prop_assert!(c.x >= r.left() && c.x <= r.right());
            prop_assert!(c.y >= r.top() && c.y <= r.bottom());
        }
    }
}
