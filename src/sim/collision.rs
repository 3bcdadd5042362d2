//! Axis-aligned bounding-box collision
//!
//! Every collision in the game (bullets, ramming, pickups) is a box overlap
//! test in screen space, y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: boxes that only touch along an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Check whether two boxes overlap
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap() {
        assert!(aabb_overlap(&boxed(0.0, 0.0, 10.0, 10.0), &boxed(5.0, 5.0, 10.0, 10.0)));
        assert!(aabb_overlap(&boxed(0.0, 0.0, 40.0, 40.0), &boxed(10.0, 10.0, 4.0, 4.0)));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        assert!(!aabb_overlap(&boxed(0.0, 0.0, 10.0, 10.0), &boxed(10.0, 0.0, 10.0, 10.0)));
        assert!(!aabb_overlap(&boxed(0.0, 0.0, 10.0, 10.0), &boxed(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_disjoint() {
        assert!(!aabb_overlap(&boxed(0.0, 0.0, 10.0, 10.0), &boxed(50.0, 50.0, 5.0, 5.0)));
    }
}
