//! Collision geometry primitives
//!
//! Everything here uses the Y-up convention: an `Aabb`'s `upper_left` is
//! (min x, max y) and its `lower_right` is (max x, min y).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box (Y-up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub upper_left: Vec2,
    pub lower_right: Vec2,
}

impl Aabb {
    pub fn new(upper_left: Vec2, lower_right: Vec2) -> Self {
        Self {
            upper_left,
            lower_right,
        }
    }

    /// Box of the given size whose bottom-left corner is `min`
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            upper_left: Vec2::new(min.x, min.y + size.y),
            lower_right: Vec2::new(min.x + size.x, min.y),
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.upper_left.x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.lower_right.x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.lower_right.y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.upper_left.y
    }

    pub fn width(&self) -> f32 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f32 {
        self.max_y() - self.min_y()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x() + self.max_x()) * 0.5,
            (self.min_y() + self.max_y()) * 0.5,
        )
    }

    /// Strict overlap, see [`aabb_overlap`]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        aabb_overlap(self, other)
    }

    /// Inclusive containment, see [`point_in_rect`]
    pub fn contains(&self, p: Vec2) -> bool {
        point_in_rect(p, self)
    }

    /// Overlap along X (negative when separated)
    pub fn x_overlap(&self, other: &Aabb) -> f32 {
        self.max_x().min(other.max_x()) - self.min_x().max(other.min_x())
    }
}

/// A box attached to an entity's reference position
///
/// `anchor` is the reference point inside the box as a ratio of its size,
/// measured from the left and bottom edges: `(0.5, 0.0)` is bottom-centre
/// (feet), `(0.5, 0.5)` is the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub width: f32,
    pub height: f32,
    pub anchor: Vec2,
}

impl BoxShape {
    pub fn new(width: f32, height: f32, anchor: Vec2) -> Self {
        Self {
            width,
            height,
            anchor,
        }
    }

    /// Square box anchored at its centre
    pub fn centered(size: f32) -> Self {
        Self::new(size, size, Vec2::splat(0.5))
    }

    /// Box anchored at its bottom-centre
    pub fn standing(width: f32, height: f32) -> Self {
        Self::new(width, height, Vec2::new(0.5, 0.0))
    }

    /// Bounds when the reference point sits at `position`
    pub fn bounds_at(&self, position: Vec2) -> Aabb {
        let size = Vec2::new(self.width, self.height);
        Aabb::from_min_size(position - size * self.anchor, size)
    }

    /// Distance from the reference point down to the bottom edge
    pub fn bottom_offset(&self) -> f32 {
        self.height * self.anchor.y
    }
}

/// Strict overlap test; boxes that only share an edge do not overlap
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.upper_left.x < b.lower_right.x
        && a.lower_right.x > b.upper_left.x
        && a.lower_right.y < b.upper_left.y
        && a.upper_left.y > b.lower_right.y
}

/// Inclusive point containment
#[inline]
pub fn point_in_rect(p: Vec2, r: &Aabb) -> bool {
    p.x >= r.min_x() && p.x <= r.max_x() && p.y >= r.min_y() && p.y <= r.max_y()
}

/// Liang–Barsky segment clipping against a box
///
/// A zero-length segment reduces to `point_in_rect(start, r)`.
pub fn segment_intersects_rect(start: Vec2, end: Vec2, r: &Aabb) -> bool {
    let d = end - start;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    // (p, q) per side: the segment is inside that half-plane where p * t <= q
    let constraints = [
        (-d.x, start.x - r.min_x()),
        (d.x, r.max_x() - start.x),
        (-d.y, start.y - r.min_y()),
        (d.y, r.max_y() - start.y),
    ];

    for (p, q) in constraints {
        if p == 0.0 {
            // Parallel to this side
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return false;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return false;
            }
            t1 = t1.min(t);
        }
    }

    t0 <= t1
}

/// Something that moved this frame and can be swept against a target
pub trait Swept {
    /// Current-frame bounds
    fn bounds(&self) -> Aabb;
    /// Reference position at the start of the frame
    fn previous_position(&self) -> Vec2;
    /// Reference position now
    fn current_position(&self) -> Vec2;
}

/// Current-frame overlap, or the frame's travel segment crossing the target
///
/// The segment half catches fast movers that pass clean through a thin
/// target between two frames.
pub fn swept_collision(movable: &impl Swept, target: &Aabb) -> bool {
    aabb_overlap(&movable.bounds(), target)
        || segment_intersects_rect(movable.previous_position(), movable.current_position(), target)
}
