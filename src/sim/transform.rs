//! Position / rotation / facing transform
//!
//! Facing is +1 (right) or -1 (horizontally mirrored). A child transform is
//! expressed in its parent's mirrored, rotated frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    /// +1 or -1
    pub facing: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            facing: 1.0,
        }
    }
}

impl Transform {
    pub fn new(position: Vec2, rotation: f32, facing: f32) -> Self {
        Self {
            position,
            rotation,
            facing: if facing < 0.0 { -1.0 } else { 1.0 },
        }
    }

    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Express `child` (relative to `self`) in world space
    pub fn combine(&self, child: &Transform) -> Transform {
        let local = Vec2::new(child.position.x * self.facing, child.position.y);
        let offset = Vec2::from_angle(self.rotation).rotate(local);
        Transform {
            position: self.position + offset,
            rotation: self.rotation + child.rotation,
            facing: self.facing * child.facing,
        }
    }

    /// Unit vector the transform points along (mirrored by facing)
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.rotation.cos() * self.facing, self.rotation.sin())
    }
}
