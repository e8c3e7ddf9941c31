//! Gravity integration

use glam::Vec2;

use crate::consts::GRAVITY;

/// Anything with a position and velocity that gravity can act on
pub trait Movable {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn position_mut(&mut self) -> &mut Vec2;
    fn velocity_mut(&mut self) -> &mut Vec2;
}

/// One semi-implicit Euler step under gravity
///
/// Velocity is updated first and the new velocity moves the position.
pub fn apply_gravity(body: &mut impl Movable, dt: f32) {
    body.velocity_mut().y -= GRAVITY * dt;
    let velocity = body.velocity();
    *body.position_mut() += velocity * dt;
}
