use glam::Vec2;

use crate::api::types::EntityId;

/// The world a `SpinSequencer` drives: a set of balls with physics bodies and
/// visuals, plus the agitator that stirs them.
pub trait SceneBinding {
    /// Advance the physics simulation by `dt` seconds.
    fn step_simulation(&mut self, dt: f32);

    /// Copy each ball's body transform to its visual.
    fn sync_visuals(&mut self);

    /// Create `count` balls at randomized positions and return their ids.
    fn create_balls(&mut self, count: usize) -> Vec<EntityId>;

    /// Remove every ball from both the visuals and the physics world.
    fn destroy_all_balls(&mut self);

    /// One-shot impulse on a single ball.
    fn apply_impulse(&mut self, ball: EntityId, impulse: Vec2);

    /// Force on a single ball for the next step. Replaces any earlier force.
    fn apply_force(&mut self, ball: EntityId, force: Vec2);

    /// Spin the agitator at `angular_velocity` rad/s. Zero stops it.
    fn apply_disturbance(&mut self, angular_velocity: f32);

    /// Current position of a ball, `None` if it no longer exists.
    fn ball_position(&self, ball: EntityId) -> Option<Vec2>;

    /// The point balls are pulled toward every frame.
    fn centering_point(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Present the lucky ball once the result is revealed.
    fn showcase_ball(&mut self, ball: EntityId);
}
