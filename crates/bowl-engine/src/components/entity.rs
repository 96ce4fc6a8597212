use glam::Vec2;
use crate::api::types::EntityId;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// A ball, wall or agitator: visual state plus an optional physics body.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether the renderer should draw this entity.
    pub visible: bool,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform visual scale (1.0 = natural size).
    pub scale: f32,
    /// Hue in degrees. Entities without a hue are never published to the renderer.
    pub hue: Option<f32>,
    /// When false, `EngineContext::sync_visuals` leaves the transform alone.
    pub follow_body: bool,
    /// Physics body, with the "physics" feature.
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            visible: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            hue: None,
            follow_body: true,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_hue(mut self, hue: f32) -> Self {
        self.hue = Some(hue);
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Pin the entity at `pos` with `scale`, no longer mirroring its body.
    pub fn detach_at(&mut self, pos: Vec2, scale: f32) {
        self.follow_body = false;
        self.pos = pos;
        self.scale = scale;
        self.visible = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let e = Entity::new(EntityId(3))
            .with_tag("ball")
            .with_pos(Vec2::new(1.0, 2.0))
            .with_hue(120.0);
        assert_eq!(e.tag, "ball");
        assert_eq!(e.pos, Vec2::new(1.0, 2.0));
        assert_eq!(e.hue, Some(120.0));
        assert!(e.visible);
        assert!(e.follow_body);
    }

    #[test]
    fn detach_stops_following_body() {
        let mut e = Entity::new(EntityId(1));
        e.visible = false;
        e.detach_at(Vec2::new(0.0, 6.0), 3.0);
        assert!(!e.follow_body);
        assert!(e.visible);
        assert_eq!(e.scale, 3.0);
    }
}
