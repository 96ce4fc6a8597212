use crate::core::scene::Scene;
use crate::api::types::{EntityId, GameEvent};
use crate::input::queue::InputQueue;
use crate::sequencer::ui::UiCommand;
#[cfg(feature = "physics")]
use crate::core::physics::{PhysicsWorld, BodyDesc, ColliderMaterial};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum fixed steps a single frame may run (default: 3).
    pub max_substeps: u32,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Y points up, so gravity is negative Y.
    #[cfg(feature = "physics")]
    pub gravity: glam::Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_substeps: 3,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: glam::Vec2::new(0.0, -9.82),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. The game owns physics stepping so it can freeze the world.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    /// UI commands waiting for the host to apply them.
    pub ui: Vec<UiCommand>,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            events: Vec::new(),
            ui: Vec::new(),
            next_id: 1,
            #[cfg(feature = "physics")]
            physics: PhysicsWorld::new(Vec2::ZERO),
        }
    }

    /// Create an EngineContext with a custom gravity vector.
    #[cfg(feature = "physics")]
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            physics: PhysicsWorld::new(gravity),
            ..Self::new()
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue UI commands for the host surface.
    pub fn emit_ui(&mut self, commands: impl IntoIterator<Item = UiCommand>) {
        self.ui.extend(commands);
    }

    /// Take every queued UI command, oldest first.
    pub fn take_ui(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.ui)
    }

    /// Clear per-frame transient data. UI commands survive until taken.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    /// Set the force acting on an entity's body for the next step, replacing the previous one.
    #[cfg(feature = "physics")]
    pub fn apply_force(&mut self, id: EntityId, force: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_force(&body, force);
        }
    }

    /// Apply an instantaneous impulse to an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.apply_impulse(&body, impulse);
        }
    }

    /// Set the angular velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn set_angular_velocity(&mut self, id: EntityId, angvel: f32) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_angular_velocity(&body, angvel);
        }
    }

    /// Let an entity's body pass through every other body, or collide again.
    #[cfg(feature = "physics")]
    pub fn set_collisions_enabled(&mut self, id: EntityId, enabled: bool) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_collisions_enabled(&body, enabled);
        }
    }

    /// Current physics position of an entity's body, if it has one.
    #[cfg(feature = "physics")]
    pub fn body_position(&self, id: EntityId) -> Option<Vec2> {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.body_position(body).0)
    }

    /// Advance the physics simulation by `dt` seconds. Visuals are left untouched.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self, dt: f32) {
        self.physics.set_dt(dt);
        self.physics.step();
    }

    /// Copy body transforms onto the entities that still follow their body.
    #[cfg(feature = "physics")]
    pub fn sync_visuals(&mut self) {
        for entity in self.scene.iter_mut() {
            if !entity.follow_body {
                continue;
            }
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::ui::SPIN_LABEL;

    #[test]
    fn ui_commands_survive_frame_clear() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        ctx.emit_ui([UiCommand::HideResult, UiCommand::Trigger { enabled: true, label: SPIN_LABEL }]);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
        assert_eq!(ctx.take_ui().len(), 2);
        assert!(ctx.ui.is_empty());
    }

    #[test]
    fn ids_are_sequential() {
        let mut ctx = EngineContext::new();
        assert_eq!(ctx.next_id(), EntityId(1));
        assert_eq!(ctx.next_id(), EntityId(2));
    }
}
