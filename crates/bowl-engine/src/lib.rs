pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod sequencer;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::timer::{Fired, Scheduler, TimerId};
pub use renderer::instance::{BallInstance, InstanceBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use systems::render::build_instance_buffer;
pub use sequencer::{
    ConfigError, GamePhase, Outcome, RevealMode, SceneBinding, SpinConfig, SpinEvent,
    SpinSequencer, UiCommand, UiState, UiSurface, SPINNING_LABEL, SPIN_LABEL,
};

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial,
};
