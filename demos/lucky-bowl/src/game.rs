//! Lucky bowl: spin the bowl, one ball flies out, find out if you're lucky.

use glam::Vec2;
use bowl_engine::api::game::GameConfig;
use bowl_engine::input::queue::{InputEvent, InputQueue};
use bowl_engine::{
    ConfigError, EngineContext, Game, GameEvent, GamePhase, SpinConfig, SpinEvent,
    SpinSequencer,
};

use crate::bowl::Bowl;

const FIXED_DT: f32 = 1.0 / 60.0;
const SPACE_KEY: u32 = 32;

/// Custom event kinds from the page buttons
pub mod events {
    pub const SPIN: u32 = 1;
    pub const DISMISS: u32 = 2;
}

/// Game event kinds to the page
pub mod game_events {
    pub const SPIN_STARTED: f32 = 1.0;
    pub const DISTURBANCE_STOPPED: f32 = 2.0;
    /// a = lucky ball id
    pub const LUCKY_SELECTED: f32 = 3.0;
    /// a = 1 lucky / 0 not, b = lucky ball id or -1
    pub const REVEALED: f32 = 4.0;
    pub const RESET: f32 = 5.0;
}

pub struct LuckyBowl {
    sequencer: SpinSequencer,
    bowl: Bowl,
}

impl LuckyBowl {
    pub fn new(config: SpinConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            sequencer: SpinSequencer::new(config, seed)?,
            bowl: Bowl::new(seed.wrapping_add(1)),
        })
    }

    /// Build from optional JSON (defaults when absent) with a fresh random seed.
    pub fn from_json_config(json: Option<&str>) -> Result<Self, ConfigError> {
        let config = match json {
            Some(json) => SpinConfig::from_json(json)?,
            None => SpinConfig::default(),
        };
        Self::new(config, rand::random())
    }

    pub fn phase(&self) -> GamePhase {
        self.sequencer.phase()
    }

    pub fn sequencer(&self) -> &SpinSequencer {
        &self.sequencer
    }

    pub fn bowl(&self) -> &Bowl {
        &self.bowl
    }

    /// Hand queued UI commands and transition events over to the engine.
    fn publish(&mut self, ctx: &mut EngineContext) {
        ctx.emit_ui(self.sequencer.drain_ui_commands());
        for event in self.sequencer.drain_events() {
            ctx.emit_event(to_game_event(event));
        }
    }
}

fn to_game_event(event: SpinEvent) -> GameEvent {
    match event {
        SpinEvent::SpinStarted => GameEvent::new(game_events::SPIN_STARTED, 0.0, 0.0, 0.0),
        SpinEvent::DisturbanceStopped => {
            GameEvent::new(game_events::DISTURBANCE_STOPPED, 0.0, 0.0, 0.0)
        }
        SpinEvent::LuckySelected { ball } => {
            GameEvent::new(game_events::LUCKY_SELECTED, ball.0 as f32, 0.0, 0.0)
        }
        SpinEvent::Revealed { outcome, ball } => GameEvent::new(
            game_events::REVEALED,
            if outcome.is_lucky() { 1.0 } else { 0.0 },
            ball.map(|b| b.0 as f32).unwrap_or(-1.0),
            0.0,
        ),
        SpinEvent::Reset => GameEvent::new(game_events::RESET, 0.0, 0.0, 0.0),
    }
}

impl Game for LuckyBowl {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: FIXED_DT,
            max_substeps: 3,
            gravity: Vec2::new(0.0, -9.82),
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.bowl.build(ctx);
        self.sequencer.start(&mut self.bowl.bind(ctx));
        self.publish(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let mut scene = self.bowl.bind(ctx);

        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, .. } if kind == events::SPIN => {
                    self.sequencer.spin(&mut scene);
                }
                InputEvent::KeyDown { key_code } if key_code == SPACE_KEY => {
                    self.sequencer.spin(&mut scene);
                }
                InputEvent::Custom { kind, .. } if kind == events::DISMISS => {
                    self.sequencer.acknowledge(&mut scene);
                }
                _ => {}
            }
        }

        self.sequencer.frame(FIXED_DT, &mut scene);
        self.publish(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bowl_engine::{EntityId, Outcome, UiCommand};

    #[test]
    fn revealed_event_packs_outcome_and_ball() {
        let event = to_game_event(SpinEvent::Revealed {
            outcome: Outcome::Lucky,
            ball: Some(EntityId(9)),
        });
        assert_eq!(event, GameEvent::new(game_events::REVEALED, 1.0, 9.0, 0.0));

        let event = to_game_event(SpinEvent::Revealed { outcome: Outcome::NotLucky, ball: None });
        assert_eq!(event.a, 0.0);
        assert_eq!(event.b, -1.0);
    }

    #[test]
    fn init_fills_the_bowl_and_enables_spin() {
        let mut game = LuckyBowl::new(SpinConfig::default(), 3).unwrap();
        let mut ctx = EngineContext::with_gravity(Vec2::new(0.0, -9.82));
        game.init(&mut ctx);

        assert_eq!(game.bowl().balls().len(), 25);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(ctx.ui.contains(&UiCommand::Trigger { enabled: true, label: bowl_engine::SPIN_LABEL }));
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(LuckyBowl::from_json_config(Some(r#"{ "ball_count": 0 }"#)).is_err());
        assert!(LuckyBowl::from_json_config(None).is_ok());
    }
}
