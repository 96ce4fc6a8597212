use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::api::types::EntityId;
use crate::core::timer::Scheduler;
use crate::sequencer::binding::SceneBinding;
use crate::sequencer::config::{ConfigError, RevealMode, SpinConfig};
use crate::sequencer::outcome::Outcome;
use crate::sequencer::ui::{UiCommand, SPINNING_LABEL, SPIN_LABEL};

/// Where a round is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Idle,
    Spinning,
    Result,
}

impl GamePhase {
    /// Numeric code handed to the host: 0 idle, 1 spinning, 2 result.
    pub fn code(self) -> u32 {
        match self {
            GamePhase::Idle => 0,
            GamePhase::Spinning => 1,
            GamePhase::Result => 2,
        }
    }
}

/// Notable transitions, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinEvent {
    SpinStarted,
    DisturbanceStopped,
    LuckySelected { ball: EntityId },
    Revealed { outcome: Outcome, ball: Option<EntityId> },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    StopDisturbance,
    Eject,
    RevealTimeout,
    FixedReveal,
}

/// A stage timer remembers the round that scheduled it.
#[derive(Debug, Clone, Copy)]
struct StageTimer {
    round: u64,
    stage: Stage,
}

/// Drives one bowl through Idle → Spinning → Result → Idle.
///
/// Time only advances through [`SpinSequencer::frame`]; every delayed step of a
/// round is a cancellable timer tagged with its round number.
pub struct SpinSequencer {
    config: SpinConfig,
    phase: GamePhase,
    balls: Vec<EntityId>,
    lucky: Option<EntityId>,
    outcome: Option<Outcome>,
    round: u64,
    disturbance_active: bool,
    timers: Scheduler<StageTimer>,
    rng: Pcg32,
    ui: Vec<UiCommand>,
    events: Vec<SpinEvent>,
}

impl SpinSequencer {
    pub fn new(config: SpinConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: GamePhase::Idle,
            balls: Vec::new(),
            lucky: None,
            outcome: None,
            round: 0,
            disturbance_active: false,
            timers: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            ui: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Populate the bowl and show the idle controls.
    pub fn start<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) {
        if !self.balls.is_empty() {
            scene.destroy_all_balls();
        }
        self.balls = scene.create_balls(self.config.ball_count);
        self.phase = GamePhase::Idle;
        self.ui.push(UiCommand::HideResult);
        self.ui.push(UiCommand::Trigger { enabled: true, label: SPIN_LABEL });
        info!("Bowl ready with {} balls", self.balls.len());
    }

    /// Start a round. Ignored unless idle; returns whether a round started.
    pub fn spin<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) -> bool {
        if self.phase != GamePhase::Idle {
            debug!("Spin ignored while {:?}", self.phase);
            return false;
        }

        self.round += 1;
        self.phase = GamePhase::Spinning;
        self.lucky = None;
        self.outcome = None;

        scene.apply_disturbance(self.config.disturbance_angular_velocity);
        self.disturbance_active = true;
        self.ui.push(UiCommand::Trigger { enabled: false, label: SPINNING_LABEL });
        self.events.push(SpinEvent::SpinStarted);

        self.schedule(self.config.spin_duration_ms, Stage::StopDisturbance);
        if self.config.reveal == RevealMode::FixedDelay {
            self.schedule(self.config.fixed_reveal_ms, Stage::FixedReveal);
        }

        info!("Round {} spinning", self.round);
        true
    }

    /// Advance one frame of `dt` seconds: stage timers, centering, physics, visuals, exit check.
    pub fn frame<S: SceneBinding + ?Sized>(&mut self, dt: f32, scene: &mut S) {
        for fired in self.timers.advance(f64::from(dt) * 1000.0) {
            self.on_timer(fired.payload, fired.due_ms, scene);
        }

        if self.phase != GamePhase::Result {
            self.apply_centering(scene);
            scene.step_simulation(dt);
        }

        scene.sync_visuals();

        if self.phase == GamePhase::Spinning && self.config.reveal == RevealMode::ExitThreshold {
            if let Some(ball) = self.lucky {
                let exited = scene
                    .ball_position(ball)
                    .is_some_and(|pos| pos.y < self.config.exit_threshold_y);
                if exited {
                    debug!("Lucky ball {:?} left the bowl", ball);
                    self.enter_result(scene);
                }
            }
        }
    }

    /// Abort or finish the current round and refill the bowl. No-op when idle.
    pub fn reset<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) {
        if self.phase == GamePhase::Idle {
            debug!("Reset ignored while idle");
            return;
        }

        let cancelled = self.timers.cancel_all();
        self.round += 1;
        if self.disturbance_active {
            scene.apply_disturbance(0.0);
            self.disturbance_active = false;
        }

        scene.destroy_all_balls();
        self.balls = scene.create_balls(self.config.ball_count);
        self.lucky = None;
        self.outcome = None;
        self.phase = GamePhase::Idle;

        self.ui.push(UiCommand::HideResult);
        self.ui.push(UiCommand::Trigger { enabled: true, label: SPIN_LABEL });
        self.events.push(SpinEvent::Reset);
        info!(
            "Reset to idle with {} balls ({} timers cancelled)",
            self.balls.len(),
            cancelled
        );
    }

    /// The result was tapped. Only acts while a result is shown.
    pub fn acknowledge<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) {
        if self.phase != GamePhase::Result {
            debug!("Acknowledge ignored while {:?}", self.phase);
            return;
        }
        self.reset(scene);
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn lucky_ball(&self) -> Option<EntityId> {
        self.lucky
    }

    pub fn balls(&self) -> &[EntityId] {
        &self.balls
    }

    /// Outcome of the current round, once revealed.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn trigger_enabled(&self) -> bool {
        self.phase == GamePhase::Idle
    }

    pub fn disturbance_active(&self) -> bool {
        self.disturbance_active
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Milliseconds of frame time seen so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.timers.now_ms()
    }

    /// Take queued UI commands, oldest first.
    pub fn drain_ui_commands(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.ui)
    }

    /// Take queued transition events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SpinEvent> {
        std::mem::take(&mut self.events)
    }

    fn schedule(&mut self, delay_ms: f64, stage: Stage) {
        self.timers.schedule(delay_ms, StageTimer { round: self.round, stage });
    }

    /// Chain a stage off an earlier deadline so frame granularity does not add up.
    fn schedule_after(&mut self, due_ms: f64, delay_ms: f64, stage: Stage) {
        self.timers
            .schedule_at(due_ms + delay_ms, StageTimer { round: self.round, stage });
    }

    fn on_timer<S: SceneBinding + ?Sized>(&mut self, timer: StageTimer, due_ms: f64, scene: &mut S) {
        if timer.round != self.round || self.phase != GamePhase::Spinning {
            debug!(
                "Dropping stale {:?} from round {} (now round {}, {:?})",
                timer.stage, timer.round, self.round, self.phase
            );
            return;
        }

        match timer.stage {
            Stage::StopDisturbance => {
                scene.apply_disturbance(0.0);
                self.disturbance_active = false;
                self.events.push(SpinEvent::DisturbanceStopped);
                self.schedule_after(due_ms, self.config.eject_delay_ms, Stage::Eject);
                info!("Round {} disturbance stopped", self.round);
            }
            Stage::Eject => {
                if self.lucky.is_none() {
                    self.eject(scene);
                }
                if self.config.reveal == RevealMode::ExitThreshold {
                    if let Some(timeout) = self.config.reveal_timeout_ms {
                        self.schedule_after(due_ms, timeout, Stage::RevealTimeout);
                    }
                }
            }
            Stage::RevealTimeout => {
                warn!("Lucky ball never left the bowl, revealing anyway");
                self.enter_result(scene);
            }
            Stage::FixedReveal => self.enter_result(scene),
        }
    }

    /// Pick the lucky ball uniformly from the live set and push it toward the exit.
    fn eject<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) {
        if self.balls.is_empty() {
            warn!("No balls to eject");
            return;
        }
        let ball = self.balls[self.rng.random_range(0..self.balls.len())];
        self.lucky = Some(ball);
        scene.apply_impulse(ball, self.config.exit_impulse);
        self.events.push(SpinEvent::LuckySelected { ball });
        info!("Round {} lucky ball {:?} ejected", self.round, ball);
    }

    fn enter_result<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) {
        if self.lucky.is_none() {
            self.eject(scene);
        }
        self.timers.cancel_all();
        if self.disturbance_active {
            scene.apply_disturbance(0.0);
            self.disturbance_active = false;
        }

        self.phase = GamePhase::Result;
        let outcome = Outcome::flip(&mut self.rng, self.config.lucky_probability);
        self.outcome = Some(outcome);
        if let Some(ball) = self.lucky {
            scene.showcase_ball(ball);
        }

        self.ui.push(UiCommand::ShowResult { outcome });
        self.events.push(SpinEvent::Revealed { outcome, ball: self.lucky });
        info!("Round {} revealed: {:?}", self.round, outcome);
    }

    fn apply_centering<S: SceneBinding + ?Sized>(&mut self, scene: &mut S) {
        let center = scene.centering_point();
        let magnitude = self.config.centering_force;
        for &ball in &self.balls {
            if let Some(pos) = scene.ball_position(ball) {
                let force = (center - pos).normalize_or_zero() * magnitude;
                scene.apply_force(ball, force);
            }
        }
    }
}
