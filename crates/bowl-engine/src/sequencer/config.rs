use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a spinning round decides it is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Reveal once the lucky ball drops below `exit_threshold_y`.
    #[default]
    ExitThreshold,
    /// Reveal `fixed_reveal_ms` after the spin started, wherever the balls are.
    FixedDelay,
}

/// Tunables for one bowl. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Balls created at start and after every reset.
    pub ball_count: usize,
    /// How long the agitator spins.
    pub spin_duration_ms: f64,
    /// Pause between the agitator stopping and the lucky ball being ejected.
    pub eject_delay_ms: f64,
    /// Agitator angular velocity while spinning, rad/s.
    pub disturbance_angular_velocity: f32,
    /// Impulse applied to the lucky ball, toward the exit.
    pub exit_impulse: Vec2,
    /// The lucky ball has left the bowl once its y is below this.
    pub exit_threshold_y: f32,
    /// Magnitude of the per-frame pull toward the bowl centre.
    pub centering_force: f32,
    /// Chance that a revealed round is lucky.
    pub lucky_probability: f64,
    pub reveal: RevealMode,
    /// In `ExitThreshold` mode, force the reveal this long after ejection.
    pub reveal_timeout_ms: Option<f64>,
    /// In `FixedDelay` mode, reveal this long after the spin started.
    pub fixed_reveal_ms: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            ball_count: 25,
            spin_duration_ms: 2000.0,
            eject_delay_ms: 1000.0,
            disturbance_angular_velocity: 12.0,
            exit_impulse: Vec2::new(20.0, 10.0),
            exit_threshold_y: -5.0,
            centering_force: 2.0,
            lucky_probability: 0.5,
            reveal: RevealMode::ExitThreshold,
            reveal_timeout_ms: Some(5000.0),
            fixed_reveal_ms: 3000.0,
        }
    }
}

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ball_count must be at least 1")]
    NoBalls,
    #[error("lucky_probability must be within [0, 1], got {0}")]
    Probability(f64),
    #[error("{field} must be a finite, non-negative number of milliseconds, got {value}")]
    Duration { field: &'static str, value: f64 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpinConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SpinConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ball_count == 0 {
            return Err(ConfigError::NoBalls);
        }
        if !(0.0..=1.0).contains(&self.lucky_probability) {
            return Err(ConfigError::Probability(self.lucky_probability));
        }

        let mut durations = vec![
            ("spin_duration_ms", self.spin_duration_ms),
            ("eject_delay_ms", self.eject_delay_ms),
            ("fixed_reveal_ms", self.fixed_reveal_ms),
        ];
        if let Some(timeout) = self.reveal_timeout_ms {
            durations.push(("reveal_timeout_ms", timeout));
        }
        for (field, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Duration { field, value });
            }
        }
        Ok(())
    }

    /// Milliseconds from the spin to the lucky ball's ejection.
    pub fn eject_at_ms(&self) -> f64 {
        self.spin_duration_ms + self.eject_delay_ms
    }
}
