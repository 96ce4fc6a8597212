// sequencer/
//
// The spin/reveal round logic. `SpinSequencer` owns the phase, the lucky ball
// and the stage timers; it reaches the world only through `SceneBinding` and
// talks to the page only through queued `UiCommand`s.

pub mod binding;
pub mod config;
pub mod outcome;
pub mod spin;
pub mod ui;

pub use binding::SceneBinding;
pub use config::{ConfigError, RevealMode, SpinConfig};
pub use outcome::Outcome;
pub use spin::{GamePhase, SpinEvent, SpinSequencer};
pub use ui::{UiCommand, UiState, UiSurface, SPINNING_LABEL, SPIN_LABEL};
