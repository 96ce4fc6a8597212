use crate::sequencer::outcome::Outcome;

/// Trigger label while a new round can start.
pub const SPIN_LABEL: &str = "SPIN";
/// Trigger label while a round is running.
pub const SPINNING_LABEL: &str = "SPINNING...";

/// A change the page should make to its controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Trigger { enabled: bool, label: &'static str },
    ShowResult { outcome: Outcome },
    HideResult,
}

/// Something that can present `UiCommand`s: the DOM in the browser, `UiState` elsewhere.
pub trait UiSurface {
    fn apply(&mut self, command: &UiCommand);

    fn apply_all(&mut self, commands: &[UiCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// In-memory surface mirroring what the page would show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub trigger_enabled: bool,
    pub trigger_label: &'static str,
    pub result_visible: bool,
    pub result_text: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            trigger_enabled: true,
            trigger_label: SPIN_LABEL,
            result_visible: false,
            result_text: None,
        }
    }
}

impl UiSurface for UiState {
    fn apply(&mut self, command: &UiCommand) {
        match *command {
            UiCommand::Trigger { enabled, label } => {
                self.trigger_enabled = enabled;
                self.trigger_label = label;
            }
            UiCommand::ShowResult { outcome } => {
                self.result_visible = true;
                self.result_text = Some(outcome.message_html());
            }
            UiCommand::HideResult => {
                self.result_visible = false;
            }
        }
    }
}
