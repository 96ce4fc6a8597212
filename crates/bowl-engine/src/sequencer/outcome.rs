use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of a round, revealed once the lucky ball has left the bowl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Lucky,
    NotLucky,
}

impl Outcome {
    /// Second line of the result message.
    pub const PROMPT: &'static str = "Tap anywhere to play again.";

    /// Draw an outcome: lucky when a uniform draw in [0, 1) is below `lucky_probability`.
    pub fn flip<R: Rng + ?Sized>(rng: &mut R, lucky_probability: f64) -> Self {
        if rng.random::<f64>() < lucky_probability {
            Outcome::Lucky
        } else {
            Outcome::NotLucky
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Outcome::Lucky => "🎉 You're lucky!",
            Outcome::NotLucky => "😢 Better luck next time",
        }
    }

    pub fn is_lucky(self) -> bool {
        self == Outcome::Lucky
    }

    /// Markup for the result message element.
    pub fn message_html(self) -> String {
        format!("<h1>{}</h1><p>{}</p>", self.headline(), Self::PROMPT)
    }
}
