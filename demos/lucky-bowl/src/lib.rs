use wasm_bindgen::prelude::*;
use bowl_engine::*;

pub mod bowl;
pub mod game;

pub use game::LuckyBowl;

bowl_web::export_game!(
    LuckyBowl,
    "lucky-bowl",
    spin = game::events::SPIN,
    dismiss = game::events::DISMISS
);
