pub mod dom;
pub mod runner;

use std::cell::Cell;

pub use dom::{DomSurface, StartupError};
pub use runner::GameRunner;

/// Claim a once-per-page startup. True for the first caller only.
pub fn first_start(started: &Cell<bool>) -> bool {
    !started.replace(true)
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// This macro generates:
/// - `thread_local!` storage for the GameRunner, its DOM surface and a started flag
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, game_spin, game_dismiss, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use bowl_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// bowl_web::export_game!(MyGame, "my-game", spin = game::events::SPIN, dismiss = game::events::DISMISS);
/// ```
///
/// # Arguments
///
/// - `$game_type`: implements `bowl_engine::Game` and provides
///   `from_json_config(Option<&str>) -> Result<Self, ConfigError>` and `phase() -> GamePhase`
/// - `$game_name`: A string literal used in the initialization log message
/// - `spin`, `dismiss`: the `InputEvent::Custom` kinds the game reads for the two buttons
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal, spin = $spin:expr, dismiss = $dismiss:expr) => {
        use std::cell::RefCell;

        thread_local! {
            static STARTED: std::cell::Cell<bool> = std::cell::Cell::new(false);
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
            static SURFACE: RefCell<Option<$crate::DomSurface>> = RefCell::new(None);
        }

        /// Run `f` against the runner. `None` until `game_init` succeeded.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        fn push_command(kind: u32) {
            if with_runner(|r| r.push_input(InputEvent::custom(kind))).is_none() {
                log::debug!("Command {} before init ignored", kind);
            }
        }

        fn run_frame(dt: f32) {
            with_runner(|r| {
                r.tick(dt);
                SURFACE.with(|cell| {
                    if let Some(surface) = cell.borrow_mut().as_mut() {
                        r.flush_ui(surface);
                    }
                });
            });
        }

        fn startup(config_json: Option<&str>) -> Result<(), $crate::StartupError> {
            let mut surface = $crate::DomSurface::bind()?;
            let game = <$game_type>::from_json_config(config_json)?;

            let mut runner = $crate::GameRunner::new(game);
            runner.init();
            runner.flush_ui(&mut surface);

            $crate::dom::on_click(surface.trigger(), || push_command($spin))?;
            $crate::dom::on_click(surface.overlay(), || push_command($dismiss))?;
            $crate::dom::on_key_down(|key_code| {
                with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
            })?;

            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            SURFACE.with(|cell| *cell.borrow_mut() = Some(surface));

            $crate::dom::start_frame_loop(run_frame);
            Ok(())
        }

        /// Bind the page, build the game and start the animation loop.
        /// On failure the user gets a blocking notice and nothing animates.
        /// Only the first call does anything; the loop and listeners exist once.
        #[wasm_bindgen]
        pub fn game_init(config_json: Option<String>) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            if !STARTED.with($crate::first_start) {
                log::warn!("{}: already initialized, game_init ignored", $game_name);
                return Ok(());
            }

            match startup(config_json.as_deref()) {
                Ok(()) => {
                    log::info!("{}: initialized", $game_name);
                    Ok(())
                }
                Err(err) => {
                    $crate::dom::report_fatal(&err);
                    Err(JsValue::from_str(&err.to_string()))
                }
            }
        }

        /// Advance one frame by hand. The animation loop started by `game_init` already does this.
        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            run_frame(dt);
        }

        #[wasm_bindgen]
        pub fn game_spin() {
            push_command($spin);
        }

        #[wasm_bindgen]
        pub fn game_dismiss() {
            push_command($dismiss);
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_phase() -> u32 {
            with_runner(|r| r.game().phase().code()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }
    };
}
