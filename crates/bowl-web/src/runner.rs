use bowl_engine::{
    Game, GameConfig, EngineContext, InputEvent, InputQueue, InstanceBuffer,
    FixedTimestep, UiSurface,
};
use bowl_engine::systems::render::build_instance_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly. Nothing here touches the DOM, so the same runner
/// drives the native simulator and the tests.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    instances: InstanceBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_substeps);

        #[cfg(feature = "physics")]
        let ctx = {
            let mut ctx = EngineContext::with_gravity(config.gravity);
            ctx.physics.set_dt(config.fixed_dt);
            ctx
        };
        #[cfg(not(feature = "physics"))]
        let ctx = EngineContext::new();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            instances: InstanceBuffer::new(),
            timestep,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        build_instance_buffer(self.ctx.scene.iter(), &mut self.instances);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame of `dt` seconds: fixed steps, then the instance buffer.
    /// Returns the number of fixed steps taken.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.initialized {
            return 0;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        // Input reaches the first step only; a frame without steps keeps it queued
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            self.input.clear();
        }

        if self.ctx.events.len() > self.config.max_events {
            log::warn!(
                "Dropping {} game events over the per-frame cap",
                self.ctx.events.len() - self.config.max_events
            );
            self.ctx.events.truncate(self.config.max_events);
        }

        build_instance_buffer(self.ctx.scene.iter(), &mut self.instances);
        steps
    }

    /// Apply queued UI commands to `surface`. Returns how many were applied.
    pub fn flush_ui(&mut self, surface: &mut dyn UiSurface) -> usize {
        let commands = self.ctx.take_ui();
        surface.apply_all(&commands);
        commands.len()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ---- Pointer accessors for host reads of wasm memory ----

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bowl_engine::{GameEvent, UiCommand, UiState, SPINNING_LABEL};

    /// Counts steps and the custom events each step saw.
    #[derive(Default)]
    struct Probe {
        steps: u32,
        seen: Vec<usize>,
    }

    impl Game for Probe {
        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.emit_ui([UiCommand::Trigger { enabled: false, label: SPINNING_LABEL }]);
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.steps += 1;
            self.seen.push(input.len());
            for _ in 0..40 {
                ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
            }
        }
    }

    fn runner() -> GameRunner<Probe> {
        let mut runner = GameRunner::new(Probe::default());
        runner.init();
        runner
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = GameRunner::new(Probe::default());
        assert_eq!(runner.tick(1.0 / 60.0), 0);
        assert_eq!(runner.game().steps, 0);
    }

    #[test]
    fn substeps_are_capped() {
        let mut runner = runner();
        assert_eq!(runner.tick(1.0), 3);
    }

    #[test]
    fn input_reaches_first_step_only() {
        let mut runner = runner();
        runner.push_input(InputEvent::custom(1));
        runner.tick(0.001);
        assert!(runner.game().seen.is_empty(), "no step yet, input stays queued");

        runner.tick(2.0 / 60.0);
        assert_eq!(runner.game().seen, vec![1, 0]);
    }

    #[test]
    fn events_are_capped_per_frame() {
        let mut runner = runner();
        runner.tick(1.0 / 60.0 + 0.0001);
        assert_eq!(runner.game_events_len(), runner.max_events());
    }

    #[test]
    fn flush_ui_hands_over_commands_once() {
        let mut runner = runner();
        let mut ui = UiState::default();
        assert_eq!(runner.flush_ui(&mut ui), 1);
        assert!(!ui.trigger_enabled);
        assert_eq!(runner.flush_ui(&mut ui), 0);
    }
}
