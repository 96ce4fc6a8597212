use bowl_engine::{GamePhase, InputEvent, RevealMode, SpinConfig, UiState, SPIN_LABEL};
use bowl_web::GameRunner;
use lucky_bowl::bowl::{BALL_TAG, SHOWCASE_POS, SHOWCASE_SCALE};
use lucky_bowl::game::events;
use lucky_bowl::LuckyBowl;

const FRAME_DT: f32 = 1.0 / 60.0;

fn runner(config: SpinConfig, seed: u64) -> (GameRunner<LuckyBowl>, UiState) {
    let mut runner = GameRunner::new(LuckyBowl::new(config, seed).unwrap());
    runner.init();
    let mut ui = UiState::default();
    runner.flush_ui(&mut ui);
    (runner, ui)
}

fn run_until_result(runner: &mut GameRunner<LuckyBowl>, max_secs: f32) -> f32 {
    let mut elapsed = 0.0;
    while runner.game().phase() != GamePhase::Result && elapsed < max_secs {
        runner.tick(FRAME_DT);
        elapsed += FRAME_DT;
    }
    elapsed
}

#[test]
fn a_round_with_real_physics_reaches_the_result() {
    let (mut runner, mut ui) = runner(SpinConfig::default(), 42);
    assert_eq!(runner.instance_count(), 25);

    runner.push_input(InputEvent::custom(events::SPIN));
    runner.tick(FRAME_DT);
    runner.flush_ui(&mut ui);
    assert_eq!(runner.game().phase(), GamePhase::Spinning);
    assert!(!ui.trigger_enabled);

    let elapsed = run_until_result(&mut runner, 10.0);
    assert_eq!(runner.game().phase(), GamePhase::Result, "no reveal after {}s", elapsed);
    assert!(elapsed >= 2.9);

    runner.flush_ui(&mut ui);
    assert!(ui.result_visible);
    assert!(ui.result_text.is_some());

    let lucky = runner.game().sequencer().lucky_ball().unwrap();
    let shown: Vec<_> = runner.instances().instances.iter().filter(|i| i.visible > 0.0).collect();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id, lucky.0 as f32);
    assert_eq!(shown[0].x, SHOWCASE_POS.x);
    assert_eq!(shown[0].y, SHOWCASE_POS.y);
    assert_eq!(shown[0].scale, SHOWCASE_SCALE);
}

#[test]
fn the_lucky_ball_leaves_through_the_exit() {
    let config = SpinConfig::default();
    let timeout_at_ms = config.eject_at_ms() + config.reveal_timeout_ms.unwrap_or(f64::INFINITY);

    for seed in 0..10 {
        let (mut runner, _ui) = runner(config.clone(), seed);
        let spin_ms = runner.game().sequencer().elapsed_ms();
        runner.push_input(InputEvent::custom(events::SPIN));
        run_until_result(&mut runner, 10.0);
        assert_eq!(runner.game().phase(), GamePhase::Result, "seed {}: no reveal", seed);

        let took_ms = runner.game().sequencer().elapsed_ms() - spin_ms;
        assert!(
            took_ms < timeout_at_ms,
            "seed {}: revealed by the safety timeout after {} ms",
            seed,
            took_ms
        );

        let lucky = runner.game().sequencer().lucky_ball().unwrap();
        let pos = runner.ctx().body_position(lucky).unwrap();
        assert!(pos.y < config.exit_threshold_y, "seed {}: lucky ball at {:?}", seed, pos);
    }
}

#[test]
fn dismiss_starts_over_with_a_fresh_batch() {
    let (mut runner, mut ui) = runner(SpinConfig::default(), 7);
    let first_batch = runner.game().bowl().balls().to_vec();

    runner.push_input(InputEvent::KeyDown { key_code: 32 });
    run_until_result(&mut runner, 10.0);
    assert_eq!(runner.game().phase(), GamePhase::Result);

    runner.push_input(InputEvent::custom(events::DISMISS));
    runner.tick(FRAME_DT);
    runner.flush_ui(&mut ui);

    assert_eq!(runner.game().phase(), GamePhase::Idle);
    assert_eq!(runner.game().sequencer().lucky_ball(), None);
    assert!(ui.trigger_enabled);
    assert_eq!(ui.trigger_label, SPIN_LABEL);
    assert!(!ui.result_visible);

    let balls = runner.game().bowl().balls();
    assert_eq!(balls.len(), 25);
    assert!(balls.iter().all(|id| !first_batch.contains(id)));
    assert_eq!(runner.ctx().scene.find_all_by_tag(BALL_TAG).len(), 25);
    // Walls and agitator plus the new batch
    assert_eq!(runner.ctx().physics.body_count(), 4 + 25);
}

#[test]
fn fixed_delay_reveals_at_three_seconds() {
    let config = SpinConfig { reveal: RevealMode::FixedDelay, ..SpinConfig::default() };
    let (mut runner, _ui) = runner(config, 3);

    runner.push_input(InputEvent::custom(events::SPIN));
    let elapsed = run_until_result(&mut runner, 10.0);
    assert_eq!(runner.game().phase(), GamePhase::Result);
    assert!((2.95..=3.1).contains(&elapsed), "revealed after {}s", elapsed);
}

#[test]
fn frozen_world_stays_put_in_result() {
    let (mut runner, _ui) = runner(SpinConfig::default(), 11);
    runner.push_input(InputEvent::custom(events::SPIN));
    run_until_result(&mut runner, 10.0);

    let before: Vec<_> = runner.instances().instances.clone();
    for _ in 0..60 {
        runner.tick(FRAME_DT);
    }
    assert_eq!(runner.instances().instances, before);
}

#[test]
fn spin_during_a_round_changes_nothing() {
    let (mut runner, _ui) = runner(SpinConfig::default(), 5);
    runner.push_input(InputEvent::custom(events::SPIN));
    runner.tick(FRAME_DT);
    let round = runner.game().sequencer().round();

    for _ in 0..30 {
        runner.push_input(InputEvent::custom(events::SPIN));
        runner.tick(FRAME_DT);
    }
    assert_eq!(runner.game().sequencer().round(), round);
    assert_eq!(runner.game().phase(), GamePhase::Spinning);
}
