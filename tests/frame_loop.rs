use gridcaster::config::Config;
use gridcaster::rules::GameEvent;
use gridcaster::{Action, EntityKind, Error, FrameLoop, GameState, InputState};

#[test]
fn classic_config_renders_frames() {
    let state = GameState::from_config(&Config::classic()).expect("classic config is valid");
    let mut frame_loop = FrameLoop::new(state, 64, 48);
    let input = InputState::new().with(Action::TurnLeft);

    for _ in 0..10 {
        let report = frame_loop.step(&input).expect("running");
        assert_eq!(report.stats.stripes, 64);
    }
    assert_eq!(frame_loop.frames(), 10);
    assert_eq!(frame_loop.frame().pixels().len(), 64 * 48);
    assert!(frame_loop.depth().as_slice().iter().all(|d| *d > 0.0));

    frame_loop.stop();
    assert!(frame_loop.step(&input).is_none());
}

#[test]
fn toml_config_builds_a_shooting_range() {
    let text = r#"
        [viewport]
        width = 80
        height = 60

        [camera]
        x = 1.5
        y = 1.5
        facing_deg = 0.0

        [map]
        rows = [
            "11111111",
            "10000001",
            "11111111",
        ]

        [rules]
        treasure_hunt = false
        shooting = true
        fire_cooldown_ticks = 2

        [[entities]]
        kind = "target"
        x = 5.5
        y = 1.5
        health = 1
    "#;
    let config = Config::from_toml_str(text).expect("config parses");
    let state = GameState::from_config(&config).expect("config is valid");
    assert_eq!(state.entities().len(), 1);
    assert_eq!(state.entities()[0].kind(), EntityKind::Target);

    let mut frame_loop = FrameLoop::new(state, 80, 60);
    let idle = frame_loop.step(&InputState::new()).expect("running");
    assert!(idle.stats.sprite_slices > 0);

    let shot = frame_loop
        .step(&InputState::new().with(Action::Fire))
        .expect("running");
    assert!(shot.events.contains(&GameEvent::EntityKilled { entity: 0 }));
    assert_eq!(shot.stats.sprite_slices, 0);
    assert_eq!(frame_loop.state().player().score, 1);
}

#[test]
fn spawning_inside_a_wall_is_rejected() {
    let text = r#"
        [camera]
        x = 0.5
        y = 0.5
    "#;
    let config = Config::from_toml_str(text).expect("config parses");
    assert!(matches!(
        GameState::from_config(&config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn unknown_keys_are_config_errors() {
    assert!(matches!(
        Config::from_toml_str("[viewport]\ndepth = 3\n"),
        Err(Error::Config(_))
    ));
}
