use std::f64::consts::{FRAC_PI_3, PI};

use gridcaster::config::MovementConfig;
use gridcaster::movement::{self, CollisionPolicy};
use gridcaster::{Action, Camera, GridMap, InputState};

fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[test]
fn rotation_round_trips() {
    let start = Camera::new([3.5, 3.5], 0.7, FRAC_PI_3);
    for theta in [0.03, -0.5, 1.0, PI, 7.0] {
        let mut camera = start;
        camera.rotate(theta);
        camera.rotate(-theta);
        for i in 0..2 {
            assert!((camera.dir[i] - start.dir[i]).abs() < 1e-9);
            assert!((camera.plane[i] - start.plane[i]).abs() < 1e-9);
        }
    }
}

#[test]
fn many_small_turns_keep_the_basis() {
    let mut camera = Camera::new([3.5, 3.5], 0.0, FRAC_PI_3);
    let fov = camera.fov();
    for _ in 0..10_000 {
        camera.rotate(0.03);
    }
    assert!(dot(camera.dir, camera.plane).abs() < 1e-9);
    assert!((camera.fov() - fov).abs() < 1e-9);
}

#[test]
fn blocked_destination_cell_rejects_the_move() {
    // Single wall at cell (2, 2).
    let map = GridMap::parse(".....\n.....\n..#..\n.....\n.....\n").expect("map parses");
    let mut camera = Camera::new([2.9, 2.5], PI, FRAC_PI_3);

    let into_wall = [2.05 - 2.9, 0.0];
    assert!(!movement::try_move(&mut camera, &map, into_wall, CollisionPolicy::Combined));
    assert_eq!(camera.pos, [2.9, 2.5]);

    let past_wall = [1.95 - 2.9, 0.0];
    assert!(movement::try_move(&mut camera, &map, past_wall, CollisionPolicy::Combined));
    assert!((camera.pos[0] - 1.95).abs() < 1e-12);
}

#[test]
fn sliding_only_with_separated_axes() {
    let map = GridMap::parse("#####\n#...#\n#...#\n#####\n").expect("map parses");
    let pos = [3.8, 1.5];
    let delta = [0.3, 0.3];

    let combined = movement::resolve(&map, pos, delta, CollisionPolicy::Combined);
    assert_eq!(combined, pos);

    let slid = movement::resolve(&map, pos, delta, CollisionPolicy::AxisSeparated);
    assert_eq!(slid[0], 3.8);
    assert!((slid[1] - 1.8).abs() < 1e-12);
}

#[test]
fn diagonal_input_moves_at_walking_speed() {
    let camera = Camera::new([3.5, 3.5], 0.4, FRAC_PI_3);
    let input = InputState::new()
        .with(Action::MoveForward)
        .with(Action::StrafeRight);
    let delta = movement::displacement(&camera, &input, 0.05);
    assert!((delta[0].hypot(delta[1]) - 0.05).abs() < 1e-12);

    // Strafing right moves toward the right edge of the screen.
    let right = movement::displacement(&camera, &InputState::new().with(Action::StrafeRight), 1.0);
    assert!(dot(right, camera.plane) > 0.0);
}

#[test]
fn opposing_keys_cancel() {
    let camera = Camera::new([3.5, 3.5], 0.0, FRAC_PI_3);
    let input = InputState::new()
        .with(Action::MoveForward)
        .with(Action::MoveBack);
    assert_eq!(movement::displacement(&camera, &input, 0.05), [0.0, 0.0]);
}

#[test]
fn turning_left_and_looking_right_disagree() {
    let map = GridMap::builtin();
    let cfg = MovementConfig::default();

    let mut left = Camera::new([8.5, 8.5], 0.0, FRAC_PI_3);
    movement::apply(&mut left, &map, &InputState::new().with(Action::TurnLeft), &cfg);
    assert!(left.dir[1] > 0.0);

    let mut look = Camera::new([8.5, 8.5], 0.0, FRAC_PI_3);
    movement::apply(&mut look, &map, &InputState::new().with_look(10.0), &cfg);
    assert!(look.dir[1] < 0.0);
}
