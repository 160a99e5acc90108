use serde::Deserialize;

use crate::camera::Camera;
use crate::config::MovementConfig;
use crate::input::{Action, InputState};
use crate::world::GridMap;

/// How a blocked displacement is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// X and Y are tested and committed independently, so the mover slides
    /// along a wall when only one axis is blocked.
    AxisSeparated,
    /// The combined destination cell is tested once and both axes commit or
    /// neither does.
    #[default]
    Combined,
}

/// Signed turn for this tick. Keys and pointer share one convention:
/// positive turns left, so pointer motion to the right is negated.
pub fn turn_angle(input: &InputState, cfg: &MovementConfig) -> f64 {
    let keys = input.axis(Action::TurnLeft, Action::TurnRight) * cfg.turn_speed;
    let look = -input.look_delta * cfg.mouse_sensitivity;
    keys + look
}

/// Raw movement intent in world space, before normalisation.
pub fn intent(camera: &Camera, input: &InputState) -> [f64; 2] {
    let fwd = input.axis(Action::MoveForward, Action::MoveBack);
    let strafe = input.axis(Action::StrafeRight, Action::StrafeLeft);

    let plane_len = camera.plane[0].hypot(camera.plane[1]);
    let right = if plane_len > 0.0 {
        [camera.plane[0] / plane_len, camera.plane[1] / plane_len]
    } else {
        [0.0, 0.0]
    };

    [
        camera.dir[0] * fwd + right[0] * strafe,
        camera.dir[1] * fwd + right[1] * strafe,
    ]
}

/// Per-tick displacement: the intent normalised and scaled by `speed`, so
/// diagonal input is no faster than a single axis.
pub fn displacement(camera: &Camera, input: &InputState, speed: f64) -> [f64; 2] {
    let [x, y] = intent(camera, input);
    let len = x.hypot(y);
    if len <= f64::EPSILON || !len.is_finite() {
        return [0.0, 0.0];
    }
    let inv = speed / len;
    [x * inv, y * inv]
}

/// Resolves `pos + delta` against the grid. Out-of-bounds destinations count
/// as walls.
pub fn resolve(map: &GridMap, pos: [f64; 2], delta: [f64; 2], policy: CollisionPolicy) -> [f64; 2] {
    match policy {
        CollisionPolicy::Combined => {
            let dest = [pos[0] + delta[0], pos[1] + delta[1]];
            if map.is_wall_at(dest[0], dest[1]) {
                pos
            } else {
                dest
            }
        }
        CollisionPolicy::AxisSeparated => {
            let mut out = pos;
            if !map.is_wall_at(pos[0] + delta[0], out[1]) {
                out[0] += delta[0];
            }
            if !map.is_wall_at(out[0], pos[1] + delta[1]) {
                out[1] += delta[1];
            }
            out
        }
    }
}

/// Moves the camera by `delta` under `policy`. Returns whether the position
/// changed.
pub fn try_move(camera: &mut Camera, map: &GridMap, delta: [f64; 2], policy: CollisionPolicy) -> bool {
    let next = resolve(map, camera.pos, delta, policy);
    let moved = next != camera.pos;
    camera.pos = next;
    moved
}

/// One tick of player control: rotation first, then translation along the
/// rotated basis.
pub fn apply(camera: &mut Camera, map: &GridMap, input: &InputState, cfg: &MovementConfig) {
    camera.rotate(turn_angle(input, cfg));
    let delta = displacement(camera, input, cfg.speed);
    if delta != [0.0, 0.0] {
        let _ = try_move(camera, map, delta, cfg.collision);
    }
}
