use serde::Deserialize;

use crate::movement::{self, CollisionPolicy};
use crate::renderer::pack_rgb;
use crate::world::GridMap;

/// Distance at which a chasing bot stops closing in.
const BOT_STANDOFF: f64 = 0.5;
/// Distance at which a bot can hurt the player.
const BOT_ATTACK_RANGE: f64 = 0.6;
/// Sampling step for line-of-sight walks, in cells.
const SIGHT_STEP: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Treasure,
    Target,
    Bot,
}

impl EntityKind {
    pub const fn default_health(self) -> i32 {
        match self {
            EntityKind::Treasure => 1,
            EntityKind::Target => 3,
            EntityKind::Bot => 5,
        }
    }

    pub const fn color(self) -> u32 {
        match self {
            EntityKind::Treasure => pack_rgb(255, 215, 0),
            EntityKind::Target => pack_rgb(220, 40, 40),
            EntityKind::Bot => pack_rgb(60, 200, 90),
        }
    }

    pub const fn is_shootable(self) -> bool {
        matches!(self, EntityKind::Target | EntityKind::Bot)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    Static,
    /// Walks the waypoints in order, looping.
    Patrol {
        waypoints: Vec<[f64; 2]>,
        next: usize,
        speed: f64,
    },
    /// Closes in on the player while it is in sight and attacks at close range.
    Chase {
        speed: f64,
        sight_range: f64,
        cooldown_ticks: u32,
        cooldown: u32,
        damage: i32,
    },
}

/// A point entity drawn as a sprite. Dead entities (health 0) stay in the
/// collection and are skipped by rendering, rules and behaviours.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    pos: [f64; 2],
    spawn: [f64; 2],
    health: i32,
    initial_health: i32,
    behavior: Behavior,
    initial_behavior: Behavior,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: [f64; 2], health: i32, behavior: Behavior) -> Self {
        let health = health.max(0);
        Self {
            kind,
            pos,
            spawn: pos,
            health,
            initial_health: health,
            initial_behavior: behavior.clone(),
            behavior,
        }
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[inline]
    pub fn pos(&self) -> [f64; 2] {
        self.pos
    }

    #[inline]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[inline]
    pub fn has_finite_pos(&self) -> bool {
        self.pos[0].is_finite() && self.pos[1].is_finite()
    }

    /// Alive and positioned somewhere meaningful.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_alive() && self.has_finite_pos()
    }

    /// Applies damage, clamping at zero. Returns true if this hit killed it.
    pub fn damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.health.saturating_sub(amount.max(0)).max(0);
        !self.is_alive()
    }

    pub fn kill(&mut self) {
        self.health = 0;
    }

    /// Back to spawn with full health.
    pub fn reset(&mut self) {
        self.pos = self.spawn;
        self.health = self.initial_health;
        self.behavior = self.initial_behavior.clone();
    }

    pub fn distance_to(&self, p: [f64; 2]) -> f64 {
        (self.pos[0] - p[0]).hypot(self.pos[1] - p[1])
    }

    /// Runs one tick of behaviour. Returns damage dealt to the player, if any.
    pub fn update(&mut self, map: &GridMap, player: [f64; 2]) -> Option<i32> {
        if !self.is_active() {
            return None;
        }

        match &mut self.behavior {
            Behavior::Static => None,
            Behavior::Patrol {
                waypoints,
                next,
                speed,
            } => {
                if waypoints.is_empty() {
                    return None;
                }
                let goal = waypoints[*next % waypoints.len()];
                let (step, arrived) = step_toward(self.pos, goal, *speed, 0.0);
                let moved = movement::resolve(map, self.pos, step, CollisionPolicy::Combined);
                if arrived || moved == self.pos {
                    *next = (*next + 1) % waypoints.len();
                }
                self.pos = moved;
                None
            }
            Behavior::Chase {
                speed,
                sight_range,
                cooldown_ticks,
                cooldown,
                damage,
            } => {
                *cooldown = cooldown.saturating_sub(1);
                let dist = (player[0] - self.pos[0]).hypot(player[1] - self.pos[1]);

                if dist < BOT_ATTACK_RANGE && *cooldown == 0 {
                    *cooldown = *cooldown_ticks;
                    return Some(*damage);
                }

                if dist <= *sight_range && line_of_sight(map, self.pos, player) {
                    let (step, _) = step_toward(self.pos, player, *speed, BOT_STANDOFF);
                    self.pos = movement::resolve(map, self.pos, step, CollisionPolicy::Combined);
                }
                None
            }
        }
    }
}

/// Displacement of at most `speed` toward `goal`, stopping `standoff` short.
/// The flag reports whether the goal (minus standoff) is reached.
fn step_toward(from: [f64; 2], goal: [f64; 2], speed: f64, standoff: f64) -> ([f64; 2], bool) {
    let dx = goal[0] - from[0];
    let dy = goal[1] - from[1];
    let dist = dx.hypot(dy);
    let room = (dist - standoff).max(0.0);
    if dist <= f64::EPSILON || room <= f64::EPSILON {
        return ([0.0, 0.0], true);
    }
    let step = speed.min(room);
    ([dx / dist * step, dy / dist * step], step >= room)
}

/// Samples the segment `from -> to` at fixed steps; false on the first wall.
pub fn line_of_sight(map: &GridMap, from: [f64; 2], to: [f64; 2]) -> bool {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let dist = dx.hypot(dy);
    if !dist.is_finite() {
        return false;
    }
    let samples = (dist / SIGHT_STEP).ceil() as usize;
    for i in 1..samples {
        let t = i as f64 / samples as f64;
        if map.is_wall_at(from[0] + dx * t, from[1] + dy * t) {
            return false;
        }
    }
    true
}
