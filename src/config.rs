use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::Camera;
use crate::entity::{Behavior, Entity, EntityKind};
use crate::error::{Error, Result};
use crate::movement::CollisionPolicy;
use crate::world::GridMap;

/// Top-level configuration, usually read from a TOML file. Every section has
/// defaults that reproduce the classic treasure-hunt setup.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub movement: MovementConfig,
    pub map: MapConfig,
    pub entities: Vec<EntitySpec>,
    pub rules: RulesConfig,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub x: f64,
    pub y: f64,
    /// Facing, degrees counter-clockwise from +X.
    pub facing_deg: f64,
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            x: 8.0,
            y: 8.0,
            facing_deg: 180.0,
            // Plane magnitude 0.66.
            fov_deg: 2.0 * 0.66f64.atan().to_degrees(),
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        Camera::new(
            [self.x, self.y],
            self.facing_deg.to_radians(),
            self.fov_deg.to_radians(),
        )
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementConfig {
    /// Map cells per tick.
    pub speed: f64,
    /// Radians per tick while a turn key is held.
    pub turn_speed: f64,
    /// Radians per pointer unit.
    pub mouse_sensitivity: f64,
    pub collision: CollisionPolicy,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 0.05,
            turn_speed: 0.03,
            mouse_sensitivity: 0.002,
            collision: CollisionPolicy::Combined,
        }
    }
}

/// Map source: inline rows, a text file, or the built-in layout.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub path: Option<PathBuf>,
    pub rows: Option<Vec<String>>,
}

impl MapConfig {
    pub fn load(&self) -> Result<GridMap> {
        if let Some(rows) = &self.rows {
            return GridMap::from_rows(rows);
        }
        match &self.path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
                GridMap::parse(&text)
            }
            None => Ok(GridMap::builtin()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySpec {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub health: Option<i32>,
    #[serde(default)]
    pub behavior: BehaviorSpec,
}

impl EntitySpec {
    pub fn build(&self) -> Entity {
        let health = self.health.unwrap_or(self.kind.default_health());
        Entity::new(self.kind, [self.x, self.y], health, self.behavior.build())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorSpec {
    #[default]
    Static,
    Patrol {
        waypoints: Vec<[f64; 2]>,
        #[serde(default = "default_patrol_speed")]
        speed: f64,
    },
    Chase {
        #[serde(default = "default_chase_speed")]
        speed: f64,
        #[serde(default = "default_sight_range")]
        sight_range: f64,
        #[serde(default = "default_attack_cooldown")]
        cooldown_ticks: u32,
        #[serde(default = "default_attack_damage")]
        damage: i32,
    },
}

fn default_patrol_speed() -> f64 {
    0.02
}

fn default_chase_speed() -> f64 {
    0.025
}

fn default_sight_range() -> f64 {
    8.0
}

fn default_attack_cooldown() -> u32 {
    60
}

fn default_attack_damage() -> i32 {
    10
}

impl BehaviorSpec {
    pub fn build(&self) -> Behavior {
        match self {
            BehaviorSpec::Static => Behavior::Static,
            BehaviorSpec::Patrol { waypoints, speed } => Behavior::Patrol {
                waypoints: waypoints.clone(),
                next: 0,
                speed: *speed,
            },
            BehaviorSpec::Chase {
                speed,
                sight_range,
                cooldown_ticks,
                damage,
            } => Behavior::Chase {
                speed: *speed,
                sight_range: *sight_range,
                cooldown_ticks: *cooldown_ticks,
                cooldown: 0,
                damage: *damage,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub treasure_hunt: bool,
    pub shooting: bool,
    pub pickup_radius: f64,
    pub player_health: i32,
    pub shot_damage: i32,
    pub fire_cooldown_ticks: u32,
    /// Largest sideways miss, in cells, that still counts as a hit.
    pub hit_radius: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            treasure_hunt: true,
            shooting: false,
            pickup_radius: 0.5,
            player_health: 100,
            shot_damage: 1,
            fire_cooldown_ticks: 15,
            hit_radius: 0.3,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config.with_default_entities())
    }

    /// Built-in map, classic spawn and a single treasure.
    pub fn classic() -> Self {
        Self::default().with_default_entities()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Classic single-treasure setup used when no entities are configured.
    fn with_default_entities(mut self) -> Self {
        if self.entities.is_empty() && self.rules.treasure_hunt {
            self.entities.push(EntitySpec {
                kind: EntityKind::Treasure,
                x: 3.5,
                y: 3.5,
                health: None,
                behavior: BehaviorSpec::Static,
            });
        }
        self
    }

    /// Checks the settings against the loaded map.
    pub fn validate(&self, map: &GridMap) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }
        if !(self.camera.fov_deg > 0.0 && self.camera.fov_deg < 180.0) {
            return invalid(format!("fov_deg must be in (0, 180), got {}", self.camera.fov_deg));
        }
        if !(self.movement.speed > 0.0) || !(self.movement.turn_speed > 0.0) {
            return invalid("movement speeds must be positive".to_string());
        }
        if map.is_wall_at(self.camera.x, self.camera.y) {
            return invalid(format!(
                "spawn ({}, {}) is inside a wall",
                self.camera.x, self.camera.y
            ));
        }
        for spec in &self.entities {
            if !spec.x.is_finite() || !spec.y.is_finite() {
                return invalid(format!("entity {:?} has a non-finite position", spec.kind));
            }
        }
        Ok(())
    }
}
