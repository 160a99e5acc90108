use tracing::debug;

use crate::camera::Camera;
use crate::caster;
use crate::config::RulesConfig;
use crate::entity::{Entity, EntityKind, line_of_sight};
use crate::input::{Action, InputState};
use crate::world::GridMap;

/// Things that happened during a tick, reported to the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    TreasureCollected { entity: usize },
    ShotFired,
    EntityHit { entity: usize, health: i32 },
    EntityKilled { entity: usize },
    PlayerHit { damage: i32, health: i32 },
    PlayerDied,
    /// Every treasure has been collected.
    Won,
}

/// Player-side state the rules read and write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStats {
    pub health: i32,
    pub max_health: i32,
    pub score: u32,
}

impl PlayerStats {
    pub fn new(health: i32) -> Self {
        let health = health.max(1);
        Self {
            health,
            max_health: health,
            score: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Clamped at zero. Returns true if this hit was fatal.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount.max(0)).max(0);
        was_alive && !self.is_alive()
    }
}

pub struct RuleContext<'a> {
    pub map: &'a GridMap,
    pub camera: &'a Camera,
    pub input: &'a InputState,
    pub entities: &'a mut [Entity],
    pub player: &'a mut PlayerStats,
}

/// Pickup/combat policy plugged into the game state.
pub trait Rules {
    fn name(&self) -> &'static str;

    fn apply(&mut self, ctx: &mut RuleContext<'_>, events: &mut Vec<GameEvent>);

    /// Called when a round restarts.
    fn reset(&mut self) {}
}

/// Walk over a treasure to collect it; collect them all to win.
#[derive(Debug, Clone)]
pub struct TreasureHunt {
    radius: f64,
}

impl TreasureHunt {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Rules for TreasureHunt {
    fn name(&self) -> &'static str {
        "treasure_hunt"
    }

    fn apply(&mut self, ctx: &mut RuleContext<'_>, events: &mut Vec<GameEvent>) {
        let player = ctx.camera.pos;
        let mut any_treasure = false;
        let mut collected_now = false;

        for (index, entity) in ctx.entities.iter_mut().enumerate() {
            if entity.kind() != EntityKind::Treasure {
                continue;
            }
            any_treasure = true;
            if entity.is_active() && entity.distance_to(player) < self.radius {
                entity.kill();
                ctx.player.score += 1;
                collected_now = true;
                debug!(entity = index, score = ctx.player.score, "treasure collected");
                events.push(GameEvent::TreasureCollected { entity: index });
            }
        }

        let all_collected = ctx
            .entities
            .iter()
            .filter(|e| e.kind() == EntityKind::Treasure)
            .all(|e| !e.is_alive());
        if any_treasure && collected_now && all_collected {
            events.push(GameEvent::Won);
        }
    }
}

/// Hitscan shooting at targets and bots along the view axis.
#[derive(Debug, Clone)]
pub struct Shooting {
    damage: i32,
    cooldown_ticks: u32,
    cooldown: u32,
    hit_radius: f64,
}

impl Shooting {
    pub fn new(damage: i32, cooldown_ticks: u32, hit_radius: f64) -> Self {
        Self {
            damage,
            cooldown_ticks,
            cooldown: 0,
            hit_radius,
        }
    }

    /// Nearest live shootable entity on the crosshair and in front of the
    /// wall the player is looking at.
    fn pick_target(&self, ctx: &RuleContext<'_>) -> Option<usize> {
        let camera = ctx.camera;
        let wall = caster::cast_ray(ctx.map, camera.pos, camera.dir).perp_dist;
        let plane_len = camera.plane[0].hypot(camera.plane[1]);

        ctx.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind().is_shootable() && e.is_active())
            .filter_map(|(index, e)| {
                let [lateral, depth] = camera.world_to_camera(e.pos())?;
                let on_crosshair = (lateral * plane_len).abs() <= self.hit_radius;
                (depth > 0.0 && depth < wall && on_crosshair).then_some((index, depth, e.pos()))
            })
            .filter(|(_, _, pos)| line_of_sight(ctx.map, camera.pos, *pos))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _, _)| index)
    }
}

impl Rules for Shooting {
    fn name(&self) -> &'static str {
        "shooting"
    }

    fn apply(&mut self, ctx: &mut RuleContext<'_>, events: &mut Vec<GameEvent>) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if !ctx.input.is_down(Action::Fire) || self.cooldown > 0 {
            return;
        }
        self.cooldown = self.cooldown_ticks;
        events.push(GameEvent::ShotFired);

        let Some(index) = self.pick_target(ctx) else {
            return;
        };
        let entity = &mut ctx.entities[index];
        let killed = entity.damage(self.damage);
        events.push(GameEvent::EntityHit {
            entity: index,
            health: entity.health(),
        });
        if killed {
            ctx.player.score += 1;
            debug!(entity = index, kind = ?entity.kind(), "entity killed");
            events.push(GameEvent::EntityKilled { entity: index });
        }
    }

    fn reset(&mut self) {
        self.cooldown = 0;
    }
}

/// Rule set enabled by the config.
pub fn from_config(cfg: &RulesConfig) -> Vec<Box<dyn Rules>> {
    let mut rules: Vec<Box<dyn Rules>> = Vec::new();
    if cfg.treasure_hunt {
        rules.push(Box::new(TreasureHunt::new(cfg.pickup_radius)));
    }
    if cfg.shooting {
        rules.push(Box::new(Shooting::new(
            cfg.shot_damage,
            cfg.fire_cooldown_ticks,
            cfg.hit_radius,
        )));
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Behavior;

    fn hall() -> GridMap {
        GridMap::parse("##########\n#........#\n#........#\n##########\n").unwrap()
    }

    fn camera_at(x: f64, y: f64) -> Camera {
        Camera {
            pos: [x, y],
            dir: [1.0, 0.0],
            plane: [0.0, -0.66],
        }
    }

    #[test]
    fn collecting_the_last_treasure_wins() {
        let map = hall();
        let camera = camera_at(3.2, 1.5);
        let input = InputState::new();
        let mut entities = vec![
            Entity::new(EntityKind::Treasure, [3.5, 1.5], 1, Behavior::Static),
            Entity::new(EntityKind::Treasure, [7.5, 1.5], 1, Behavior::Static),
        ];
        let mut player = PlayerStats::new(100);
        let mut rules = TreasureHunt::new(0.5);
        let mut events = Vec::new();

        let mut ctx = RuleContext {
            map: &map,
            camera: &camera,
            input: &input,
            entities: &mut entities,
            player: &mut player,
        };
        rules.apply(&mut ctx, &mut events);
        assert_eq!(events, vec![GameEvent::TreasureCollected { entity: 0 }]);

        let camera = camera_at(7.4, 1.5);
        let mut ctx = RuleContext {
            map: &map,
            camera: &camera,
            input: &input,
            entities: &mut entities,
            player: &mut player,
        };
        events.clear();
        rules.apply(&mut ctx, &mut events);
        assert_eq!(
            events,
            vec![GameEvent::TreasureCollected { entity: 1 }, GameEvent::Won]
        );
        assert_eq!(player.score, 2);
    }

    #[test]
    fn shooting_hits_nearest_on_crosshair_and_respects_cooldown() {
        let map = hall();
        let camera = camera_at(1.5, 1.5);
        let input = InputState::new().with(Action::Fire);
        let mut entities = vec![
            Entity::new(EntityKind::Target, [6.5, 1.5], 1, Behavior::Static),
            Entity::new(EntityKind::Target, [4.5, 1.55], 2, Behavior::Static),
            Entity::new(EntityKind::Target, [3.5, 2.5], 1, Behavior::Static),
        ];
        let mut player = PlayerStats::new(100);
        let mut rules = Shooting::new(1, 3, 0.3);

        let mut fire = |entities: &mut Vec<Entity>, player: &mut PlayerStats| {
            let mut events = Vec::new();
            let mut ctx = RuleContext {
                map: &map,
                camera: &camera,
                input: &input,
                entities: entities.as_mut_slice(),
                player,
            };
            rules.apply(&mut ctx, &mut events);
            events
        };

        let events = fire(&mut entities, &mut player);
        assert_eq!(
            events,
            vec![GameEvent::ShotFired, GameEvent::EntityHit { entity: 1, health: 1 }]
        );

        // Cooling down.
        assert!(fire(&mut entities, &mut player).is_empty());
        assert!(fire(&mut entities, &mut player).is_empty());

        let events = fire(&mut entities, &mut player);
        assert!(events.contains(&GameEvent::EntityKilled { entity: 1 }));
        assert_eq!(player.score, 1);

        // The dead target no longer shields the far one.
        for _ in 0..3 {
            let _ = fire(&mut entities, &mut player);
        }
        assert_eq!(entities[0].health(), 0);
        assert_eq!(entities[2].health(), 1);
    }

    #[test]
    fn treasures_cannot_be_shot_and_walls_stop_shots() {
        let map = GridMap::parse("#######\n#..#..#\n#######\n").unwrap();
        let camera = camera_at(1.5, 1.5);
        let input = InputState::new().with(Action::Fire);
        let mut entities = vec![
            Entity::new(EntityKind::Treasure, [2.5, 1.5], 1, Behavior::Static),
            Entity::new(EntityKind::Bot, [4.5, 1.5], 1, Behavior::Static),
        ];
        let mut player = PlayerStats::new(100);
        let mut events = Vec::new();
        let mut ctx = RuleContext {
            map: &map,
            camera: &camera,
            input: &input,
            entities: &mut entities,
            player: &mut player,
        };
        Shooting::new(1, 10, 0.3).apply(&mut ctx, &mut events);
        assert_eq!(events, vec![GameEvent::ShotFired]);
    }

    #[test]
    fn player_damage_is_clamped() {
        let mut player = PlayerStats::new(20);
        assert!(!player.take_damage(15));
        assert!(player.take_damage(15));
        assert_eq!(player.health, 0);
        assert!(!player.take_damage(15));
    }
}
