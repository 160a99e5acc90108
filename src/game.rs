use tracing::{debug, info};

use crate::camera::Camera;
use crate::config::{Config, MovementConfig};
use crate::depth::DepthBuffer;
use crate::entity::Entity;
use crate::error::Result;
use crate::input::InputState;
use crate::movement;
use crate::renderer::{self, FrameBuffer, FrameStats, Palette};
use crate::rules::{self, GameEvent, PlayerStats, RuleContext, Rules};
use crate::world::GridMap;

/// Everything one game session mutates, passed explicitly instead of living
/// in globals.
pub struct GameState {
    map: GridMap,
    camera: Camera,
    spawn: Camera,
    entities: Vec<Entity>,
    player: PlayerStats,
    movement: MovementConfig,
    rules: Vec<Box<dyn Rules>>,
    ticks: u64,
}

impl GameState {
    pub fn new(
        map: GridMap,
        camera: Camera,
        entities: Vec<Entity>,
        movement: MovementConfig,
        player: PlayerStats,
        rules: Vec<Box<dyn Rules>>,
    ) -> Self {
        Self {
            map,
            spawn: camera,
            camera,
            entities,
            player,
            movement,
            rules,
            ticks: 0,
        }
    }

    /// Loads the map, validates the config against it and builds the session.
    pub fn from_config(config: &Config) -> Result<Self> {
        let map = config.map.load()?;
        config.validate(&map)?;

        let entities = config.entities.iter().map(|spec| spec.build()).collect();
        let rules = rules::from_config(&config.rules);
        info!(
            width = map.width(),
            height = map.height(),
            rules = ?rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            "game state ready"
        );

        Ok(Self::new(
            map,
            config.camera.build(),
            entities,
            config.movement,
            PlayerStats::new(config.rules.player_health),
            rules,
        ))
    }

    #[inline]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances one tick: player control, entity behaviours, then rules.
    /// A won or lost round restarts before returning.
    pub fn tick(&mut self, input: &InputState) -> Vec<GameEvent> {
        self.ticks += 1;
        let mut events = Vec::new();

        movement::apply(&mut self.camera, &self.map, input, &self.movement);

        let player_pos = self.camera.pos;
        for entity in &mut self.entities {
            let Some(damage) = entity.update(&self.map, player_pos) else {
                continue;
            };
            let fatal = self.player.take_damage(damage);
            events.push(GameEvent::PlayerHit {
                damage,
                health: self.player.health,
            });
            if fatal {
                events.push(GameEvent::PlayerDied);
            }
        }

        let mut ctx = RuleContext {
            map: &self.map,
            camera: &self.camera,
            input,
            entities: &mut self.entities,
            player: &mut self.player,
        };
        for rule in &mut self.rules {
            rule.apply(&mut ctx, &mut events);
        }

        for event in &events {
            debug!(tick = self.ticks, ?event, "game event");
        }

        if events.contains(&GameEvent::Won) {
            info!(score = self.player.score, "round won");
            self.reset_round();
        } else if events.contains(&GameEvent::PlayerDied) {
            info!(score = self.player.score, "player died");
            self.reset_round();
        }

        events
    }

    /// Puts the player back at spawn and restores every entity. Score is kept.
    pub fn reset_round(&mut self) {
        self.camera = self.spawn;
        self.player.health = self.player.max_health;
        for entity in &mut self.entities {
            entity.reset();
        }
        for rule in &mut self.rules {
            rule.reset();
        }
    }
}

/// Result of one frame-loop step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub events: Vec<GameEvent>,
    pub stats: FrameStats,
}

/// Tick-then-render driver. The host calls [`FrameLoop::step`] once per
/// display refresh; each call runs to completion.
pub struct FrameLoop {
    state: GameState,
    frame: FrameBuffer,
    depth: DepthBuffer,
    palette: Palette,
    running: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new(state: GameState, width: usize, height: usize) -> Self {
        Self {
            state,
            frame: FrameBuffer::new(width, height),
            depth: DepthBuffer::new(width),
            palette: Palette::default(),
            running: true,
            frames: 0,
        }
    }

    /// Runs one tick and renders it. `None` once stopped.
    pub fn step(&mut self, input: &InputState) -> Option<StepReport> {
        if !self.running {
            return None;
        }

        let events = self.state.tick(input);
        let stats = renderer::render_frame(
            &mut self.frame,
            &self.palette,
            &self.state.map,
            &self.state.camera,
            &self.state.entities,
            &mut self.depth,
        );
        self.frames += 1;

        Some(StepReport { events, stats })
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(frames = self.frames, "frame loop stopped");
        }
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[inline]
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Behavior, EntityKind};
    use crate::input::Action;

    fn small_state(entities: Vec<Entity>, rules: Vec<Box<dyn Rules>>) -> GameState {
        let map = GridMap::parse("########\n#......#\n#......#\n########\n").unwrap();
        let camera = Camera {
            pos: [1.5, 1.5],
            dir: [1.0, 0.0],
            plane: [0.0, -0.66],
        };
        GameState::new(
            map,
            camera,
            entities,
            MovementConfig::default(),
            PlayerStats::new(20),
            rules,
        )
    }

    #[test]
    fn walking_onto_treasure_wins_and_resets() {
        let treasure = Entity::new(EntityKind::Treasure, [2.5, 1.5], 1, Behavior::Static);
        let rules: Vec<Box<dyn Rules>> = vec![Box::new(rules::TreasureHunt::new(0.5))];
        let mut state = small_state(vec![treasure], rules);
        let forward = InputState::new().with(Action::MoveForward);

        let mut won = false;
        for _ in 0..20 {
            if state.tick(&forward).contains(&GameEvent::Won) {
                won = true;
                break;
            }
        }
        assert!(won);
        assert_eq!(state.player().score, 1);
        assert_eq!(state.camera().pos, [1.5, 1.5]);
        assert!(state.entities()[0].is_alive());
    }

    #[test]
    fn bots_can_kill_the_player() {
        let bot = Entity::new(
            EntityKind::Bot,
            [2.0, 1.5],
            5,
            Behavior::Chase {
                speed: 0.05,
                sight_range: 8.0,
                cooldown_ticks: 1,
                cooldown: 0,
                damage: 10,
            },
        );
        let mut state = small_state(vec![bot], Vec::new());
        let idle = InputState::new();

        let first = state.tick(&idle);
        assert_eq!(first, vec![GameEvent::PlayerHit { damage: 10, health: 10 }]);
        let second = state.tick(&idle);
        assert!(second.contains(&GameEvent::PlayerDied));
        assert_eq!(state.player().health, 20);
        assert_eq!(state.entities()[0].pos(), [2.0, 1.5]);
    }

    #[test]
    fn stopped_loop_does_nothing() {
        let mut frame_loop = FrameLoop::new(small_state(Vec::new(), Vec::new()), 32, 24);
        let report = frame_loop.step(&InputState::new()).unwrap();
        assert_eq!(report.stats.stripes, 32);
        assert_eq!(frame_loop.frames(), 1);

        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert!(frame_loop.step(&InputState::new()).is_none());
        assert_eq!(frame_loop.frames(), 1);
        assert_eq!(frame_loop.state().ticks(), 1);
    }
}
