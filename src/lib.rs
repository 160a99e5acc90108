//! Grid raycaster: DDA wall casting, depth-tested sprites and a small
//! first-person game loop over a 2D occupancy map.
//!
//! A frame runs input → [`movement`] → [`caster`] (filling a
//! [`DepthBuffer`]) → [`sprites`]. [`game::FrameLoop`] ties those together
//! around a [`renderer::FrameBuffer`]; the windowed host lives in the binary.

pub mod camera;
pub mod caster;
pub mod config;
pub mod depth;
pub mod entity;
pub mod error;
pub mod game;
pub mod input;
pub mod movement;
pub mod renderer;
pub mod rules;
pub mod scaler;
pub mod sprites;
pub mod world;

pub use camera::Camera;
pub use config::Config;
pub use depth::DepthBuffer;
pub use entity::{Behavior, Entity, EntityKind};
pub use error::{Error, Result};
pub use game::{FrameLoop, GameState};
pub use input::{Action, InputState};
pub use world::{Cell, GridMap};
