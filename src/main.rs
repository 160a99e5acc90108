use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::config::Config;
use gridcaster::rules::GameEvent;
use gridcaster::scaler::Upscaler;
use gridcaster::{Action, FrameLoop, GameState, InputState};

#[derive(Parser, Debug)]
#[command(name = "gridcaster")]
#[command(about = "First-person grid raycaster")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text map, overrides the config's map
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Initial window size as a multiple of the viewport
    #[arg(long, default_value_t = 1.5)]
    scale: f64,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    frame_loop: FrameLoop,
    upscaler: Upscaler,
    input: InputState,
    viewport: (usize, usize),
    scale: f64,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
}

impl App {
    fn new(frame_loop: FrameLoop, viewport: (usize, usize), scale: f64) -> Self {
        Self {
            window: None,
            surface: None,
            frame_loop,
            upscaler: Upscaler::default(),
            input: InputState::new(),
            viewport,
            scale,
            frame_counter: 0,
            last_fps_print: Instant::now(),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.viewport;
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(w as f64 * self.scale, h as f64 * self.scale));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(host_err)
                .context("create window")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(host_err)
            .context("softbuffer context")?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(host_err)
            .context("softbuffer surface")?;

        let size = window.inner_size();
        self.upscaler
            .resize(w, h, size.width as usize, size.height as usize);

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    fn on_key(&mut self, code: KeyCode, state: ElementState, event_loop: &ActiveEventLoop) {
        if code == KeyCode::Escape && state == ElementState::Pressed {
            self.frame_loop.stop();
            event_loop.exit();
            return;
        }
        if let Some(action) = action_for(code) {
            self.input.set(action, state == ElementState::Pressed);
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        let Some(report) = self.frame_loop.step(&self.input) else {
            return Ok(());
        };
        self.input.end_tick();
        for event in &report.events {
            if matches!(event, GameEvent::Won | GameEvent::PlayerDied) {
                info!(?event, score = self.frame_loop.state().player().score, "round over");
            }
        }

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface
            .resize(dw, dh)
            .map_err(host_err)
            .context("resize surface")?;

        let (vw, vh) = self.viewport;
        self.upscaler
            .resize(vw, vh, dw.get() as usize, dh.get() as usize);

        let mut buf = surface
            .buffer_mut()
            .map_err(host_err)
            .context("buffer_mut")?;
        self.upscaler.blit(self.frame_loop.frame().pixels(), &mut buf);
        buf.present()
            .map_err(host_err)
            .context("present")?;

        // Report FPS
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

/// Windowing and surface errors are reported by message only.
fn host_err<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow::anyhow!("{err}")
}

fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Action::MoveForward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Action::MoveBack),
        KeyCode::KeyA => Some(Action::StrafeLeft),
        KeyCode::KeyD => Some(Action::StrafeRight),
        KeyCode::KeyQ | KeyCode::ArrowLeft => Some(Action::TurnLeft),
        KeyCode::KeyE | KeyCode::ArrowRight => Some(Action::TurnRight),
        KeyCode::Space => Some(Action::Fire),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            error!("{err:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                self.frame_loop.stop();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.on_key(code, state, event_loop),

            WindowEvent::Focused(false) => {
                // Keys released while unfocused never arrive.
                self.input = InputState::new();
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    error!("{err:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                let (vw, vh) = self.viewport;
                self.upscaler
                    .resize(vw, vh, new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, _) } = event {
            self.input.look_delta += dx;
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::classic(),
    };
    if let Some(map) = args.map {
        config.map.rows = None;
        config.map.path = Some(map);
    }

    let state = GameState::from_config(&config).context("building game state")?;
    let viewport = (config.viewport.width, config.viewport.height);
    let frame_loop = FrameLoop::new(state, viewport.0, viewport.1);
    info!(width = viewport.0, height = viewport.1, "starting");

    let event_loop = EventLoop::new().map_err(host_err).context("create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(frame_loop, viewport, args.scale);
    event_loop.run_app(&mut app).map_err(host_err).context("event loop")?;
    Ok(())
}
