//! Chromaphone - an audio-visual toy
//!
//! The webcam feed becomes a mirror of colored blocks; six fixed points
//! probe the blocky image every tick, and the hue under each one is
//! played as a sound.

mod audio;
mod capture;
mod cli;
mod grid;
mod palette;
mod params;
mod rendering;
mod session;
mod trigger;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::{AudioEngine, SoundPack};
use capture::CameraFeed;
use cli::Args;
use grid::PixelGrid;
use params::{timing, CaptureConfig, GridConfig, RenderConfig, SAMPLE_POINTS};
use rendering::{RenderSystem, Uniforms};
use session::Session;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Started on the explicit start gesture, None while idle
    feed: Option<CameraFeed>,
    audio: Option<AudioEngine>,

    // Trigger pipeline
    session: Session,
    grid: PixelGrid,
    running: bool,

    // Configuration
    capture_config: CaptureConfig,
    grid_config: GridConfig,
    render_config: RenderConfig,
    samples_dir: PathBuf,
    initial_pack: SoundPack,

    // Time tracking
    start_time: Instant,
    next_tick: Instant,
}

impl App {
    fn new(args: &Args) -> Self {
        let capture_config = args.capture_config();
        let grid_config = args.grid_config();
        let trigger_config = args.trigger_config();
        let render_config = RenderConfig::default();

        let cols = grid_config.cols_for(render_config.window_width);
        let rows = grid_config.rows_for(render_config.window_height);

        Self {
            window: None,
            render_system: None,
            feed: None,
            audio: None,
            session: Session::new(&SAMPLE_POINTS, trigger_config.cooldown_ms),
            grid: PixelGrid::new(cols, rows),
            running: false,
            capture_config,
            grid_config,
            render_config,
            samples_dir: args.samples_dir.clone(),
            initial_pack: args.parse_pack(),
            start_time: Instant::now(),
            next_tick: Instant::now(),
        }
    }

    /// One-way Idle -> Running transition: open the camera, bring up
    /// the audio output, and start probing. Stays idle on failure.
    fn start_session(&mut self) {
        if self.running {
            return;
        }

        let feed = match CameraFeed::open(&self.capture_config) {
            Ok(feed) => feed,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        };

        let engine = match AudioEngine::new(&self.samples_dir, self.initial_pack) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        };

        self.feed = Some(feed);
        self.audio = Some(engine);
        self.running = true;

        println!("\nRunning! Keys: 1 = samples, 2 = synth, ESC quits\n");
    }

    fn select_pack(&mut self, pack: SoundPack) {
        if let Some(engine) = &mut self.audio {
            engine.set_pack(pack);
        }
    }

    /// One probe/trigger pass, then refresh what the shader sees
    fn tick(&mut self) {
        let time_ms = self.start_time.elapsed().as_millis() as u64;

        if self.running {
            if let Some(feed) = &mut self.feed {
                if let Some(frame) = feed.poll() {
                    self.grid.update_from_frame(
                        &frame.pixels,
                        frame.width as usize,
                        frame.height as usize,
                    );
                }
            }

            let events = self.session.probe(&self.grid, time_ms);
            if let Some(engine) = &self.audio {
                for event in events {
                    engine.trigger(event.bucket);
                }
            }
        }

        if let Some(render_system) = &mut self.render_system {
            render_system.update_grid(&self.grid);
            let uniforms = Uniforms::new(
                self.session.points(),
                &self.render_config,
                self.render_config.window_width,
                self.render_config.window_height,
                self.start_time.elapsed().as_secs_f32(),
                self.running,
            );
            render_system.update_uniforms(&uniforms);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref render_system) = self.render_system else {
            return;
        };
        if let Err(e) = render_system.render() {
            eprintln!("Render error: {:?}", e);
        }
    }

    /// Viewport resize: new cell counts, trigger state untouched
    fn handle_resize(&mut self, width: u32, height: u32) {
        self.render_config.window_width = width.max(1);
        self.render_config.window_height = height.max(1);
        self.grid.resize(
            self.grid_config.cols_for(width),
            self.grid_config.rows_for(height),
        );
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(width, height);
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            self.tick();
            self.next_tick = now + Duration::from_millis(timing::TICK_INTERVAL_MS);
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Chromaphone - press SPACE to start")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.grid.cols() as u32,
            self.grid.rows() as u32,
        ))
        .unwrap();

        println!("\nChromaphone is ready.");
        println!("Press SPACE to start the camera and unmute, ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.handle_resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Space => {
                    self.start_session();
                    if let Some(window) = &self.window {
                        window.set_title("Chromaphone");
                    }
                }
                KeyCode::Digit1 => self.select_pack(SoundPack::Samples),
                KeyCode::Digit2 => self.select_pack(SoundPack::Synth),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

fn main() {
    println!("Chromaphone - webcam colors turned into sound");

    let args = Args::parse();
    let mut app = App::new(&args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
