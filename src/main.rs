use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use raycast2d::renderer::Framebuffer;
use raycast2d::scaler::{ScaleLut, blit_nearest, build_scale_lut};
use raycast2d::stats::FrameStats;
use raycast2d::{Error, Result, SimConfig, Simulation};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    sim: Simulation,

    // Fixed-size buffer the simulation draws into
    fb: Framebuffer,
    scale_lut: ScaleLut,

    // HUD
    stats: FrameStats,

    // Input
    dragging: bool,

    // Pacing
    frame_interval: Duration,
    next_frame: Instant,

    // First fatal error, handed back to main after the loop exits
    failure: Option<Error>,
}

impl App {
    fn new(config: &SimConfig) -> Result<Self> {
        let sim = Simulation::new(config)?;
        let viewport = sim.viewport();
        let now = Instant::now();
        Ok(Self {
            window: None,
            surface: None,
            sim,
            fb: Framebuffer::new(viewport.width as usize, viewport.height as usize),
            scale_lut: ScaleLut::empty(),
            stats: FrameStats::new(now, Duration::from_millis(config.timing.report_interval_ms)),
            dragging: false,
            frame_interval: Duration::from_millis(config.timing.frame_interval_ms),
            next_frame: now,
            failure: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        log::error!("{err}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Raycasting")
            .with_inner_size(PhysicalSize::new(
                self.fb.width() as u32,
                self.fb.height() as u32,
            ));

        let window = Rc::new(event_loop.create_window(attributes)?);
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        let size = window.inner_size();
        log::info!("window created at {}x{}", size.width, size.height);
        self.rebuild_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        window.request_redraw();
        self.window = Some(window);
        self.next_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            log::warn!("window has zero area, skipping frame");
            return Ok(());
        };
        if self.scale_lut.dst_size() != (size.width as usize, size.height as usize) {
            self.scale_lut = build_scale_lut(
                size.width as usize,
                size.height as usize,
                self.fb.width(),
                self.fb.height(),
            );
        }

        self.sim.step(&mut self.fb)?;

        surface.resize(dw, dh)?;
        let mut buf = surface.buffer_mut()?;
        blit_nearest(&mut buf, self.fb.pixels(), &self.scale_lut);
        buf.present()?;

        if let Some(fps) = self.stats.frame(Instant::now()) {
            log::info!("rays: {}, fps: {:.1}", self.sim.ray_count(), fps);
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, event_loop: &ActiveEventLoop) -> Result<()> {
        match code {
            KeyCode::ArrowUp => {
                if self.sim.increase_rays()? {
                    log::info!("rays: {}", self.sim.ray_count());
                }
            }
            KeyCode::ArrowDown => {
                if self.sim.decrease_rays()? {
                    log::info!("rays: {}", self.sim.ray_count());
                }
            }
            KeyCode::Escape => event_loop.exit(),
            _ => (),
        }
        Ok(())
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        log::debug!(
            "presenting {}x{} framebuffer at {}x{}",
            self.fb.width(),
            self.fb.height(),
            dst_w,
            dst_h
        );
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb.width(), self.fb.height());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let result = match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested; stopping");
                event_loop.exit();
                Ok(())
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(code, event_loop),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
                Ok(())
            }

            WindowEvent::CursorMoved { position, .. } if self.dragging => {
                let (x, y) = self.scale_lut.to_source(position.x, position.y);
                self.sim.move_source(x, y).map_err(Error::from)
            }

            WindowEvent::RedrawRequested => self.redraw(id),

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
                Ok(())
            }

            _ => Ok(()),
        };

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame = now + self.frame_interval;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn run() -> Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = SimConfig::load_or_default(path.as_deref())?;
    log::info!(
        "viewport {}x{}, {} rays",
        config.viewport.width,
        config.viewport.height,
        config.rays.count
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(&config)?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("raycast2d: {err}");
        std::process::exit(1);
    }
}
