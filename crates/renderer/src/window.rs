use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::controls::{KeyAction, LoopSettings, SettingChange};
use crate::error::{RenderError, Result};
use crate::gl::{check_gl_error, GlContext, GraphicsApi};
use crate::runtime::{FpsCounter, FrameClock, FrameLimiter, Oscillator};
use crate::strip::Strip;
use crate::types::RendererConfig;

/// Everything that lives exactly as long as the GL context.
///
/// Field order is drop order: GL objects go before the context wrapper, and
/// the surface and context before the window they were created for.
struct Session {
    strip: Strip<GlContext>,
    gl: Rc<GlContext>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    framebuffer_size: PhysicalSize<u32>,
}

impl Session {
    fn new(event_loop: &ActiveEventLoop, config: &RendererConfig) -> Result<Self> {
        let (width, height) = config.window_size;
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(true);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|err| RenderError::Init(format!("error opening window: {err}")))?;
        let window =
            window.ok_or_else(|| RenderError::Init("display builder produced no window".into()))?;
        let window_handle = window
            .window_handle()
            .map_err(|err| RenderError::Init(format!("failed to acquire window handle: {err}")))?
            .as_raw();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 5))))
            .with_profile(GlProfile::Core)
            .with_debug(config.debug_context)
            .build(Some(window_handle));
        let display = gl_config.display();
        // SAFETY: the raw window handle belongs to `window`, which outlives the context.
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|err| RenderError::Init(format!("failed to create GL context: {err}")))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|err| RenderError::Init(format!("failed to describe GL surface: {err}")))?;
        // SAFETY: same window as above; the surface is dropped before the window.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|err| RenderError::Init(format!("failed to create GL surface: {err}")))?;
        let context = not_current
            .make_current(&surface)
            .map_err(|err| RenderError::Init(format!("failed to make GL context current: {err}")))?;

        // SAFETY: `context` was just made current on this thread and is never
        // released; `Session` drops every GL user before the context itself.
        let mut gl = unsafe { GlContext::load(&display) };
        if gl.has_debug_flag() {
            gl.install_debug_output();
            check_gl_error(&gl)?;
        }
        info!(
            renderer = %gl.renderer_name(),
            version = %gl.version(),
            samples = gl_config.num_samples(),
            debug_output = gl.debug_output(),
            "OpenGL context ready"
        );
        gl.enable_multisample();
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        check_gl_error(&gl)?;

        let gl = Rc::new(gl);
        let framebuffer_size = window.inner_size();
        apply_viewport(gl.as_ref(), framebuffer_size);
        info!(
            width = framebuffer_size.width,
            height = framebuffer_size.height,
            aspect = config.aspect_ratio(),
            "window created"
        );

        Ok(Self {
            strip: Strip::new(gl.clone()),
            gl,
            surface,
            context,
            window,
            framebuffer_size,
        })
    }

    fn set_swap_interval(&self, interval: u32) -> Result<()> {
        let swap_interval = match NonZeroU32::new(interval) {
            Some(frames) => SwapInterval::Wait(frames),
            None => SwapInterval::DontWait,
        };
        self.surface
            .set_swap_interval(&self.context, swap_interval)
            .map_err(|err| {
                RenderError::Present(format!("driver rejected swap interval {interval}: {err}"))
            })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.framebuffer_size = size;
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(&self.context, width, height);
        }
        apply_viewport(self.gl.as_ref(), size);
        debug!(width = size.width, height = size.height, "framebuffer resized");
    }

    fn draw(&mut self, offset: f32) -> Result<()> {
        clear_frame(self.gl.as_ref())?;
        self.strip.draw(offset)
    }

    fn present(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|err| RenderError::Present(format!("failed to swap buffers: {err}")))?;
        check_gl_error(self.gl.as_ref())
    }
}

/// Binds the window framebuffer and clears it to the clear colour.
fn clear_frame<G: GraphicsApi + ?Sized>(gl: &G) -> Result<()> {
    gl.bind_default_framebuffer();
    gl.clear_color_buffer();
    check_gl_error(gl)
}

/// Maps rendering onto the whole framebuffer. A minimised window gets an empty viewport.
fn apply_viewport<G: GraphicsApi + ?Sized>(gl: &G, size: PhysicalSize<u32>) {
    let width = i32::try_from(size.width).unwrap_or(i32::MAX);
    let height = i32::try_from(size.height).unwrap_or(i32::MAX);
    gl.viewport(0, 0, width, height);
}

// glutin-winit reports a missing config as an error before calling the picker.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() > best.num_samples() {
                candidate
            } else {
                best
            }
        })
        .expect("glutin only calls the picker with at least one matching config")
}

/// Timing state carried across loop iterations.
struct FrameTiming {
    clock: FrameClock,
    fps: FpsCounter,
    limiter: FrameLimiter,
    oscillator: Oscillator,
}

impl FrameTiming {
    fn new(now: Instant) -> Self {
        Self {
            clock: FrameClock::new(now),
            fps: FpsCounter::new(),
            limiter: FrameLimiter::new(now),
            oscillator: Oscillator::new(),
        }
    }

    /// Per-frame bookkeeping before drawing: returns the strip offset and the
    /// deadline the frame must wait for.
    fn begin_frame(&mut self, settings: &LoopSettings, now: Instant) -> (f32, Option<Instant>) {
        let elapsed = self.clock.tick(now);
        if let Some(fps) = self.fps.record(elapsed) {
            info!("fps: {fps:>6.2}");
        }
        let deadline = self.limiter.next_deadline(settings.fps_limit);
        let offset = self.oscillator.advance(settings.speed, elapsed);
        (offset, deadline)
    }
}

/// winit application driving one test window.
pub(crate) struct App {
    config: RendererConfig,
    settings: LoopSettings,
    session: Option<Session>,
    timing: FrameTiming,
    error: Option<RenderError>,
}

impl App {
    pub(crate) fn new(config: RendererConfig) -> Self {
        Self {
            settings: config.settings.clone(),
            config,
            session: None,
            timing: FrameTiming::new(Instant::now()),
            error: None,
        }
    }

    /// Returns the first error that stopped the loop, if any.
    pub(crate) fn finish(mut self) -> Result<()> {
        self.session.take();
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        debug!("stopping render loop: {err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn run_frame(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let (offset, deadline) = self.timing.begin_frame(&self.settings, Instant::now());
        session.draw(offset)?;
        self.timing.limiter.wait(deadline);
        session.present()
    }

    /// Pushes the vsync setting to the driver; a refusal reverts the setting.
    fn apply_swap_interval(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let interval = self.settings.swap_interval();
        match session.set_swap_interval(interval) {
            Ok(()) => info!("swap interval {interval}"),
            Err(err) => {
                let current = self.settings.revert_vsync();
                warn!(current, "{err}");
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(action) = KeyAction::from_key_code(code) else {
            return;
        };
        match self.settings.apply(action) {
            SettingChange::CloseRequested => {
                info!("quit requested from keyboard");
                event_loop.exit();
            }
            SettingChange::SwapInterval(_) => self.apply_swap_interval(),
            SettingChange::Speed(speed) => info!("speed {speed}"),
            SettingChange::FpsLimit(limit) => info!("fps limit {limit}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        match Session::new(event_loop, &self.config) {
            Ok(session) => {
                info!("initialisation complete, entering frame loop");
                self.session = Some(session);
                self.apply_swap_interval();
                self.timing = FrameTiming::new(Instant::now());
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.session.as_ref().map(|session| session.window.id()) != Some(id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                info!("close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.resize(size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }
        if let Err(err) = self.run_frame() {
            self.fail(event_loop, err);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            let size = session.framebuffer_size;
            drop(session);
            debug!(
                width = size.width,
                height = size.height,
                "window and GL context released"
            );
        }
    }
}
