use std::sync::Arc;
use std::time::Instant;

use crate::engine::config::TerrainConfig;
use crate::engine::graphics::VulkanoRenderer;
use crate::engine::user_input::UserInput;
use crate::engine::viewport::Viewport;
use crate::engine::{AnimationLoop, EngineError, EngineResult, SceneContext};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// Minimal winit wrapper (2025 winit style: ApplicationHandler).
///
/// The redraw signal drives `AnimationLoop::advance`; every rendered frame asks for
/// the next redraw, so the terrain animates until the window closes.
pub struct Windowing;

impl Windowing {
    pub fn run_app(config: TerrainConfig) -> EngineResult<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App {
            config,
            window: None,
            scene: None,
            renderer: VulkanoRenderer::new(),
            user_input: UserInput::new(),
            last_frame: None,
            error: None,
        };

        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    config: TerrainConfig,
    window: Option<Arc<Window>>,
    scene: Option<SceneContext>,
    renderer: VulkanoRenderer,
    user_input: UserInput,
    last_frame: Option<Instant>,
    /// First fatal error; the loop exits and `run_app` returns it.
    error: Option<EngineError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("[Windowing] {err}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> EngineResult<()> {
        let attrs: WindowAttributes = Window::default_attributes()
            .with_title(self.config.window.container_id.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());
        let scene = SceneContext::new(&self.config, viewport);

        self.renderer.init_for_window(&window)?;

        window.request_redraw();
        self.window = Some(window);
        self.scene = Some(scene);
        self.last_frame = Some(Instant::now());
        Ok(())
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

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = self
                    .last_frame
                    .replace(now)
                    .map(|prev| (now - prev).as_secs_f32())
                    .unwrap_or(0.0);

                let Some(scene) = self.scene.as_mut() else {
                    return;
                };

                let result = AnimationLoop::new(scene, &mut self.renderer).advance(dt);
                if let Err(err) = result {
                    self.fail(event_loop, err);
                }
            }

            other => {
                let Some(ev) = self.user_input.handle_window_event(&other) else {
                    return;
                };
                if let Some(scene) = self.scene.as_mut() {
                    AnimationLoop::new(scene, &mut self.renderer).handle_event(ev);
                }
            }
        }
    }
}
