use crate::engine::EngineResult;
use crate::engine::SceneContext;
use crate::engine::terrain::VertexGrid;
use crate::engine::user_input::ViewportEvent;

/// What the animation loop needs from whoever presents frames.
///
/// The loop never schedules itself: the host calls `AnimationLoop::advance` on its
/// frame signal and is asked for the next one via `request_next_frame`.
pub trait FrameHost {
    /// Re-upload grid heights. Only called when the grid was marked dirty.
    fn upload_grid(&mut self, grid: &VertexGrid) -> EngineResult<()>;

    fn render(&mut self, scene: &SceneContext) -> EngineResult<()>;

    fn request_next_frame(&mut self);

    /// New physical surface size.
    fn resize_surface(&mut self, size: [u32; 2]);
}

pub struct AnimationLoop<'a, H: FrameHost> {
    scene: &'a mut SceneContext,
    host: &'a mut H,
}

impl<'a, H: FrameHost> AnimationLoop<'a, H> {
    pub fn new(scene: &'a mut SceneContext, host: &'a mut H) -> Self {
        Self { scene, host }
    }

    /// Tick, upload if dirty, render, then ask for the next frame.
    ///
    /// A surface with no area (minimized window) pauses the loop: nothing ticks and
    /// no frame is requested until a resize with a real size comes in.
    pub fn advance(&mut self, dt_sec: f32) -> EngineResult<()> {
        if self.scene.viewport().aspect().is_none() {
            log::trace!("[AnimationLoop] surface has no area, paused");
            return Ok(());
        }

        self.scene.tick(dt_sec);

        if self.scene.animator_mut().grid_mut().take_dirty() {
            self.host.upload_grid(self.scene.grid())?;
        }

        self.host.render(&*self.scene)?;
        self.host.request_next_frame();
        Ok(())
    }

    /// Route an input/viewport event to the scene, resizing the surface when needed.
    pub fn handle_event(&mut self, event: ViewportEvent) {
        self.scene.handle_event(event);
        match event {
            ViewportEvent::Resized { .. } | ViewportEvent::ScaleFactorChanged(_) => {
                self.host.resize_surface(self.scene.viewport().physical_size());
                self.host.request_next_frame();
            }
            ViewportEvent::PointerMoved { .. } => {}
        }
    }
}
