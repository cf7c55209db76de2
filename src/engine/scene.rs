use std::f32::consts::FRAC_PI_2;

use glam::Mat4;

use crate::engine::camera::PerspectiveCamera;
use crate::engine::config::{TerrainConfig, rgb_from_hex};
use crate::engine::graphics::primitives::{EulerRotation, Fog, WireMaterial};
use crate::engine::terrain::{TerrainAnimator, VertexGrid};
use crate::engine::user_input::{ViewportEvent, pointer_tilt};
use crate::engine::viewport::Viewport;

/// Everything the frame callback and the input handlers share.
///
/// Lives for the whole run on the event-loop thread; handlers and ticks take
/// `&mut self` one at a time, so there is no locking.
#[derive(Debug, Clone)]
pub struct SceneContext {
    animator: TerrainAnimator,
    terrain_rotation: EulerRotation,
    camera: PerspectiveCamera,
    viewport: Viewport,
    material: WireMaterial,
    fog: Fog,
    clear_color: [f32; 4],
    pointer_divisor: f32,
}

impl SceneContext {
    pub fn new(config: &TerrainConfig, viewport: Viewport) -> Self {
        let plane = &config.plane;
        let grid = VertexGrid::plane(plane.width, plane.height, plane.segments_x, plane.segments_y);
        let animator = TerrainAnimator::initialize(grid, config.wave.params());

        // Fallback when the window is not sized yet: the configured window size.
        let aspect = viewport
            .aspect()
            .unwrap_or((config.window.width / config.window.height) as f32);
        let camera = PerspectiveCamera::from_config(&config.camera, aspect);

        let bg = rgb_from_hex(config.style.fog_color);

        log::info!(
            "[Scene] terrain {}x{} segments, {} vertices, viewport {}x{} @{}",
            plane.segments_x,
            plane.segments_y,
            animator.grid().len(),
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );

        Self {
            animator,
            terrain_rotation: EulerRotation::new(-FRAC_PI_2, 0.0, 0.0),
            camera,
            viewport,
            material: WireMaterial::from_style(&config.style),
            fog: Fog::from_style(&config.style),
            clear_color: [bg[0], bg[1], bg[2], 1.0],
            pointer_divisor: config.pointer_divisor,
        }
    }

    /// One animation step: heights, then the slow spin about the terrain's up axis.
    pub fn tick(&mut self, dt_sec: f32) {
        self.animator.tick(dt_sec);
        self.terrain_rotation.z = self.animator.spin() as f32;
    }

    pub fn handle_event(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::Resized { width, height } => self.on_resize(width, height),
            ViewportEvent::ScaleFactorChanged(ratio) => self.on_scale_factor(ratio),
            ViewportEvent::PointerMoved { x, y } => self.on_pointer_move(x, y),
        }
    }

    /// New physical surface size. Camera aspect follows unless the surface has no area.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::from_physical(width, height, self.viewport.pixel_ratio);
        if let Some(aspect) = self.viewport.aspect() {
            self.camera.aspect = aspect;
            self.camera.update_projection();
        }
        log::debug!("[Scene] resized to {}x{} (physical)", width, height);
    }

    pub fn on_scale_factor(&mut self, pixel_ratio: f64) {
        let [w, h] = self.viewport.physical_size();
        self.viewport = Viewport::from_physical(w, h, pixel_ratio);
    }

    /// Cursor at physical `(x, y)`; tilts the terrain, overriding the flat baseline.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let ratio = self.viewport.pixel_ratio;
        let (tilt_x, tilt_y) =
            pointer_tilt(x / ratio, y / ratio, self.viewport.center(), self.pointer_divisor);
        self.terrain_rotation.x = -FRAC_PI_2 + tilt_x;
        self.terrain_rotation.y = tilt_y;
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.terrain_rotation.to_mat4()
    }

    pub fn animator(&self) -> &TerrainAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut TerrainAnimator {
        &mut self.animator
    }

    pub fn grid(&self) -> &VertexGrid {
        self.animator.grid()
    }

    pub fn terrain_rotation(&self) -> EulerRotation {
        self.terrain_rotation
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn material(&self) -> &WireMaterial {
        &self.material
    }

    pub fn fog(&self) -> &Fog {
        &self.fog
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }
}
