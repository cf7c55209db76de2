pub mod animation_loop;
pub mod camera;
pub mod cli;
pub mod config;
pub mod graphics;
pub mod headless;
pub mod scene;
pub mod terrain;
pub mod user_input;
pub mod viewport;
pub mod windowing;

pub use animation_loop::AnimationLoop;
pub use scene::SceneContext;
pub use windowing::Windowing;

use thiserror::Error;

/// Engine-level error type.
///
/// The terrain math itself never fails; everything here comes from the host
/// (window/Vulkan) or from the config/CLI layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("renderer error: {0}")]
    Renderer(Box<dyn std::error::Error>),

    #[error("renderer not initialized (call init_for_window first)")]
    RendererNotInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}

impl EngineError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
