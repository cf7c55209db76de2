// Render-related debug helpers that don't neatly fit anywhere else.
//
// Currently just owns the RT_PRINT_FRAME_INFO env-var gating and printing.

use glam::Mat4;

pub const PRINT_FRAME_INFO_ENV: &str = "RT_PRINT_FRAME_INFO";

pub struct RenderInfo;

impl RenderInfo {
    pub fn enabled() -> bool {
        std::env::var(PRINT_FRAME_INFO_ENV).ok().as_deref() == Some("1")
    }

    /// Dump the first frame's parameters when `RT_PRINT_FRAME_INFO=1`.
    pub fn maybe_print_frame_info(
        current_frame: u64,
        extent: [u32; 2],
        vertex_count: usize,
        index_count: u32,
        view: &Mat4,
        proj: &Mat4,
        model: &Mat4,
    ) {
        if current_frame != 0 || !Self::enabled() {
            return;
        }

        log::info!(
            "[Renderer] frame debug: extent={}x{} vertices={} line_indices={}",
            extent[0],
            extent[1],
            vertex_count,
            index_count
        );
        log::info!("[Renderer] view={:?}", view.to_cols_array());
        log::info!("[Renderer] proj={:?}", proj.to_cols_array());
        log::info!("[Renderer] model={:?}", model.to_cols_array());
    }
}
