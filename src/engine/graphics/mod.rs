pub mod mesh;
pub mod pipeline_descriptor_set_layouts;
pub mod primitives;
pub mod render_info;
pub mod vulkano_renderer;

pub use vulkano_renderer::VulkanoRenderer;

// NOTE: winit does not provide a Vulkan context. `vulkano_util` creates the instance and
// device; the surface is built from the window's raw handles.
