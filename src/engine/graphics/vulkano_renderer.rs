use std::sync::Arc;

use winit::window::Window;

use crate::engine::animation_loop::FrameHost;
use crate::engine::graphics::mesh::{CpuMesh, MeshFactory};
use crate::engine::scene::SceneContext;
use crate::engine::terrain::VertexGrid;
use crate::engine::{EngineError, EngineResult};

mod vulkano_backend {
    use std::mem::size_of;
    use std::sync::Arc;

    use crate::engine::graphics::mesh::{CpuMesh, TerrainVertex};
    use crate::engine::graphics::pipeline_descriptor_set_layouts::PipelineDescriptorSetLayouts;
    use crate::engine::graphics::render_info::RenderInfo;
    use crate::engine::scene::SceneContext;
    use vulkano::buffer::{Buffer, BufferContents, BufferCreateInfo, BufferUsage, Subbuffer};
    use vulkano::command_buffer::{
        AutoCommandBufferBuilder, CommandBufferUsage, CopyBufferInfo, PrimaryCommandBufferAbstract,
        RenderPassBeginInfo, SubpassBeginInfo, SubpassEndInfo,
        allocator::StandardCommandBufferAllocator,
    };
    use vulkano::descriptor_set::allocator::StandardDescriptorSetAllocator;
    use vulkano::descriptor_set::{DescriptorSet, WriteDescriptorSet};
    use vulkano::format::{ClearValue, Format};
    use vulkano::image::view::ImageView;
    use vulkano::image::{Image, ImageCreateInfo, ImageType, ImageUsage, SampleCount};
    use vulkano::memory::allocator::{
        AllocationCreateInfo, MemoryTypeFilter, StandardMemoryAllocator,
    };
    use vulkano::pipeline::graphics::color_blend::{
        AttachmentBlend, BlendFactor, BlendOp, ColorBlendAttachmentState, ColorBlendState,
        ColorComponents,
    };
    use vulkano::pipeline::graphics::input_assembly::{
        InputAssemblyState, PrimitiveTopology,
    };
    use vulkano::pipeline::graphics::multisample::MultisampleState;
    use vulkano::pipeline::graphics::rasterization::RasterizationState;
    use vulkano::pipeline::graphics::subpass::PipelineSubpassType;
    use vulkano::pipeline::graphics::vertex_input::{
        VertexInputAttributeDescription, VertexInputBindingDescription, VertexInputRate,
        VertexInputState,
    };
    use vulkano::pipeline::graphics::viewport::{Scissor, Viewport, ViewportState};
    use vulkano::pipeline::layout::{PipelineLayout, PipelineLayoutCreateInfo};

    use vulkano::DeviceSize;
    use vulkano::pipeline::{
        DynamicState, GraphicsPipeline, Pipeline, PipelineBindPoint, PipelineShaderStageCreateInfo,
    };
    use vulkano::render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass};
    use vulkano::swapchain::{self, Surface, Swapchain, SwapchainCreateInfo, SwapchainPresentInfo};
    use vulkano::sync::{self, GpuFuture};
    use vulkano::{Validated, VulkanError};
    use vulkano_util::context::{VulkanoConfig, VulkanoContext};
    use winit::window::Window;

    /// Lines are rasterized multisampled and resolved into the swapchain image.
    /// 4x is always supported for colour attachments.
    const MSAA_SAMPLES: SampleCount = SampleCount::Sample4;

    /// Attachment order: multisampled colour (cleared), then the resolve target.
    pub(super) fn clear_values(clear_color: [f32; 4]) -> Vec<Option<ClearValue>> {
        vec![Some(ClearValue::from(clear_color)), None]
    }

    mod terrain_wire_vs {
        vulkano_shaders::shader! {
            ty: "vertex",
            path: "assets/shaders/terrain-wire.vert",
        }
    }

    mod terrain_wire_fs {
        vulkano_shaders::shader! {
            ty: "fragment",
            path: "assets/shaders/terrain-wire.frag",
        }
    }

    #[derive(BufferContents, Clone, Copy, Debug, Default)]
    #[repr(C, align(16))]
    pub struct CameraUBO {
        pub view: [[f32; 4]; 4],
        pub proj: [[f32; 4]; 4],
        // Terrain rotation (lay flat + pointer tilt + spin).
        pub model: [[f32; 4]; 4],
    }

    #[derive(BufferContents, Clone, Copy, Debug, Default)]
    #[repr(C, align(16))]
    struct MaterialUBO {
        color: [f32; 4],
        fog_color: [f32; 4],
        fog_density: f32,
        _pad0: [f32; 3],
    }

    pub struct VulkanoGpuTerrain {
        pub vertices: Subbuffer<[TerrainVertex]>,
        pub indices: Subbuffer<[u32]>,
        pub index_count: u32,
        pub vertex_count: usize,
    }

    pub struct VulkanoState {
        pub context: VulkanoContext,
        pub window: Arc<Window>,
        #[allow(dead_code)]
        pub surface: Arc<Surface>,
        pub swapchain: Arc<Swapchain>,
        pub render_pass: Arc<RenderPass>,
        pub framebuffers: Vec<Arc<Framebuffer>>,

        pub command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
        pub descriptor_set_allocator: Arc<StandardDescriptorSetAllocator>,
        pub set_layouts: PipelineDescriptorSetLayouts,

        pub pipeline_terrain_wire: Arc<GraphicsPipeline>,
        pub terrain: Option<VulkanoGpuTerrain>,

        pub frame_index: u64,
        pub window_resized: bool,
        pub recreate_swapchain: bool,
        pub previous_frame_end: Option<Box<dyn GpuFuture>>,
    }

    impl VulkanoState {
        fn material_ubo(scene: &SceneContext) -> MaterialUBO {
            let fog = scene.fog();
            MaterialUBO {
                color: scene.material().rgba(),
                fog_color: [fog.color[0], fog.color[1], fog.color[2], 1.0],
                fog_density: fog.density,
                _pad0: [0.0; 3],
            }
        }

        /// One framebuffer per swapchain image, all sharing a transient multisampled
        /// colour image sized to the swapchain.
        fn create_framebuffers(
            render_pass: &Arc<RenderPass>,
            memory_allocator: Arc<StandardMemoryAllocator>,
            swapchain_views: Vec<Arc<ImageView>>,
        ) -> Result<Vec<Arc<Framebuffer>>, Box<dyn std::error::Error>> {
            let Some(first) = swapchain_views.first() else {
                return Ok(Vec::new());
            };
            let target = first.image();
            let msaa_color = ImageView::new_default(Image::new(
                memory_allocator,
                ImageCreateInfo {
                    image_type: ImageType::Dim2d,
                    format: target.format(),
                    extent: target.extent(),
                    usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::TRANSIENT_ATTACHMENT,
                    samples: MSAA_SAMPLES,
                    ..Default::default()
                },
                AllocationCreateInfo::default(),
            )?)?;

            swapchain_views
                .into_iter()
                .map(|view| {
                    Framebuffer::new(
                        render_pass.clone(),
                        FramebufferCreateInfo {
                            attachments: vec![msaa_color.clone(), view],
                            ..Default::default()
                        },
                    )
                    .map_err(|e| e.into())
                })
                .collect()
        }

        pub fn new(window: Arc<Window>) -> Result<Self, Box<dyn std::error::Error>> {
            // The helper context enables surface extensions and sets up queues and allocators.
            let context = VulkanoContext::new(VulkanoConfig::default());
            let device = context.device().clone();

            let surface = Surface::from_window(device.instance().clone(), window.clone())?;

            let surface_capabilities = device
                .physical_device()
                .surface_capabilities(&surface, Default::default())?;
            let image_format = device
                .physical_device()
                .surface_formats(&surface, Default::default())?
                .first()
                .ok_or("no supported surface formats")?
                .0;

            let mut min_image_count = 2u32.max(surface_capabilities.min_image_count);
            if let Some(max_image_count) = surface_capabilities.max_image_count {
                min_image_count = min_image_count.min(max_image_count);
            }

            let (swapchain, images) = Swapchain::new(
                device.clone(),
                surface.clone(),
                SwapchainCreateInfo {
                    min_image_count,
                    image_format,
                    image_extent: window.inner_size().into(),
                    image_usage: ImageUsage::COLOR_ATTACHMENT,
                    composite_alpha: surface_capabilities
                        .supported_composite_alpha
                        .into_iter()
                        .next()
                        .ok_or("no supported composite alpha")?,
                    ..Default::default()
                },
            )?;

            let swapchain_views = images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

            let render_pass = vulkano::single_pass_renderpass!(
                device.clone(),
                attachments: {
                    msaa_color: {
                        format: swapchain.image_format(),
                        samples: 4,
                        load_op: Clear,
                        store_op: DontCare,
                    },
                    color: {
                        format: swapchain.image_format(),
                        samples: 1,
                        load_op: DontCare,
                        store_op: Store,
                    },
                },
                pass: {
                    color: [msaa_color],
                    color_resolve: [color],
                    depth_stencil: {},
                }
            )?;

            let framebuffers = Self::create_framebuffers(
                &render_pass,
                context.memory_allocator().clone(),
                swapchain_views,
            )?;

            let set_layouts = PipelineDescriptorSetLayouts::new(device.clone())?;

            let vs = terrain_wire_vs::load(device.clone())?;
            let fs = terrain_wire_fs::load(device.clone())?;

            let stages = vec![
                PipelineShaderStageCreateInfo::new(
                    vs.entry_point("main")
                        .ok_or("missing terrain-wire.vert entry point")?,
                ),
                PipelineShaderStageCreateInfo::new(
                    fs.entry_point("main")
                        .ok_or("missing terrain-wire.frag entry point")?,
                ),
            ];

            let layout = PipelineLayout::new(
                device.clone(),
                PipelineLayoutCreateInfo {
                    set_layouts: vec![set_layouts.frame.clone()],
                    ..Default::default()
                },
            )?;

            let vertex_input_state = VertexInputState::new()
                .binding(
                    0,
                    VertexInputBindingDescription {
                        stride: size_of::<TerrainVertex>() as u32,
                        input_rate: VertexInputRate::Vertex,
                        ..Default::default()
                    },
                )
                .attribute(
                    0,
                    VertexInputAttributeDescription {
                        binding: 0,
                        format: Format::R32G32B32_SFLOAT,
                        offset: 0,
                        ..Default::default()
                    },
                );

            let subpass = Subpass::from(render_pass.clone(), 0).ok_or("missing subpass 0")?;
            let mut pipeline_ci =
                vulkano::pipeline::graphics::GraphicsPipelineCreateInfo::layout(layout);
            pipeline_ci.stages = stages.into();
            pipeline_ci.vertex_input_state = Some(vertex_input_state);
            pipeline_ci.input_assembly_state = Some(InputAssemblyState {
                topology: PrimitiveTopology::LineList,
                ..Default::default()
            });
            pipeline_ci.viewport_state = Some(ViewportState::default());
            pipeline_ci.rasterization_state = Some(RasterizationState::default());
            pipeline_ci.multisample_state = Some(MultisampleState {
                rasterization_samples: MSAA_SAMPLES,
                ..Default::default()
            });
            pipeline_ci.depth_stencil_state = None;
            // Translucent lines: straight alpha over the cleared background.
            pipeline_ci.color_blend_state = Some(ColorBlendState::with_attachment_states(
                1,
                ColorBlendAttachmentState {
                    blend: Some(AttachmentBlend {
                        src_color_blend_factor: BlendFactor::SrcAlpha,
                        dst_color_blend_factor: BlendFactor::OneMinusSrcAlpha,
                        color_blend_op: BlendOp::Add,
                        src_alpha_blend_factor: BlendFactor::One,
                        dst_alpha_blend_factor: BlendFactor::OneMinusSrcAlpha,
                        alpha_blend_op: BlendOp::Add,
                    }),
                    color_write_enable: true,
                    color_write_mask: ColorComponents::all(),
                },
            ));
            pipeline_ci.dynamic_state = [DynamicState::Viewport, DynamicState::Scissor]
                .into_iter()
                .collect();
            pipeline_ci.subpass = Some(PipelineSubpassType::BeginRenderPass(subpass));

            let pipeline_terrain_wire = GraphicsPipeline::new(device.clone(), None, pipeline_ci)?;

            let command_buffer_allocator = Arc::new(StandardCommandBufferAllocator::new(
                device.clone(),
                Default::default(),
            ));

            let descriptor_set_allocator = Arc::new(StandardDescriptorSetAllocator::new(
                device.clone(),
                Default::default(),
            ));

            Ok(Self {
                context,
                window,
                surface,
                swapchain,
                render_pass,
                framebuffers,

                command_buffer_allocator,
                descriptor_set_allocator,
                set_layouts,

                pipeline_terrain_wire,
                terrain: None,

                frame_index: 0,
                window_resized: false,
                recreate_swapchain: false,
                previous_frame_end: Some(sync::now(device).boxed()),
            })
        }

        fn recreate_swapchain_if_needed(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            if !(self.window_resized || self.recreate_swapchain) {
                return Ok(());
            }

            self.recreate_swapchain = false;
            let new_dimensions = self.window.inner_size();
            if new_dimensions.width == 0 || new_dimensions.height == 0 {
                // Avoid recreating with a zero-sized swapchain while minimized.
                return Ok(());
            }

            let (new_swapchain, new_images) = match self.swapchain.recreate(SwapchainCreateInfo {
                image_extent: new_dimensions.into(),
                ..self.swapchain.create_info()
            }) {
                Ok(r) => r,
                Err(e) => {
                    self.recreate_swapchain = true;
                    log::warn!(
                        "[VulkanoRenderer] failed to recreate swapchain: {}",
                        Validated::unwrap(e)
                    );
                    return Ok(());
                }
            };

            self.swapchain = new_swapchain;
            let swapchain_views = new_images
                .into_iter()
                .map(|image| ImageView::new_default(image).map_err(|e| e.into()))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;
            self.framebuffers = Self::create_framebuffers(
                &self.render_pass,
                self.context.memory_allocator().clone(),
                swapchain_views,
            )?;

            log::debug!(
                "[VulkanoRenderer] swapchain recreated at {}x{}",
                new_dimensions.width,
                new_dimensions.height
            );
            self.window_resized = false;
            Ok(())
        }

        /// One-time upload: device-local index buffer plus the first vertex buffer.
        pub fn upload_terrain(&mut self, mesh: &CpuMesh) -> Result<(), Box<dyn std::error::Error>> {
            if mesh.indices_u32.is_empty() {
                return Err("terrain mesh has no line indices".into());
            }

            let memory_allocator = self.context.memory_allocator().clone();
            let queue = self.context.graphics_queue().clone();

            let indices_src = Buffer::from_iter(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::TRANSFER_SRC,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                mesh.indices_u32.iter().copied(),
            )?;

            let indices_dst = Buffer::new_slice::<u32>(
                memory_allocator.clone(),
                BufferCreateInfo {
                    usage: BufferUsage::INDEX_BUFFER | BufferUsage::TRANSFER_DST,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
                    ..Default::default()
                },
                mesh.indices_u32.len() as DeviceSize,
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;
            cbb.copy_buffer(CopyBufferInfo::buffers(indices_src, indices_dst.clone()))?;
            let cb = cbb.build()?;
            cb.execute(queue.clone())?
                .then_signal_fence_and_flush()?
                .wait(None)?;

            let vertices = self.host_vertex_buffer(mesh.vertices.iter().copied())?;

            self.terrain = Some(VulkanoGpuTerrain {
                vertices,
                indices: indices_dst,
                index_count: mesh.index_count(),
                vertex_count: mesh.vertices.len(),
            });
            Ok(())
        }

        /// Swap in fresh heights. A new host-visible buffer per upload keeps frames
        /// still in flight reading their own copy.
        pub fn update_vertices<I>(&mut self, vertices: I) -> Result<(), Box<dyn std::error::Error>>
        where
            I: ExactSizeIterator<Item = TerrainVertex>,
        {
            let Some(vertex_count) = self.terrain.as_ref().map(|t| t.vertex_count) else {
                return Err("terrain not uploaded".into());
            };
            if vertices.len() != vertex_count {
                return Err(format!(
                    "terrain vertex count changed: got={}, expected={}",
                    vertices.len(),
                    vertex_count
                )
                .into());
            }

            let buffer = self.host_vertex_buffer(vertices)?;
            if let Some(terrain) = self.terrain.as_mut() {
                terrain.vertices = buffer;
            }
            Ok(())
        }

        fn host_vertex_buffer<I>(
            &self,
            vertices: I,
        ) -> Result<Subbuffer<[TerrainVertex]>, Box<dyn std::error::Error>>
        where
            I: ExactSizeIterator<Item = TerrainVertex>,
        {
            Ok(Buffer::from_iter(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::VERTEX_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                vertices,
            )?)
        }

        pub fn render_scene(&mut self, scene: &SceneContext) -> Result<(), Box<dyn std::error::Error>> {
            self.recreate_swapchain_if_needed()?;

            let device = self.context.device().clone();
            let queue = self.context.graphics_queue().clone();

            if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
                previous_frame_end.cleanup_finished();
            }

            let (image_i, suboptimal, acquire_future) =
                match swapchain::acquire_next_image(self.swapchain.clone(), None)
                    .map_err(Validated::unwrap)
                {
                    Ok(r) => r,
                    Err(VulkanError::OutOfDate) => {
                        self.recreate_swapchain = true;
                        return Ok(());
                    }
                    Err(e) => return Err(Box::new(e)),
                };

            if suboptimal {
                self.recreate_swapchain = true;
            }

            let framebuffer = self.framebuffers[image_i as usize].clone();
            let mut render_pass_begin = RenderPassBeginInfo::framebuffer(framebuffer);
            render_pass_begin.clear_values = clear_values(scene.clear_color());

            let extent = self.swapchain.image_extent();
            let viewport = Viewport {
                offset: [0.0, 0.0],
                extent: [extent[0] as f32, extent[1] as f32],
                depth_range: 0.0..=1.0,
                ..Default::default()
            };

            let camera = scene.camera();
            let view = camera.view();
            let proj = camera.projection();
            let model = scene.model_matrix();

            let camera_ubo = CameraUBO {
                view: view.to_cols_array_2d(),
                proj: proj.to_cols_array_2d(),
                model: model.to_cols_array_2d(),
            };

            let camera_buffer: Subbuffer<CameraUBO> = Buffer::from_data(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::UNIFORM_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                camera_ubo,
            )?;

            let material_buffer: Subbuffer<MaterialUBO> = Buffer::from_data(
                self.context.memory_allocator().clone(),
                BufferCreateInfo {
                    usage: BufferUsage::UNIFORM_BUFFER,
                    ..Default::default()
                },
                AllocationCreateInfo {
                    memory_type_filter: MemoryTypeFilter::PREFER_HOST
                        | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                    ..Default::default()
                },
                Self::material_ubo(scene),
            )?;

            let frame_set = DescriptorSet::new(
                self.descriptor_set_allocator.clone(),
                self.set_layouts.frame.clone(),
                [
                    WriteDescriptorSet::buffer(0, camera_buffer),
                    WriteDescriptorSet::buffer(1, material_buffer),
                ],
                [],
            )?;

            let mut cbb = AutoCommandBufferBuilder::primary(
                self.command_buffer_allocator.clone(),
                queue.queue_family_index(),
                CommandBufferUsage::OneTimeSubmit,
            )?;

            cbb.begin_render_pass(render_pass_begin, SubpassBeginInfo::default())?;

            cbb.set_viewport(0, vec![viewport].into())?;
            cbb.set_scissor(
                0,
                vec![Scissor {
                    offset: [0, 0],
                    extent: [extent[0], extent[1]],
                    ..Default::default()
                }]
                .into(),
            )?;

            // Nothing uploaded yet: the frame is just the cleared background.
            if let Some(terrain) = self.terrain.as_ref() {
                RenderInfo::maybe_print_frame_info(
                    self.frame_index,
                    extent,
                    terrain.vertex_count,
                    terrain.index_count,
                    &view,
                    &proj,
                    &model,
                );

                cbb.bind_pipeline_graphics(self.pipeline_terrain_wire.clone())?;
                cbb.bind_descriptor_sets(
                    PipelineBindPoint::Graphics,
                    self.pipeline_terrain_wire.layout().clone(),
                    0,
                    frame_set,
                )?;
                cbb.bind_vertex_buffers(0, terrain.vertices.clone())?;
                cbb.bind_index_buffer(terrain.indices.clone())?;
                unsafe {
                    cbb.draw_indexed(terrain.index_count, 1, 0, 0, 0)?;
                }
            }

            cbb.end_render_pass(SubpassEndInfo::default())?;

            let cb = cbb.build()?;

            let start_future: Box<dyn GpuFuture> = self
                .previous_frame_end
                .take()
                .unwrap_or_else(|| sync::now(device.clone()).boxed());

            self.window.pre_present_notify();

            let execution = start_future
                .join(acquire_future)
                .then_execute(queue.clone(), cb)?
                .then_swapchain_present(
                    queue.clone(),
                    SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_i),
                )
                .then_signal_fence_and_flush();

            match execution.map_err(Validated::unwrap) {
                Ok(future) => {
                    // Keep the future so resources can be cleaned up incrementally.
                    self.previous_frame_end = Some(future.boxed());
                }
                Err(VulkanError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
                Err(e) => {
                    log::warn!("[VulkanoRenderer] failed to flush future: {e}");
                    self.previous_frame_end = Some(sync::now(device).boxed());
                }
            }

            self.frame_index = self.frame_index.wrapping_add(1);
            Ok(())
        }
    }
}

/// Vulkano-backed wireframe renderer.
pub struct VulkanoRenderer {
    vulkano: Option<vulkano_backend::VulkanoState>,
    did_enable_present_loop_log: bool,
}

impl VulkanoRenderer {
    pub fn new() -> Self {
        Self {
            vulkano: None,
            did_enable_present_loop_log: false,
        }
    }

    pub fn init_for_window(&mut self, window: &Arc<Window>) -> EngineResult<()> {
        if self.vulkano.is_none() {
            let state = vulkano_backend::VulkanoState::new(window.clone()).map_err(EngineError::Renderer)?;
            self.vulkano = Some(state);
            log::info!("[VulkanoRenderer] Vulkano swapchain/render-pass initialized");
        }

        Ok(())
    }

    /// Mark the swapchain stale; it is rebuilt from the window's size on the next frame.
    pub fn resize(&mut self) {
        if let Some(vulkano) = self.vulkano.as_mut() {
            vulkano.window_resized = true;
        }
    }

    /// Upload the wireframe topology and first vertex set.
    pub fn upload_terrain(&mut self, mesh: &CpuMesh) -> EngineResult<()> {
        let Some(vulkano) = self.vulkano.as_mut() else {
            return Err(EngineError::RendererNotInitialized);
        };
        vulkano.upload_terrain(mesh).map_err(EngineError::Renderer)?;
        log::info!(
            "[VulkanoRenderer] terrain uploaded: {} vertices, {} line indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(())
    }

    pub fn render_scene(&mut self, scene: &SceneContext) -> EngineResult<()> {
        let Some(vulkano) = self.vulkano.as_mut() else {
            return Err(EngineError::RendererNotInitialized);
        };

        if !self.did_enable_present_loop_log {
            self.did_enable_present_loop_log = true;
            log::info!("[VulkanoRenderer] Present loop enabled");
        }

        vulkano.render_scene(scene).map_err(EngineError::Renderer)
    }
}

impl Default for VulkanoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHost for VulkanoRenderer {
    fn upload_grid(&mut self, grid: &VertexGrid) -> EngineResult<()> {
        if grid.is_empty() {
            return Err(EngineError::Renderer("terrain grid has no vertices".into()));
        }
        let uploaded = match self.vulkano.as_ref() {
            None => return Err(EngineError::RendererNotInitialized),
            Some(vulkano) => vulkano.terrain.is_some(),
        };
        if !uploaded {
            return self.upload_terrain(&MeshFactory::terrain_wireframe(grid));
        }
        if let Some(vulkano) = self.vulkano.as_mut() {
            vulkano
                .update_vertices(MeshFactory::terrain_vertices(grid))
                .map_err(EngineError::Renderer)?;
        }
        Ok(())
    }

    fn render(&mut self, scene: &SceneContext) -> EngineResult<()> {
        self.render_scene(scene)
    }

    fn request_next_frame(&mut self) {
        if let Some(vulkano) = self.vulkano.as_ref() {
            vulkano.window.request_redraw();
        }
    }

    fn resize_surface(&mut self, size: [u32; 2]) {
        log::trace!("[VulkanoRenderer] surface resize to {}x{}", size[0], size[1]);
        self.resize();
    }
}

#[cfg(test)]
mod tests {
    use super::vulkano_backend::clear_values;
    use vulkano::format::ClearValue;

    #[test]
    fn only_the_multisampled_attachment_is_cleared() {
        let values = clear_values([0.02, 0.02, 0.02, 1.0]);
        assert_eq!(values.len(), 2);
        assert!(matches!(values[0], Some(ClearValue::Float(c)) if c == [0.02, 0.02, 0.02, 1.0]));
        assert!(values[1].is_none());
    }
}
