use std::collections::BTreeMap;
use std::sync::Arc;

use vulkano::descriptor_set::layout::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutCreateInfo, DescriptorType,
};
use vulkano::device::Device;
use vulkano::shader::ShaderStages;

pub struct PipelineDescriptorSetLayouts {
    /// Set 0: per-frame data (camera matrices, terrain model matrix) plus the
    /// wireframe material/fog parameters.
    pub frame: Arc<DescriptorSetLayout>,
}

impl PipelineDescriptorSetLayouts {
    /// - `set=0,binding=0`: uniform buffer, camera UBO (vertex stage).
    /// - `set=0,binding=1`: uniform buffer, material UBO (fragment stage).
    pub fn new(device: Arc<Device>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut bindings = BTreeMap::new();

        let mut camera_binding =
            DescriptorSetLayoutBinding::descriptor_type(DescriptorType::UniformBuffer);
        camera_binding.descriptor_count = 1;
        camera_binding.stages = ShaderStages::VERTEX;
        bindings.insert(0, camera_binding);

        let mut material_binding =
            DescriptorSetLayoutBinding::descriptor_type(DescriptorType::UniformBuffer);
        material_binding.descriptor_count = 1;
        material_binding.stages = ShaderStages::FRAGMENT;
        bindings.insert(1, material_binding);

        let frame = DescriptorSetLayout::new(
            device,
            DescriptorSetLayoutCreateInfo {
                bindings,
                ..Default::default()
            },
        )?;

        Ok(Self { frame })
    }
}
