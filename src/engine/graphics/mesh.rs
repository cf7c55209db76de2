//! CPU-side mesh data in the layout the renderer uploads.
//!
//! The terrain grid owns its positions; this module packs them into the vertex
//! format bound by the wireframe pipeline.

use vulkano::buffer::BufferContents;
use vulkano::pipeline::graphics::vertex_input::Vertex;

use crate::engine::terrain::VertexGrid;

/// Wireframe vertex: plane-local position, height in `pos[2]`.
#[derive(BufferContents, Vertex, Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct TerrainVertex {
    #[format(R32G32B32_SFLOAT)]
    pub pos: [f32; 3],
}

/// CPU-side mesh data: `vertices` plus a line list (`indices_u32`, two per edge).
#[derive(Debug, Clone)]
pub struct CpuMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices_u32: Vec<u32>,
}

impl CpuMesh {
    pub fn index_count(&self) -> u32 {
        self.indices_u32.len() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

pub struct MeshFactory;

impl MeshFactory {
    /// Line-list mesh of the grid's current positions and wireframe edges.
    pub fn terrain_wireframe(grid: &VertexGrid) -> CpuMesh {
        CpuMesh {
            vertices: Self::terrain_vertices(grid).collect(),
            indices_u32: grid.line_indices().to_vec(),
        }
    }

    /// Vertices only; used for per-frame re-uploads where indices stay put.
    pub fn terrain_vertices(grid: &VertexGrid) -> impl ExactSizeIterator<Item = TerrainVertex> + '_ {
        grid.positions().iter().map(|&pos| TerrainVertex { pos })
    }
}
