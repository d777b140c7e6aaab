use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::fold::{FoldParams, FoldSolver, FoldUniforms};
use crate::mesh::GridMesh;
use crate::pipeline::{create_uniform_binding, Uniforms};

/// Base subdivision of the shorter page axis. The longer axis gets
/// proportionally more rows so cells stay roughly square.
const GRID_COLUMNS: u32 = 16;

/// A single curlable page: the static mesh uploaded to the GPU, the fold
/// solver, and the uniform/texture bindings the draw call needs.
///
/// All GPU handles are owned by the page and released together when it is
/// dropped. Pages are rebuilt on surface resize because the mesh depends on
/// the page dimensions.
pub struct Page {
    width: f32,
    height: f32,
    fold_solver: FoldSolver,

    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    tex_coord_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
}

impl Page {
    pub(crate) fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        texture_bind_group: wgpu::BindGroup,
        width: f32,
        height: f32,
        fold_params: FoldParams,
    ) -> Result<Self> {
        let rows = ((GRID_COLUMNS as f32 * (height / width)).round() as u32).max(2);
        let mesh = GridMesh::build(rows, GRID_COLUMNS, width, height)?;

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Page Position Buffer"),
            contents: bytemuck::cast_slice(&mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Page Color Buffer"),
            contents: bytemuck::cast_slice(&mesh.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let tex_coord_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Page Tex Coord Buffer"),
            contents: bytemuck::cast_slice(&mesh.tex_coords),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Page Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let num_indices = mesh.index_count() as u32;

        let mut fold_solver = FoldSolver::new(fold_params);
        // Seed the uniforms with the resting pose (pointer at the right
        // edge, page flat).
        let fold = fold_solver.solve(1.0, 0.0, width, height);
        let (uniform_buffer, uniform_bind_group) = create_uniform_binding(
            device,
            uniform_layout,
            Uniforms::new(Mat4::IDENTITY, &fold, fold_params.curl_radius),
        );

        Ok(Self {
            width,
            height,
            fold_solver,
            position_buffer,
            color_buffer,
            tex_coord_buffer,
            index_buffer,
            num_indices,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Solves the fold for the current pointer, writes the frame's uniforms
    /// and issues the indexed draw.
    pub(crate) fn draw(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        mvp: Mat4,
        pointer: (f32, f32),
    ) -> FoldUniforms {
        let fold = self
            .fold_solver
            .solve(pointer.0, pointer.1, self.width, self.height);
        let uniforms = Uniforms::new(mvp, &fold, self.fold_solver.params().curl_radius);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        render_pass.set_vertex_buffer(2, self.tex_coord_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);

        fold
    }
}
