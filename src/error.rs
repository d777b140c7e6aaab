use thiserror::Error;

/// Errors produced while setting up or driving the renderer.
///
/// Fold computation never fails; everything here is a construction-time
/// problem (bad grid dimensions, missing texture) or a GPU setup problem
/// surfaced from wgpu.
#[derive(Debug, Error)]
pub enum Error {
    /// The page grid needs at least two vertices per axis, otherwise the
    /// mesh has zero triangles and silently renders nothing.
    #[error("page grid must be at least 2x2, got {rows}x{columns}")]
    InvalidGrid { rows: u32, columns: u32 },

    /// The mesh is indexed with 16-bit indices, matching the index format
    /// the draw call declares.
    #[error("page grid has {vertices} vertices, which does not fit 16-bit indices")]
    GridTooLarge { vertices: usize },

    /// No texture with the given id has been loaded into the texture manager.
    #[error("texture {0} not found")]
    TextureNotFound(u64),

    /// A page must be attached with [`crate::Renderer::set_page_texture`]
    /// before rendering.
    #[error("no page texture has been set")]
    NoPage,

    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
