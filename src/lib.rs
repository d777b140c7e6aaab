//! GPU-accelerated page curl rendering.
//!
//! `kami` draws a rectangular page that peels from flat to rolled as a
//! pointer drags across it. The page is a subdivided mesh built once per
//! page ([`GridMesh`]); every frame a pure fold computation ([`FoldSolver`])
//! turns the pointer position into the fold line, apex and finger tip the
//! curl shader consumes.

pub use wgpu;

mod color;
mod error;
mod fold;
mod mesh;
mod page;
mod pipeline;
mod renderer;
mod texture;
mod util;

pub use color::Color;
pub use error::{Error, Result};
pub use fold::{FoldParams, FoldSolver, FoldUniforms};
pub use mesh::GridMesh;
pub use page::Page;
pub use renderer::Renderer;
pub use texture::TextureManager;
pub use util::pointer_to_ndc;
