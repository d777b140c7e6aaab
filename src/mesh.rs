//! Procedural generation of the subdivided page mesh.
//!
//! The page is a flat `rows x columns` grid of vertices centered on the
//! origin, split into two triangles per cell. The grid is built once when a
//! page is constructed and is immutable afterwards; all of the curl
//! deformation happens in the vertex shader, so `z` stays `0.0` here.

use crate::error::{Error, Result};
use crate::Color;

/// Vertex streams and triangle indices for a subdivided rectangular page.
///
/// The streams are kept as separate arrays (positions, colors, texture
/// coordinates) rather than interleaved, and are uploaded to the GPU as
/// separate vertex buffers.
///
/// # Examples
///
/// ```
/// use kami::GridMesh;
///
/// let mesh = GridMesh::build(16, 16, 1.0, 1.5).unwrap();
/// assert_eq!(mesh.vertex_count(), 16 * 16);
/// assert_eq!(mesh.index_count(), 6 * 15 * 15);
/// ```
#[derive(Debug, Clone)]
pub struct GridMesh {
    rows: u32,
    columns: u32,
    /// Vertex positions in model units, `z` always `0.0`.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex tint, uniform white.
    pub colors: Vec<[f32; 4]>,
    /// Texture coordinates in `[0, 1]`. The t axis is flipped at build time
    /// (`t = 1 - i / (rows - 1)`) so that texture row 0 lands on the top
    /// edge of the page.
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle-list indices, two triangles per grid cell. 16-bit, matching
    /// the `wgpu::IndexFormat::Uint16` the draw call declares.
    pub indices: Vec<u16>,
}

impl GridMesh {
    /// Builds the grid for a page of `width` x `height` model units.
    ///
    /// Vertex `(i, j)` sits at
    /// `(-width/2 + j * width/(columns-1), -height/2 + i * height/(rows-1), 0)`,
    /// so row 0 is the bottom edge and column 0 the left edge. Each cell
    /// emits two counter-clockwise triangles, `(v0, v2, v3)` and
    /// `(v0, v3, v1)`, where `v0` is the cell's bottom-left vertex.
    ///
    /// Fails with [`Error::InvalidGrid`] when either dimension is below 2
    /// and with [`Error::GridTooLarge`] when the vertex count would not fit
    /// a 16-bit index.
    pub fn build(rows: u32, columns: u32, width: f32, height: f32) -> Result<Self> {
        if rows < 2 || columns < 2 {
            return Err(Error::InvalidGrid { rows, columns });
        }
        let vertices = rows as usize * columns as usize;
        if vertices > u16::MAX as usize + 1 {
            return Err(Error::GridTooLarge { vertices });
        }

        let cell_w = width / (columns - 1) as f32;
        let cell_h = height / (rows - 1) as f32;
        let left = -width / 2.0;
        let bottom = -height / 2.0;
        let white = Color::WHITE.normalize();

        let mut positions = Vec::with_capacity(vertices);
        let mut colors = Vec::with_capacity(vertices);
        let mut tex_coords = Vec::with_capacity(vertices);
        for i in 0..rows {
            for j in 0..columns {
                positions.push([left + j as f32 * cell_w, bottom + i as f32 * cell_h, 0.0]);
                colors.push(white);
                tex_coords.push([
                    j as f32 / (columns - 1) as f32,
                    1.0 - i as f32 / (rows - 1) as f32,
                ]);
            }
        }

        let cells = (rows as usize - 1) * (columns as usize - 1);
        let mut indices = Vec::with_capacity(cells * 6);
        for i in 0..rows - 1 {
            for j in 0..columns - 1 {
                let v0 = (i * columns + j) as u16;
                let v1 = v0 + 1;
                let v2 = ((i + 1) * columns + j) as u16;
                let v3 = v2 + 1;

                // Bottom triangle, then top triangle.
                indices.extend_from_slice(&[v0, v2, v3, v0, v3, v1]);
            }
        }

        Ok(Self {
            rows,
            columns,
            positions,
            colors,
            tex_coords,
            indices,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_grid_is_a_single_quad() {
        let mesh = GridMesh::build(2, 2, 1.0, 1.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 2, 3, 0, 3, 1]);
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        assert!(matches!(
            GridMesh::build(1, 5, 1.0, 1.0),
            Err(Error::InvalidGrid { rows: 1, columns: 5 })
        ));
        assert!(matches!(
            GridMesh::build(4, 0, 1.0, 1.0),
            Err(Error::InvalidGrid { .. })
        ));
    }

    #[test]
    fn grids_past_the_16_bit_index_range_are_rejected() {
        assert!(matches!(
            GridMesh::build(300, 300, 1.0, 1.0),
            Err(Error::GridTooLarge { vertices: 90000 })
        ));
        // 256 * 256 = 65536 vertices, max index 65535, still addressable.
        assert!(GridMesh::build(256, 256, 1.0, 1.0).is_ok());
    }

    #[test]
    fn positions_span_the_page_centered_on_the_origin() {
        let mesh = GridMesh::build(3, 5, 2.0, 1.0).unwrap();
        assert_eq!(mesh.positions[0], [-1.0, -0.5, 0.0]);
        assert_eq!(mesh.positions[4], [1.0, -0.5, 0.0]);
        assert_eq!(*mesh.positions.last().unwrap(), [1.0, 0.5, 0.0]);
        for p in &mesh.positions {
            assert_eq!(p[2], 0.0);
        }
    }
}
