//! Flat-shaded triangle meshes built from [`TerrainTile`]s.
//!
//! Every grid cell (the square between four neighboring samples)
//! becomes an independent quad of four vertices. Vertices are not
//! shared between cells, so each quad carries its own face normal
//! and lighting is flat per cell.
//!
//! Render space is right-handed with `y` up:
//!
//! - `x` grows east, one longitude step per sample.
//! - `y` is the raw elevation sample.
//! - `z` grows north, one latitude step per sample.

use crate::{TerrainTile, C};
use glam::DVec3;
use log::debug;

const VERTICES_PER_CELL: usize = 4;
const INDICES_PER_CELL: usize = 6;

/// Index offsets, relative to a cell's first vertex, of its two
/// triangles.
///
/// With vertices ordered bottom-left, top-left, top-right,
/// bottom-right, both triangles wind counter-clockwise seen from
/// above and share the bottom-left to top-right diagonal.
const CELL_INDICES: [u32; INDICES_PER_CELL] = [0, 2, 3, 0, 1, 2];

/// Vertex, normal, and index buffers of a terrain mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGeometry {
    vertices: Vec<DVec3>,
    normals: Vec<DVec3>,
    indices: Vec<u32>,
}

/// Returns the flat-shaded mesh of `tile`.
pub fn build_mesh(tile: &TerrainTile) -> MeshGeometry {
    MeshGeometry::from_tile(tile)
}

impl MeshGeometry {
    /// Returns the flat-shaded mesh of `tile`.
    ///
    /// # Panics
    ///
    /// Panics if the mesh has more than `u32::MAX` vertices, which
    /// takes a grid over 32768 samples wide.
    pub fn from_tile(tile: &TerrainTile) -> Self {
        let cells = cell_count(tile.size());
        let vertex_count = cells * VERTICES_PER_CELL;
        assert!(
            u32::try_from(vertex_count).is_ok(),
            "{vertex_count} vertices overflow u32 indices"
        );

        let vertices = vertices(tile);
        let normals = normals(
            &vertices,
            tile.longitude_step_distance(),
            tile.latitude_step_distance(),
        );
        let indices = indices(cells);
        debug_assert_eq!(vertices.len(), vertex_count);
        debug_assert_eq!(normals.len(), vertex_count);
        debug_assert_eq!(indices.len(), cells * INDICES_PER_CELL);

        debug!(
            "built mesh: {cells} cells, {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );
        Self {
            vertices,
            normals,
            indices,
        }
    }

    /// Number of quads in this mesh.
    pub fn cell_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_CELL
    }

    /// Vertex positions, four per cell.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Unnormalized face normals, one per vertex.
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Triangle list indices into [`vertices`](Self::vertices), six
    /// per cell.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns an iterator over each triangle's vertex indices.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Returns (vertices, normals, indices).
    pub fn into_buffers(self) -> (Vec<DVec3>, Vec<DVec3>, Vec<u32>) {
        (self.vertices, self.normals, self.indices)
    }
}

fn cell_count(size: usize) -> usize {
    let cells_per_side = size.saturating_sub(1);
    cells_per_side * cells_per_side
}

fn vertices(tile: &TerrainTile) -> Vec<DVec3> {
    let size = tile.size();
    let grid = tile.grid();
    let cells_per_side = size.saturating_sub(1);
    let lon_step = tile.longitude_step_distance();
    let lat_step = tile.latitude_step_distance();
    let (half_lon, half_lat) = (lon_step / 2.0, lat_step / 2.0);

    // Cells in render order: x fastest, southernmost row first.
    let cells = (0..cells_per_side).flat_map(|z| (0..cells_per_side).map(move |x| (x, z)));
    let mut vertices = vec![DVec3::ZERO; cell_count(size) * VERTICES_PER_CELL];
    for ((x, z), quad) in cells.zip(vertices.chunks_exact_mut(VERTICES_PER_CELL)) {
        // Grid rows run north to south, render rows south to north.
        let row = cells_per_side - 1 - z;
        let top_left = C::from(grid[(row, x)]);
        let top_right = C::from(grid[(row, x + 1)]);
        let bottom_left = C::from(grid[(row + 1, x)]);
        let bottom_right = C::from(grid[(row + 1, x + 1)]);

        #[allow(clippy::cast_precision_loss)]
        let (world_x, world_z) = (x as C * lon_step, z as C * lat_step);
        let (west, east) = (world_x - half_lon, world_x + half_lon);
        let (south, north) = (world_z - half_lat, world_z + half_lat);

        quad.copy_from_slice(&[
            DVec3::new(west, bottom_left, south),
            DVec3::new(west, top_left, north),
            DVec3::new(east, top_right, north),
            DVec3::new(east, bottom_right, south),
        ]);
    }
    vertices
}

// Face normal `(B - A) x (C - A)` of each quad's first three vertices.
// Horizontal edges are exactly one step long, so they come from the
// steps and equal slopes give bit-identical normals in every cell.
fn normals(vertices: &[DVec3], lon_step: C, lat_step: C) -> Vec<DVec3> {
    let mut normals = vec![DVec3::ZERO; vertices.len()];
    for (quad, dst) in vertices
        .chunks_exact(VERTICES_PER_CELL)
        .zip(normals.chunks_exact_mut(VERTICES_PER_CELL))
    {
        let (a, b, c) = (quad[0], quad[1], quad[2]);
        let ab = DVec3::new(0.0, b.y - a.y, lat_step);
        let ac = DVec3::new(lon_step, c.y - a.y, lat_step);
        dst.fill(ab.cross(ac));
    }
    normals
}

fn indices(cells: usize) -> Vec<u32> {
    let mut indices = vec![0; cells * INDICES_PER_CELL];
    for (cell, dst) in indices.chunks_exact_mut(INDICES_PER_CELL).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let base = (cell * VERTICES_PER_CELL) as u32;
        for (idx, offset) in dst.iter_mut().zip(CELL_INDICES) {
            *idx = base + offset;
        }
    }
    indices
}
