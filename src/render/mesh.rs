//! Per-face culled chunk meshing.
//!
//! Every solid cell emits a quad for each of its six faces whose neighbour is
//! air or lies outside the chunk. Neighbouring chunks are never consulted, so
//! faces on chunk borders are always emitted.

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{BlockGrid, MeshData};
use crate::core::vertex::Vertex;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

/// Unit-cube corners per face, counter-clockwise seen from outside.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // Top (+Y)
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    // Bottom (-Y)
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // Left (-X)
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    // Right (+X)
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    // Front (+Z)
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // Back (-Z)
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
];

const FACE_UVS: [[[f32; 2]; 4]; 6] = [
    [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    fn index(self) -> usize {
        match self {
            Face::Top => 0,
            Face::Bottom => 1,
            Face::Left => 2,
            Face::Right => 3,
            Face::Front => 4,
            Face::Back => 5,
        }
    }

    /// Grid step towards the neighbour this face looks at.
    pub fn offset(self) -> [i32; 3] {
        match self {
            Face::Top => [0, 1, 0],
            Face::Bottom => [0, -1, 0],
            Face::Left => [-1, 0, 0],
            Face::Right => [1, 0, 0],
            Face::Front => [0, 0, 1],
            Face::Back => [0, 0, -1],
        }
    }

    pub fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x as f32, y as f32, z as f32]
    }

    pub fn corners(self) -> &'static [[f32; 3]; 4] {
        &FACE_CORNERS[self.index()]
    }

    pub fn layer_for(self, block: BlockType) -> u32 {
        match self {
            Face::Top => block.tex_top(),
            Face::Bottom => block.tex_bottom(),
            _ => block.tex_side(),
        }
    }
}

pub fn add_face(mesh: &mut MeshData, origin: [f32; 3], face: Face, layer: u32) {
    let base_idx = mesh.vertices.len() as u32;
    let uvs = &FACE_UVS[face.index()];
    for (corner, uv) in face.corners().iter().zip(uvs) {
        mesh.vertices.push(Vertex {
            position: [
                origin[0] + corner[0],
                origin[1] + corner[1],
                origin[2] + corner[2],
            ],
            uv: *uv,
            layer,
        });
    }
    mesh.indices
        .extend(QUAD_INDICES.iter().map(|i| base_idx + i));
}

/// Rebuild `mesh` from scratch for the chunk at (`chunk_x`, `chunk_z`).
/// Positions are emitted in world space.
pub fn build_chunk_mesh(blocks: &BlockGrid, chunk_x: i32, chunk_z: i32, mesh: &mut MeshData) {
    mesh.clear();

    let base_x = chunk_x * CHUNK_SIZE;
    let base_z = chunk_z * CHUNK_SIZE;

    for x in 0..CHUNK_SIZE {
        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_SIZE {
                let block = blocks.get(x, y, z);
                if !block.is_solid() {
                    continue;
                }

                let origin = [(base_x + x) as f32, y as f32, (base_z + z) as f32];
                for face in Face::ALL {
                    let [dx, dy, dz] = face.offset();
                    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                    // out-of-grid reads as air, so borders always emit
                    if !blocks.get(nx, ny, nz).is_solid() {
                        add_face(mesh, origin, face, face.layer_for(block));
                    }
                }
            }
        }
    }
}

pub fn mesh_chunk(blocks: &BlockGrid, chunk_x: i32, chunk_z: i32) -> MeshData {
    let mut mesh = MeshData::default();
    build_chunk_mesh(blocks, chunk_x, chunk_z, &mut mesh);
    mesh
}
