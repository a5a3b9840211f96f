use glam::Vec3;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::vertex::Vertex;
use crate::render::backend::{MeshBackend, MeshHandle};
use crate::render::frustum::AABB;
use crate::render::mesh::build_chunk_mesh;
use crate::world::generator::TerrainGenerator;

/// Bit-exact chunk identity: `(x as i64) << 32 | (z as u32)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ChunkKey(pub i64);

impl ChunkKey {
    pub fn new(cx: i32, cz: i32) -> Self {
        ChunkKey(((cx as i64) << 32) | (cz as u32 as i64))
    }

    pub fn coords(self) -> (i32, i32) {
        ((self.0 >> 32) as i32, self.0 as i32)
    }

    /// Chunk containing the world-space point (floor per axis).
    pub fn containing(x: f32, z: f32) -> Self {
        let cx = (x / CHUNK_SIZE as f32).floor() as i32;
        let cz = (z / CHUNK_SIZE as f32).floor() as i32;
        ChunkKey::new(cx, cz)
    }

    /// Chunk containing the integer block column.
    pub fn containing_block(x: i32, z: i32) -> Self {
        ChunkKey::new(x.div_euclid(CHUNK_SIZE), z.div_euclid(CHUNK_SIZE))
    }

    pub fn chebyshev_distance(self, other: ChunkKey) -> i32 {
        let (ax, az) = self.coords();
        let (bx, bz) = other.coords();
        (ax - bx).abs().max((az - bz).abs())
    }
}

/// Dense `SIZE x HEIGHT x SIZE` grid of block codes, x-major then y then z.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlockGrid {
    blocks: Box<[BlockType]>,
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockGrid {
    pub fn new() -> Self {
        BlockGrid {
            blocks: vec![BlockType::Air; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    pub fn filled(block: BlockType) -> Self {
        BlockGrid {
            blocks: vec![block; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < CHUNK_SIZE && y >= 0 && y < CHUNK_HEIGHT && z >= 0 && z < CHUNK_SIZE
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        ((x * CHUNK_HEIGHT + y) * CHUNK_SIZE + z) as usize
    }

    /// Out-of-grid cells read as air.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)]
        } else {
            BlockType::Air
        }
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        self.blocks[Self::index(x, y, z)] = block;
        true
    }
}

/// CPU-side mesh produced by the mesher.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChunkState {
    NotGenerated,
    Generated,
    Uploaded,
}

pub struct Chunk {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub blocks: BlockGrid,
    mesh: MeshData,
    gpu_mesh: Option<MeshHandle>,
    num_indices: u32,
    state: ChunkState,
}

impl Chunk {
    pub fn new(chunk_x: i32, chunk_z: i32) -> Self {
        Chunk {
            chunk_x,
            chunk_z,
            blocks: BlockGrid::new(),
            mesh: MeshData::default(),
            gpu_mesh: None,
            num_indices: 0,
            state: ChunkState::NotGenerated,
        }
    }

    pub fn key(&self) -> ChunkKey {
        ChunkKey::new(self.chunk_x, self.chunk_z)
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn is_generated(&self) -> bool {
        self.state != ChunkState::NotGenerated
    }

    pub fn num_indices(&self) -> u32 {
        self.num_indices
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn gpu_mesh(&self) -> Option<MeshHandle> {
        self.gpu_mesh
    }

    pub fn aabb(&self) -> AABB {
        let min = Vec3::new(
            (self.chunk_x * CHUNK_SIZE) as f32,
            0.0,
            (self.chunk_z * CHUNK_SIZE) as f32,
        );
        let max = Vec3::new(
            ((self.chunk_x + 1) * CHUNK_SIZE) as f32,
            CHUNK_HEIGHT as f32,
            ((self.chunk_z + 1) * CHUNK_SIZE) as f32,
        );
        AABB::new(min, max)
    }

    /// Fill the grid from terrain noise and build the CPU mesh. Safe to run
    /// off the main thread: touches no GPU state.
    pub fn generate(&mut self, generator: &TerrainGenerator) {
        generator.fill(self.chunk_x, self.chunk_z, &mut self.blocks);
        self.rebuild_cpu_mesh();
        self.state = ChunkState::Generated;
    }

    /// Replace the grid with externally supplied content and mesh it.
    pub fn generate_from(&mut self, blocks: BlockGrid) {
        self.blocks = blocks;
        self.rebuild_cpu_mesh();
        self.state = ChunkState::Generated;
    }

    fn rebuild_cpu_mesh(&mut self) {
        build_chunk_mesh(&self.blocks, self.chunk_x, self.chunk_z, &mut self.mesh);
    }

    /// Move the CPU mesh into GPU buffers. Only valid after generation;
    /// an empty mesh is recorded as zero indices with no allocation.
    pub fn upload<B: MeshBackend + ?Sized>(&mut self, backend: &mut B) -> bool {
        if self.state != ChunkState::Generated {
            return false;
        }

        let mesh = std::mem::take(&mut self.mesh);
        self.num_indices = mesh.indices.len() as u32;
        if mesh.is_empty() {
            tracing::trace!(cx = self.chunk_x, cz = self.chunk_z, "uploaded empty chunk");
        } else {
            self.gpu_mesh = Some(backend.create_mesh(&mesh.vertices, &mesh.indices));
        }
        self.state = ChunkState::Uploaded;
        true
    }

    /// Synchronous remesh + re-upload after an edit.
    pub fn rebuild<B: MeshBackend + ?Sized>(&mut self, backend: &mut B) {
        self.rebuild_cpu_mesh();
        self.release_gpu(backend);
        self.state = ChunkState::Generated;
        self.upload(backend);
    }

    pub fn render<B: MeshBackend + ?Sized>(&self, backend: &mut B) -> bool {
        if self.state != ChunkState::Uploaded || self.num_indices == 0 {
            return false;
        }
        match self.gpu_mesh {
            Some(handle) => {
                backend.draw_mesh(handle, self.num_indices);
                true
            }
            None => false,
        }
    }

    /// Release GPU resources. Must run on the thread that owns the backend.
    pub fn destroy<B: MeshBackend + ?Sized>(&mut self, backend: &mut B) {
        self.release_gpu(backend);
        self.mesh.clear();
    }

    fn release_gpu<B: MeshBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(handle) = self.gpu_mesh.take() {
            backend.destroy_mesh(handle);
        }
        self.num_indices = 0;
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks.get(x, y, z)
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        self.blocks.set(x, y, z, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::HeadlessBackend;

    #[test]
    fn test_key_encoding_is_bit_exact() {
        assert_eq!(ChunkKey::new(0, 0).0, 0);
        assert_eq!(ChunkKey::new(1, 2).0, (1i64 << 32) | 2);
        assert_eq!(ChunkKey::new(0, -1).0, 0xFFFF_FFFF);
        assert_eq!(ChunkKey::new(-1, 0).0, -1i64 << 32);
        assert_eq!(ChunkKey::new(-3, -7).coords(), (-3, -7));
        assert_ne!(ChunkKey::new(1, 0), ChunkKey::new(0, 1));
    }

    #[test]
    fn test_key_containing_floors_negative_coords() {
        assert_eq!(ChunkKey::containing(-0.5, 15.9).coords(), (-1, 0));
        assert_eq!(ChunkKey::containing(16.0, -16.0).coords(), (1, -1));
        assert_eq!(ChunkKey::containing_block(-1, -17).coords(), (-1, -2));
        assert_eq!(
            ChunkKey::new(3, -2).chebyshev_distance(ChunkKey::new(-1, 0)),
            4
        );
    }

    #[test]
    fn test_grid_out_of_bounds_reads_air() {
        let mut grid = BlockGrid::filled(BlockType::Stone);
        assert_eq!(grid.get(-1, 0, 0), BlockType::Air);
        assert_eq!(grid.get(0, CHUNK_HEIGHT, 0), BlockType::Air);
        assert!(!grid.set(CHUNK_SIZE, 0, 0, BlockType::Dirt));
        assert!(grid.set(15, 127, 15, BlockType::Dirt));
        assert_eq!(grid.get(15, 127, 15), BlockType::Dirt);
    }

    #[test]
    fn test_lifecycle_states() {
        let mut backend = HeadlessBackend::default();
        let mut chunk = Chunk::new(0, 0);
        assert_eq!(chunk.state(), ChunkState::NotGenerated);
        assert!(!chunk.upload(&mut backend));
        assert!(!chunk.render(&mut backend));

        let mut grid = BlockGrid::new();
        grid.set(1, 1, 1, BlockType::Stone);
        chunk.generate_from(grid);
        assert_eq!(chunk.state(), ChunkState::Generated);
        assert_eq!(chunk.mesh().indices.len(), 36);
        assert!(!chunk.render(&mut backend));

        assert!(chunk.upload(&mut backend));
        assert_eq!(chunk.state(), ChunkState::Uploaded);
        assert!(chunk.mesh().vertices.is_empty());
        assert_eq!(chunk.num_indices(), 36);
        assert_eq!(backend.live_meshes(), 1);
        assert!(chunk.render(&mut backend));
        assert_eq!(backend.draws_this_frame(), 1);

        chunk.destroy(&mut backend);
        assert_eq!(backend.live_meshes(), 0);
    }

    #[test]
    fn test_empty_mesh_upload_skips_allocation_and_draw() {
        let mut backend = HeadlessBackend::default();
        let mut chunk = Chunk::new(4, 4);
        chunk.generate_from(BlockGrid::new());
        assert!(chunk.upload(&mut backend));
        assert_eq!(chunk.state(), ChunkState::Uploaded);
        assert_eq!(chunk.num_indices(), 0);
        assert_eq!(backend.total_created(), 0);
        assert!(!chunk.render(&mut backend));
        assert_eq!(backend.draws_this_frame(), 0);
    }

    #[test]
    fn test_rebuild_replaces_gpu_mesh() {
        let mut backend = HeadlessBackend::default();
        let mut chunk = Chunk::new(0, 0);
        let mut grid = BlockGrid::new();
        grid.set(0, 0, 0, BlockType::Dirt);
        grid.set(5, 5, 5, BlockType::Dirt);
        chunk.generate_from(grid);
        chunk.upload(&mut backend);
        let first = chunk.gpu_mesh().unwrap();

        chunk.set_block(5, 5, 5, BlockType::Air);
        chunk.rebuild(&mut backend);

        assert_eq!(chunk.num_indices(), 36);
        assert_ne!(chunk.gpu_mesh(), Some(first));
        assert_eq!(backend.live_meshes(), 1);
        assert_eq!(backend.total_destroyed(), 1);
    }
}
