use glam::IVec3;
use rustc_hash::FxHashMap;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{Chunk, ChunkKey};
use crate::render::backend::MeshBackend;

/// Single owner of every resident chunk. All other structures refer to
/// chunks by key only.
#[derive(Default)]
pub struct World {
    chunks: FxHashMap<ChunkKey, Chunk>,
}

/// Split a world block position into its chunk key and in-chunk coords.
pub fn world_to_local(pos: IVec3) -> (ChunkKey, IVec3) {
    let key = ChunkKey::containing_block(pos.x, pos.z);
    let local = IVec3::new(
        pos.x.rem_euclid(CHUNK_SIZE),
        pos.y,
        pos.z.rem_euclid(CHUNK_SIZE),
    );
    (key, local)
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    pub fn get(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    pub fn get_mut(&mut self, key: ChunkKey) -> Option<&mut Chunk> {
        self.chunks.get_mut(&key)
    }

    /// Insert a chunk unless its key is already resident.
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        let key = chunk.key();
        if self.chunks.contains_key(&key) {
            return false;
        }
        self.chunks.insert(key, chunk);
        true
    }

    pub fn remove(&mut self, key: ChunkKey) -> Option<Chunk> {
        self.chunks.remove(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        self.chunks.keys().copied()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Remove every chunk rejected by `keep`, returning the removed chunks.
    pub fn evict_where<F: FnMut(ChunkKey) -> bool>(&mut self, mut keep: F) -> Vec<Chunk> {
        let doomed: Vec<ChunkKey> = self.chunks.keys().copied().filter(|k| !keep(*k)).collect();
        doomed
            .into_iter()
            .filter_map(|key| self.chunks.remove(&key))
            .collect()
    }

    /// Block at a world position. Cells of non-resident chunks and cells
    /// outside the vertical range read as air.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return BlockType::Air;
        }
        let (key, local) = world_to_local(IVec3::new(x, y, z));
        match self.chunks.get(&key) {
            Some(chunk) => chunk.get_block(local.x, local.y, local.z),
            None => BlockType::Air,
        }
    }

    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_solid()
    }

    /// Break the block at `pos` and remesh its chunk synchronously so the
    /// change is visible on the next render. Returns false when nothing
    /// changed: chunk not resident or not generated, air, or bedrock.
    pub fn remove_block<B: MeshBackend + ?Sized>(&mut self, pos: IVec3, backend: &mut B) -> bool {
        if !(0..CHUNK_HEIGHT).contains(&pos.y) {
            return false;
        }
        let (key, local) = world_to_local(pos);
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return false;
        };
        if !chunk.is_generated() {
            return false;
        }
        if !chunk.get_block(local.x, local.y, local.z).is_breakable() {
            return false;
        }

        chunk.set_block(local.x, local.y, local.z, BlockType::Air);
        chunk.rebuild(backend);
        tracing::trace!(x = pos.x, y = pos.y, z = pos.z, "block removed");
        true
    }
}
