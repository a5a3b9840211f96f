//! Graphics-resource seam used by chunks.
//!
//! Chunks never talk to a graphics API directly: they ask a `MeshBackend`
//! to allocate buffers from a vertex/index list, to draw them, and to free
//! them. Every call must come from the thread that owns the backend.

use rustc_hash::FxHashMap;

use crate::core::vertex::Vertex;

/// Opaque id of a GPU-resident mesh owned by a backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MeshHandle(pub u32);

pub trait MeshBackend {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> MeshHandle;
    fn draw_mesh(&mut self, handle: MeshHandle, index_count: u32);
    fn destroy_mesh(&mut self, handle: MeshHandle);
}

/// Bookkeeping-only backend for tests and headless simulation.
#[derive(Default)]
pub struct HeadlessBackend {
    next_id: u32,
    meshes: FxHashMap<MeshHandle, (usize, usize)>,
    total_created: usize,
    total_destroyed: usize,
    draws: Vec<(MeshHandle, u32)>,
}

impl HeadlessBackend {
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn total_created(&self) -> usize {
        self.total_created
    }

    pub fn total_destroyed(&self) -> usize {
        self.total_destroyed
    }

    pub fn draws_this_frame(&self) -> usize {
        self.draws.len()
    }

    pub fn drawn_indices(&self) -> u64 {
        self.draws.iter().map(|(_, count)| *count as u64).sum()
    }

    /// Vertex/index counts of a live mesh.
    pub fn mesh_sizes(&self, handle: MeshHandle) -> Option<(usize, usize)> {
        self.meshes.get(&handle).copied()
    }

    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }
}

impl MeshBackend for HeadlessBackend {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> MeshHandle {
        let handle = MeshHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.meshes.insert(handle, (vertices.len(), indices.len()));
        self.total_created += 1;
        handle
    }

    fn draw_mesh(&mut self, handle: MeshHandle, index_count: u32) {
        if self.meshes.contains_key(&handle) {
            self.draws.push((handle, index_count));
        } else {
            tracing::warn!(?handle, "draw requested for unknown mesh");
        }
    }

    fn destroy_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle).is_some() {
            self.total_destroyed += 1;
        }
    }
}
