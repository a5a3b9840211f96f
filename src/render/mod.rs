//! Rendering-related modules
//! Contains the mesh backend seam, chunk meshing, and frustum culling.

pub mod backend;
pub mod frustum;
pub mod gpu;
pub mod mesh;

// Re-export commonly used types
pub use backend::{HeadlessBackend, MeshBackend, MeshHandle};
pub use frustum::{AABB, Frustum, Plane};
pub use gpu::WgpuMeshBackend;
pub use mesh::{Face, build_chunk_mesh, mesh_chunk};
