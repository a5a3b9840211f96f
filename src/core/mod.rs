//! Core data structures for the engine
//! Contains block codes, the chunk grid and lifecycle, and the mesh vertex.

pub mod block;
pub mod chunk;
pub mod vertex;

// Re-export commonly used types
pub use block::BlockType;
pub use chunk::{BlockGrid, Chunk, ChunkKey, ChunkState, MeshData};
pub use vertex::Vertex;
