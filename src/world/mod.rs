//! World generation and management modules
//! Contains terrain generation, background loading, the chunk map and streaming.

pub mod generator;
pub mod loader;
pub mod map;
pub mod streamer;

// Re-export commonly used types
pub use generator::TerrainGenerator;
pub use loader::{ChunkGenResult, ChunkLoader};
pub use map::World;
pub use streamer::{ChunkStreamer, StreamStats};
