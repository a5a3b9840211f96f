// Core module with fundamental types
pub mod core;

// Player module with camera and input
pub mod player;

// Render module with the mesh backend, meshing and culling
pub mod render;

// World module with generation, loading and streaming
pub mod world;

// Frame loop state
pub mod app;

// Other modules
pub mod constants;
pub mod utils;

// Re-exports
pub use app::{Engine, FrameStats, RenderStats};
pub use constants::*;
pub use core::{BlockGrid, BlockType, Chunk, ChunkKey, ChunkState, MeshData, Vertex};
pub use player::{Camera, InputState, RayHit};
pub use render::{AABB, Frustum, HeadlessBackend, MeshBackend, MeshHandle, WgpuMeshBackend};
pub use utils::settings::{
    CameraSettings, EngineSettings, TerrainSettings, WorldSettings, load_settings,
    load_settings_or_default, save_settings,
};
pub use world::{ChunkLoader, ChunkStreamer, StreamStats, TerrainGenerator, World};
