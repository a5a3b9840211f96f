// World constants
pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 128;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_HEIGHT * CHUNK_SIZE) as usize;
pub const RENDER_DISTANCE: i32 = 8;
pub const UNLOAD_MARGIN: i32 = 2;
pub const DEFAULT_SEED: u32 = 2147;

// Terrain defaults
pub const TERRAIN_FREQUENCY: f32 = 0.05;
pub const TERRAIN_BASE_HEIGHT: i32 = 32;
pub const TERRAIN_AMPLITUDE: i32 = 16;

//indexes of texture layers
pub const TEX_GRASS_TOP: u32 = 0;
pub const TEX_GRASS_SIDE: u32 = 1;
pub const TEX_DIRT: u32 = 2;
pub const TEX_STONE: u32 = 3;
pub const TEX_BEDROCK: u32 = 4;

// Optimization constants
pub const MAX_UPLOADS_PER_FRAME: usize = 16;
pub const MAX_ASYNC_WORKERS: usize = 8;
pub const RESULT_CHANNEL_CAPACITY: usize = 64;

// Player constants
pub const PLAYER_HEIGHT: f32 = 1.8;
pub const PLAYER_EYE_HEIGHT: f32 = 1.62;
pub const PLAYER_WIDTH: f32 = 0.6;
pub const PLAYER_BASE_SPEED: f32 = 4.3;
pub const PLAYER_JUMP_HEIGHT: f32 = 1.25;
pub const PLAYER_REACH: f32 = 5.0;
pub const GRAVITY: f32 = -25.0;
pub const TERMINAL_FALL_SPEED: f32 = 50.0;
pub const MOUSE_SENSITIVITY: f32 = 0.1;
pub const SPAWN_POSITION: [f32; 3] = [8.0, 80.0, 8.0];
