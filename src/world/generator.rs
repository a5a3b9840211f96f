//! Deterministic column terrain using FastNoiseLite
//!
//! A generator holds no mutable state: the same seed, settings and chunk
//! coordinates always produce the same grid, so workers can build chunks
//! in any order.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::BlockGrid;
use crate::utils::settings::TerrainSettings;

pub struct TerrainGenerator {
    noise_height: FastNoiseLite,
    base_height: i32,
    amplitude: i32,
    pub seed: u32,
}

impl TerrainGenerator {
    pub fn new(seed: u32, settings: &TerrainSettings) -> Self {
        TerrainGenerator {
            noise_height: Self::create_noise(seed, settings.frequency),
            base_height: settings.base_height,
            amplitude: settings.amplitude,
            seed,
        }
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::new(seed, &TerrainSettings::default())
    }

    fn create_noise(seed: u32, frequency: f32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(frequency));
        noise
    }

    /// Surface height of a world column, always inside `[0, CHUNK_HEIGHT - 1]`.
    pub fn terrain_height(&self, world_x: i32, world_z: i32) -> i32 {
        let n = self
            .noise_height
            .get_noise_2d(world_x as f32, world_z as f32)
            .clamp(-1.0, 1.0);
        let offset = ((n + 1.0) * 0.5 * self.amplitude as f32) as i32;
        (self.base_height + offset).clamp(0, CHUNK_HEIGHT - 1)
    }

    /// Fill `blocks` for chunk (`cx`, `cz`), overwriting every cell.
    pub fn fill(&self, cx: i32, cz: i32, blocks: &mut BlockGrid) {
        let base_x = cx * CHUNK_SIZE;
        let base_z = cz * CHUNK_SIZE;

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let height = self.terrain_height(base_x + lx, base_z + lz);
                for y in 0..CHUNK_HEIGHT {
                    blocks.set(lx, y, lz, column_block(y, height));
                }
            }
        }
    }

    pub fn generate_grid(&self, cx: i32, cz: i32) -> BlockGrid {
        let mut blocks = BlockGrid::new();
        self.fill(cx, cz, &mut blocks);
        blocks
    }
}

/// Layering of one column: bedrock floor, stone up to `height - 3`, dirt up
/// to `height - 1`, grass cap at `height`, air above. Bands collapse rather
/// than invert when `height` is small.
pub fn column_block(y: i32, height: i32) -> BlockType {
    if y == 0 {
        BlockType::Bedrock
    } else if y > height {
        BlockType::Air
    } else if y == height {
        BlockType::Grass
    } else if y >= height - 2 {
        BlockType::Dirt
    } else {
        BlockType::Stone
    }
}
