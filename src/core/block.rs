use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Block codes stored in a chunk grid. `Air` is the only non-solid code.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Bedrock = 4,
}

impl BlockType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(BlockType::Air),
            1 => Some(BlockType::Grass),
            2 => Some(BlockType::Dirt),
            3 => Some(BlockType::Stone),
            4 => Some(BlockType::Bedrock),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_solid(&self) -> bool {
        *self != BlockType::Air
    }

    /// Bedrock can never be broken by the player.
    pub fn is_breakable(&self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Bedrock)
    }

    pub fn tex_top(&self) -> u32 {
        match self {
            BlockType::Air | BlockType::Dirt => TEX_DIRT,
            BlockType::Grass => TEX_GRASS_TOP,
            BlockType::Stone => TEX_STONE,
            BlockType::Bedrock => TEX_BEDROCK,
        }
    }

    pub fn tex_side(&self) -> u32 {
        match self {
            BlockType::Grass => TEX_GRASS_SIDE,
            _ => self.tex_top(),
        }
    }

    pub fn tex_bottom(&self) -> u32 {
        match self {
            BlockType::Grass => TEX_DIRT,
            _ => self.tex_top(),
        }
    }
}
