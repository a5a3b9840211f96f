//! Player-related modules
//! Contains the observer camera, its physics, and input intents.

pub mod camera;
pub mod input;

// Re-export commonly used types
pub use camera::{Camera, RayHit};
pub use input::InputState;
