//! Application context: the frame loop's owned state.

mod engine;

pub use engine::{Engine, FrameStats, RenderStats};
