//! Per-frame simulation and draw submission.
//!
//! The engine is the one place that owns every piece of mutable state the
//! frame loop touches: the observer, the resident world, the streamer (and
//! through it the worker pool), and the view frustum. The mesh backend is
//! borrowed per call so the caller keeps control of the device.

use glam::Vec3;

use crate::constants::PLAYER_REACH;
use crate::player::{Camera, InputState};
use crate::render::{Frustum, MeshBackend};
use crate::utils::settings::EngineSettings;
use crate::world::{ChunkStreamer, World};

/// Longest step the physics will integrate in one frame.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub dispatched: usize,
    pub completed: usize,
    pub uploaded: usize,
    pub evicted: usize,
    pub resident: usize,
    pub pending: usize,
    pub queued_uploads: usize,
    pub block_broken: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub visible: usize,
    pub culled: usize,
    pub drawn: usize,
    /// Visible chunks with nothing to draw (empty or not yet uploaded).
    pub empty: usize,
}

pub struct Engine {
    pub settings: EngineSettings,
    pub camera: Camera,
    pub world: World,
    pub streamer: ChunkStreamer,
    pub frustum: Frustum,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        let camera = Camera::from_settings(&settings.camera);
        let streamer = ChunkStreamer::new(&settings.world, &settings.terrain);
        tracing::info!(
            seed = settings.world.seed,
            render_distance = streamer.render_distance(),
            workers = streamer.worker_count(),
            "engine initialised"
        );
        Engine {
            settings,
            camera,
            world: World::new(),
            streamer,
            frustum: Frustum::default(),
        }
    }

    pub fn spawn(&self) -> Vec3 {
        Vec3::from(self.settings.camera.spawn)
    }

    /// Advance one frame: observer intents, physics, edits, then streaming.
    pub fn frame<B: MeshBackend + ?Sized>(
        &mut self,
        input: &InputState,
        dt: f32,
        backend: &mut B,
    ) -> FrameStats {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        if input.reset_position {
            let spawn = self.spawn();
            self.camera.reset(spawn);
        }

        if input.look_delta != glam::Vec2::ZERO {
            self.camera
                .process_mouse_movement(input.look_delta.x, -input.look_delta.y, true);
        }

        self.camera.process_movement(input, dt, &self.world);
        if input.jump {
            self.camera.process_jump();
        }
        self.camera.update_physics(dt, &self.world);

        let mut block_broken = false;
        if input.break_block {
            if let Some(hit) = self.camera.raycast(&self.world, PLAYER_REACH) {
                block_broken = self.world.remove_block(hit.block, backend);
            }
        }

        let stream = self
            .streamer
            .update(&mut self.world, self.camera.position, backend);

        FrameStats {
            dispatched: stream.dispatched,
            completed: stream.completed,
            uploaded: stream.uploaded,
            evicted: stream.evicted,
            resident: self.world.len(),
            pending: self.streamer.pending_count(),
            queued_uploads: self.streamer.queued_uploads(),
            block_broken,
        }
    }

    /// Stop background generation. Returns the number of workers joined.
    pub fn shutdown(self) -> usize {
        self.streamer.shutdown()
    }

    /// Cull resident chunks against the current view and draw the rest.
    pub fn render<B: MeshBackend + ?Sized>(&mut self, aspect: f32, backend: &mut B) -> RenderStats {
        let camera = &self.settings.camera;
        let view_proj = self.camera.view_projection(
            aspect,
            camera.fov_degrees.to_radians(),
            camera.near,
            camera.far,
        );
        self.frustum.update(&view_proj);

        let mut stats = RenderStats::default();
        for chunk in self.world.chunks() {
            if !chunk.aabb().is_visible(&self.frustum) {
                stats.culled += 1;
                continue;
            }
            stats.visible += 1;
            if chunk.render(backend) {
                stats.drawn += 1;
            } else {
                stats.empty += 1;
            }
        }
        stats
    }
}
