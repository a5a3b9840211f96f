//! Distance-driven chunk streaming around the observer.
//!
//! One `update` per frame:
//! 1. find the observer's chunk,
//! 2. dispatch generation for every missing chunk within `render_distance`
//!    (nearest first), inserting a placeholder into the world right away,
//! 3. collect finished chunks and queue them for upload; a chunk evicted
//!    while in flight is kept if it is back in range, dropped otherwise,
//! 4. upload at most `max_uploads_per_frame` queued chunks,
//! 5. evict chunks further than `render_distance + unload_margin`.

use std::collections::VecDeque;

use glam::Vec3;

use crate::core::chunk::{Chunk, ChunkKey, ChunkState};
use crate::render::backend::MeshBackend;
use crate::utils::settings::{TerrainSettings, WorldSettings};
use crate::world::loader::ChunkLoader;
use crate::world::map::World;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub dispatched: usize,
    pub completed: usize,
    pub discarded: usize,
    pub uploaded: usize,
    pub evicted: usize,
}

impl StreamStats {
    pub fn is_idle(&self) -> bool {
        *self == StreamStats::default()
    }
}

pub struct ChunkStreamer {
    loader: ChunkLoader,
    upload_queue: VecDeque<ChunkKey>,
    render_distance: i32,
    unload_margin: i32,
    max_uploads_per_frame: usize,
}

impl ChunkStreamer {
    pub fn new(settings: &WorldSettings, terrain: &TerrainSettings) -> Self {
        let loader = ChunkLoader::new(
            settings.seed,
            terrain,
            settings.resolved_worker_count(),
        );
        ChunkStreamer {
            loader,
            upload_queue: VecDeque::new(),
            render_distance: settings.render_distance.max(0),
            unload_margin: settings.unload_margin.max(0),
            max_uploads_per_frame: settings.max_uploads_per_frame.max(1),
        }
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    pub fn pending_count(&self) -> usize {
        self.loader.pending_count()
    }

    pub fn queued_uploads(&self) -> usize {
        self.upload_queue.len()
    }

    pub fn dispatched_total(&self) -> usize {
        self.loader.dispatched_total()
    }

    pub fn worker_count(&self) -> usize {
        self.loader.worker_count()
    }

    /// Stop the generation workers, waiting for them to exit.
    pub fn shutdown(self) -> usize {
        self.loader.shutdown()
    }

    /// No generation in flight and nothing waiting for upload.
    pub fn is_converged(&self) -> bool {
        self.loader.pending_count() == 0 && self.upload_queue.is_empty()
    }

    /// Keys within `radius` of `center`, nearest first.
    pub fn keys_within(center: ChunkKey, radius: i32) -> Vec<ChunkKey> {
        let (cx, cz) = center.coords();
        let mut keys = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                keys.push((dx * dx + dz * dz, ChunkKey::new(cx + dx, cz + dz)));
            }
        }
        keys.sort_by_key(|(dist_sq, _)| *dist_sq);
        keys.into_iter().map(|(_, key)| key).collect()
    }

    pub fn update<B: MeshBackend + ?Sized>(
        &mut self,
        world: &mut World,
        observer: Vec3,
        backend: &mut B,
    ) -> StreamStats {
        let mut stats = StreamStats::default();
        let center = ChunkKey::containing(observer.x, observer.z);

        // Dispatch missing chunks
        for key in Self::keys_within(center, self.render_distance) {
            if world.contains(key) || self.loader.is_pending(key) {
                continue;
            }
            if self.loader.request(key) {
                let (cx, cz) = key.coords();
                world.insert(Chunk::new(cx, cz));
                stats.dispatched += 1;
                tracing::trace!(cx, cz, "chunk dispatched");
            }
        }

        // Collect finished generation
        for result in self.loader.poll_completed() {
            let in_range = result.key.chebyshev_distance(center) <= self.render_distance;
            match world.get_mut(result.key) {
                Some(slot) if slot.state() == ChunkState::NotGenerated => {
                    *slot = result.chunk;
                    self.upload_queue.push_back(result.key);
                    stats.completed += 1;
                }
                // placeholder was evicted in flight, but the chunk is wanted again
                None if in_range => {
                    world.insert(result.chunk);
                    self.upload_queue.push_back(result.key);
                    stats.completed += 1;
                }
                _ => {
                    let (cx, cz) = result.key.coords();
                    tracing::trace!(cx, cz, "discarding stale chunk result");
                    stats.discarded += 1;
                }
            }
        }

        // Bounded uploads
        let mut budget = self.max_uploads_per_frame;
        while budget > 0 {
            let Some(key) = self.upload_queue.pop_front() else {
                break;
            };
            // Keys of chunks evicted since they were queued are skipped
            if let Some(chunk) = world.get_mut(key) {
                if chunk.upload(backend) {
                    stats.uploaded += 1;
                }
                budget -= 1;
            }
        }

        // Evict with hysteresis
        let keep_radius = self.render_distance + self.unload_margin;
        for mut chunk in world.evict_where(|key| key.chebyshev_distance(center) <= keep_radius) {
            chunk.destroy(backend);
            stats.evicted += 1;
        }

        if !stats.is_idle() {
            let (cx, cz) = center.coords();
            tracing::debug!(
                cx,
                cz,
                dispatched = stats.dispatched,
                completed = stats.completed,
                uploaded = stats.uploaded,
                evicted = stats.evicted,
                resident = world.len(),
                pending = self.loader.pending_count(),
                "streaming update"
            );
        }

        stats
    }
}
