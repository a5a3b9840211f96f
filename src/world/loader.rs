//! Background chunk generation
//!
//! Terrain filling and meshing run on a pool of worker threads so the main
//! thread never blocks on them. Each request is one independent unit of
//! work; the main thread polls finished chunks without waiting and is the
//! only side that ever touches GPU state.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, unbounded};
use rustc_hash::FxHashSet;

use crate::constants::RESULT_CHANNEL_CAPACITY;
use crate::core::chunk::{Chunk, ChunkKey};
use crate::utils::settings::TerrainSettings;
use crate::world::generator::TerrainGenerator;

#[derive(Clone, Copy, Debug)]
pub struct ChunkGenRequest {
    pub key: ChunkKey,
}

/// A fully generated chunk (grid + CPU mesh), not yet uploaded.
pub struct ChunkGenResult {
    pub key: ChunkKey,
    pub chunk: Chunk,
}

/// Manages background chunk generation with worker threads
pub struct ChunkLoader {
    request_tx: Sender<ChunkGenRequest>,
    result_rx: Receiver<ChunkGenResult>,
    pending: FxHashSet<ChunkKey>,
    dispatched_total: usize,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkLoader {
    pub fn new(seed: u32, terrain: &TerrainSettings, num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        // Every accepted request must reach a worker, so requests are unbounded;
        // results are bounded to throttle workers that outrun the main thread.
        let (request_tx, request_rx) = unbounded::<ChunkGenRequest>();
        let (result_tx, result_rx) = bounded::<ChunkGenResult>(RESULT_CHANNEL_CAPACITY);

        let mut workers = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let generator = TerrainGenerator::new(seed, terrain);

            let handle = thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    while let Ok(req) = rx.recv() {
                        let (cx, cz) = req.key.coords();
                        let mut chunk = Chunk::new(cx, cz);
                        chunk.generate(&generator);

                        if tx.send(ChunkGenResult { key: req.key, chunk }).is_err() {
                            // Main thread has closed, exit
                            break;
                        }
                    }
                })
                .expect("Failed to spawn chunk generation worker");
            workers.push(handle);
        }

        tracing::info!(workers = num_workers, seed, "chunk loader started");

        ChunkLoader {
            request_tx,
            result_rx,
            pending: FxHashSet::default(),
            dispatched_total: 0,
            workers,
        }
    }

    /// Dispatch generation for `key`. Returns false when the key is already
    /// in flight or the workers are gone.
    pub fn request(&mut self, key: ChunkKey) -> bool {
        if self.pending.contains(&key) {
            return false;
        }
        if self.request_tx.send(ChunkGenRequest { key }).is_err() {
            tracing::warn!(?key, "chunk workers disconnected, request dropped");
            return false;
        }
        self.pending.insert(key);
        self.dispatched_total += 1;
        true
    }

    pub fn is_pending(&self, key: ChunkKey) -> bool {
        self.pending.contains(&key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total requests accepted since creation.
    pub fn dispatched_total(&self) -> usize {
        self.dispatched_total
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Close both channels and wait for every worker to exit. A worker
    /// builds at most one more chunk before its send fails and it stops.
    /// Returns the number of workers joined.
    ///
    /// Plain `drop` closes the same channels; the workers then exit on
    /// their own, detached.
    pub fn shutdown(self) -> usize {
        let ChunkLoader {
            request_tx,
            result_rx,
            pending,
            workers,
            ..
        } = self;
        drop(request_tx);
        drop(result_rx);

        let mut joined = 0;
        for handle in workers {
            if handle.join().is_ok() {
                joined += 1;
            } else {
                tracing::warn!("chunk worker panicked");
            }
        }
        tracing::info!(workers = joined, abandoned = pending.len(), "chunk loader stopped");
        joined
    }

    /// Drain every finished chunk without blocking.
    pub fn poll_completed(&mut self) -> Vec<ChunkGenResult> {
        let mut results = Vec::new();
        loop {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    self.pending.remove(&result.key);
                    results.push(result);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("chunk result channel disconnected");
                    break;
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut ChunkLoader, expected: usize) -> Vec<ChunkGenResult> {
        let deadline = Instant::now() + Duration::from_secs(30);
        let mut results = Vec::new();
        while results.len() < expected && Instant::now() < deadline {
            results.extend(loader.poll_completed());
            thread::sleep(Duration::from_millis(2));
        }
        results
    }

    #[test]
    fn test_duplicate_requests_are_rejected() {
        let mut loader = ChunkLoader::new(1, &TerrainSettings::default(), 2);
        let key = ChunkKey::new(0, 0);
        assert!(loader.request(key));
        assert!(!loader.request(key));
        assert!(loader.is_pending(key));
        assert_eq!(loader.dispatched_total(), 1);

        let results = wait_for(&mut loader, 1);
        assert_eq!(results.len(), 1);
        assert!(!loader.is_pending(key));
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_results_match_synchronous_generation() {
        let terrain = TerrainSettings::default();
        let mut loader = ChunkLoader::new(77, &terrain, 3);
        let keys = [ChunkKey::new(0, 0), ChunkKey::new(-1, 4), ChunkKey::new(9, -9)];
        for key in keys {
            assert!(loader.request(key));
        }

        let results = wait_for(&mut loader, keys.len());
        assert_eq!(results.len(), keys.len());

        let generator = TerrainGenerator::new(77, &terrain);
        for result in results {
            let (cx, cz) = result.key.coords();
            assert_eq!((result.chunk.chunk_x, result.chunk.chunk_z), (cx, cz));
            assert!(result.chunk.is_generated());

            let mut expected = Chunk::new(cx, cz);
            expected.generate(&generator);
            assert_eq!(result.chunk.blocks, expected.blocks);
            assert_eq!(result.chunk.mesh(), expected.mesh());
        }
    }

    #[test]
    fn test_shutdown_joins_workers_with_requests_in_flight() {
        let mut loader = ChunkLoader::new(5, &TerrainSettings::default(), 2);
        assert_eq!(loader.worker_count(), 2);
        for cx in 0..32 {
            assert!(loader.request(ChunkKey::new(cx, 0)));
        }
        assert_eq!(loader.shutdown(), 2);
    }
}
