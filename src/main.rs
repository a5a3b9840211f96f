//! Headless voxstream driver
//!
//! Walks an observer forward through generated terrain for a fixed number
//! of frames and reports what the streamer did.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;

use voxstream::{
    Engine, FrameStats, HeadlessBackend, InputState, MeshBackend, WgpuMeshBackend,
    load_settings_or_default, save_settings, utils::settings::default_settings_path,
};

const FRAME_DT: f32 = 1.0 / 60.0;
const STATS_INTERVAL: u32 = 60;

#[derive(Parser, Debug)]
#[command(name = "voxstream", about = "Stream and mesh voxel terrain around a walking observer")]
struct Args {
    /// Terrain seed
    #[arg(long)]
    seed: Option<u32>,

    /// Render distance in chunks
    #[arg(long)]
    radius: Option<i32>,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    #[arg(long)]
    uploads_per_frame: Option<usize>,

    /// Generation worker threads (0 = one per core)
    #[arg(long)]
    workers: Option<usize>,

    /// Settings file; defaults to the per-user config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Upload meshes through a headless wgpu device
    #[arg(long)]
    gpu: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let settings_path = args.settings.clone().or_else(default_settings_path);
    let mut settings = match &settings_path {
        Some(path) => load_settings_or_default(path),
        None => Default::default(),
    };

    if let Some(seed) = args.seed {
        settings.world.seed = seed;
    }
    if let Some(radius) = args.radius {
        settings.world.render_distance = radius;
    }
    if let Some(uploads) = args.uploads_per_frame {
        settings.world.max_uploads_per_frame = uploads;
    }
    if let Some(workers) = args.workers {
        settings.world.worker_count = workers;
    }

    if args.save_settings {
        let path = settings_path
            .as_deref()
            .context("no settings path available")?;
        save_settings(path, &settings)?;
    }

    let mut engine = Engine::new(settings);

    if args.gpu {
        let Some(mut backend) = WgpuMeshBackend::headless() else {
            bail!("no wgpu adapter available");
        };
        tracing::info!("using wgpu mesh backend");
        run(&mut engine, &mut backend, args.frames, |b| b.begin_frame());
        tracing::info!(live_meshes = backend.live_meshes(), "gpu backend finished");
    } else {
        let mut backend = HeadlessBackend::default();
        run(&mut engine, &mut backend, args.frames, |b| b.begin_frame());
        tracing::info!(
            live_meshes = backend.live_meshes(),
            created = backend.total_created(),
            destroyed = backend.total_destroyed(),
            "headless backend finished"
        );
    }

    engine.shutdown();
    Ok(())
}

fn run<B: MeshBackend>(
    engine: &mut Engine,
    backend: &mut B,
    frames: u32,
    mut begin_frame: impl FnMut(&mut B),
) {
    let input = InputState {
        forward: true,
        ..Default::default()
    };
    let mut totals = FrameStats::default();

    for frame in 0..frames {
        begin_frame(backend);
        let stats = engine.frame(&input, FRAME_DT, backend);
        let drawn = engine.render(16.0 / 9.0, backend);

        totals.dispatched += stats.dispatched;
        totals.completed += stats.completed;
        totals.uploaded += stats.uploaded;
        totals.evicted += stats.evicted;

        if frame % STATS_INTERVAL == 0 {
            let pos = engine.camera.position;
            tracing::info!(
                frame,
                x = pos.x,
                y = pos.y,
                z = pos.z,
                resident = stats.resident,
                pending = stats.pending,
                queued = stats.queued_uploads,
                visible = drawn.visible,
                culled = drawn.culled,
                drawn = drawn.drawn,
                "frame"
            );
        }
    }

    tracing::info!(
        frames,
        dispatched = totals.dispatched,
        completed = totals.completed,
        uploaded = totals.uploaded,
        evicted = totals.evicted,
        resident = engine.world.len(),
        "simulation finished"
    );
}
