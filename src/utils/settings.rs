use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EngineSettings {
    pub world: WorldSettings,
    pub terrain: TerrainSettings,
    pub camera: CameraSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorldSettings {
    pub seed: u32,
    /// Chebyshev radius, in chunks, kept resident around the observer.
    pub render_distance: i32,
    /// Extra rings kept before a chunk is evicted.
    pub unload_margin: i32,
    pub max_uploads_per_frame: usize,
    /// 0 picks one worker per core.
    pub worker_count: usize,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            render_distance: RENDER_DISTANCE,
            unload_margin: UNLOAD_MARGIN,
            max_uploads_per_frame: MAX_UPLOADS_PER_FRAME,
            worker_count: 0,
        }
    }
}

impl WorldSettings {
    pub fn resolved_worker_count(&self) -> usize {
        if self.worker_count == 0 {
            num_cpus::get().clamp(1, MAX_ASYNC_WORKERS)
        } else {
            self.worker_count
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TerrainSettings {
    pub frequency: f32,
    pub base_height: i32,
    pub amplitude: i32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            frequency: TERRAIN_FREQUENCY,
            base_height: TERRAIN_BASE_HEIGHT,
            amplitude: TERRAIN_AMPLITUDE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub spawn: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            near: 0.1,
            far: 500.0,
            movement_speed: PLAYER_BASE_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            spawn: SPAWN_POSITION,
        }
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "voxstream")
        .map(|dirs| dirs.config_dir().join("settings.bin"))
}

pub fn save_settings(path: &Path, settings: &EngineSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating settings directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating settings file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, settings).context("encoding settings")?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}

/// Load settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> anyhow::Result<EngineSettings> {
    if !path.exists() {
        tracing::info!("No settings at {}, using defaults", path.display());
        return Ok(EngineSettings::default());
    }
    let file =
        File::open(path).with_context(|| format!("opening settings file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let settings = bincode::deserialize_from(&mut reader)
        .with_context(|| format!("decoding settings file {}", path.display()))?;
    tracing::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Like `load_settings`, but an unreadable or stale file only costs a
/// warning: the run continues on defaults.
pub fn load_settings_or_default(path: &Path) -> EngineSettings {
    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "settings file unreadable, using defaults");
            EngineSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("voxstream-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_settings_file_roundtrip() {
        let path = scratch_path("roundtrip.bin");
        let mut settings = EngineSettings::default();
        settings.world.seed = 42;
        settings.world.render_distance = 3;
        settings.camera.spawn = [1.0, 2.0, 3.0];

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_path("does-not-exist.bin");
        assert_eq!(load_settings(&path).unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let path = scratch_path("garbage.bin");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"xy").unwrap();
        assert!(load_settings(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_falls_back_to_defaults() {
        let path = scratch_path("stale.bin");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"xy").unwrap();
        assert_eq!(load_settings_or_default(&path), EngineSettings::default());

        let mut settings = EngineSettings::default();
        settings.world.seed = 7;
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings_or_default(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_worker_count_resolution() {
        let mut world = WorldSettings::default();
        let auto = world.resolved_worker_count();
        assert!((1..=MAX_ASYNC_WORKERS).contains(&auto));
        world.worker_count = 3;
        assert_eq!(world.resolved_worker_count(), 3);
    }
}
