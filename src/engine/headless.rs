//! Windowless runs of the terrain animator, for inspecting frames from the CLI.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::engine::EngineResult;
use crate::engine::config::TerrainConfig;
use crate::engine::scene::SceneContext;
use crate::engine::viewport::Viewport;

/// One frame of terrain state, as written by `snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainSnapshot {
    pub ticks: u64,
    pub time: f64,
    pub spin: f64,
    pub segments: [u32; 2],
    pub vertex_count: usize,
    pub base_min: [f32; 3],
    pub base_max: [f32; 3],
    pub height_min: f32,
    pub height_max: f32,
    pub heights: Vec<f32>,
}

impl TerrainSnapshot {
    pub fn capture(scene: &SceneContext) -> Self {
        let animator = scene.animator();
        let grid = animator.grid();
        let (base_min, base_max) = animator
            .base_positions()
            .bounds()
            .unwrap_or(([0.0; 3], [0.0; 3]));
        let heights: Vec<f32> = grid.heights().collect();
        let (height_min, height_max) = heights
            .iter()
            .fold(None, |acc: Option<(f32, f32)>, &h| match acc {
                None => Some((h, h)),
                Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
            })
            .unwrap_or((0.0, 0.0));
        let (sx, sy) = grid.segments();

        Self {
            ticks: animator.clock().ticks(),
            time: animator.time(),
            spin: animator.spin(),
            segments: [sx, sy],
            vertex_count: grid.len(),
            base_min,
            base_max,
            height_min,
            height_max,
            heights,
        }
    }
}

/// Build the scene from `config`, advance it `ticks` times and capture the result.
pub fn run_ticks(config: &TerrainConfig, ticks: u64) -> TerrainSnapshot {
    let viewport = Viewport::new(config.window.width, config.window.height, 1.0);
    let mut scene = SceneContext::new(config, viewport);
    // Frame-locked animation: the delta does not matter, pass a nominal 60 Hz one.
    for _ in 0..ticks {
        scene.tick(1.0 / 60.0);
    }
    log::info!("[Headless] advanced {} ticks (t={:.4})", ticks, scene.animator().time());
    TerrainSnapshot::capture(&scene)
}

/// Write `snapshot` as pretty JSON to `output`, or stdout when `None`.
pub fn write_snapshot(snapshot: &TerrainSnapshot, output: Option<&Path>) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("[Headless] snapshot written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::terrain::WaveParams;
    use crate::engine::terrain::animator::wave_height;

    fn small_config() -> TerrainConfig {
        let mut c = TerrainConfig::default();
        c.plane.segments_x = 6;
        c.plane.segments_y = 4;
        c
    }

    #[test]
    fn zero_ticks_is_flat() {
        let snap = run_ticks(&small_config(), 0);
        assert_eq!(snap.ticks, 0);
        assert_eq!(snap.vertex_count, 7 * 5);
        assert_eq!((snap.height_min, snap.height_max), (0.0, 0.0));
        for (got, want) in snap.base_min.iter().zip([-50.0, -50.0, 0.0]) {
            assert!((got - want).abs() < 1e-4, "{:?}", snap.base_min);
        }
        for (got, want) in snap.base_max.iter().zip([50.0, 50.0, 0.0]) {
            assert!((got - want).abs() < 1e-4, "{:?}", snap.base_max);
        }
    }

    #[test]
    fn heights_match_wave_after_ticks() {
        let snap = run_ticks(&small_config(), 200);
        assert_eq!(snap.ticks, 200);
        assert_eq!(snap.time, 200.0 * 0.005);
        assert!((snap.spin - 0.1).abs() < 1e-12);

        // Vertex 0 is the top-left corner (-50, 50).
        let expected = wave_height(&WaveParams::default(), -50.0, 50.0, snap.time);
        assert!((snap.heights[0] as f64 - expected).abs() < 1e-5);
        assert!(snap.height_max <= 3.0 && snap.height_min >= -3.0);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snap = run_ticks(&small_config(), 1);
        let dir = std::env::temp_dir().join(format!("rolling-terrain-snap-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snap.json");

        write_snapshot(&snap, Some(&path)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["ticks"], 1);
        assert_eq!(value["segments"], serde_json::json!([6, 4]));
        assert_eq!(value["heights"].as_array().unwrap().len(), 35);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
