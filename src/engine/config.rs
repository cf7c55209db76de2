//! Runtime configuration.
//!
//! Every field has a default matching the stock look of the background, so an
//! empty `{}` JSON file is a valid config.

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::terrain::WaveParams;
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub plane: PlaneConfig,
    pub wave: WaveConfig,
    pub camera: CameraConfig,
    pub style: StyleConfig,
    pub window: WindowConfig,
    /// Cursor offset from the viewport center is divided by this to get tilt radians.
    pub pointer_divisor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    pub width: f32,
    pub height: f32,
    pub segments_x: u32,
    pub segments_y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub frequency: f64,
    pub amplitude: f64,
    pub time_step: f64,
    pub spin_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Rotation about X; negative looks down.
    pub pitch: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// 0xRRGGBB
    pub line_color: u32,
    pub opacity: f32,
    pub fog_color: u32,
    pub fog_density: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Used as the window title; names the surface the background is mounted into.
    pub container_id: String,
    pub width: f64,
    pub height: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            plane: PlaneConfig::default(),
            wave: WaveConfig::default(),
            camera: CameraConfig::default(),
            style: StyleConfig::default(),
            window: WindowConfig::default(),
            pointer_divisor: 1000.0,
        }
    }
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            segments_x: 60,
            segments_y: 60,
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        let w = WaveParams::default();
        Self {
            frequency: w.frequency,
            amplitude: w.amplitude,
            time_step: w.time_step,
            spin_step: w.spin_step,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 3.0, 5.0],
            pitch: -0.5,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_color: 0x38a838,
            opacity: 0.3,
            fog_color: 0x050505,
            fog_density: 0.002,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            container_id: "canvas-container".to_string(),
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl WaveConfig {
    pub fn params(&self) -> WaveParams {
        WaveParams {
            frequency: self.frequency,
            amplitude: self.amplitude,
            time_step: self.time_step,
            spin_step: self.spin_step,
        }
    }
}

impl TerrainConfig {
    /// Load from a JSON file and validate it.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("[Config] loaded {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// `Some(path)` loads the file, `None` yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> EngineResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let p = &self.plane;
        if p.segments_x == 0 || p.segments_y == 0 {
            return Err(EngineError::invalid_config("plane segments must be > 0"));
        }
        // Vertices are addressed by u32 line indices.
        let (sx, sy) = (u128::from(p.segments_x), u128::from(p.segments_y));
        let vertices = (sx + 1) * (sy + 1);
        let line_indices = 2 * (3 * sx * sy + sx + sy);
        if vertices > u128::from(u32::MAX) || line_indices > u128::from(u32::MAX) {
            return Err(EngineError::invalid_config(format!(
                "plane segments too large for u32 indices: {}x{}",
                p.segments_x, p.segments_y
            )));
        }
        if !(p.width > 0.0 && p.height > 0.0) {
            return Err(EngineError::invalid_config("plane width/height must be > 0"));
        }

        if !(self.pointer_divisor > 0.0) {
            return Err(EngineError::invalid_config("pointer_divisor must be > 0"));
        }

        let c = &self.camera;
        let fov = c.fov_y_degrees.to_radians();
        if !(fov > 0.0 && fov < PI) {
            return Err(EngineError::invalid_config(format!(
                "camera fov_y_degrees out of range: {}",
                c.fov_y_degrees
            )));
        }
        if !(c.near > 0.0 && c.far > c.near) {
            return Err(EngineError::invalid_config(format!(
                "camera clip planes invalid: near={} far={}",
                c.near, c.far
            )));
        }

        let s = &self.style;
        if !(0.0..=1.0).contains(&s.opacity) {
            return Err(EngineError::invalid_config(format!(
                "style opacity must be in [0, 1]: {}",
                s.opacity
            )));
        }
        if !(s.fog_density >= 0.0) {
            return Err(EngineError::invalid_config("style fog_density must be >= 0"));
        }

        if !(self.window.width > 0.0 && self.window.height > 0.0) {
            return Err(EngineError::invalid_config("window size must be > 0"));
        }

        Ok(())
    }
}

/// 0xRRGGBB -> linear-ish `[r, g, b]` in 0..1 (no gamma conversion).
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        TerrainConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_json_is_default() {
        let c = TerrainConfig::from_json("{}").unwrap();
        assert_eq!(c, TerrainConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let c = TerrainConfig::from_json(r#"{ "plane": { "segments_x": 10 }, "pointer_divisor": 500 }"#)
            .unwrap();
        assert_eq!(c.plane.segments_x, 10);
        assert_eq!(c.plane.segments_y, 60);
        assert_eq!(c.pointer_divisor, 500.0);
        assert_eq!(c.wave, WaveConfig::default());
    }

    #[test]
    fn json_round_trip_preserves_defaults() {
        let text = TerrainConfig::default().to_json_pretty().unwrap();
        assert_eq!(TerrainConfig::from_json(&text).unwrap(), TerrainConfig::default());
    }

    #[test]
    fn rejects_zero_segments() {
        let err = TerrainConfig::from_json(r#"{ "plane": { "segments_y": 0 } }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_segments_beyond_u32_indices() {
        let mut c = TerrainConfig::default();
        c.plane.segments_x = u32::MAX;
        c.plane.segments_y = u32::MAX;
        assert!(matches!(c.validate(), Err(EngineError::InvalidConfig { .. })));

        // 26755² cells need ~4.3e9 line indices, just past u32::MAX.
        let mut c = TerrainConfig::default();
        c.plane.segments_x = 26_755;
        c.plane.segments_y = 26_755;
        assert!(c.validate().is_err());

        let mut c = TerrainConfig::default();
        c.plane.segments_x = 1000;
        c.plane.segments_y = 1000;
        c.validate().unwrap();
    }

    #[test]
    fn rejects_bad_clip_planes_and_opacity() {
        let mut c = TerrainConfig::default();
        c.camera.far = 0.05;
        assert!(c.validate().is_err());

        let mut c = TerrainConfig::default();
        c.style.opacity = 1.5;
        assert!(c.validate().is_err());

        let mut c = TerrainConfig::default();
        c.pointer_divisor = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = TerrainConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(rgb_from_hex(0xff0000), [1.0, 0.0, 0.0]);
        let g = rgb_from_hex(0x38a838);
        assert!((g[0] - 56.0 / 255.0).abs() < 1e-6);
        assert!((g[1] - 168.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn wave_config_maps_to_params() {
        assert_eq!(WaveConfig::default().params(), WaveParams::default());
    }
}
