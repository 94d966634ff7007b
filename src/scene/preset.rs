use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SmokeError, SmokeResult};
use crate::geo::GeoAnchor;
use crate::particles::{SmokeConfig, SmokeOptions};

const BUILTIN_SCENES: &str = include_str!("../../presets/scenes.toml");

/// Smoke options the map layer applies before a scene's own overrides
pub fn layer_smoke_defaults() -> SmokeOptions {
    SmokeOptions {
        particle_count: Some(250),
        particle_size: Some(12.0),
        particle_opacity: Some(0.8),
        particle_color: Some(0xcccccc),
        emission_rate: Some(25.0),
        particle_lifetime: Some(5.0),
        gravity: Some(-0.0008),
        wind: Some(Vec3::new(0.003, 0.0, 0.002)),
        start_velocity: Some(Vec3::new(0.0, 0.02, 0.0)),
        start_velocity_randomness: Some(0.01),
        fade_in: Some(0.1),
        fade_out: Some(0.7),
        blending: None,
    }
}

/// Initial map camera, passed through to the map host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraHints {
    /// `[longitude, latitude]` in degrees
    pub center: [f64; 2],
    pub zoom: f64,
    /// Degrees from straight down
    pub pitch: f64,
}

impl Default for CameraHints {
    fn default() -> Self {
        Self {
            center: [148.9819, -35.3981],
            zoom: 18.0,
            pitch: 60.0,
        }
    }
}

/// One selectable scene: where it sits, where the smoke comes from, how it looks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenePreset {
    pub anchor: GeoAnchor,
    pub camera: CameraHints,
    pub enable_smoke: bool,
    /// Emitter anchor in the scene's local frame
    pub smoke_position: [f32; 3],
    pub smoke: SmokeOptions,
}

impl Default for ScenePreset {
    fn default() -> Self {
        Self {
            anchor: GeoAnchor::default(),
            camera: CameraHints::default(),
            enable_smoke: true,
            smoke_position: [0.0, 5.0, 0.0],
            smoke: SmokeOptions::default(),
        }
    }
}

impl ScenePreset {
    /// Resolved smoke configuration: layer defaults overridden by this scene
    pub fn smoke_config(&self) -> SmokeConfig {
        SmokeConfig::from_options(&layer_smoke_defaults().merged(&self.smoke))
    }
}

/// Named scene presets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneCatalog {
    scenes: BTreeMap<String, ScenePreset>,
}

impl SceneCatalog {
    /// The scenes compiled into the crate
    pub fn builtin() -> SmokeResult<Self> {
        Self::from_toml_str(BUILTIN_SCENES)
    }

    pub fn from_toml_str(source: &str) -> SmokeResult<Self> {
        let scenes: BTreeMap<String, ScenePreset> = toml::from_str(source)?;
        Ok(Self { scenes })
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> SmokeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| SmokeError::io(path, e))?;
        let catalog = Self::from_toml_str(&source)?;
        log::info!(
            "[SceneCatalog::load] {} scenes from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> SmokeResult<&ScenePreset> {
        self.scenes.get(name).ok_or_else(|| SmokeError::UnknownPreset {
            name: name.to_string(),
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, preset: ScenePreset) {
        self.scenes.insert(name.into(), preset);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
