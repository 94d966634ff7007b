//! Anchored scenes: preset catalog, frame timing and the smoke layer

pub mod clock;
pub mod layer;
pub mod preset;

pub use clock::FrameClock;
pub use layer::{LayerFrame, SmokeLayer};
pub use preset::{layer_smoke_defaults, CameraHints, SceneCatalog, ScenePreset};
