//! Smoke Engine
//!
//! Fixed-capacity smoke particle simulation for anchored 3D map scenes.
//! The core (`particles`) is a pure step function over a preallocated pool;
//! `renderer` draws its instance buffers with wgpu, `geo` places the scene
//! in Web-Mercator space and `scene` ties both to named presets.

pub mod constants;
pub mod error;
pub mod geo;
pub mod particles;
pub mod renderer;
pub mod scene;

pub use error::{SmokeError, SmokeResult};
pub use geo::{GeoAnchor, MercatorCoordinate, ModelTransform};
pub use particles::{
    BlendMode, RenderHandle, SmokeConfig, SmokeInstance, SmokeOptions, SmokeStats, SmokeSystem,
    SmokeTexture,
};
pub use renderer::SmokeRenderer;
pub use scene::{FrameClock, LayerFrame, SceneCatalog, ScenePreset, SmokeLayer};
