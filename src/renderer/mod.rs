//! wgpu point-sprite renderer for smoke systems

pub mod smoke_renderer;

pub use smoke_renderer::{blend_state, SmokeRenderer, SmokeUniforms};
