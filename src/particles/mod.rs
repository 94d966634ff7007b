//! Smoke particle simulation
//!
//! A fixed pool of slots stored as parallel arrays. `SmokeSystem` runs the
//! per-frame pipeline: emitter, ageing, integrator, appearance, then the
//! render buffers the host reads back.

pub mod config;
pub mod particle_data;
pub mod emitter;
pub mod physics;
pub mod lifecycle;
pub mod render_buffer;
pub mod texture;
pub mod system;

pub use config::{BlendMode, SmokeConfig, SmokeOptions};
pub use particle_data::ParticlePool;
pub use emitter::Emitter;
pub use render_buffer::{RenderBuffers, RenderHandle, SmokeInstance};
pub use texture::SmokeTexture;
pub use system::{SmokeStats, SmokeSystem};
