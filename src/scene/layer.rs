use glam::Mat4;

use crate::geo::ModelTransform;
use crate::particles::{RenderHandle, SmokeSystem};
use crate::scene::clock::FrameClock;
use crate::scene::preset::ScenePreset;

/// What a layer hands the renderer for one frame
pub struct LayerFrame<'a> {
    /// Map view-projection combined with the scene's model transform
    pub camera: Mat4,
    /// Smoke buffers, absent when smoke is disabled or disposed
    pub smoke: Option<RenderHandle<'a>>,
}

/// An anchored scene with an optional smoke emitter.
///
/// Holds everything a frame needs explicitly; switching scenes means
/// disposing this layer and building another.
pub struct SmokeLayer {
    transform: ModelTransform,
    smoke: Option<SmokeSystem>,
    clock: FrameClock,
}

impl SmokeLayer {
    /// Build a layer for `preset`. Smoke is created only when both the
    /// preset and the caller enable it.
    pub fn from_preset(preset: &ScenePreset, smoke_enabled: bool) -> Self {
        Self::build(preset, smoke_enabled, None)
    }

    /// Same as [`from_preset`](Self::from_preset) with a reproducible emitter
    pub fn with_seed(preset: &ScenePreset, smoke_enabled: bool, seed: u64) -> Self {
        Self::build(preset, smoke_enabled, Some(seed))
    }

    fn build(preset: &ScenePreset, smoke_enabled: bool, seed: Option<u64>) -> Self {
        let transform = ModelTransform::from_anchor(&preset.anchor);

        let smoke = (preset.enable_smoke && smoke_enabled).then(|| {
            let config = preset.smoke_config();
            let mut system = match seed {
                Some(seed) => SmokeSystem::with_seed(config, seed),
                None => SmokeSystem::new(config),
            };
            let [x, y, z] = preset.smoke_position;
            system.set_position(x, y, z);
            system
        });

        log::debug!(
            "[SmokeLayer::from_preset] anchor ({:.5}, {:.5}) smoke {}",
            preset.anchor.origin[0],
            preset.anchor.origin[1],
            if smoke.is_some() { "on" } else { "off" }
        );

        Self {
            transform,
            smoke,
            clock: FrameClock::realtime(),
        }
    }

    /// Replace the frame clock, e.g. with a fixed step for headless runs
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Advance by the clock's delta and produce this frame's draw data
    pub fn render_frame(&mut self, map_matrix: &[f64; 16]) -> LayerFrame<'_> {
        let delta = self.clock.delta();
        self.advance(map_matrix, delta)
    }

    /// Advance by an explicit delta and produce this frame's draw data
    pub fn advance(&mut self, map_matrix: &[f64; 16], delta_time: f32) -> LayerFrame<'_> {
        let camera = self.transform.camera_matrix(map_matrix);

        let smoke = match self.smoke.as_mut() {
            Some(system) if !system.is_disposed() => {
                system.update(delta_time);
                Some(system.render_handle())
            }
            _ => None,
        };

        LayerFrame { camera, smoke }
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    pub fn smoke(&self) -> Option<&SmokeSystem> {
        self.smoke.as_ref()
    }

    pub fn smoke_mut(&mut self) -> Option<&mut SmokeSystem> {
        self.smoke.as_mut()
    }

    /// Tear down the smoke system. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut system) = self.smoke.take() {
            system.dispose();
        }
    }
}

impl Drop for SmokeLayer {
    fn drop(&mut self) {
        self.dispose();
    }
}
