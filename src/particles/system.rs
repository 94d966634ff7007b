use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::emission::MIN_SIZE_FACTOR;
use crate::error::{SmokeError, SmokeResult};
use crate::particles::config::{SmokeConfig, SmokeOptions};
use crate::particles::emitter::Emitter;
use crate::particles::lifecycle::{advance_ages, update_appearance};
use crate::particles::particle_data::ParticlePool;
use crate::particles::physics::integrate;
use crate::particles::render_buffer::{RenderBuffers, RenderHandle};
use crate::particles::texture::SmokeTexture;

/// Smoke system statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SmokeStats {
    pub active_particles: usize,
    pub spawned_last_frame: usize,
    pub expired_last_frame: usize,
    pub total_spawned: u64,
    pub capacity_used: f32,
}

/// Single-emitter smoke simulation.
///
/// Each [`update`](Self::update) runs emission, ageing, integration and
/// fading in that order, then refreshes the render buffers and marks them
/// dirty. The system never allocates after construction.
pub struct SmokeSystem {
    config: SmokeConfig,
    pool: ParticlePool,
    emitter: Emitter,
    buffers: RenderBuffers,
    texture: SmokeTexture,
    rng: StdRng,

    /// World anchor of the emitter group
    group_position: Vec3,

    stats: SmokeStats,
    disposed: bool,
}

impl SmokeSystem {
    /// Create a system seeded from OS entropy
    pub fn new(config: SmokeConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a system with a fixed seed for reproducible runs
    pub fn with_seed(config: SmokeConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Resolve partial options and create a system
    pub fn from_options(options: &SmokeOptions) -> Self {
        Self::new(SmokeConfig::from_options(options))
    }

    /// Create a system drawing emission jitter from `rng`.
    ///
    /// The configuration is sanitized first, so hand-built values outside
    /// their valid range are clamped or replaced by defaults.
    pub fn with_rng(config: SmokeConfig, mut rng: StdRng) -> Self {
        let config = config.sanitized();
        let capacity = config.particle_count;

        let mut pool = ParticlePool::new(capacity, config.particle_size);
        for size in pool.base_size.iter_mut() {
            *size = config.particle_size * (MIN_SIZE_FACTOR + rng.gen::<f32>() * (1.0 - MIN_SIZE_FACTOR));
        }
        pool.size.copy_from_slice(&pool.base_size);

        let texture = SmokeTexture::generate(&mut rng);
        let mut buffers = RenderBuffers::new(capacity);
        buffers.sync(&pool);

        log::debug!(
            "[SmokeSystem::new] {} slots, {:.1} particles/s, lifetime {:.1}s",
            capacity,
            config.emission_rate,
            config.particle_lifetime
        );

        Self {
            config,
            pool,
            emitter: Emitter::new(),
            buffers,
            texture,
            rng,
            group_position: Vec3::ZERO,
            stats: SmokeStats::default(),
            disposed: false,
        }
    }

    /// Advance the simulation by `delta_time` seconds.
    ///
    /// A zero, negative or non-finite delta leaves every slot untouched.
    pub fn update(&mut self, delta_time: f32) {
        if self.disposed {
            log::warn!("[SmokeSystem::update] called after dispose; ignoring");
            return;
        }

        if !(delta_time.is_finite() && delta_time > 0.0) {
            self.stats.spawned_last_frame = 0;
            self.stats.expired_last_frame = 0;
            self.buffers.mark_dirty();
            return;
        }

        let spawned = self
            .emitter
            .emit(&mut self.pool, &self.config, &mut self.rng, delta_time);
        let expired = advance_ages(&mut self.pool, delta_time);
        integrate(&mut self.pool, &self.config, delta_time);
        update_appearance(&mut self.pool, &self.config, delta_time);

        self.buffers.sync(&self.pool);
        self.buffers.mark_dirty();

        self.update_stats(spawned, expired);
    }

    fn update_stats(&mut self, spawned: usize, expired: usize) {
        let active = self.pool.active_count();
        let capacity = self.pool.capacity();

        self.stats.active_particles = active;
        self.stats.spawned_last_frame = spawned;
        self.stats.expired_last_frame = expired;
        self.stats.total_spawned += spawned as u64;
        self.stats.capacity_used = if capacity > 0 {
            active as f32 / capacity as f32
        } else {
            0.0
        };

        log::trace!(
            "[SmokeSystem::update] active={} spawned={} expired={}",
            active,
            spawned,
            expired
        );
    }

    /// Read-only view of the current buffers for drawing
    pub fn render_handle(&self) -> RenderHandle<'_> {
        RenderHandle::new(&self.buffers, &self.pool, self.group_position)
    }

    /// Consume the dirty flag; `true` when buffers changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        self.buffers.take_dirty()
    }

    /// Move the emitter group. Emitted particles keep their local offsets.
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.group_position = Vec3::new(x, y, z);
    }

    pub fn position(&self) -> Vec3 {
        self.group_position
    }

    pub fn config(&self) -> &SmokeConfig {
        &self.config
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn texture(&self) -> &SmokeTexture {
        &self.texture
    }

    /// Swap in an externally authored sprite, returning the previous one.
    ///
    /// Renderers pick the new sprite up when they are next created from
    /// this system.
    pub fn set_texture(&mut self, texture: SmokeTexture) -> SmokeResult<SmokeTexture> {
        if self.disposed {
            return Err(SmokeError::Disposed {
                resource: "smoke system",
            });
        }
        let (width, height) = texture.dimensions().ok_or(SmokeError::Disposed {
            resource: "smoke texture",
        })?;

        log::debug!("[SmokeSystem::set_texture] {}x{} sprite", width, height);
        Ok(std::mem::replace(&mut self.texture, texture))
    }

    pub fn stats(&self) -> &SmokeStats {
        &self.stats
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release texture and buffer resources. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            log::warn!("[SmokeSystem::dispose] already disposed");
            return;
        }

        self.texture.dispose();
        self.buffers.release();
        self.disposed = true;

        log::debug!(
            "[SmokeSystem::dispose] released {} slots after {} particles",
            self.pool.capacity(),
            self.stats.total_spawned
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(count: usize, rate: f32, lifetime: f32) -> SmokeSystem {
        SmokeSystem::with_seed(
            SmokeConfig {
                particle_count: count,
                emission_rate: rate,
                particle_lifetime: lifetime,
                ..Default::default()
            },
            1234,
        )
    }

    #[test]
    fn test_base_sizes_within_range() {
        let system = system(64, 10.0, 1.0);
        let base = system.config().particle_size;
        for &size in &system.pool().base_size {
            assert!(size >= base * 0.5 && size <= base);
        }
    }

    #[test]
    fn test_two_half_second_frames() {
        let mut system = system(4, 2.0, 2.0);
        system.update(0.5);
        assert_eq!(system.stats().spawned_last_frame, 1);
        system.update(0.5);
        assert_eq!(system.stats().spawned_last_frame, 1);
        assert_eq!(system.stats().active_particles, 2);
        assert!((system.pool().age[0] - 1.0).abs() < 1e-6);
        assert!((system.pool().age[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_expiry_at_lifetime() {
        let mut system = system(4, 2.0, 1.0);
        system.update(0.5);
        system.update(0.5);
        // slot 0 reached age 1.0 and was freed in the same call
        assert!(!system.pool().is_active(0));
        assert_eq!(system.pool().opacity[0], 0.0);
        assert_eq!(system.stats().expired_last_frame, 1);
        assert_eq!(system.stats().active_particles, 1);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut system = system(16, 20.0, 3.0);
        for _ in 0..10 {
            system.update(0.05);
        }
        let pool = system.pool().clone();
        system.update(0.0);
        assert_eq!(system.pool().age, pool.age);
        assert_eq!(system.pool().position, pool.position);
        assert_eq!(system.pool().opacity, pool.opacity);
        assert_eq!(system.pool().size, pool.size);
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut system = system(4, 1.0, 1.0);
        assert!(system.take_dirty());
        assert!(!system.take_dirty());
        system.update(0.016);
        assert!(system.render_handle().is_dirty());
        assert!(system.take_dirty());
    }

    #[test]
    fn test_set_position_moves_group_only() {
        let mut system = system(4, 2.0, 5.0);
        system.update(0.5);
        let local = system.pool().position[0];
        system.set_position(10.0, 5.0, -3.0);
        assert_eq!(system.pool().position[0], local);
        assert_eq!(system.render_handle().group_position(), Vec3::new(10.0, 5.0, -3.0));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut system = system(4, 2.0, 1.0);
        system.dispose();
        assert!(system.is_disposed());
        assert!(system.texture().is_disposed());
        system.dispose();
        assert!(system.is_disposed());
        assert_eq!(system.render_handle().instance_count(), 0);
    }

    #[test]
    fn test_hand_built_config_is_sanitized() {
        let mut system = SmokeSystem::with_seed(
            SmokeConfig {
                particle_count: 4,
                particle_lifetime: -1.0,
                gravity: f32::NAN,
                ..Default::default()
            },
            1234,
        );
        assert_eq!(system.config().particle_lifetime, 0.0);
        assert_eq!(system.config().gravity, -0.12);

        system.update(0.2);
        // zero lifetime: emitted and freed in the same call
        assert_eq!(system.stats().spawned_last_frame, 3);
        assert_eq!(system.stats().expired_last_frame, 3);
        assert_eq!(system.stats().active_particles, 0);
    }

    #[test]
    fn test_nan_gravity_keeps_positions_finite() {
        let mut system = SmokeSystem::with_seed(
            SmokeConfig {
                particle_count: 8,
                gravity: f32::NAN,
                ..Default::default()
            },
            1234,
        );
        for _ in 0..60 {
            system.update(1.0 / 30.0);
        }
        assert!(system.stats().active_particles > 0);
        assert!(system.pool().position.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_set_texture_replaces_sprite() {
        let mut system = system(4, 2.0, 1.0);
        let sprite = image::RgbaImage::from_pixel(16, 8, image::Rgba([255, 255, 255, 128]));

        let previous = system
            .set_texture(SmokeTexture::from_image(sprite).unwrap())
            .unwrap();
        assert_eq!(previous.dimensions(), Some((128, 128)));
        assert_eq!(system.texture().dimensions(), Some((16, 8)));
        assert_eq!(system.texture().image().unwrap().get_pixel(3, 3)[3], 128);

        let mut released = SmokeTexture::from_image(image::RgbaImage::new(2, 2)).unwrap();
        released.dispose();
        assert!(matches!(
            system.set_texture(released),
            Err(SmokeError::Disposed { .. })
        ));
        assert_eq!(system.texture().dimensions(), Some((16, 8)));

        system.dispose();
        let late = SmokeTexture::from_image(image::RgbaImage::new(2, 2)).unwrap();
        assert!(system.set_texture(late).is_err());
    }

    #[test]
    fn test_zero_capacity_is_harmless() {
        let mut system = system(0, 100.0, 1.0);
        for _ in 0..10 {
            system.update(0.1);
        }
        assert_eq!(system.stats().active_particles, 0);
        assert_eq!(system.stats().capacity_used, 0.0);
    }
}
