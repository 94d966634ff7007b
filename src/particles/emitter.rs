use glam::Vec3;
use rand::Rng;

use crate::constants::emission::{CONE_HALF_ANGLE, INITIAL_SPREAD, VERTICAL_BIAS};
use crate::particles::config::SmokeConfig;
use crate::particles::particle_data::ParticlePool;

/// Continuous point emitter with a fractional spawn accumulator.
///
/// Emission converts elapsed time into whole particles and carries the
/// remainder forward, so the long-run count tracks `rate * elapsed`.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    /// Seconds of emission not yet converted into particles
    spawn_timer: f32,
    /// Round-robin overwrite cursor used once the pool is saturated
    next_index: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fractional emission time carried to the next frame
    pub fn pending_time(&self) -> f32 {
        self.spawn_timer
    }

    /// Slot the next saturated emission will overwrite
    pub fn next_overwrite_index(&self) -> usize {
        self.next_index
    }

    /// Whole particles owed for `dt` more seconds at `rate` per second.
    ///
    /// Consumes the emitted share of the accumulator and keeps the remainder.
    /// Counts too large for `usize` saturate.
    pub fn accumulate(&mut self, rate: f32, dt: f32) -> usize {
        if rate <= 0.0 {
            return 0;
        }

        self.spawn_timer += dt;
        let count = (self.spawn_timer * rate).floor();
        if count.is_nan() || count < 1.0 {
            return 0;
        }
        self.spawn_timer -= count / rate;
        // Guard against the subtraction overshooting below zero
        self.spawn_timer = self.spawn_timer.max(0.0);
        count as usize
    }

    /// Emit the particles owed for this frame; returns how many were owed.
    ///
    /// Free slots are filled first, then slots are overwritten round-robin.
    /// A burst larger than the pool would overwrite its own particles, so at
    /// most one full lap is initialized and the cursor skips the rest. Work
    /// per call is bounded by twice the pool capacity.
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        pool: &mut ParticlePool,
        config: &SmokeConfig,
        rng: &mut R,
        dt: f32,
    ) -> usize {
        let capacity = pool.capacity();
        if capacity == 0 {
            return 0;
        }

        let owed = self.accumulate(config.emission_rate, dt);
        let mut remaining = owed;

        while remaining > 0 {
            let Some(index) = pool.first_inactive() else { break };
            spawn(pool, index, config, rng);
            remaining -= 1;
        }

        if remaining > capacity {
            let skipped = remaining - capacity;
            self.next_index = (self.next_index + skipped % capacity) % capacity;
            log::trace!(
                "[Emitter::emit] burst of {} exceeds {} slots; skipped {} overwrites",
                owed,
                capacity,
                skipped
            );
            remaining = capacity;
        }

        for _ in 0..remaining {
            let index = self.next_index;
            self.next_index = (self.next_index + 1) % capacity;
            spawn(pool, index, config, rng);
        }

        owed
    }
}

fn spawn<R: Rng + ?Sized>(pool: &mut ParticlePool, index: usize, config: &SmokeConfig, rng: &mut R) {
    let position = generate_spawn_position(rng);
    let velocity = generate_velocity(config.start_velocity, config.start_velocity_randomness, rng);
    pool.activate(index, position, velocity, config.particle_lifetime);
}

/// Small jitter box around the origin, slightly above it
pub fn generate_spawn_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * INITIAL_SPREAD,
        rng.gen::<f32>() * INITIAL_SPREAD,
        (rng.gen::<f32>() - 0.5) * INITIAL_SPREAD,
    )
}

/// Upward cone around the start velocity
pub fn generate_velocity<R: Rng + ?Sized>(start: Vec3, randomness: f32, rng: &mut R) -> Vec3 {
    let azimuth = rng.gen::<f32>() * std::f32::consts::TAU;
    let cone_height = (rng.gen::<f32>() * CONE_HALF_ANGLE).cos();
    let cone_radius = (rng.gen::<f32>() * CONE_HALF_ANGLE).sin() * randomness;

    start
        + Vec3::new(
            azimuth.cos() * cone_radius,
            cone_height * randomness * VERTICAL_BIAS,
            azimuth.sin() * cone_radius,
        )
}
