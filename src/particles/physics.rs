//! Per-frame smoke integrator.
//!
//! Buoyancy, wind, turbulence and anisotropic drag are applied to every
//! active slot, followed by an explicit Euler position step. Turbulence is a
//! pure function of particle age and slot index, so a given particle follows
//! the same path regardless of wall-clock time.

use glam::Vec3;

use crate::constants::physics::*;
use crate::particles::config::SmokeConfig;
use crate::particles::particle_data::ParticlePool;

/// Deterministic turbulence acceleration for a particle of `age` seconds in slot `index`
#[inline]
pub fn turbulence(age: f32, index: usize) -> Vec3 {
    let i = index as f32;
    Vec3::new(
        (age * TURBULENCE_X_FREQ + i * TURBULENCE_X_PHASE).sin() * HORIZONTAL_TURBULENCE,
        (age * TURBULENCE_Y_FREQ).sin() * VERTICAL_TURBULENCE,
        (age * TURBULENCE_Z_FREQ + i * TURBULENCE_Z_PHASE).cos() * HORIZONTAL_TURBULENCE,
    )
}

/// Buoyancy term; weakens relative to `gravity` as the particle cools
#[inline]
pub fn buoyancy(gravity: f32, age_ratio: f32) -> f32 {
    gravity * (1.0 + BUOYANCY_AGE_FACTOR * age_ratio)
}

/// Horizontal spread multiplier for wind
#[inline]
pub fn dispersion(age_ratio: f32) -> f32 {
    1.0 + DISPERSION_GROWTH * age_ratio
}

/// Per-axis velocity damping factors
#[inline]
pub fn drag(age_ratio: f32) -> Vec3 {
    let horizontal = HORIZONTAL_DRAG - HORIZONTAL_DRAG_AGE_FACTOR * age_ratio;
    Vec3::new(horizontal, VERTICAL_DRAG, horizontal)
}

/// Advance one slot's velocity by `dt`
#[inline]
pub fn step_velocity(
    velocity: Vec3,
    config: &SmokeConfig,
    age: f32,
    age_ratio: f32,
    index: usize,
    dt: f32,
) -> Vec3 {
    let turbulence = turbulence(age, index);
    let dispersion = dispersion(age_ratio);

    let acceleration = Vec3::new(
        config.wind.x * dispersion + turbulence.x,
        buoyancy(config.gravity, age_ratio) + turbulence.y,
        config.wind.z * dispersion + turbulence.z,
    );

    (velocity + acceleration * dt) * drag(age_ratio)
}

/// Integrate every active slot
pub fn integrate(pool: &mut ParticlePool, config: &SmokeConfig, dt: f32) {
    for i in 0..pool.capacity() {
        if !pool.is_active(i) {
            continue;
        }

        let age_ratio = pool.age_ratio(i);
        let velocity = step_velocity(pool.velocity[i], config, pool.age[i], age_ratio, i, dt);

        pool.velocity[i] = velocity;
        pool.position[i] += velocity * dt;
    }
}
