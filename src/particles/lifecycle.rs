use crate::constants::lifecycle::*;
use crate::particles::config::SmokeConfig;
use crate::particles::particle_data::ParticlePool;

/// Piecewise fade over normalized age: ramp in, hold, ramp out
#[inline]
pub fn fade_factor(age_ratio: f32, fade_in: f32, fade_out: f32) -> f32 {
    if age_ratio < fade_in {
        age_ratio / fade_in
    } else if age_ratio > fade_out {
        1.0 - (age_ratio - fade_out) / (1.0 - fade_out)
    } else {
        1.0
    }
}

/// Smoke thins as it ages and rises. Not clamped; may go negative.
#[inline]
pub fn smoke_opacity(fade: f32, age_ratio: f32, height: f32) -> f32 {
    let height_fade = (height * HEIGHT_FADE_SCALE).min(1.0);
    fade * (BASE_ALPHA - AGE_ALPHA_LOSS * age_ratio - HEIGHT_ALPHA_LOSS * height_fade)
}

/// Multiplicative size growth for one frame; accelerates with age
#[inline]
pub fn growth_factor(age_ratio: f32, dt: f32) -> f32 {
    1.0 + dt * (BASE_GROWTH + AGE_GROWTH * age_ratio)
}

/// Age every active slot and free the ones past their lifetime.
///
/// Returns the number of slots deactivated this frame.
pub fn advance_ages(pool: &mut ParticlePool, dt: f32) -> usize {
    let mut expired = 0;
    for i in 0..pool.capacity() {
        if !pool.is_active(i) {
            continue;
        }

        pool.age[i] += dt;
        if pool.age[i] >= pool.lifetime[i] {
            pool.deactivate(i);
            expired += 1;
        }
    }
    expired
}

/// Recompute opacity and grow size for every active slot
pub fn update_appearance(pool: &mut ParticlePool, config: &SmokeConfig, dt: f32) {
    for i in 0..pool.capacity() {
        if !pool.is_active(i) {
            continue;
        }

        let age_ratio = pool.age_ratio(i);
        let fade = fade_factor(age_ratio, config.fade_in, config.fade_out);
        pool.opacity[i] = smoke_opacity(fade, age_ratio, pool.position[i].y);
        pool.size[i] *= growth_factor(age_ratio, dt);
    }
}
