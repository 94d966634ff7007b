// Smoke Engine Constants - SINGLE SOURCE OF TRUTH
//
// Tuning values shared by the CPU simulation, the render adapter and the
// WGSL shader. Keep the shader literals in sync with `render`.

/// Default values for every recognized configuration option
pub mod defaults {
    pub const PARTICLE_COUNT: usize = 200;
    pub const PARTICLE_SIZE: f32 = 25.0;
    pub const PARTICLE_COLOR: u32 = 0x888888;
    pub const PARTICLE_OPACITY: f32 = 1.0;
    pub const EMISSION_RATE: f32 = 18.0;
    pub const PARTICLE_LIFETIME: f32 = 6.0;
    /// Negative values push particles upward (buoyancy)
    pub const GRAVITY: f32 = -0.12;
    pub const WIND: [f32; 3] = [0.03, 0.0, 0.02];
    pub const START_VELOCITY: [f32; 3] = [0.0, 0.25, 0.0];
    pub const START_VELOCITY_RANDOMNESS: f32 = 0.12;
    pub const FADE_IN: f32 = 0.15;
    pub const FADE_OUT: f32 = 0.5;
}

/// Emission shape
pub mod emission {
    /// Lifetime sentinel marking a free slot
    pub const INACTIVE_LIFETIME: f32 = -1.0;
    /// Edge length of the jitter box around the emitter origin
    pub const INITIAL_SPREAD: f32 = 0.2;
    /// Cone half-angle (30 degrees)
    pub const CONE_HALF_ANGLE: f32 = std::f32::consts::PI / 6.0;
    /// Extra upward bias applied to the cone's vertical component
    pub const VERTICAL_BIAS: f32 = 3.0;
    /// Lower bound of the per-slot base size factor
    pub const MIN_SIZE_FACTOR: f32 = 0.5;
}

/// Integrator coefficients
pub mod physics {
    pub const TURBULENCE_X_FREQ: f32 = 1.5;
    pub const TURBULENCE_X_PHASE: f32 = 0.1;
    pub const TURBULENCE_Z_FREQ: f32 = 1.8;
    pub const TURBULENCE_Z_PHASE: f32 = 0.2;
    pub const TURBULENCE_Y_FREQ: f32 = 0.8;
    pub const HORIZONTAL_TURBULENCE: f32 = 0.02;
    pub const VERTICAL_TURBULENCE: f32 = 0.01;

    /// dispersion = 1 + DISPERSION_GROWTH * age_ratio
    pub const DISPERSION_GROWTH: f32 = 2.0;
    /// buoyancy = gravity * (1 + BUOYANCY_AGE_FACTOR * age_ratio)
    pub const BUOYANCY_AGE_FACTOR: f32 = 0.5;

    pub const HORIZONTAL_DRAG: f32 = 0.985;
    pub const HORIZONTAL_DRAG_AGE_FACTOR: f32 = 0.01;
    pub const VERTICAL_DRAG: f32 = 0.995;
}

/// Fade and growth curves
pub mod lifecycle {
    pub const BASE_ALPHA: f32 = 0.5;
    pub const AGE_ALPHA_LOSS: f32 = 0.3;
    pub const HEIGHT_FADE_SCALE: f32 = 0.1;
    pub const HEIGHT_ALPHA_LOSS: f32 = 0.1;
    pub const BASE_GROWTH: f32 = 0.4;
    pub const AGE_GROWTH: f32 = 0.6;
}

/// Point-sprite rendering
pub mod render {
    pub const TEXTURE_SIZE: u32 = 128;
    /// Per-channel noise amplitude as a fraction of full range
    pub const TEXTURE_NOISE: f32 = 0.2;
    /// Mirrored in `renderer/shaders/smoke.wgsl`
    pub const POINT_SCALE: f32 = 50.0;
    pub const MIN_POINT_SIZE: f32 = 2.0;
    pub const MAX_POINT_SIZE: f32 = 100.0;
    /// Mirrored in `renderer/shaders/smoke.wgsl`
    pub const ALPHA_DISCARD: f32 = 0.001;
}

/// Geodesy
pub mod geo {
    /// Equatorial circumference of the WGS84 ellipsoid in meters
    pub const EARTH_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * 6_378_137.0;
    /// Latitude bound of the Web-Mercator projection
    pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_129;
}
