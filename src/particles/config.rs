use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::SmokeResult;

/// How the sprites are composited over the scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard alpha blending
    #[default]
    Normal,
    /// Source-alpha additive blending
    Additive,
}

/// Partial smoke configuration as supplied by a host or a preset file.
///
/// Every field is optional; missing fields take the documented default when
/// resolved through [`SmokeConfig::from_options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeOptions {
    pub particle_count: Option<i64>,
    pub particle_size: Option<f32>,
    pub particle_color: Option<u32>,
    pub particle_opacity: Option<f32>,
    pub emission_rate: Option<f32>,
    pub particle_lifetime: Option<f32>,
    pub gravity: Option<f32>,
    pub wind: Option<Vec3>,
    pub start_velocity: Option<Vec3>,
    pub start_velocity_randomness: Option<f32>,
    pub fade_in: Option<f32>,
    pub fade_out: Option<f32>,
    pub blending: Option<BlendMode>,
}

impl SmokeOptions {
    /// Parse options from a TOML table
    pub fn from_toml_str(source: &str) -> SmokeResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse options from a JSON object
    pub fn from_json_str(source: &str) -> SmokeResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Layer `overrides` on top of `self`; fields set in `overrides` win
    pub fn merged(&self, overrides: &SmokeOptions) -> SmokeOptions {
        SmokeOptions {
            particle_count: overrides.particle_count.or(self.particle_count),
            particle_size: overrides.particle_size.or(self.particle_size),
            particle_color: overrides.particle_color.or(self.particle_color),
            particle_opacity: overrides.particle_opacity.or(self.particle_opacity),
            emission_rate: overrides.emission_rate.or(self.emission_rate),
            particle_lifetime: overrides.particle_lifetime.or(self.particle_lifetime),
            gravity: overrides.gravity.or(self.gravity),
            wind: overrides.wind.or(self.wind),
            start_velocity: overrides.start_velocity.or(self.start_velocity),
            start_velocity_randomness: overrides
                .start_velocity_randomness
                .or(self.start_velocity_randomness),
            fade_in: overrides.fade_in.or(self.fade_in),
            fade_out: overrides.fade_out.or(self.fade_out),
            blending: overrides.blending.or(self.blending),
        }
    }
}

/// Resolved, immutable smoke configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeConfig {
    pub particle_count: usize,
    pub particle_size: f32,
    pub particle_color: u32,
    pub particle_opacity: f32,
    pub emission_rate: f32,
    pub particle_lifetime: f32,
    pub gravity: f32,
    pub wind: Vec3,
    pub start_velocity: Vec3,
    pub start_velocity_randomness: f32,
    pub fade_in: f32,
    pub fade_out: f32,
    pub blending: BlendMode,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            particle_count: defaults::PARTICLE_COUNT,
            particle_size: defaults::PARTICLE_SIZE,
            particle_color: defaults::PARTICLE_COLOR,
            particle_opacity: defaults::PARTICLE_OPACITY,
            emission_rate: defaults::EMISSION_RATE,
            particle_lifetime: defaults::PARTICLE_LIFETIME,
            gravity: defaults::GRAVITY,
            wind: Vec3::from_array(defaults::WIND),
            start_velocity: Vec3::from_array(defaults::START_VELOCITY),
            start_velocity_randomness: defaults::START_VELOCITY_RANDOMNESS,
            fade_in: defaults::FADE_IN,
            fade_out: defaults::FADE_OUT,
            blending: BlendMode::Normal,
        }
    }
}

impl SmokeConfig {
    /// Resolve options against the defaults, then [`sanitized`](Self::sanitized).
    pub fn from_options(options: &SmokeOptions) -> Self {
        let base = Self::default();

        let particle_count = match options.particle_count {
            Some(count) if count < 0 => {
                log::warn!("[SmokeConfig::from_options] particle_count {} clamped to 0", count);
                0
            }
            Some(count) => count as usize,
            None => base.particle_count,
        };

        Self {
            particle_count,
            particle_size: options.particle_size.unwrap_or(base.particle_size),
            particle_color: options.particle_color.unwrap_or(base.particle_color),
            particle_opacity: options.particle_opacity.unwrap_or(base.particle_opacity),
            emission_rate: options.emission_rate.unwrap_or(base.emission_rate),
            particle_lifetime: options.particle_lifetime.unwrap_or(base.particle_lifetime),
            gravity: options.gravity.unwrap_or(base.gravity),
            wind: options.wind.unwrap_or(base.wind),
            start_velocity: options.start_velocity.unwrap_or(base.start_velocity),
            start_velocity_randomness: options
                .start_velocity_randomness
                .unwrap_or(base.start_velocity_randomness),
            fade_in: options.fade_in.unwrap_or(base.fade_in),
            fade_out: options.fade_out.unwrap_or(base.fade_out),
            blending: options.blending.unwrap_or(base.blending),
        }
        .sanitized()
    }

    /// Bring every field into its valid range.
    ///
    /// Negative rates, sizes and lifetimes clamp to zero; fractions clamp to
    /// `[0, 1]`; non-finite values fall back to the default. Every system
    /// constructor runs its configuration through here.
    pub fn sanitized(self) -> Self {
        let base = Self::default();

        Self {
            particle_count: self.particle_count,
            particle_size: non_negative("particle_size", self.particle_size, base.particle_size),
            particle_color: self.particle_color & 0x00ff_ffff,
            particle_opacity: unit("particle_opacity", self.particle_opacity, base.particle_opacity),
            emission_rate: non_negative("emission_rate", self.emission_rate, base.emission_rate),
            particle_lifetime: non_negative(
                "particle_lifetime",
                self.particle_lifetime,
                base.particle_lifetime,
            ),
            gravity: finite("gravity", self.gravity, base.gravity),
            wind: finite_vec("wind", self.wind, base.wind),
            start_velocity: finite_vec("start_velocity", self.start_velocity, base.start_velocity),
            start_velocity_randomness: non_negative(
                "start_velocity_randomness",
                self.start_velocity_randomness,
                base.start_velocity_randomness,
            ),
            fade_in: unit("fade_in", self.fade_in, base.fade_in),
            fade_out: unit("fade_out", self.fade_out, base.fade_out),
            blending: self.blending,
        }
    }

    /// Packed `0xRRGGBB` colour as normalized RGB
    pub fn color_rgb(&self) -> [f32; 3] {
        let c = self.particle_color;
        [
            ((c >> 16) & 0xff) as f32 / 255.0,
            ((c >> 8) & 0xff) as f32 / 255.0,
            (c & 0xff) as f32 / 255.0,
        ]
    }
}

impl From<SmokeOptions> for SmokeConfig {
    fn from(options: SmokeOptions) -> Self {
        Self::from_options(&options)
    }
}

fn finite(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("[SmokeConfig::sanitized] {} {} replaced by default {}", name, value, default);
        default
    }
}

fn finite_vec(name: &str, value: Vec3, default: Vec3) -> Vec3 {
    if value.is_finite() {
        value
    } else {
        log::warn!("[SmokeConfig::sanitized] {} {} replaced by default {}", name, value, default);
        default
    }
}

fn non_negative(name: &str, value: f32, default: f32) -> f32 {
    let value = finite(name, value, default);
    if value < 0.0 {
        log::warn!("[SmokeConfig::sanitized] {} {} clamped to 0", name, value);
        0.0
    } else {
        value
    }
}

fn unit(name: &str, value: f32, default: f32) -> f32 {
    let value = finite(name, value, default);
    if !(0.0..=1.0).contains(&value) {
        log::warn!("[SmokeConfig::sanitized] {} {} clamped to [0, 1]", name, value);
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_use_defaults() {
        let config = SmokeConfig::from_options(&SmokeOptions::default());
        assert_eq!(config, SmokeConfig::default());
        assert_eq!(config.particle_count, 200);
        assert_eq!(config.emission_rate, 18.0);
        assert_eq!(config.wind, Vec3::new(0.03, 0.0, 0.02));
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let options = SmokeOptions {
            particle_count: Some(-5),
            emission_rate: Some(-3.0),
            particle_lifetime: Some(-1.0),
            particle_size: Some(-2.0),
            ..Default::default()
        };
        let config = SmokeConfig::from_options(&options);
        assert_eq!(config.particle_count, 0);
        assert_eq!(config.emission_rate, 0.0);
        assert_eq!(config.particle_lifetime, 0.0);
        assert_eq!(config.particle_size, 0.0);
    }

    #[test]
    fn test_fractions_clamp_to_unit_range() {
        let options = SmokeOptions {
            fade_in: Some(-0.2),
            fade_out: Some(1.7),
            particle_opacity: Some(3.0),
            ..Default::default()
        };
        let config = SmokeConfig::from_options(&options);
        assert_eq!(config.fade_in, 0.0);
        assert_eq!(config.fade_out, 1.0);
        assert_eq!(config.particle_opacity, 1.0);
    }

    #[test]
    fn test_non_finite_falls_back_to_default() {
        let options = SmokeOptions {
            gravity: Some(f32::NAN),
            wind: Some(Vec3::new(f32::INFINITY, 0.0, 0.0)),
            ..Default::default()
        };
        let config = SmokeConfig::from_options(&options);
        assert_eq!(config.gravity, -0.12);
        assert_eq!(config.wind, Vec3::new(0.03, 0.0, 0.02));
    }

    #[test]
    fn test_sanitized_repairs_hand_built_config() {
        let config = SmokeConfig {
            particle_lifetime: -1.0,
            emission_rate: f32::INFINITY,
            gravity: f32::NAN,
            start_velocity: Vec3::new(0.0, f32::NAN, 0.0),
            fade_out: 2.0,
            particle_color: 0xff12_3456,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.particle_lifetime, 0.0);
        assert_eq!(config.emission_rate, 18.0);
        assert_eq!(config.gravity, -0.12);
        assert_eq!(config.start_velocity, Vec3::new(0.0, 0.25, 0.0));
        assert_eq!(config.fade_out, 1.0);
        assert_eq!(config.particle_color, 0x12_3456);
    }

    #[test]
    fn test_sanitized_keeps_valid_config() {
        let config = SmokeConfig {
            particle_count: 7,
            gravity: 0.3,
            blending: BlendMode::Additive,
            ..Default::default()
        };
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_parse_toml_options() {
        let options = SmokeOptions::from_toml_str(
            r#"
            particle_count = 120
            particle_color = 0x666666
            wind = [0.04, 0.0, 0.02]
            blending = "additive"
            "#,
        )
        .unwrap();
        assert_eq!(options.particle_count, Some(120));
        assert_eq!(options.particle_color, Some(0x666666));
        assert_eq!(options.wind, Some(Vec3::new(0.04, 0.0, 0.02)));
        assert_eq!(options.blending, Some(BlendMode::Additive));
        assert!(options.gravity.is_none());
    }

    #[test]
    fn test_parse_json_options() {
        let options =
            SmokeOptions::from_json_str(r#"{ "emission_rate": 25.0, "fade_out": 0.7 }"#).unwrap();
        let config = SmokeConfig::from(options);
        assert_eq!(config.emission_rate, 25.0);
        assert_eq!(config.fade_out, 0.7);
        assert_eq!(config.fade_in, 0.15);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = SmokeOptions {
            particle_count: Some(250),
            emission_rate: Some(25.0),
            ..Default::default()
        };
        let overrides = SmokeOptions {
            emission_rate: Some(10.0),
            ..Default::default()
        };
        let merged = base.merged(&overrides);
        assert_eq!(merged.particle_count, Some(250));
        assert_eq!(merged.emission_rate, Some(10.0));
    }

    #[test]
    fn test_color_rgb() {
        let config = SmokeConfig {
            particle_color: 0xff8000,
            ..Default::default()
        };
        let [r, g, b] = config.color_rgb();
        assert_eq!(r, 1.0);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
    }
}
