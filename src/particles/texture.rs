use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::constants::render::{TEXTURE_NOISE, TEXTURE_SIZE};
use crate::error::{SmokeError, SmokeResult};

/// Radial gradient stops: (offset, [r, g, b, alpha])
const GRADIENT_STOPS: [(f32, [f32; 4]); 4] = [
    (0.0, [200.0, 200.0, 200.0, 0.8]),
    (0.3, [150.0, 150.0, 150.0, 0.6]),
    (0.7, [100.0, 100.0, 100.0, 0.3]),
    (1.0, [50.0, 50.0, 50.0, 0.0]),
];

/// Soft point-sprite texture owned by a smoke system
#[derive(Debug)]
pub struct SmokeTexture {
    image: Option<RgbaImage>,
}

impl SmokeTexture {
    /// Generate the default 128x128 sprite
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_size(TEXTURE_SIZE, rng)
    }

    /// Generate a square sprite of `size` pixels
    pub(crate) fn with_size<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Self {
        let size = size.max(1);
        let center = size as f32 / 2.0;

        let image = RgbaImage::from_fn(size, size, |x, y| {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let t = ((dx * dx + dy * dy).sqrt() / center).min(1.0);
            let [r, g, b, a] = sample_gradient(t);

            let noise = (rng.gen::<f32>() - 0.5) * TEXTURE_NOISE * 255.0;
            Rgba([
                channel(r + noise),
                channel(g + noise),
                channel(b + noise),
                channel(a * 255.0),
            ])
        });

        Self { image: Some(image) }
    }

    /// Wrap an externally authored sprite
    pub fn from_image(image: RgbaImage) -> SmokeResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SmokeError::InvalidTexture {
                reason: "texture has zero extent".to_string(),
            });
        }
        Ok(Self { image: Some(image) })
    }

    pub fn image(&self) -> SmokeResult<&RgbaImage> {
        self.image.as_ref().ok_or(SmokeError::Disposed {
            resource: "smoke texture",
        })
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|image| image.dimensions())
    }

    pub fn is_disposed(&self) -> bool {
        self.image.is_none()
    }

    /// Release pixel storage. Returns `false` if already released.
    pub fn dispose(&mut self) -> bool {
        self.image.take().is_some()
    }
}

/// Linear interpolation between the gradient stops at `t` in `[0, 1]`
pub fn sample_gradient(t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    for pair in GRADIENT_STOPS.windows(2) {
        let (start, from) = pair[0];
        let (end, to) = pair[1];
        if t <= end {
            let local = (t - start) / (end - start);
            let mut out = [0.0; 4];
            for c in 0..4 {
                out[c] = from[c] + (to[c] - from[c]) * local;
            }
            return out;
        }
    }
    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1
}

#[inline]
fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
