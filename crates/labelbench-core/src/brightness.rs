//! Brightness jitter in the HSV value channel.
//!
//! In the HSV model the value channel is `V = max(R, G, B)`, and hue and
//! saturation depend only on the ratios between channels. Multiplying V by a
//! factor with H and S held fixed is therefore the same as multiplying every
//! RGB channel by `V' / V`, where `V' = min(V * factor, 255)`. Working
//! directly on RGB avoids a round trip through a float HSV buffer.

use std::ops::RangeInclusive;

use rand::Rng;

/// Range the random brightness factor is drawn from.
pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = 0.5..=1.5;

/// Draw a brightness factor uniformly from [`BRIGHTNESS_RANGE`].
pub fn random_brightness_factor<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(BRIGHTNESS_RANGE)
}

/// Scale the HSV value channel of RGB pixel data in place.
///
/// # Arguments
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `factor` - Multiplier for V; negative factors are treated as zero
///
/// The scaled value is clamped at 255, so a bright pixel saturates at full
/// value while keeping its hue and saturation.
pub fn scale_value(pixels: &mut [u8], factor: f32) {
    let factor = factor.max(0.0);
    if (factor - 1.0).abs() < f32::EPSILON {
        return;
    }

    for chunk in pixels.chunks_exact_mut(3) {
        let value = chunk[0].max(chunk[1]).max(chunk[2]);
        if value == 0 {
            continue;
        }

        let scaled = (value as f32 * factor).min(255.0);
        let ratio = scaled / value as f32;

        for channel in chunk.iter_mut() {
            *channel = (*channel as f32 * ratio).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_identity_factor() {
        let mut pixels = vec![10, 128, 250];
        scale_value(&mut pixels, 1.0);
        assert_eq!(pixels, vec![10, 128, 250]);
    }

    #[test]
    fn test_darken_halves_gray() {
        let mut pixels = vec![100, 100, 100];
        scale_value(&mut pixels, 0.5);
        assert_eq!(pixels, vec![50, 50, 50]);
    }

    #[test]
    fn test_brighten_clamps_value() {
        // V = 200, 200 * 1.5 = 300 clamps to 255
        let mut pixels = vec![200, 40, 0];
        scale_value(&mut pixels, 1.5);
        assert_eq!(pixels[0], 255);
        // Ratio between channels (hue/saturation) is preserved
        assert_eq!(pixels[1], 51);
        assert_eq!(pixels[2], 0);
    }

    #[test]
    fn test_black_stays_black() {
        let mut pixels = vec![0, 0, 0];
        scale_value(&mut pixels, 1.5);
        assert_eq!(pixels, vec![0, 0, 0]);
    }

    #[test]
    fn test_negative_factor_is_zero() {
        let mut pixels = vec![80, 90, 100];
        scale_value(&mut pixels, -2.0);
        assert_eq!(pixels, vec![0, 0, 0]);
    }

    #[test]
    fn test_random_factor_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let factor = random_brightness_factor(&mut rng);
            assert!(BRIGHTNESS_RANGE.contains(&factor), "factor {}", factor);
        }
    }

    #[test]
    fn test_random_factor_is_seeded() {
        let a = random_brightness_factor(&mut StdRng::seed_from_u64(42));
        let b = random_brightness_factor(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
