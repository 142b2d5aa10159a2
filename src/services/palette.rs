use std::cmp::Ordering;
use std::collections::HashMap;

use image::imageops::FilterType;
use serde::Serialize;

/// Width the source image is downsampled to before pixel sampling.
const SAMPLE_WIDTH: u32 = 100;

/// Channel mask that merges pixels into 32-level buckets before counting.
const BUCKET_MASK: u8 = !0x07;

/// Minimum squared RGB distance between two palette entries; closer
/// candidates are treated as the same color.
const MIN_DISTANCE_SQ: u32 = 1600;

/// Overlay text is white only when it clears the WCAG AA contrast ratio
/// against the swatch.
const OVERLAY_CONTRAST_THRESHOLD: f64 = 4.5;

pub const DEFAULT_NUM_COLORS: usize = 5;

/// One palette entry: the swatch color and the overlay text color that
/// stays readable on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub hex: String,
    pub text: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("Unsupported or corrupt image data")]
    Decode(#[from] image::ImageError),
}

/// Extract up to `num_colors` dominant colors from an encoded image.
///
/// Downsamples the image, buckets near-identical pixels, ranks buckets by
/// frequency, drops candidates too close to an already-picked color, and
/// returns the result sorted brightest-first. Deterministic for a given
/// input; makes no outbound calls.
pub fn extract_palette(bytes: &[u8], num_colors: usize) -> Result<Vec<PaletteColor>, PaletteError> {
    let sample = image::load_from_memory(bytes)?
        .resize(SAMPLE_WIDTH, SAMPLE_WIDTH, FilterType::Nearest)
        .to_rgb8();

    // Count bucketed pixels, remembering one representative per bucket.
    let mut buckets: HashMap<[u8; 3], (u32, [u8; 3])> = HashMap::new();
    for pixel in sample.pixels() {
        let rgb = [pixel[0], pixel[1], pixel[2]];
        let key = rgb.map(|channel| channel & BUCKET_MASK);
        let entry = buckets.entry(key).or_insert((0, rgb));
        entry.0 += 1;
    }

    let mut ranked: Vec<([u8; 3], (u32, [u8; 3]))> = buckets.into_iter().collect();
    // Frequency-descending, bucket key as a deterministic tiebreaker.
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then_with(|| a.0.cmp(&b.0)));

    let mut picked: Vec<[u8; 3]> = Vec::new();
    for (_, (_, rgb)) in ranked {
        if picked
            .iter()
            .all(|existing| distance_sq(existing, &rgb) >= MIN_DISTANCE_SQ)
        {
            picked.push(rgb);
        }
        if picked.len() == num_colors {
            break;
        }
    }

    picked.sort_by(|a, b| {
        relative_luminance(b)
            .partial_cmp(&relative_luminance(a))
            .unwrap_or(Ordering::Equal)
    });

    Ok(picked
        .into_iter()
        .map(|rgb| PaletteColor {
            hex: format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]),
            text: overlay_text(&rgb),
        })
        .collect())
}

/// Text color that stays readable over the given swatch: white when the
/// white-on-swatch contrast clears the threshold, black otherwise.
pub fn overlay_text(rgb: &[u8; 3]) -> &'static str {
    let white = relative_luminance(&[255, 255, 255]);
    if contrast_ratio(white, relative_luminance(rgb)) > OVERLAY_CONTRAST_THRESHOLD {
        "white"
    } else {
        "black"
    }
}

fn distance_sq(a: &[u8; 3], b: &[u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

/// WCAG relative luminance with sRGB linearization.
fn relative_luminance(rgb: &[u8; 3]) -> f64 {
    fn linear(channel: u8) -> f64 {
        let c = f64::from(channel) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linear(rgb[0]) + 0.7152 * linear(rgb[1]) + 0.0722 * linear(rgb[2])
}

fn contrast_ratio(luminance_a: f64, luminance_b: f64) -> f64 {
    let (lighter, darker) = if luminance_a >= luminance_b {
        (luminance_a, luminance_b)
    } else {
        (luminance_b, luminance_a)
    };
    (lighter + 0.05) / (darker + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encode_png(img: RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode test image");
        out.into_inner()
    }

    #[test]
    fn solid_image_yields_its_single_color() {
        let img = RgbImage::from_pixel(8, 8, image::Rgb([255, 0, 0]));
        let palette = extract_palette(&encode_png(img), 5).unwrap();

        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].hex, "#ff0000");
    }

    #[test]
    fn two_tone_image_sorted_brightest_first() {
        let mut img = RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 128]));
        for x in 0..8 {
            for y in 0..4 {
                img.put_pixel(x, y, image::Rgb([255, 255, 0]));
            }
        }
        let palette = extract_palette(&encode_png(img), 5).unwrap();

        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].hex, "#ffff00");
        assert_eq!(palette[1].hex, "#000080");
    }

    #[test]
    fn palette_is_capped_and_deterministic() {
        let mut img = RgbImage::new(12, 12);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([(x * 21) as u8, (y * 21) as u8, 200]);
        }
        let bytes = encode_png(img);

        let first = extract_palette(&bytes, 3).unwrap();
        let second = extract_palette(&bytes, 3).unwrap();

        assert!(first.len() <= 3);
        assert_eq!(first, second);
    }

    #[test]
    fn overlay_text_follows_contrast() {
        assert_eq!(overlay_text(&[0, 0, 128]), "white");
        assert_eq!(overlay_text(&[255, 0, 0]), "black");
        assert_eq!(overlay_text(&[255, 255, 255]), "black");
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            extract_palette(b"not an image", 5),
            Err(PaletteError::Decode(_))
        ));
    }
}
