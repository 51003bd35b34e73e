//! Image conditioning applied before OCR.
//!
//! Gentle adjustments only: grayscale, auto-contrast, a mild sharpen and a
//! soft two-sided threshold. Aggressive binarization eats thin glyph
//! strokes, so mid-range pixels are left untouched.

use image::{DynamicImage, GrayImage, Luma, imageops};

const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Luminance above this becomes pure white.
const WHITE_CUTOFF: u8 = 200;
/// Luminance below this becomes pure black.
const BLACK_CUTOFF: u8 = 80;

/// Condition an image for the OCR engine. Infallible: every decodable
/// image produces a conditioned grayscale image of the same dimensions.
pub fn prepare_for_ocr(img: &DynamicImage) -> GrayImage {
    let gray = img.to_luma8();
    let stretched = stretch_contrast(gray);
    let sharpened = imageops::filter3x3(&stretched, &SHARPEN_KERNEL);
    threshold_gently(sharpened)
}

/// Remap the observed luminance range onto the full 0..=255 range.
/// A flat image (no range) is returned unchanged.
fn stretch_contrast(img: GrayImage) -> GrayImage {
    let mut min_val = 255u8;
    let mut max_val = 0u8;
    for pixel in img.pixels() {
        let v = pixel.0[0];
        min_val = min_val.min(v);
        max_val = max_val.max(v);
    }

    if max_val == min_val {
        return img;
    }
    let range = (max_val - min_val) as f32;

    let mut stretched = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let v = ((pixel.0[0] - min_val) as f32 / range * 255.0) as u8;
        stretched.put_pixel(x, y, Luma([v]));
    }
    stretched
}

fn threshold_gently(mut img: GrayImage) -> GrayImage {
    for pixel in img.pixels_mut() {
        let v = pixel.0[0];
        pixel.0[0] = if v > WHITE_CUTOFF {
            255
        } else if v < BLACK_CUTOFF {
            0
        } else {
            v
        };
    }
    img
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_gray(size: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(size, size, Luma([value]))
    }

    #[test]
    fn test_flat_image_passes_through_unchanged() {
        let img = DynamicImage::ImageLuma8(uniform_gray(4, 128));
        let out = prepare_for_ocr(&img);
        assert!(out.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_output_dimensions_match_input() {
        let img = DynamicImage::ImageLuma8(uniform_gray(7, 90));
        let out = prepare_for_ocr(&img);
        assert_eq!((out.width(), out.height()), (7, 7));
    }

    #[test]
    fn test_contrast_stretch_spans_full_range() {
        let mut img = uniform_gray(2, 100);
        img.put_pixel(1, 1, Luma([150]));
        let out = stretch_contrast(img);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 1).0[0], 255);
    }

    #[test]
    fn test_threshold_clamps_extremes_and_keeps_midrange() {
        let mut img = uniform_gray(3, 128);
        img.put_pixel(0, 0, Luma([210]));
        img.put_pixel(2, 2, Luma([50]));
        let out = threshold_gently(img);
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
        assert_eq!(out.get_pixel(2, 2).0[0], 0);
        assert_eq!(out.get_pixel(1, 1).0[0], 128);
    }

    #[test]
    fn test_color_input_is_converted_to_grayscale() {
        let rgb = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 60, 60]));
        let out = prepare_for_ocr(&DynamicImage::ImageRgb8(rgb));
        // One channel per pixel is all that remains.
        assert_eq!(out.as_raw().len(), 16);
    }
}
