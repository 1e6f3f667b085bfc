//! Bitmap variant generation.
//!
//! Derives secondary variants from a preprocessed bitmap to improve
//! recall on inverted scans and washed-out photographs. Every variant
//! is an independent copy; the strategies never share pixel buffers.

use image::GrayImage;

/// Generate the recognition variants for one preprocessed bitmap, in the
/// fixed order the pipeline evaluates them.
pub fn bitmap_variants(base: &GrayImage) -> Vec<(&'static str, GrayImage)> {
    let mut inverted = base.clone();
    image::imageops::invert(&mut inverted);

    let high_contrast = GrayImage::from_fn(base.width(), base.height(), |x, y| {
        image::Luma([base.get_pixel(x, y).0[0].saturating_mul(2)])
    });

    vec![
        ("original", base.clone()),
        ("inverted", inverted),
        ("high_contrast", high_contrast),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_three_named_variants_in_order() {
        let base = GrayImage::from_pixel(8, 8, image::Luma([100]));
        let variants = bitmap_variants(&base);
        let names: Vec<&str> = variants.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["original", "inverted", "high_contrast"]);
    }

    #[test]
    fn inverted_flips_intensity() {
        let base = GrayImage::from_pixel(2, 2, image::Luma([100]));
        let variants = bitmap_variants(&base);
        assert_eq!(variants[1].1.get_pixel(0, 0).0[0], 155);
    }

    #[test]
    fn high_contrast_saturates() {
        let base = GrayImage::from_pixel(2, 2, image::Luma([200]));
        let variants = bitmap_variants(&base);
        assert_eq!(variants[2].1.get_pixel(0, 0).0[0], 255);
    }
}
