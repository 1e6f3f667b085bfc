//! Image validation and preprocessing strategies.
//!
//! Two named strategies feed the extraction pipeline. "simple" only
//! converts to grayscale and upscales small scans; "advanced" adds
//! histogram equalization, unsharp masking, adaptive thresholding and
//! despeckling for poor-quality photographs of documents.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::GrayImage;
use tracing::debug;

use super::backend::OcrError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp", "webp", "jfif"];
const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;
const MIN_DIMENSION: u32 = 10;
const MAX_DIMENSION: u32 = 10_000;

/// A named preprocessing strategy, tried cheap-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessStrategy {
    Simple,
    Advanced,
}

impl PreprocessStrategy {
    /// Strategies in the fixed order the pipeline tries them.
    pub fn ordered() -> [PreprocessStrategy; 2] {
        [PreprocessStrategy::Simple, PreprocessStrategy::Advanced]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PreprocessStrategy::Simple => "simple",
            PreprocessStrategy::Advanced => "advanced",
        }
    }

    /// Validate and load the file, then apply this strategy.
    pub fn apply(&self, path: &Path) -> Result<GrayImage, OcrError> {
        let gray = load_validated(path)?;
        Ok(match self {
            PreprocessStrategy::Simple => simple(gray),
            PreprocessStrategy::Advanced => advanced(gray),
        })
    }
}

/// Validate the input file and decode it to grayscale.
///
/// Also used by the orchestrator's no-preprocessing fallback.
pub(super) fn load_validated(path: &Path) -> Result<GrayImage, OcrError> {
    if !path.is_file() {
        return Err(OcrError::InvalidImage(format!(
            "file does not exist: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(OcrError::InvalidImage(format!(
            "unsupported format: .{extension}"
        )));
    }

    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE_BYTES {
        return Err(OcrError::InvalidImage(format!(
            "file too large: {:.1}MB",
            size as f64 / (1024.0 * 1024.0)
        )));
    }

    let decoded = image::open(path).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
    let gray = decoded.to_luma8();
    let (width, height) = gray.dimensions();
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(OcrError::InvalidImage("image too small".to_string()));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(OcrError::InvalidImage("image too large".to_string()));
    }
    Ok(gray)
}

fn simple(gray: GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width.max(height) < 1000 {
        let scaled = imageops::resize(
            &gray,
            (width as f32 * 1.5) as u32,
            (height as f32 * 1.5) as u32,
            FilterType::Lanczos3,
        );
        debug!("simple: upscaled to {}x{}", scaled.width(), scaled.height());
        scaled
    } else {
        gray
    }
}

fn advanced(gray: GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let max_dimension = width.max(height);
    let scale = if max_dimension < 1000 {
        2.0
    } else if max_dimension < 3000 {
        1.5
    } else {
        1.0
    };

    let mut img = if scale != 1.0 {
        imageops::resize(
            &gray,
            (width as f32 * scale) as u32,
            (height as f32 * scale) as u32,
            FilterType::Lanczos3,
        )
    } else {
        gray
    };

    img = equalize_histogram(&img);
    img = unsharp_mask(&img, 5.0, 2.0);

    let block = if img.width().min(img.height()) < 500 {
        11
    } else {
        21
    };
    img = adaptive_threshold(&img, block, 2);
    img = morphological_close(&img);
    median_filter_3x3(&img)
}

/// Global histogram equalization to spread out scan contrast.
fn equalize_histogram(img: &GrayImage) -> GrayImage {
    let mut histogram = [0u64; 256];
    for pixel in img.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = (img.width() as u64) * (img.height() as u64);
    if total == 0 {
        return img.clone();
    }

    let mut lut = [0u8; 256];
    let mut cumulative = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        cumulative += count;
        lut[value] = ((cumulative * 255) / total) as u8;
    }

    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        image::Luma([lut[img.get_pixel(x, y).0[0] as usize]])
    })
}

/// Sharpen by subtracting a gaussian-blurred copy.
fn unsharp_mask(img: &GrayImage, sigma: f32, amount: f32) -> GrayImage {
    let blurred = imageops::blur(img, sigma);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let original = img.get_pixel(x, y).0[0] as f32;
        let soft = blurred.get_pixel(x, y).0[0] as f32;
        let value = (original * amount - soft * (amount - 1.0)).clamp(0.0, 255.0);
        image::Luma([value as u8])
    })
}

/// Binarize against a local mean computed over a `block`-sized window.
fn adaptive_threshold(img: &GrayImage, block: u32, c: i32) -> GrayImage {
    let block = if block % 2 == 0 { block + 1 } else { block };
    let (width, height) = img.dimensions();
    let half = (block / 2) as i64;

    // Summed-area table with a zero row/column of padding.
    let w = width as usize + 1;
    let h = height as usize + 1;
    let mut integral = vec![0u64; w * h];
    for y in 1..h {
        let mut row_sum = 0u64;
        for x in 1..w {
            row_sum += img.get_pixel((x - 1) as u32, (y - 1) as u32).0[0] as u64;
            integral[y * w + x] = integral[(y - 1) * w + x] + row_sum;
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let x0 = (x as i64 - half).max(0) as usize;
        let y0 = (y as i64 - half).max(0) as usize;
        let x1 = (x as i64 + half).min(width as i64 - 1) as usize + 1;
        let y1 = (y as i64 + half).min(height as i64 - 1) as usize + 1;

        let sum = integral[y1 * w + x1] + integral[y0 * w + x0]
            - integral[y0 * w + x1]
            - integral[y1 * w + x0];
        let area = ((x1 - x0) * (y1 - y0)) as u64;
        let mean = (sum / area) as i32;

        let value = img.get_pixel(x, y).0[0] as i32;
        image::Luma([if value > mean - c { 255 } else { 0 }])
    })
}

/// 2x2 close (dilate then erode) to reconnect broken glyph strokes.
fn morphological_close(img: &GrayImage) -> GrayImage {
    let dilated = window_2x2(img, |a, b, c, d| a.max(b).max(c).max(d));
    window_2x2(&dilated, |a, b, c, d| a.min(b).min(c).min(d))
}

fn window_2x2(img: &GrayImage, op: fn(u8, u8, u8, u8) -> u8) -> GrayImage {
    let (width, height) = img.dimensions();
    let at = |x: u32, y: u32| {
        img.get_pixel(x.min(width - 1), y.min(height - 1)).0[0]
    };
    GrayImage::from_fn(width, height, |x, y| {
        image::Luma([op(at(x, y), at(x + 1, y), at(x, y + 1), at(x + 1, y + 1))])
    })
}

/// 3x3 median filter for salt-and-pepper noise left by thresholding.
fn median_filter_3x3(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let mut window = [0u8; 9];
        let mut i = 0;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let nx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                let ny = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
                window[i] = img.get_pixel(nx, ny).0[0];
                i += 1;
            }
        }
        window.sort_unstable();
        image::Luma([window[4]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            image::Luma([if (x + y) % 2 == 0 { 200 } else { 60 }])
        })
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.gif");
        std::fs::write(&path, b"GIF89a").unwrap();
        let err = load_validated(&path).unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn rejects_missing_file() {
        let err = load_validated(Path::new("/nonexistent/contract.png")).unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn rejects_tiny_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        GrayImage::from_pixel(4, 4, image::Luma([255])).save(&path).unwrap();
        let err = load_validated(&path).unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn simple_upscales_small_images() {
        let img = checkerboard(100);
        let out = simple(img);
        assert_eq!(out.dimensions(), (150, 150));
    }

    #[test]
    fn adaptive_threshold_is_binary() {
        let img = checkerboard(64);
        let out = adaptive_threshold(&img, 21, 2);
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn equalize_preserves_dimensions() {
        let img = checkerboard(32);
        let out = equalize_histogram(&img);
        assert_eq!(out.dimensions(), img.dimensions());
    }
}
