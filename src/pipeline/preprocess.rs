//! Image preprocessing ahead of OCR.
//!
//! Scans and rendered pages carry anti-aliasing, paper tint and JPEG noise.
//! Tesseract reads crisp black-on-white glyphs best, so every page goes
//! through three fixed steps: luminance, a hard threshold, and a sharpen
//! pass. Nothing here is configurable and nothing can fail.

use image::{DynamicImage, GrayImage, Luma};

/// Luminance below this becomes black; everything else white.
pub const BINARIZE_THRESHOLD: u8 = 140;

/// 3×3 sharpen kernel, row-major. Divided by [`SHARPEN_DIVISOR`], which is
/// also the kernel sum. On a 0/255 image this kernel is the identity: uniform
/// regions keep their value and edges saturate back to 0 or 255.
const SHARPEN_KERNEL: [i32; 9] = [-2, -2, -2, -2, 32, -2, -2, -2, -2];
const SHARPEN_DIVISOR: i32 = 16;

/// Greyscale, binarise and sharpen one page image.
///
/// The output has the same dimensions as the input and holds only the
/// values 0 and 255. On an image that is already binary the sharpen pass is
/// the identity, so running this twice gives the same result as once.
pub fn prepare_for_ocr(image: &DynamicImage) -> GrayImage {
    let mut gray = image.to_luma8();
    binarize(&mut gray, BINARIZE_THRESHOLD);
    sharpen(&gray)
}

/// In-place hard threshold.
pub fn binarize(image: &mut GrayImage, threshold: u8) {
    for Luma([v]) in image.pixels_mut() {
        *v = if *v < threshold { 0 } else { 255 };
    }
}

/// 3×3 sharpen with edge pixels clamped to the border.
///
/// `image::imageops::filter3x3` leaves the outermost row and column at zero,
/// which would paint a black frame around every page, so the convolution is
/// done here with clamped sampling.
pub fn sharpen(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    GrayImage::from_fn(width, height, |x, y| {
        let mut acc = 0i32;
        for (k, weight) in SHARPEN_KERNEL.iter().enumerate() {
            let dx = (k % 3) as i64 - 1;
            let dy = (k / 3) as i64 - 1;
            let sx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
            let sy = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
            acc += weight * i32::from(image.get_pixel(sx, sy)[0]);
        }
        Luma([(acc / SHARPEN_DIVISOR).clamp(0, 255) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 37 + y * 11) % 256) as u8;
            Rgb([v, v.wrapping_add(40), v / 2])
        }))
    }

    #[test]
    fn keeps_dimensions_and_is_binary() {
        let out = prepare_for_ocr(&gradient(23, 17));
        assert_eq!(out.dimensions(), (23, 17));
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn idempotent() {
        let once = prepare_for_ocr(&gradient(40, 30));
        let twice = prepare_for_ocr(&DynamicImage::ImageLuma8(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn threshold_boundary() {
        let mut img = GrayImage::from_raw(3, 1, vec![139, 140, 141]).unwrap();
        binarize(&mut img, BINARIZE_THRESHOLD);
        assert_eq!(img.into_raw(), vec![0, 255, 255]);
    }

    #[test]
    fn uniform_image_unchanged_by_sharpen() {
        let img = GrayImage::from_pixel(5, 5, Luma([200]));
        assert_eq!(sharpen(&img), img);
    }

    #[test]
    fn sharpen_amplifies_contrast() {
        // Mid-grey dot on a lighter field gets pushed darker.
        let mut img = GrayImage::from_pixel(3, 3, Luma([180]));
        img.put_pixel(1, 1, Luma([120]));
        let out = sharpen(&img);
        assert!(out.get_pixel(1, 1)[0] < 120);
    }

    #[test]
    fn binary_image_is_a_fixed_point_of_sharpen() {
        let img = GrayImage::from_fn(9, 7, |x, y| {
            Luma([if (x / 2 + y) % 3 == 0 { 0 } else { 255 }])
        });
        assert_eq!(sharpen(&img), img);
    }

    #[test]
    fn border_pixels_are_kept() {
        let mut img = GrayImage::from_pixel(4, 4, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        let out = sharpen(&img);
        assert_eq!(out, img);
        assert_eq!(out.get_pixel(3, 3)[0], 255);
        assert_eq!(out.get_pixel(0, 2)[0], 255);
    }

    #[test]
    fn tiny_images_are_sharpened_without_panicking() {
        for (w, h) in [(1, 1), (1, 5), (2, 2)] {
            let img = GrayImage::from_pixel(w, h, Luma([255]));
            assert_eq!(sharpen(&img), img);
        }
    }

    #[test]
    fn deterministic() {
        let input = gradient(16, 16);
        assert_eq!(prepare_for_ocr(&input), prepare_for_ocr(&input));
    }

    #[test]
    fn empty_image() {
        let out = prepare_for_ocr(&DynamicImage::new_luma8(0, 0));
        assert_eq!(out.dimensions(), (0, 0));
    }
}
