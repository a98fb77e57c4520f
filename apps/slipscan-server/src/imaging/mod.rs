//! Raster helpers shared by the OCR and extraction flows
//!
//! - [`crop_percent`]: strip a fraction of the page from the top and bottom
//! - [`draw_box`]: outline a recognized region on an annotated copy
//! - [`encode_jpeg`] / [`encode_png`]: serialize for upload

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use thiserror::Error;

use crate::ocr::BoundingBox;

/// Outline colour for engine A (Tesseract) boxes
pub const TESSERACT_BOX: Rgb<u8> = Rgb([255, 0, 0]);

/// Outline colour for engine B (EasyOCR) boxes
pub const EASYOCR_BOX: Rgb<u8> = Rgb([0, 0, 255]);

/// Outline thickness in pixels
pub const BOX_THICKNESS: u32 = 2;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("Invalid crop: upper {upper} + lower {lower} leaves no rows")]
    InvalidCrop { upper: f32, lower: f32 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Decode any supported raster format
pub fn decode(data: &[u8]) -> Result<DynamicImage, ImagingError> {
    image::load_from_memory(data).map_err(|e| ImagingError::Decode(e.to_string()))
}

/// Remove `upper` of the height from the top and `lower` from the bottom.
///
/// Both fractions are clamped to `0.0..=1.0`. The full width is kept and the
/// result is converted to RGB.
pub fn crop_percent(img: &DynamicImage, upper: f32, lower: f32) -> Result<RgbImage, ImagingError> {
    let upper = upper.clamp(0.0, 1.0);
    let lower = lower.clamp(0.0, 1.0);

    let height = img.height() as f32;
    let top = (height * upper).round() as u32;
    let bottom = (height * (1.0 - lower)).round() as u32;

    if bottom <= top {
        return Err(ImagingError::InvalidCrop { upper, lower });
    }

    Ok(img.crop_imm(0, top, img.width(), bottom - top).to_rgb8())
}

/// Draw a rectangle outline, clipped to the image.
///
/// Thickness grows inwards; a box starting past the image edge draws nothing.
pub fn draw_box(img: &mut RgbImage, bounds: &BoundingBox, color: Rgb<u8>, thickness: u32) {
    let (width, height) = img.dimensions();
    if bounds.x >= width || bounds.y >= height || bounds.width == 0 || bounds.height == 0 {
        return;
    }

    for t in 0..thickness {
        let inset = 2 * t;
        if bounds.width <= inset || bounds.height <= inset {
            break;
        }
        let rect = Rect::at((bounds.x + t) as i32, (bounds.y + t) as i32)
            .of_size(bounds.width - inset, bounds.height - inset);
        draw_hollow_rect_mut(img, rect, color);
    }
}

pub fn encode_jpeg(img: &RgbImage) -> Result<Vec<u8>, ImagingError> {
    encode(&DynamicImage::ImageRgb8(img.clone()), ImageFormat::Jpeg)
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ImagingError> {
    encode(img, ImageFormat::Png)
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ImagingError> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), format)
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn test_crop_keeps_full_width() {
        let cropped = crop_percent(&blank(200, 100), 0.1, 0.2).unwrap();
        assert_eq!(cropped.dimensions(), (200, 70));
    }

    #[test]
    fn test_crop_zero_is_identity() {
        let cropped = crop_percent(&blank(40, 30), 0.0, 0.0).unwrap();
        assert_eq!(cropped.dimensions(), (40, 30));
    }

    #[test]
    fn test_crop_everything_is_rejected() {
        let result = crop_percent(&blank(40, 30), 0.6, 0.5);
        assert!(matches!(result, Err(ImagingError::InvalidCrop { .. })));
    }

    #[test]
    fn test_draw_box_outline_only() {
        let mut img = RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]));
        let bounds = BoundingBox { x: 2, y: 2, width: 10, height: 8 };
        draw_box(&mut img, &bounds, TESSERACT_BOX, 2);

        assert_eq!(*img.get_pixel(2, 2), TESSERACT_BOX);
        assert_eq!(*img.get_pixel(3, 3), TESSERACT_BOX);
        assert_eq!(*img.get_pixel(11, 9), TESSERACT_BOX);
        // interior untouched
        assert_eq!(*img.get_pixel(6, 6), Rgb([255, 255, 255]));
        // outside untouched
        assert_eq!(*img.get_pixel(15, 15), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_draw_box_clips_to_image() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let bounds = BoundingBox { x: 5, y: 5, width: 50, height: 50 };
        draw_box(&mut img, &bounds, EASYOCR_BOX, BOX_THICKNESS);
        assert_eq!(*img.get_pixel(5, 9), EASYOCR_BOX);
        assert_eq!(*img.get_pixel(9, 5), EASYOCR_BOX);
        assert_eq!(*img.get_pixel(8, 8), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_box_outside_image_paints_nothing() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let bounds = BoundingBox { x: 50, y: 50, width: 4, height: 4 };
        draw_box(&mut img, &bounds, TESSERACT_BOX, BOX_THICKNESS);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_encode_roundtrip_dimensions() {
        let img = RgbImage::from_pixel(12, 7, Rgb([10, 20, 30]));
        let jpeg = encode_jpeg(&img).unwrap();
        let decoded = decode(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }
}
