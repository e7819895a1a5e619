//! Mirror operations and the half turn.
//!
//! Pixel column `i` moves to `width - 1 - i`, which in edge coordinates maps
//! the span `[x, x + 1)` to `[width - x - 1, width - x)`. This is the image
//! counterpart of [`BBox::flip_horizontal`](crate::bbox::BBox::flip_horizontal)
//! and its vertical twin. A 180° turn about the center is both flips at once,
//! so it keeps the canvas and never leaves uncovered pixels.

use image::{imageops, RgbImage};

use crate::decode::DecodedImage;

/// Mirror an image left-right.
pub fn flip_horizontal(image: &DecodedImage) -> DecodedImage {
    map_rgb(image, imageops::flip_horizontal)
}

/// Mirror an image top-bottom.
pub fn flip_vertical(image: &DecodedImage) -> DecodedImage {
    map_rgb(image, imageops::flip_vertical)
}

/// Turn an image 180° about its center.
pub fn rotate_180(image: &DecodedImage) -> DecodedImage {
    map_rgb(image, imageops::rotate180)
}

/// Run an `imageops` transform over the image buffer.
///
/// Empty or malformed buffers have nothing to move and are returned as-is.
fn map_rgb<F>(image: &DecodedImage, op: F) -> DecodedImage
where
    F: FnOnce(&RgbImage) -> RgbImage,
{
    if image.is_empty() {
        return image.clone();
    }
    match image.to_rgb_image() {
        Some(rgb) => DecodedImage::from_rgb_image(op(&rgb)),
        None => image.clone(),
    }
}
