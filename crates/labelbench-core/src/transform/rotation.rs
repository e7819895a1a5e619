//! Image rotation about the image center on a fixed canvas.
//!
//! The output has the same dimensions as the input: corners that rotate out
//! of the frame are cut off and uncovered areas are filled with black. This
//! matches [`BBox::rotate`](crate::bbox::BBox::rotate), which rotates box
//! corners about the same center without resizing the frame.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each output pixel center we rotate
//! back by -θ to find where it came from and sample the source there.
//!
//! ```text
//! src_x = cos(θ) * (dst_x - cx) + sin(θ) * (dst_y - cy) + cx
//! src_y = -sin(θ) * (dst_x - cx) + cos(θ) * (dst_y - cy) + cy
//! ```
//!
//! Pixel `(i, j)` has its center at `(i + 0.5, j + 0.5)` in the continuous
//! frame, which is the frame box coordinates live in.

use crate::decode::DecodedImage;

/// Rotate an image about its center, keeping the canvas size.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise on screen)
///
/// Each output pixel copies the source pixel nearest to its pre-image, which
/// is exact for quarter turns.
///
/// # Example
///
/// ```ignore
/// use labelbench_core::transform::rotate_about_center;
///
/// let rotated = rotate_about_center(&image, 90.0);
/// assert_eq!((rotated.width, rotated.height), (image.width, image.height));
/// ```
pub fn rotate_about_center(image: &DecodedImage, angle_degrees: f64) -> DecodedImage {
    // Fast path: no rotation needed
    if (angle_degrees % 360.0).abs() < 0.001 || image.is_empty() {
        return image.clone();
    }

    let (width, height) = (image.width, image.height);
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let (sin, cos) = angle_degrees.to_radians().sin_cos();

    let mut output = vec![0u8; (width * height * 3) as usize];

    for dst_y in 0..height {
        for dst_x in 0..width {
            let dx = dst_x as f64 + 0.5 - cx;
            let dy = dst_y as f64 + 0.5 - cy;

            // Back to pixel-index space of the source
            let src_x = cos * dx + sin * dy + cx - 0.5;
            let src_y = -sin * dx + cos * dy + cy - 0.5;

            let pixel = sample_nearest(image, src_x, src_y);

            let dst_idx = ((dst_y * width + dst_x) * 3) as usize;
            output[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
        }
    }

    DecodedImage {
        width,
        height,
        pixels: output,
    }
}

/// True when `(x, y)` in pixel-index space falls on the source image.
#[inline]
fn in_frame(image: &DecodedImage, x: f64, y: f64) -> bool {
    x >= -0.5 && x <= image.width as f64 - 0.5 && y >= -0.5 && y <= image.height as f64 - 0.5
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !in_frame(image, x, y) {
        return [0, 0, 0];
    }
    let px = (x.round().max(0.0) as u32).min(image.width - 1);
    let py = (y.round().max(0.0) as u32).min(image.height - 1);
    image.pixel(px, py)
}
