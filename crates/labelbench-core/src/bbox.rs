//! Axis-aligned bounding boxes and their image-space transforms.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Coordinates are integer pixel *edges*: a box `(0, 0, w, h)` covers the
//!   whole `w`x`h` image, and `(x, y, x + 1, y + 1)` covers exactly one pixel
//! - Rotation angles are in degrees; because y points down, a positive angle
//!   turns the box clockwise on screen
//!
//! Every box transform here has an image counterpart in [`crate::transform`]
//! using the same mapping, so a transformed box still bounds the same region
//! of the transformed image.
//!
//! # Rounding
//!
//! Rotated corner coordinates are rounded to the nearest integer with halves
//! rounded away from zero (`f64::round`). For 180° rotations and for 90°
//! rotations of even-sized images the result is exact.

use serde::{Deserialize, Serialize};

use crate::label::Label;

/// An axis-aligned bounding box in pixel-edge coordinates.
///
/// The type does not enforce `x1 < x2` or `y1 < y2`: boxes coming back from
/// storage are recorded as-is. Use [`BBox::is_degenerate`] to check validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build the tightest box enclosing all `points`.
    ///
    /// Returns `None` for an empty slice.
    pub fn enclosing(points: &[(i32, i32)]) -> Option<Self> {
        let (&(x, y), rest) = points.split_first()?;
        let mut bbox = BBox::new(x, y, x, y);
        for &(x, y) in rest {
            bbox.x1 = bbox.x1.min(x);
            bbox.y1 = bbox.y1.min(y);
            bbox.x2 = bbox.x2.max(x);
            bbox.y2 = bbox.y2.max(y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Area in pixels, zero for degenerate boxes.
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }

    /// True when the box has no positive width or no positive height.
    pub fn is_degenerate(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    /// The same region with `x1 <= x2` and `y1 <= y2`.
    pub fn normalized(&self) -> BBox {
        BBox::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }

    /// Box center as floating point coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x1 as f64 + self.x2 as f64) / 2.0,
            (self.y1 as f64 + self.y2 as f64) / 2.0,
        )
    }

    /// The four corners, clockwise from top-left.
    pub fn corners(&self) -> [(i32, i32); 4] {
        [
            (self.x1, self.y1),
            (self.x2, self.y1),
            (self.x2, self.y2),
            (self.x1, self.y2),
        ]
    }

    /// Rotate the box about the center of a `width`x`height` image.
    ///
    /// Each corner is rotated with
    ///
    /// ```text
    /// x' = cos(θ) * (x - cx) - sin(θ) * (y - cy) + cx
    /// y' = sin(θ) * (x - cx) + cos(θ) * (y - cy) + cy
    /// ```
    ///
    /// where `(cx, cy) = (width / 2, height / 2)`, and the result is the
    /// axis-aligned rectangle around the four rotated corners. The canvas is
    /// not resized, so the result may extend past the image; see
    /// [`BBox::clip`].
    ///
    /// The re-bounding step is redundant at multiples of 90° but is what makes
    /// arbitrary angles work.
    pub fn rotate(&self, width: u32, height: u32, angle_degrees: f64) -> BBox {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let (sin, cos) = angle_degrees.to_radians().sin_cos();

        let rotated = self.corners().map(|(x, y)| {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            (
                (cos * dx - sin * dy + cx).round() as i32,
                (sin * dx + cos * dy + cy).round() as i32,
            )
        });

        // Four corners are always present.
        BBox::enclosing(&rotated).unwrap_or(*self)
    }

    /// Mirror the box left-right inside an image of the given width.
    pub fn flip_horizontal(&self, width: u32) -> BBox {
        let w = width as i32;
        BBox::new(w - self.x2, self.y1, w - self.x1, self.y2)
    }

    /// Mirror the box top-bottom inside an image of the given height.
    pub fn flip_vertical(&self, height: u32) -> BBox {
        let h = height as i32;
        BBox::new(self.x1, h - self.y2, self.x2, h - self.y1)
    }

    /// Clamp the box to the `[0, width] x [0, height]` canvas.
    ///
    /// A box lying entirely outside the canvas collapses to zero width or
    /// height and reports [`BBox::is_degenerate`].
    pub fn clip(&self, width: u32, height: u32) -> BBox {
        let w = width as i32;
        let h = height as i32;
        BBox::new(
            self.x1.clamp(0, w),
            self.y1.clamp(0, h),
            self.x2.clamp(0, w),
            self.y2.clamp(0, h),
        )
    }
}

/// A bounding box together with its validated label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledBox {
    pub label: Label,
    pub bbox: BBox,
}

impl LabeledBox {
    pub fn new(label: Label, bbox: BBox) -> Self {
        Self { label, bbox }
    }

    /// Replace the box, keeping the label.
    pub fn with_bbox(&self, bbox: BBox) -> Self {
        Self {
            label: self.label.clone(),
            bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_horizontal_example() {
        let bbox = BBox::new(10, 10, 30, 20);
        assert_eq!(bbox.flip_horizontal(100), BBox::new(70, 10, 90, 20));
    }

    #[test]
    fn test_normalized() {
        let reversed = BBox::new(30, 20, 10, 10);
        assert!(reversed.is_degenerate());
        assert_eq!(reversed.normalized(), BBox::new(10, 10, 30, 20));
        assert_eq!(BBox::new(10, 20, 30, 10).normalized(), BBox::new(10, 10, 30, 20));
        assert_eq!(BBox::new(1, 2, 3, 4).normalized(), BBox::new(1, 2, 3, 4));
    }

    #[test]
    fn test_flip_vertical_example() {
        let bbox = BBox::new(10, 10, 30, 20);
        assert_eq!(bbox.flip_vertical(50), BBox::new(10, 30, 30, 40));
    }

    #[test]
    fn test_rotate_180_example() {
        let bbox = BBox::new(10, 10, 30, 20);
        assert_eq!(bbox.rotate(100, 50, 180.0), BBox::new(70, 30, 90, 40));
    }

    #[test]
    fn test_rotate_90_turns_clockwise() {
        // 100x100 image, box in the top-left quadrant.
        // A clockwise quarter turn moves it to the top-right quadrant.
        let bbox = BBox::new(10, 20, 30, 40);
        assert_eq!(bbox.rotate(100, 100, 90.0), BBox::new(60, 10, 80, 30));
    }

    #[test]
    fn test_rotate_90_non_square_leaves_canvas() {
        // Center is (50, 25); the rotated box pokes above the canvas.
        let bbox = BBox::new(10, 10, 30, 20);
        let rotated = bbox.rotate(100, 50, 90.0);
        assert_eq!(rotated, BBox::new(55, -15, 65, 5));
        assert_eq!(rotated.clip(100, 50), BBox::new(55, 0, 65, 5));
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let bbox = BBox::new(3, 7, 41, 19);
        assert_eq!(bbox.rotate(64, 48, 0.0), bbox);
        assert_eq!(bbox.rotate(64, 48, 360.0), bbox);
    }

    #[test]
    fn test_rotate_45_rebounds() {
        // Square centered on the image grows to its diagonal extent.
        let bbox = BBox::new(40, 40, 60, 60);
        let rotated = bbox.rotate(100, 100, 45.0);
        // Half diagonal of a 20px square is ~14.14
        assert_eq!(rotated, BBox::new(36, 36, 64, 64));
        assert_eq!(rotated.center(), (50.0, 50.0));
    }

    #[test]
    fn test_centered_box_keeps_center() {
        let bbox = BBox::new(30, 40, 70, 60);
        for angle in [90.0, 180.0, 270.0] {
            let rotated = bbox.rotate(100, 100, angle);
            assert_eq!(rotated.center(), (50.0, 50.0), "angle {}", angle);
        }
    }

    #[test]
    fn test_rotate_90_swaps_box_extent() {
        let bbox = BBox::new(30, 40, 70, 60);
        let rotated = bbox.rotate(100, 100, 90.0);
        assert_eq!(rotated.width(), bbox.height());
        assert_eq!(rotated.height(), bbox.width());
    }

    #[test]
    fn test_enclosing() {
        let bbox = BBox::enclosing(&[(5, 9), (-2, 4), (7, 1)]).unwrap();
        assert_eq!(bbox, BBox::new(-2, 1, 7, 9));
        assert!(BBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_degenerate() {
        assert!(!BBox::new(0, 0, 1, 1).is_degenerate());
        assert!(BBox::new(5, 0, 5, 10).is_degenerate());
        assert!(BBox::new(0, 5, 10, 5).is_degenerate());
        assert!(BBox::new(10, 0, 0, 10).is_degenerate());
        assert_eq!(BBox::new(10, 0, 0, 10).area(), 0);
        assert_eq!(BBox::new(0, 0, 4, 5).area(), 20);
    }

    #[test]
    fn test_clip_outside_is_degenerate() {
        let bbox = BBox::new(-40, 10, -5, 20);
        assert!(bbox.clip(100, 50).is_degenerate());
    }

    #[test]
    fn test_clip_inside_is_unchanged() {
        let bbox = BBox::new(1, 2, 99, 49);
        assert_eq!(bbox.clip(100, 50), bbox);
    }
}
