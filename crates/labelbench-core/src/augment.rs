//! The augmentation menu: paired image and box transforms.
//!
//! Each [`Augmentation`] pairs an image operation with the box operation
//! that keeps annotations attached to the same physical region:
//!
//! | name     | image                         | box                                 |
//! |----------|-------------------------------|-------------------------------------|
//! | `rot90`  | rotate 90° about the center   | rotate corners, re-bound            |
//! | `rot180` | rotate 180° about the center  | rotate corners, re-bound            |
//! | `flipH`  | mirror left-right             | `(w - x2, y1, w - x1, y2)`          |
//! | `flipV`  | mirror top-bottom             | `(x1, h - y2, x2, h - y1)`          |
//! | `bright` | scale HSV value by [0.5, 1.5] | unchanged                           |
//!
//! The names are part of the on-disk contract: augmented files are named
//! `{stem}_{name}.jpg`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::brightness::{random_brightness_factor, scale_value};
use crate::decode::DecodedImage;
use crate::transform::{flip_horizontal, flip_vertical, rotate_180, rotate_about_center};

/// One entry of the augmentation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Augmentation {
    #[serde(rename = "rot90")]
    Rot90,
    #[serde(rename = "rot180")]
    Rot180,
    #[serde(rename = "flipH")]
    FlipH,
    #[serde(rename = "flipV")]
    FlipV,
    #[serde(rename = "bright")]
    Bright,
}

impl Augmentation {
    /// The full menu, in the order it is applied.
    pub const ALL: [Augmentation; 5] = [
        Augmentation::Rot90,
        Augmentation::Rot180,
        Augmentation::FlipH,
        Augmentation::FlipV,
        Augmentation::Bright,
    ];

    /// Suffix used in augmented file names.
    pub fn name(self) -> &'static str {
        match self {
            Augmentation::Rot90 => "rot90",
            Augmentation::Rot180 => "rot180",
            Augmentation::FlipH => "flipH",
            Augmentation::FlipV => "flipV",
            Augmentation::Bright => "bright",
        }
    }

    /// File name for the augmented copy of an image with the given stem.
    pub fn file_name(self, stem: &str) -> String {
        format!("{}_{}.jpg", stem, self.name())
    }

    /// Apply the image half of the transform.
    ///
    /// Only [`Augmentation::Bright`] consumes randomness.
    pub fn apply_image<R: Rng + ?Sized>(self, image: &DecodedImage, rng: &mut R) -> DecodedImage {
        match self {
            Augmentation::Rot90 => rotate_about_center(image, 90.0),
            Augmentation::Rot180 => rotate_180(image),
            Augmentation::FlipH => flip_horizontal(image),
            Augmentation::FlipV => flip_vertical(image),
            Augmentation::Bright => {
                let mut out = image.clone();
                scale_value(&mut out.pixels, random_brightness_factor(rng));
                out
            }
        }
    }

    /// Apply the box half of the transform for an image of `width`x`height`.
    ///
    /// The result is not clipped; see [`Augmentation::derive_bbox`].
    pub fn apply_bbox(self, bbox: BBox, width: u32, height: u32) -> BBox {
        match self {
            Augmentation::Rot90 => bbox.rotate(width, height, 90.0),
            Augmentation::Rot180 => bbox.rotate(width, height, 180.0),
            Augmentation::FlipH => bbox.flip_horizontal(width),
            Augmentation::FlipV => bbox.flip_vertical(height),
            Augmentation::Bright => bbox,
        }
    }

    /// Transform a box and clip it to the output canvas.
    ///
    /// Boxes recorded corner-first in either order (e.g. dragged right to
    /// left) are normalized before the transform, so every entry of the menu
    /// sees the same region. Returns `None` when nothing of the box is left
    /// inside the image (zero width or height after clipping).
    pub fn derive_bbox(self, bbox: BBox, width: u32, height: u32) -> Option<BBox> {
        let derived = self
            .apply_bbox(bbox.normalized(), width, height)
            .clip(width, height);
        (!derived.is_degenerate()).then_some(derived)
    }
}

impl fmt::Display for Augmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
