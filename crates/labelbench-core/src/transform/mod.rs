//! Geometric image transforms: rotation and mirroring.
//!
//! Mirrors and the half turn go through `image::imageops`; arbitrary angles
//! on a fixed canvas use the inverse-mapping rotation in this module.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen (y down)
//! - Rotation is about the image center and never resizes the canvas
//! - Origin is top-left corner
//!
//! Each transform here has a box counterpart on [`BBox`](crate::bbox::BBox)
//! built from the same mapping.

mod flip;
mod rotation;

pub use flip::{flip_horizontal, flip_vertical, rotate_180};
pub use rotation::rotate_about_center;
