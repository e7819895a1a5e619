//! Image encoding for augmented artifacts.
//!
//! # Examples
//!
//! ```ignore
//! use labelbench_core::encode::encode_image;
//!
//! let jpeg_bytes = encode_image(&image, 95).unwrap();
//! std::fs::write("augmented/street_flipH.jpg", jpeg_bytes).unwrap();
//! ```

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError, DEFAULT_JPEG_QUALITY};
