//! Image decoding for source images.
//!
//! Source images are the normalized JPEG/PNG files produced by the
//! preprocessing step. Decoding applies EXIF orientation so that the pixel
//! frame matches what an annotator saw when drawing boxes.
//!
//! # Examples
//!
//! ```ignore
//! use labelbench_core::decode::decode_file;
//!
//! let image = decode_file(Path::new("data/processed/street.jpg")).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_file, decode_image};
pub use types::{DecodeError, DecodedImage, Orientation};
