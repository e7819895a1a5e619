//! Labelbench Core - box geometry and image transforms
//!
//! This crate provides the pure building blocks of the labelbench dataset
//! tools: the bounding box value type, the label vocabulary, image
//! decode/encode, and the augmentation menu that transforms an image and its
//! boxes together.
//!
//! Nothing here touches the annotation store; see `labelbench-dataset`.

pub mod augment;
pub mod bbox;
pub mod brightness;
pub mod decode;
pub mod encode;
pub mod label;
pub mod transform;

pub use augment::Augmentation;
pub use bbox::{BBox, LabeledBox};
pub use decode::{decode_file, decode_image, DecodeError, DecodedImage};
pub use encode::{encode_image, EncodeError};
pub use label::{Label, LabelError, LabelSet};
