#![deny(missing_docs)]
//! Image types and traits for generating and manipulating images

/// image representation for image processing purposes.
pub mod image;

/// pixel data types and their runtime tags.
pub mod dtype;

/// runtime-typed images.
pub mod dynamic;

/// Error types for the image module.
pub mod error;

/// basic operations on images.
pub mod ops;

pub use crate::dtype::{PixelDtype, PixelType};
pub use crate::dynamic::DynImage;
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
