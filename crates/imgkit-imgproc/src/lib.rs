#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// grid collage rendering with captions.
pub mod collage;

/// color transformations module.
pub mod color;

/// min/max, statistics and profiles.
pub mod core;

/// utilities to draw on images.
pub mod draw;

/// built-in bitmap font and the text rendering trait.
pub mod font;

/// file-format driven conversions and the table of known extensions.
pub mod format;

/// compute image histograms and percentiles.
pub mod histogram;

/// gaussian kernels and kernel splatting.
pub mod kernels;

/// operations to normalize images.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// rectangular regions of interest.
pub mod roi;
