/// An error type for the image crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size mismatch ({0}x{1} vs {2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel coordinate is outside of the image.
    #[error("Pixel index ({0}, {1}) out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a channel index is out of bounds.
    #[error("Channel index {0} out of bounds ({1} channels)")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a value cannot be cast to the target pixel type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when an operation does not handle the image pixel layout.
    #[error("Unsupported pixel type {0} for {1}")]
    UnsupportedPixelType(String, String),

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when the histogram bit shift leaves no bins.
    #[error("Invalid histogram bin shift {0} for {1}-bit pixels")]
    InvalidBinShift(u32, u32),

    /// Error when a percentile is outside of [0, 100].
    #[error("Invalid percentile: {0}")]
    InvalidPercentile(f32),

    /// Error when min/max yields NaN on an image that cannot hold NaN.
    #[error("min/max gave NaN on a {0} image")]
    NanMinMax(String),

    /// Error when a kernel size is not odd.
    #[error("Invalid kernel size {0}, must be odd")]
    InvalidKernelSize(usize),

    /// Error when a region of interest does not fit in the image.
    #[error("Region ({0}, {1}, {2}x{3}) does not fit in the image ({4}x{5})")]
    InvalidRoi(usize, usize, usize, usize, usize, usize),
}
