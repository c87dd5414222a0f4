//! Scaling of image values to the 8-bit range.
//!
//! The mapping is `dst = saturate(|alpha * src + beta|)` with `alpha` and
//! `beta` chosen so that `low` maps to 0 and `high` to 255. Values below
//! `low` fold back up because of the absolute value, values above `high`
//! saturate at 255 and NaN maps to 0.

use imgkit_image::{Image, ImageError, PixelDtype};

use crate::{core::img_min_max, parallel};

/// Convert an image to 8-bit by pinning `low` to 0 and `high` to 255.
///
/// # Arguments
///
/// * `src` - The input image of any pixel type.
/// * `dst` - The output 8-bit image with the same size and channels.
/// * `low` - The value mapped to 0.
/// * `high` - The value mapped to 255. If `high <= low` the minimum and
///   maximum of the image are used instead.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::normalize::img_to_u8;
///
/// let image = Image::<u16, 1>::new([3, 1].into(), vec![1000, 1500, 3000]).unwrap();
/// let mut image_u8 = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// img_to_u8(&image, &mut image_u8, 1000.0, 2000.0).unwrap();
/// assert_eq!(image_u8.as_slice(), &[0, 128, 255]);
/// ```
pub fn img_to_u8<T: PixelDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, C>,
    low: f32,
    high: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (low, high) = if high <= low {
        // range not specified so use min/max
        img_min_max(src)?
    } else {
        (low, high)
    };

    let alpha = 255.0 / (high as f64 - low as f64);
    let beta = -alpha * low as f64;

    parallel::par_iter_rows_val(src, dst, |&s, d| {
        // NaN casts to 0
        *d = (alpha * s.into_f32() as f64 + beta).abs().round().clamp(0.0, 255.0) as u8;
    });

    Ok(())
}
