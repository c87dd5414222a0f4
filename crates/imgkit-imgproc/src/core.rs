use imgkit_image::{ops, DynImage, Image, ImageError, PixelDtype, PixelType};

/// Find the minimum and maximum values of an image, skipping NaN pixels.
///
/// The plain scan from [`imgkit_image::ops::min_max`] is tried first. If it
/// yields NaN the image must hold floats, and it is scanned again ignoring the
/// NaN values.
///
/// # Returns
///
/// `(min, max)` as floats, or `(NaN, NaN)` if the image is empty or every
/// value is NaN.
///
/// # Errors
///
/// Returns [`ImageError::NanMinMax`] if the plain scan gives NaN on an
/// integer image, which means the scan itself is broken.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::core::img_min_max;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![2.0, f32::NAN, 5.0],
/// )
/// .unwrap();
///
/// assert_eq!(img_min_max(&image).unwrap(), (2.0, 5.0));
/// ```
pub fn img_min_max<T: PixelDtype, const C: usize>(
    image: &Image<T, C>,
) -> Result<(f32, f32), ImageError> {
    let Some((lo, hi)) = ops::min_max(image) else {
        return Ok((f32::NAN, f32::NAN));
    };

    if !(lo.is_nan() || hi.is_nan()) {
        return Ok((lo, hi));
    }

    if !T::PIXEL_TYPE.is_float() {
        return Err(ImageError::NanMinMax(T::PIXEL_TYPE.to_string()));
    }

    log::warn!("min/max gave NaN, rescanning {} values without NaN", image.as_slice().len());

    let (lo, hi) = image
        .as_slice()
        .iter()
        .map(|v| v.into_f32())
        .filter(|v| !v.is_nan())
        .fold((f32::MAX, -f32::MAX), |(lo, hi), v| (lo.min(v), hi.max(v)));

    // all values were NaN
    if hi < lo {
        return Ok((f32::NAN, f32::NAN));
    }

    Ok((lo, hi))
}

/// A summary of the values of an image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStats {
    /// Short name of the pixel layout, e.g. `16U`.
    pub type_name: &'static str,
    /// Encoding of a single channel.
    pub pixel_type: PixelType,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Number of channels.
    pub channels: usize,
    /// Number of non-zero pixels. Only counted for 8 and 16 bit images.
    pub nonzero_count: usize,
    /// Sum of all the pixels.
    pub sum: f32,
    /// Minimum value, as reported by the plain scan.
    pub min_val: f32,
    /// Maximum value, as reported by the plain scan.
    pub max_val: f32,
}

/// Compute some stats on the input image.
///
/// Only single-channel images get value statistics; for color images the
/// value fields stay at zero and NaN.
///
/// # Example
///
/// ```
/// use imgkit_image::{DynImage, Image};
/// use imgkit_imgproc::core::compute_stats;
///
/// let image = DynImage::Gray8(Image::new([4, 1].into(), vec![0, 3, 0, 9]).unwrap());
/// let stats = compute_stats(&image);
///
/// assert_eq!(stats.nonzero_count, 2);
/// assert_eq!(stats.sum, 12.0);
/// assert_eq!((stats.min_val, stats.max_val), (0.0, 9.0));
/// ```
pub fn compute_stats(image: &DynImage) -> ImageStats {
    let size = image.size();
    let mut stats = ImageStats {
        type_name: image.type_name(),
        pixel_type: image.pixel_type(),
        width: size.width,
        height: size.height,
        channels: image.num_channels(),
        nonzero_count: 0,
        sum: 0.0,
        min_val: f32::NAN,
        max_val: f32::NAN,
    };

    fn fill_values<T: PixelDtype>(stats: &mut ImageStats, image: &Image<T, 1>, count_nonzero: bool) {
        if count_nonzero {
            stats.nonzero_count = ops::count_non_zero(image);
        }
        if let Some((lo, hi)) = ops::min_max(image) {
            stats.sum = ops::sum(image) as f32;
            stats.min_val = lo;
            stats.max_val = hi;
        }
    }

    match image {
        DynImage::Gray8(img) => fill_values(&mut stats, img, true),
        DynImage::Gray16(img) => fill_values(&mut stats, img, true),
        DynImage::Gray32S(img) => fill_values(&mut stats, img, false),
        DynImage::Gray32F(img) => fill_values(&mut stats, img, false),
        DynImage::Bgr8(_) | DynImage::Bgra8(_) | DynImage::Bgr32F(_) => {}
    }

    stats
}

/// Create a profile of an image: the sum of each column or of each row.
///
/// # Arguments
///
/// * `image` - The input image.
/// * `vertical` - If true, sum down each column (one value per column),
///   otherwise sum along each row (one value per row).
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::core::profile;
///
/// let image = Image::<u8, 1>::new([3, 2].into(), vec![1, 2, 3, 4, 5, 6]).unwrap();
///
/// assert_eq!(profile(&image, true), vec![5.0, 7.0, 9.0]);
/// assert_eq!(profile(&image, false), vec![6.0, 15.0]);
/// ```
pub fn profile<T: PixelDtype>(image: &Image<T, 1>, vertical: bool) -> Vec<f32> {
    if vertical {
        let mut sums = vec![0f32; image.cols()];
        for row in image.rows_iter() {
            sums.iter_mut()
                .zip(row.iter())
                .for_each(|(s, v)| *s += v.into_f32());
        }
        sums
    } else {
        image
            .rows_iter()
            .map(|row| row.iter().map(|v| v.into_f32()).sum())
            .collect()
    }
}
