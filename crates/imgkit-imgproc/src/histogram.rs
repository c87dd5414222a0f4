use imgkit_image::{DynImage, Image, ImageError, PixelDtype};
use rayon::prelude::*;

use crate::core::img_min_max;

/// Number of bins used to locate percentiles on float images.
pub const PERCENTILE_BINS: usize = 256;

/// Fraction of a bin width added to the top of the histogram range so that a
/// value equal to the maximum lands in the last bin.
const UPPER_BOUND_NUDGE: f64 = 0.1;

/// Integer pixel types that can be histogrammed with one bucket per value.
pub trait IntHistPixel: PixelDtype {
    /// Number of bits of the type.
    const BITS: u32;

    /// The bucket of the value before any shift.
    fn bucket(self) -> usize;
}

impl IntHistPixel for u8 {
    const BITS: u32 = 8;

    fn bucket(self) -> usize {
        self as usize
    }
}

impl IntHistPixel for u16 {
    const BITS: u32 = 16;

    fn bucket(self) -> usize {
        self as usize
    }
}

fn count_buckets<T: IntHistPixel>(src: &Image<T, 1>, bin_shift: u32) -> Vec<u64> {
    let num_bins = (1usize << T::BITS) >> bin_shift;

    src.as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0u64; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[px.bucket() >> bin_shift] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0u64; num_bins],
            |mut a, b| {
                a.iter_mut().zip(b.iter()).for_each(|(a, b)| *a += b);
                a
            },
        )
}

/// Compute the histogram of an 8-bit or 16-bit image with one bin per value.
///
/// # Returns
///
/// 256 counts for `u8` images, 65536 for `u16` images.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::histogram::hist_int;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![0, 7, 7],
/// )
/// .unwrap();
///
/// let counts = hist_int(&image);
/// assert_eq!(counts.len(), 256);
/// assert_eq!(counts[7], 2);
/// ```
pub fn hist_int<T: IntHistPixel>(src: &Image<T, 1>) -> Vec<u64> {
    count_buckets(src, 0)
}

/// Compute the histogram of an 8-bit or 16-bit image with bins `2^bin_shift` values wide.
///
/// Each pixel is counted in the bin `value >> bin_shift`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidBinShift`] if the shift leaves no bins.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::histogram::hist_int_shifted;
///
/// let image = Image::<u16, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![0, 255, 256],
/// )
/// .unwrap();
///
/// let counts = hist_int_shifted(&image, 8).unwrap();
/// assert_eq!(counts.len(), 256);
/// assert_eq!(&counts[..2], &[2, 1]);
/// ```
pub fn hist_int_shifted<T: IntHistPixel>(
    src: &Image<T, 1>,
    bin_shift: u32,
) -> Result<Vec<u64>, ImageError> {
    if bin_shift >= T::BITS {
        return Err(ImageError::InvalidBinShift(bin_shift, T::BITS));
    }
    Ok(count_buckets(src, bin_shift))
}

/// Integer histogram of a runtime-typed image.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedPixelType`] unless the image is `Gray8` or `Gray16`.
pub fn hist_int_dyn(src: &DynImage, bin_shift: u32) -> Result<Vec<u64>, ImageError> {
    match src {
        DynImage::Gray8(img) => hist_int_shifted(img, bin_shift),
        DynImage::Gray16(img) => hist_int_shifted(img, bin_shift),
        _ => Err(ImageError::UnsupportedPixelType(
            src.type_name().to_string(),
            "integer histogram".to_string(),
        )),
    }
}

/// A uniform histogram with float bins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatHistogram {
    /// Lower edge of each bin.
    pub bins: Vec<f32>,
    /// Number of pixels in each bin.
    pub counts: Vec<u64>,
    /// Bottom of the first bin.
    pub min_val: f32,
    /// Top of the last bin, NaN if the image has no valid value.
    pub max_val: f32,
}

impl FloatHistogram {
    /// Whether the histogram has no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total number of counted pixels.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Compute a uniform histogram with float bins on any single-channel image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `bin_count` - The number of bins.
/// * `min_val` - Bottom of the first bin. Defaults to 0.
/// * `max_val` - Top of the last bin. Defaults to the maximum value of the image.
///
/// NaN bounds are treated as unspecified.
///
/// # Returns
///
/// * empty bins and counts if the image has no non-NaN value;
/// * a single bin at `min_val` with count 0 if `max_val <= min_val`;
/// * otherwise `bin_count` equal-width bins covering `[min_val, max_val]`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidHistogramBins`] if `bin_count` is zero.
///
/// # Example
///
/// ```
/// use imgkit_image::{Image, ImageSize};
/// use imgkit_imgproc::histogram::hist_float;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 5, height: 1 },
///     vec![1.0, 2.0, 3.0, 4.0, f32::NAN],
/// )
/// .unwrap();
///
/// let hist = hist_float(&image, 4, Some(1.0), Some(4.0)).unwrap();
/// assert_eq!(hist.bins, vec![1.0, 1.75, 2.5, 3.25]);
/// assert_eq!(hist.counts, vec![1, 1, 1, 1]);
/// ```
pub fn hist_float<T: PixelDtype>(
    src: &Image<T, 1>,
    bin_count: usize,
    min_val: Option<f32>,
    max_val: Option<f32>,
) -> Result<FloatHistogram, ImageError> {
    if bin_count == 0 {
        return Err(ImageError::InvalidHistogramBins(bin_count));
    }

    let min_val = min_val.filter(|v| !v.is_nan()).unwrap_or(0.0);
    let max_val = match max_val.filter(|v| !v.is_nan()) {
        Some(v) => v,
        None => img_min_max(src)?.1,
    };

    let mut hist = FloatHistogram {
        min_val,
        max_val,
        ..Default::default()
    };

    // no non-nan values in image
    if max_val.is_nan() {
        return Ok(hist);
    }

    if max_val <= min_val {
        hist.bins.push(min_val);
        hist.counts.push(0);
        return Ok(hist);
    }

    let lo = min_val as f64;
    let bin_size = (max_val as f64 - lo) / bin_count as f64;
    hist.bins = (0..bin_count)
        .map(|i| (lo + i as f64 * bin_size) as f32)
        .collect();

    // the top of the range is exclusive, push it up so the maximum itself is counted
    let hi = max_val as f64 + UPPER_BOUND_NUDGE * bin_size;

    hist.counts = vec![0u64; bin_count];
    for v in src.as_slice().iter().map(|v| v.into_f32() as f64) {
        if v.is_nan() || v < lo || v >= hi {
            continue;
        }
        let idx = (((v - lo) / bin_size).floor() as usize).min(bin_count - 1);
        hist.counts[idx] += 1;
    }

    Ok(hist)
}

/// Find the bin at which the cumulative count reaches a percentile.
///
/// # Arguments
///
/// * `counts` - The histogram counts.
/// * `pct` - The percentile, 0 to 100.
///
/// # Returns
///
/// The smallest index whose inclusive cumulative count is at least
/// `ceil(pct / 100 * total)`, or `None` for an empty histogram.
///
/// # Errors
///
/// Returns [`ImageError::InvalidPercentile`] if `pct` is outside of [0, 100].
///
/// # Example
///
/// ```
/// use imgkit_imgproc::histogram::find_percentile_in_hist;
///
/// let counts = [0, 4, 0, 4, 2];
///
/// assert_eq!(find_percentile_in_hist(&counts, 40.0).unwrap(), Some(1));
/// assert_eq!(find_percentile_in_hist(&counts, 60.0).unwrap(), Some(3));
/// assert_eq!(find_percentile_in_hist(&counts, 100.0).unwrap(), Some(4));
/// ```
pub fn find_percentile_in_hist(counts: &[u64], pct: f32) -> Result<Option<usize>, ImageError> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(ImageError::InvalidPercentile(pct));
    }

    if counts.is_empty() {
        return Ok(None);
    }

    let total: u64 = counts.iter().sum();
    // pct * total is exact for integral percents, pct / 100 is not
    let target = (pct as f64 * total as f64 / 100.0).ceil() as u64;

    let mut cumulative = 0u64;
    for (i, &count) in counts.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return Ok(Some(i));
        }
    }

    Ok(Some(counts.len() - 1))
}

/// Compute two percentiles on an 8-bit or 16-bit image.
///
/// # Returns
///
/// The pixel values at the `low_pct` and `high_pct` percentiles.
pub fn hist_percentiles_int<T: IntHistPixel>(
    src: &Image<T, 1>,
    low_pct: f32,
    high_pct: f32,
) -> Result<(usize, usize), ImageError> {
    let counts = hist_int(src);
    let low = find_percentile_in_hist(&counts, low_pct)?.unwrap_or_default();
    let high = find_percentile_in_hist(&counts, high_pct)?.unwrap_or_default();
    Ok((low, high))
}

/// Compute two percentiles on a float image.
///
/// The image is binned in [`PERCENTILE_BINS`] bins from 0 to its maximum and
/// the lower edges of the selected bins are returned.
///
/// # Returns
///
/// `(NaN, NaN)` if the image has no non-NaN value.
pub fn hist_percentiles_f32(
    src: &Image<f32, 1>,
    low_pct: f32,
    high_pct: f32,
) -> Result<(f32, f32), ImageError> {
    let hist = hist_float(src, PERCENTILE_BINS, None, None)?;
    let low = find_percentile_in_hist(&hist.counts, low_pct)?;
    let high = find_percentile_in_hist(&hist.counts, high_pct)?;

    match (low, high) {
        (Some(low), Some(high)) => Ok((hist.bins[low], hist.bins[high])),
        _ => Ok((f32::NAN, f32::NAN)),
    }
}

/// Compute two percentiles on a runtime-typed image.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedPixelType`] unless the image is `Gray8`,
/// `Gray16` or `Gray32F`.
///
/// # Example
///
/// ```
/// use imgkit_image::{DynImage, Image};
/// use imgkit_imgproc::histogram::hist_percentiles;
///
/// let image = DynImage::Gray8(Image::from_size_val([4, 4].into(), 10).unwrap());
///
/// assert_eq!(hist_percentiles(&image, 50.0, 50.0).unwrap(), (10.0, 10.0));
/// ```
pub fn hist_percentiles(
    src: &DynImage,
    low_pct: f32,
    high_pct: f32,
) -> Result<(f32, f32), ImageError> {
    match src {
        DynImage::Gray8(img) => {
            let (low, high) = hist_percentiles_int(img, low_pct, high_pct)?;
            Ok((low as f32, high as f32))
        }
        DynImage::Gray16(img) => {
            let (low, high) = hist_percentiles_int(img, low_pct, high_pct)?;
            Ok((low as f32, high as f32))
        }
        DynImage::Gray32F(img) => hist_percentiles_f32(img, low_pct, high_pct),
        DynImage::Gray32S(_) | DynImage::Bgr8(_) | DynImage::Bgra8(_) | DynImage::Bgr32F(_) => {
            Err(ImageError::UnsupportedPixelType(
                src.type_name().to_string(),
                "histogram percentiles".to_string(),
            ))
        }
    }
}
