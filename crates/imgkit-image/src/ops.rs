use crate::{dtype::PixelDtype, Image, ImageError};

/// Find the minimum and maximum values of an image over all channels.
///
/// This is the plain scan: a single NaN value makes both results NaN. Use
/// `imgkit_imgproc::core::img_min_max` when NaN pixels should be skipped.
///
/// # Returns
///
/// `None` if the image is empty.
///
/// # Examples
///
/// ```
/// use imgkit_image::{ops::min_max, Image, ImageSize};
///
/// let image = Image::<u16, 1>::new(ImageSize { width: 3, height: 1 }, vec![7, 2, 9]).unwrap();
///
/// assert_eq!(min_max(&image), Some((2.0, 9.0)));
/// ```
pub fn min_max<T: PixelDtype, const C: usize>(image: &Image<T, C>) -> Option<(f32, f32)> {
    let mut iter = image.as_slice().iter().map(|v| v.into_f32());
    let first = iter.next()?;

    let (lo, hi) = iter.fold((first, first), |(lo, hi), v| {
        if v.is_nan() || lo.is_nan() {
            (f32::NAN, f32::NAN)
        } else {
            (lo.min(v), hi.max(v))
        }
    });

    Some((lo, hi))
}

/// Sum all the values of an image over all channels.
pub fn sum<T: PixelDtype, const C: usize>(image: &Image<T, C>) -> f64 {
    image.as_slice().iter().map(|v| v.into_f32() as f64).sum()
}

/// Count the values different from zero.
pub fn count_non_zero<T: PixelDtype, const C: usize>(image: &Image<T, C>) -> usize {
    image.as_slice().iter().filter(|v| !v.is_zero()).count()
}

/// Set every pixel of the image to `pixel`.
pub fn fill<T: Copy, const C: usize>(image: &mut Image<T, C>, pixel: [T; C]) {
    image
        .as_slice_mut()
        .chunks_exact_mut(C)
        .for_each(|dst| dst.copy_from_slice(&pixel));
}

/// Cast the pixel data of an image to a different type and scale it.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// # Examples
///
/// ```
/// use imgkit_image::{ops::cast_and_scale, Image, ImageSize};
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![0u8, 255]).unwrap();
///
/// let mut image_f32 = Image::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.as_slice(), &[0.0, 1.0]);
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp)
                .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })
}

/// Cast an image to another pixel type, rounding and saturating the values.
pub fn saturate_cast<T: PixelDtype, U: PixelDtype, const C: usize>(
    src: &Image<T, C>,
) -> Result<Image<U, C>, ImageError> {
    let data = src
        .as_slice()
        .iter()
        .map(|v| U::from_f32(v.into_f32()))
        .collect();
    Image::new(src.size(), data)
}

#[cfg(test)]
mod tests {
    use crate::{Image, ImageError, ImageSize};

    #[test]
    fn min_max_plain() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([4, 1].into(), vec![3.0, -1.0, 8.5, 0.0])?;
        assert_eq!(super::min_max(&image), Some((-1.0, 8.5)));
        Ok(())
    }

    #[test]
    fn min_max_nan_propagates() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([3, 1].into(), vec![3.0, f32::NAN, 8.5])?;
        let (lo, hi) = super::min_max(&image).ok_or(ImageError::InvalidHistogramBins(0))?;
        assert!(lo.is_nan() && hi.is_nan());

        let image = Image::<f32, 1>::new([2, 1].into(), vec![f32::NAN, 1.0])?;
        let (lo, hi) = super::min_max(&image).ok_or(ImageError::InvalidHistogramBins(0))?;
        assert!(lo.is_nan() && hi.is_nan());
        Ok(())
    }

    #[test]
    fn min_max_empty() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(ImageSize::default(), vec![])?;
        assert_eq!(super::min_max(&image), None);
        Ok(())
    }

    #[test]
    fn sum_and_count() -> Result<(), ImageError> {
        let image = Image::<u16, 1>::new([4, 1].into(), vec![0, 3, 0, 1000])?;
        assert_eq!(super::sum(&image), 1003.0);
        assert_eq!(super::count_non_zero(&image), 2);
        Ok(())
    }

    #[test]
    fn fill_pixels() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::from_size_val([2, 1].into(), 0)?;
        super::fill(&mut image, [255, 128, 0]);
        assert_eq!(image.as_slice(), &[255, 128, 0, 255, 128, 0]);
        Ok(())
    }

    #[test]
    fn cast_and_scale_u16() -> Result<(), ImageError> {
        let image = Image::<u16, 1>::new([3, 1].into(), vec![0, 1, 65535])?;
        let mut image_f32 = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
        super::cast_and_scale(&image, &mut image_f32, 1.0 / 65535.0)?;
        approx::assert_relative_eq!(image_f32.as_slice()[1], 1.5259e-5, epsilon = 1e-9);
        approx::assert_relative_eq!(image_f32.as_slice()[2], 1.0, epsilon = 1e-6);

        let mut wrong = Image::<f32, 1>::from_size_val([2, 1].into(), 0.0)?;
        assert!(super::cast_and_scale(&image, &mut wrong, 1.0).is_err());
        Ok(())
    }

    #[test]
    fn saturate_cast_to_u8() -> Result<(), ImageError> {
        let image = Image::<i32, 1>::new([3, 1].into(), vec![-5, 100, 4000])?;
        let image_u8 = super::saturate_cast::<_, u8, 1>(&image)?;
        assert_eq!(image_u8.as_slice(), &[0, 100, 255]);
        Ok(())
    }
}
