use crate::parallel;
use imgkit_image::{Image, ImageError};

/// Swap the first and third channels of an image, turning RGB into BGR and back.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::color::bgr_from_rgb;
///
/// let image = Image::<u8, 3>::new([1, 1].into(), vec![1, 2, 3]).unwrap();
/// let mut bgr = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// bgr_from_rgb(&image, &mut bgr).unwrap();
/// assert_eq!(bgr.as_slice(), &[3, 2, 1]);
/// ```
pub fn bgr_from_rgb<T>(src: &Image<T, 3>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter().rev())
            .for_each(|(d, s)| {
                *d = *s;
            });
    });

    Ok(())
}

/// Drop the alpha channel of a BGRA image.
///
/// Precondition: the input and output images must have the same size.
pub fn bgr_from_bgra<T>(src: &Image<T, 4>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.copy_from_slice(&src_pixel[..3]);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use imgkit_image::{Image, ImageError};

    #[test]
    fn bgr_from_rgb_twice_is_identity() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::new([2, 1].into(), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6])?;
        let mut swapped = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        let mut back = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        super::bgr_from_rgb(&image, &mut swapped)?;
        assert_eq!(swapped.as_slice(), &[0.3, 0.2, 0.1, 0.6, 0.5, 0.4]);
        super::bgr_from_rgb(&swapped, &mut back)?;
        assert_eq!(back, image);
        Ok(())
    }

    #[test]
    fn bgr_from_bgra_drops_alpha() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::new([2, 1].into(), vec![1, 2, 3, 4, 5, 6, 7, 8])?;
        let mut bgr = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::bgr_from_bgra(&image, &mut bgr)?;
        assert_eq!(bgr.as_slice(), &[1, 2, 3, 5, 6, 7]);
        Ok(())
    }
}
