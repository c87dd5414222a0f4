use crate::parallel;
use imgkit_image::{Image, ImageError};

// BT.601 luma weights in Q14 fixed point, in B, G, R order.
const BW: u32 = 1868;
const GW: u32 = 9617;
const RW: u32 = 4899;
const SHIFT: u32 = 14;

#[inline]
pub(crate) fn luma_bgr(b: u8, g: u8, r: u8) -> u8 {
    ((b as u32 * BW + g as u32 * GW + r as u32 * RW + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Convert a BGR8 image to grayscale using the formula:
///
/// Y = 0.114 * B + 0.587 * G + 0.299 * R
///
/// rounded to the nearest integer.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::color::gray_from_bgr_u8;
///
/// let image = Image::<u8, 3>::new([2, 1].into(), vec![255, 255, 255, 0, 0, 255]).unwrap();
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_bgr_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255, 76]);
/// ```
pub fn gray_from_bgr_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma_bgr(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(())
}

/// Convert a BGRA8 image to grayscale, ignoring the alpha channel.
///
/// Precondition: the input and output images must have the same size.
pub fn gray_from_bgra_u8(src: &Image<u8, 4>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma_bgr(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(())
}

/// Convert a grayscale image to a three channel image by replicating the value across all channels.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::color::rgb_from_gray;
///
/// let image = Image::<u8, 1>::new([2, 1].into(), vec![7, 9]).unwrap();
/// let mut rgb = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// rgb_from_gray(&image, &mut rgb).unwrap();
/// assert_eq!(rgb.as_slice(), &[7, 7, 7, 9, 9, 9]);
/// ```
pub fn rgb_from_gray<T>(src: &Image<T, 1>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
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
        dst_pixel[0] = src_pixel[0];
        dst_pixel[1] = src_pixel[0];
        dst_pixel[2] = src_pixel[0];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use imgkit_image::{Image, ImageError};

    #[test]
    fn gray_from_bgr_weights() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<u8, 3>::new(
            [3, 1].into(),
            vec![
                255, 0, 0,
                0, 255, 0,
                0, 0, 255,
            ],
        )?;
        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::gray_from_bgr_u8(&image, &mut gray)?;
        assert_eq!(gray.as_slice(), &[29, 150, 76]);
        Ok(())
    }

    #[test]
    fn gray_from_bgra_ignores_alpha() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::new([2, 1].into(), vec![10, 10, 10, 0, 200, 200, 200, 255])?;
        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::gray_from_bgra_u8(&image, &mut gray)?;
        assert_eq!(gray.as_slice(), &[10, 200]);
        Ok(())
    }

    #[test]
    fn rgb_from_gray_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val([2, 2].into(), 0.5)?;
        let mut rgb = Image::<f32, 3>::from_size_val([3, 2].into(), 0.0)?;
        assert_eq!(
            super::rgb_from_gray(&image, &mut rgb),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );
        Ok(())
    }
}
