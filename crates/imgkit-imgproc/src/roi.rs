use imgkit_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// A rectangular region of an image in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// x-coordinate of the top-left corner.
    pub x: usize,
    /// y-coordinate of the top-left corner.
    pub y: usize,
    /// Width of the region.
    pub width: usize,
    /// Height of the region.
    pub height: usize,
}

impl Rect {
    /// Create a new region.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the region lies within an image of the given size.
    pub fn fits_in<T, const C: usize>(&self, image: &Image<T, C>) -> bool {
        self.x + self.width <= image.cols() && self.y + self.height <= image.rows()
    }

    /// Whether the pixel `(x, y)` lies in the region.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    fn out_of_bounds<T, const C: usize>(&self, image: &Image<T, C>) -> ImageError {
        ImageError::InvalidRoi(
            self.x,
            self.y,
            self.width,
            self.height,
            image.cols(),
            image.rows(),
        )
    }
}

/// Copy a whole image into a region of another image.
///
/// # Arguments
///
/// * `src` - The image to copy.
/// * `dst` - The destination image.
/// * `x` - The x-coordinate in `dst` of the top-left corner of `src`.
/// * `y` - The y-coordinate in `dst` of the top-left corner of `src`.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRoi`] if `src` does not fit in `dst` at `(x, y)`.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::roi::copy_to_roi;
///
/// let src = Image::<u8, 1>::from_size_val([2, 1].into(), 9).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val([3, 2].into(), 0).unwrap();
///
/// copy_to_roi(&src, &mut dst, 1, 1).unwrap();
/// assert_eq!(dst.as_slice(), &[0, 0, 0, 0, 9, 9]);
/// ```
pub fn copy_to_roi<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let roi = Rect::new(x, y, src.cols(), src.rows());
    if !roi.fits_in(dst) {
        return Err(roi.out_of_bounds(dst));
    }

    if src.is_empty() {
        return Ok(());
    }

    let dst_cols = dst.cols();
    let src_row_len = src.cols() * C;

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .skip(y)
        .take(src.rows())
        .zip(src.as_slice().par_chunks_exact(src_row_len))
        .for_each(|(dst_row, src_row)| {
            dst_row[x * C..x * C + src_row_len].copy_from_slice(src_row);
        });

    Ok(())
}

/// Set every value outside of a region to zero.
///
/// # Errors
///
/// Returns [`ImageError::InvalidRoi`] if the region does not fit in the image.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::roi::{zero_outside_roi, Rect};
///
/// let mut image = Image::<f32, 1>::from_size_val([3, 2].into(), 1.0).unwrap();
///
/// zero_outside_roi(&mut image, Rect::new(1, 0, 2, 1)).unwrap();
/// assert_eq!(image.as_slice(), &[0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
/// ```
pub fn zero_outside_roi(image: &mut Image<f32, 1>, roi: Rect) -> Result<(), ImageError> {
    if !roi.fits_in(image) {
        return Err(roi.out_of_bounds(image));
    }

    let cols = image.cols().max(1);
    image
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, row)| {
            row.iter_mut().enumerate().for_each(|(x, v)| {
                if !roi.contains(x, y) {
                    *v = 0.0;
                }
            });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Rect;
    use imgkit_image::{Image, ImageError};

    #[test]
    fn copy_to_roi_color() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::from_size_pixel([1, 2].into(), [1, 2, 3])?;
        let mut dst = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;
        super::copy_to_roi(&src, &mut dst, 1, 0)?;
        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 0, 0, 1, 2, 3,
                0, 0, 0, 1, 2, 3,
            ]
        );
        Ok(())
    }

    #[test]
    fn copy_to_roi_out_of_bounds() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([2, 2].into(), 1)?;
        let mut dst = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        assert_eq!(
            super::copy_to_roi(&src, &mut dst, 2, 0),
            Err(ImageError::InvalidRoi(2, 0, 2, 2, 3, 3))
        );
        Ok(())
    }

    #[test]
    fn zero_outside_full_roi_keeps_all() -> Result<(), ImageError> {
        let mut image = Image::<f32, 1>::from_size_val([2, 2].into(), 3.0)?;
        super::zero_outside_roi(&mut image, Rect::new(0, 0, 2, 2))?;
        assert_eq!(image.as_slice(), &[3.0; 4]);

        assert!(super::zero_outside_roi(&mut image, Rect::new(1, 1, 2, 1)).is_err());
        Ok(())
    }
}
