use imgkit_image::{Image, ImageError, PixelDtype};
use rayon::prelude::*;

// Source coordinate sampled for destination index `d`, with pixel centers aligned.
#[inline]
fn source_coord(d: usize, scale: f32, src_len: usize) -> (usize, usize, f32) {
    let s = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
    let i0 = (s.trunc() as usize).min(src_len - 1);
    let i1 = (i0 + 1).min(src_len - 1);
    let frac = if i0 == src_len - 1 { 0.0 } else { s - i0 as f32 };
    (i0, i1, frac)
}

/// Resize an image to the size of `dst` using bilinear interpolation.
///
/// Sampling is half-pixel centered: destination pixel `(x, y)` reads the source
/// at `((x + 0.5) * sx - 0.5, (y + 0.5) * sy - 0.5)`, clamped to the border.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image. Its size sets the target size.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `src` is empty while `dst` is not.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::resize::resize_bilinear;
///
/// let image = Image::<u8, 1>::new([2, 1].into(), vec![0, 100]).unwrap();
/// let mut resized = Image::<u8, 1>::from_size_val([4, 1].into(), 0).unwrap();
///
/// resize_bilinear(&image, &mut resized).unwrap();
/// assert_eq!(resized.as_slice(), &[0, 25, 75, 100]);
/// ```
pub fn resize_bilinear<T: PixelDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError> {
    if dst.is_empty() {
        return Ok(());
    }

    if src.is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let (src_cols, src_rows) = (src.cols(), src.rows());
    let scale_x = src_cols as f32 / dst.cols() as f32;
    let scale_y = src_rows as f32 / dst.rows() as f32;

    // horizontal taps are shared by every row
    let x_taps = (0..dst.cols())
        .map(|x| source_coord(x, scale_x, src_cols))
        .collect::<Vec<_>>();

    let src_data = src.as_slice();
    let dst_cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let (y0, y1, fy) = source_coord(y, scale_y, src_rows);
            let row0 = &src_data[y0 * src_cols * C..(y0 + 1) * src_cols * C];
            let row1 = &src_data[y1 * src_cols * C..(y1 + 1) * src_cols * C];

            dst_row
                .chunks_exact_mut(C)
                .zip(x_taps.iter())
                .for_each(|(dst_pixel, &(x0, x1, fx))| {
                    let w00 = (1.0 - fx) * (1.0 - fy);
                    let w01 = fx * (1.0 - fy);
                    let w10 = (1.0 - fx) * fy;
                    let w11 = fx * fy;
                    for (k, d) in dst_pixel.iter_mut().enumerate() {
                        let v = row0[x0 * C + k].into_f32() * w00
                            + row0[x1 * C + k].into_f32() * w01
                            + row1[x0 * C + k].into_f32() * w10
                            + row1[x1 * C + k].into_f32() * w11;
                        *d = T::from_f32(v);
                    }
                });
        });

    Ok(())
}
