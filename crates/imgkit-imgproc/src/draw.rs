use imgkit_image::{Image, ImageError};
use std::cmp::{max, min};

/// Set a pixel's color, ignoring coordinates outside of the image.
#[inline]
pub(crate) fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a filled rectangle on an image inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `top_left` - The top-left corner coordinates (x, y).
/// * `bottom_right` - The bottom-right corner coordinates (x, y), exclusive.
/// * `color` - The fill color of the rectangle.
pub fn draw_filled_rect<const C: usize>(
    img: &mut Image<u8, C>,
    top_left: (i64, i64),
    bottom_right: (i64, i64),
    color: [u8; C],
) {
    let (x_start, y_start) = top_left;
    let (x_end, y_end) = bottom_right;

    // clamp to image bounds
    let x_min = max(0, min(x_start, x_end));
    let y_min = max(0, min(y_start, y_end));
    let x_max = min(img.cols() as i64, max(x_start, x_end));
    let y_max = min(img.rows() as i64, max(y_start, y_end));

    for y in y_min..y_max {
        for x in x_min..x_max {
            set_pixel(img, x, y, color);
        }
    }
}

/// Choose black or white text, whichever contrasts more with the BGR pixel at `(x, y)`.
///
/// The pixel luminance `l` is its grayscale value over 255; black wins when
/// `(l + 0.05) / 0.05 > (1.05 - l) / 0.05`.
///
/// # Errors
///
/// Returns [`ImageError::PixelIndexOutOfBounds`] if `(x, y)` is outside of the image.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::draw::compute_text_color;
///
/// let image = Image::<u8, 3>::from_size_pixel([1, 1].into(), [240, 240, 240]).unwrap();
/// assert_eq!(compute_text_color(&image, 0, 0).unwrap(), [0, 0, 0]);
/// ```
pub fn compute_text_color(img: &Image<u8, 3>, x: usize, y: usize) -> Result<[u8; 3], ImageError> {
    let [b, g, r] = img.get_pixel(x, y)?;

    let luminance = crate::color::luma_bgr(b, g, r) as f64 / 255.0;
    let contrast_with_black = (luminance + 0.05) / 0.05;
    let contrast_with_white = (1.05 - luminance) / 0.05;

    if contrast_with_black > contrast_with_white {
        Ok([0, 0, 0])
    } else {
        Ok([255, 255, 255])
    }
}
