use imgkit_image::{image::ensure_size, DynImage, Image, ImageError, ImageSize};

use crate::{
    color::rgb_from_gray,
    font::TextRenderer,
    resize::resize_bilinear,
    roi::copy_to_roi,
};

// Measured once to size the caption band of every row.
const SAMPLE_CAPTION: &str = "Foo1";

/// Background color of a collage canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Background {
    /// Black canvas, white captions.
    #[default]
    Black,
    /// White canvas, black captions.
    White,
}

impl Background {
    /// The canvas fill color.
    pub fn fill_color(&self) -> [u8; 3] {
        match self {
            Background::Black => [0, 0, 0],
            Background::White => [255, 255, 255],
        }
    }

    /// The caption color contrasting with the canvas.
    pub fn caption_color(&self) -> [u8; 3] {
        match self {
            Background::Black => [255, 255, 255],
            Background::White => [0, 0, 0],
        }
    }
}

/// Layout parameters of a collage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollageSpec {
    /// Width of the whole canvas in pixels.
    pub image_width_px: usize,
    /// Number of images per row.
    pub col_count: usize,
    /// Gap between cells and around the border in pixels.
    pub margin_px: usize,
    /// Whether to reserve a caption band below each row and draw captions.
    pub do_captions: bool,
    /// Canvas color.
    pub background: Background,
    /// Scale handed to the text renderer.
    pub font_scale: f32,
}

/// An error type for collage rendering.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CollageError {
    /// The layout cannot be realized.
    #[error("Invalid collage spec: {0}")]
    InvalidSpec(String),

    /// An image is neither 8-bit gray nor 8-bit BGR.
    #[error("Unsupported collage image {0} at index {1}, expected 8U or 8UC3")]
    UnsupportedImage(String, usize),

    /// An image does not share the layout of the first image.
    #[error("Collage image {0} at index {1} does not match the first image ({2})")]
    MixedLayouts(String, usize, String),

    /// Captions are given but not one per image.
    #[error("Got {0} captions for {1} images")]
    CaptionCountMismatch(usize, usize),

    /// An image operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Cell geometry derived from a spec and the first image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollageLayout {
    /// Width of each image cell.
    pub cell_width: usize,
    /// Height of each image cell.
    pub cell_height: usize,
    /// Number of grid rows.
    pub row_count: usize,
    /// Gap between the bottom of an image and its caption text.
    pub caption_margin: usize,
    /// Height reserved below each row for captions, margins included.
    pub caption_band: usize,
    /// Size of the whole canvas.
    pub canvas_size: ImageSize,
}

impl CollageLayout {
    /// Compute the layout for `image_count` images shaped like `first`.
    ///
    /// # Errors
    ///
    /// Returns [`CollageError::InvalidSpec`] if the spec leaves no room for a cell.
    pub fn new(
        spec: &CollageSpec,
        first: ImageSize,
        image_count: usize,
        font: &impl TextRenderer,
    ) -> Result<Self, CollageError> {
        if spec.col_count == 0 {
            return Err(CollageError::InvalidSpec("col_count must be at least 1".into()));
        }
        if first.width == 0 || first.height == 0 {
            return Err(CollageError::InvalidSpec(format!("first image is empty ({first})")));
        }
        if spec.do_captions && (spec.font_scale.is_nan() || spec.font_scale <= 0.0) {
            return Err(CollageError::InvalidSpec(format!(
                "font_scale must be positive, got {}",
                spec.font_scale
            )));
        }

        let overflow = |what: &str| CollageError::InvalidSpec(format!("{what} overflows"));

        let total_margin = spec
            .col_count
            .checked_add(1)
            .and_then(|gaps| gaps.checked_mul(spec.margin_px))
            .ok_or_else(|| overflow("total margin"))?;
        let usable_width = spec.image_width_px.saturating_sub(total_margin);
        let cell_width = usable_width / spec.col_count;
        if cell_width == 0 {
            return Err(CollageError::InvalidSpec(format!(
                "canvas width {} leaves no room for {} columns with margin {}",
                spec.image_width_px, spec.col_count, spec.margin_px
            )));
        }

        // floor(usable_width / (col_count * width) * height) without float rounding
        let cell_height = usable_width
            .checked_mul(first.height)
            .zip(spec.col_count.checked_mul(first.width))
            .map(|(num, den)| num / den)
            .ok_or_else(|| overflow("cell height"))?;
        if cell_height == 0 {
            return Err(CollageError::InvalidSpec(format!(
                "cells of width {cell_width} for a {first} image have no height"
            )));
        }

        let (caption_margin, caption_band) = if spec.do_captions {
            let text_height = font.text_size(SAMPLE_CAPTION, spec.font_scale).height;
            let margin = text_height / 2;
            (margin, text_height + 2 * margin)
        } else {
            (0, 0)
        };

        let row_count = image_count.div_ceil(spec.col_count);
        let canvas_height = cell_height
            .checked_add(caption_band)
            .and_then(|row| row.checked_mul(row_count))
            .zip((row_count + 1).checked_mul(spec.margin_px))
            .and_then(|(rows, margins)| rows.checked_add(margins))
            .ok_or_else(|| overflow("canvas height"))?;

        Ok(Self {
            cell_width,
            cell_height,
            row_count,
            caption_margin,
            caption_band,
            canvas_size: ImageSize {
                width: spec.image_width_px,
                height: canvas_height,
            },
        })
    }

    /// Top-left corner of the image cell at `index`.
    pub fn cell_origin(&self, spec: &CollageSpec, index: usize) -> (usize, usize) {
        let row = index / spec.col_count;
        let col = index % spec.col_count;
        let x = col * self.cell_width + (col + 1) * spec.margin_px;
        let y = row * self.cell_height + (row + 1) * spec.margin_px + row * self.caption_band;
        (x, y)
    }
}

fn check_images(images: &[DynImage]) -> Result<(), CollageError> {
    let Some(first) = images.first() else {
        return Ok(());
    };

    for (i, image) in images.iter().enumerate() {
        if !matches!(image, DynImage::Gray8(_) | DynImage::Bgr8(_)) {
            return Err(CollageError::UnsupportedImage(image.type_name().into(), i));
        }
        if std::mem::discriminant(image) != std::mem::discriminant(first) {
            return Err(CollageError::MixedLayouts(
                image.type_name().into(),
                i,
                first.type_name().into(),
            ));
        }
    }

    Ok(())
}

// Resize an 8-bit gray or BGR image to the cell size as BGR.
fn render_cell(
    image: &DynImage,
    index: usize,
    cell_size: ImageSize,
) -> Result<Image<u8, 3>, CollageError> {
    let mut cell = Image::<u8, 3>::from_size_val(cell_size, 0)?;
    match image {
        DynImage::Gray8(img) => {
            let mut scaled = Image::<u8, 1>::from_size_val(cell_size, 0)?;
            resize_bilinear(img, &mut scaled)?;
            rgb_from_gray(&scaled, &mut cell)?;
        }
        DynImage::Bgr8(img) => resize_bilinear(img, &mut cell)?,
        other => {
            return Err(CollageError::UnsupportedImage(other.type_name().into(), index));
        }
    }
    Ok(cell)
}

// Drop characters from the end until the caption is narrower than the cell, keeping at least one.
fn fit_caption<'a>(caption: &'a str, max_width: usize, scale: f32, font: &impl TextRenderer) -> &'a str {
    let mut fitted = caption;
    while font.text_size(fitted, scale).width >= max_width {
        let mut chars = fitted.char_indices();
        let Some((last, _)) = chars.next_back() else {
            break;
        };
        if last == 0 {
            break;
        }
        fitted = &fitted[..last];
    }
    fitted
}

/// Render images into a grid with optional captions below each image.
///
/// Every image is resized to the cell size derived from the first image, so
/// images with a different aspect ratio are stretched. Gray images are drawn as
/// three equal channels. The canvas `dst` is reallocated to fit the grid and
/// filled with the background color; its previous content is discarded.
///
/// # Arguments
///
/// * `images` - 8-bit gray or 8-bit BGR images, all with the same layout.
/// * `captions` - One caption per image, or empty for none. `None` and empty
///   strings leave the cell without caption.
/// * `spec` - The layout parameters.
/// * `font` - The renderer used to measure and draw captions.
/// * `dst` - The output canvas.
///
/// # Errors
///
/// Fails if an image has another layout, if the captions do not match the
/// images or if the spec leaves no room for the cells.
///
/// # Example
///
/// ```
/// use imgkit_image::{DynImage, Image};
/// use imgkit_imgproc::collage::{render_collage, Background, CollageSpec};
/// use imgkit_imgproc::font::BitmapFont;
///
/// let images = vec![
///     DynImage::Gray8(Image::from_size_val([10, 10].into(), 128).unwrap()),
///     DynImage::Gray8(Image::from_size_val([10, 10].into(), 255).unwrap()),
/// ];
/// let spec = CollageSpec {
///     image_width_px: 50,
///     col_count: 2,
///     margin_px: 2,
///     do_captions: false,
///     background: Background::Black,
///     font_scale: 1.0,
/// };
///
/// let mut canvas = Image::<u8, 3>::from_size_val([1, 1].into(), 0).unwrap();
/// render_collage(&images, &[], &spec, &BitmapFont, &mut canvas).unwrap();
///
/// assert_eq!(canvas.width(), 50);
/// assert_eq!(canvas.height(), 22 + 2 * 2);
/// ```
pub fn render_collage(
    images: &[DynImage],
    captions: &[Option<&str>],
    spec: &CollageSpec,
    font: &impl TextRenderer,
    dst: &mut Image<u8, 3>,
) -> Result<(), CollageError> {
    let Some(first) = images.first() else {
        return Ok(());
    };

    check_images(images)?;
    if !captions.is_empty() && captions.len() != images.len() {
        return Err(CollageError::CaptionCountMismatch(captions.len(), images.len()));
    }

    let layout = CollageLayout::new(spec, first.size(), images.len(), font)?;
    log::debug!(
        "collage of {} images: {} rows, cells {}x{}, caption band {}, canvas {}",
        images.len(),
        layout.row_count,
        layout.cell_width,
        layout.cell_height,
        layout.caption_band,
        layout.canvas_size
    );

    ensure_size(dst, layout.canvas_size, 0)?;
    imgkit_image::ops::fill(dst, spec.background.fill_color());

    let cell_size = ImageSize {
        width: layout.cell_width,
        height: layout.cell_height,
    };
    let caption_color = spec.background.caption_color();

    for (i, image) in images.iter().enumerate() {
        let (x, y) = layout.cell_origin(spec, i);
        let cell = render_cell(image, i, cell_size)?;
        copy_to_roi(&cell, dst, x, y)?;

        if !spec.do_captions {
            continue;
        }
        let Some(caption) = captions.get(i).copied().flatten().filter(|c| !c.is_empty()) else {
            continue;
        };

        let text = fit_caption(caption, layout.cell_width, spec.font_scale, font);
        let text_size = font.text_size(text, spec.font_scale);
        let origin = (
            x as i64 + (layout.cell_width as i64 - text_size.width as i64) / 2,
            (y + layout.cell_height + text_size.height + layout.caption_margin) as i64,
        );
        font.put_text(dst, text, origin, spec.font_scale, caption_color);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Background, CollageError, CollageLayout, CollageSpec};
    use crate::font::{BitmapFont, TextRenderer};
    use imgkit_image::{DynImage, Image, ImageSize};

    fn spec(width: usize, cols: usize, margin: usize, captions: bool) -> CollageSpec {
        CollageSpec {
            image_width_px: width,
            col_count: cols,
            margin_px: margin,
            do_captions: captions,
            background: Background::White,
            font_scale: 1.0 / 3.0,
        }
    }

    #[test]
    fn layout_without_captions() -> Result<(), CollageError> {
        let layout = CollageLayout::new(&spec(100, 3, 4, false), [40, 20].into(), 5, &BitmapFont)?;
        // (100 - 16) / 3 = 28, scale 84 / 120 = 0.7
        assert_eq!(layout.cell_width, 28);
        assert_eq!(layout.cell_height, 14);
        assert_eq!(layout.row_count, 2);
        assert_eq!(layout.caption_band, 0);
        assert_eq!(layout.canvas_size, ImageSize { width: 100, height: 2 * 14 + 3 * 4 });
        assert_eq!(layout.cell_origin(&spec(100, 3, 4, false), 4), (28 + 8, 14 + 8));
        Ok(())
    }

    #[test]
    fn layout_caption_band() -> Result<(), CollageError> {
        let spec = spec(100, 2, 0, true);
        let layout = CollageLayout::new(&spec, [10, 10].into(), 3, &BitmapFont)?;
        // sample text is 7 pixels high at one pixel per block
        assert_eq!(layout.caption_margin, 3);
        assert_eq!(layout.caption_band, 13);
        assert_eq!(layout.canvas_size.height, 2 * 50 + 2 * 13);
        assert_eq!(layout.cell_origin(&spec, 2), (0, 50 + 13));
        Ok(())
    }

    #[test]
    fn invalid_specs() {
        let font = BitmapFont;
        let size: ImageSize = [10, 10].into();
        let is_invalid = |spec: CollageSpec, size: ImageSize| {
            matches!(
                CollageLayout::new(&spec, size, 1, &font),
                Err(CollageError::InvalidSpec(_))
            )
        };
        assert!(is_invalid(spec(100, 0, 0, false), size));
        assert!(is_invalid(spec(10, 2, 4, false), size));
        assert!(is_invalid(spec(100, 1, 0, false), [0, 10].into()));
        assert!(is_invalid(spec(100, 1, 0, false), [1000, 1].into()));
        let mut no_font = spec(100, 1, 0, true);
        no_font.font_scale = 0.0;
        assert!(is_invalid(no_font, size));
    }

    #[test]
    fn overflowing_specs() {
        let font = BitmapFont;
        let is_invalid = |spec: CollageSpec, size: ImageSize, count: usize| {
            matches!(
                CollageLayout::new(&spec, size, count, &font),
                Err(CollageError::InvalidSpec(_))
            )
        };
        assert!(is_invalid(spec(100, 2, usize::MAX / 2, false), [10, 10].into(), 1));
        assert!(is_invalid(spec(100, usize::MAX, 1, false), [10, 10].into(), 1));
        assert!(is_invalid(spec(usize::MAX, 1, 0, false), [2, usize::MAX].into(), 1));
        assert!(is_invalid(spec(1000, 1, 0, false), [1, usize::MAX / 1000].into(), 2));
    }

    #[test]
    fn fit_caption_truncates_from_end() {
        let font = BitmapFont;
        // six pixels per character at this scale
        assert_eq!(super::fit_caption("abcdef", 19, 1.0 / 3.0, &font), "abc");
        assert_eq!(super::fit_caption("abcdef", 18, 1.0 / 3.0, &font), "ab");
        assert_eq!(super::fit_caption("abcdef", 100, 1.0 / 3.0, &font), "abcdef");
        assert_eq!(super::fit_caption("éé", 1, 1.0 / 3.0, &font), "é");
        assert_eq!(font.text_size("ab", 1.0 / 3.0).width, 12);
    }

    #[test]
    fn rejects_bad_inputs() -> Result<(), Box<dyn std::error::Error>> {
        let gray = DynImage::Gray8(Image::from_size_val([4, 4].into(), 0)?);
        let bgr = DynImage::Bgr8(Image::from_size_val([4, 4].into(), 0)?);
        let float = DynImage::Gray32F(Image::from_size_val([4, 4].into(), 0.0)?);
        let spec = spec(20, 1, 0, false);
        let mut dst = Image::<u8, 3>::from_size_val([1, 1].into(), 7)?;

        assert_eq!(
            super::render_collage(&[gray.clone(), bgr], &[], &spec, &BitmapFont, &mut dst),
            Err(CollageError::MixedLayouts("8UC3".into(), 1, "8U".into()))
        );
        assert_eq!(
            super::render_collage(&[float], &[], &spec, &BitmapFont, &mut dst),
            Err(CollageError::UnsupportedImage("32F".into(), 0))
        );
        assert_eq!(
            super::render_collage(&[gray], &[None, None], &spec, &BitmapFont, &mut dst),
            Err(CollageError::CaptionCountMismatch(2, 1))
        );
        // failed calls leave the canvas alone
        assert_eq!(dst.as_slice(), &[7, 7, 7]);
        Ok(())
    }

    #[test]
    fn empty_input_is_noop() -> Result<(), Box<dyn std::error::Error>> {
        let mut dst = Image::<u8, 3>::from_size_val([2, 1].into(), 5)?;
        super::render_collage(&[], &[], &spec(0, 0, 0, true), &BitmapFont, &mut dst)?;
        assert_eq!(dst.as_slice(), &[5; 6]);
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn spec_from_json() -> Result<(), Box<dyn std::error::Error>> {
        let spec: CollageSpec = serde_json::from_str(
            r#"{
                "image_width_px": 800,
                "col_count": 3,
                "margin_px": 5,
                "do_captions": true,
                "background": "white",
                "font_scale": 0.5
            }"#,
        )?;
        assert_eq!(spec.background, Background::White);
        assert_eq!(spec.col_count, 3);
        Ok(())
    }
}
