use std::collections::HashMap;

use imgkit_image::{ops::saturate_cast, DynImage, Image, ImageError, PixelDtype};

use crate::{
    color::{bgr_from_bgra, bgr_from_rgb, gray_from_bgr_u8, gray_from_bgra_u8, rgb_from_gray},
    histogram::{hist_percentiles, hist_percentiles_f32},
    normalize::img_to_u8,
};

// Not every platform can encode every one of these.
const IMAGE_EXTENSIONS: [&str; 21] = [
    "jpg", "jpeg", "tif", "tiff", "png", "bmp", "jpe", "ppm", "pgm", "pnm", "ras", "dib", "pxm",
    "jp2", "webp", "exr", "hdr", "pfm", "sr", "pic", "pbm",
];

// Percentiles mapped to 0 and 255 when saving high depth images to 8-bit formats.
const SAVE_LOW_PERCENTILE: f32 = 1.0;
const SAVE_HIGH_PERCENTILE: f32 = 99.0;

/// The image file extensions known to the library and their file dialog filters.
///
/// # Example
///
/// ```
/// use imgkit_imgproc::format::ImageFormats;
///
/// let formats = ImageFormats::new();
///
/// assert!(formats.is_supported(".PNG"));
/// assert_eq!(formats.filter_string("tif"), Some("tif|*.tif"));
/// ```
#[derive(Clone, Debug)]
pub struct ImageFormats {
    extensions: Vec<&'static str>,
    filter_strings: HashMap<&'static str, String>,
}

impl ImageFormats {
    /// Build the table of extensions.
    pub fn new() -> Self {
        let extensions = IMAGE_EXTENSIONS.to_vec();
        let filter_strings = extensions
            .iter()
            .map(|&ext| (ext, format!("{ext}|*.{ext}")))
            .collect();
        Self {
            extensions,
            filter_strings,
        }
    }

    /// All extensions without the leading period, in a fixed order.
    pub fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    /// A map of every extension to its `ext|*.ext` filter string.
    pub fn filter_strings(&self) -> &HashMap<&'static str, String> {
        &self.filter_strings
    }

    /// The filter string of an extension, given with or without the period.
    pub fn filter_string(&self, ext: &str) -> Option<&str> {
        self.filter_strings
            .get(normalize_extension(ext).as_str())
            .map(String::as_str)
    }

    /// Whether an extension, given with or without the period, is known.
    pub fn is_supported(&self, ext: &str) -> bool {
        self.filter_strings
            .contains_key(normalize_extension(ext).as_str())
    }
}

impl Default for ImageFormats {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a leading period and lowercase an extension.
///
/// # Example
///
/// ```
/// use imgkit_imgproc::format::normalize_extension;
///
/// assert_eq!(normalize_extension(".TIFF"), "tiff");
/// assert_eq!(normalize_extension("png"), "png");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
}

fn is_tiff(ext: &str) -> bool {
    ext == "tif" || ext == "tiff"
}

fn unsupported(image: &DynImage, ext: &str) -> ImageError {
    ImageError::UnsupportedPixelType(image.type_name().to_string(), format!("saving as {ext}"))
}

/// Fix up an image just loaded from a file with the given extension.
///
/// TIFF decoding hands 8-bit color back with red and blue swapped, and with
/// an alpha channel the rest of the library does not use.
///
/// # Returns
///
/// The converted image, or `None` if the image needs no conversion.
pub fn convert_after_load(image: &DynImage, ext: &str) -> Result<Option<DynImage>, ImageError> {
    let ext = normalize_extension(ext);
    if !is_tiff(&ext) {
        return Ok(None);
    }

    let converted = match image {
        DynImage::Bgr8(img) => {
            let mut swapped = Image::<u8, 3>::from_size_val(img.size(), 0)?;
            bgr_from_rgb(img, &mut swapped)?;
            swapped
        }
        DynImage::Bgra8(img) => {
            let mut bgr = Image::<u8, 3>::from_size_val(img.size(), 0)?;
            bgr_from_bgra(img, &mut bgr)?;
            bgr
        }
        _ => return Ok(None),
    };

    log::debug!("converted {} loaded from {ext} to 8UC3", image.type_name());
    Ok(Some(DynImage::Bgr8(converted)))
}

fn to_u8_by_percentiles<T: PixelDtype>(
    img: &Image<T, 1>,
    (low, high): (f32, f32),
) -> Result<DynImage, ImageError> {
    let mut dst = Image::<u8, 1>::from_size_val(img.size(), 0)?;
    img_to_u8(img, &mut dst, low, high)?;
    Ok(DynImage::Gray8(dst))
}

fn gray_to_bgr<T: PixelDtype>(img: &Image<T, 1>) -> Result<Image<u8, 3>, ImageError> {
    let gray = saturate_cast::<T, u8, 1>(img)?;
    let mut bgr = Image::<u8, 3>::from_size_val(img.size(), 0)?;
    rgb_from_gray(&gray, &mut bgr)?;
    Ok(bgr)
}

/// Convert an image so that it can be saved to a file with the given extension.
///
/// The rules are tried in order:
///
/// 1. 16-bit, 32-bit integer and float gray images going to a format other
///    than TIFF are mapped to 8-bit between their 1st and 99th percentiles.
/// 2. 32-bit integer gray images going to TIFF become float.
/// 3. `ppm` takes 8-bit BGR: gray is expanded and alpha dropped.
/// 4. `pbm` and `pgm` take 8-bit gray: color is converted to luma.
///
/// # Returns
///
/// The converted image, or `None` if the image can be saved as is.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedPixelType`] if `ppm`, `pbm` or `pgm` cannot
/// hold the image.
///
/// # Example
///
/// ```
/// use imgkit_image::{DynImage, Image};
/// use imgkit_imgproc::format::convert_for_save;
///
/// let image = DynImage::Gray32S(Image::from_size_val([2, 2].into(), 7).unwrap());
///
/// let converted = convert_for_save(&image, ".tif").unwrap().unwrap();
/// assert_eq!(converted.type_name(), "32F");
/// ```
pub fn convert_for_save(image: &DynImage, ext: &str) -> Result<Option<DynImage>, ImageError> {
    let ext = normalize_extension(ext);

    let converted = match image {
        DynImage::Gray16(img) if !is_tiff(&ext) => {
            to_u8_by_percentiles(img, hist_percentiles(image, SAVE_LOW_PERCENTILE, SAVE_HIGH_PERCENTILE)?)?
        }
        DynImage::Gray32F(img) if !is_tiff(&ext) => {
            to_u8_by_percentiles(img, hist_percentiles(image, SAVE_LOW_PERCENTILE, SAVE_HIGH_PERCENTILE)?)?
        }
        DynImage::Gray32S(img) if !is_tiff(&ext) => {
            let img_f32 = img.cast::<f32>()?;
            let range = hist_percentiles_f32(&img_f32, SAVE_LOW_PERCENTILE, SAVE_HIGH_PERCENTILE)?;
            to_u8_by_percentiles(img, range)?
        }
        DynImage::Gray32S(img) => DynImage::Gray32F(img.cast::<f32>()?),
        _ if ext == "ppm" => match image {
            DynImage::Gray8(img) => DynImage::Bgr8(gray_to_bgr(img)?),
            DynImage::Gray16(img) => DynImage::Bgr8(gray_to_bgr(img)?),
            DynImage::Gray32S(img) => DynImage::Bgr8(gray_to_bgr(img)?),
            DynImage::Gray32F(img) => DynImage::Bgr8(gray_to_bgr(img)?),
            DynImage::Bgr8(_) => return Ok(None),
            DynImage::Bgra8(img) => {
                let mut bgr = Image::<u8, 3>::from_size_val(img.size(), 0)?;
                bgr_from_bgra(img, &mut bgr)?;
                DynImage::Bgr8(bgr)
            }
            DynImage::Bgr32F(_) => return Err(unsupported(image, &ext)),
        },
        _ if ext == "pbm" || ext == "pgm" => match image {
            DynImage::Gray8(img) => DynImage::Gray8(img.clone()),
            DynImage::Gray16(img) => DynImage::Gray8(saturate_cast(img)?),
            DynImage::Gray32S(img) => DynImage::Gray8(saturate_cast(img)?),
            DynImage::Gray32F(img) => DynImage::Gray8(saturate_cast(img)?),
            DynImage::Bgr8(img) => {
                let mut gray = Image::<u8, 1>::from_size_val(img.size(), 0)?;
                gray_from_bgr_u8(img, &mut gray)?;
                DynImage::Gray8(gray)
            }
            DynImage::Bgra8(img) => {
                let mut gray = Image::<u8, 1>::from_size_val(img.size(), 0)?;
                gray_from_bgra_u8(img, &mut gray)?;
                DynImage::Gray8(gray)
            }
            DynImage::Bgr32F(_) => return Err(unsupported(image, &ext)),
        },
        _ => return Ok(None),
    };

    log::debug!(
        "converted {} to {} for saving as {ext}",
        image.describe(),
        converted.type_name()
    );
    Ok(Some(converted))
}

#[cfg(test)]
mod tests {
    use super::{convert_after_load, convert_for_save, ImageFormats};
    use imgkit_image::{DynImage, Image, ImageError};

    #[test]
    fn formats_table() {
        let formats = ImageFormats::new();
        assert_eq!(formats.extensions().len(), 21);
        assert_eq!(formats.filter_strings().len(), 21);
        assert!(formats.is_supported(".JPG"));
        assert!(formats.is_supported("pbm"));
        assert!(!formats.is_supported("xyz"));
        assert_eq!(formats.filter_string(".WebP"), Some("webp|*.webp"));
        assert_eq!(formats.filter_string("gif"), None);
    }

    #[test]
    fn after_load_swaps_tiff_color() -> Result<(), ImageError> {
        let bgr = DynImage::Bgr8(Image::new([1, 1].into(), vec![1, 2, 3])?);
        assert_eq!(
            convert_after_load(&bgr, "TIF")?,
            Some(DynImage::Bgr8(Image::new([1, 1].into(), vec![3, 2, 1])?))
        );
        assert_eq!(convert_after_load(&bgr, "png")?, None);

        let bgra = DynImage::Bgra8(Image::new([1, 1].into(), vec![1, 2, 3, 4])?);
        assert_eq!(
            convert_after_load(&bgra, ".tiff")?,
            Some(DynImage::Bgr8(Image::new([1, 1].into(), vec![1, 2, 3])?))
        );

        let gray = DynImage::Gray16(Image::from_size_val([2, 2].into(), 5)?);
        assert_eq!(convert_after_load(&gray, "tif")?, None);
        Ok(())
    }

    #[test]
    fn save_high_depth_as_8bit() -> Result<(), ImageError> {
        let data = (0..100u16).map(|v| v * 100).collect();
        let gray16 = DynImage::Gray16(Image::new([10, 10].into(), data)?);

        let Some(DynImage::Gray8(converted)) = convert_for_save(&gray16, "png")? else {
            panic!("expected an 8-bit gray image");
        };
        // the 1st percentile is the smallest value
        assert_eq!(converted.as_slice()[0], 0);
        assert_eq!(converted.as_slice()[1], 3);
        assert_eq!(converted.as_slice()[99], 255);

        // tiff keeps 16-bit
        assert_eq!(convert_for_save(&gray16, "tiff")?, None);
        Ok(())
    }

    #[test]
    fn save_i32() -> Result<(), ImageError> {
        let gray32s = DynImage::Gray32S(Image::new([2, 1].into(), vec![-4, 10])?);
        assert_eq!(
            convert_for_save(&gray32s, "tif")?,
            Some(DynImage::Gray32F(Image::new([2, 1].into(), vec![-4.0, 10.0])?))
        );
        let converted = convert_for_save(&gray32s, "jpg")?;
        assert!(matches!(converted, Some(DynImage::Gray8(_))));
        Ok(())
    }

    #[test]
    fn save_ppm() -> Result<(), ImageError> {
        let bgra = DynImage::Bgra8(Image::new([1, 1].into(), vec![1, 2, 3, 4])?);
        assert_eq!(
            convert_for_save(&bgra, "ppm")?,
            Some(DynImage::Bgr8(Image::new([1, 1].into(), vec![1, 2, 3])?))
        );

        let gray = DynImage::Gray8(Image::new([1, 1].into(), vec![9])?);
        assert_eq!(
            convert_for_save(&gray, ".PPM")?,
            Some(DynImage::Bgr8(Image::new([1, 1].into(), vec![9, 9, 9])?))
        );

        let bgr = DynImage::Bgr8(Image::new([1, 1].into(), vec![1, 2, 3])?);
        assert_eq!(convert_for_save(&bgr, "ppm")?, None);

        let bgr32f = DynImage::Bgr32F(Image::from_size_val([1, 1].into(), 0.5)?);
        assert!(matches!(
            convert_for_save(&bgr32f, "ppm"),
            Err(ImageError::UnsupportedPixelType(..))
        ));
        assert_eq!(convert_for_save(&bgr32f, "exr")?, None);
        Ok(())
    }

    #[test]
    fn save_pgm() -> Result<(), ImageError> {
        let bgr = DynImage::Bgr8(Image::new([1, 1].into(), vec![0, 0, 255])?);
        assert_eq!(
            convert_for_save(&bgr, "pgm")?,
            Some(DynImage::Gray8(Image::new([1, 1].into(), vec![76])?))
        );

        let gray = DynImage::Gray8(Image::new([1, 1].into(), vec![9])?);
        assert_eq!(convert_for_save(&gray, "pbm")?, Some(gray.clone()));

        let bgr32f = DynImage::Bgr32F(Image::from_size_val([1, 1].into(), 0.5)?);
        assert!(convert_for_save(&bgr32f, "pbm").is_err());
        Ok(())
    }
}
