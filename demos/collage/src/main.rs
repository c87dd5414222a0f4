use argh::FromArgs;
use std::path::{Path, PathBuf};

use imgkit::image::{DynImage, Image};
use imgkit::imgproc::{
    self,
    collage::{Background, CollageSpec},
    font::BitmapFont,
    format::ImageFormats,
};

#[derive(FromArgs)]
/// Render synthetic blob images into a collage and save it as PNG
struct Args {
    /// width of the collage in pixels
    #[argh(option, short = 'w', default = "800")]
    width: usize,

    /// number of images per row
    #[argh(option, short = 'c', default = "3")]
    cols: usize,

    /// margin between cells in pixels
    #[argh(option, short = 'm', default = "5")]
    margin: usize,

    /// number of images to generate
    #[argh(option, short = 'n', default = "7")]
    count: usize,

    /// draw a caption below each image
    #[argh(switch)]
    captions: bool,

    /// use a white background instead of black
    #[argh(switch)]
    white: bool,

    /// scale of the caption font
    #[argh(option, default = "0.5")]
    font_scale: f32,

    /// json file with the collage spec, overrides the layout flags
    #[argh(option)]
    spec: Option<PathBuf>,

    /// path of the output png
    #[argh(option, short = 'o', default = "PathBuf::from(\"collage.png\")")]
    output: PathBuf,
}

const TILE_WIDTH: usize = 160;
const TILE_HEIGHT: usize = 120;
const BLOB_SIZE: usize = 31;

/// A float image with a few gaussian blobs whose positions depend on `seed`.
fn blob_image(seed: usize) -> Result<Image<f32, 1>, Box<dyn std::error::Error>> {
    let mut image = Image::<f32, 1>::from_size_val([TILE_WIDTH, TILE_HEIGHT].into(), 0.0)?;
    let kernel = imgproc::kernels::generate_gaussian_kernel(BLOB_SIZE, 0.0)?;

    let half = (BLOB_SIZE / 2) as isize;
    for k in 0..=seed % 4 {
        let x = ((seed * 37 + k * 53) % TILE_WIDTH) as isize - half;
        let y = ((seed * 23 + k * 41) % TILE_HEIGHT) as isize - half;
        imgproc::kernels::add_kernel_to_image(&mut image, &kernel, x, y);
    }

    Ok(image)
}

fn load_spec(args: &Args) -> Result<CollageSpec, Box<dyn std::error::Error>> {
    if let Some(path) = &args.spec {
        let spec = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        log::info!("loaded collage spec from {}", path.display());
        return Ok(spec);
    }

    Ok(CollageSpec {
        image_width_px: args.width,
        col_count: args.cols,
        margin_px: args.margin,
        do_captions: args.captions,
        background: if args.white {
            Background::White
        } else {
            Background::Black
        },
        font_scale: args.font_scale,
    })
}

/// Save a BGR canvas as an RGB png.
fn save_png(canvas: &Image<u8, 3>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut rgb = Image::<u8, 3>::from_size_val(canvas.size(), 0)?;
    imgproc::color::bgr_from_rgb(canvas, &mut rgb)?;

    let buffer = image::RgbImage::from_raw(
        canvas.width() as u32,
        canvas.height() as u32,
        rgb.into_vec(),
    )
    .ok_or("canvas does not fit an RGB buffer")?;
    buffer.save(path)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();
    let spec = load_spec(&args)?;

    let formats = ImageFormats::new();
    let ext = args
        .output
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if !formats.is_supported(ext) {
        log::warn!("unknown output extension {ext:?}, known: {:?}", formats.extensions());
    }

    // generate float images and map them to 8-bit the way they would be saved
    let mut images = Vec::with_capacity(args.count);
    let mut captions = Vec::with_capacity(args.count);
    for i in 0..args.count {
        let blobs = DynImage::Gray32F(blob_image(i)?);
        let stats = imgproc::core::compute_stats(&blobs);
        log::info!(
            "image {i}: {} sum {:.3} min {:.4} max {:.4}",
            blobs.describe(),
            stats.sum,
            stats.min_val,
            stats.max_val
        );

        let gray = imgproc::format::convert_for_save(&blobs, "png")?.unwrap_or(blobs);
        captions.push(format!("blobs #{i} {}", gray.describe()));
        images.push(gray);
    }

    let captions = captions.iter().map(|c| Some(c.as_str())).collect::<Vec<_>>();
    let mut canvas = Image::<u8, 3>::from_size_val([1, 1].into(), 0)?;
    imgproc::collage::render_collage(&images, &captions, &spec, &BitmapFont, &mut canvas)?;
    log::info!("collage is {}", canvas.size());

    save_png(&canvas, &args.output)?;
    log::info!("saved {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use imgkit::image::{Image, ImageSize};

    #[test]
    fn blob_image_has_values() -> Result<(), Box<dyn std::error::Error>> {
        let image = super::blob_image(3)?;
        assert_eq!(
            image.size(),
            ImageSize {
                width: super::TILE_WIDTH,
                height: super::TILE_HEIGHT,
            }
        );
        assert!(image.as_slice().iter().any(|&v| v > 0.0));
        Ok(())
    }

    #[test]
    fn save_png_swaps_to_rgb() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("canvas.png");

        let canvas = Image::<u8, 3>::from_size_pixel([3, 2].into(), [10, 20, 30])?;
        super::save_png(&canvas, &path)?;

        let loaded = image::open(&path)?.into_rgb8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(0, 0).0, [30, 20, 10]);
        Ok(())
    }
}
