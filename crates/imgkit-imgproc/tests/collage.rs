use imgkit_image::{DynImage, Image};
use imgkit_imgproc::{
    collage::{render_collage, Background, CollageSpec},
    font::{BitmapFont, TextRenderer},
};

fn spec(do_captions: bool, background: Background) -> CollageSpec {
    CollageSpec {
        image_width_px: 70,
        col_count: 2,
        margin_px: 10,
        do_captions,
        background,
        font_scale: 1.0 / 3.0,
    }
}

fn region_is<const C: usize>(
    img: &Image<u8, C>,
    (x0, y0): (usize, usize),
    (w, h): (usize, usize),
    pixel: [u8; C],
) -> bool {
    (y0..y0 + h).all(|y| (x0..x0 + w).all(|x| img.get_pixel(x, y).ok() == Some(pixel)))
}

#[test]
fn three_images_two_columns() -> Result<(), Box<dyn std::error::Error>> {
    let images = vec![
        DynImage::Bgr8(Image::from_size_pixel([40, 40].into(), [255, 0, 0])?),
        DynImage::Bgr8(Image::from_size_pixel([40, 40].into(), [0, 255, 0])?),
        DynImage::Bgr8(Image::from_size_pixel([40, 40].into(), [0, 0, 255])?),
    ];
    let mut canvas = Image::<u8, 3>::from_size_val([5, 5].into(), 128)?;

    render_collage(&images, &[], &spec(false, Background::White), &BitmapFont, &mut canvas)?;

    // cells are (70 - 30) / 2 = 20 pixels wide and tall
    assert_eq!(canvas.width(), 70);
    assert_eq!(canvas.height(), 2 * 20 + 3 * 10);

    assert!(region_is(&canvas, (10, 10), (20, 20), [255, 0, 0]));
    assert!(region_is(&canvas, (40, 10), (20, 20), [0, 255, 0]));
    assert!(region_is(&canvas, (10, 40), (20, 20), [0, 0, 255]));
    // the fourth cell stays background
    assert!(region_is(&canvas, (40, 40), (20, 20), [255, 255, 255]));
    // so do the margins
    assert!(region_is(&canvas, (0, 0), (70, 10), [255, 255, 255]));
    assert!(region_is(&canvas, (30, 10), (10, 50), [255, 255, 255]));

    Ok(())
}

#[test]
fn gray_images_become_color() -> Result<(), Box<dyn std::error::Error>> {
    let images = vec![DynImage::Gray8(Image::from_size_val([8, 4].into(), 200)?)];
    let mut spec = spec(false, Background::Black);
    spec.col_count = 1;
    let mut canvas = Image::<u8, 3>::from_size_val([1, 1].into(), 0)?;

    render_collage(&images, &[], &spec, &BitmapFont, &mut canvas)?;

    // one 50 pixel wide cell at half the width in height
    assert_eq!(canvas.height(), 25 + 2 * 10);
    assert!(region_is(&canvas, (10, 10), (50, 25), [200, 200, 200]));
    assert!(region_is(&canvas, (0, 35), (70, 10), [0, 0, 0]));
    Ok(())
}

#[test]
fn captions_below_images() -> Result<(), Box<dyn std::error::Error>> {
    let images = vec![
        DynImage::Gray8(Image::from_size_val([20, 20].into(), 0)?),
        DynImage::Gray8(Image::from_size_val([20, 20].into(), 0)?),
    ];
    let captions = [Some("a very long caption"), None];
    let mut canvas = Image::<u8, 3>::from_size_val([1, 1].into(), 0)?;

    render_collage(
        &images,
        &captions,
        &spec(true, Background::White),
        &BitmapFont,
        &mut canvas,
    )?;

    // sample text is 7 pixels high so the band is 3 + 7 + 3
    let band = 13;
    assert_eq!(canvas.height(), 20 + 2 * 10 + band);

    let text_rows = (10 + 20 + 3)..(10 + 20 + 3 + 7);
    let dark_in = |x0: usize, x1: usize| {
        text_rows.clone().any(|y| {
            (x0..x1).any(|x| canvas.get_pixel(x, y).ok() == Some([0, 0, 0]))
        })
    };
    // the first caption is truncated to fit its cell and drawn in black
    assert!(dark_in(10, 30));
    assert!(!dark_in(0, 10));
    // the second image has no caption
    assert!(!dark_in(30, 70));

    let truncated_width = BitmapFont.text_size("abc", 1.0 / 3.0).width;
    assert_eq!(truncated_width, 18);
    Ok(())
}

#[test]
fn canvas_reallocated_each_call() -> Result<(), Box<dyn std::error::Error>> {
    let small = vec![DynImage::Gray8(Image::from_size_val([4, 4].into(), 1)?)];
    let many = vec![DynImage::Gray8(Image::from_size_val([4, 4].into(), 1)?); 5];
    let mut canvas = Image::<u8, 3>::from_size_val([1, 1].into(), 0)?;

    render_collage(&small, &[], &spec(false, Background::Black), &BitmapFont, &mut canvas)?;
    let one_row = canvas.height();
    render_collage(&many, &[], &spec(false, Background::Black), &BitmapFont, &mut canvas)?;
    assert_eq!(canvas.height(), 3 * 20 + 4 * 10);
    assert_eq!(one_row, 20 + 2 * 10);
    Ok(())
}
