use crate::{dtype::PixelType, Image, ImageSize};

/// An image whose pixel layout is only known at runtime.
///
/// Multi-channel 8-bit images keep the BGR(A) channel order produced by
/// common image decoders.
#[derive(Clone, Debug, PartialEq)]
pub enum DynImage {
    /// Single channel, unsigned 8-bit.
    Gray8(Image<u8, 1>),
    /// Single channel, unsigned 16-bit.
    Gray16(Image<u16, 1>),
    /// Single channel, signed 32-bit.
    Gray32S(Image<i32, 1>),
    /// Single channel, 32-bit float.
    Gray32F(Image<f32, 1>),
    /// Three channels BGR, unsigned 8-bit.
    Bgr8(Image<u8, 3>),
    /// Four channels BGRA, unsigned 8-bit.
    Bgra8(Image<u8, 4>),
    /// Three channels BGR, 32-bit float.
    Bgr32F(Image<f32, 3>),
}

macro_rules! each_variant {
    ($self:expr, $img:ident => $body:expr) => {
        match $self {
            DynImage::Gray8($img) => $body,
            DynImage::Gray16($img) => $body,
            DynImage::Gray32S($img) => $body,
            DynImage::Gray32F($img) => $body,
            DynImage::Bgr8($img) => $body,
            DynImage::Bgra8($img) => $body,
            DynImage::Bgr32F($img) => $body,
        }
    };
}

impl DynImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        each_variant!(self, img => img.size())
    }

    /// The number of channels.
    pub fn num_channels(&self) -> usize {
        each_variant!(self, img => img.num_channels())
    }

    /// The encoding of a single channel.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            DynImage::Gray8(_) | DynImage::Bgr8(_) | DynImage::Bgra8(_) => PixelType::U8,
            DynImage::Gray16(_) => PixelType::U16,
            DynImage::Gray32S(_) => PixelType::I32,
            DynImage::Gray32F(_) | DynImage::Bgr32F(_) => PixelType::F32,
        }
    }

    /// Whether the image has a single channel.
    pub fn is_gray(&self) -> bool {
        self.num_channels() == 1
    }

    /// Whether the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        each_variant!(self, img => img.is_empty())
    }

    /// Short name of the pixel layout, e.g. `8U` or `32FC3`.
    pub fn type_name(&self) -> &'static str {
        match self {
            DynImage::Gray8(_) => "8U",
            DynImage::Gray16(_) => "16U",
            DynImage::Gray32S(_) => "32S",
            DynImage::Gray32F(_) => "32F",
            DynImage::Bgr8(_) => "8UC3",
            DynImage::Bgra8(_) => "ARGB",
            DynImage::Bgr32F(_) => "32FC3",
        }
    }

    /// Layout and size, e.g. `16U 640x480`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.type_name(), self.size())
    }

    /// Format the pixel at `(x, y)` for display.
    ///
    /// Floats are printed with one decimal and multi-channel pixels as a
    /// comma-separated list. Returns `None` outside of the image.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgkit_image::{DynImage, Image};
    ///
    /// let image = DynImage::Bgr8(Image::new([1, 1].into(), vec![1, 2, 3]).unwrap());
    ///
    /// assert_eq!(image.pixel_value_string(0, 0).as_deref(), Some("1, 2, 3"));
    /// assert_eq!(image.pixel_value_string(1, 0), None);
    /// ```
    pub fn pixel_value_string(&self, x: usize, y: usize) -> Option<String> {
        fn join<T: std::fmt::Display>(values: &[T]) -> String {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            DynImage::Gray8(img) => img.get_pixel(x, y).ok().map(|p| p[0].to_string()),
            DynImage::Gray16(img) => img.get_pixel(x, y).ok().map(|p| p[0].to_string()),
            DynImage::Gray32S(img) => img.get_pixel(x, y).ok().map(|p| p[0].to_string()),
            DynImage::Gray32F(img) => img.get_pixel(x, y).ok().map(|p| format!("{:.1}", p[0])),
            DynImage::Bgr8(img) => img.get_pixel(x, y).ok().map(|p| join(&p)),
            DynImage::Bgra8(img) => img.get_pixel(x, y).ok().map(|p| join(&p)),
            DynImage::Bgr32F(img) => img.get_pixel(x, y).ok().map(|p| {
                p.iter()
                    .map(|v| format!("{v:.1}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
        }
    }
}

impl std::fmt::Display for DynImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl From<Image<u8, 1>> for DynImage {
    fn from(img: Image<u8, 1>) -> Self {
        DynImage::Gray8(img)
    }
}

impl From<Image<u16, 1>> for DynImage {
    fn from(img: Image<u16, 1>) -> Self {
        DynImage::Gray16(img)
    }
}

impl From<Image<i32, 1>> for DynImage {
    fn from(img: Image<i32, 1>) -> Self {
        DynImage::Gray32S(img)
    }
}

impl From<Image<f32, 1>> for DynImage {
    fn from(img: Image<f32, 1>) -> Self {
        DynImage::Gray32F(img)
    }
}

impl From<Image<u8, 3>> for DynImage {
    fn from(img: Image<u8, 3>) -> Self {
        DynImage::Bgr8(img)
    }
}

impl From<Image<u8, 4>> for DynImage {
    fn from(img: Image<u8, 4>) -> Self {
        DynImage::Bgra8(img)
    }
}

impl From<Image<f32, 3>> for DynImage {
    fn from(img: Image<f32, 3>) -> Self {
        DynImage::Bgr32F(img)
    }
}
