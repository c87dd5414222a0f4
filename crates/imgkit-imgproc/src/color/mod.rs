mod bgr;
mod gray;

pub use bgr::{bgr_from_bgra, bgr_from_rgb};
pub use gray::{gray_from_bgr_u8, gray_from_bgra_u8, rgb_from_gray};
pub(crate) use gray::luma_bgr;
