/// The numeric encoding of a single pixel channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelType {
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// 32-bit float.
    F32,
}

impl PixelType {
    /// Whether values of this type can be NaN.
    pub fn is_float(&self) -> bool {
        matches!(self, PixelType::F32)
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            PixelType::U8 => "u8",
            PixelType::U16 => "u16",
            PixelType::I32 => "i32",
            PixelType::F32 => "f32",
        };
        write!(f, "{name}")
    }
}

/// Trait for image data types.
///
/// Send and Sync is required for the rayon based operations.
pub trait PixelDtype: Copy + Default + PartialOrd + Send + Sync + num_traits::NumCast {
    /// The runtime tag of the data type.
    const PIXEL_TYPE: PixelType;

    /// Convert the value to f32.
    fn into_f32(self) -> f32;

    /// Convert a f32 value to the image data type, rounding and saturating for integers.
    fn from_f32(x: f32) -> Self;

    /// Whether the value is NaN. Always false for integer types.
    fn is_nan(self) -> bool {
        false
    }

    /// Whether the value is zero.
    fn is_zero(self) -> bool {
        self.into_f32() == 0.0
    }
}

impl PixelDtype for u8 {
    const PIXEL_TYPE: PixelType = PixelType::U8;

    fn into_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

impl PixelDtype for u16 {
    const PIXEL_TYPE: PixelType = PixelType::U16;

    fn into_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 65535.0) as u16
    }
}

impl PixelDtype for i32 {
    const PIXEL_TYPE: PixelType = PixelType::I32;

    fn into_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(x: f32) -> Self {
        // `as` saturates and maps NaN to zero
        x.round() as i32
    }
}

impl PixelDtype for f32 {
    const PIXEL_TYPE: PixelType = PixelType::F32;

    fn into_f32(self) -> f32 {
        self
    }

    fn from_f32(x: f32) -> Self {
        x
    }

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{PixelDtype, PixelType};

    #[test]
    fn from_f32_saturates() {
        assert_eq!(u8::from_f32(300.0), 255);
        assert_eq!(u8::from_f32(-4.0), 0);
        assert_eq!(u8::from_f32(12.5), 13);
        assert_eq!(u16::from_f32(70000.0), 65535);
        assert_eq!(i32::from_f32(f32::NAN), 0);
    }

    fn sum_by_ref<T: PixelDtype>(values: &[T]) -> f32 {
        values.iter().map(|v| v.into_f32()).sum()
    }

    #[test]
    fn into_f32_through_references() {
        assert_eq!(sum_by_ref(&[1u8, 2, 255]), 258.0);
        assert_eq!(sum_by_ref(&[-3i32, 10]), 7.0);
        assert_eq!(sum_by_ref(&[0.5f32, 0.25]), 0.75);
        assert!(sum_by_ref(&[1.0f32, f32::NAN]).is_nan());
    }

    #[test]
    fn nan_only_for_float() {
        assert!(f32::NAN.is_nan());
        assert!(!PixelDtype::is_nan(255u8));
        assert!(PixelType::F32.is_float());
        assert!(!PixelType::U16.is_float());
        assert_eq!(<u16 as PixelDtype>::PIXEL_TYPE.to_string(), "u16");
    }
}
