//! Element types: the [`DType`] tag, the [`Element`] capability trait,
//! and the dtype-erased [`Scalar`].
//!
//! Storage code is generic over `T: Element`, so element size, byte
//! layout, casting and comparison are resolved at compile time. The
//! runtime [`DType`] tag only selects which monomorphised path to run.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Tag identifying an element's numeric representation and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    /// Unsigned 8-bit integer (`u8`).
    Byte,
    /// Signed 8-bit integer (`i8`).
    Int8,
    /// Signed 16-bit integer (`i16`).
    Int16,
    /// Signed 32-bit integer (`i32`).
    Int32,
    /// Signed 64-bit integer (`i64`).
    Int64,
    /// IEEE-754 single precision (`f32`).
    Float32,
    /// IEEE-754 double precision (`f64`).
    Float64,
}

impl DType {
    /// Every supported dtype, in ascending size order within each family.
    pub const ALL: [DType; 7] = [
        DType::Byte,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::Float32,
        DType::Float64,
    ];

    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Lower-case tag name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Whether elements of this dtype are floating-point.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = ParseDTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dtype| dtype.name() == s)
            .ok_or_else(|| ParseDTypeError {
                input: s.to_string(),
            })
    }
}

/// Error returned when a string does not name a known [`DType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDTypeError {
    /// The unrecognised input.
    pub input: String,
}

impl fmt::Display for ParseDTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dtype '{}'", self.input)
    }
}

impl Error for ParseDTypeError {}

/// A dtype-erased numeric value.
///
/// Integers of every supported width fit in `Int(i64)`; both float widths
/// fit in `Float(f64)` without loss. Comparison between the two variants
/// is exact: an integer equals a float only if the float is integral and
/// has the same value.
#[derive(Clone, Copy, Debug)]
pub enum Scalar {
    /// Any integer element.
    Int(i64),
    /// Any floating-point element.
    Float(f64),
}

impl Scalar {
    /// Convert into the element type `T` with `as` semantics.
    pub fn to_element<T: Element>(self) -> T {
        T::from_scalar(self)
    }

    /// The value as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => int_eq_float(i, f),
        }
    }
}

/// Exact comparison of an integer with a float: `f` must be integral,
/// inside the `i64` range, and equal to `i` without rounding either side.
fn int_eq_float(i: i64, f: f64) -> bool {
    // 2^63; every integral f64 below it converts to i64 exactly.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Capability trait for a storable element type.
///
/// Implemented for the seven primitive types named by [`DType`]. All
/// byte encodings are native-endian and bit-exact, so a buffer written
/// with [`write_bytes`](Element::write_bytes) has the same layout as a
/// `[T]` slice.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The tag for this element type.
    const DTYPE: DType;

    /// Size of one element in bytes.
    const SIZE: usize = Self::DTYPE.size();

    /// The additive identity, used as the default sparse fill value.
    fn zero() -> Self;

    /// Encode into the first [`SIZE`](Element::SIZE) bytes of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `SIZE`.
    fn write_bytes(self, out: &mut [u8]);

    /// Decode from the first [`SIZE`](Element::SIZE) bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `SIZE`.
    fn read_bytes(bytes: &[u8]) -> Self;

    /// Widen into a dtype-erased [`Scalar`].
    fn to_scalar(self) -> Scalar;

    /// Narrow from a [`Scalar`] with `as` semantics (saturating for
    /// float→int, wrapping for int→int).
    fn from_scalar(value: Scalar) -> Self;

    /// Convert to another element type. Equivalent to `self as U`.
    #[inline]
    fn cast<U: Element>(self) -> U {
        U::from_scalar(self.to_scalar())
    }

    /// Bit identity: the two values encode to the same bytes.
    ///
    /// Unlike `==`, this tells `-0.0` from `0.0` and treats a NaN as
    /// identical to itself.
    #[inline]
    fn same_bits(self, other: Self) -> bool {
        let mut a = [0u8; 8];
        let mut b = [0u8; 8];
        self.write_bytes(&mut a);
        other.write_bytes(&mut b);
        a == b
    }

    /// Numeric equality across element types.
    #[inline]
    fn eq_element<U: Element>(self, other: U) -> bool {
        self.to_scalar() == other.to_scalar()
    }
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident, $variant:ident, $wide:ty, $zero:expr) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn zero() -> Self {
                $zero
            }

            #[inline]
            fn write_bytes(self, out: &mut [u8]) {
                out[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn read_bytes(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[..Self::SIZE]);
                <$t>::from_ne_bytes(buf)
            }

            #[inline]
            fn to_scalar(self) -> Scalar {
                Scalar::$variant(self as $wide)
            }

            #[inline]
            fn from_scalar(value: Scalar) -> Self {
                match value {
                    Scalar::Int(v) => v as $t,
                    Scalar::Float(v) => v as $t,
                }
            }
        }
    };
}

impl_element!(u8, Byte, Int, i64, 0);
impl_element!(i8, Int8, Int, i64, 0);
impl_element!(i16, Int16, Int, i64, 0);
impl_element!(i32, Int32, Int, i64, 0);
impl_element!(i64, Int64, Int, i64, 0);
impl_element!(f32, Float32, Float, f64, 0.0);
impl_element!(f64, Float64, Float, f64, 0.0);

/// Run `$body` with `$t` bound to the element type for a runtime dtype.
///
/// ```
/// use strata_core::{with_element, DType, Element};
///
/// fn size_of(dtype: DType) -> usize {
///     with_element!(dtype, T => T::SIZE)
/// }
/// assert_eq!(size_of(DType::Int16), 2);
/// ```
#[macro_export]
macro_rules! with_element {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::DType::Byte => {
                type $t = u8;
                $body
            }
            $crate::DType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::DType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::DType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::DType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::DType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::DType::Float64 => {
                type $t = f64;
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_primitive_widths() {
        assert_eq!(DType::Byte.size(), std::mem::size_of::<u8>());
        assert_eq!(DType::Int16.size(), std::mem::size_of::<i16>());
        assert_eq!(DType::Int32.size(), std::mem::size_of::<i32>());
        assert_eq!(DType::Float32.size(), std::mem::size_of::<f32>());
        assert_eq!(DType::Float64.size(), std::mem::size_of::<f64>());
        assert_eq!(<i64 as Element>::SIZE, 8);
    }

    #[test]
    fn names_parse_back() {
        for dtype in DType::ALL {
            assert_eq!(dtype.name().parse::<DType>(), Ok(dtype));
        }
    }

    #[test]
    fn unknown_name_is_error() {
        let err = "complex64".parse::<DType>().unwrap_err();
        assert_eq!(err.input, "complex64");
        assert_eq!(err.to_string(), "unknown dtype 'complex64'");
    }

    #[test]
    fn bytes_are_native_layout() {
        let mut buf = [0u8; 4];
        1.5f32.write_bytes(&mut buf);
        assert_eq!(buf, 1.5f32.to_ne_bytes());
        assert_eq!(f32::read_bytes(&buf), 1.5);
    }

    #[test]
    fn cast_matches_as_conversion() {
        assert_eq!(300i32.cast::<u8>(), 300i32 as u8);
        assert_eq!((-1i8).cast::<u8>(), 255);
        assert_eq!(2.9f64.cast::<i32>(), 2);
        assert_eq!(1e10f64.cast::<i16>(), i16::MAX);
        assert_eq!(7u8.cast::<f32>(), 7.0);
    }

    #[test]
    fn cross_dtype_equality() {
        assert!(3i8.eq_element(3.0f64));
        assert!(!3i8.eq_element(3.5f32));
        assert!(200u8.eq_element(200i64));
        assert!(!f64::NAN.eq_element(f64::NAN));
    }

    #[test]
    fn mixed_equality_is_exact_past_f64_precision() {
        let big = 9_007_199_254_740_993i64;
        assert_ne!(Scalar::Int(big), Scalar::Float(9_007_199_254_740_992.0));
        assert_eq!(Scalar::Int(big - 1), Scalar::Float(9_007_199_254_740_992.0));
        assert!(!big.eq_element(9_007_199_254_740_992.0f64));
        assert_eq!(Scalar::Int(i64::MIN), Scalar::Float(-9_223_372_036_854_775_808.0));
        assert_ne!(Scalar::Int(i64::MAX), Scalar::Float(9_223_372_036_854_775_808.0));
        assert_ne!(Scalar::Float(f64::INFINITY), Scalar::Int(i64::MAX));
        assert_eq!(Scalar::Int(0), Scalar::Float(-0.0));
    }

    #[test]
    fn same_bits_separates_signed_zeros() {
        assert!(0.0f64.same_bits(0.0));
        assert!(!(-0.0f64).same_bits(0.0));
        assert!(!(-0.0f32).same_bits(0.0));
        assert!(f64::NAN.same_bits(f64::NAN));
        assert!(7i32.same_bits(7));
        assert!(!7i32.same_bits(8));
    }

    #[test]
    fn with_element_dispatches_by_tag() {
        for dtype in DType::ALL {
            let size = with_element!(dtype, T => <T as Element>::SIZE);
            assert_eq!(size, dtype.size());
            let tag = with_element!(dtype, T => <T as Element>::DTYPE);
            assert_eq!(tag, dtype);
        }
    }

    #[test]
    fn float_flag() {
        assert!(DType::Float32.is_float());
        assert!(!DType::Int64.is_float());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn i32_round_trips_through_i64_and_f64(v in any::<i32>()) {
                prop_assert_eq!(v.cast::<i64>().cast::<i32>(), v);
                prop_assert_eq!(v.cast::<f64>().cast::<i32>(), v);
            }

            #[test]
            fn f32_round_trips_through_f64(v in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
                prop_assert_eq!(v.cast::<f64>().cast::<f32>(), v);
            }

            #[test]
            fn i16_bytes_round_trip(v in any::<i16>()) {
                let mut buf = [0u8; 2];
                v.write_bytes(&mut buf);
                prop_assert_eq!(i16::read_bytes(&buf), v);
            }
        }
    }
}
