//! Numeric value types an attribute array may hold.
//!
//! The set is closed: every array is one of the [`ScalarType`] variants and
//! kernels are instantiated once per variant through the [`Scalar`] trait.

use core::fmt::Debug;
use core::ops::AddAssign;

use num_traits::{AsPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::data::array::AttributeArray;
use crate::data::tagged::TaggedArray;

/// Scalar type tag for attribute arrays.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ScalarType {
    F64,
    F32,
    I8,
    U8,
    I16,
    U16,
    I32,
    I64,
    U32,
    U64,
}

impl ScalarType {
    /// Returns a stable string label for the scalar type.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::F64 => "f64",
            ScalarType::F32 => "f32",
            ScalarType::I8 => "i8",
            ScalarType::U8 => "u8",
            ScalarType::I16 => "i16",
            ScalarType::U16 => "u16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
        }
    }

    /// Parse a scalar type from a string label.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "f64" => Some(ScalarType::F64),
            "f32" => Some(ScalarType::F32),
            "i8" => Some(ScalarType::I8),
            "u8" => Some(ScalarType::U8),
            "i16" => Some(ScalarType::I16),
            "u16" => Some(ScalarType::U16),
            "i32" => Some(ScalarType::I32),
            "i64" => Some(ScalarType::I64),
            "u32" => Some(ScalarType::U32),
            "u64" => Some(ScalarType::U64),
            _ => None,
        }
    }

    /// True for `f32`/`f64`.
    pub fn is_float(self) -> bool {
        matches!(self, ScalarType::F32 | ScalarType::F64)
    }
}

/// Value type of an attribute array.
///
/// Means are summed in [`Scalar::Sum`] (`i128` for integers, `f64` for
/// floats) so they never overflow; the division by the cell count truncates
/// toward zero for integers. Conversions from `f64` saturate.
pub trait Scalar: Copy + Default + Debug + PartialEq + Send + Sync + Zero + 'static {
    /// Scalar type tag for this concrete type.
    const SCALAR_TYPE: ScalarType;

    /// Accumulator wide enough to sum any number of values without overflow.
    type Sum: Copy + Debug + Zero + AddAssign + Send + Sync;

    /// Widen into the accumulator type.
    fn widen(self) -> Self::Sum;

    /// `sum / count` narrowed back to `Self`; `count` must be non-zero.
    fn mean(sum: Self::Sum, count: usize) -> Self;

    /// Lossy widening to `f64`.
    fn to_f64(self) -> f64;

    /// Narrowing from an interpolated `f64`; integers round to nearest.
    fn from_interpolated(value: f64) -> Self;

    /// Wrap a typed array into a tagged container.
    fn wrap(array: AttributeArray<Self>) -> TaggedArray;
    /// Borrow a typed array if the tag matches.
    fn unwrap(array: &TaggedArray) -> Option<&AttributeArray<Self>>;
    /// Mutably borrow a typed array if the tag matches.
    fn unwrap_mut(array: &mut TaggedArray) -> Option<&mut AttributeArray<Self>>;
}

macro_rules! tagged_access {
    ($t:ty, $variant:ident) => {
        fn wrap(array: AttributeArray<Self>) -> TaggedArray {
            TaggedArray::$variant(array)
        }

        fn unwrap(array: &TaggedArray) -> Option<&AttributeArray<Self>> {
            if let TaggedArray::$variant(array) = array {
                Some(array)
            } else {
                None
            }
        }

        fn unwrap_mut(array: &mut TaggedArray) -> Option<&mut AttributeArray<Self>> {
            if let TaggedArray::$variant(array) = array {
                Some(array)
            } else {
                None
            }
        }
    };
}

macro_rules! impl_float_scalar {
    ($t:ty, $variant:ident) => {
        impl Scalar for $t {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;

            type Sum = f64;

            #[inline]
            fn widen(self) -> f64 {
                self.as_()
            }

            #[inline]
            fn mean(sum: f64, count: usize) -> Self {
                let count: f64 = count.as_();
                (sum / count).as_()
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self.as_()
            }

            #[inline]
            fn from_interpolated(value: f64) -> Self {
                value.as_()
            }

            tagged_access!($t, $variant);
        }
    };
}

macro_rules! impl_int_scalar {
    ($t:ty, $variant:ident) => {
        impl Scalar for $t {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;

            type Sum = i128;

            #[inline]
            fn widen(self) -> i128 {
                self.as_()
            }

            /// The mean of in-range values is in range, so the cast is exact.
            #[inline]
            fn mean(sum: i128, count: usize) -> Self {
                let count: i128 = count.as_();
                (sum / count).as_()
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self.as_()
            }

            #[inline]
            fn from_interpolated(value: f64) -> Self {
                value.round().as_()
            }

            tagged_access!($t, $variant);
        }
    };
}

impl_float_scalar!(f64, F64);
impl_float_scalar!(f32, F32);
impl_int_scalar!(i8, I8);
impl_int_scalar!(u8, U8);
impl_int_scalar!(i16, I16);
impl_int_scalar!(u16, U16);
impl_int_scalar!(i32, I32);
impl_int_scalar!(i64, I64);
impl_int_scalar!(u32, U32);
impl_int_scalar!(u64, U64);
