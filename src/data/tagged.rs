//! Type-erased attribute arrays and visitor dispatch.
//!
//! [`TaggedArray`] is a closed union over every [`Scalar`] type. Kernels are
//! written once as generic visitors and dispatched per array, so each array
//! runs code specialized for its native value type.

use crate::data::array::AttributeArray;
use crate::data::scalar::{Scalar, ScalarType};
use crate::mesh_error::MeshError;

/// Tagged, type-erased attribute array.
#[derive(Clone, Debug, PartialEq)]
pub enum TaggedArray {
    F64(AttributeArray<f64>),
    F32(AttributeArray<f32>),
    I8(AttributeArray<i8>),
    U8(AttributeArray<u8>),
    I16(AttributeArray<i16>),
    U16(AttributeArray<u16>),
    I32(AttributeArray<i32>),
    I64(AttributeArray<i64>),
    U32(AttributeArray<u32>),
    U64(AttributeArray<u64>),
}

/// Apply `$body` to the typed array inside a [`TaggedArray`] reference.
macro_rules! each_variant {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            TaggedArray::F64($a) => $body,
            TaggedArray::F32($a) => $body,
            TaggedArray::I8($a) => $body,
            TaggedArray::U8($a) => $body,
            TaggedArray::I16($a) => $body,
            TaggedArray::U16($a) => $body,
            TaggedArray::I32($a) => $body,
            TaggedArray::I64($a) => $body,
            TaggedArray::U32($a) => $body,
            TaggedArray::U64($a) => $body,
        }
    };
}

/// Generic read-only operation over one typed array.
pub trait ArrayVisitor {
    type Output;
    fn visit<T: Scalar>(self, array: &AttributeArray<T>) -> Self::Output;
}

/// Generic operation reading `src` and writing `dst` of the same value type.
pub trait PairVisitor {
    type Output;
    fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>)
    -> Self::Output;
}

impl TaggedArray {
    /// Scalar type tag for this array.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            TaggedArray::F64(_) => ScalarType::F64,
            TaggedArray::F32(_) => ScalarType::F32,
            TaggedArray::I8(_) => ScalarType::I8,
            TaggedArray::U8(_) => ScalarType::U8,
            TaggedArray::I16(_) => ScalarType::I16,
            TaggedArray::U16(_) => ScalarType::U16,
            TaggedArray::I32(_) => ScalarType::I32,
            TaggedArray::I64(_) => ScalarType::I64,
            TaggedArray::U32(_) => ScalarType::U32,
            TaggedArray::U64(_) => ScalarType::U64,
        }
    }

    /// Array name.
    pub fn name(&self) -> &str {
        each_variant!(self, a => a.name())
    }

    /// Values per tuple.
    pub fn n_components(&self) -> usize {
        each_variant!(self, a => a.n_components())
    }

    /// Number of tuples.
    pub fn n_tuples(&self) -> usize {
        each_variant!(self, a => a.n_tuples())
    }

    /// Zero-filled array with the same name, type and width, sized to `n_tuples`.
    pub fn zeros_like(&self, n_tuples: usize) -> TaggedArray {
        struct ZerosLike(usize);
        impl ArrayVisitor for ZerosLike {
            type Output = TaggedArray;
            fn visit<T: Scalar>(self, array: &AttributeArray<T>) -> TaggedArray {
                T::wrap(array.zeros_like(self.0))
            }
        }
        self.visit(ZerosLike(n_tuples))
    }

    /// Resize to `n_tuples` and zero every value.
    pub fn reset(&mut self, n_tuples: usize) {
        each_variant!(self, a => a.reset(n_tuples))
    }

    /// Tuple `i` widened to `f64`.
    ///
    /// # Panics
    /// Panics if `i >= self.n_tuples()`.
    pub fn tuple_f64(&self, i: usize) -> Vec<f64> {
        each_variant!(self, a => a.tuple(i).iter().map(|v| v.to_f64()).collect())
    }

    /// True if this array matches `other` in value type and tuple width.
    pub fn same_layout(&self, other: &TaggedArray) -> bool {
        self.scalar_type() == other.scalar_type() && self.n_components() == other.n_components()
    }

    /// Run `visitor` on the typed array.
    pub fn visit<V: ArrayVisitor>(&self, visitor: V) -> V::Output {
        each_variant!(self, a => visitor.visit(a))
    }

    /// Run `visitor` on `src` and `dst`, which must share a value type.
    ///
    /// # Errors
    /// `ScalarTypeMismatch` if the value types differ.
    pub fn visit_pair<V: PairVisitor>(
        src: &TaggedArray,
        dst: &mut TaggedArray,
        visitor: V,
    ) -> Result<V::Output, MeshError> {
        use TaggedArray as A;
        Ok(match (src, dst) {
            (A::F64(s), A::F64(d)) => visitor.visit(s, d),
            (A::F32(s), A::F32(d)) => visitor.visit(s, d),
            (A::I8(s), A::I8(d)) => visitor.visit(s, d),
            (A::U8(s), A::U8(d)) => visitor.visit(s, d),
            (A::I16(s), A::I16(d)) => visitor.visit(s, d),
            (A::U16(s), A::U16(d)) => visitor.visit(s, d),
            (A::I32(s), A::I32(d)) => visitor.visit(s, d),
            (A::I64(s), A::I64(d)) => visitor.visit(s, d),
            (A::U32(s), A::U32(d)) => visitor.visit(s, d),
            (A::U64(s), A::U64(d)) => visitor.visit(s, d),
            (s, d) => {
                return Err(MeshError::ScalarTypeMismatch {
                    expected: s.scalar_type(),
                    found: d.scalar_type(),
                });
            }
        })
    }
}

impl<T: Scalar> From<AttributeArray<T>> for TaggedArray {
    fn from(array: AttributeArray<T>) -> Self {
        T::wrap(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sum;
    impl ArrayVisitor for Sum {
        type Output = f64;
        fn visit<T: Scalar>(self, array: &AttributeArray<T>) -> f64 {
            array.values().iter().map(|v| v.to_f64()).sum()
        }
    }

    struct CopyInto;
    impl PairVisitor for CopyInto {
        type Output = usize;
        fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>) -> usize {
            dst.values_mut().copy_from_slice(src.values());
            src.n_tuples()
        }
    }

    #[test]
    fn tags_follow_value_type() {
        let a: TaggedArray = AttributeArray::scalars("t", vec![1u16, 2]).into();
        assert_eq!(a.scalar_type(), ScalarType::U16);
        assert_eq!(a.name(), "t");
        assert_eq!(a.n_tuples(), 2);
        assert_eq!(a.visit(Sum), 3.0);
        assert_eq!(a.tuple_f64(1), vec![2.0]);
        assert!(u16::unwrap(&a).is_some());
        assert!(f64::unwrap(&a).is_none());
    }

    #[test]
    fn pair_visit_requires_same_type() {
        let src: TaggedArray = AttributeArray::scalars("a", vec![1.5f32, 2.5]).into();
        let mut dst = src.zeros_like(2);
        assert_eq!(dst.tuple_f64(0), vec![0.0]);
        assert_eq!(TaggedArray::visit_pair(&src, &mut dst, CopyInto).unwrap(), 2);
        assert_eq!(dst, src);

        let mut wrong: TaggedArray = AttributeArray::scalars("a", vec![0i32, 0]).into();
        let err = TaggedArray::visit_pair(&src, &mut wrong, CopyInto).unwrap_err();
        assert_eq!(
            err,
            MeshError::ScalarTypeMismatch {
                expected: ScalarType::F32,
                found: ScalarType::I32
            }
        );
    }

    #[test]
    fn zeros_like_keeps_layout() {
        let src: TaggedArray =
            AttributeArray::from_values("vec", 3, vec![1i64, 2, 3, 4, 5, 6]).unwrap().into();
        let z = src.zeros_like(4);
        assert!(z.same_layout(&src));
        assert_eq!(z.n_tuples(), 4);
        assert_eq!(z.name(), "vec");
    }
}
