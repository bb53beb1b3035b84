//! Data module: typed attribute arrays and named array sets

pub mod array;
pub mod array_list;
pub mod attribute_set;
pub mod scalar;
pub mod tagged;

pub use array::AttributeArray;
pub use array_list::ArrayList;
pub use attribute_set::AttributeSet;
pub use scalar::{Scalar, ScalarType};
pub use tagged::{ArrayVisitor, PairVisitor, TaggedArray};
