//! `AttributeArray`: a named, typed sequence of fixed-width tuples.
//!
//! One tuple per mesh element (cell or point). Values are stored
//! interleaved, so tuple `i` occupies `values[i * n_components..][..n_components]`.

use crate::data::scalar::Scalar;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;

/// Named tuple array of `T`.
///
/// # Invariants
/// - `n_components > 0`
/// - `values.len()` is a multiple of `n_components`
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeArray<T> {
    name: String,
    n_components: usize,
    values: Vec<T>,
}

impl<T: Scalar> AttributeArray<T> {
    /// Zero-filled array of `n_tuples` tuples.
    ///
    /// # Errors
    /// `ZeroComponents` if `n_components == 0`.
    pub fn zeros(
        name: impl Into<String>,
        n_components: usize,
        n_tuples: usize,
    ) -> Result<Self, MeshError> {
        let name = name.into();
        if n_components == 0 {
            return Err(MeshError::ZeroComponents(name));
        }
        Ok(Self {
            name,
            n_components,
            values: vec![T::zero(); n_components * n_tuples],
        })
    }

    /// Wrap interleaved `values`.
    ///
    /// # Errors
    /// `ZeroComponents` if `n_components == 0`, `ComponentMismatch` if
    /// `values.len()` is not a multiple of `n_components`.
    pub fn from_values(
        name: impl Into<String>,
        n_components: usize,
        values: Vec<T>,
    ) -> Result<Self, MeshError> {
        let name = name.into();
        if n_components == 0 {
            return Err(MeshError::ZeroComponents(name));
        }
        if values.len() % n_components != 0 {
            return Err(MeshError::ComponentMismatch {
                name,
                expected: n_components,
                found: values.len() % n_components,
            });
        }
        let array = Self {
            name,
            n_components,
            values,
        };
        array.debug_assert_invariants();
        Ok(array)
    }

    /// Single-component array.
    pub fn scalars(name: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            name: name.into(),
            n_components: 1,
            values,
        }
    }

    /// Zero-filled array with this name and width, sized to `n_tuples`.
    pub fn zeros_like(&self, n_tuples: usize) -> Self {
        Self {
            name: self.name.clone(),
            n_components: self.n_components,
            values: vec![T::zero(); self.n_components * n_tuples],
        }
    }

    /// Array name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the array.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Values per tuple.
    #[inline]
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Number of tuples.
    #[inline]
    pub fn n_tuples(&self) -> usize {
        self.values.len() / self.n_components
    }

    /// Interleaved values.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable interleaved values.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Read-only view of tuple `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.n_tuples()`.
    #[inline]
    pub fn tuple(&self, i: usize) -> &[T] {
        let n = self.n_components;
        &self.values[i * n..(i + 1) * n]
    }

    /// Mutable view of tuple `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.n_tuples()`.
    #[inline]
    pub fn tuple_mut(&mut self, i: usize) -> &mut [T] {
        let n = self.n_components;
        &mut self.values[i * n..(i + 1) * n]
    }

    /// Checked tuple read.
    pub fn try_tuple(&self, i: usize) -> Result<&[T], MeshError> {
        if i >= self.n_tuples() {
            return Err(MeshError::ArrayLengthMismatch {
                name: self.name.clone(),
                expected: i + 1,
                found: self.n_tuples(),
            });
        }
        Ok(self.tuple(i))
    }

    /// Overwrite tuple `i` with `src`.
    ///
    /// # Errors
    /// `ComponentMismatch` if `src.len() != n_components`, `ArrayLengthMismatch`
    /// if `i` is past the end.
    pub fn set_tuple(&mut self, i: usize, src: &[T]) -> Result<(), MeshError> {
        if src.len() != self.n_components {
            return Err(MeshError::ComponentMismatch {
                name: self.name.clone(),
                expected: self.n_components,
                found: src.len(),
            });
        }
        if i >= self.n_tuples() {
            return Err(MeshError::ArrayLengthMismatch {
                name: self.name.clone(),
                expected: i + 1,
                found: self.n_tuples(),
            });
        }
        self.tuple_mut(i).copy_from_slice(src);
        Ok(())
    }

    /// Resize to `n_tuples` and zero every value.
    pub fn reset(&mut self, n_tuples: usize) {
        self.values.clear();
        self.values.resize(n_tuples * self.n_components, T::zero());
    }

    /// Zero every value, keeping the size.
    pub fn fill_zero(&mut self) {
        self.values.fill(T::zero());
    }
}

impl<T: Scalar> DebugInvariants for AttributeArray<T> {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        if self.n_components == 0 {
            return Err(MeshError::ZeroComponents(self.name.clone()));
        }
        if self.values.len() % self.n_components != 0 {
            return Err(MeshError::ComponentMismatch {
                name: self.name.clone(),
                expected: self.n_components,
                found: self.values.len() % self.n_components,
            });
        }
        Ok(())
    }
}
