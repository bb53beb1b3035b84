//! `AttributeSet`: named per-element arrays of one mesh entity kind.
//!
//! A mesh carries one set for its points and one for its cells. Arrays are
//! keyed by name, so inserting an array whose name is already present
//! replaces the old one.

use std::collections::BTreeMap;

use crate::data::array::AttributeArray;
use crate::data::scalar::Scalar;
use crate::data::tagged::TaggedArray;
use crate::mesh_error::MeshError;

/// Named collection of [`TaggedArray`]s, iterated in name order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSet {
    arrays: BTreeMap<String, TaggedArray>,
}

impl AttributeSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a typed array, returning the array it replaced.
    pub fn insert<T: Scalar>(&mut self, array: AttributeArray<T>) -> Option<TaggedArray> {
        self.insert_tagged(array.into())
    }

    /// Insert a tagged array, returning the array it replaced.
    pub fn insert_tagged(&mut self, array: TaggedArray) -> Option<TaggedArray> {
        self.arrays.insert(array.name().to_owned(), array)
    }

    /// Borrow the array `name` as `AttributeArray<T>`.
    ///
    /// Returns `None` if the name is absent or the value type differs.
    pub fn get<T: Scalar>(&self, name: &str) -> Option<&AttributeArray<T>> {
        self.arrays.get(name).and_then(T::unwrap)
    }

    /// Mutably borrow the array `name` as `AttributeArray<T>`.
    pub fn get_mut<T: Scalar>(&mut self, name: &str) -> Option<&mut AttributeArray<T>> {
        self.arrays.get_mut(name).and_then(T::unwrap_mut)
    }

    /// Borrow the array `name` whatever its value type.
    pub fn get_tagged(&self, name: &str) -> Option<&TaggedArray> {
        self.arrays.get(name)
    }

    /// Mutably borrow the array `name` whatever its value type.
    pub fn get_tagged_mut(&mut self, name: &str) -> Option<&mut TaggedArray> {
        self.arrays.get_mut(name)
    }

    /// Remove and return the array `name`.
    pub fn remove(&mut self, name: &str) -> Option<TaggedArray> {
        self.arrays.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    /// Arrays in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TaggedArray> {
        self.arrays.values()
    }

    /// Array names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Check that every array holds exactly `n_tuples` tuples.
    ///
    /// # Errors
    /// `ArrayLengthMismatch` naming the first offending array.
    pub fn validate_len(&self, n_tuples: usize) -> Result<(), MeshError> {
        match self.iter().find(|a| a.n_tuples() != n_tuples) {
            Some(bad) => Err(MeshError::ArrayLengthMismatch {
                name: bad.name().to_owned(),
                expected: n_tuples,
                found: bad.n_tuples(),
            }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a TaggedArray;
    type IntoIter = std::collections::btree_map::Values<'a, String, TaggedArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.values()
    }
}

impl FromIterator<TaggedArray> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = TaggedArray>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for array in iter {
            set.insert_tagged(array);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access_checks_the_tag() {
        let mut set = AttributeSet::new();
        set.insert(AttributeArray::scalars("p", vec![1.0f64, 2.0]));
        set.insert(AttributeArray::scalars("id", vec![7i32, 8]));
        assert_eq!(set.len(), 2);
        assert!(set.get::<f64>("p").is_some());
        assert!(set.get::<f32>("p").is_none());
        set.get_mut::<i32>("id").unwrap().values_mut()[0] = 9;
        assert_eq!(set.get::<i32>("id").unwrap().values(), &[9, 8]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["id", "p"]);
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut set = AttributeSet::new();
        assert!(set.insert(AttributeArray::scalars("a", vec![1u8])).is_none());
        let old = set.insert(AttributeArray::scalars("a", vec![2.0f32]));
        assert!(old.is_some());
        assert_eq!(set.len(), 1);
        assert!(set.get::<f32>("a").is_some());
        assert!(set.remove("a").is_some());
        assert!(set.is_empty());
    }

    #[test]
    fn validate_len_names_the_short_array() {
        let set: AttributeSet = [
            TaggedArray::from(AttributeArray::scalars("ok", vec![0.0f64; 3])),
            TaggedArray::from(AttributeArray::scalars("short", vec![0u16; 2])),
        ]
        .into_iter()
        .collect();
        assert!(set.validate_len(2).is_err());
        match set.validate_len(3) {
            Err(MeshError::ArrayLengthMismatch { name, found, .. }) => {
                assert_eq!(name, "short");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
