//! `ArrayList`: input cell arrays paired with the point arrays they fill.
//!
//! The list is configured once per reduction. Afterwards every kernel writes
//! through it, one output tuple at a time, and the finished outputs are moved
//! into the destination [`AttributeSet`].

use num_traits::Zero;

use crate::data::array::AttributeArray;
use crate::data::attribute_set::AttributeSet;
use crate::data::scalar::Scalar;
use crate::data::tagged::{PairVisitor, TaggedArray};
use crate::mesh_error::MeshError;
use crate::topology::{CellIdx, PointIdx};

/// Mean of the `cells` tuples of `src`, written into `out`.
///
/// Each component is summed over `cells` in [`Scalar::Sum`] and divided by
/// `cells.len()`; `out` is left untouched when `cells` is empty.
#[inline]
pub fn average_tuple<T: Scalar>(src: &AttributeArray<T>, cells: &[CellIdx], out: &mut [T]) {
    if cells.is_empty() {
        return;
    }
    for (c, slot) in out.iter_mut().enumerate() {
        let mut sum = T::Sum::zero();
        for &cell in cells {
            sum += src.tuple(cell)[c].widen();
        }
        *slot = T::mean(sum, cells.len());
    }
}

/// Weighted sum of the `cells` tuples of `src`, evaluated in `f64`.
///
/// `cells` and `weights` must have the same length.
#[inline]
pub fn interpolate_tuple<T: Scalar>(
    src: &AttributeArray<T>,
    cells: &[CellIdx],
    weights: &[f64],
    out: &mut [T],
) {
    for (c, slot) in out.iter_mut().enumerate() {
        let sum: f64 = cells
            .iter()
            .zip(weights)
            .map(|(&cell, &w)| w * src.tuple(cell)[c].to_f64())
            .sum();
        *slot = T::from_interpolated(sum);
    }
}

#[derive(Clone, Copy)]
struct Average<'c> {
    cells: &'c [CellIdx],
    point: PointIdx,
}

impl PairVisitor for Average<'_> {
    type Output = ();
    fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>) {
        average_tuple(src, self.cells, dst.tuple_mut(self.point));
    }
}

#[derive(Clone, Copy)]
struct Interpolate<'c> {
    cells: &'c [CellIdx],
    weights: &'c [f64],
    point: PointIdx,
}

impl PairVisitor for Interpolate<'_> {
    type Output = ();
    fn visit<T: Scalar>(self, src: &AttributeArray<T>, dst: &mut AttributeArray<T>) {
        interpolate_tuple(src, self.cells, self.weights, dst.tuple_mut(self.point));
    }
}

struct ArrayPair<'a> {
    input: &'a TaggedArray,
    output: TaggedArray,
}

/// Input arrays paired with their outputs.
///
/// Every output has the name, value type and width of its input and holds
/// one zeroed tuple per point after [`configure`](Self::configure).
#[derive(Default)]
pub struct ArrayList<'a> {
    pairs: Vec<ArrayPair<'a>>,
}

impl<'a> ArrayList<'a> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Pair each of `inputs` with an output sized to `n_points`.
    ///
    /// An array already in `output` with the same name, value type and width
    /// is taken over and reused; otherwise a fresh one is allocated. Either
    /// way the output starts zero-filled.
    pub fn configure<I>(&mut self, n_points: usize, inputs: I, output: &mut AttributeSet)
    where
        I: IntoIterator<Item = &'a TaggedArray>,
    {
        for input in inputs {
            let reusable = output
                .get_tagged(input.name())
                .is_some_and(|existing| existing.same_layout(input));
            let reused = if reusable {
                output.remove(input.name())
            } else {
                None
            };
            let array = match reused {
                Some(mut array) => {
                    array.reset(n_points);
                    array
                }
                None => input.zeros_like(n_points),
            };
            self.pairs.push(ArrayPair {
                input,
                output: array,
            });
        }
    }

    /// Number of configured pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Names of the configured arrays, in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.output.name())
    }

    /// `(input, output)` for every pair.
    pub fn pairs_mut(&mut self) -> impl Iterator<Item = (&'a TaggedArray, &mut TaggedArray)> {
        self.pairs.iter_mut().map(|p| (p.input, &mut p.output))
    }

    /// Write the component-wise mean of the `cells` tuples into tuple `point`
    /// of every output. Nothing is written when `cells` is empty.
    pub fn average(&mut self, cells: &[CellIdx], point: PointIdx) -> Result<(), MeshError> {
        if cells.is_empty() {
            return Ok(());
        }
        let visitor = Average { cells, point };
        for (src, dst) in self.pairs_mut() {
            TaggedArray::visit_pair(src, dst, visitor)?;
        }
        Ok(())
    }

    /// Write `Σ weights[i] * input[cells[i]]` into tuple `point` of every output.
    ///
    /// # Errors
    /// `WeightCountMismatch` if `cells` and `weights` differ in length.
    pub fn interpolate(
        &mut self,
        cells: &[CellIdx],
        weights: &[f64],
        point: PointIdx,
    ) -> Result<(), MeshError> {
        if cells.len() != weights.len() {
            return Err(MeshError::WeightCountMismatch {
                cells: cells.len(),
                weights: weights.len(),
            });
        }
        let visitor = Interpolate {
            cells,
            weights,
            point,
        };
        for (src, dst) in self.pairs_mut() {
            TaggedArray::visit_pair(src, dst, visitor)?;
        }
        Ok(())
    }

    /// Reset tuple `point` of every output to zero.
    ///
    /// # Errors
    /// `ScalarTypeMismatch` if an output no longer matches its input type.
    pub fn null_tuple(&mut self, point: PointIdx) -> Result<(), MeshError> {
        struct Null(PointIdx);
        impl PairVisitor for Null {
            type Output = ();
            fn visit<T: Scalar>(self, _src: &AttributeArray<T>, dst: &mut AttributeArray<T>) {
                dst.tuple_mut(self.0).fill(T::zero());
            }
        }
        for (src, dst) in self.pairs_mut() {
            TaggedArray::visit_pair(src, dst, Null(point))?;
        }
        Ok(())
    }

    /// Move every output into `output`, replacing arrays of the same name.
    pub fn into_output(self, output: &mut AttributeSet) {
        for pair in self.pairs {
            output.insert_tagged(pair.output);
        }
    }
}
