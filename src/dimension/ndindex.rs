// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::Debug;

use super::{stride_offset, Dimension, IntoDimension};

/// Tuple or fixed size arrays that can be used to index an array.
///
/// For the static ranks only an index of the matching arity implements
/// `NdIndex`, so indexing with the wrong number of coordinates does not
/// compile. Dynamic-rank indices are checked when they are used.
///
/// ```
/// use ndmem::arr2;
///
/// let mut a = arr2(&[[0, 1],
///                    [2, 3]]);
/// assert_eq!(a[[0, 1]], 1);
/// assert_eq!(a[[1, 1]], 3);
/// a[[1, 1]] += 1;
/// assert_eq!(a[(1, 1)], 4);
/// ```
pub unsafe trait NdIndex<E>: Debug {
    /// Offset of the element relative to the map's base offset, or `None` if
    /// any coordinate is out of bounds.
    ///
    /// **Panics** if the index has a different number of coordinates than
    /// `dim` has axes.
    #[doc(hidden)]
    fn index_checked(&self, dim: &E, strides: &E) -> Option<isize>;
}

unsafe impl<T, D> NdIndex<D> for T
where
    T: IntoDimension<Dim = D> + Clone + Debug,
    D: Dimension,
{
    fn index_checked(&self, dim: &D, strides: &D) -> Option<isize> {
        let index = self.clone().into_dimension();
        ndassert!(index.ndim() == dim.ndim(),
                  "index {:?} has {} coordinates but the array has rank {}",
                  self, index.ndim(), dim.ndim());
        let mut offset = 0;
        for ((&d, &i), &s) in dim.slice().iter().zip(index.slice()).zip(strides.slice()) {
            if i >= d {
                return None;
            }
            offset += stride_offset(i, s);
        }
        Some(offset)
    }
}
