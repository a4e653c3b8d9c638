// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::slice;

use crate::{
    Array0, Array1, Array2, ArrayBase, ArrayView1, ArrayView2, ArrayViewMut1, BorrowedMutRepr,
    BorrowedRepr, IndexMap,
};

/// Create a zero-dimensional array with the element `x`.
pub fn arr0<A>(x: A) -> Array0<A> {
    ArrayBase {
        data: crate::OwnedRepr::from(vec![x]),
        map: IndexMap::new(()),
    }
}

/// Create a one-dimensional array with elements from `xs`.
pub fn arr1<A: Clone>(xs: &[A]) -> Array1<A> {
    Array1::from_vec(xs.to_vec())
}

/// Create a two-dimensional array with elements from `xs`.
///
/// ```
/// use ndmem::arr2;
///
/// let a = arr2(&[[1, 2, 3],
///                [4, 5, 6]]);
/// assert!(
///     a.shape() == [2, 3]
/// );
/// ```
pub fn arr2<A: Clone, const N: usize>(xs: &[[A; N]]) -> Array2<A> {
    let v: Vec<A> = xs.iter().flat_map(|row| row.iter().cloned()).collect();
    ArrayBase {
        data: crate::OwnedRepr::from(v),
        map: IndexMap::new((xs.len(), N)),
    }
}

/// Create a one-dimensional array view with elements borrowing `xs`.
///
/// ```
/// use ndmem::{aview1, s};
///
/// let data = [1.0; 12];
/// let v = aview1(&data).slice_move(s![..;4]);
/// assert_eq!(v.len(), 3);
/// ```
pub fn aview1<A>(xs: &[A]) -> ArrayView1<'_, A> {
    ArrayBase {
        data: BorrowedRepr::from_slice(xs),
        map: IndexMap::new(xs.len()),
    }
}

/// Create a two-dimensional array view with elements borrowing `xs`.
pub fn aview2<A, const N: usize>(xs: &[[A; N]]) -> ArrayView2<'_, A> {
    let rows = xs.len();
    // arrays of arrays are laid out without padding
    let data = unsafe { slice::from_raw_parts(xs.as_ptr() as *const A, rows * N) };
    ArrayBase {
        data: BorrowedRepr::from_slice(data),
        map: IndexMap::new((rows, N)),
    }
}

/// Create a one-dimensional read-write array view with elements borrowing `xs`.
///
/// ```
/// use ndmem::{aview_mut1, s};
///
/// let mut data = [0; 10];
/// for x in aview_mut1(&mut data).slice_mut(s![..;3]).iter_mut() {
///     *x = 5;
/// }
/// assert_eq!(data, [5, 0, 0, 5, 0, 0, 5, 0, 0, 5]);
/// ```
pub fn aview_mut1<A>(xs: &mut [A]) -> ArrayViewMut1<'_, A> {
    let len = xs.len();
    ArrayBase {
        data: BorrowedMutRepr::from_slice(xs),
        map: IndexMap::new(len),
    }
}
