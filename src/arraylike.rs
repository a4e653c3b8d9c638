// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Traits for accepting multiple types as arrays.

use std::fmt;

use crate::{ArrayBase, Data, Dimension, IntoDimension, Ixs};

/// A trait for anything that can act like a multidimensional array.
///
/// An array-like value has a shape of known rank, as many elements as the
/// product of its shape, and can be evaluated at any index inside that
/// shape. It need not be backed by memory: see [`from_fn`].
///
/// Generic code uses it to accept arrays of any storage as well as lazily
/// computed values.
///
/// ```
/// use ndmem::{arr2, from_fn, ArrayLike, Dim, Dimension, Ix2};
///
/// fn total<L>(like: &L) -> i32
/// where
///     L: ArrayLike<Elem = i32, Dim = Ix2>,
/// {
///     let (rows, cols) = like.raw_dim().into_pattern();
///     let mut sum = 0;
///     for i in 0..rows {
///         for j in 0..cols {
///             sum += like.call(&Dim([i, j]));
///         }
///     }
///     sum
/// }
///
/// assert_eq!(total(&arr2(&[[1, 2], [3, 4]])), 10);
/// assert_eq!(total(&from_fn((2, 2), |(i, j)| (i * 2 + j) as i32 + 1)), 10);
/// ```
pub trait ArrayLike {
    /// The element type, as produced by [`call`](ArrayLike::call).
    type Elem;

    /// The dimensionality.
    type Dim: Dimension;

    /// The shape.
    fn raw_dim(&self) -> Self::Dim;

    /// Total number of elements: the product of the shape.
    fn len(&self) -> usize {
        self.raw_dim().size()
    }

    /// Evaluate at `index`.
    ///
    /// **Panics** if `index` is out of bounds.
    fn call(&self, index: &Self::Dim) -> Self::Elem;
}

/// An array-like value backed by memory: the element at index *I* is
/// found at `as_ptr()` offset by *Σ I<sub>k</sub> × strides()<sub>k</sub>*
/// elements.
///
/// ## Safety
///
/// Every such offset must point to an initialized element, valid for
/// reads as long as `self` is borrowed.
pub unsafe trait MemoryArrayLike: ArrayLike {
    /// Pointer to the element at the all-zeros index.
    fn as_ptr(&self) -> *const Self::Elem;

    /// Per-axis memory strides, in elements.
    fn strides(&self) -> &[Ixs];
}

impl<A, S, D> ArrayLike for ArrayBase<S, D>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    type Elem = A;
    type Dim = D;

    fn raw_dim(&self) -> D {
        self.map.raw_dim()
    }

    fn len(&self) -> usize {
        self.map.size()
    }

    fn call(&self, index: &D) -> A {
        self[index.clone()].clone()
    }
}

unsafe impl<A, S, D> MemoryArrayLike for ArrayBase<S, D>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn as_ptr(&self) -> *const A {
        ArrayBase::as_ptr(self)
    }

    fn strides(&self) -> &[Ixs] {
        self.map.strides()
    }
}

/// An array-like value that computes its elements with a closure.
///
/// Create it with [`from_fn`].
#[derive(Clone)]
pub struct FromFn<D, F> {
    dim: D,
    f: F,
}

/// Create an array-like value of shape `shape` whose element at index `i`
/// is `f(i)`, with `i` in its pattern form.
///
/// Nothing is evaluated until the value is called.
pub fn from_fn<Sh, F, A>(shape: Sh, f: F) -> FromFn<Sh::Dim, F>
where
    Sh: IntoDimension,
    F: Fn(<Sh::Dim as Dimension>::Pattern) -> A,
{
    FromFn {
        dim: shape.into_dimension(),
        f,
    }
}

impl<A, D, F> ArrayLike for FromFn<D, F>
where
    D: Dimension,
    F: Fn(D::Pattern) -> A,
{
    type Elem = A;
    type Dim = D;

    fn raw_dim(&self) -> D {
        self.dim.clone()
    }

    fn call(&self, index: &D) -> A {
        ndassert!(index.ndim() == self.dim.ndim()
                      && index.slice().iter().zip(self.dim.slice()).all(|(&i, &d)| i < d),
                  "index {:?} is out of bounds for shape {:?}", index, self.dim);
        (self.f)(index.clone().into_pattern())
    }
}

impl<D: fmt::Debug, F> fmt::Debug for FromFn<D, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").field("dim", &self.dim).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{from_fn, ArrayLike, MemoryArrayLike};
    use crate::{s, Array2, Array3, ArrayView2, Dim, SharedArray};

    fn is_array_like<L: ArrayLike>() {}
    fn is_memory_array_like<L: MemoryArrayLike>() {}

    #[test]
    fn capabilities() {
        is_array_like::<Array2<f64>>();
        is_array_like::<SharedArray<u8, crate::IxDyn>>();
        is_memory_array_like::<ArrayView2<'static, i32>>();
        is_array_like::<super::FromFn<crate::Ix1, fn(usize) -> i32>>();
    }

    #[test]
    fn from_fn_is_lazy() {
        let calls = std::cell::Cell::new(0);
        let like = from_fn((3, 4), |(i, j)| {
            calls.set(calls.get() + 1);
            i * 10 + j
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(like.len(), 12);
        assert_eq!(like.call(&Dim([2, 3])), 23);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    #[should_panic]
    fn from_fn_out_of_bounds() {
        let like = from_fn(3, |i| i);
        like.call(&Dim([3]));
    }

    #[test]
    fn memory_strides_follow_view() {
        let a = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| i * 100 + j * 10 + k);
        let v = a.slice(s![1, ..;-1, 1..3]);
        assert_eq!(MemoryArrayLike::strides(&v), &[-4, 1]);
        let copy = Array2::from_memory(&v);
        assert_eq!(copy, v);
        assert_eq!(copy[[0, 0]], 121);
    }
}
