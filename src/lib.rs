// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#![crate_name = "ndmem"]
#![doc(html_root_url = "https://docs.rs/ndmem/0.1/")]
#![allow(
    clippy::many_single_char_names,
    clippy::deref_addrof,
    clippy::unreadable_literal,
    clippy::len_without_is_empty
)]

//! The `ndmem` crate provides the memory-and-view core of an n-dimensional
//! array: a strided index map, a family of buffer handles with different
//! ownership, and one array type, [`ArrayBase`], that composes the two.
//!
//! - [`Array`]: owns its buffer exclusively. Cloning copies the elements.
//! - [`SharedArray`]: reference counted buffer, possibly owned by a foreign
//!   runtime that is notified through a release callback.
//! - [`ArrayView`] and [`ArrayViewMut`]: borrow another array's buffer.
//!
//! Slicing never copies: a slice of an owned or borrowed array borrows the
//! same buffer, a slice of a shared array holds one more reference to it.
//!
//! ## Highlights
//!
//! - Static rank (`Ix0` to `Ix6`) checks the number of coordinates at
//!   compile time; dynamic rank (`IxDyn`) checks it at runtime.
//! - Call-style access through [`at`](ArrayBase::at),
//!   [`at_mut`](ArrayBase::at_mut) and [`into_at`](ArrayBase::into_at):
//!   element indices give an element (by reference or by value), slice
//!   arguments built with [`s!`] give a sub-array.
//! - Index maps with any axis permutation as memory layout, negative
//!   strides and repeated (stride zero) axes.
//! - Buffers can be taken over from, and handed out to, foreign owners
//!   (see [`ForeignBuffer`] and [`Capsule`]).
//!
//! ```
//! use ndmem::{s, Array2};
//!
//! let mut a = Array2::from_shape_fn((3, 4), |(i, j)| (10 * i + j) as i32);
//! assert_eq!(*a.at((1, 2)), 12);
//!
//! let mut col = a.at_mut(s![.., 1]);
//! col[2] = -1;
//! assert_eq!(a[[2, 1]], -1);
//!
//! // an expiring array gives its elements by value
//! let x = Array2::<i32>::zeros((2, 2)).into_at((0, 0));
//! assert_eq!(x, 0);
//! ```
//!
//! ## Crate Feature Flags
//!
//! - `portable-atomic-critical-section`
//!   - On targets without native pointer-width atomics the reference count
//!     of [`SharedArray`] comes from `portable-atomic`; this feature makes it
//!     use a critical section implementation.

#[macro_use]
mod macro_utils;
#[macro_use]
mod private;
#[macro_use]
mod slice;

mod arrayformat;
mod arraylike;
mod arraytraits;
mod data_repr;
mod data_traits;
mod dimension;
mod error;
mod extension {
    pub(crate) mod nonnull;
}
mod foreign;
mod free_functions;
mod impl_constructors;
mod impl_methods;
mod impl_owned_array;
mod impl_shared_array;
mod index_map;
mod iterators;
mod select;

pub use crate::arraylike::{from_fn, ArrayLike, FromFn, MemoryArrayLike};
pub use crate::data_repr::{BorrowedMutRepr, BorrowedRepr, OwnedRepr, SharedRepr};
pub use crate::data_traits::{Data, DataMut, DataOwned, RawData};
pub use crate::dimension::{
    Dim, Dimension, IntoDimension, Ix0, Ix1, Ix2, Ix3, Ix4, Ix5, Ix6, IxDyn, NdIndex,
};
pub use crate::error::{ArrayError, ErrorKind};
pub use crate::foreign::{Capsule, CapsuleDestructor, ForeignBuffer, RawCapsule, ReleaseFn};
pub use crate::free_functions::{arr0, arr1, arr2, aview1, aview2, aview_mut1};
pub use crate::index_map::IndexMap;
pub use crate::iterators::{Iter, IterMut};
pub use crate::select::Selector;
pub use crate::slice::{
    AnyRank, Ellipsis, Rank, Slice, SliceArg, SliceInfo, SliceInfoElem, SliceNextDim,
};

/// Array index type
pub type Ix = usize;
/// Array index type (signed)
pub type Ixs = isize;

/// An *n*-dimensional array over a buffer handle.
///
/// The array pairs an [`IndexMap`], which turns an n-dimensional index
/// into an offset, with a buffer handle `S`, which decides who owns the
/// elements. Every offset the map can produce lies inside the buffer.
///
/// Type aliases name the handle kinds:
///
/// - [`Array`]: exclusively owned buffer; `clone` copies it.
/// - [`SharedArray`]: reference counted buffer; `clone` adds a reference.
/// - [`ArrayView`]: read-only borrow of another array's buffer.
/// - [`ArrayViewMut`]: read-write borrow of another array's buffer.
///
/// ## Indexing and slicing
///
/// `a[[i, j]]`, [`get`](Self::get) and [`at`](Self::at) read single
/// elements; [`slice`](Self::slice) and `at(s![..])` produce sub-arrays
/// sharing the buffer. See [`s!`] for the slice argument syntax.
///
/// ```
/// use ndmem::{s, Array3};
///
/// let a = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| 100 * i + 10 * j + k);
/// let v = a.slice(s![1, ..;2, 3]);
/// assert_eq!(v.shape(), &[2]);
/// assert_eq!(v[0], 103);
/// assert_eq!(v[1], 123);
/// ```
pub struct ArrayBase<S, D>
where
    S: RawData,
{
    /// Buffer handle
    pub(crate) data: S,
    /// Index map from logical indices to buffer offsets
    pub(crate) map: IndexMap<D>,
}

/// An array that owns its data uniquely.
///
/// The `Array<A, D>` is parameterized by `A` for the element type and `D`
/// for the dimensionality.
pub type Array<A, D> = ArrayBase<OwnedRepr<A>, D>;

/// An array whose buffer is shared through an atomic reference count.
///
/// The buffer is released when the last clone is dropped: it is
/// deallocated, or handed back to its foreign owner.
pub type SharedArray<A, D> = ArrayBase<SharedRepr<A>, D>;

/// A read-only array view.
///
/// An array view represents an array or a part of it, created from an
/// array or a slice, and borrows its buffer for the lifetime `'a`.
pub type ArrayView<'a, A, D> = ArrayBase<BorrowedRepr<'a, A>, D>;

/// A read-write array view.
pub type ArrayViewMut<'a, A, D> = ArrayBase<BorrowedMutRepr<'a, A>, D>;

/// zero-dimensional array
pub type Array0<A> = Array<A, Ix0>;
/// one-dimensional array
pub type Array1<A> = Array<A, Ix1>;
/// two-dimensional array
pub type Array2<A> = Array<A, Ix2>;
/// three-dimensional array
pub type Array3<A> = Array<A, Ix3>;
/// four-dimensional array
pub type Array4<A> = Array<A, Ix4>;
/// five-dimensional array
pub type Array5<A> = Array<A, Ix5>;
/// six-dimensional array
pub type Array6<A> = Array<A, Ix6>;
/// dynamic-dimensional array
pub type ArrayD<A> = Array<A, IxDyn>;

/// one-dimensional shared array
pub type SharedArray1<A> = SharedArray<A, Ix1>;
/// two-dimensional shared array
pub type SharedArray2<A> = SharedArray<A, Ix2>;
/// dynamic-dimensional shared array
pub type SharedArrayD<A> = SharedArray<A, IxDyn>;

/// one-dimensional array view
pub type ArrayView1<'a, A> = ArrayView<'a, A, Ix1>;
/// two-dimensional array view
pub type ArrayView2<'a, A> = ArrayView<'a, A, Ix2>;
/// three-dimensional array view
pub type ArrayView3<'a, A> = ArrayView<'a, A, Ix3>;
/// dynamic-dimensional array view
pub type ArrayViewD<'a, A> = ArrayView<'a, A, IxDyn>;

/// one-dimensional read-write array view
pub type ArrayViewMut1<'a, A> = ArrayViewMut<'a, A, Ix1>;
/// two-dimensional read-write array view
pub type ArrayViewMut2<'a, A> = ArrayViewMut<'a, A, Ix2>;
/// dynamic-dimensional read-write array view
pub type ArrayViewMutD<'a, A> = ArrayViewMut<'a, A, IxDyn>;
