// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Constructor methods for ndmem
//!

use std::mem::MaybeUninit;

use num_traits::Zero;
use rawpointer::PointerExt;

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::{
    Array, ArrayBase, ArrayLike, DataOwned, Dimension, IndexMap, IntoDimension, Ix1, Ix2,
    MemoryArrayLike, OwnedRepr,
};

/// Constructor methods for one-dimensional arrays.
///
/// Note that the constructor methods apply to `Array` and `SharedArray`,
/// the two array types that have owned storage.
impl<S> ArrayBase<S, Ix1>
where
    S: DataOwned,
{
    /// Create a one-dimensional array from a vector (no copying needed).
    ///
    /// ```rust
    /// use ndmem::Array1;
    ///
    /// let array = Array1::from_vec(vec![1., 2., 3., 4.]);
    /// assert_eq!(array.shape(), &[4]);
    /// ```
    pub fn from_vec(v: Vec<S::Elem>) -> Self {
        let map = IndexMap::new(v.len());
        ArrayBase {
            data: S::new(v),
            map,
        }
    }
}

/// Constructor methods for two-dimensional arrays.
impl<A, S> ArrayBase<S, Ix2>
where
    S: DataOwned<Elem = A>,
{
    /// Create a row-major array from nested rows.
    ///
    /// Errors with `IrregularRows` if the rows are not all of the same
    /// length; this is checked before anything is allocated.
    ///
    /// ```
    /// use ndmem::{Array2, ErrorKind};
    ///
    /// let a = Array2::from_nested(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
    /// assert_eq!(a.shape(), &[3, 2]);
    ///
    /// let err = Array2::from_nested(vec![vec![1, 2], vec![3]]).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::IrregularRows);
    /// ```
    pub fn from_nested(rows: Vec<Vec<A>>) -> Result<Self, ArrayError> {
        let ncols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != ncols) {
            return Err(from_kind(ErrorKind::IrregularRows));
        }
        let map = IndexMap::try_new((rows.len(), ncols))?;
        let mut v = Vec::new();
        v.try_reserve_exact(map.size())
            .map_err(|_| from_kind(ErrorKind::AllocationFailed))?;
        v.extend(rows.into_iter().flatten());
        Ok(ArrayBase {
            data: S::new(v),
            map,
        })
    }
}

/// Constructor methods for n-dimensional arrays.
///
/// The `shape` argument can be an integer, a tuple or array of integers,
/// or a dimension value. The array is row-major unless a layout is given.
///
/// The `try_` variants report `Overflow` and `AllocationFailed` as errors;
/// the others panic with the error message.
impl<A, S, D> ArrayBase<S, D>
where
    S: DataOwned<Elem = A>,
    D: Dimension,
{
    /// Create an array with copies of `elem`, shape `shape`.
    ///
    /// **Panics** if the number of elements in `shape` would overflow isize.
    ///
    /// ```
    /// use ndmem::Array3;
    ///
    /// let a = Array3::from_elem((2, 2, 2), 1.);
    /// assert_eq!(a[[1, 0, 1]], 1.);
    /// ```
    pub fn from_elem<Sh>(shape: Sh, elem: A) -> Self
    where
        A: Clone,
        Sh: IntoDimension<Dim = D>,
    {
        Self::try_from_elem(shape, elem).unwrap_or_else(|e| panic!("ndmem: {}", e))
    }

    /// Create an array with copies of `elem`, shape `shape`.
    pub fn try_from_elem<Sh>(shape: Sh, elem: A) -> Result<Self, ArrayError>
    where
        A: Clone,
        Sh: IntoDimension<Dim = D>,
    {
        let map = IndexMap::try_new(shape)?;
        let data = OwnedRepr::allocate_with(map.size(), |_| elem.clone())?;
        Ok(ArrayBase {
            data: S::new(data.into_vec()),
            map,
        })
    }

    /// Create an array with zeros, shape `shape`.
    ///
    /// **Panics** if the number of elements in `shape` would overflow isize.
    pub fn zeros<Sh>(shape: Sh) -> Self
    where
        A: Clone + Zero,
        Sh: IntoDimension<Dim = D>,
    {
        Self::from_elem(shape, A::zero())
    }

    /// Create an array with zeros, shape `shape`.
    pub fn try_zeros<Sh>(shape: Sh) -> Result<Self, ArrayError>
    where
        A: Clone + Zero,
        Sh: IntoDimension<Dim = D>,
    {
        Self::try_from_elem(shape, A::zero())
    }

    /// Create an array with default values, shape `shape`
    ///
    /// **Panics** if the number of elements in `shape` would overflow isize.
    pub fn default<Sh>(shape: Sh) -> Self
    where
        A: Default,
        Sh: IntoDimension<Dim = D>,
    {
        Self::try_default(shape).unwrap_or_else(|e| panic!("ndmem: {}", e))
    }

    /// Create an array with default values, shape `shape`
    pub fn try_default<Sh>(shape: Sh) -> Result<Self, ArrayError>
    where
        A: Default,
        Sh: IntoDimension<Dim = D>,
    {
        Self::try_from_shape_fn(shape, |_| A::default())
    }

    /// Create an array with values created by the function `f`.
    ///
    /// `f` is called with the index of the element to create, in its
    /// pattern form; the elements are visited in row-major order.
    ///
    /// **Panics** if the number of elements in `shape` would overflow isize.
    ///
    /// ```
    /// use ndmem::{arr2, Array2};
    ///
    /// let a = Array2::from_shape_fn((2, 2), |(i, j)| i * 2 + j);
    /// assert_eq!(a, arr2(&[[0, 1], [2, 3]]));
    /// ```
    pub fn from_shape_fn<Sh, F>(shape: Sh, f: F) -> Self
    where
        Sh: IntoDimension<Dim = D>,
        F: FnMut(D::Pattern) -> A,
    {
        Self::try_from_shape_fn(shape, f).unwrap_or_else(|e| panic!("ndmem: {}", e))
    }

    /// Create an array with values created by the function `f`.
    pub fn try_from_shape_fn<Sh, F>(shape: Sh, mut f: F) -> Result<Self, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
        F: FnMut(D::Pattern) -> A,
    {
        let map = IndexMap::try_new(shape)?;
        let mut v = Vec::new();
        v.try_reserve_exact(map.size())
            .map_err(|_| from_kind(ErrorKind::AllocationFailed))?;
        let dim = map.raw_dim();
        let mut index = dim.first_index();
        while let Some(ix) = index {
            v.push(f(ix.clone().into_pattern()));
            index = dim.next_for(ix);
        }
        Ok(ArrayBase {
            data: S::new(v),
            map,
        })
    }

    /// Create an array from a vector with the given shape, row-major.
    ///
    /// Errors with `IncompatibleShape` if the vector length does not match
    /// the number of elements of `shape`.
    ///
    /// ```
    /// use ndmem::{Array2, ErrorKind};
    ///
    /// let a = Array2::from_shape_vec((2, 2), vec![1., 2., 3., 4.]).unwrap();
    /// assert_eq!(a[[1, 0]], 3.);
    ///
    /// let err = Array2::from_shape_vec((2, 3), vec![1., 2.]).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::IncompatibleShape);
    /// ```
    pub fn from_shape_vec<Sh>(shape: Sh, v: Vec<A>) -> Result<Self, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
    {
        let map = IndexMap::try_new(shape)?;
        if map.size() != v.len() {
            return Err(from_kind(ErrorKind::IncompatibleShape));
        }
        Ok(ArrayBase {
            data: S::new(v),
            map,
        })
    }

    /// Create an array from a vector and an explicit index map.
    ///
    /// The vector is the whole buffer; the map may address only part of it.
    ///
    /// Errors with `OutOfBounds` if the map addresses an element outside
    /// the vector.
    pub fn from_layout_vec(map: IndexMap<D>, v: Vec<A>) -> Result<Self, ArrayError> {
        ArrayBase::from_parts(map, S::new(v))
    }

    /// Create an array by evaluating an array-like value at every index.
    ///
    /// ```
    /// use ndmem::{from_fn, Array2};
    ///
    /// let a = Array2::from_array_like(&from_fn((2, 3), |(i, j)| i + j));
    /// assert_eq!(a[[1, 2]], 3);
    /// ```
    pub fn from_array_like<L>(like: &L) -> Self
    where
        L: ArrayLike<Elem = A, Dim = D> + ?Sized,
    {
        Self::from_shape_fn(like.raw_dim(), |ix| like.call(&ix.into_dimension()))
    }

    /// Create an array by copying the elements of a memory-backed
    /// array-like value, reading them through its pointer and strides.
    pub fn from_memory<L>(like: &L) -> Self
    where
        A: Clone,
        L: MemoryArrayLike<Elem = A, Dim = D> + ?Sized,
    {
        let ptr = like.as_ptr();
        let strides = like.strides();
        Self::from_shape_fn(like.raw_dim(), |ix| {
            let ix = ix.into_dimension();
            let mut p = ptr;
            for (&i, &s) in ix.slice().iter().zip(strides) {
                p = unsafe { p.stride_offset(s, i) };
            }
            unsafe { (*p).clone() }
        })
    }
}

impl<A, D> Array<A, D>
where
    D: Dimension,
{
    /// Create an array of default values that is contiguous in the axis
    /// order `layout`, slowest axis first.
    ///
    /// The reversed axis order gives a column-major (Fortran order) array.
    ///
    /// Errors with `InvalidLayout` if `layout` is not a permutation of the
    /// axes.
    ///
    /// ```
    /// use ndmem::{Array3, Dim};
    ///
    /// let a = Array3::<f32>::with_layout((2, 3, 4), Dim([2, 1, 0])).unwrap();
    /// assert_eq!(a.strides(), &[1, 2, 6]);
    /// ```
    pub fn with_layout<Sh, L>(shape: Sh, layout: L) -> Result<Self, ArrayError>
    where
        A: Default,
        Sh: IntoDimension<Dim = D>,
        L: IntoDimension<Dim = D>,
    {
        let map = IndexMap::with_layout(shape, layout)?;
        let data = OwnedRepr::allocate_with(map.size(), |_| A::default())?;
        Ok(ArrayBase { data, map })
    }

    /// Create an array with uninitialized elements, shape `shape`.
    ///
    /// The elements must be written before [`assume_init`](Array::assume_init)
    /// is called.
    ///
    /// ```
    /// use ndmem::Array2;
    /// use std::mem::MaybeUninit;
    ///
    /// let mut a = Array2::<u32>::uninit((2, 2)).unwrap();
    /// for (i, x) in a.iter_mut().enumerate() {
    ///     *x = MaybeUninit::new(i as u32);
    /// }
    /// let a = unsafe { a.assume_init() };
    /// assert_eq!(a[[1, 1]], 3);
    /// ```
    pub fn uninit<Sh>(shape: Sh) -> Result<Array<MaybeUninit<A>, D>, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
    {
        let map = IndexMap::try_new(shape)?;
        let data = OwnedRepr::<A>::allocate_uninit(map.size())?;
        Ok(ArrayBase { data, map })
    }
}

impl<A, D> Array<MaybeUninit<A>, D>
where
    D: Dimension,
{
    /// Promise that the array's elements are all fully initialized, and
    /// convert the array from element type `MaybeUninit<A>` to `A`.
    ///
    /// ## Safety
    ///
    /// Every element addressed by the array must be initialized. The buffer
    /// must contain no other elements, which holds for arrays from
    /// [`uninit`](Array::uninit).
    pub unsafe fn assume_init(self) -> Array<A, D> {
        let ArrayBase { data, map } = self;
        ArrayBase {
            data: data.data_subst(),
            map,
        }
    }
}
