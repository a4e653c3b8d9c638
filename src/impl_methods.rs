// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::mem::MaybeUninit;

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::iterators::{Iter, IterMut};
use crate::{
    Array, ArrayBase, ArrayView, ArrayViewMut, Data, DataMut, DataOwned, Dimension, IndexMap, Ix,
    IxDyn, Ixs, NdIndex, OwnedRepr, RawData, Selector, SharedArray, SliceArg,
};

impl<A, S, D> ArrayBase<S, D>
where
    S: RawData<Elem = A>,
    D: Dimension,
{
    /// Create an array from an index map and a buffer handle.
    ///
    /// The handle is taken as given: pass a clone of a shared handle to add
    /// a reference, or an owned handle to move it.
    ///
    /// Errors with `OutOfBounds` if the map addresses an element outside
    /// the buffer.
    pub fn from_parts(map: IndexMap<D>, handle: S) -> Result<Self, ArrayError> {
        if !map.fits(handle.buf_len()) {
            return Err(from_kind(ErrorKind::OutOfBounds));
        }
        Ok(ArrayBase { data: handle, map })
    }

    /// Return the total number of elements in the array.
    pub fn len(&self) -> usize {
        self.map.size()
    }

    /// Return whether the array has any elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the number of dimensions (axes) in the array
    pub fn ndim(&self) -> usize {
        self.map.ndim()
    }

    /// Return the shape of the array as a slice.
    pub fn shape(&self) -> &[Ix] {
        self.map.lengths()
    }

    /// Return the shape of the array in its “pattern” form,
    /// an integer in the one-dimensional case, tuple in the n-dimensional cases
    /// and so on.
    pub fn dim(&self) -> D::Pattern {
        self.map.raw_dim().into_pattern()
    }

    /// Return the shape of the array as it's stored in the array.
    pub fn raw_dim(&self) -> D {
        self.map.raw_dim()
    }

    /// Return the strides of the array as a slice.
    pub fn strides(&self) -> &[Ixs] {
        self.map.strides()
    }

    /// The index map of the array.
    pub fn index_map(&self) -> &IndexMap<D> {
        &self.map
    }

    /// The buffer handle of the array.
    pub fn handle(&self) -> &S {
        &self.data
    }

    /// Split the array into its index map and buffer handle.
    pub fn into_parts(self) -> (IndexMap<D>, S) {
        (self.map, self.data)
    }

    /// Return a pointer to the first element in the array, the element at
    /// the index map's base offset.
    ///
    /// Raw access to array elements needs to follow the strided indexing
    /// scheme: an element at multi-index *I* in an array with strides *S* is
    /// located at offset
    ///
    /// *Σ<sub>0 ≤ k < d</sub> I<sub>k</sub> × S<sub>k</sub>*
    ///
    /// where *d* is `self.ndim()`.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const A {
        // an empty array may have its base offset one past the buffer
        self.data.buf_ptr().wrapping_add(self.map.offset())
    }

    /// Return `true` if the elements are contiguous in memory, in the
    /// order of the array's layout.
    pub fn is_standard_layout(&self) -> bool {
        self.map.is_contiguous()
    }

    /// Element at buffer offset `offset`.
    ///
    /// ## Safety
    ///
    /// `offset` must be produced by `self.map`.
    #[inline]
    pub(crate) unsafe fn uget_offset(&self, offset: usize) -> &A {
        &*self.data.buf_ptr().add(offset)
    }

    /// Convert the array into a dimension type of equal rank.
    ///
    /// Errors with `RankMismatch` if the rank does not fit `D2`.
    ///
    /// ```
    /// use ndmem::{ArrayD, Ix2, IxDyn};
    ///
    /// let array = ArrayD::<i32>::zeros(IxDyn(&[10, 10]));
    /// assert!(array.into_dimensionality::<Ix2>().is_ok());
    /// ```
    pub fn into_dimensionality<D2>(self) -> Result<ArrayBase<S, D2>, ArrayError>
    where
        D2: Dimension,
    {
        Ok(ArrayBase {
            map: self.map.into_dimensionality()?,
            data: self.data,
        })
    }

    /// Convert the array into dynamic rank.
    pub fn into_dyn(self) -> ArrayBase<S, IxDyn> {
        ArrayBase {
            map: self.map.into_dyn(),
            data: self.data,
        }
    }
}

impl<A, S, D> ArrayBase<S, D>
where
    S: Data<Elem = A>,
    D: Dimension,
{
    /// Return a read-only view of the array
    ///
    /// The view of a shared array remembers the shared handle, so it can be
    /// retained externally with [`to_capsule`](ArrayBase::to_capsule).
    pub fn view(&self) -> ArrayView<'_, A, D> {
        ArrayBase {
            data: self.data.borrow_handle(),
            map: self.map.clone(),
        }
    }

    /// Return a reference to the element at `index`, or return `None`
    /// if the index is out of bounds.
    ///
    /// ```
    /// use ndmem::arr2;
    ///
    /// let a = arr2(&[[1., 2.],
    ///                [3., 4.]]);
    ///
    /// assert!(
    ///     a.get((0, 1)) == Some(&2.) &&
    ///     a.get((0, 2)) == None &&
    ///     a[(0, 1)] == 2. &&
    ///     a[[0, 1]] == 2.
    /// );
    /// ```
    pub fn get<I>(&self, index: I) -> Option<&A>
    where
        I: NdIndex<D>,
    {
        self.map
            .index(index)
            .map(|offset| unsafe { self.uget_offset(offset) })
    }

    /// Return a sliced array.
    ///
    /// The result shares the buffer: for an owned or borrowed array it is a
    /// view, for a shared array it is another shared array holding one more
    /// reference. See [`s!`] for the slice argument.
    ///
    /// **Panics** if an index or range endpoint is out of bounds, if a step
    /// is zero, or (for dynamic rank or an ellipsis) if the number of
    /// arguments does not match the rank.
    pub fn slice<I>(&self, info: I) -> ArrayBase<S::View<'_>, I::OutDim>
    where
        I: SliceArg<D>,
    {
        ArrayBase {
            map: self.map.slice(&info),
            data: self.data.view_handle(),
        }
    }

    /// Slice the array, consuming it.
    ///
    /// The buffer is kept as a whole; only the index map changes.
    ///
    /// **Panics** like [`slice`](Self::slice).
    pub fn slice_move<I>(self, info: I) -> ArrayBase<S, I::OutDim>
    where
        I: SliceArg<D>,
    {
        ArrayBase {
            map: self.map.slice(&info),
            data: self.data,
        }
    }

    /// Return an iterator of references to the elements of the array, in
    /// logical (row-major index) order.
    ///
    /// Iterator element type is `&A`.
    pub fn iter(&self) -> Iter<'_, A, D> {
        Iter::new(self.data.buf_ptr(), self.map.clone())
    }

    /// Return an uniquely owned copy of the array.
    ///
    /// Only the addressed elements are copied, into a contiguous buffer with
    /// the same layout (axis order) as `self`.
    pub fn to_owned(&self) -> Array<A, D>
    where
        A: Clone,
    {
        let dense = self.map.to_dense();
        let mut data = match OwnedRepr::<A>::allocate_uninit(dense.size()) {
            Ok(data) => data,
            Err(e) => panic!("ndmem: {}", e),
        };
        let ptr = data.as_nonnull_mut().as_ptr();
        let dim = self.map.dim();
        let mut index = dim.first_index();
        while let Some(ix) = index {
            unsafe {
                let elt = self.uget_offset(self.map.offset_of(&ix));
                *ptr.add(dense.offset_of(&ix)) = MaybeUninit::new(elt.clone());
            }
            index = dim.next_for(ix);
        }
        unsafe {
            ArrayBase {
                data: data.data_subst::<A>(),
                map: dense,
            }
        }
    }

    /// Access the element or sub-array selected by `index`, by reference.
    ///
    /// - An element index (`usize` for one axis, a tuple or array
    ///   otherwise) gives `&A`.
    /// - `..` gives the whole array as a sub-array.
    /// - A slice argument from [`s!`] gives a sub-array.
    ///
    /// Sub-arrays share the buffer, as with [`slice`](Self::slice).
    ///
    /// **Panics** if an index is out of bounds.
    ///
    /// ```
    /// use ndmem::{s, Array2};
    ///
    /// let a = Array2::from_shape_fn((2, 3), |(i, j)| i * 3 + j);
    /// assert_eq!(*a.at((1, 0)), 3);
    /// assert_eq!(a.at(s![1, ..]).shape(), &[3]);
    /// assert_eq!(a.at(..).shape(), &[2, 3]);
    /// ```
    pub fn at<I>(&self, index: I) -> I::Ref<'_, S>
    where
        I: Selector<D>,
    {
        index.select(self)
    }

    /// Access the element or sub-array selected by `index`, consuming the
    /// array.
    ///
    /// An element index gives a copy of the element, which stays usable
    /// after the array is gone. A slice argument gives the sub-array, moving
    /// the buffer handle into it.
    ///
    /// **Panics** if an index is out of bounds.
    pub fn into_at<I>(self, index: I) -> I::Val<S>
    where
        I: Selector<D>,
        A: Clone,
    {
        index.select_move(self)
    }

    /// Turn the array into a shared ownership array, without any copying.
    pub fn into_shared(self) -> SharedArray<A, D>
    where
        S: DataOwned,
    {
        ArrayBase {
            data: self.data.into_shared(),
            map: self.map,
        }
    }
}

impl<A, S, D> ArrayBase<S, D>
where
    S: DataMut<Elem = A>,
    D: Dimension,
{
    /// Return a mutable pointer to the first element in the array.
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut A {
        let offset = self.map.offset();
        self.data.buf_ptr_mut().as_ptr().wrapping_add(offset)
    }

    /// Return a read-write view of the array
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, A, D> {
        ArrayBase {
            map: self.map.clone(),
            data: self.data.borrow_handle_mut(),
        }
    }

    /// Return a mutable reference to the element at `index`, or return
    /// `None` if the index is out of bounds.
    pub fn get_mut<I>(&mut self, index: I) -> Option<&mut A>
    where
        I: NdIndex<D>,
    {
        let offset = self.map.index(index)?;
        unsafe { Some(&mut *self.data.buf_ptr_mut().as_ptr().add(offset)) }
    }

    /// Return an iterator of mutable references to the elements of the
    /// array, in logical order.
    ///
    /// Iterator element type is `&mut A`.
    pub fn iter_mut(&mut self) -> IterMut<'_, A, D> {
        let ptr = self.data.buf_ptr_mut().as_ptr();
        IterMut::new(ptr, self.map.clone())
    }

    /// Return a sliced read-write view of the array.
    ///
    /// **Panics** like [`slice`](Self::slice).
    pub fn slice_mut<I>(&mut self, info: I) -> ArrayViewMut<'_, A, I::OutDim>
    where
        I: SliceArg<D>,
    {
        ArrayBase {
            map: self.map.slice(&info),
            data: self.data.borrow_handle_mut(),
        }
    }

    /// Access the element or sub-array selected by `index`, for writing.
    ///
    /// An element index gives `&mut A`; `..` or a slice argument gives a
    /// read-write view.
    ///
    /// **Panics** if an index is out of bounds.
    pub fn at_mut<I>(&mut self, index: I) -> I::Mut<'_, S>
    where
        I: Selector<D>,
    {
        index.select_mut(self)
    }
}
