// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::{Array, ArrayLike, Dimension, IndexMap, IntoDimension, OwnedRepr, RawData};

/// Methods specific to `Array0`.
impl<A> Array<A, crate::Ix0> {
    /// Returns the single element in the array without cloning it.
    ///
    /// ```
    /// use ndmem::Array0;
    ///
    /// let a = Array0::from_elem((), String::from("ok"));
    /// assert_eq!(a.into_scalar(), "ok");
    /// ```
    pub fn into_scalar(self) -> A {
        let offset = self.map.offset();
        let mut v = self.data.into_vec();
        v.swap_remove(offset)
    }
}

/// Methods specific to `Array`.
///
/// ***See also all methods for [`ArrayBase`](crate::ArrayBase)***
impl<A, D> Array<A, D>
where
    D: Dimension,
{
    /// Return the buffer of the array as a vector, in memory order.
    ///
    /// The vector holds the whole buffer, including any elements a slice
    /// no longer addresses; combine with the array's index map to find
    /// elements.
    pub fn into_raw_vec(self) -> Vec<A> {
        self.data.into_vec()
    }

    /// Change the shape of the array to `shape`.
    ///
    /// The axis order (layout) of the array is kept and the index map is
    /// rebuilt contiguous, with base offset zero. If the number of elements
    /// stays the same the buffer is reused and its contents are left as
    /// they are, in no particular arrangement. Otherwise the old buffer is
    /// dropped and a new one allocated, filled with `A::default()`.
    ///
    /// Dropping the buffer invalidates every view of it; the borrow checker
    /// rules those out for `Array`.
    ///
    /// A dynamic-rank array may change its rank if its layout is row-major
    /// or column-major; the new layout is of the same kind.
    ///
    /// **Panics** on the errors of [`try_resize`](Array::try_resize).
    ///
    /// ```
    /// use ndmem::{Array2, Dim};
    ///
    /// let mut a = Array2::<i32>::with_layout((2, 3), Dim([1, 0])).unwrap();
    /// let ptr = a.as_ptr();
    /// a.resize((3, 2));
    /// assert_eq!(a.shape(), &[3, 2]);
    /// assert_eq!(a.strides(), &[1, 3]);
    /// assert_eq!(a.as_ptr(), ptr);
    ///
    /// a.resize((4, 4));
    /// assert_eq!(a.len(), 16);
    /// ```
    pub fn resize<Sh>(&mut self, shape: Sh)
    where
        A: Default,
        Sh: IntoDimension<Dim = D>,
    {
        self.try_resize(shape)
            .unwrap_or_else(|e| panic!("ndmem: {}", e))
    }

    /// Change the shape of the array to `shape`, see [`resize`](Array::resize).
    ///
    /// Errors with `Overflow` if the size of `shape` overflows `isize`,
    /// `AllocationFailed` if a new buffer can not be allocated, and
    /// `RankMismatch` if a dynamic-rank array with a permuted layout is
    /// asked to change rank. On error the array is left unchanged.
    pub fn try_resize<Sh>(&mut self, shape: Sh) -> Result<(), ArrayError>
    where
        A: Default,
        Sh: IntoDimension<Dim = D>,
    {
        let dim = shape.into_dimension();
        let layout = self.resized_layout(dim.ndim())?;
        let map = IndexMap::with_layout(dim, layout)?;
        if map.size() != self.len() || !map.fits(self.data.buf_len()) {
            self.data = OwnedRepr::allocate_with(map.size(), |_| A::default())?;
        }
        self.map = map;
        Ok(())
    }

    // The layout a map of rank `ndim` gets, of the same kind as the current one.
    fn resized_layout(&self, ndim: usize) -> Result<D, ArrayError> {
        let current = self.map.layout();
        let mut layout = D::default_layout(ndim);
        if ndim == current.len() {
            layout.slice_mut().copy_from_slice(current);
        } else if current.iter().enumerate().all(|(i, &ax)| i == ax) {
            // row-major stays row-major
        } else if current.iter().rev().enumerate().all(|(i, &ax)| i == ax) {
            layout.slice_mut().reverse();
        } else {
            return Err(from_kind(ErrorKind::RankMismatch));
        }
        Ok(layout)
    }

    /// Make the array a copy of `src`: resize it to the shape of `src`, then
    /// write every element.
    ///
    /// The resize follows [`resize`](Array::resize); in particular a change
    /// in the number of elements replaces the buffer.
    ///
    /// **Panics** on the errors of [`try_resize`](Array::try_resize).
    ///
    /// ```
    /// use ndmem::{arr2, from_fn, Array2};
    ///
    /// let mut a = Array2::<u32>::zeros((1, 1));
    /// a.assign_from(&from_fn((2, 2), |(i, j)| (i * 2 + j) as u32));
    /// assert_eq!(a, arr2(&[[0, 1], [2, 3]]));
    /// ```
    pub fn assign_from<L>(&mut self, src: &L)
    where
        A: Default,
        L: ArrayLike<Elem = A, Dim = D> + ?Sized,
    {
        self.try_assign_from(src)
            .unwrap_or_else(|e| panic!("ndmem: {}", e))
    }

    /// Make the array a copy of `src`, see [`assign_from`](Array::assign_from).
    pub fn try_assign_from<L>(&mut self, src: &L) -> Result<(), ArrayError>
    where
        A: Default,
        L: ArrayLike<Elem = A, Dim = D> + ?Sized,
    {
        let dim = src.raw_dim();
        self.try_resize(dim.clone())?;
        let mut index = dim.first_index();
        while let Some(ix) = index {
            let elt = src.call(&ix);
            self[ix.clone()] = elt;
            index = dim.next_for(ix);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{arr2, Array2, ArrayD, ErrorKind, IxDyn};

    #[test]
    fn resize_same_size_keeps_buffer() {
        let mut a = Array2::<u8>::zeros((4, 6));
        let ptr = a.as_ptr();
        a.resize((3, 8));
        assert_eq!(a.as_ptr(), ptr);
        assert_eq!(a.strides(), &[8, 1]);
        a.resize((5, 5));
        assert_eq!(a.len(), 25);
        assert!(a.iter().all(|&x| x == 0));
    }

    #[test]
    fn resize_after_slice_is_dense() {
        let a = Array2::from_shape_fn((4, 4), |(i, j)| i * 4 + j);
        let mut b = a.slice_move(s![1..3, ..]);
        assert_eq!(b.index_map().offset(), 4);
        b.resize((2, 4));
        assert_eq!(b.index_map().offset(), 0);
        assert!(b.is_standard_layout());
    }

    #[test]
    fn resize_dyn_changes_rank() {
        let mut a = ArrayD::<f32>::with_layout(IxDyn(&[2, 3]), IxDyn(&[1, 0])).unwrap();
        a.resize(IxDyn(&[2, 3, 4]));
        assert_eq!(a.index_map().layout(), &[2, 1, 0]);
        assert_eq!(a.strides(), &[1, 2, 6]);

        let mut b = ArrayD::<f32>::with_layout(IxDyn(&[2, 3, 4]), IxDyn(&[1, 0, 2])).unwrap();
        let err = b.try_resize(IxDyn(&[24])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RankMismatch);
        assert_eq!(b.shape(), &[2, 3, 4]);
    }

    #[test]
    fn resize_overflow_leaves_array() {
        let mut a = Array2::<u8>::zeros((2, 2));
        let err = a.try_resize((usize::MAX, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(a.shape(), &[2, 2]);
    }

    #[test]
    fn assign_from_other_storage() {
        let src = arr2(&[[1, 2, 3], [4, 5, 6]]).into_shared();
        let mut a = Array2::<i32>::zeros((0, 0));
        a.assign_from(&src.slice(s![.., ..;-1]));
        assert_eq!(a, arr2(&[[3, 2, 1], [6, 5, 4]]));
    }
}
