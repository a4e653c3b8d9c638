// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Element iterators in logical (row-major index) order.

use std::fmt;
use std::marker::PhantomData;

use crate::{Dimension, IndexMap};

/// Base for array iterators
///
/// Walks the indices of an index map and yields element pointers.
struct Baseiter<A, D> {
    ptr: *mut A,
    map: IndexMap<D>,
    index: Option<D>,
    remaining: usize,
}

impl<A, D: Dimension> Baseiter<A, D> {
    /// Creating a Baseiter is unsafe: `ptr` must be the start of a buffer
    /// that `map` fits, valid for the lifetime of the wrapping iterator.
    #[inline]
    unsafe fn new(ptr: *mut A, map: IndexMap<D>) -> Self {
        Baseiter {
            ptr,
            index: map.dim().first_index(),
            remaining: map.size(),
            map,
        }
    }

    #[inline]
    fn next(&mut self) -> Option<*mut A> {
        let index = self.index.take()?;
        let offset = self.map.offset_of(&index);
        self.index = self.map.dim().next_for(index);
        self.remaining -= 1;
        Some(self.ptr.wrapping_add(offset))
    }
}

/// An iterator over the elements of an array.
///
/// Iterator element type is `&'a A`.
pub struct Iter<'a, A, D> {
    inner: Baseiter<A, D>,
    life: PhantomData<&'a A>,
}

impl<'a, A, D: Dimension> Iter<'a, A, D> {
    pub(crate) fn new(ptr: *const A, map: IndexMap<D>) -> Self {
        Iter {
            inner: unsafe { Baseiter::new(ptr as *mut A, map) },
            life: PhantomData,
        }
    }
}

impl<'a, A, D: Dimension> Iterator for Iter<'a, A, D> {
    type Item = &'a A;

    #[inline]
    fn next(&mut self) -> Option<&'a A> {
        self.inner.next().map(|p| unsafe { &*p })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining, Some(self.inner.remaining))
    }
}

impl<A, D: Dimension> ExactSizeIterator for Iter<'_, A, D> {}

impl<A, D: Dimension> Clone for Iter<'_, A, D> {
    fn clone(&self) -> Self {
        Iter {
            inner: Baseiter {
                ptr: self.inner.ptr,
                map: self.inner.map.clone(),
                index: self.inner.index.clone(),
                remaining: self.inner.remaining,
            },
            life: PhantomData,
        }
    }
}

impl<A: fmt::Debug, D: Dimension> fmt::Debug for Iter<'_, A, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the elements of an array (mutable).
///
/// Iterator element type is `&'a mut A`.
pub struct IterMut<'a, A, D> {
    inner: Baseiter<A, D>,
    life: PhantomData<&'a mut A>,
}

impl<'a, A, D: Dimension> IterMut<'a, A, D> {
    /// **Panics** if `map` repeats an element along an axis.
    pub(crate) fn new(ptr: *mut A, map: IndexMap<D>) -> Self {
        ndassert!(map.strides().iter().zip(map.lengths()).all(|(&s, &d)| s != 0 || d <= 1),
                  "mutable iteration over an array with repeated elements, strides {:?}",
                  map.strides());
        IterMut {
            inner: unsafe { Baseiter::new(ptr, map) },
            life: PhantomData,
        }
    }
}

impl<'a, A, D: Dimension> Iterator for IterMut<'a, A, D> {
    type Item = &'a mut A;

    #[inline]
    fn next(&mut self) -> Option<&'a mut A> {
        self.inner.next().map(|p| unsafe { &mut *p })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining, Some(self.inner.remaining))
    }
}

impl<A, D: Dimension> ExactSizeIterator for IterMut<'_, A, D> {}

unsafe impl<A: Sync, D: Send> Send for Iter<'_, A, D> {}
unsafe impl<A: Sync, D: Sync> Sync for Iter<'_, A, D> {}
unsafe impl<A: Send, D: Send> Send for IterMut<'_, A, D> {}
unsafe impl<A: Sync, D: Sync> Sync for IterMut<'_, A, D> {}

#[cfg(test)]
mod tests {
    use crate::{s, Array2, Array3, Dim, IndexMap};

    #[test]
    fn logical_order_any_layout() {
        let map = IndexMap::with_layout(Dim([2, 3]), Dim([1, 0])).unwrap();
        let data: Vec<i32> = (0..6).collect();
        let a = Array2::from_layout_vec(map, data).unwrap();
        // column-major storage, row-major walk
        let got: Vec<i32> = a.iter().cloned().collect();
        assert_eq!(got, vec![0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn reversed_and_exact_size() {
        let a = Array3::from_shape_fn((2, 2, 3), |(i, j, k)| i * 100 + j * 10 + k);
        let v = a.slice(s![1, .., ..;-1]);
        let mut it = v.iter();
        assert_eq!(it.len(), 6);
        assert_eq!(it.next(), Some(&102));
        assert_eq!(it.len(), 5);
        let rest: Vec<_> = it.cloned().collect();
        assert_eq!(rest, vec![101, 100, 112, 111, 110]);
    }

    #[test]
    fn empty_iter() {
        let a = Array2::<u8>::zeros((3, 0));
        assert_eq!(a.iter().len(), 0);
        assert_eq!(a.iter().next(), None);
    }

    #[test]
    fn iter_mut_writes() {
        let mut a = Array2::<i32>::zeros((2, 3));
        for (i, x) in a.slice_mut(s![.., 1..]).iter_mut().enumerate() {
            *x = i as i32 + 1;
        }
        assert_eq!(a.iter().cloned().collect::<Vec<_>>(), vec![0, 1, 2, 0, 3, 4]);
    }
}
