// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{Array, ArrayBase, ArrayViewMut, BorrowedMutRepr, Dimension, SharedArray};

/// Methods specific to `SharedArray`.
///
/// ***See also all methods for [`ArrayBase`]***
impl<A, D> SharedArray<A, D>
where
    D: Dimension,
{
    /// Number of arrays and capsules sharing the buffer.
    pub fn ref_count(&self) -> usize {
        self.data.ref_count()
    }

    /// Returns `true` if the buffer is not shared with any other array or
    /// capsule.
    pub fn is_unique(&self) -> bool {
        self.data.is_unique()
    }

    /// Return a read-write view of the array if its buffer is not shared,
    /// otherwise `None`.
    ///
    /// A shared array is read-only while another handle could observe the
    /// write.
    ///
    /// ```
    /// use ndmem::arr1;
    ///
    /// let mut a = arr1(&[1, 2, 3]).into_shared();
    /// a.try_view_mut().unwrap()[0] = 7;
    /// assert_eq!(a[0], 7);
    ///
    /// let b = a.clone();
    /// assert!(a.try_view_mut().is_none());
    /// drop(b);
    /// assert!(a.try_view_mut().is_some());
    /// ```
    pub fn try_view_mut(&mut self) -> Option<ArrayViewMut<'_, A, D>> {
        let len = self.data.len();
        let ptr = self.data.get_mut()?;
        Some(ArrayBase {
            data: BorrowedMutRepr::new(ptr, len),
            map: self.map.clone(),
        })
    }

    /// Convert into an owned array.
    ///
    /// The addressed elements are copied into a new contiguous buffer when
    /// the buffer is shared, when it belongs to a foreign owner, or when the
    /// array does not address all of it; otherwise the buffer is taken over.
    pub fn into_owned(self) -> Array<A, D>
    where
        A: Clone,
    {
        let whole = self.map.is_contiguous() && self.map.size() == self.data.len();
        if !whole {
            return self.to_owned();
        }
        match self.data.try_into_owned() {
            Ok(data) => ArrayBase { data, map: self.map },
            Err(data) => ArrayBase { data, map: self.map }.to_owned(),
        }
    }
}
