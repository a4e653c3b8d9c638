// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::Debug;
use std::ops::IndexMut;

use num_integer::Integer;

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::slice::Slice;
use crate::{Ix, Ixs};

pub use self::conversion::IntoDimension;
pub use self::dim::*;
pub use self::ndindex::NdIndex;

mod conversion;
pub mod dim;
mod ndindex;

/// Calculate offset from `Ix` stride converting sign properly
#[inline(always)]
pub fn stride_offset(n: Ix, stride: Ix) -> isize {
    (n as isize) * (stride as Ixs)
}

/// Array shape and index trait.
///
/// Implemented by `Ix0` to `Ix6` (static rank) and by `IxDyn`
/// (rank known at runtime).
///
/// Strides are stored in the same type as the shape; each stride is an
/// `isize` reinterpreted as `usize`.
///
/// ***Don't implement this trait, it will evolve at will.***
pub trait Dimension:
    Clone + Eq + Debug + Send + Sync + Default + IndexMut<usize, Output = usize>
{
    /// For fixed-size dimension representations (e.g. `Ix2`), this should be
    /// `Some(ndim)`, and for variable-size dimension representations (e.g.
    /// `IxDyn`), this should be `None`.
    const NDIM: Option<usize>;

    /// Pattern matching friendly form of the dimension value.
    ///
    /// - For `Ix1`: `usize`,
    /// - For `Ix2`: `(usize, usize)`
    /// - and so on..
    /// - For `IxDyn`: `IxDyn`
    type Pattern: IntoDimension<Dim = Self> + Clone + Debug + PartialEq + Eq;

    /// Returns the number of dimensions (number of axes).
    fn ndim(&self) -> usize;

    #[doc(hidden)]
    fn slice(&self) -> &[Ix];

    #[doc(hidden)]
    fn slice_mut(&mut self) -> &mut [Ix];

    /// Convert the dimension into a pattern matching friendly value.
    fn into_pattern(self) -> Self::Pattern;

    /// Creates a dimension of all zeros with the specified ndim.
    ///
    /// **Panics** if `Self` has a fixed size that is not `ndim`.
    fn zeros(ndim: usize) -> Self;

    /// Compute the size of the dimension (number of elements)
    fn size(&self) -> usize {
        self.slice().iter().product()
    }

    /// Compute the size while checking for overflow.
    fn size_checked(&self) -> Option<usize> {
        self.slice()
            .iter()
            .try_fold(1usize, |s, &a| s.checked_mul(a))
    }

    /// Row-major strides: the last axis varies fastest.
    fn default_strides(&self) -> Self {
        let mut strides = Self::zeros(self.ndim());
        let mut cum_prod = 1;
        for (rs, &dim) in strides.slice_mut().iter_mut().zip(self.slice()).rev() {
            *rs = cum_prod;
            cum_prod *= dim;
        }
        strides
    }

    /// Contiguous strides for the axis order `layout`, given slowest axis
    /// first. `layout` must be a permutation of `0..ndim`.
    #[doc(hidden)]
    fn layout_strides(&self, layout: &Self) -> Self {
        let mut strides = Self::zeros(self.ndim());
        let mut cum_prod = 1;
        for &axis in layout.slice().iter().rev() {
            strides[axis] = cum_prod;
            cum_prod *= self[axis];
        }
        strides
    }

    /// The identity permutation: row-major axis order.
    #[doc(hidden)]
    fn default_layout(ndim: usize) -> Self {
        let mut layout = Self::zeros(ndim);
        for (i, ax) in layout.slice_mut().iter_mut().enumerate() {
            *ax = i;
        }
        layout
    }

    /// The first index in row-major order, or `None` if there are no
    /// elements.
    fn first_index(&self) -> Option<Self> {
        if self.slice().iter().any(|&d| d == 0) {
            return None;
        }
        Some(Self::zeros(self.ndim()))
    }

    /// Iteration -- Use self as size, and return next index after `index`
    /// or None if there are no more.
    fn next_for(&self, index: Self) -> Option<Self> {
        let mut index = index;
        let mut done = false;
        for (&dim, ix) in self.slice().iter().zip(index.slice_mut()).rev() {
            *ix += 1;
            if *ix == dim {
                *ix = 0;
            } else {
                done = true;
                break;
            }
        }
        if done {
            Some(index)
        } else {
            None
        }
    }

    /// Build a dimension from its axis lengths, or `None` if the number of
    /// axes does not fit `Self`.
    #[doc(hidden)]
    fn from_ix(ix: &[Ix]) -> Option<Self> {
        if let Some(n) = Self::NDIM {
            if n != ix.len() {
                return None;
            }
        }
        let mut dim = Self::zeros(ix.len());
        dim.slice_mut().copy_from_slice(ix);
        Some(dim)
    }

    /// Convert between dimension types of equal rank.
    fn from_dimension<D2: Dimension>(d: &D2) -> Option<Self> {
        Self::from_ix(d.slice())
    }

    /// Convert the dimension into its dynamic-rank form.
    fn into_dyn(self) -> IxDyn {
        Dim::new(self.slice().to_vec())
    }
}

macro_rules! impl_static_dimension {
    ($($n:expr, $pattern:ty, |$ix:ident| $into:expr;)*) => {
        $(
        impl Dimension for Dim<[Ix; $n]> {
            const NDIM: Option<usize> = Some($n);
            type Pattern = $pattern;
            #[inline]
            fn into_pattern(self) -> $pattern {
                let $ix = self.ix();
                $into
            }
            #[inline]
            fn ndim(&self) -> usize {
                $n
            }
            #[inline]
            fn slice(&self) -> &[Ix] {
                self.ix()
            }
            #[inline]
            fn slice_mut(&mut self) -> &mut [Ix] {
                self.ixm()
            }
            #[inline]
            fn zeros(ndim: usize) -> Self {
                ndassert!(ndim == $n,
                          "a dimension of rank {} was requested from a rank {} type",
                          ndim, $n);
                Dim::new([0; $n])
            }
        }
        )*
    };
}

impl_static_dimension! {
    0, (), |_ix| ();
    1, Ix, |ix| ix[0];
    2, (Ix, Ix), |ix| (ix[0], ix[1]);
    3, (Ix, Ix, Ix), |ix| (ix[0], ix[1], ix[2]);
    4, (Ix, Ix, Ix, Ix), |ix| (ix[0], ix[1], ix[2], ix[3]);
    5, (Ix, Ix, Ix, Ix, Ix), |ix| (ix[0], ix[1], ix[2], ix[3], ix[4]);
    6, (Ix, Ix, Ix, Ix, Ix, Ix), |ix| (ix[0], ix[1], ix[2], ix[3], ix[4], ix[5]);
}

impl Dimension for IxDyn {
    const NDIM: Option<usize> = None;
    type Pattern = Self;
    #[inline]
    fn into_pattern(self) -> Self {
        self
    }
    #[inline]
    fn ndim(&self) -> usize {
        self.ix().len()
    }
    #[inline]
    fn slice(&self) -> &[Ix] {
        self.ix()
    }
    #[inline]
    fn slice_mut(&mut self) -> &mut [Ix] {
        self.ixm()
    }
    #[inline]
    fn zeros(ndim: usize) -> Self {
        Dim::new(vec![0; ndim])
    }
    #[inline]
    fn into_dyn(self) -> IxDyn {
        self
    }
}

/// Returns the number of elements of `dim`, or an `Overflow` error if the
/// product of its non-zero axis lengths exceeds `isize::MAX`.
pub fn size_of_shape_checked<D: Dimension>(dim: &D) -> Result<usize, ArrayError> {
    let size_nonzero = dim
        .slice()
        .iter()
        .filter(|&&d| d != 0)
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| from_kind(ErrorKind::Overflow))?;
    if size_nonzero > isize::MAX as usize {
        Err(from_kind(ErrorKind::Overflow))
    } else {
        Ok(dim.size())
    }
}

/// Check whether the given `dim` and `strides` lead to overlapping indices
///
/// Axes are visited in the order of increasing absolute stride; an axis
/// overlaps if its stride does not exceed the reach of all preceding axes.
/// Axes of length 1 and broadcast axes (stride 0) are ignored.
///
/// The check is conservative: it may report overlap for some exotic
/// interleaved strides that are in fact injective.
pub fn dim_stride_overlap<D: Dimension>(dim: &D, strides: &D) -> bool {
    let mut axes: Vec<(usize, usize)> = dim
        .slice()
        .iter()
        .zip(strides.slice())
        .filter(|&(&d, &s)| d > 1 && s != 0)
        .map(|(&d, &s)| (d, (s as Ixs).unsigned_abs()))
        .collect();
    axes.sort_by_key(|&(_, s)| s);
    let mut reach = 0usize;
    for (d, s) in axes {
        if s <= reach {
            return true;
        }
        reach = reach.saturating_add(s.saturating_mul(d - 1));
    }
    false
}

#[inline]
fn abs_index(len: Ixs, index: Ixs) -> Ixs {
    if index < 0 {
        len + index
    } else {
        index
    }
}

/// Modify dimension, stride and return data pointer offset
///
/// **Panics** if the step is 0 or if any endpoint is out of bounds.
pub(crate) fn do_slice(dim: &mut Ix, stride: &mut Ix, slice: Slice) -> isize {
    let Slice { start, end, step } = slice;
    let len = *dim as Ixs;
    let start = abs_index(len, start);
    let end = abs_index(len, end.unwrap_or(len));
    ndassert!(0 <= start && start <= len,
              "slice start {} is out of bounds for an axis of length {}", start, len);
    ndassert!(0 <= end && end <= len,
              "slice end {} is out of bounds for an axis of length {}", end, len);
    ndassert!(step != 0, "slice step must be nonzero");

    let start = start as Ix;
    let end = (end as Ix).max(start);
    let m = end - start;

    // Data pointer offset; an empty range keeps the parent's base offset
    let mut offset = 0;
    if m != 0 {
        offset = stride_offset(start, *stride);
        // A negative step starts from the last element of the range
        if step < 0 {
            offset += stride_offset(m - 1, *stride);
        }
    }

    let s = *stride as Ixs;
    let abs_step = step.unsigned_abs();
    *dim = Integer::div_ceil(&m, &abs_step);
    *stride = (s * step) as Ix;
    offset
}

#[cfg(test)]
mod tests {
    use super::{dim_stride_overlap, do_slice, size_of_shape_checked, Dimension};
    use crate::error::ErrorKind;
    use crate::slice::Slice;
    use crate::{Dim, Ix2, Ix3, IxDyn};

    #[test]
    fn row_major_strides() {
        assert_eq!(Dim([2, 3, 4]).default_strides(), Dim([12, 4, 1]));
        assert_eq!(Dim([3, 0, 2]).default_strides(), Dim([0, 2, 1]));
        assert_eq!(IxDyn(&[5]).default_strides(), IxDyn(&[1]));
    }

    #[test]
    fn permuted_strides() {
        let dim = Dim([2, 3, 4]);
        assert_eq!(dim.layout_strides(&Dim([2, 1, 0])), Dim([1, 2, 6]));
        assert_eq!(dim.layout_strides(&Dim([1, 0, 2])), Dim([4, 8, 1]));
        assert_eq!(dim.layout_strides(&Ix3::default_layout(3)), dim.default_strides());
    }

    #[test]
    fn next_for_walks_row_major() {
        let dim = Dim([2, 2]);
        let mut seen = Vec::new();
        let mut index = dim.first_index();
        while let Some(ix) = index {
            seen.push(ix);
            index = dim.next_for(ix);
        }
        assert_eq!(seen, vec![Dim([0, 0]), Dim([0, 1]), Dim([1, 0]), Dim([1, 1])]);
        assert_eq!(Dim([3, 0]).first_index(), None);
    }

    #[test]
    fn overlapping_strides_dim() {
        let dim = Dim([2, 3, 2]);
        assert!(dim_stride_overlap(&dim, &Dim([5, 2, 1])));
        assert!(!dim_stride_overlap(&dim, &Dim([6, 2, 1])));
        // broadcast axis
        assert!(!dim_stride_overlap(&dim, &Dim([6, 0, 1])));
        let neg = Dim([2, 3]);
        assert!(!dim_stride_overlap(&neg, &Dim([3, (-1isize) as usize])));
        let huge = Dim([4, 3]);
        assert!(!dim_stride_overlap(&huge, &Dim([isize::MAX as usize, 1])));
        assert!(dim_stride_overlap(&huge, &Dim([isize::MAX as usize, isize::MAX as usize])));
    }

    #[test]
    fn shape_overflow() {
        let big = Dim([usize::MAX, 2]);
        assert_eq!(size_of_shape_checked(&big).unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(size_of_shape_checked(&Dim([isize::MAX as usize, 0])).unwrap(), 0);
    }

    #[test]
    fn slice_reversed_axis() {
        let (mut d, mut s) = (5, 1);
        let off = do_slice(&mut d, &mut s, Slice::new(1, Some(4), -1));
        assert_eq!((d, s as isize, off), (3, -1, 3));

        let (mut d, mut s) = (10, 3);
        let off = do_slice(&mut d, &mut s, Slice::new(0, None, 4));
        assert_eq!((d, s, off), (3, 12, 0));
    }

    #[test]
    fn slice_empty_reversed() {
        let (mut d, mut s) = (4, 2);
        let off = do_slice(&mut d, &mut s, Slice::new(2, Some(2), -1));
        assert_eq!((d, off), (0, 0));

        // start at the end of a reversed axis
        let (mut d, mut s) = (5, (-1isize) as usize);
        let off = do_slice(&mut d, &mut s, Slice::new(5, None, 1));
        assert_eq!((d, off), (0, 0));
    }

    #[test]
    #[should_panic]
    fn slice_start_out_of_bounds() {
        let (mut d, mut s) = (4, 1);
        do_slice(&mut d, &mut s, Slice::new(5, None, 1));
    }

    #[test]
    fn convert_rank() {
        let d = Dim([2, 3]).into_dyn();
        assert_eq!(Ix2::from_dimension(&d), Some(Dim([2, 3])));
        assert_eq!(Ix3::from_dimension(&d), None);
    }
}
