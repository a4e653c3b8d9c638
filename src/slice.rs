// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::{Dimension, Ix0, Ix1, Ix2, Ix3, Ix4, Ix5, Ix6, IxDyn};

/// A slice (range with step size).
///
/// Negative `start` or `end` indexes are counted from the back of the axis.
/// If `end` is `None`, the slice extends to the end of the axis.
///
/// ## Examples
///
/// `Slice::new(0, None, 1)` is the full range of an axis. It can also be
/// created with `Slice::from(..)`.
///
/// `Slice::new(a, b, 2)` is every second element from `a` until `b`. It can
/// also be created with `Slice::from(a..b).step_by(2)`.
///
/// `Slice::new(a, None, -1)` is every element, from `a` until the end, in
/// reverse order. It can also be created with `Slice::from(a..).step_by(-1)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    pub start: isize,
    pub end: Option<isize>,
    pub step: isize,
}

impl Slice {
    /// Create a new `Slice` with the given extents.
    ///
    /// `step` must be nonzero.
    /// (This method checks with a debug assertion that `step` is not zero.)
    pub fn new(start: isize, end: Option<isize>, step: isize) -> Slice {
        debug_assert_ne!(step, 0, "Slice::new: step must be nonzero");
        Slice { start, end, step }
    }

    /// Create a new `Slice` with the given step size (multiplied with the
    /// previous step size).
    ///
    /// `step` must be nonzero.
    /// (This method checks with a debug assertion that `step` is not zero.)
    #[inline]
    pub fn step_by(self, step: isize) -> Self {
        debug_assert_ne!(step, 0, "Slice::step_by: step must be nonzero");
        Slice { step: self.step * step, ..self }
    }
}

/// Token to represent all remaining axes in a slice argument.
///
/// At most one `Ellipsis` may appear in a slice argument; it expands to as
/// many full ranges as needed to cover the rank of the array. Because that
/// number is only known once the argument meets an array, slicing with an
/// ellipsis produces a dynamic-rank result.
///
/// ```
/// use ndmem::{s, Array3, Ellipsis};
///
/// let a = Array3::<i32>::zeros((2, 3, 4));
/// let v = a.slice(s![Ellipsis, 1]);
/// assert_eq!(v.shape(), &[2, 3]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ellipsis;

/// Marker for the input rank of a slice argument that contains an
/// ellipsis: it can be applied to an array of any rank.
#[derive(Copy, Clone, Debug)]
pub struct AnyRank;

/// A slice (range with step), an index, or an ellipsis.
///
/// See also the [`s![]`](s!) macro for a convenient way to create a
/// `SliceInfo<[SliceInfoElem; n], Din, Dout>`.
///
/// ## Examples
///
/// `SliceInfoElem::Index(a)` is the index `a`. It can also be created with
/// `SliceInfoElem::from(a)`. The macro equivalent is `s![a]`.
///
/// `SliceInfoElem::Slice { start: 0, end: None, step: 1 }` is the full range
/// of an axis. It can also be created with `SliceInfoElem::from(..)`. The
/// macro equivalent is `s![..]`.
///
/// `SliceInfoElem::Slice { start: a, end: Some(b), step: 2 }` is every second
/// element from `a` until `b`. The macro equivalent is `s![a..b;2]`.
///
/// `SliceInfoElem::Ellipsis` stands for all axes not otherwise named. The
/// macro equivalent is `s![Ellipsis]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SliceInfoElem {
    /// A range with step size. Negative `start` or `end` indexes are counted
    /// from the back of the axis. If `end` is `None`, the slice extends to
    /// the end of the axis.
    Slice {
        start: isize,
        end: Option<isize>,
        step: isize,
    },
    /// A single index; the axis is removed from the result.
    Index(isize),
    /// All remaining axes, each taken in full.
    Ellipsis,
}

impl SliceInfoElem {
    /// Returns `true` if `self` is a `Slice` value.
    pub fn is_slice(&self) -> bool {
        matches!(self, SliceInfoElem::Slice { .. })
    }

    /// Returns `true` if `self` is an `Index` value.
    pub fn is_index(&self) -> bool {
        matches!(self, SliceInfoElem::Index(_))
    }

    /// Returns `true` if `self` is the `Ellipsis` value.
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, SliceInfoElem::Ellipsis)
    }
}

impl fmt::Display for SliceInfoElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SliceInfoElem::Index(index) => write!(f, "{}", index)?,
            SliceInfoElem::Slice { start, end, step } => {
                if start != 0 {
                    write!(f, "{}", start)?;
                }
                write!(f, "..")?;
                if let Some(i) = end {
                    write!(f, "{}", i)?;
                }
                if step != 1 {
                    write!(f, ";{}", step)?;
                }
            }
            SliceInfoElem::Ellipsis => write!(f, "...")?,
        }
        Ok(())
    }
}

impl From<Slice> for SliceInfoElem {
    #[inline]
    fn from(s: Slice) -> SliceInfoElem {
        SliceInfoElem::Slice {
            start: s.start,
            end: s.end,
            step: s.step,
        }
    }
}

impl From<Ellipsis> for SliceInfoElem {
    #[inline]
    fn from(_: Ellipsis) -> SliceInfoElem {
        SliceInfoElem::Ellipsis
    }
}

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice { start: 0, end: None, step: 1 }
    }
}

impl From<RangeFull> for SliceInfoElem {
    #[inline]
    fn from(r: RangeFull) -> SliceInfoElem {
        Slice::from(r).into()
    }
}

macro_rules! impl_slice_from_index_type {
    ($index:ty) => {
        impl From<Range<$index>> for Slice {
            #[inline]
            fn from(r: Range<$index>) -> Slice {
                Slice {
                    start: r.start as isize,
                    end: Some(r.end as isize),
                    step: 1,
                }
            }
        }

        impl From<RangeInclusive<$index>> for Slice {
            #[inline]
            fn from(r: RangeInclusive<$index>) -> Slice {
                let end = *r.end() as isize;
                Slice {
                    start: *r.start() as isize,
                    end: if end == -1 { None } else { Some(end + 1) },
                    step: 1,
                }
            }
        }

        impl From<RangeFrom<$index>> for Slice {
            #[inline]
            fn from(r: RangeFrom<$index>) -> Slice {
                Slice {
                    start: r.start as isize,
                    end: None,
                    step: 1,
                }
            }
        }

        impl From<RangeTo<$index>> for Slice {
            #[inline]
            fn from(r: RangeTo<$index>) -> Slice {
                Slice {
                    start: 0,
                    end: Some(r.end as isize),
                    step: 1,
                }
            }
        }

        impl From<$index> for SliceInfoElem {
            #[inline]
            fn from(r: $index) -> SliceInfoElem {
                SliceInfoElem::Index(r as isize)
            }
        }

        impl From<Range<$index>> for SliceInfoElem {
            #[inline]
            fn from(r: Range<$index>) -> SliceInfoElem {
                Slice::from(r).into()
            }
        }

        impl From<RangeInclusive<$index>> for SliceInfoElem {
            #[inline]
            fn from(r: RangeInclusive<$index>) -> SliceInfoElem {
                Slice::from(r).into()
            }
        }

        impl From<RangeFrom<$index>> for SliceInfoElem {
            #[inline]
            fn from(r: RangeFrom<$index>) -> SliceInfoElem {
                Slice::from(r).into()
            }
        }

        impl From<RangeTo<$index>> for SliceInfoElem {
            #[inline]
            fn from(r: RangeTo<$index>) -> SliceInfoElem {
                Slice::from(r).into()
            }
        }
    };
}

impl_slice_from_index_type!(isize);
impl_slice_from_index_type!(usize);
impl_slice_from_index_type!(i32);

/// Represents all of the necessary information to perform a slice.
///
/// The type `T` is typically `[SliceInfoElem; n]`, `&[SliceInfoElem]`, or
/// `Vec<SliceInfoElem>`. The type `Din` is the rank of the array to be
/// sliced (or [`AnyRank`] if `T` contains an ellipsis), and `Dout` is the
/// rank of the result.
#[derive(Debug)]
pub struct SliceInfo<T, Din, Dout> {
    in_dim: PhantomData<Din>,
    out_dim: PhantomData<Dout>,
    indices: T,
}

impl<T, Din, Dout> Deref for SliceInfo<T, Din, Dout> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.indices
    }
}

impl<T, Din, Dout> SliceInfo<T, Din, Dout> {
    /// Returns a new `SliceInfo` instance.
    ///
    /// ## Safety
    ///
    /// The caller must ensure that `Din` and `Dout` are consistent with
    /// `indices`; the index map code relies on it when it builds the output
    /// dimension.
    #[doc(hidden)]
    pub unsafe fn new_unchecked(indices: T, _dims: PhantomData<(Din, Dout)>) -> Self {
        SliceInfo {
            in_dim: PhantomData,
            out_dim: PhantomData,
            indices,
        }
    }
}

impl<T, Din, Dout> SliceInfo<T, Din, Dout>
where
    T: AsRef<[SliceInfoElem]>,
    Din: Dimension,
    Dout: Dimension,
{
    /// Returns a new `SliceInfo` instance.
    ///
    /// Errors with `RankMismatch` if `Din` or `Dout` is not consistent with
    /// `indices`, or if `indices` contains an ellipsis (use
    /// [`SliceInfo::with_ellipsis`] for those).
    pub fn new(indices: T) -> Result<Self, ArrayError> {
        let elems = indices.as_ref();
        if elems.iter().any(SliceInfoElem::is_ellipsis) {
            return Err(from_kind(ErrorKind::RankMismatch));
        }
        if let Some(ndim) = Din::NDIM {
            if ndim != elems.len() {
                return Err(from_kind(ErrorKind::RankMismatch));
            }
        }
        if let Some(ndim) = Dout::NDIM {
            if ndim != elems.iter().filter(|s| s.is_slice()).count() {
                return Err(from_kind(ErrorKind::RankMismatch));
            }
        }
        Ok(SliceInfo {
            in_dim: PhantomData,
            out_dim: PhantomData,
            indices,
        })
    }
}

impl<T> SliceInfo<T, AnyRank, IxDyn>
where
    T: AsRef<[SliceInfoElem]>,
{
    /// Returns a new `SliceInfo` that may be applied to an array of any
    /// rank.
    ///
    /// Errors with `RankMismatch` if `indices` contains more than one
    /// ellipsis.
    pub fn with_ellipsis(indices: T) -> Result<Self, ArrayError> {
        if indices.as_ref().iter().filter(|s| s.is_ellipsis()).count() > 1 {
            return Err(from_kind(ErrorKind::RankMismatch));
        }
        Ok(SliceInfo {
            in_dim: PhantomData,
            out_dim: PhantomData,
            indices,
        })
    }
}

impl<T, Din, Dout> AsRef<[SliceInfoElem]> for SliceInfo<T, Din, Dout>
where
    T: AsRef<[SliceInfoElem]>,
{
    fn as_ref(&self) -> &[SliceInfoElem] {
        self.indices.as_ref()
    }
}

impl<T, Din, Dout> Copy for SliceInfo<T, Din, Dout> where T: Copy {}

impl<T, Din, Dout> Clone for SliceInfo<T, Din, Dout>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        SliceInfo {
            in_dim: PhantomData,
            out_dim: PhantomData,
            indices: self.indices.clone(),
        }
    }
}

/// A type that can slice an array of rank `D`.
///
/// Implemented for `SliceInfo` values of matching input rank (any
/// `SliceInfo` may slice an `IxDyn` array; the argument count is then
/// checked at runtime), for `SliceInfo<_, AnyRank, IxDyn>` (contains an
/// ellipsis), for `[SliceInfoElem]`, and for references to all of these.
pub trait SliceArg<D: Dimension> {
    /// Rank of the sliced result.
    type OutDim: Dimension;

    #[doc(hidden)]
    fn elems(&self) -> &[SliceInfoElem];
}

macro_rules! impl_slicearg_static {
    ($($din:ty),*) => {
        $(
        impl<T, Dout> SliceArg<$din> for SliceInfo<T, $din, Dout>
        where
            T: AsRef<[SliceInfoElem]>,
            Dout: Dimension,
        {
            type OutDim = Dout;
            fn elems(&self) -> &[SliceInfoElem] {
                self.indices.as_ref()
            }
        }

        impl<T, Dout> SliceArg<IxDyn> for SliceInfo<T, $din, Dout>
        where
            T: AsRef<[SliceInfoElem]>,
            Dout: Dimension,
        {
            type OutDim = Dout;
            fn elems(&self) -> &[SliceInfoElem] {
                self.indices.as_ref()
            }
        }
        )*
    };
}

impl_slicearg_static!(Ix0, Ix1, Ix2, Ix3, Ix4, Ix5, Ix6);

impl<T, Dout> SliceArg<IxDyn> for SliceInfo<T, IxDyn, Dout>
where
    T: AsRef<[SliceInfoElem]>,
    Dout: Dimension,
{
    type OutDim = Dout;
    fn elems(&self) -> &[SliceInfoElem] {
        self.indices.as_ref()
    }
}

impl<T, D> SliceArg<D> for SliceInfo<T, AnyRank, IxDyn>
where
    T: AsRef<[SliceInfoElem]>,
    D: Dimension,
{
    type OutDim = IxDyn;
    fn elems(&self) -> &[SliceInfoElem] {
        self.indices.as_ref()
    }
}

impl<D> SliceArg<D> for [SliceInfoElem]
where
    D: Dimension,
{
    type OutDim = IxDyn;
    fn elems(&self) -> &[SliceInfoElem] {
        self
    }
}

impl<'a, D, I> SliceArg<D> for &'a I
where
    D: Dimension,
    I: SliceArg<D> + ?Sized,
{
    type OutDim = I::OutDim;
    fn elems(&self) -> &[SliceInfoElem] {
        (**self).elems()
    }
}

/// Type-level rank arithmetic for the [`s![]`](s!) macro.
#[doc(hidden)]
pub trait Rank {
    type Larger;
}

macro_rules! impl_rank {
    ($($d:ty => $larger:ty),*) => {
        $(
        impl Rank for $d {
            type Larger = $larger;
        }
        )*
    };
}

impl_rank! {
    Ix0 => Ix1, Ix1 => Ix2, Ix2 => Ix3, Ix3 => Ix4, Ix4 => Ix5, Ix5 => Ix6,
    Ix6 => IxDyn, IxDyn => IxDyn, AnyRank => AnyRank
}

/// Computes the input and output rank after one more slice argument.
#[doc(hidden)]
pub trait SliceNextDim<In, Out> {
    type NextIn;
    type NextOut;

    #[inline(always)]
    fn next_dims(&self, _: PhantomData<(In, Out)>) -> PhantomData<(Self::NextIn, Self::NextOut)> {
        PhantomData
    }
}

macro_rules! impl_slicenextdim {
    (index: $($index:ty),*) => {
        $(
        impl<In: Rank, Out> SliceNextDim<In, Out> for $index {
            type NextIn = In::Larger;
            type NextOut = Out;
        }
        )*
    };
    (range: $($range:ty),*) => {
        $(
        impl<In: Rank, Out: Rank> SliceNextDim<In, Out> for $range {
            type NextIn = In::Larger;
            type NextOut = Out::Larger;
        }
        )*
    };
}

impl_slicenextdim!(index: isize, usize, i32);
impl_slicenextdim!(range: RangeFull, Slice);
impl_slicenextdim!(range: Range<isize>, RangeInclusive<isize>, RangeFrom<isize>, RangeTo<isize>);
impl_slicenextdim!(range: Range<usize>, RangeInclusive<usize>, RangeFrom<usize>, RangeTo<usize>);
impl_slicenextdim!(range: Range<i32>, RangeInclusive<i32>, RangeFrom<i32>, RangeTo<i32>);

impl<In, Out> SliceNextDim<In, Out> for Ellipsis {
    type NextIn = AnyRank;
    type NextOut = IxDyn;
}

impl<In, Out> SliceNextDim<In, Out> for SliceInfoElem {
    type NextIn = AnyRank;
    type NextOut = IxDyn;
}

/// Slice argument constructor.
///
/// `s![]` takes a list of ranges/slices/indices, separated by comma, with
/// optional step sizes that are separated from the range by a semicolon. It
/// is converted into a [`SliceInfo`] instance whose input and output ranks
/// are computed at compile time.
///
/// Each range/slice uses signed endpoints, where a negative value is counted
/// from the end of the axis. Step sizes are also signed and may be negative,
/// but must not be zero. An index must lie within its axis.
///
/// The syntax is `s![` *[ elem [, elem [ , ... ] ] ]* `]`, where *elem* is
/// any of the following:
///
/// * *index*: an index to use for taking a subview with respect to that axis
/// * *range*: a range with step size 1 to use for slicing that axis
/// * *range* `;` *step*: a range with step size *step* to use for slicing that axis
/// * *slice*: a [`Slice`] instance to use for slicing that axis
/// * [`Ellipsis`]: all axes not named by the other elements
///
/// Without an ellipsis, the number of elements must match the number of
/// axes of the array; this is checked by the type system for static-rank
/// arrays. With an ellipsis, the result has dynamic rank.
///
/// For example `s![0..4;2, 6, 1..5]` is a slice of the first axis for 0..4
/// with step size 2, a subview of the second axis at index 6, and a slice of
/// the third axis for 1..5 with default step size 1. The input array must
/// have 3 dimensions. The resulting slice has shape `[2, 4]`.
///
/// ```
/// use ndmem::{s, Array2};
///
/// let a = Array2::from_shape_fn((4, 5), |(i, j)| 10 * i + j);
/// let v = a.slice(s![1..;2, ..;-2]);
/// assert_eq!(v.shape(), &[2, 3]);
/// assert_eq!(v[[0, 0]], 14);
/// ```
#[macro_export]
macro_rules! s(
    // empty call, i.e. `s![]`
    (@parse $dims:expr, []) => {
        {
            #[allow(unsafe_code)]
            unsafe {
                $crate::SliceInfo::new_unchecked([], $dims)
            }
        }
    };
    // convert a..b;c into @convert(a..b, c), final item
    (@parse $dims:expr, [$($stack:tt)*] $r:expr;$s:expr) => {
        match $r {
            r => {
                let dims = $crate::SliceNextDim::next_dims(&r, $dims);
                #[allow(unsafe_code)]
                unsafe {
                    $crate::SliceInfo::new_unchecked(
                        [$($stack)* $crate::s!(@convert r, $s)],
                        dims,
                    )
                }
            }
        }
    };
    // convert a..b into @convert(a..b), final item
    (@parse $dims:expr, [$($stack:tt)*] $r:expr) => {
        match $r {
            r => {
                let dims = $crate::SliceNextDim::next_dims(&r, $dims);
                #[allow(unsafe_code)]
                unsafe {
                    $crate::SliceInfo::new_unchecked(
                        [$($stack)* $crate::s!(@convert r)],
                        dims,
                    )
                }
            }
        }
    };
    // convert a..b;c into @convert(a..b, c), final item, trailing comma
    (@parse $dims:expr, [$($stack:tt)*] $r:expr;$s:expr ,) => {
        $crate::s![@parse $dims, [$($stack)*] $r;$s]
    };
    // convert a..b into @convert(a..b), final item, trailing comma
    (@parse $dims:expr, [$($stack:tt)*] $r:expr ,) => {
        $crate::s![@parse $dims, [$($stack)*] $r]
    };
    // convert a..b;c into @convert(a..b, c)
    (@parse $dims:expr, [$($stack:tt)*] $r:expr;$s:expr, $($t:tt)*) => {
        match $r {
            r => {
                $crate::s![@parse
                    $crate::SliceNextDim::next_dims(&r, $dims),
                    [$($stack)* $crate::s!(@convert r, $s),]
                    $($t)*
                ]
            }
        }
    };
    // convert a..b into @convert(a..b)
    (@parse $dims:expr, [$($stack:tt)*] $r:expr, $($t:tt)*) => {
        match $r {
            r => {
                $crate::s![@parse
                    $crate::SliceNextDim::next_dims(&r, $dims),
                    [$($stack)* $crate::s!(@convert r),]
                    $($t)*
                ]
            }
        }
    };
    // Catch-all clause for syntax errors
    (@parse $($t:tt)*) => { compile_error!("Invalid syntax in s![] call.") };
    // convert range/index/ellipsis into SliceInfoElem
    (@convert $r:expr) => {
        <$crate::SliceInfoElem as ::core::convert::From<_>>::from($r)
    };
    // convert range and step into SliceInfoElem
    (@convert $r:expr, $s:expr) => {
        <$crate::SliceInfoElem as ::core::convert::From<_>>::from(
            <$crate::Slice as ::core::convert::From<_>>::from($r).step_by($s as isize)
        )
    };
    ($($t:tt)*) => {
        $crate::s![@parse
            ::core::marker::PhantomData::<($crate::Ix0, $crate::Ix0)>,
            []
            $($t)*
        ]
    };
);

#[cfg(test)]
mod tests {
    use super::{Ellipsis, Slice, SliceInfo, SliceInfoElem};
    use crate::error::ErrorKind;
    use crate::{AnyRank, Ix1, Ix2, IxDyn};

    #[test]
    fn macro_builds_elems() {
        let info = s![1..3, 2, ..;-1];
        assert_eq!(
            info.as_ref(),
            &[
                SliceInfoElem::Slice { start: 1, end: Some(3), step: 1 },
                SliceInfoElem::Index(2),
                SliceInfoElem::Slice { start: 0, end: None, step: -1 },
            ]
        );
    }

    #[test]
    fn display_elems() {
        let elems = [
            SliceInfoElem::from(Slice::from(2..).step_by(3)),
            SliceInfoElem::from(4),
            SliceInfoElem::from(Ellipsis),
        ];
        let text: Vec<String> = elems.iter().map(|e| e.to_string()).collect();
        assert_eq!(text, ["2..;3", "4", "..."]);
    }

    #[test]
    fn checked_construction() {
        let ok = SliceInfo::<_, Ix2, Ix1>::new([SliceInfoElem::from(0), SliceInfoElem::from(..)]);
        assert!(ok.is_ok());
        let bad = SliceInfo::<_, Ix2, Ix2>::new([SliceInfoElem::from(0), SliceInfoElem::from(..)]);
        assert_eq!(bad.unwrap_err().kind(), ErrorKind::RankMismatch);
        let two = SliceInfo::<_, AnyRank, IxDyn>::with_ellipsis(vec![
            SliceInfoElem::Ellipsis,
            SliceInfoElem::Ellipsis,
        ]);
        assert_eq!(two.unwrap_err().kind(), ErrorKind::RankMismatch);
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(Slice::from(1..=3), Slice::new(1, Some(4), 1));
        assert_eq!(Slice::from(0..=-1), Slice::new(0, None, 1));
    }
}
