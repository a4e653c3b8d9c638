// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::ops::{Index, IndexMut};

use super::IntoDimension;
use crate::Ix;

/// Dimension description.
///
/// `Dim` describes the number of axes and the length of each axis
/// of an index map. It is also used as an index type.
///
/// The static-rank forms are `Ix0` to `Ix6` (`Dim<[Ix; N]>`); the
/// runtime-rank form is `IxDyn` (`Dim<Vec<Ix>>`).
///
/// ```
/// use ndmem::{Array2, Dim};
///
/// let mut array = Array2::<f64>::zeros((3, 2));
/// array[[0, 0]] = 1.;
/// assert_eq!(array.raw_dim(), Dim([3, 2]));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Dim<I: ?Sized> {
    index: I,
}

impl<I> Dim<I> {
    pub(crate) const fn new(index: I) -> Dim<I> {
        Dim { index }
    }

    #[inline(always)]
    pub(crate) fn ix(&self) -> &I {
        &self.index
    }

    #[inline(always)]
    pub(crate) fn ixm(&mut self) -> &mut I {
        &mut self.index
    }
}

/// Create a new dimension value.
#[allow(non_snake_case)]
pub fn Dim<T>(index: T) -> T::Dim
where
    T: IntoDimension,
{
    index.into_dimension()
}

impl<I: ?Sized> PartialEq<I> for Dim<I>
where
    I: PartialEq,
{
    fn eq(&self, rhs: &I) -> bool {
        self.index == *rhs
    }
}

impl<I> fmt::Debug for Dim<I>
where
    I: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.index)
    }
}

impl<I> Index<usize> for Dim<I>
where
    I: AsRef<[Ix]>,
{
    type Output = Ix;
    #[inline]
    fn index(&self, axis: usize) -> &Ix {
        &self.index.as_ref()[axis]
    }
}

impl<I> IndexMut<usize> for Dim<I>
where
    I: AsRef<[Ix]> + AsMut<[Ix]>,
{
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut Ix {
        &mut self.index.as_mut()[axis]
    }
}

/// zero-dimensionial
pub type Ix0 = Dim<[Ix; 0]>;
/// one-dimensional
pub type Ix1 = Dim<[Ix; 1]>;
/// two-dimensional
pub type Ix2 = Dim<[Ix; 2]>;
/// three-dimensional
pub type Ix3 = Dim<[Ix; 3]>;
/// four-dimensional
pub type Ix4 = Dim<[Ix; 4]>;
/// five-dimensional
pub type Ix5 = Dim<[Ix; 5]>;
/// six-dimensional
pub type Ix6 = Dim<[Ix; 6]>;
/// dynamic-dimensional
///
/// The rank of an `IxDyn` is only known at runtime; every operation that
/// depends on it checks the rank when it is called.
pub type IxDyn = Dim<Vec<Ix>>;

/// Create a zero-dimensional index
#[allow(non_snake_case)]
#[inline(always)]
pub const fn Ix0() -> Ix0 {
    Dim::new([])
}

/// Create a one-dimensional index
#[allow(non_snake_case)]
#[inline(always)]
pub const fn Ix1(i0: Ix) -> Ix1 {
    Dim::new([i0])
}

/// Create a two-dimensional index
#[allow(non_snake_case)]
#[inline(always)]
pub const fn Ix2(i0: Ix, i1: Ix) -> Ix2 {
    Dim::new([i0, i1])
}

/// Create a three-dimensional index
#[allow(non_snake_case)]
#[inline(always)]
pub const fn Ix3(i0: Ix, i1: Ix, i2: Ix) -> Ix3 {
    Dim::new([i0, i1, i2])
}

/// Create a dynamic-dimensional index
#[allow(non_snake_case)]
#[inline(always)]
pub fn IxDyn(ix: &[Ix]) -> IxDyn {
    Dim::new(ix.to_vec())
}
