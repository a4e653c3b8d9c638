// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tuple to array conversion, IntoDimension, and related things

use crate::{Dim, Dimension, Ix, Ix0, Ix1, Ix2, Ix3, Ix4, Ix5, Ix6, IxDyn};

/// Argument conversion into a dimension.
///
/// Shapes and indices can be written as a single `usize` (one axis),
/// a tuple or array of `usize` (static rank), or a `Vec<usize>` / `&[usize]`
/// (dynamic rank).
pub trait IntoDimension {
    type Dim: Dimension;
    fn into_dimension(self) -> Self::Dim;
}

impl IntoDimension for Ix {
    type Dim = Ix1;
    #[inline(always)]
    fn into_dimension(self) -> Ix1 {
        Dim::new([self])
    }
}

impl<D> IntoDimension for D
where
    D: Dimension,
{
    type Dim = D;
    #[inline(always)]
    fn into_dimension(self) -> Self {
        self
    }
}

impl IntoDimension for Vec<Ix> {
    type Dim = IxDyn;
    #[inline(always)]
    fn into_dimension(self) -> IxDyn {
        Dim::new(self)
    }
}

impl<'a> IntoDimension for &'a [Ix] {
    type Dim = IxDyn;
    #[inline(always)]
    fn into_dimension(self) -> IxDyn {
        Dim::new(self.to_vec())
    }
}

macro_rules! array_into_dim {
    ($($n:expr => $dim:ty),*) => {
        $(
        impl IntoDimension for [Ix; $n] {
            type Dim = $dim;
            #[inline(always)]
            fn into_dimension(self) -> $dim {
                Dim::new(self)
            }
        }
        )*
    };
}

array_into_dim! {
    0 => Ix0, 1 => Ix1, 2 => Ix2, 3 => Ix3, 4 => Ix4, 5 => Ix5, 6 => Ix6
}

macro_rules! tuple_into_dim {
    ($dim:ty, $tup:ty, $($var:ident)*) => {
        impl IntoDimension for $tup {
            type Dim = $dim;
            #[inline(always)]
            #[allow(clippy::unused_unit)]
            fn into_dimension(self) -> $dim {
                let ($($var,)*) = self;
                Dim::new([$($var),*])
            }
        }
    };
}

tuple_into_dim!(Ix0, (), );
tuple_into_dim!(Ix1, (Ix,), a);
tuple_into_dim!(Ix2, (Ix, Ix), a b);
tuple_into_dim!(Ix3, (Ix, Ix, Ix), a b c);
tuple_into_dim!(Ix4, (Ix, Ix, Ix, Ix), a b c d);
tuple_into_dim!(Ix5, (Ix, Ix, Ix, Ix, Ix), a b c d e);
tuple_into_dim!(Ix6, (Ix, Ix, Ix, Ix, Ix, Ix), a b c d e f);
