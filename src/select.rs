// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Call-style access: one argument type picks an element or a sub-array.

use std::ops::RangeFull;

use crate::{
    ArrayBase, ArrayViewMut, Data, DataMut, Dimension, Ix, Ix0, Ix1, Ix2, Ix3, Ix4, Ix5, Ix6,
    IxDyn, SliceArg, SliceInfo, SliceInfoElem,
};

/// An argument for [`at`](ArrayBase::at), [`at_mut`](ArrayBase::at_mut)
/// and [`into_at`](ArrayBase::into_at) on an array of rank `D`.
///
/// The argument decides what is returned:
///
/// | argument                  | `at`           | `at_mut`             | `into_at`           |
/// |---------------------------|----------------|----------------------|---------------------|
/// | element index             | `&A`           | `&mut A`             | `A` (a copy)        |
/// | `..`                      | sub-array      | `ArrayViewMut`       | the array itself    |
/// | slice argument (`s![..]`) | sub-array      | `ArrayViewMut`       | sliced array        |
///
/// A sub-array from `at` has the handle the array's slices get: a view
/// for owned and borrowed arrays, a new reference for shared arrays.
///
/// Element indices of static rank must have exactly one coordinate per
/// axis, which the type system checks. Dynamic-rank indices are checked at
/// runtime.
pub trait Selector<D: Dimension>: Sized {
    /// Result of [`at`](ArrayBase::at).
    type Ref<'a, S>
    where
        S: Data + 'a,
        D: 'a;

    /// Result of [`at_mut`](ArrayBase::at_mut).
    type Mut<'a, S>
    where
        S: DataMut + 'a,
        D: 'a;

    /// Result of [`into_at`](ArrayBase::into_at).
    type Val<S>
    where
        S: Data;

    #[doc(hidden)]
    fn select<'a, S>(self, array: &'a ArrayBase<S, D>) -> Self::Ref<'a, S>
    where
        S: Data;

    #[doc(hidden)]
    fn select_mut<'a, S>(self, array: &'a mut ArrayBase<S, D>) -> Self::Mut<'a, S>
    where
        S: DataMut;

    #[doc(hidden)]
    fn select_move<S>(self, array: ArrayBase<S, D>) -> Self::Val<S>
    where
        S: Data,
        S::Elem: Clone;
}

macro_rules! impl_selector_index {
    ($dim:ty: $($index:ty),+) => {
        $(
        impl Selector<$dim> for $index {
            type Ref<'a, S> = &'a S::Elem where S: Data + 'a, $dim: 'a;
            type Mut<'a, S> = &'a mut S::Elem where S: DataMut + 'a, $dim: 'a;
            type Val<S> = S::Elem where S: Data;

            fn select<'a, S>(self, array: &'a ArrayBase<S, $dim>) -> &'a S::Elem
            where
                S: Data,
            {
                &array[self]
            }

            fn select_mut<'a, S>(self, array: &'a mut ArrayBase<S, $dim>) -> &'a mut S::Elem
            where
                S: DataMut,
            {
                &mut array[self]
            }

            fn select_move<S>(self, array: ArrayBase<S, $dim>) -> S::Elem
            where
                S: Data,
                S::Elem: Clone,
            {
                array[self].clone()
            }
        }
        )+
    };
}

impl_selector_index!(Ix0: [Ix; 0], (), Ix0);
impl_selector_index!(Ix1: Ix, [Ix; 1], (Ix,), Ix1);
impl_selector_index!(Ix2: [Ix; 2], (Ix, Ix), Ix2);
impl_selector_index!(Ix3: [Ix; 3], (Ix, Ix, Ix), Ix3);
impl_selector_index!(Ix4: [Ix; 4], (Ix, Ix, Ix, Ix), Ix4);
impl_selector_index!(Ix5: [Ix; 5], (Ix, Ix, Ix, Ix, Ix), Ix5);
impl_selector_index!(Ix6: [Ix; 6], (Ix, Ix, Ix, Ix, Ix, Ix), Ix6);
impl_selector_index!(IxDyn: Vec<Ix>, IxDyn);

impl<'i> Selector<IxDyn> for &'i [Ix] {
    type Ref<'a, S> = &'a S::Elem where S: Data + 'a;
    type Mut<'a, S> = &'a mut S::Elem where S: DataMut + 'a;
    type Val<S> = S::Elem where S: Data;

    fn select<'a, S>(self, array: &'a ArrayBase<S, IxDyn>) -> &'a S::Elem
    where
        S: Data,
    {
        &array[self]
    }

    fn select_mut<'a, S>(self, array: &'a mut ArrayBase<S, IxDyn>) -> &'a mut S::Elem
    where
        S: DataMut,
    {
        &mut array[self]
    }

    fn select_move<S>(self, array: ArrayBase<S, IxDyn>) -> S::Elem
    where
        S: Data,
        S::Elem: Clone,
    {
        array[self].clone()
    }
}

impl<D> Selector<D> for RangeFull
where
    D: Dimension,
{
    type Ref<'a, S> = ArrayBase<S::View<'a>, D> where S: Data + 'a, D: 'a;
    type Mut<'a, S> = ArrayViewMut<'a, S::Elem, D> where S: DataMut + 'a, D: 'a;
    type Val<S> = ArrayBase<S, D> where S: Data;

    fn select<'a, S>(self, array: &'a ArrayBase<S, D>) -> ArrayBase<S::View<'a>, D>
    where
        S: Data,
    {
        ArrayBase {
            data: array.data.view_handle(),
            map: array.map.clone(),
        }
    }

    fn select_mut<'a, S>(self, array: &'a mut ArrayBase<S, D>) -> ArrayViewMut<'a, S::Elem, D>
    where
        S: DataMut,
    {
        array.view_mut()
    }

    fn select_move<S>(self, array: ArrayBase<S, D>) -> ArrayBase<S, D>
    where
        S: Data,
        S::Elem: Clone,
    {
        array
    }
}

macro_rules! impl_selector_slice {
    ([$($gen:tt)*] $arg:ty) => {
        impl<$($gen)* D> Selector<D> for $arg
        where
            D: Dimension,
            $arg: SliceArg<D>,
        {
            type Ref<'a, S> = ArrayBase<S::View<'a>, <$arg as SliceArg<D>>::OutDim>
            where
                S: Data + 'a,
                D: 'a;
            type Mut<'a, S> = ArrayViewMut<'a, S::Elem, <$arg as SliceArg<D>>::OutDim>
            where
                S: DataMut + 'a,
                D: 'a;
            type Val<S> = ArrayBase<S, <$arg as SliceArg<D>>::OutDim>
            where
                S: Data;

            fn select<'a, S>(self, array: &'a ArrayBase<S, D>) -> Self::Ref<'a, S>
            where
                S: Data,
            {
                array.slice(self)
            }

            fn select_mut<'a, S>(self, array: &'a mut ArrayBase<S, D>) -> Self::Mut<'a, S>
            where
                S: DataMut,
            {
                array.slice_mut(self)
            }

            fn select_move<S>(self, array: ArrayBase<S, D>) -> Self::Val<S>
            where
                S: Data,
                S::Elem: Clone,
            {
                array.slice_move(self)
            }
        }
    };
}

impl_selector_slice!([T, Din, Dout,] SliceInfo<T, Din, Dout>);
impl_selector_slice!(['s, T, Din, Dout,] &'s SliceInfo<T, Din, Dout>);
impl_selector_slice!(['s,] &'s [SliceInfoElem]);
