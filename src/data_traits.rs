// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The data (inner representation) traits for ndmem

use std::ptr::NonNull;

use crate::{BorrowedMutRepr, BorrowedRepr, OwnedRepr, SharedRepr};

/// Array representation trait.
///
/// The buffer a handle gives access to: its start and its element count.
///
/// ***Note:*** `RawData` is not an extension interface at this point.
/// Traits in Rust can serve many different roles. This trait is public because
/// it is used as a bound on public methods.
#[allow(clippy::missing_safety_doc)]
pub unsafe trait RawData: Sized {
    /// The array element type.
    type Elem;

    #[doc(hidden)]
    fn buf_ptr(&self) -> *const Self::Elem;

    #[doc(hidden)]
    fn buf_len(&self) -> usize;

    /// The reference counted handle that owns the buffer, if it can be
    /// traced.
    #[doc(hidden)]
    fn shared_parent(&self) -> Option<&SharedRepr<Self::Elem>>;

    private_decl! {}
}

/// Array representation trait.
///
/// For an array whose elements can be read. `View` is the handle a slice
/// of the array gets: a borrow for owned and borrowed arrays, another
/// reference to the same buffer for shared arrays.
///
/// ***Internal trait, see `RawData`.***
#[allow(clippy::missing_safety_doc)]
pub unsafe trait Data: RawData {
    /// Handle type of a slice of the array.
    type View<'a>: Data<Elem = Self::Elem>
    where
        Self: 'a;

    #[doc(hidden)]
    fn view_handle(&self) -> Self::View<'_>;

    /// A read-only borrow of the whole buffer.
    #[doc(hidden)]
    fn borrow_handle(&self) -> BorrowedRepr<'_, Self::Elem>;
}

/// Array representation trait.
///
/// For an array with writable elements.
///
/// ***Internal trait, see `RawData`.***
#[allow(clippy::missing_safety_doc)]
pub unsafe trait DataMut: Data {
    #[doc(hidden)]
    fn buf_ptr_mut(&mut self) -> NonNull<Self::Elem>;

    /// A read-write borrow of the whole buffer.
    #[doc(hidden)]
    fn borrow_handle_mut(&mut self) -> BorrowedMutRepr<'_, Self::Elem> {
        let len = self.buf_len();
        BorrowedMutRepr::new(self.buf_ptr_mut(), len)
    }
}

/// Array representation trait.
///
/// A representation that owns its data and can be built from a `Vec`.
///
/// ***Internal trait, see `RawData`.***
#[allow(clippy::missing_safety_doc)]
pub unsafe trait DataOwned: Data {
    #[doc(hidden)]
    fn new(elements: Vec<Self::Elem>) -> Self;

    /// Converts the data representation to a shared (reference counted)
    /// data representation, without copying the elements.
    #[doc(hidden)]
    fn into_shared(self) -> SharedRepr<Self::Elem>;
}

unsafe impl<A> RawData for OwnedRepr<A> {
    type Elem = A;

    fn buf_ptr(&self) -> *const A {
        self.as_ptr()
    }

    fn buf_len(&self) -> usize {
        self.len()
    }

    fn shared_parent(&self) -> Option<&SharedRepr<A>> {
        None
    }

    private_impl! {}
}

unsafe impl<A> Data for OwnedRepr<A> {
    type View<'a> = BorrowedRepr<'a, A> where Self: 'a;

    fn view_handle(&self) -> BorrowedRepr<'_, A> {
        self.borrow_handle()
    }

    fn borrow_handle(&self) -> BorrowedRepr<'_, A> {
        BorrowedRepr::from_slice(self.as_slice())
    }
}

unsafe impl<A> DataMut for OwnedRepr<A> {
    fn buf_ptr_mut(&mut self) -> NonNull<A> {
        self.as_nonnull_mut()
    }
}

unsafe impl<A> DataOwned for OwnedRepr<A> {
    fn new(elements: Vec<A>) -> Self {
        OwnedRepr::from(elements)
    }

    fn into_shared(self) -> SharedRepr<A> {
        SharedRepr::from_owned(self)
    }
}

unsafe impl<A> RawData for SharedRepr<A> {
    type Elem = A;

    fn buf_ptr(&self) -> *const A {
        self.as_ptr()
    }

    fn buf_len(&self) -> usize {
        self.len()
    }

    fn shared_parent(&self) -> Option<&SharedRepr<A>> {
        Some(self)
    }

    private_impl! {}
}

// Slices of a shared array hold their own reference.
unsafe impl<A> Data for SharedRepr<A> {
    type View<'a> = SharedRepr<A> where Self: 'a;

    fn view_handle(&self) -> SharedRepr<A> {
        self.clone()
    }

    fn borrow_handle(&self) -> BorrowedRepr<'_, A> {
        // a shared buffer pointer comes from a NonNull
        let ptr = unsafe { crate::extension::nonnull::nonnull_debug_checked_from_ptr(self.as_ptr() as *mut A) };
        BorrowedRepr::new(ptr, self.len(), Some(self))
    }
}

unsafe impl<A> DataOwned for SharedRepr<A> {
    fn new(elements: Vec<A>) -> Self {
        SharedRepr::from_owned(OwnedRepr::from(elements))
    }

    fn into_shared(self) -> SharedRepr<A> {
        self
    }
}

unsafe impl<'b, A> RawData for BorrowedRepr<'b, A> {
    type Elem = A;

    fn buf_ptr(&self) -> *const A {
        self.as_ptr()
    }

    fn buf_len(&self) -> usize {
        self.len()
    }

    fn shared_parent(&self) -> Option<&SharedRepr<A>> {
        self.parent()
    }

    private_impl! {}
}

unsafe impl<'b, A> Data for BorrowedRepr<'b, A> {
    type View<'a> = BorrowedRepr<'a, A> where Self: 'a;

    fn view_handle(&self) -> BorrowedRepr<'_, A> {
        *self
    }

    fn borrow_handle(&self) -> BorrowedRepr<'_, A> {
        *self
    }
}

unsafe impl<'b, A> RawData for BorrowedMutRepr<'b, A> {
    type Elem = A;

    fn buf_ptr(&self) -> *const A {
        self.as_ptr()
    }

    fn buf_len(&self) -> usize {
        self.len()
    }

    fn shared_parent(&self) -> Option<&SharedRepr<A>> {
        None
    }

    private_impl! {}
}

unsafe impl<'b, A> Data for BorrowedMutRepr<'b, A> {
    type View<'a> = BorrowedRepr<'a, A> where Self: 'a;

    fn view_handle(&self) -> BorrowedRepr<'_, A> {
        self.borrow_handle()
    }

    fn borrow_handle(&self) -> BorrowedRepr<'_, A> {
        let ptr = unsafe { crate::extension::nonnull::nonnull_debug_checked_from_ptr(self.as_ptr() as *mut A) };
        BorrowedRepr::new(ptr, self.len(), None)
    }
}

unsafe impl<'b, A> DataMut for BorrowedMutRepr<'b, A> {
    fn buf_ptr_mut(&mut self) -> NonNull<A> {
        self.as_nonnull_mut()
    }
}
