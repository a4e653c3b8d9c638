// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The buffer handles: owned, shared, borrowed and mutably borrowed.

use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop, MaybeUninit};
use std::ptr::NonNull;
use std::slice;

#[cfg(not(target_has_atomic = "ptr"))]
use portable_atomic_util::Arc;
#[cfg(target_has_atomic = "ptr")]
use std::sync::Arc;

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::extension::nonnull;
use crate::foreign::ReleaseFn;

/// Exclusively owned buffer.
///
/// *Don’t use this type directly; use the type alias
/// [`Array`](crate::Array) for the array type!*
// Like a Vec, but the array decides which elements are addressed.
//
// repr(C) to make it transmutable OwnedRepr<A> -> OwnedRepr<B> if
// transmutable A -> B.
#[derive(Debug)]
#[repr(C)]
pub struct OwnedRepr<A> {
    ptr: NonNull<A>,
    len: usize,
    capacity: usize,
}

impl<A> OwnedRepr<A> {
    pub(crate) fn from(v: Vec<A>) -> Self {
        let mut v = ManuallyDrop::new(v);
        let len = v.len();
        let capacity = v.capacity();
        let ptr = nonnull::nonnull_from_vec_data(&mut v);
        Self { ptr, len, capacity }
    }

    /// Allocate room for `n` elements without initializing them.
    ///
    /// Errors with `AllocationFailed` if the allocator refuses the request;
    /// nothing is allocated in that case.
    pub(crate) fn allocate_uninit(n: usize) -> Result<OwnedRepr<MaybeUninit<A>>, ArrayError> {
        let mut v = Vec::new();
        v.try_reserve_exact(n)
            .map_err(|_| from_kind(ErrorKind::AllocationFailed))?;
        // MaybeUninit needs no initialization
        unsafe {
            v.set_len(n);
        }
        Ok(OwnedRepr::from(v))
    }

    /// Allocate `n` elements, the i-th initialized with `f(i)`.
    pub(crate) fn allocate_with<F>(n: usize, mut f: F) -> Result<Self, ArrayError>
    where
        F: FnMut(usize) -> A,
    {
        let mut v = Vec::new();
        v.try_reserve_exact(n)
            .map_err(|_| from_kind(ErrorKind::AllocationFailed))?;
        v.extend((0..n).map(&mut f));
        Ok(Self::from(v))
    }

    pub(crate) fn into_vec(self) -> Vec<A> {
        ManuallyDrop::new(self).take_as_vec()
    }

    pub(crate) fn as_slice(&self) -> &[A] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_ptr(&self) -> *const A {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_nonnull_mut(&mut self) -> NonNull<A> {
        self.ptr
    }

    /// Cast self into equivalent repr of other element type
    ///
    /// ## Safety
    ///
    /// Caller must ensure the two types have the same representation.
    /// **Panics** if sizes don't match (which is not a sufficient check).
    pub(crate) unsafe fn data_subst<B>(self) -> OwnedRepr<B> {
        // necessary but not sufficient check
        assert_eq!(mem::size_of::<A>(), mem::size_of::<B>());
        let self_ = ManuallyDrop::new(self);
        OwnedRepr {
            ptr: self_.ptr.cast::<B>(),
            len: self_.len,
            capacity: self_.capacity,
        }
    }

    fn take_as_vec(&mut self) -> Vec<A> {
        let capacity = self.capacity;
        let len = self.len;
        self.len = 0;
        self.capacity = 0;
        unsafe { Vec::from_raw_parts(self.ptr.as_ptr(), len, capacity) }
    }
}

impl<A> Clone for OwnedRepr<A>
where
    A: Clone,
{
    fn clone(&self) -> Self {
        Self::from(self.as_slice().to_vec())
    }
}

impl<A> Drop for OwnedRepr<A> {
    fn drop(&mut self) {
        if self.capacity > 0 {
            // Elements that need no drop may be left uninitialized (uninit
            // arrays); an empty Vec only frees the allocation.
            if !mem::needs_drop::<A>() {
                self.len = 0;
            }
            self.take_as_vec();
        }
    }
}

unsafe impl<A> Sync for OwnedRepr<A> where A: Sync {}
unsafe impl<A> Send for OwnedRepr<A> where A: Send {}

/// How a shared buffer is given back when its last handle drops.
enum Release {
    /// The buffer came from an `OwnedRepr`; rebuild the `Vec` and drop it.
    Heap { capacity: usize },
    /// The buffer belongs to a foreign owner; hand it back through `release`.
    Foreign { token: *mut c_void, release: ReleaseFn },
}

struct SharedBuffer<A> {
    ptr: NonNull<A>,
    len: usize,
    release: Release,
}

impl<A> Drop for SharedBuffer<A> {
    fn drop(&mut self) {
        match self.release {
            Release::Heap { capacity } => {
                let len = if mem::needs_drop::<A>() { self.len } else { 0 };
                unsafe {
                    drop(Vec::from_raw_parts(self.ptr.as_ptr(), len, capacity));
                }
            }
            Release::Foreign { token, release } => unsafe { release(token) },
        }
    }
}

// The release callback may run on whichever thread drops the last handle;
// `SharedRepr::from_foreign` makes the caller promise that this is allowed.
unsafe impl<A> Send for SharedBuffer<A> where A: Send + Sync {}
unsafe impl<A> Sync for SharedBuffer<A> where A: Send + Sync {}

/// Reference counted buffer.
///
/// Clones share one buffer and one atomic reference count. The buffer is
/// released exactly once, when the last clone is dropped: heap buffers are
/// deallocated, foreign buffers are returned to their owner through the
/// release callback given to [`SharedArray::from_foreign`].
///
/// *Don’t use this type directly; use the type alias
/// [`SharedArray`](crate::SharedArray) for the array type!*
///
/// [`SharedArray::from_foreign`]: crate::ArrayBase::from_foreign
pub struct SharedRepr<A> {
    buf: Arc<SharedBuffer<A>>,
}

impl<A> SharedRepr<A> {
    pub(crate) fn from_owned(owned: OwnedRepr<A>) -> Self {
        let mut owned = ManuallyDrop::new(owned);
        let ptr = owned.as_nonnull_mut();
        SharedRepr {
            buf: Arc::new(SharedBuffer {
                ptr,
                len: owned.len,
                release: Release::Heap {
                    capacity: owned.capacity,
                },
            }),
        }
    }

    /// Wrap `len` elements at `ptr` that belong to a foreign owner.
    ///
    /// ## Safety
    ///
    /// `ptr` must be valid for reads of `len` initialized elements until
    /// `release(token)` is called, and `release(token)` must be safe to call
    /// once from any thread.
    pub(crate) unsafe fn from_foreign(
        ptr: NonNull<A>,
        len: usize,
        token: *mut c_void,
        release: ReleaseFn,
    ) -> Self {
        SharedRepr {
            buf: Arc::new(SharedBuffer {
                ptr,
                len,
                release: Release::Foreign { token, release },
            }),
        }
    }

    /// Number of handles sharing the buffer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.buf)
    }

    /// Whether this is the only handle to the buffer.
    pub fn is_unique(&self) -> bool {
        self.ref_count() == 1
    }

    /// Whether the buffer is owned by a foreign owner.
    pub fn is_foreign(&self) -> bool {
        matches!(self.buf.release, Release::Foreign { .. })
    }

    /// Whether both handles share the same buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf)
    }

    pub(crate) fn as_ptr(&self) -> *const A {
        self.buf.ptr.as_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len
    }

    /// Take the buffer back as owned storage if this is the only handle and
    /// the buffer came from the heap.
    pub(crate) fn try_into_owned(self) -> Result<OwnedRepr<A>, Self> {
        let buf = match Arc::try_unwrap(self.buf) {
            Ok(buf) => buf,
            Err(buf) => return Err(SharedRepr { buf }),
        };
        let capacity = match buf.release {
            Release::Heap { capacity } => capacity,
            Release::Foreign { .. } => return Err(SharedRepr { buf: Arc::new(buf) }),
        };
        let buf = ManuallyDrop::new(buf);
        Ok(OwnedRepr {
            ptr: buf.ptr,
            len: buf.len,
            capacity,
        })
    }

    /// Pointer for writing, if no other handle shares the buffer.
    pub(crate) fn get_mut(&mut self) -> Option<NonNull<A>> {
        Arc::get_mut(&mut self.buf).map(|buf| buf.ptr)
    }
}

impl<A> Clone for SharedRepr<A> {
    fn clone(&self) -> Self {
        SharedRepr {
            buf: Arc::clone(&self.buf),
        }
    }
}

impl<A> std::fmt::Debug for SharedRepr<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRepr")
            .field("ptr", &self.buf.ptr)
            .field("len", &self.buf.len)
            .field("ref_count", &self.ref_count())
            .field("foreign", &self.is_foreign())
            .finish()
    }
}

/// Read-only borrow of another handle's buffer.
///
/// The lifetime `'a` ties the borrow to its owner. When the owner is a
/// [`SharedRepr`], the borrow remembers it as its parent so the buffer can
/// later be retained externally (see
/// [`ArrayBase::to_capsule`](crate::ArrayBase::to_capsule)).
///
/// *Don’t use this type directly; use the type alias
/// [`ArrayView`](crate::ArrayView) for the array type!*
#[derive(Debug)]
pub struct BorrowedRepr<'a, A> {
    ptr: NonNull<A>,
    len: usize,
    parent: Option<&'a SharedRepr<A>>,
    life: PhantomData<&'a A>,
}

impl<'a, A> Copy for BorrowedRepr<'a, A> {}

impl<'a, A> Clone for BorrowedRepr<'a, A> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A> BorrowedRepr<'a, A> {
    pub(crate) fn new(ptr: NonNull<A>, len: usize, parent: Option<&'a SharedRepr<A>>) -> Self {
        BorrowedRepr {
            ptr,
            len,
            parent,
            life: PhantomData,
        }
    }

    /// Borrow a slice, with no parent.
    pub(crate) fn from_slice(data: &'a [A]) -> Self {
        // slice pointers are never null
        let ptr = unsafe { nonnull::nonnull_debug_checked_from_ptr(data.as_ptr() as *mut A) };
        Self::new(ptr, data.len(), None)
    }

    pub(crate) fn as_ptr(&self) -> *const A {
        self.ptr.as_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The shared handle this borrow was taken from, if any.
    pub fn parent(&self) -> Option<&'a SharedRepr<A>> {
        self.parent
    }
}

// The parent may be cloned from any thread holding the borrow.
unsafe impl<'a, A> Send for BorrowedRepr<'a, A> where A: Send + Sync {}
unsafe impl<'a, A> Sync for BorrowedRepr<'a, A> where A: Send + Sync {}

/// Read-write borrow of another handle's buffer.
///
/// *Don’t use this type directly; use the type alias
/// [`ArrayViewMut`](crate::ArrayViewMut) for the array type!*
#[derive(Debug)]
pub struct BorrowedMutRepr<'a, A> {
    ptr: NonNull<A>,
    len: usize,
    life: PhantomData<&'a mut A>,
}

impl<'a, A> BorrowedMutRepr<'a, A> {
    pub(crate) fn new(ptr: NonNull<A>, len: usize) -> Self {
        BorrowedMutRepr {
            ptr,
            len,
            life: PhantomData,
        }
    }

    /// Borrow a mutable slice.
    pub(crate) fn from_slice(data: &'a mut [A]) -> Self {
        let ptr = unsafe { nonnull::nonnull_debug_checked_from_ptr(data.as_mut_ptr()) };
        Self::new(ptr, data.len())
    }

    pub(crate) fn as_ptr(&self) -> *const A {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_nonnull_mut(&mut self) -> NonNull<A> {
        self.ptr
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

unsafe impl<'a, A> Send for BorrowedMutRepr<'a, A> where A: Send {}
unsafe impl<'a, A> Sync for BorrowedMutRepr<'a, A> where A: Sync {}
