// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Exchanging buffers with a foreign owner.
//!
//! Inbound, a [`ForeignBuffer`] describes memory that belongs to someone
//! else; [`SharedArray::from_foreign`](crate::ArrayBase::from_foreign) wraps
//! it without copying and calls its release function exactly once, when the
//! last reference is dropped.
//!
//! Outbound, a [`Capsule`] holds one reference to a shared buffer on behalf
//! of a foreign owner, together with the destructor that drops it.

use std::ffi::c_void;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::index_map::IndexMap;
use crate::{ArrayBase, DataOwned, Dimension, IntoDimension, RawData, SharedArray, SharedRepr};

/// Callback that hands a buffer back to its foreign owner.
pub type ReleaseFn = unsafe extern "C" fn(token: *mut c_void);

/// Callback that drops the reference held by a [`Capsule`].
pub type CapsuleDestructor = unsafe extern "C" fn(handle: *mut c_void);

/// Description of a buffer owned outside this crate: the elements, an
/// opaque owner token and the function that gives the buffer back.
pub struct ForeignBuffer<A> {
    ptr: NonNull<A>,
    len: usize,
    token: *mut c_void,
    release: ReleaseFn,
}

impl<A> ForeignBuffer<A> {
    /// Describe `len` elements at `ptr`, to be released by calling
    /// `release(token)`.
    ///
    /// Errors with `NullPointer` if `ptr` is null. On error the buffer stays
    /// with its owner and `release` is not called.
    pub fn new(
        ptr: *mut A,
        len: usize,
        token: *mut c_void,
        release: ReleaseFn,
    ) -> Result<Self, ArrayError> {
        let ptr = NonNull::new(ptr).ok_or_else(|| from_kind(ErrorKind::NullPointer))?;
        Ok(ForeignBuffer {
            ptr,
            len,
            token,
            release,
        })
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Take the buffer over into a shared handle with reference count one.
    ///
    /// ## Safety
    ///
    /// The buffer must hold `len` initialized elements and stay valid for
    /// reads and writes until `release(token)` is called. `release(token)`
    /// must be safe to call once, from any thread.
    pub unsafe fn into_handle(self) -> SharedRepr<A> {
        SharedRepr::from_foreign(self.ptr, self.len, self.token, self.release)
    }
}

impl<A> fmt::Debug for ForeignBuffer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("token", &self.token)
            .finish()
    }
}

/// The parts of a [`Capsule`] as handed across a foreign boundary.
///
/// The receiver must call `destructor(handle)` exactly once when it no
/// longer needs `data`.
#[repr(C)]
#[derive(Debug)]
pub struct RawCapsule {
    /// Opaque reference to the shared buffer.
    pub handle: *mut c_void,
    /// Start of the buffer.
    pub data: *const c_void,
    /// Number of elements in the buffer.
    pub len: usize,
    /// Drops the reference.
    pub destructor: CapsuleDestructor,
}

/// One reference to a shared buffer, held on behalf of a foreign owner.
///
/// Dropping the capsule (or calling the destructor of its
/// [`RawCapsule`]) drops the reference; the buffer is released when no
/// other reference remains.
///
/// ```
/// use ndmem::{arr1, SharedArray};
///
/// let a: SharedArray<f64, _> = arr1(&[1., 2., 3.]).into_shared();
/// let capsule = a.to_capsule().unwrap();
/// assert_eq!(a.handle().ref_count(), 2);
/// drop(capsule);
/// assert_eq!(a.handle().ref_count(), 1);
/// ```
pub struct Capsule {
    raw: RawCapsule,
}

unsafe extern "C" fn release_capsule<A>(handle: *mut c_void) {
    drop(Box::from_raw(handle as *mut SharedRepr<A>));
}

impl Capsule {
    pub(crate) fn new<A>(handle: SharedRepr<A>) -> Self
    where
        A: Send + Sync + 'static,
    {
        let data = handle.as_ptr() as *const c_void;
        let len = handle.len();
        let handle = Box::into_raw(Box::new(handle)) as *mut c_void;
        Capsule {
            raw: RawCapsule {
                handle,
                data,
                len,
                destructor: release_capsule::<A>,
            },
        }
    }

    /// Start of the buffer.
    pub fn data_ptr(&self) -> *const c_void {
        self.raw.data
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.raw.len
    }

    /// Whether the buffer has no elements.
    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    /// Give up the reference to a foreign owner.
    pub fn into_raw(self) -> RawCapsule {
        let this = ManuallyDrop::new(self);
        RawCapsule {
            handle: this.raw.handle,
            data: this.raw.data,
            len: this.raw.len,
            destructor: this.raw.destructor,
        }
    }

    /// Take back a reference handed out by [`Capsule::into_raw`].
    ///
    /// ## Safety
    ///
    /// `raw` must come from `into_raw` and its destructor must not have been
    /// called.
    pub unsafe fn from_raw(raw: RawCapsule) -> Self {
        Capsule { raw }
    }
}

impl Drop for Capsule {
    fn drop(&mut self) {
        unsafe { (self.raw.destructor)(self.raw.handle) }
    }
}

impl fmt::Debug for Capsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capsule")
            .field("data", &self.raw.data)
            .field("len", &self.raw.len)
            .finish()
    }
}

// A capsule is only built from handles whose elements are Send + Sync.
unsafe impl Send for Capsule {}
unsafe impl Sync for Capsule {}

impl<A, D> SharedArray<A, D>
where
    D: Dimension,
{
    /// Wrap a foreign buffer as a row-major array of `shape`, without
    /// copying.
    ///
    /// The buffer is taken over before the shape is checked, so `release`
    /// is called exactly once even when this returns an error: immediately
    /// on error, otherwise when the last reference is dropped.
    ///
    /// Errors with `OutOfBounds` if the shape needs more elements than the
    /// buffer has, or `Overflow` if its size overflows `isize`.
    ///
    /// ## Safety
    ///
    /// As for [`ForeignBuffer::into_handle`].
    pub unsafe fn from_foreign<Sh>(shape: Sh, buffer: ForeignBuffer<A>) -> Result<Self, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
    {
        let handle = buffer.into_handle();
        let map = IndexMap::try_new(shape)?;
        ArrayBase::from_parts(map, handle)
    }

    /// Wrap a foreign buffer with an explicit index map, without copying.
    ///
    /// Errors with `OutOfBounds` if the map addresses elements outside the
    /// buffer. `release` is called exactly once in every case.
    ///
    /// ## Safety
    ///
    /// As for [`ForeignBuffer::into_handle`].
    pub unsafe fn from_foreign_parts(
        map: IndexMap<D>,
        buffer: ForeignBuffer<A>,
    ) -> Result<Self, ArrayError> {
        ArrayBase::from_parts(map, buffer.into_handle())
    }
}

impl<A, S, D> ArrayBase<S, D>
where
    S: RawData<Elem = A>,
    D: Dimension,
{
    /// A capsule holding one more reference to the shared buffer behind
    /// the array: its own buffer for a shared array, the parent's buffer
    /// for a view of a shared array.
    ///
    /// Errors with `ParentlessBorrow` if there is no shared buffer to
    /// retain, as for owned arrays and views of them. Use
    /// [`into_capsule`](ArrayBase::into_capsule) or convert with
    /// `into_shared` first.
    pub fn to_capsule(&self) -> Result<Capsule, ArrayError>
    where
        A: Send + Sync + 'static,
    {
        self.data
            .shared_parent()
            .map(|parent| Capsule::new(parent.clone()))
            .ok_or_else(|| from_kind(ErrorKind::ParentlessBorrow))
    }
}

impl<A, S, D> ArrayBase<S, D>
where
    S: DataOwned<Elem = A>,
    D: Dimension,
{
    /// Give the buffer to a capsule, converting owned storage to shared
    /// storage without copying.
    pub fn into_capsule(self) -> Capsule
    where
        A: Send + Sync + 'static,
    {
        Capsule::new(self.data.into_shared())
    }
}
