// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

/// An error related to array shape, layout, allocation or ownership.
#[derive(Clone)]
pub struct ArrayError {
    // we want to be able to change this representation later
    repr: ErrorKind,
}

impl ArrayError {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.repr
    }

    /// Create a new `ArrayError`
    pub fn from_kind(error: ErrorKind) -> Self {
        from_kind(error)
    }
}

/// Error code for an error related to array shape, layout or ownership.
///
/// This enumeration is not exhaustive. The representation of the enum
/// is not guaranteed.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// incompatible shape
    IncompatibleShape,
    /// the number of axes does not match
    RankMismatch,
    /// index map addresses memory outside of the buffer
    OutOfBounds,
    /// nested literal rows of unequal length
    IrregularRows,
    /// shape or size overflows `isize`
    Overflow,
    /// the allocator could not satisfy the request
    AllocationFailed,
    /// axis order is not a permutation of the axes
    InvalidLayout,
    /// strides lead to aliasing array elements
    Unsupported,
    /// an array with no shared owner was handed out for retention: an
    /// exclusively owned array, or a view that does not borrow from a shared
    /// array; owned arrays can be given away with `into_capsule` instead
    ParentlessBorrow,
    /// a foreign buffer was described by a null pointer
    NullPointer,
}

#[inline(always)]
pub fn from_kind(k: ErrorKind) -> ArrayError {
    ArrayError { repr: k }
}

impl PartialEq for ArrayError {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        self.repr == rhs.repr
    }
}

impl Error for ArrayError {}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.kind() {
            ErrorKind::IncompatibleShape => "incompatible shapes",
            ErrorKind::RankMismatch => "number of axes does not match",
            ErrorKind::OutOfBounds => "index map leads to out of bounds indexing",
            ErrorKind::IrregularRows => "nested rows are not of equal length",
            ErrorKind::Overflow => "shape too large, size overflows isize",
            ErrorKind::AllocationFailed => "memory allocation failed",
            ErrorKind::InvalidLayout => "layout is not a permutation of the axes",
            ErrorKind::Unsupported => "strides lead to aliasing array elements",
            ErrorKind::ParentlessBorrow => {
                "array has no shared owner and can not be retained externally (owned arrays: use into_capsule)"
            }
            ErrorKind::NullPointer => "foreign buffer pointer is null",
        };
        write!(f, "ArrayError/{:?}: {}", self.kind(), description)
    }
}

impl fmt::Debug for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
