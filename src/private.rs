// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sealing for the storage traits: the marker type is public but not
//! reachable from outside the crate, so only this crate can implement a
//! trait that declares `private_decl!{}`.

/// Unnameable outside the crate.
pub struct PrivateMarker;

macro_rules! private_decl {
    () => {
        /// Seals the trait; only `ndmem` implements it.
        #[doc(hidden)]
        fn __private__(&self) -> crate::private::PrivateMarker;
    };
}

macro_rules! private_impl {
    () => {
        fn __private__(&self) -> crate::private::PrivateMarker {
            crate::private::PrivateMarker
        }
    };
}
