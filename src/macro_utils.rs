// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Check a caller contract; panic with an `ndmem:`-prefixed message if it
/// does not hold.
///
/// The message is formatted only when debug assertions are enabled;
/// release builds report the failed expression.
#[cfg(debug_assertions)]
macro_rules! ndassert {
    ($e:expr, $fmt:literal $($t:tt)*) => {
        assert!($e, concat!("ndmem: ", $fmt) $($t)*)
    };
}

#[cfg(not(debug_assertions))]
macro_rules! ndassert {
    ($e:expr, $($_ignore:tt)*) => {
        assert!($e, "ndmem: contract violated: {}", stringify!($e))
    };
}
