// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::{ArrayBase, Data, Dimension};

fn format_array<A, S, D, F>(array: &ArrayBase<S, D>, f: &mut fmt::Formatter<'_>, mut format: F) -> fmt::Result
where
    F: FnMut(&A, &mut fmt::Formatter<'_>) -> fmt::Result,
    D: Dimension,
    S: Data<Elem = A>,
{
    let dim = array.map.dim();
    let ndim = dim.ndim();
    let mut index = dim.first_index();
    let mut last_index = match index {
        None => dim.clone(),
        Some(ref ix) => ix.clone(),
    };
    for _ in 0..ndim {
        write!(f, "[")?;
    }
    let mut first = true;
    // Index wraparounds tell when to close and open brackets, and how many.
    while let Some(ix) = index {
        let take_n = if ndim == 0 { 1 } else { ndim - 1 };
        for (i, (a, b)) in ix
            .slice()
            .iter()
            .take(take_n)
            .zip(last_index.slice())
            .enumerate()
        {
            if a != b {
                let n = ndim - i - 1;
                for _ in 0..n {
                    write!(f, "]")?;
                }
                writeln!(f, ",")?;
                for _ in 0..ndim - n {
                    write!(f, " ")?;
                }
                for _ in 0..n {
                    write!(f, "[")?;
                }
                first = true;
                break;
            }
        }
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        let elt = unsafe { array.uget_offset(array.map.offset_of(&ix)) };
        format(elt, f)?;
        index = dim.next_for(ix.clone());
        last_index = ix;
    }
    for _ in 0..ndim {
        write!(f, "]")?;
    }
    Ok(())
}

/// Format the array using `Display` and apply the formatting parameters used
/// to each element.
///
/// The array is shown in multiline style.
impl<A: fmt::Display, S, D: Dimension> fmt::Display for ArrayBase<S, D>
where
    S: Data<Elem = A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_array(self, f, <_>::fmt)
    }
}

/// Format the array using `Debug` and apply the formatting parameters used
/// to each element.
///
/// Shape, strides, base offset and layout follow the elements.
impl<A: fmt::Debug, S, D: Dimension> fmt::Debug for ArrayBase<S, D>
where
    S: Data<Elem = A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_array(self, f, <_>::fmt)?;
        write!(
            f,
            " shape={:?}, strides={:?}, offset={}, layout={:?}",
            self.shape(),
            self.strides(),
            self.map.offset(),
            self.map.layout()
        )?;
        match D::NDIM {
            Some(ndim) => write!(f, ", const ndim={}", ndim)?,
            None => write!(f, ", dynamic ndim={}", self.ndim())?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{arr1, arr2, Array3};

    #[test]
    fn display_nested() {
        let a = arr2(&[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(format!("{}", a), "[[1, 2, 3],\n [4, 5, 6]]");
        assert_eq!(format!("{}", arr1(&[1.5, 2.])), "[1.5, 2]");
        let b = Array3::<u8>::zeros((2, 1, 2));
        assert_eq!(format!("{}", b), "[[[0, 0]],\n [[0, 0]]]");
    }

    #[test]
    fn debug_has_layout() {
        let a = arr1(&[1, 2]);
        assert_eq!(
            format!("{:?}", a),
            "[1, 2] shape=[2], strides=[1], offset=0, layout=[0], const ndim=1"
        );
    }
}
