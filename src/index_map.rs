// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The strided index map: from an n-dimensional index to a linear offset.

use crate::dimension::{
    dim_stride_overlap, do_slice, size_of_shape_checked, stride_offset, Dimension, IntoDimension,
    NdIndex,
};
use crate::error::{from_kind, ArrayError, ErrorKind};
use crate::slice::{Slice, SliceArg, SliceInfoElem};
use crate::{Ix, IxDyn, Ixs};

/// A strided mapping from n-dimensional indices to offsets into a linear
/// buffer.
///
/// The offset of index `(i0, i1, ..)` is `offset + i0 * s0 + i1 * s1 + ..`
/// where the strides `s` are signed. The map also records its *layout*: the
/// order of the axes from slowest to fastest varying, as a permutation of
/// `0..ndim`. A freshly built map is contiguous in its layout; slicing
/// keeps the parent's layout for the surviving axes.
///
/// ```
/// use ndmem::{Dim, IndexMap};
///
/// let map = IndexMap::new(Dim([2, 3]));
/// assert_eq!(map.strides(), &[3, 1]);
/// assert_eq!(map.index([1, 2]), Some(5));
///
/// let col = IndexMap::with_layout(Dim([2, 3]), Dim([1, 0])).unwrap();
/// assert_eq!(col.strides(), &[1, 2]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IndexMap<D> {
    dim: D,
    // isize strides stored as usize
    strides: D,
    offset: usize,
    layout: D,
}

impl<D> IndexMap<D>
where
    D: Dimension,
{
    /// Row-major map of `shape`: the last axis varies fastest.
    ///
    /// **Panics** if the number of elements overflows `isize`.
    pub fn new<Sh>(shape: Sh) -> Self
    where
        Sh: IntoDimension<Dim = D>,
    {
        Self::try_new(shape).unwrap_or_else(|e| panic!("ndmem: {}", e))
    }

    /// Row-major map of `shape`.
    ///
    /// Errors with `Overflow` if the number of elements overflows `isize`.
    pub fn try_new<Sh>(shape: Sh) -> Result<Self, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
    {
        let dim = shape.into_dimension();
        let layout = D::default_layout(dim.ndim());
        Self::try_contiguous(dim, layout)
    }

    /// Map of `shape` that is contiguous in the axis order `layout`
    /// (slowest axis first).
    ///
    /// Errors with `InvalidLayout` if `layout` is not a permutation of the
    /// axes, `RankMismatch` if its rank differs from the shape, and
    /// `Overflow` if the number of elements overflows `isize`.
    pub fn with_layout<Sh, L>(shape: Sh, layout: L) -> Result<Self, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
        L: IntoDimension<Dim = D>,
    {
        let dim = shape.into_dimension();
        let layout = layout.into_dimension();
        if layout.ndim() != dim.ndim() {
            return Err(from_kind(ErrorKind::RankMismatch));
        }
        if !is_permutation(layout.slice()) {
            return Err(from_kind(ErrorKind::InvalidLayout));
        }
        Self::try_contiguous(dim, layout)
    }

    fn try_contiguous(dim: D, layout: D) -> Result<Self, ArrayError> {
        size_of_shape_checked(&dim)?;
        let strides = dim.layout_strides(&layout);
        Ok(IndexMap {
            dim,
            strides,
            offset: 0,
            layout,
        })
    }

    /// Map with explicit signed `strides` and base `offset`.
    ///
    /// The layout is derived from the strides: axes are ordered by
    /// decreasing absolute stride.
    ///
    /// Errors with `RankMismatch` if the number of strides differs from the
    /// number of axes, `Overflow` if the size or any offset overflows,
    /// `OutOfBounds` if a negative stride reaches below offset zero and
    /// `Unsupported` if two distinct indices would share an offset. A
    /// stride of zero (repeating an element along an axis) is accepted.
    pub fn with_strides<Sh>(shape: Sh, strides: &[isize], offset: usize) -> Result<Self, ArrayError>
    where
        Sh: IntoDimension<Dim = D>,
    {
        let dim = shape.into_dimension();
        if strides.len() != dim.ndim() {
            return Err(from_kind(ErrorKind::RankMismatch));
        }
        size_of_shape_checked(&dim)?;
        let mut st = D::zeros(dim.ndim());
        for (s, &stride) in st.slice_mut().iter_mut().zip(strides) {
            *s = stride as Ix;
        }
        let mut layout = D::default_layout(dim.ndim());
        layout
            .slice_mut()
            .sort_by_key(|&ax| std::cmp::Reverse(strides[ax].unsigned_abs()));
        let map = IndexMap {
            dim,
            strides: st,
            offset,
            layout,
        };
        match map.offset_range() {
            None => Err(from_kind(ErrorKind::Overflow)),
            Some((min, _)) if min < 0 => Err(from_kind(ErrorKind::OutOfBounds)),
            Some(_) if dim_stride_overlap(&map.dim, &map.strides) => {
                Err(from_kind(ErrorKind::Unsupported))
            }
            Some(_) => Ok(map),
        }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.dim.ndim()
    }

    /// Number of indices in the domain.
    pub fn size(&self) -> usize {
        self.dim.size()
    }

    /// The axis lengths.
    pub fn lengths(&self) -> &[Ix] {
        self.dim.slice()
    }

    /// The axis lengths as a dimension value.
    pub fn raw_dim(&self) -> D {
        self.dim.clone()
    }

    /// The signed strides, in elements.
    pub fn strides(&self) -> &[Ixs] {
        let s = self.strides.slice();
        // reinterpret unsigned integer as signed
        unsafe { std::slice::from_raw_parts(s.as_ptr() as *const _, s.len()) }
    }

    /// The base offset: the offset of the all-zeros index.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Axis order from slowest to fastest varying.
    pub fn layout(&self) -> &[Ix] {
        self.layout.slice()
    }

    /// Offset of `index`, or `None` if it is out of bounds.
    ///
    /// **Panics** if the index has the wrong number of coordinates (only
    /// possible for dynamic rank).
    pub fn index<I>(&self, index: I) -> Option<usize>
    where
        I: NdIndex<D>,
    {
        index
            .index_checked(&self.dim, &self.strides)
            .map(|off| (self.offset as isize + off) as usize)
    }

    /// Whether every offset the map produces lies in `0..len`.
    pub fn fits(&self, len: usize) -> bool {
        if self.size() == 0 {
            return true;
        }
        match self.offset_range() {
            Some((min, max)) => min >= 0 && (max as usize) < len,
            None => false,
        }
    }

    /// The largest offset the map produces, or `None` if it is empty.
    pub fn max_offset(&self) -> Option<usize> {
        if self.size() == 0 {
            return None;
        }
        self.offset_range().map(|(_, max)| max as usize)
    }

    // Smallest and largest offset over the domain, assuming it is not empty.
    fn offset_range(&self) -> Option<(isize, isize)> {
        let base = isize::try_from(self.offset).ok()?;
        let mut min = base;
        let mut max = base;
        for (&d, &s) in self.dim.slice().iter().zip(self.strides()) {
            if d == 0 {
                continue;
            }
            let span = (d as isize - 1).checked_mul(s)?;
            if span < 0 {
                min = min.checked_add(span)?;
            } else {
                max = max.checked_add(span)?;
            }
        }
        Some((min, max))
    }

    /// Whether the map covers a dense block in its layout order.
    pub fn is_contiguous(&self) -> bool {
        let expected = self.dim.layout_strides(&self.layout);
        self.dim
            .slice()
            .iter()
            .zip(self.strides.slice().iter().zip(expected.slice()))
            .all(|(&d, (&s, &e))| d <= 1 || s == e)
    }

    /// Restrict the map by a slice argument.
    ///
    /// Scalar indices remove their axis; ranges keep it with a new length
    /// and stride; an ellipsis stands for all axes not otherwise named.
    ///
    /// **Panics** if an index or range endpoint is out of bounds, if a step
    /// is zero, or if the number of arguments does not match the rank.
    pub fn slice<I>(&self, info: &I) -> IndexMap<I::OutDim>
    where
        I: SliceArg<D> + ?Sized,
    {
        let elems = info.elems();
        let ndim = self.ndim();
        let n_ellipsis = elems.iter().filter(|e| e.is_ellipsis()).count();
        ndassert!(n_ellipsis <= 1, "a slice argument may contain at most one ellipsis");
        let n_given = elems.len() - n_ellipsis;
        if n_ellipsis == 0 {
            ndassert!(n_given == ndim,
                      "slice has {} arguments but the array has rank {}", n_given, ndim);
        } else {
            ndassert!(n_given <= ndim,
                      "slice has {} arguments but the array has rank {}", n_given, ndim);
        }

        let mut dim = Vec::with_capacity(ndim);
        let mut strides = Vec::with_capacity(ndim);
        let mut new_axis = vec![None; ndim];
        let mut offset = self.offset as isize;
        let mut axis = 0;
        for &elem in elems {
            match elem {
                SliceInfoElem::Index(i) => {
                    let len = self.dim[axis];
                    ndassert!(0 <= i && (i as usize) < len,
                              "index {} is out of bounds for axis {} of length {}",
                              i, axis, len);
                    offset += stride_offset(i as Ix, self.strides[axis]);
                    axis += 1;
                }
                SliceInfoElem::Slice { start, end, step } => {
                    let mut d = self.dim[axis];
                    let mut s = self.strides[axis];
                    offset += do_slice(&mut d, &mut s, Slice { start, end, step });
                    new_axis[axis] = Some(dim.len());
                    dim.push(d);
                    strides.push(s);
                    axis += 1;
                }
                SliceInfoElem::Ellipsis => {
                    for _ in 0..ndim - n_given {
                        new_axis[axis] = Some(dim.len());
                        dim.push(self.dim[axis]);
                        strides.push(self.strides[axis]);
                        axis += 1;
                    }
                }
            }
        }
        debug_assert!(offset >= 0);

        let layout: Vec<Ix> = self
            .layout
            .slice()
            .iter()
            .filter_map(|&ax| new_axis[ax])
            .collect();
        let out_rank = dim.len();
        let build = |ix: &[Ix]| {
            I::OutDim::from_ix(ix).unwrap_or_else(|| {
                panic!("ndmem: slice produces rank {} which does not fit the output type", out_rank)
            })
        };
        IndexMap {
            dim: build(&dim),
            strides: build(&strides),
            offset: offset as usize,
            layout: build(&layout),
        }
    }

    /// Convert to another dimension type of equal rank.
    ///
    /// Errors with `RankMismatch` if the rank does not fit `E`.
    pub fn into_dimensionality<E>(self) -> Result<IndexMap<E>, ArrayError>
    where
        E: Dimension,
    {
        let convert = |d: &D| E::from_dimension(d).ok_or_else(|| from_kind(ErrorKind::RankMismatch));
        Ok(IndexMap {
            dim: convert(&self.dim)?,
            strides: convert(&self.strides)?,
            offset: self.offset,
            layout: convert(&self.layout)?,
        })
    }

    /// Convert to the dynamic-rank form.
    pub fn into_dyn(self) -> IndexMap<IxDyn> {
        IndexMap {
            dim: self.dim.into_dyn(),
            strides: self.strides.into_dyn(),
            offset: self.offset,
            layout: self.layout.into_dyn(),
        }
    }

    /// Offset of an index that is known to be in bounds.
    #[inline]
    pub(crate) fn offset_of(&self, index: &D) -> usize {
        let off: isize = index
            .slice()
            .iter()
            .zip(self.strides.slice())
            .map(|(&i, &s)| stride_offset(i, s))
            .sum();
        (self.offset as isize + off) as usize
    }

    /// A contiguous map of the same shape and layout, with base offset zero.
    pub(crate) fn to_dense(&self) -> Self {
        IndexMap {
            dim: self.dim.clone(),
            strides: self.dim.layout_strides(&self.layout),
            offset: 0,
            layout: self.layout.clone(),
        }
    }

    pub(crate) fn dim(&self) -> &D {
        &self.dim
    }
}

fn is_permutation(axes: &[Ix]) -> bool {
    let mut seen = vec![false; axes.len()];
    for &ax in axes {
        match seen.get_mut(ax) {
            Some(s) if !*s => *s = true,
            _ => return false,
        }
    }
    true
}

impl<D> std::fmt::Debug for IndexMap<D>
where
    D: Dimension,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexMap")
            .field("shape", &self.lengths())
            .field("strides", &self.strides())
            .field("offset", &self.offset)
            .field("layout", &self.layout())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::IndexMap;
    use crate::error::ErrorKind;
    use crate::{Dim, Ellipsis, Ix2, IxDyn};

    #[test]
    fn contiguous_layouts() {
        let map = IndexMap::new(Dim([2, 3, 4]));
        assert_eq!(map.strides(), &[12, 4, 1]);
        assert!(map.is_contiguous());
        let map = IndexMap::with_layout(Dim([2, 3, 4]), Dim([2, 0, 1])).unwrap();
        assert_eq!(map.strides(), &[3, 1, 6]);
        assert_eq!(map.max_offset(), Some(23));
    }

    #[test]
    fn bad_layout() {
        let err = IndexMap::with_layout(Dim([2, 3]), Dim([1, 1])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLayout);
        let err = IndexMap::with_layout(Dim([2, 3]), Dim([0, 2])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLayout);
    }

    #[test]
    fn explicit_strides() {
        let map = IndexMap::with_strides(Dim([3, 2]), &[-2, 1], 4).unwrap();
        assert_eq!(map.index([0, 0]), Some(4));
        assert_eq!(map.index([2, 1]), Some(1));
        assert_eq!(map.layout(), &[0, 1]);
        assert!(map.fits(6));
        assert!(!map.fits(5));

        let err = IndexMap::with_strides(Dim([3, 2]), &[-2, 1], 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        let err = IndexMap::with_strides(Dim([3, 2]), &[1, 1], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        let err = IndexMap::<Ix2>::with_strides(Dim([3, 2]), &[1], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RankMismatch);
    }

    #[test]
    fn repeated_axis() {
        let map = IndexMap::with_strides(Dim([4, 3]), &[0, 1], 0).unwrap();
        assert_eq!(map.index([3, 2]), Some(2));
        assert!(map.fits(3));
    }

    #[test]
    fn out_of_bounds_index() {
        let map = IndexMap::new(Dim([2, 3]));
        assert_eq!(map.index([2, 0]), None);
        assert_eq!(map.index([0, 3]), None);
    }

    #[test]
    fn slice_keeps_layout() {
        let map = IndexMap::with_layout(Dim([4, 5, 6]), Dim([2, 1, 0])).unwrap();
        let sub = map.slice(&s![1..3, 2, ..;2]);
        assert_eq!(sub.lengths(), &[2, 3]);
        assert_eq!(sub.strides(), &[1, 40]);
        assert_eq!(sub.layout(), &[1, 0]);
        assert_eq!(sub.offset(), 1 + 2 * 4);
    }

    #[test]
    fn slice_with_ellipsis() {
        let map = IndexMap::new(Dim([2, 3, 4]));
        let sub = map.slice(&s![Ellipsis, 1]);
        assert_eq!(sub.lengths(), &[2, 3]);
        assert_eq!(sub.offset(), 1);
        let sub = map.slice(&s![1, Ellipsis]);
        assert_eq!(sub.lengths(), &[3, 4]);
        assert_eq!(sub.offset(), 12);
        let sub = map.slice(&s![0, Ellipsis, 0, 0]);
        assert_eq!(sub.ndim(), 0);
    }

    #[test]
    #[should_panic]
    fn slice_index_out_of_bounds() {
        let map = IndexMap::new(Dim([2, 3]));
        map.slice(&s![2, ..]);
    }

    #[test]
    #[should_panic]
    fn slice_wrong_count_dyn() {
        let map = IndexMap::new(IxDyn(&[2, 3]));
        map.slice(&s![1, .., 0]);
    }

    #[test]
    fn dyn_round_trip() {
        let map = IndexMap::new(Dim([2, 3])).into_dyn();
        assert_eq!(map.ndim(), 2);
        let back = map.clone().into_dimensionality::<Ix2>().unwrap();
        assert_eq!(back.strides(), &[3, 1]);
        assert!(map.into_dimensionality::<crate::Ix3>().is_err());
    }
}
