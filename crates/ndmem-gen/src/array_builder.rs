// Copyright 2024 ndmem developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ndmem::Array;
use ndmem::Dimension;
use ndmem::IndexMap;
use ndmem::IntoDimension;

use num_traits::Num;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayBuilder<D: Dimension>
{
    dim: D,
    layout: Option<D>,
    generator: ElementGenerator,
}

/// How to generate elements
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementGenerator
{
    /// 0, 1, 2, .. in memory order
    Sequential,
    Zero,
}

impl<D: Dimension> Default for ArrayBuilder<D>
{
    fn default() -> Self
    {
        Self::new(D::zeros(D::NDIM.unwrap_or(1)))
    }
}

impl<D> ArrayBuilder<D>
where D: Dimension
{
    pub fn new(dim: impl IntoDimension<Dim = D>) -> Self
    {
        ArrayBuilder {
            dim: dim.into_dimension(),
            layout: None,
            generator: ElementGenerator::Sequential,
        }
    }

    /// Axis order of the buffer, slowest axis first. Row-major by default.
    pub fn layout(mut self, layout: impl IntoDimension<Dim = D>) -> Self
    {
        self.layout = Some(layout.into_dimension());
        self
    }

    /// Column-major buffer: the reversed axis order.
    pub fn fortran(mut self) -> Self
    {
        let mut layout = D::zeros(self.dim.ndim());
        let n = self.dim.ndim();
        for (i, ax) in layout.slice_mut().iter_mut().enumerate() {
            *ax = n - 1 - i;
        }
        self.layout = Some(layout);
        self
    }

    pub fn generator(mut self, generator: ElementGenerator) -> Self
    {
        self.generator = generator;
        self
    }

    pub fn build<T>(self) -> Array<T, D>
    where T: Num + Clone
    {
        let map = match self.layout {
            Some(layout) => IndexMap::with_layout(self.dim, layout).unwrap(),
            None => IndexMap::new(self.dim),
        };
        let mut current = T::zero();
        let use_zeros = self.generator == ElementGenerator::Zero;
        let v = (0..map.size())
            .map(|_| {
                let ret = current.clone();
                if !use_zeros {
                    current = ret.clone() + T::one();
                }
                ret
            })
            .collect();
        Array::from_layout_vec(map, v).unwrap()
    }
}

#[test]
fn test_layout()
{
    let (m, n) = (12, 13);
    let c = ArrayBuilder::new((m, n)).build::<i32>();
    let f = ArrayBuilder::new((m, n)).fortran().build::<i32>();

    assert_eq!(c.shape(), &[m, n]);
    assert_eq!(f.shape(), &[m, n]);
    assert_eq!(c.strides(), &[n as isize, 1]);
    assert_eq!(f.strides(), &[1, m as isize]);
    assert_eq!(f[[1, 0]], 1);
    assert_eq!(f[[0, 1]], m as i32);
}

#[test]
fn test_permuted()
{
    let a = ArrayBuilder::new((2, 3, 4))
        .layout([1, 2, 0])
        .generator(ElementGenerator::Sequential)
        .build::<u32>();
    assert_eq!(a.strides(), &[1, 8, 2]);
    assert_eq!(a[[1, 0, 0]], 1);
    assert_eq!(a[[0, 0, 1]], 2);
    assert_eq!(a[[0, 1, 0]], 8);
}
