use defmac::defmac;
use itertools::iproduct;

use ndmem::{arr1, s, Array2, ArrayBase, Array3, ArrayD, Ellipsis, Ix2, IxDyn, Slice, SliceInfo, SliceInfoElem};
use ndmem_gen::array_builder::ArrayBuilder;

#[test]
fn slices_do_not_copy() {
    let a = Array3::from_shape_fn((3, 4, 5), |(i, j, k)| 100 * i + 10 * j + k);
    let v = a.slice(s![1, 1.., 2..4]);
    assert_eq!(v.shape(), &[3, 2]);
    assert_eq!(v.as_ptr(), &a[[1, 1, 2]] as *const _);
    for (j, k) in iproduct!(0..3, 0..2) {
        assert_eq!(v[[j, k]], 100 + 10 * (j + 1) + k + 2);
    }
}

#[test]
fn write_through_view() {
    let mut a = Array2::<i32>::zeros((4, 4));
    {
        let mut diag_block = a.slice_mut(s![1..3, 1..3]);
        diag_block[[0, 0]] = 5;
        diag_block[[1, 1]] = 6;
    }
    assert_eq!(a[[1, 1]], 5);
    assert_eq!(a[[2, 2]], 6);
    assert_eq!(a.iter().sum::<i32>(), 11);

    *a.at_mut((3, 0)) = 1;
    let mut row = a.at_mut(s![0, ..]);
    row[3] = 2;
    assert_eq!(a[[3, 0]], 1);
    assert_eq!(a[[0, 3]], 2);
}

#[test]
fn negative_steps_and_endpoints() {
    let a = Array2::from_shape_fn((3, 6), |(i, j)| 10 * i + j);
    let v = a.slice(s![2, ..;-1]);
    assert_eq!(v.iter().cloned().collect::<Vec<_>>(), vec![25, 24, 23, 22, 21, 20]);

    let v = a.slice(s![.., -4..-1;2]);
    assert_eq!(v.shape(), &[3, 2]);
    assert_eq!(v[[2, 1]], 24);

    let v = a.slice(s![..;-2, 1..=2]);
    assert_eq!(v.shape(), &[2, 2]);
    assert_eq!(v[[0, 0]], 21);
    assert_eq!(v[[1, 1]], 2);
    assert_eq!(v.strides(), &[-12, 1]);
}

#[test]
fn slices_of_slices() {
    let a = ArrayBuilder::new((6, 6)).build::<u32>();
    let outer = a.slice(s![1..;2, ..;-1]);
    let inner = outer.slice(s![1.., 1..;2]);
    assert_eq!(inner.shape(), &[2, 3]);
    for (i, j) in iproduct!(0..2, 0..3) {
        let row = 1 + 2 * (1 + i);
        let col = 5 - (1 + 2 * j);
        assert_eq!(inner[[i, j]], a[[row, col]]);
    }
}

#[test]
fn empty_slices() {
    let a = Array2::<f64>::zeros((3, 4));
    defmac!(empty_cols info => {
        let v = a.slice(info);
        assert_eq!(v.len(), 0);
        assert_eq!(v.iter().count(), 0);
    });
    empty_cols!(s![.., 2..2]);
    empty_cols!(s![.., 3..1]);
    empty_cols!(s![.., 4..]);
    empty_cols!(s![3.., ..;-1]);

    let v = arr1(&[0, 1, 2, 3, 4]);
    let rev = v.slice(s![..;-1]);
    defmac!(empty_rev info => {
        let e = rev.slice(info);
        assert_eq!(e.len(), 0);
        assert!(e.index_map().offset() < 5);
        let (map, handle) = e.into_parts();
        assert!(ArrayBase::from_parts(map, handle).is_ok());
    });
    empty_rev!(s![5..]);
    empty_rev!(s![..0]);
    empty_rev!(s![2..2;-1]);
    empty_rev!(s![-1..-1]);
}

#[test]
fn ellipsis_gives_dynamic_rank() {
    let a = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| 100 * i + 10 * j + k);
    let v = a.slice(s![Ellipsis, 1]);
    assert_eq!(v.shape(), &[2, 3]);
    assert_eq!(v[&[1, 2][..]], 121);
    let v = v.into_dimensionality::<Ix2>().unwrap();
    assert_eq!(v[[0, 2]], 21);

    let w = a.slice(s![1, Ellipsis]);
    assert_eq!(w.shape(), &[3, 4]);

    let d = ArrayD::<u8>::zeros(IxDyn(&[2, 2, 2, 2]));
    assert_eq!(d.slice(s![0, Ellipsis, 1]).shape(), &[2, 2]);
}

#[test]
fn dynamic_rank_slicing() {
    let a = ArrayBuilder::new(IxDyn(&[3, 4])).build::<i64>();
    let v = a.slice(s![1.., 2]);
    assert_eq!(v.shape(), &[2]);
    assert_eq!(v[1], 10);

    let elems = [SliceInfoElem::from(1), SliceInfoElem::from(Slice::new(0, None, 3))];
    let v = a.slice(&elems[..]);
    assert_eq!(v.shape(), &[2]);
    assert_eq!(v[&[1][..]], 7);
}

#[test]
fn checked_slice_info() {
    let elems = [SliceInfoElem::from(..), SliceInfoElem::from(0)];
    let info = SliceInfo::<_, Ix2, ndmem::Ix1>::new(elems).unwrap();
    let a = Array2::from_shape_fn((2, 3), |(i, j)| i + j);
    assert_eq!(a.slice(&info).shape(), &[2]);
}

#[test]
#[should_panic]
fn index_out_of_bounds_panics() {
    let a = Array2::<u8>::zeros((2, 3));
    a.slice(s![.., 3]);
}

#[test]
#[should_panic]
fn zero_step_panics() {
    let a = Array2::<u8>::zeros((2, 3));
    a.slice(s![..;0, ..]);
}

#[test]
#[should_panic]
fn dynamic_rank_mismatch_panics() {
    let a = ArrayD::<u8>::zeros(IxDyn(&[2, 3]));
    a.slice(s![.., .., ..]);
}

#[test]
#[should_panic]
fn negative_index_panics() {
    let a = Array2::<u8>::zeros((2, 3));
    a.slice(s![-1, ..]);
}
