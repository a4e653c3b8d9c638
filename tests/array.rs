use defmac::defmac;
use itertools::iproduct;

use ndmem::{
    arr0, arr1, arr2, aview1, aview2, from_fn, Array, Array1, Array2, Array3, ArrayD, Dim,
    ErrorKind, IxDyn,
};
use ndmem_gen::array_builder::{ArrayBuilder, ElementGenerator};

#[test]
fn constructors() {
    let a = Array2::<f32>::zeros((2, 3));
    assert_eq!(a.shape(), &[2, 3]);
    assert_eq!(a.dim(), (2, 3));
    assert!(a.iter().all(|&x| x == 0.));

    let b = Array3::from_elem((1, 2, 3), 7u8);
    assert_eq!(b.len(), 6);
    assert!(b.iter().all(|&x| x == 7));

    let c = ArrayD::<i32>::default(IxDyn(&[2, 0, 4]));
    assert!(c.is_empty());
    assert_eq!(c.ndim(), 3);

    let d = Array::from_shape_vec((2, 2), vec![1, 2, 3, 4]).unwrap();
    assert_eq!(d, arr2(&[[1, 2], [3, 4]]));
    assert_eq!(arr0(5).into_scalar(), 5);
}

#[test]
fn constructor_errors() {
    let err = Array2::from_shape_vec((2, 3), vec![0; 5]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleShape);

    let err = Array2::<u8>::try_zeros((usize::MAX, 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);

    let err = Array2::<u8>::with_layout((2, 2), (1, 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidLayout);

    let err = Array2::from_nested(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IrregularRows);
}

#[test]
fn nested_rows() {
    let a = Array2::from_nested(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    assert_eq!(a, arr2(&[[1, 2, 3], [4, 5, 6]]));
    let empty = Array2::<u8>::from_nested(vec![]).unwrap();
    assert_eq!(empty.shape(), &[0, 0]);
}

#[test]
fn layouts_agree_on_values() {
    defmac!(check_layout layout => {
        let a = Array3::<u32>::with_layout((2, 3, 4), Dim(layout)).unwrap();
        assert_eq!(a.index_map().layout(), &layout);
        assert!(a.is_standard_layout());
        let mut b = a.clone();
        for (i, j, k) in iproduct!(0..2, 0..3, 0..4) {
            b[[i, j, k]] = (i * 100 + j * 10 + k) as u32;
        }
        let row_major = Array3::from_shape_fn((2, 3, 4), |(i, j, k)| (i * 100 + j * 10 + k) as u32);
        assert_eq!(b, row_major);
    });
    check_layout!([0, 1, 2]);
    check_layout!([2, 1, 0]);
    check_layout!([1, 0, 2]);
    check_layout!([2, 0, 1]);
}

#[test]
fn to_owned_keeps_layout_and_compacts() {
    let a = ArrayBuilder::new((4, 6)).fortran().build::<i32>();
    let v = a.slice(ndmem::s![1..3, ..;2]);
    let o = v.to_owned();
    assert_eq!(o, v);
    assert_eq!(o.index_map().layout(), &[1, 0]);
    assert_eq!(o.strides(), &[1, 2]);
    assert_eq!(o.into_raw_vec().len(), 6);
}

#[test]
fn uninit_then_init() {
    let mut a = Array2::<String>::uninit((2, 2)).unwrap();
    for (i, x) in a.iter_mut().enumerate() {
        x.write(i.to_string());
    }
    let a = unsafe { a.assume_init() };
    assert_eq!(a[[1, 0]], "2");
}

#[test]
fn element_access() {
    let mut a = ArrayBuilder::new((3, 3)).generator(ElementGenerator::Sequential).build::<i64>();
    assert_eq!(a.get((2, 2)), Some(&8));
    assert_eq!(a.get((3, 0)), None);
    assert_eq!(*a.at([1, 1]), 4);
    *a.get_mut((0, 0)).unwrap() = -1;
    assert_eq!(a[(0, 0)], -1);
    assert_eq!(a.at(..), a.view());

    let d = a.clone().into_dyn();
    assert_eq!(d[IxDyn(&[2, 1])], 7);
    assert_eq!(*d.at(vec![2, 1]), 7);
    assert!(d.into_dimensionality::<ndmem::Ix3>().is_err());
}

#[test]
#[should_panic]
fn index_out_of_bounds() {
    let a = Array2::<u8>::zeros((2, 2));
    let _x = a[[2, 0]];
}

#[test]
fn equality_across_storages() {
    let data = [1, 2, 3, 4];
    let owned = arr1(&data);
    let shared = owned.clone().into_shared();
    assert_eq!(owned, aview1(&data));
    assert_eq!(shared, owned);
    assert_ne!(arr1(&[1, 2, 3]), owned);
    assert_eq!(aview2(&[[1, 2], [3, 4]]), arr2(&[[1, 2], [3, 4]]));
}

#[test]
fn array_like_assignment() {
    let mut a = Array1::<usize>::zeros(2);
    a.assign_from(&from_fn(5, |i| i * i));
    assert_eq!(a, arr1(&[0, 1, 4, 9, 16]));
    let b = Array2::from_array_like(&arr2(&[[1, 2], [3, 4]]).into_shared());
    assert_eq!(b[[1, 1]], 4);
}

#[test]
fn formatting() {
    let a = arr2(&[[1, 2], [3, 4]]);
    assert_eq!(format!("{}", a), "[[1, 2],\n [3, 4]]");
    let d = format!("{:?}", a.view().into_dyn());
    assert!(d.ends_with("shape=[2, 2], strides=[2, 1], offset=0, layout=[0, 1], dynamic ndim=2"));
    assert_eq!(format!("{}", arr0(3)), "3");
}
