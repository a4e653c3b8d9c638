use defmac::defmac;
use itertools::iproduct;
use quickcheck::{quickcheck, TestResult};

use ndmem::{Dim, ErrorKind, IndexMap, IxDyn};

#[test]
fn row_major_offsets() {
    let map = IndexMap::new((3, 4, 5));
    for (i, j, k) in iproduct!(0..3, 0..4, 0..5) {
        assert_eq!(map.index((i, j, k)), Some(i * 20 + j * 5 + k));
    }
    assert_eq!(map.index((3, 0, 0)), None);
    assert_eq!(map.max_offset(), Some(59));
    assert!(map.is_contiguous());
}

#[test]
fn every_layout_is_dense() {
    defmac!(check_layout layout => {
        let map = IndexMap::with_layout(Dim([2, 3, 4]), Dim(layout)).unwrap();
        let mut seen = vec![false; 24];
        for (i, j, k) in iproduct!(0..2, 0..3, 0..4) {
            let off = map.index([i, j, k]).unwrap();
            assert!(!seen[off], "offset {} produced twice for layout {:?}", off, layout);
            seen[off] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert!(map.is_contiguous());
    });
    check_layout!([0, 1, 2]);
    check_layout!([0, 2, 1]);
    check_layout!([1, 0, 2]);
    check_layout!([1, 2, 0]);
    check_layout!([2, 0, 1]);
    check_layout!([2, 1, 0]);
}

#[test]
fn layout_errors() {
    let err = IndexMap::with_layout(Dim([2, 3]), Dim([0, 0])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidLayout);
    let err = IndexMap::with_layout(IxDyn(&[2, 3]), IxDyn(&[0])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RankMismatch);
    let err = IndexMap::try_new((usize::MAX, 3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn explicit_strides() {
    let map = IndexMap::with_strides(Dim([3, 2]), &[-2, 1], 4).unwrap();
    assert_eq!(map.index((0, 0)), Some(4));
    assert_eq!(map.index((2, 1)), Some(1));
    assert_eq!(map.layout(), &[0, 1]);
    assert_eq!(map.max_offset(), Some(5));
    assert!(map.fits(6));
    assert!(!map.fits(5));

    let err = IndexMap::with_strides(Dim([3, 2]), &[1, 1], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    let err = IndexMap::with_strides(Dim([3, 2]), &[-2, 1], 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    let err = IndexMap::with_strides(Dim([3, 2]), &[1], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RankMismatch);
}

#[test]
fn huge_strides_overflow() {
    let err = IndexMap::with_strides(Dim([4, 3]), &[isize::MAX, 1], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    let err = IndexMap::with_strides(Dim([2, 2]), &[isize::MIN + 1, 1], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
}

#[test]
fn empty_maps() {
    let map = IndexMap::new((0, 7));
    assert_eq!(map.size(), 0);
    assert_eq!(map.max_offset(), None);
    assert!(map.fits(0));
    assert_eq!(map.index((0, 0)), None);
}

#[test]
#[should_panic]
fn dyn_index_wrong_rank() {
    let map = IndexMap::new(IxDyn(&[2, 2]));
    map.index(IxDyn(&[1]));
}

quickcheck! {
    fn offsets_are_injective_and_bounded(a: u8, b: u8, c: u8, perm: u8) -> TestResult {
        let shape = [a as usize % 6, b as usize % 6, c as usize % 6];
        let layouts: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        let layout = layouts[perm as usize % 6];
        let map = IndexMap::with_layout(Dim(shape), Dim(layout)).unwrap();
        let size = map.size();
        let mut seen = vec![false; size];
        for (i, j, k) in iproduct!(0..shape[0], 0..shape[1], 0..shape[2]) {
            let off = match map.index([i, j, k]) {
                Some(off) => off,
                None => return TestResult::failed(),
            };
            if off >= size || seen[off] {
                return TestResult::failed();
            }
            seen[off] = true;
        }
        TestResult::from_bool(map.fits(size))
    }

    fn sliced_maps_stay_inside(len: u8, start: i8, end: i8, step: i8) -> TestResult {
        let len = len as usize % 20;
        let step = step as isize;
        if step == 0 {
            return TestResult::discard();
        }
        let start = start as isize % 25;
        let end = end as isize % 25;
        let fits_axis = |x: isize| x.unsigned_abs() <= len;
        if !fits_axis(start) || !fits_axis(end) {
            return TestResult::discard();
        }
        let map = IndexMap::new(Dim([len, 3]));
        let sliced = map.slice(&ndmem::s![start..end;step, ..]);
        let ok = (0..sliced.lengths()[0])
            .all(|i| sliced.index([i, 2]).map_or(false, |off| off < map.size()));
        TestResult::from_bool(ok && sliced.fits(map.size()))
    }
}
