use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use ndmem::{
    arr1, s, Array2, Capsule, ErrorKind, ForeignBuffer, IndexMap, Ix1, Ix2, SharedArray,
};

// A foreign owner: a boxed vector plus a counter of release calls.
struct Owner {
    data: Vec<f64>,
    released: AtomicUsize,
}

unsafe extern "C" fn release_owner(token: *mut c_void) {
    let owner = &*(token as *const Owner);
    owner.released.fetch_add(1, Ordering::SeqCst);
}

fn owner(len: usize) -> Box<Owner> {
    Box::new(Owner {
        data: (0..len).map(|x| x as f64).collect(),
        released: AtomicUsize::new(0),
    })
}

fn describe(owner: &mut Owner) -> ForeignBuffer<f64> {
    let token = owner as *mut Owner as *mut c_void;
    ForeignBuffer::new(owner.data.as_mut_ptr(), owner.data.len(), token, release_owner).unwrap()
}

#[test]
fn release_after_last_reference() {
    let mut own = owner(12);
    let a: SharedArray<f64, Ix2> = unsafe { SharedArray::from_foreign((3, 4), describe(&mut own)).unwrap() };
    assert!(a.handle().is_foreign());
    assert_eq!(a[[2, 3]], 11.);
    assert_eq!(a.as_ptr(), own.data.as_ptr());

    let col = a.at(s![.., 1]);
    let b = a.clone();
    drop(a);
    drop(b);
    assert_eq!(own.released.load(Ordering::SeqCst), 0);
    assert_eq!(col.iter().cloned().collect::<Vec<_>>(), vec![1., 5., 9.]);
    drop(col);
    assert_eq!(own.released.load(Ordering::SeqCst), 1);
}

#[test]
fn release_on_shape_error() {
    let mut own = owner(6);
    let err = unsafe { SharedArray::<f64, Ix2>::from_foreign((3, 4), describe(&mut own)) }.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    assert_eq!(own.released.load(Ordering::SeqCst), 1);
}

#[test]
fn foreign_with_index_map() {
    let mut own = owner(12);
    let map = IndexMap::with_layout((3, 4), (1, 0)).unwrap();
    let a = unsafe { SharedArray::from_foreign_parts(map, describe(&mut own)).unwrap() };
    assert_eq!(a[[1, 0]], 1.);
    assert_eq!(a[[0, 1]], 3.);
    drop(a);
    assert_eq!(own.released.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_drops_release_foreign_once() {
    for &k in &[2usize, 4, 8] {
        for _ in 0..10 {
            let mut own = owner(2 * k);
            let a: SharedArray<f64, Ix1> =
                unsafe { SharedArray::from_foreign(2 * k, describe(&mut own)).unwrap() };
            let barrier = Arc::new(Barrier::new(k));
            let threads: Vec<_> = (0..k)
                .map(|i| {
                    let part = a.slice(s![i * 2..i * 2 + 2]);
                    let whole = a.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        assert_eq!(part[1], (i * 2 + 1) as f64);
                        barrier.wait();
                        drop(whole);
                        drop(part);
                    })
                })
                .collect();
            drop(a);
            for t in threads {
                t.join().unwrap();
            }
            assert_eq!(own.released.load(Ordering::SeqCst), 1);
        }
    }
}

#[test]
fn null_pointer_rejected() {
    let err = ForeignBuffer::<u8>::new(std::ptr::null_mut(), 4, std::ptr::null_mut(), release_owner)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullPointer);
}

#[test]
fn capsules_keep_buffer_alive() {
    let mut own = owner(4);
    let a = unsafe { SharedArray::from_foreign(4, describe(&mut own)).unwrap() };
    let view = a.view();
    let capsule = view.to_capsule().unwrap();
    let raw = a.slice(s![1..]).to_capsule().unwrap().into_raw();
    assert_eq!(a.ref_count(), 3);
    drop(a);
    assert_eq!(capsule.len(), 4);
    assert_eq!(capsule.data_ptr(), own.data.as_ptr() as *const c_void);
    drop(capsule);
    assert_eq!(own.released.load(Ordering::SeqCst), 0);
    unsafe { (raw.destructor)(raw.handle) };
    assert_eq!(own.released.load(Ordering::SeqCst), 1);
}

#[test]
fn capsule_from_owned_array() {
    let a = Array2::<u32>::zeros((2, 2));
    let ptr = a.as_ptr();
    let capsule = a.into_capsule();
    assert_eq!(capsule.data_ptr(), ptr as *const c_void);
    let raw = capsule.into_raw();
    let capsule = unsafe { Capsule::from_raw(raw) };
    drop(capsule);
}

#[test]
fn parentless_view_refused() {
    let a = arr1(&[1u8, 2, 3]);
    let err = a.view().to_capsule().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParentlessBorrow);
    let err = a.to_capsule().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParentlessBorrow);
    assert!(err.to_string().contains("into_capsule"));
    assert_eq!(a.into_capsule().len(), 3);
}
