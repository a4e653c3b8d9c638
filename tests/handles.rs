use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use ndmem::{arr1, arr2, s, Array1, Array2, ArrayView2, SharedArray, SharedArray2};

#[test]
fn owned_clone_is_independent() {
    let a = arr2(&[[1, 2], [3, 4]]);
    let mut b = a.clone();
    b[[0, 0]] = 9;
    assert_eq!(a[[0, 0]], 1);
    assert_ne!(a.as_ptr(), b.as_ptr());
}

#[test]
fn shared_clones_count() {
    let a: SharedArray2<f32> = Array2::zeros((3, 3)).into_shared();
    let clones: Vec<_> = (0..5).map(|_| a.clone()).collect();
    assert_eq!(a.ref_count(), 6);
    assert!(clones.iter().all(|c| c.as_ptr() == a.as_ptr()));
    drop(clones);
    assert_eq!(a.ref_count(), 1);
    assert!(a.is_unique());
}

#[test]
fn shared_slice_outlives_source() {
    let a = Array2::from_shape_fn((3, 4), |(i, j)| (i * 4 + j) as u16).into_shared();
    let col = a.at(s![.., 3]);
    let handle = col.handle().clone();
    drop(a);
    assert_eq!(handle.ref_count(), 2);
    assert_eq!(col.iter().cloned().collect::<Vec<_>>(), vec![3, 7, 11]);
}

#[test]
fn view_of_shared_remembers_parent() {
    let a = arr2(&[[1., 2.], [3., 4.]]).into_shared();
    let v: ArrayView2<'_, f64> = a.view();
    assert!(v.handle().parent().is_some());
    assert_eq!(a.ref_count(), 1);

    let owned = arr2(&[[1., 2.], [3., 4.]]);
    assert!(owned.view().handle().parent().is_none());
}

#[test]
fn shared_write_needs_uniqueness() {
    let mut a = arr1(&[0u8; 4]).into_shared();
    let b = a.slice(s![1..3]);
    assert!(a.try_view_mut().is_none());
    drop(b);
    for x in a.try_view_mut().unwrap().iter_mut() {
        *x = 1;
    }
    assert_eq!(a, arr1(&[1, 1, 1, 1]));
}

#[test]
fn into_at_gives_values() {
    let a = arr2(&[[String::from("a"), String::from("b")], [String::from("c"), String::from("d")]]);
    let c = a.clone().into_at((1, 0));
    assert_eq!(c, "c");
    let row: Array1<String> = a.into_at(s![0, ..]).to_owned();
    assert_eq!(row[1], "b");
}

#[test]
fn concurrent_drops_release_once() {
    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct Counted(u32);
    impl Drop for Counted {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    let a: SharedArray<Counted, _> = Array1::from_iter((0..16).map(Counted)).into_shared();
    let barrier = Arc::new(std::sync::Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let part = a.slice(s![i * 2..i * 2 + 2]);
            let barrier = barrier.clone();
            thread::spawn(move || {
                assert_eq!(part[0].0 as usize, i * 2);
                barrier.wait();
                drop(part);
            })
        })
        .collect();
    drop(a);
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(DROPS.load(Ordering::SeqCst), 16);
}
