//! Integration tests for exclusive and shared ownership
//!
//! Exclusive tensors copy on clone; shared tensors alias. Arithmetic results
//! never alias an operand, whatever the operands' discipline.

mod common;

use common::seeded_rng;
use densa::tensor::{Ownership, Tensor};

#[test]
fn test_exclusive_clone_is_independent() {
    let mut a = Tensor::<f32>::from_slice(&[1.0, 2.0, 3.0], &[3]);
    let b = a.clone();

    a.fill(9.0);
    assert_eq!(b.to_vec(), vec![1.0, 2.0, 3.0]);
    assert_eq!(a.ref_count(), 1);
    assert_eq!(b.ref_count(), 1);
    assert!(!a.shares_storage_with(&b));
}

#[test]
fn test_shared_clone_sees_writes() {
    let mut a = Tensor::<f32>::new_shared(&[2, 2]).unwrap();
    let b = a.clone();
    assert_eq!(a.ref_count(), 2);

    a.set_data(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(b.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(b.sum(), 10.0);
}

#[test]
fn test_shared_randomize_visible_through_alias() {
    let mut a = Tensor::<f32>::new_shared(&[8]).unwrap();
    let b = a.clone();
    a.randomize(&mut seeded_rng(3));
    assert_eq!(a.to_vec(), b.to_vec());
}

#[test]
fn test_drop_alias_decrements_count() {
    let a = Tensor::<f32>::new_shared(&[4]).unwrap();
    {
        let _b = a.clone();
        let _c = a.clone();
        assert_eq!(a.ref_count(), 3);
    }
    assert_eq!(a.ref_count(), 1);
}

#[test]
fn test_result_never_aliases_operands() {
    let a = Tensor::<f32>::full(&[4], 2.0).unwrap().into_shared();
    let b = a.clone();

    let mut c = a.multiply(&b).unwrap();
    assert!(!c.shares_storage_with(&a));
    assert_eq!(c.ref_count(), 1);
    assert_eq!(c.ownership(), Ownership::Shared);

    c.fill(0.0);
    assert_eq!(a.to_vec(), vec![2.0; 4]);
}

#[test]
fn test_into_exclusive_detaches() {
    let a = Tensor::<f32>::full(&[2], 1.0).unwrap().into_shared();
    let b = a.clone();

    let mut detached = b.into_exclusive();
    detached.fill(5.0);

    assert_eq!(a.to_vec(), vec![1.0, 1.0]);
    assert_eq!(a.ref_count(), 1);
    assert_eq!(detached.ownership(), Ownership::Exclusive);
}

#[test]
fn test_shared_across_threads() {
    let mut a = Tensor::<f32>::new_shared(&[16]).unwrap();
    a.fill(1.0);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let alias = a.clone();
            std::thread::spawn(move || alias.sum())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), 16.0);
    }
    assert_eq!(a.ref_count(), 1);
}
