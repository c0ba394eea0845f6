//! Integration tests for annotation interning
//!
//! Fully-qualified names are interned once per compilation run; every
//! later comparison is an integer compare.

use insignia_foundation::{AnnotationFqn, InSet, Interner};

#[test]
fn interning_is_idempotent() {
    let mut interner = Interner::new();
    let a = interner.intern("com.example.Injectable");
    let b = interner.intern("com.example.Injectable");

    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn distinct_names_get_distinct_ids() {
    let mut interner = Interner::new();
    let a = interner.intern("com.example.Module");
    let b = interner.intern("com.example.Component");

    assert_ne!(a, b);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_round_trips() {
    let mut interner = Interner::new();
    let fqn = interner.intern("javax.inject.Singleton");

    assert_eq!(interner.resolve(fqn), Some("javax.inject.Singleton"));
}

#[test]
fn ids_are_dense_in_intern_order() {
    let mut interner = Interner::new();
    let first = interner.intern("a.A");
    let second = interner.intern("a.B");
    let third = interner.intern("a.C");

    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
    assert_eq!(third.index(), 2);
}

#[test]
fn resolve_rejects_foreign_ids() {
    let mut donor = Interner::new();
    donor.intern("a.A");
    let foreign = donor.intern("a.B");

    let mut small = Interner::new();
    small.intern("a.A");

    // The second id was never minted by `small`.
    assert_eq!(small.resolve(foreign), None);
}

#[test]
fn empty_interner() {
    let interner = Interner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.len(), 0);
}

#[test]
fn ids_work_as_set_elements() {
    let mut interner = Interner::new();
    let a = interner.intern("com.example.A");
    let b = interner.intern("com.example.B");

    let set: InSet<AnnotationFqn> = [a, b, a].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&a));
}

#[test]
fn debug_shows_the_raw_index() {
    let mut interner = Interner::new();
    let fqn = interner.intern("com.example.A");

    assert_eq!(format!("{fqn:?}"), "AnnotationFqn(0)");
}

#[test]
fn interning_at_scale() {
    let mut interner = Interner::new();
    let ids: Vec<AnnotationFqn> = (0..5_000)
        .map(|i| interner.intern(&format!("generated.pkg.Annotation{i}")))
        .collect();

    assert_eq!(interner.len(), 5_000);

    // Re-interning returns the same ids without growing the table.
    let again = interner.intern("generated.pkg.Annotation1234");
    assert_eq!(again, ids[1234]);
    assert_eq!(interner.len(), 5_000);
    assert_eq!(
        interner.resolve(ids[4_999]),
        Some("generated.pkg.Annotation4999")
    );
}
