//! Property-based equivalence of the evaluation routes
//!
//! Direct predicate evaluation, compiled ancestor replay, and the
//! single-pass scan must agree on every declaration of every tree, for
//! any predicate and any meta-annotation mapping.

use insignia_engine::{Automaton, matching_declarations};
use insignia_foundation::{AnnotationFqn, InSet, Interner};
use insignia_predicate::{
    Predicate, ResolvedPredicate, ResolvedUserDefinedAnnotations, dsl, resolve, simplify,
};
use insignia_tree::{DeclId, DeclKind, DeclTree};
use proptest::prelude::*;

const CONCRETE: usize = 6;
const META: usize = 2;

/// Interns the fixed test universe; ids are stable across calls.
fn universe() -> (Vec<AnnotationFqn>, Vec<AnnotationFqn>) {
    let mut interner = Interner::new();
    let concrete = (0..CONCRETE)
        .map(|i| interner.intern(&format!("com.example.C{i}")))
        .collect();
    let meta = (0..META)
        .map(|i| interner.intern(&format!("com.example.M{i}")))
        .collect();
    (concrete, meta)
}

fn compile(predicate: &Predicate, map: &ResolvedUserDefinedAnnotations) -> Automaton {
    match resolve(predicate, map) {
        ResolvedPredicate::Concrete(concrete) => Automaton::compile(&simplify(&concrete).unwrap()),
        ResolvedPredicate::Never => Automaton::never(),
    }
}

// =============================================================================
// Generators
// =============================================================================

fn concrete_subsets() -> impl Strategy<Value = Vec<AnnotationFqn>> {
    prop::collection::btree_set(0..CONCRETE, 1..4).prop_map(|indices| {
        let (concrete, _) = universe();
        indices.into_iter().map(|i| concrete[i]).collect()
    })
}

fn meta_subsets() -> impl Strategy<Value = Vec<AnnotationFqn>> {
    prop::collection::btree_set(0..META, 1..=META).prop_map(|indices| {
        let (_, meta) = universe();
        indices.into_iter().map(|i| meta[i]).collect()
    })
}

fn leaves() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        1 => Just(Predicate::any()),
        3 => concrete_subsets().prop_map(|ids| dsl::with(ids).unwrap()),
        3 => concrete_subsets().prop_map(|ids| dsl::under(ids).unwrap()),
        2 => meta_subsets().prop_map(|ids| dsl::meta_with(ids).unwrap()),
        2 => meta_subsets().prop_map(|ids| dsl::meta_under(ids).unwrap()),
    ]
}

fn predicates() -> impl Strategy<Value = Predicate> {
    leaves().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(b)),
            (inner.clone(), inner).prop_map(|(a, b)| a.and(b)),
        ]
    })
}

/// Builds a tree from raw rows: for the `i`-th declaration, the parent
/// seed selects a root or one of the already-built declarations.
fn trees() -> impl Strategy<Value = (DeclTree, Vec<DeclId>)> {
    prop::collection::vec(
        (
            any::<usize>(),
            0..4usize,
            prop::collection::btree_set(0..CONCRETE, 0..3),
        ),
        0..14,
    )
    .prop_map(|rows| {
        let (concrete, _) = universe();
        let kinds = [
            DeclKind::File,
            DeclKind::Class,
            DeclKind::Function,
            DeclKind::Property,
        ];
        let mut tree = DeclTree::new();
        let mut ids = Vec::new();
        for (i, (parent_seed, kind_index, annotations)) in rows.into_iter().enumerate() {
            let set: InSet<AnnotationFqn> =
                annotations.into_iter().map(|a| concrete[a]).collect();
            let parent = parent_seed % (i + 1);
            let id = if parent == i {
                tree.add_root(kinds[kind_index], format!("decl{i}"), set)
            } else {
                tree.add_child(ids[parent], kinds[kind_index], format!("decl{i}"), set)
                    .unwrap()
            };
            ids.push(id);
        }
        (tree, ids)
    })
}

/// Maps each meta-annotation to nothing, an empty set, or a subset of the
/// concrete universe.
fn mappings() -> impl Strategy<Value = ResolvedUserDefinedAnnotations> {
    prop::collection::vec(
        prop::option::of(prop::collection::btree_set(0..CONCRETE, 0..3)),
        META..=META,
    )
    .prop_map(|entries| {
        let (concrete, meta) = universe();
        let mut map = ResolvedUserDefinedAnnotations::new();
        for (tag, entry) in meta.iter().zip(entries) {
            if let Some(indices) = entry {
                map = map.insert(*tag, indices.into_iter().map(|i| concrete[i]).collect());
            }
        }
        map
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn all_three_evaluation_routes_agree(
        predicate in predicates(),
        (tree, ids) in trees(),
        map in mappings(),
    ) {
        let automaton = compile(&predicate, &map);
        let scanned = matching_declarations(&automaton, &tree);

        for &id in &ids {
            let direct = predicate.matches(&tree, id, &map);
            prop_assert_eq!(direct, automaton.matches(&tree, id));
            prop_assert_eq!(direct, scanned.contains(&id));
        }
    }

    #[test]
    fn resolution_is_a_fixed_point(predicate in predicates(), map in mappings()) {
        match resolve(&predicate, &map) {
            ResolvedPredicate::Concrete(once) => {
                prop_assert!(once.meta_annotations().is_empty());
                match resolve(&once, &map) {
                    ResolvedPredicate::Concrete(twice) => prop_assert_eq!(once, twice),
                    ResolvedPredicate::Never => {
                        prop_assert!(false, "live predicate died on a second resolve");
                    }
                }
            }
            ResolvedPredicate::Never => {
                // Dead is dead under the same mapping.
                prop_assert!(matches!(resolve(&predicate, &map), ResolvedPredicate::Never));
            }
        }
    }

    #[test]
    fn composite_verdicts_decompose(
        a in predicates(),
        b in predicates(),
        (tree, ids) in trees(),
        map in mappings(),
    ) {
        let or = compile(&a.clone().or(b.clone()), &map);
        let and = compile(&a.clone().and(b.clone()), &map);
        let left = compile(&a, &map);
        let right = compile(&b, &map);

        for &id in &ids {
            let l = left.matches(&tree, id);
            let r = right.matches(&tree, id);
            prop_assert_eq!(or.matches(&tree, id), l || r);
            prop_assert_eq!(and.matches(&tree, id), l && r);
        }
    }

    #[test]
    fn set_leaves_equal_their_memberwise_disjunction(
        members in concrete_subsets(),
        (tree, ids) in trees(),
    ) {
        let empty = ResolvedUserDefinedAnnotations::new();
        let whole = compile(&dsl::with(members.iter().copied()).unwrap(), &empty);
        let singles: Vec<Automaton> = members
            .iter()
            .map(|&a| compile(&dsl::with([a]).unwrap(), &empty))
            .collect();

        for &id in &ids {
            let memberwise = singles.iter().any(|single| single.matches(&tree, id));
            prop_assert_eq!(whole.matches(&tree, id), memberwise);
        }
    }

    #[test]
    fn matches_all_flag_is_sound(
        predicate in predicates(),
        (tree, ids) in trees(),
        map in mappings(),
    ) {
        if predicate.matches_all() {
            let automaton = compile(&predicate, &map);
            for &id in &ids {
                prop_assert!(predicate.matches(&tree, id, &map));
                prop_assert!(automaton.matches(&tree, id));
            }
        }
    }

    #[test]
    fn scan_results_come_back_in_visit_order(
        predicate in predicates(),
        (tree, _ids) in trees(),
        map in mappings(),
    ) {
        let visit_order = matching_declarations(&compile(&Predicate::any(), &map), &tree);
        let scanned = matching_declarations(&compile(&predicate, &map), &tree);

        let positions: Vec<usize> = scanned
            .iter()
            .map(|id| visit_order.iter().position(|v| v == id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
