//! Integration tests for compiled automata
//!
//! Predicates built through the dsl, resolved, canonicalized, and
//! compiled, then driven by hand and by ancestor replay.

use insignia_engine::{Automaton, AutomatonFormatter, matching_declarations};
use insignia_foundation::{AnnotationFqn, InSet, Interner};
use insignia_predicate::{
    Predicate, ResolvedPredicate, ResolvedUserDefinedAnnotations, dsl, resolve, simplify,
};
use insignia_tree::{DeclKind, DeclTree};

fn compile(predicate: &Predicate, map: &ResolvedUserDefinedAnnotations) -> Automaton {
    match resolve(predicate, map) {
        ResolvedPredicate::Concrete(concrete) => Automaton::compile(&simplify(&concrete).unwrap()),
        ResolvedPredicate::Never => Automaton::never(),
    }
}

fn no_meta() -> ResolvedUserDefinedAnnotations {
    ResolvedUserDefinedAnnotations::new()
}

// =============================================================================
// Compilation
// =============================================================================

#[test]
fn arena_sizes_through_the_full_pipeline() {
    let mut interner = Interner::new();
    let fqns: Vec<AnnotationFqn> = (0..8)
        .map(|i| interner.intern(&format!("com.example.A{i}")))
        .collect();

    assert_eq!(compile(&Predicate::any(), &no_meta()).node_count(), 1);
    assert_eq!(
        compile(&dsl::with([fqns[0]]).unwrap(), &no_meta()).node_count(),
        2
    );
    assert_eq!(
        compile(&dsl::under([fqns[0]]).unwrap(), &no_meta()).node_count(),
        3
    );

    // An eight-member set expands to eight two-node leaves; the or
    // composites above them add no arena nodes.
    assert_eq!(
        compile(&dsl::with(fqns.iter().copied()).unwrap(), &no_meta()).node_count(),
        16
    );
}

#[test]
fn set_sizes_match_identically_whatever_the_split() {
    let mut interner = Interner::new();
    let universe: Vec<AnnotationFqn> = (0..7)
        .map(|i| interner.intern(&format!("com.example.S{i}")))
        .collect();

    for size in [1usize, 2, 3, 7] {
        let members = &universe[..size];
        let automaton = compile(&dsl::with(members.iter().copied()).unwrap(), &no_meta());

        // One declaration per universe annotation, plus a bare one.
        let mut tree = DeclTree::new();
        let file = tree.add_root(DeclKind::File, "m.kt", InSet::new());
        let mut carriers = Vec::new();
        for (i, &fqn) in universe.iter().enumerate() {
            let id = tree
                .add_child(file, DeclKind::Class, format!("C{i}"), InSet::new().insert(fqn))
                .unwrap();
            carriers.push(id);
        }
        let bare = tree.add_child(file, DeclKind::Class, "Bare", InSet::new()).unwrap();

        for (i, &id) in carriers.iter().enumerate() {
            assert_eq!(automaton.matches(&tree, id), i < size, "size {size}, member {i}");
        }
        assert!(!automaton.matches(&tree, bare));
        assert!(!automaton.matches(&tree, file));
    }
}

#[test]
fn unmapped_meta_compiles_to_the_never_automaton() {
    let mut interner = Interner::new();
    let scope = interner.intern("javax.inject.Scope");

    let automaton = compile(&dsl::meta_with([scope]).unwrap(), &no_meta());
    assert_eq!(automaton.node_count(), 1);

    let mut tree = DeclTree::new();
    let root = tree.add_root(DeclKind::File, "m.kt", InSet::new().insert(scope));
    assert!(!automaton.matches(&tree, root));
}

// =============================================================================
// Hand-driven states
// =============================================================================

#[test]
fn a_module_scenario_driven_event_by_event() {
    let mut interner = Interner::new();
    let injectable = interner.intern("com.example.Injectable");
    let module = interner.intern("com.example.Module");

    let predicate = dsl::with([injectable])
        .unwrap()
        .or(dsl::under([module]).unwrap());
    let automaton = compile(&predicate, &no_meta());

    // file { class M @Module { fun provide }, class Svc @Injectable }
    let file = automaton.initial_state();
    assert!(!automaton.is_success(&file));

    let mut m = automaton.on_descend(&file);
    m = automaton.on_annotation(&m, module);
    assert!(!automaton.is_success(&m));

    let provide = automaton.on_descend(&m);
    assert!(automaton.is_success(&provide));

    // Svc restarts from the file's state, not from its sibling's.
    let mut svc = automaton.on_descend(&file);
    svc = automaton.on_annotation(&svc, injectable);
    assert!(automaton.is_success(&svc));
}

#[test]
fn states_branch_without_disturbing_each_other() {
    let mut interner = Interner::new();
    let a = interner.intern("com.example.A");

    let automaton = compile(&dsl::with([a]).unwrap(), &no_meta());
    let parent = automaton.initial_state();

    // Two children continue from the same saved state.
    let annotated = automaton.on_annotation(&automaton.on_descend(&parent), a);
    let plain = automaton.on_descend(&parent);

    assert!(automaton.is_success(&annotated));
    assert!(!automaton.is_success(&plain));
    assert!(!automaton.is_success(&parent));
}

#[test]
fn conjunction_of_direct_and_ancestor_facts() {
    let mut interner = Interner::new();
    let injectable = interner.intern("com.example.Injectable");
    let module = interner.intern("com.example.Module");

    // Injectable declarations that live inside a module.
    let predicate = dsl::with([injectable])
        .unwrap()
        .and(dsl::under([module]).unwrap());
    let automaton = compile(&predicate, &no_meta());

    let mut tree = DeclTree::new();
    let file = tree.add_root(DeclKind::File, "m.kt", InSet::new());
    let module_class = tree
        .add_child(file, DeclKind::Class, "M", InSet::new().insert(module))
        .unwrap();
    let inside = tree
        .add_child(
            module_class,
            DeclKind::Class,
            "Inside",
            InSet::new().insert(injectable),
        )
        .unwrap();
    let outside = tree
        .add_child(file, DeclKind::Class, "Outside", InSet::new().insert(injectable))
        .unwrap();

    assert_eq!(matching_declarations(&automaton, &tree), vec![inside]);
    assert!(automaton.matches(&tree, inside));
    assert!(!automaton.matches(&tree, outside));
    assert!(!automaton.matches(&tree, module_class));
}

// =============================================================================
// Sharing
// =============================================================================

#[test]
fn one_automaton_serves_many_threads() {
    let mut interner = Interner::new();
    let module = interner.intern("com.example.Module");
    let automaton = compile(&dsl::under([module]).unwrap(), &no_meta());

    let mut tree = DeclTree::new();
    let file = tree.add_root(DeclKind::File, "m.kt", InSet::new());
    let m = tree
        .add_child(file, DeclKind::Class, "M", InSet::new().insert(module))
        .unwrap();
    let inner = tree.add_child(m, DeclKind::Class, "Inner", InSet::new()).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(matching_declarations(&automaton, &tree), vec![inner]);
            });
        }
    });
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn formatter_shows_the_compiled_wiring() {
    let mut interner = Interner::new();
    let injectable = interner.intern("com.example.Injectable");
    let module = interner.intern("com.example.Module");

    let predicate = dsl::with([injectable])
        .unwrap()
        .or(dsl::under([module]).unwrap());
    let automaton = compile(&predicate, &no_meta());

    let output = AutomatonFormatter::new(&interner).format(&automaton);
    assert!(output.contains("automaton (5 nodes)"));
    assert!(output.contains("@com.example.Injectable"));
    assert!(output.contains("@com.example.Module"));
    assert!(output.contains("entry: or(node 1, node 2)"));
}

#[test]
fn formatter_survives_the_never_automaton() {
    let interner = Interner::new();
    let output = AutomatonFormatter::new(&interner).format(&Automaton::never());
    assert!(output.contains("no transitions"));
}
