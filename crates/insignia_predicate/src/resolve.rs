//! Meta-annotation resolution.
//!
//! Once program-wide annotation discovery completes, the caller knows,
//! for every user-defined meta-annotation, which concrete annotations are
//! tagged with it. [`resolve`] rewrites every meta-annotation leaf of a
//! predicate into the corresponding concrete leaf over that union, after
//! which the predicate is ready for canonicalization.
//!
//! A meta-annotation nothing in the program is tagged with can never
//! match. Such leaves resolve to an explicit never marker rather than
//! being dropped silently: an `Or` with one dead branch degrades to the
//! other branch, an `And` with a dead branch is itself dead, and a fully
//! dead predicate resolves to [`ResolvedPredicate::Never`].

use std::sync::Arc;

use insignia_foundation::{AnnotationFqn, InMap, InSet};

use crate::predicate::{Predicate, PredicateKind};

/// Mapping from meta-annotation to the concrete annotations observed, in
/// the current compilation, to be tagged with it.
///
/// Supplied by the annotation-discovery collaborator once per compilation
/// and treated as a pure, read-only input from then on.
pub type ResolvedUserDefinedAnnotations = InMap<AnnotationFqn, InSet<AnnotationFqn>>;

/// Outcome of resolving a predicate against a discovered mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedPredicate {
    /// A predicate free of meta-annotation leaves, ready for
    /// canonicalization.
    Concrete(Predicate),
    /// The predicate can never match any declaration in this compilation.
    Never,
}

/// Resolves every meta-annotation leaf of `predicate` against `map`.
///
/// Resolution is bottom-up and structure-sharing: subtrees containing no
/// meta-annotation leaves are reused as-is, not rebuilt. Resolving an
/// already-concrete predicate returns it structurally unchanged, whatever
/// the map contains.
#[must_use]
pub fn resolve(
    predicate: &Predicate,
    map: &ResolvedUserDefinedAnnotations,
) -> ResolvedPredicate {
    if predicate.meta_annotations().is_empty() {
        return ResolvedPredicate::Concrete(predicate.clone());
    }

    match resolve_node(&Arc::new(predicate.clone()), map) {
        Step::Never => ResolvedPredicate::Never,
        Step::Live { predicate, .. } => {
            ResolvedPredicate::Concrete(Arc::unwrap_or_clone(predicate))
        }
    }
}

/// Union of the concrete annotations `map` associates with each of
/// `metas`.
pub(crate) fn concrete_union(
    metas: &InSet<AnnotationFqn>,
    map: &ResolvedUserDefinedAnnotations,
) -> InSet<AnnotationFqn> {
    let mut union = InSet::new();
    for meta in metas.iter() {
        if let Some(concrete) = map.get(meta) {
            union = union.union(concrete);
        }
    }
    union
}

enum Step {
    /// The subtree survives resolution. `changed` is false when the
    /// original node was reused unchanged.
    Live {
        predicate: Arc<Predicate>,
        changed: bool,
    },
    /// The subtree can never match.
    Never,
}

fn resolve_node(node: &Arc<Predicate>, map: &ResolvedUserDefinedAnnotations) -> Step {
    // Subtrees without meta leaves are shared, not rebuilt.
    if node.meta_annotations().is_empty() {
        return Step::Live {
            predicate: Arc::clone(node),
            changed: false,
        };
    }

    match node.kind() {
        PredicateKind::Any
        | PredicateKind::AnnotatedWith(_)
        | PredicateKind::UnderAnnotatedWith(_) => Step::Live {
            predicate: Arc::clone(node),
            changed: false,
        },

        PredicateKind::AnnotatedWithMeta(metas) => {
            let union = concrete_union(metas, map);
            if union.is_empty() {
                Step::Never
            } else {
                Step::Live {
                    predicate: Arc::new(Predicate::annotated_with_unchecked(union)),
                    changed: true,
                }
            }
        }

        PredicateKind::UnderMetaAnnotated(metas) => {
            let union = concrete_union(metas, map);
            if union.is_empty() {
                Step::Never
            } else {
                Step::Live {
                    predicate: Arc::new(Predicate::under_annotated_with_unchecked(union)),
                    changed: true,
                }
            }
        }

        PredicateKind::Or(a, b) => match (resolve_node(a, map), resolve_node(b, map)) {
            (Step::Never, Step::Never) => Step::Never,
            (Step::Never, Step::Live { predicate, .. })
            | (Step::Live { predicate, .. }, Step::Never) => Step::Live {
                predicate,
                changed: true,
            },
            (
                Step::Live {
                    predicate: pa,
                    changed: ca,
                },
                Step::Live {
                    predicate: pb,
                    changed: cb,
                },
            ) => {
                if ca || cb {
                    Step::Live {
                        predicate: Arc::new(Predicate::or_shared(pa, pb)),
                        changed: true,
                    }
                } else {
                    Step::Live {
                        predicate: Arc::clone(node),
                        changed: false,
                    }
                }
            }
        },

        PredicateKind::And(a, b) => match (resolve_node(a, map), resolve_node(b, map)) {
            (Step::Never, _) | (_, Step::Never) => Step::Never,
            (
                Step::Live {
                    predicate: pa,
                    changed: ca,
                },
                Step::Live {
                    predicate: pb,
                    changed: cb,
                },
            ) => {
                if ca || cb {
                    Step::Live {
                        predicate: Arc::new(Predicate::and_shared(pa, pb)),
                        changed: true,
                    }
                } else {
                    Step::Live {
                        predicate: Arc::clone(node),
                        changed: false,
                    }
                }
            }
        },
    }
}
