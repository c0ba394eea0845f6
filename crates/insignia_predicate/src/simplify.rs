//! Canonicalization into the simplified form the automaton compiler
//! consumes.
//!
//! Builder-surface predicates test whole annotation sets at once. The
//! canonical form tests one annotation per leaf, with multi-member sets
//! expanded into balanced binary `Or` trees so automaton depth stays
//! logarithmic in set size.

use insignia_foundation::{AnnotationFqn, Error, InSet, Result};

use crate::predicate::{Predicate, PredicateKind};

/// Canonical predicate form.
///
/// Every annotation test carries exactly one identifier. This is the
/// shape the automaton compiler accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimplifiedPredicate {
    /// Matches every declaration.
    Any,
    /// Matches when either operand matches.
    Or(Box<SimplifiedPredicate>, Box<SimplifiedPredicate>),
    /// Matches when both operands match.
    And(Box<SimplifiedPredicate>, Box<SimplifiedPredicate>),
    /// Matches a declaration carrying this annotation itself.
    HasAnnotation(AnnotationFqn),
    /// Matches declarations strictly enclosed by one carrying this
    /// annotation.
    UnderAnnotated(AnnotationFqn),
}

/// Rewrites a meta-resolved predicate into canonical form.
///
/// # Errors
///
/// Returns [`ErrorKind::UnresolvedMeta`](insignia_foundation::ErrorKind)
/// if the predicate still contains meta-annotation leaves. Resolution is
/// mandatory before canonicalization.
pub fn simplify(predicate: &Predicate) -> Result<SimplifiedPredicate> {
    match predicate.kind() {
        PredicateKind::Any => Ok(SimplifiedPredicate::Any),
        PredicateKind::Or(a, b) => Ok(SimplifiedPredicate::Or(
            Box::new(simplify(a)?),
            Box::new(simplify(b)?),
        )),
        PredicateKind::And(a, b) => Ok(SimplifiedPredicate::And(
            Box::new(simplify(a)?),
            Box::new(simplify(b)?),
        )),
        PredicateKind::AnnotatedWith(set) => expand(set, SimplifiedPredicate::HasAnnotation),
        PredicateKind::UnderAnnotatedWith(set) => {
            expand(set, SimplifiedPredicate::UnderAnnotated)
        }
        PredicateKind::AnnotatedWithMeta(metas) | PredicateKind::UnderMetaAnnotated(metas) => {
            Err(Error::unresolved_meta(metas.len()))
        }
    }
}

/// Expands an annotation set into a balanced `Or` tree of single-id
/// leaves, ordered by interner index so the shape is deterministic.
fn expand(
    set: &InSet<AnnotationFqn>,
    leaf: fn(AnnotationFqn) -> SimplifiedPredicate,
) -> Result<SimplifiedPredicate> {
    let mut ordered: Vec<AnnotationFqn> = set.iter().copied().collect();
    ordered.sort_unstable_by_key(|fqn| fqn.index());
    balanced(&ordered, leaf).ok_or_else(|| {
        Error::internal("annotation test with an empty set survived construction")
    })
}

fn balanced(
    ordered: &[AnnotationFqn],
    leaf: fn(AnnotationFqn) -> SimplifiedPredicate,
) -> Option<SimplifiedPredicate> {
    match ordered {
        [] => None,
        [single] => Some(leaf(*single)),
        _ => {
            let (lo, hi) = ordered.split_at(ordered.len() / 2);
            match (balanced(lo, leaf), balanced(hi, leaf)) {
                (Some(a), Some(b)) => {
                    Some(SimplifiedPredicate::Or(Box::new(a), Box::new(b)))
                }
                (one, None) | (None, one) => one,
            }
        }
    }
}
