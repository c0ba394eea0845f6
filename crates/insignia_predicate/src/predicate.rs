//! The predicate tree and direct evaluation.
//!
//! Predicates are immutable and persistent: combinators never mutate their
//! operands, sub-predicates are shared via `Arc`, and every node caches the
//! union of annotation and meta-annotation identifiers reachable from it so
//! callers can pre-filter by membership without walking the tree.

use std::sync::Arc;

use insignia_foundation::{AnnotationFqn, Error, InSet, Result};
use insignia_tree::{DeclId, DeclTree};

use crate::resolve::{ResolvedUserDefinedAnnotations, concrete_union};

/// A boolean expression over a declaration's annotation facts.
///
/// Built once at plugin-setup time, then resolved, canonicalized, and
/// compiled exactly once per compilation run. See the crate docs for the
/// pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    kind: PredicateKind,
    annotations: InSet<AnnotationFqn>,
    meta_annotations: InSet<AnnotationFqn>,
}

/// The shape of a predicate node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateKind {
    /// Matches every declaration unconditionally.
    Any,
    /// Matches if either operand matches.
    Or(Arc<Predicate>, Arc<Predicate>),
    /// Matches if both operands match.
    And(Arc<Predicate>, Arc<Predicate>),
    /// Matches a declaration carrying at least one of the annotations
    /// directly.
    AnnotatedWith(InSet<AnnotationFqn>),
    /// Matches a declaration with an ancestor, at any depth, carrying at
    /// least one of the annotations. The annotated ancestor itself does
    /// not match.
    UnderAnnotatedWith(InSet<AnnotationFqn>),
    /// Like [`PredicateKind::AnnotatedWith`], but tests whether the
    /// declaration carries *any* annotation that is itself tagged with one
    /// of the given meta-annotations in the program being compiled.
    AnnotatedWithMeta(InSet<AnnotationFqn>),
    /// Like [`PredicateKind::UnderAnnotatedWith`], but through the
    /// meta-annotation indirection.
    UnderMetaAnnotated(InSet<AnnotationFqn>),
}

impl Predicate {
    /// The predicate that matches every declaration.
    #[must_use]
    pub fn any() -> Self {
        Self {
            kind: PredicateKind::Any,
            annotations: InSet::new(),
            meta_annotations: InSet::new(),
        }
    }

    /// Builds a predicate matching declarations directly carrying one of
    /// `annotations`.
    ///
    /// # Errors
    ///
    /// Returns an error if `annotations` is empty.
    pub fn annotated_with(annotations: InSet<AnnotationFqn>) -> Result<Self> {
        Self::require_non_empty(&annotations, "annotated_with")?;
        Ok(Self::annotated_with_unchecked(annotations))
    }

    /// Builds a predicate matching declarations nested under one carrying
    /// one of `annotations`.
    ///
    /// # Errors
    ///
    /// Returns an error if `annotations` is empty.
    pub fn under_annotated_with(annotations: InSet<AnnotationFqn>) -> Result<Self> {
        Self::require_non_empty(&annotations, "under_annotated_with")?;
        Ok(Self::under_annotated_with_unchecked(annotations))
    }

    /// Builds a predicate matching declarations carrying any annotation
    /// tagged with one of `meta_annotations`.
    ///
    /// # Errors
    ///
    /// Returns an error if `meta_annotations` is empty.
    pub fn meta_annotated_with(meta_annotations: InSet<AnnotationFqn>) -> Result<Self> {
        Self::require_non_empty(&meta_annotations, "meta_annotated_with")?;
        Ok(Self {
            kind: PredicateKind::AnnotatedWithMeta(meta_annotations.clone()),
            annotations: InSet::new(),
            meta_annotations,
        })
    }

    /// Builds a predicate matching declarations nested under one carrying
    /// any annotation tagged with one of `meta_annotations`.
    ///
    /// # Errors
    ///
    /// Returns an error if `meta_annotations` is empty.
    pub fn under_meta_annotated(meta_annotations: InSet<AnnotationFqn>) -> Result<Self> {
        Self::require_non_empty(&meta_annotations, "under_meta_annotated")?;
        Ok(Self {
            kind: PredicateKind::UnderMetaAnnotated(meta_annotations.clone()),
            annotations: InSet::new(),
            meta_annotations,
        })
    }

    /// Combines two predicates into a disjunction.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::or_shared(Arc::new(self), Arc::new(other))
    }

    /// Combines two predicates into a conjunction.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::and_shared(Arc::new(self), Arc::new(other))
    }

    pub(crate) fn or_shared(a: Arc<Self>, b: Arc<Self>) -> Self {
        Self {
            annotations: a.annotations.union(&b.annotations),
            meta_annotations: a.meta_annotations.union(&b.meta_annotations),
            kind: PredicateKind::Or(a, b),
        }
    }

    pub(crate) fn and_shared(a: Arc<Self>, b: Arc<Self>) -> Self {
        Self {
            annotations: a.annotations.union(&b.annotations),
            meta_annotations: a.meta_annotations.union(&b.meta_annotations),
            kind: PredicateKind::And(a, b),
        }
    }

    // Callers guarantee the set is non-empty.
    pub(crate) fn annotated_with_unchecked(annotations: InSet<AnnotationFqn>) -> Self {
        Self {
            kind: PredicateKind::AnnotatedWith(annotations.clone()),
            annotations,
            meta_annotations: InSet::new(),
        }
    }

    pub(crate) fn under_annotated_with_unchecked(annotations: InSet<AnnotationFqn>) -> Self {
        Self {
            kind: PredicateKind::UnderAnnotatedWith(annotations.clone()),
            annotations,
            meta_annotations: InSet::new(),
        }
    }

    fn require_non_empty(set: &InSet<AnnotationFqn>, builder: &'static str) -> Result<()> {
        if set.is_empty() {
            return Err(Error::empty_annotation_set(builder));
        }
        Ok(())
    }

    /// The shape of this node.
    #[must_use]
    pub fn kind(&self) -> &PredicateKind {
        &self.kind
    }

    /// Union of concrete annotation identifiers reachable from this node.
    #[must_use]
    pub fn annotations(&self) -> &InSet<AnnotationFqn> {
        &self.annotations
    }

    /// Union of meta-annotation identifiers reachable from this node.
    ///
    /// Empty exactly when the predicate needs no meta-annotation
    /// resolution.
    #[must_use]
    pub fn meta_annotations(&self) -> &InSet<AnnotationFqn> {
        &self.meta_annotations
    }

    /// True if this predicate is statically known to match every
    /// declaration, letting callers skip matching entirely.
    #[must_use]
    pub fn matches_all(&self) -> bool {
        match &self.kind {
            PredicateKind::Any => true,
            PredicateKind::Or(a, b) => a.matches_all() || b.matches_all(),
            PredicateKind::And(a, b) => a.matches_all() && b.matches_all(),
            _ => false,
        }
    }

    /// Evaluates this predicate directly against one declaration, walking
    /// its ancestor chain.
    ///
    /// Meta-annotation leaves are expanded against `meta` on the fly, with
    /// the same empty-union semantics as [`resolve`](crate::resolve):
    /// a meta-annotation nothing in the program is tagged with matches no
    /// declaration. The verdict always agrees with driving the compiled
    /// state machine over the same tree.
    ///
    /// A `decl` minted by a different tree matches nothing.
    #[must_use]
    pub fn matches(
        &self,
        tree: &DeclTree,
        decl: DeclId,
        meta: &ResolvedUserDefinedAnnotations,
    ) -> bool {
        match &self.kind {
            PredicateKind::Any => tree.get(decl).is_some(),
            PredicateKind::Or(a, b) => a.matches(tree, decl, meta) || b.matches(tree, decl, meta),
            PredicateKind::And(a, b) => a.matches(tree, decl, meta) && b.matches(tree, decl, meta),
            PredicateKind::AnnotatedWith(set) => decl_has_any(tree, decl, set),
            PredicateKind::UnderAnnotatedWith(set) => ancestor_has_any(tree, decl, set),
            PredicateKind::AnnotatedWithMeta(metas) => {
                decl_has_any(tree, decl, &concrete_union(metas, meta))
            }
            PredicateKind::UnderMetaAnnotated(metas) => {
                ancestor_has_any(tree, decl, &concrete_union(metas, meta))
            }
        }
    }
}

fn decl_has_any(tree: &DeclTree, decl: DeclId, set: &InSet<AnnotationFqn>) -> bool {
    tree.get(decl)
        .is_some_and(|d| d.annotations.iter().any(|a| set.contains(a)))
}

fn ancestor_has_any(tree: &DeclTree, decl: DeclId, set: &InSet<AnnotationFqn>) -> bool {
    tree.ancestors(decl)
        .any(|ancestor| decl_has_any(tree, ancestor, set))
}
