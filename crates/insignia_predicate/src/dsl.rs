//! Builder functions for assembling predicates.
//!
//! These are the entry points extension registration code uses. Each takes
//! any iterator of annotation ids and rejects empty input eagerly; all
//! further combination happens with [`Predicate::or`] and
//! [`Predicate::and`].
//!
//! ```
//! use insignia_foundation::Interner;
//! use insignia_predicate::dsl;
//!
//! let mut interner = Interner::new();
//! let injectable = interner.intern("com.example.Injectable");
//! let module = interner.intern("com.example.Module");
//!
//! let predicate = dsl::with([injectable])
//!     .unwrap()
//!     .or(dsl::under([module]).unwrap());
//! assert!(!predicate.matches_all());
//! ```

use insignia_foundation::{AnnotationFqn, InSet, Result};

use crate::predicate::Predicate;

/// Matches declarations directly carrying one of `annotations`.
///
/// # Errors
///
/// Returns an error if `annotations` is empty.
pub fn with(annotations: impl IntoIterator<Item = AnnotationFqn>) -> Result<Predicate> {
    Predicate::annotated_with(annotations.into_iter().collect())
}

/// Matches declarations nested, at any depth, under one carrying one of
/// `annotations`.
///
/// # Errors
///
/// Returns an error if `annotations` is empty.
pub fn under(annotations: impl IntoIterator<Item = AnnotationFqn>) -> Result<Predicate> {
    Predicate::under_annotated_with(annotations.into_iter().collect())
}

/// Matches declarations carrying any annotation tagged with one of
/// `meta_annotations`.
///
/// # Errors
///
/// Returns an error if `meta_annotations` is empty.
pub fn meta_with(meta_annotations: impl IntoIterator<Item = AnnotationFqn>) -> Result<Predicate> {
    Predicate::meta_annotated_with(meta_annotations.into_iter().collect())
}

/// Matches declarations nested under one carrying any annotation tagged
/// with one of `meta_annotations`.
///
/// # Errors
///
/// Returns an error if `meta_annotations` is empty.
pub fn meta_under(meta_annotations: impl IntoIterator<Item = AnnotationFqn>) -> Result<Predicate> {
    Predicate::under_meta_annotated(meta_annotations.into_iter().collect())
}

/// Matches declarations carrying one of `annotations` directly or nested
/// under one that does.
///
/// # Errors
///
/// Returns an error if `annotations` is empty.
pub fn with_or_under(annotations: impl IntoIterator<Item = AnnotationFqn>) -> Result<Predicate> {
    let set: InSet<AnnotationFqn> = annotations.into_iter().collect();
    Ok(Predicate::annotated_with(set.clone())?.or(Predicate::under_annotated_with(set)?))
}

/// The meta-annotation form of [`with_or_under`].
///
/// # Errors
///
/// Returns an error if `meta_annotations` is empty.
pub fn meta_with_or_under(
    meta_annotations: impl IntoIterator<Item = AnnotationFqn>,
) -> Result<Predicate> {
    let set: InSet<AnnotationFqn> = meta_annotations.into_iter().collect();
    Ok(Predicate::meta_annotated_with(set.clone())?.or(Predicate::under_meta_annotated(set)?))
}
