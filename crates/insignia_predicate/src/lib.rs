//! Annotation predicates for Insignia.
//!
//! A [`Predicate`] is an immutable boolean expression over a declaration's
//! annotation facts, built by extension registration code through the
//! [`dsl`] module. Before matching, a predicate passes through two
//! rewrites:
//!
//! ```text
//! Predicate ──resolve──> ResolvedPredicate ──simplify──> SimplifiedPredicate
//!            meta leaves                    canonical form:
//!            replaced by                    Any / Or / And /
//!            concrete sets                  HasAnnotation / UnderAnnotated
//! ```
//!
//! The canonical form is what the matching engine compiles into its state
//! machine. Predicates can also be evaluated directly against a single
//! declaration ([`Predicate::matches`]) when the full ancestor chain is at
//! hand; both evaluation routes always agree.
//!
//! # Modules
//!
//! - [`predicate`] - The predicate tree and direct evaluation
//! - [`dsl`] - Builder functions (`with`, `under`, `meta_with`, ...)
//! - [`resolve`] - Meta-annotation resolution against a discovered mapping
//! - [`simplify`] - Canonicalization into the single-annotation normal form

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dsl;
pub mod predicate;
pub mod resolve;
pub mod simplify;

pub use predicate::{Predicate, PredicateKind};
pub use resolve::{ResolvedPredicate, ResolvedUserDefinedAnnotations, resolve};
pub use simplify::{SimplifiedPredicate, simplify};
