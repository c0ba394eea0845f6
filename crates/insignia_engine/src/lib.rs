//! Predicate compilation and declaration matching for Insignia.
//!
//! This crate turns canonical predicates into executable state machines
//! and drives them over declaration trees:
//!
//! - [`Automaton`] - A compiled predicate; immutable, shared read-only
//! - [`State`] - Per-path matching progress, one reference-sized value
//! - [`matching_declarations`] - Single-automaton scan over a tree
//! - [`PredicateRegistry`] / [`CompiledPredicates`] - Named registration
//!   and the shared scan answering all registered predicates at once
//! - [`MatchIndex`] - Immutable scan result, queryable both ways
//! - [`AutomatonFormatter`] - Debug rendering of compiled automata
//!
//! Matching one declaration costs its annotation count plus one descend
//! per nesting level; a full scan is linear in the tree, independent of
//! predicate size once compiled.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod automaton;
pub mod dump;
pub mod registry;
pub mod scan;

pub use automaton::{Automaton, State};
pub use dump::AutomatonFormatter;
pub use registry::{CompiledPredicates, MatchIndex, PredicateKey, PredicateRegistry};
pub use scan::matching_declarations;
