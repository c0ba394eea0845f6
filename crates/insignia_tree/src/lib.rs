//! Declaration trees for Insignia.
//!
//! This crate provides the minimal declaration-tree model the matching
//! engine walks: an arena of declarations ([`DeclTree`]), each carrying a
//! kind, a name, an annotation set, and its position in the containment
//! hierarchy, plus the depth-first walk primitive ([`walk_tree`]) and
//! ancestor iteration the matcher contract requires.
//!
//! The real compiler front end supplies far richer declarations; the
//! matching engine only ever reads the three facts modeled here: kind,
//! directly-attached annotations, and containment.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod decl;
pub mod tree;
pub mod visitor;

pub use decl::{Decl, DeclId, DeclKind};
pub use tree::{Ancestors, DeclTree};
pub use visitor::{DeclVisitor, walk_decl, walk_tree};
