//! Interned annotation identifiers, errors, and persistent collections for Insignia.
//!
//! This crate provides:
//! - [`AnnotationFqn`] - Interned fully-qualified annotation identifiers
//! - [`Interner`] - The string table behind [`AnnotationFqn`]
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`InVec`], [`InSet`], [`InMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod fqn;

pub use collections::{InMap, InSet, InVec};
pub use error::{Error, ErrorContext, ErrorKind};
pub use fqn::{AnnotationFqn, Interner};

/// Convenience alias for results carrying an Insignia [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
