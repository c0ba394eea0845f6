//! Interning for fully-qualified annotation names.
//!
//! Annotation names are interned to enable fast equality comparison and
//! reduced memory usage: predicates, declaration trees, and automata all
//! compare annotations by id, never by string.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned identifier for a fully-qualified annotation name.
///
/// An `AnnotationFqn` is opaque: the engine only ever compares and hashes
/// it. The [`Interner`] that produced it can render it back to a string.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotationFqn(pub(crate) u32);

impl AnnotationFqn {
    /// Returns the raw index of this annotation id.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AnnotationFqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotationFqn({})", self.0)
    }
}

/// Interner for fully-qualified annotation names.
///
/// Maps strings to unique [`AnnotationFqn`] ids and back. It is not
/// thread-safe; use external synchronization if needed. In a compiler
/// session all interning happens up front, before matching begins.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interner {
    /// String storage, indexed by annotation id.
    names: Vec<Arc<str>>,
    /// Map from name to id.
    name_map: HashMap<Arc<str>, AnnotationFqn>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an annotation name, returning its [`AnnotationFqn`].
    ///
    /// Re-interning the same name returns the same id.
    ///
    /// # Panics
    ///
    /// Panics if the number of interned names exceeds `u32::MAX`.
    pub fn intern(&mut self, name: &str) -> AnnotationFqn {
        if let Some(&id) = self.name_map.get(name) {
            return id;
        }

        let idx = u32::try_from(self.names.len()).expect("too many interned annotations");
        let arc: Arc<str> = name.into();
        self.names.push(arc.clone());

        let id = AnnotationFqn(idx);
        self.name_map.insert(arc, id);
        id
    }

    /// Gets the name for an annotation id.
    ///
    /// Returns `None` for ids minted by a different interner.
    #[must_use]
    pub fn resolve(&self, id: AnnotationFqn) -> Option<&str> {
        self.names.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Returns the number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
