//! Declaration records and identifiers.

use std::fmt;

use insignia_foundation::{AnnotationFqn, InSet, InVec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a declaration within one [`DeclTree`](crate::DeclTree).
///
/// Ids are dense arena indices; they are only meaningful for the tree
/// that minted them.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    /// Returns the raw index of this declaration id.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// The kind of a declaration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclKind {
    /// A source file, containing top-level declarations.
    File,
    /// A class-like declaration.
    Class,
    /// A function declaration.
    Function,
    /// A property declaration.
    Property,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Class => "class",
            Self::Function => "function",
            Self::Property => "property",
        };
        write!(f, "{name}")
    }
}

/// A declaration: a named program entity with a position in the
/// containment hierarchy and a set of directly-attached annotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decl {
    /// What kind of declaration this is.
    pub kind: DeclKind,
    /// The declared name.
    pub name: String,
    /// Annotations attached directly to this declaration.
    pub annotations: InSet<AnnotationFqn>,
    /// The enclosing declaration, if any.
    pub parent: Option<DeclId>,
    /// Nested declarations, in source order.
    pub children: InVec<DeclId>,
}
