//! The declaration arena.
//!
//! Declarations live in a flat arena indexed by [`DeclId`]; parent and
//! child links are ids, never references, so the whole tree is cheap to
//! share read-only across a compilation run.

use insignia_foundation::{AnnotationFqn, Error, InSet, InVec, Result};

use crate::decl::{Decl, DeclId, DeclKind};

/// Arena of declarations forming one program's containment hierarchy.
#[derive(Clone, Debug, Default)]
pub struct DeclTree {
    nodes: Vec<Decl>,
}

impl DeclTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of declarations in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a top-level declaration.
    ///
    /// # Panics
    ///
    /// Panics if the number of declarations exceeds `u32::MAX`.
    pub fn add_root(
        &mut self,
        kind: DeclKind,
        name: impl Into<String>,
        annotations: InSet<AnnotationFqn>,
    ) -> DeclId {
        self.alloc(kind, name.into(), annotations, None)
    }

    /// Adds a declaration nested inside `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` does not refer to a declaration in
    /// this tree.
    ///
    /// # Panics
    ///
    /// Panics if the number of declarations exceeds `u32::MAX`.
    pub fn add_child(
        &mut self,
        parent: DeclId,
        kind: DeclKind,
        name: impl Into<String>,
        annotations: InSet<AnnotationFqn>,
    ) -> Result<DeclId> {
        if parent.0 as usize >= self.nodes.len() {
            return Err(Error::unknown_declaration(parent.0));
        }

        let id = self.alloc(kind, name.into(), annotations, Some(parent));
        let node = &mut self.nodes[parent.0 as usize];
        node.children = node.children.push_back(id);
        Ok(id)
    }

    fn alloc(
        &mut self,
        kind: DeclKind,
        name: String,
        annotations: InSet<AnnotationFqn>,
        parent: Option<DeclId>,
    ) -> DeclId {
        let idx = u32::try_from(self.nodes.len()).expect("too many declarations");
        self.nodes.push(Decl {
            kind,
            name,
            annotations,
            parent,
            children: InVec::new(),
        });
        DeclId(idx)
    }

    /// Gets a declaration by id.
    ///
    /// Returns `None` for ids minted by a different tree.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&Decl> {
        self.nodes.get(id.0 as usize)
    }

    /// Returns the ids of all top-level declarations, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.iter()
            .filter(|(_, decl)| decl.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Returns an iterator over all declarations with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        (0u32..).zip(self.nodes.iter()).map(|(i, decl)| (DeclId(i), decl))
    }

    /// Returns the chain of enclosing declarations of `id`, nearest first.
    ///
    /// The declaration itself is not included. An id minted by a
    /// different tree yields an empty chain.
    #[must_use]
    pub fn ancestors(&self, id: DeclId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.get(id).and_then(|decl| decl.parent),
        }
    }
}

/// Iterator over the enclosing declarations of a node, nearest first.
pub struct Ancestors<'a> {
    tree: &'a DeclTree,
    current: Option<DeclId>,
}

impl Iterator for Ancestors<'_> {
    type Item = DeclId;

    fn next(&mut self) -> Option<DeclId> {
        let id = self.current?;
        self.current = self.tree.get(id).and_then(|decl| decl.parent);
        Some(id)
    }
}
