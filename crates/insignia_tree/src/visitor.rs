//! Depth-first traversal of declaration trees.
//!
//! [`DeclVisitor`] is the walk primitive the matching engine consumes:
//! `enter_decl` fires before a declaration's children are visited,
//! `leave_decl` after. Siblings are visited in source order.

use crate::decl::{Decl, DeclId};
use crate::tree::DeclTree;

/// Trait for read-only declaration-tree visitors.
///
/// Implement the methods you care about; the default implementations do
/// nothing. Use [`walk_tree`] or [`walk_decl`] to drive the traversal.
#[allow(unused_variables)]
pub trait DeclVisitor {
    /// Called when entering a declaration, before its children.
    fn enter_decl(&mut self, id: DeclId, decl: &Decl) {}

    /// Called when leaving a declaration, after its children.
    fn leave_decl(&mut self, id: DeclId, decl: &Decl) {}
}

/// Walks the subtree rooted at `id` depth-first.
///
/// An id minted by a different tree is ignored.
pub fn walk_decl<V: DeclVisitor>(visitor: &mut V, tree: &DeclTree, id: DeclId) {
    let Some(decl) = tree.get(id) else {
        return;
    };

    visitor.enter_decl(id, decl);
    for &child in decl.children.iter() {
        walk_decl(visitor, tree, child);
    }
    visitor.leave_decl(id, decl);
}

/// Walks every top-level declaration of the tree depth-first.
pub fn walk_tree<V: DeclVisitor>(visitor: &mut V, tree: &DeclTree) {
    for root in tree.roots() {
        walk_decl(visitor, tree, root);
    }
}
