//! Single-pass matching over a declaration tree.
//!
//! The scanner rides the [`insignia_tree`] depth-first walk and drives
//! any number of automata at once: one current [`State`] per automaton,
//! with parent states saved on a stack so siblings each start from the
//! parent's post-annotation state. Live memory is proportional to tree
//! depth times automaton count, never to tree size.

use insignia_tree::{Decl, DeclId, DeclTree, DeclVisitor, walk_tree};

use crate::automaton::{Automaton, State};

/// Collects the declarations matched by one automaton, in depth-first
/// visit order.
#[must_use]
pub fn matching_declarations(automaton: &Automaton, tree: &DeclTree) -> Vec<DeclId> {
    let mut scanner = Scanner::new(vec![automaton]);
    walk_tree(&mut scanner, tree);
    scanner
        .into_matches()
        .into_iter()
        .map(|(decl, _)| decl)
        .collect()
}

/// Visitor driving several automata over one walk.
pub(crate) struct Scanner<'a> {
    automata: Vec<&'a Automaton>,
    /// Current state per automaton for the declaration being visited.
    current: Vec<State>,
    /// Saved parent states, one frame per open declaration.
    saved: Vec<Vec<State>>,
    /// `(declaration, automaton index)` pairs, in visit order.
    matches: Vec<(DeclId, usize)>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(automata: Vec<&'a Automaton>) -> Self {
        let current = automata.iter().map(|a| a.entry_state()).collect();
        Self {
            automata,
            current,
            saved: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub(crate) fn into_matches(self) -> Vec<(DeclId, usize)> {
        self.matches
    }
}

impl DeclVisitor for Scanner<'_> {
    fn enter_decl(&mut self, id: DeclId, decl: &Decl) {
        // Siblings re-enter from this frame.
        self.saved.push(self.current.clone());

        for (state, automaton) in self.current.iter_mut().zip(&self.automata) {
            let mut next = automaton.on_descend(state);
            for &annotation in decl.annotations.iter() {
                next = automaton.on_annotation(&next, annotation);
            }
            *state = next;
        }

        for (index, (state, automaton)) in self.current.iter().zip(&self.automata).enumerate() {
            if automaton.is_success(state) {
                self.matches.push((id, index));
            }
        }
    }

    fn leave_decl(&mut self, _id: DeclId, _decl: &Decl) {
        if let Some(frame) = self.saved.pop() {
            self.current = frame;
        }
    }
}
