//! Per-compilation predicate registration and shared matching.
//!
//! Extensions register their predicates by name at plugin-setup time and
//! get back an opaque [`PredicateKey`]. Once annotation discovery has
//! produced the meta-annotation mapping, the registry resolves,
//! canonicalizes, and compiles everything exactly once; the resulting
//! [`CompiledPredicates`] answers membership queries for all registered
//! predicates from a single tree walk.

use std::fmt;

use insignia_foundation::{AnnotationFqn, ErrorContext, InMap, InSet, InVec, Result};
use insignia_predicate::{
    Predicate, ResolvedPredicate, ResolvedUserDefinedAnnotations, resolve, simplify,
};
use insignia_tree::{DeclId, DeclTree, walk_tree};

use crate::automaton::Automaton;
use crate::scan::Scanner;

// =============================================================================
// Keys
// =============================================================================

/// Opaque handle to a registered predicate.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct PredicateKey(pub(crate) u32);

impl PredicateKey {
    /// Returns the raw index of this key.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PredicateKey({})", self.0)
    }
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug)]
struct RegisteredPredicate {
    key: PredicateKey,
    name: String,
    predicate: Predicate,
}

/// The predicates registered for one compilation run.
///
/// Owned by the compilation context, not ambient state: two concurrent
/// compilations each carry their own registry.
#[derive(Debug, Default)]
pub struct PredicateRegistry {
    entries: Vec<RegisteredPredicate>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate under a diagnostic name, returning its key.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` predicates are registered.
    pub fn register(&mut self, name: impl Into<String>, predicate: Predicate) -> PredicateKey {
        let key = PredicateKey(
            u32::try_from(self.entries.len()).expect("too many registered predicates"),
        );
        self.entries.push(RegisteredPredicate {
            key,
            name: name.into(),
            predicate,
        });
        key
    }

    /// Number of registered predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over registrations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (PredicateKey, &str, &Predicate)> {
        self.entries
            .iter()
            .map(|entry| (entry.key, entry.name.as_str(), &entry.predicate))
    }

    /// Union of the concrete annotation identifiers every registered
    /// predicate tests. Annotation discovery collects exactly these.
    #[must_use]
    pub fn annotations(&self) -> InSet<AnnotationFqn> {
        self.entries
            .iter()
            .fold(InSet::new(), |acc, entry| {
                acc.union(entry.predicate.annotations())
            })
    }

    /// Union of the meta-annotation identifiers every registered
    /// predicate tests.
    #[must_use]
    pub fn meta_annotations(&self) -> InSet<AnnotationFqn> {
        self.entries
            .iter()
            .fold(InSet::new(), |acc, entry| {
                acc.union(entry.predicate.meta_annotations())
            })
    }

    /// Resolves, canonicalizes, and compiles every registered predicate
    /// against the discovered meta-annotation mapping.
    ///
    /// Predicates whose meta-annotations map to nothing compile to an
    /// automaton that never matches.
    ///
    /// # Errors
    ///
    /// Returns any canonicalization error, tagged with the offending
    /// predicate's registered name.
    pub fn compile(&self, map: &ResolvedUserDefinedAnnotations) -> Result<CompiledPredicates> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for registered in &self.entries {
            let automaton = match resolve(&registered.predicate, map) {
                ResolvedPredicate::Never => Automaton::never(),
                ResolvedPredicate::Concrete(concrete) => {
                    let simplified = simplify(&concrete).map_err(|err| {
                        err.with_context(
                            ErrorContext::new().with_source(registered.name.clone()),
                        )
                    })?;
                    Automaton::compile(&simplified)
                }
            };
            entries.push(CompiledEntry {
                key: registered.key,
                name: registered.name.clone(),
                matches_all: registered.predicate.matches_all(),
                automaton,
            });
        }
        Ok(CompiledPredicates { entries })
    }
}

// =============================================================================
// Compiled predicates
// =============================================================================

#[derive(Debug)]
struct CompiledEntry {
    key: PredicateKey,
    name: String,
    matches_all: bool,
    automaton: Automaton,
}

/// Every registered predicate compiled for one compilation run.
#[derive(Debug)]
pub struct CompiledPredicates {
    entries: Vec<CompiledEntry>,
}

impl CompiledPredicates {
    /// Number of compiled predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = PredicateKey> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// The diagnostic name a key was registered under.
    #[must_use]
    pub fn name(&self, key: PredicateKey) -> Option<&str> {
        self.entry(key).map(|entry| entry.name.as_str())
    }

    /// The compiled automaton for a key.
    #[must_use]
    pub fn automaton(&self, key: PredicateKey) -> Option<&Automaton> {
        self.entry(key).map(|entry| &entry.automaton)
    }

    /// True if the predicate is statically known to match every
    /// declaration, letting callers skip matching entirely.
    #[must_use]
    pub fn matches_all(&self, key: PredicateKey) -> bool {
        self.entry(key).is_some_and(|entry| entry.matches_all)
    }

    /// Drives all automata over the tree in a single walk, indexing every
    /// match.
    #[must_use]
    pub fn scan(&self, tree: &DeclTree) -> MatchIndex {
        let automata: Vec<&Automaton> =
            self.entries.iter().map(|entry| &entry.automaton).collect();
        let mut scanner = Scanner::new(automata);
        walk_tree(&mut scanner, tree);

        let mut by_declaration: InMap<DeclId, InSet<PredicateKey>> = InMap::new();
        let mut by_predicate: InMap<PredicateKey, InVec<DeclId>> = InMap::new();
        for (decl, index) in scanner.into_matches() {
            let Some(entry) = self.entries.get(index) else {
                continue;
            };
            let keys = by_declaration.get(&decl).cloned().unwrap_or_default();
            by_declaration = by_declaration.insert(decl, keys.insert(entry.key));
            let decls = by_predicate.get(&entry.key).cloned().unwrap_or_default();
            by_predicate = by_predicate.insert(entry.key, decls.push_back(decl));
        }
        MatchIndex {
            by_declaration,
            by_predicate,
        }
    }

    /// Matches one declaration against one predicate by replaying its
    /// ancestor chain, without a full scan.
    #[must_use]
    pub fn matches(&self, tree: &DeclTree, decl: DeclId, key: PredicateKey) -> bool {
        self.entry(key).is_some_and(|entry| {
            if entry.matches_all {
                tree.get(decl).is_some()
            } else {
                entry.automaton.matches(tree, decl)
            }
        })
    }

    fn entry(&self, key: PredicateKey) -> Option<&CompiledEntry> {
        self.entries.get(key.0 as usize)
    }
}

// =============================================================================
// Match index
// =============================================================================

/// Immutable result of a shared scan.
///
/// Cloning is O(1); the index is meant to be computed once per
/// compilation and shared read-only.
#[derive(Clone, Debug)]
pub struct MatchIndex {
    by_declaration: InMap<DeclId, InSet<PredicateKey>>,
    by_predicate: InMap<PredicateKey, InVec<DeclId>>,
}

impl MatchIndex {
    /// The keys of every predicate a declaration matched.
    #[must_use]
    pub fn keys_for(&self, decl: DeclId) -> InSet<PredicateKey> {
        self.by_declaration
            .get(&decl)
            .cloned()
            .unwrap_or_default()
    }

    /// The declarations a predicate matched, in depth-first visit order.
    #[must_use]
    pub fn declarations_for(&self, key: PredicateKey) -> InVec<DeclId> {
        self.by_predicate.get(&key).cloned().unwrap_or_default()
    }

    /// Did this declaration match this predicate?
    #[must_use]
    pub fn matches(&self, decl: DeclId, key: PredicateKey) -> bool {
        self.by_declaration
            .get(&decl)
            .is_some_and(|keys| keys.contains(&key))
    }
}

// =============================================================================
// Tests
// =============================================================================
