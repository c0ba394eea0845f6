//! Human-readable rendering of compiled automata.
//!
//! Automata are opaque at the API surface; this formatter exists to see
//! what a predicate actually compiled to when a match result surprises
//! you.

use std::fmt::Write;

use insignia_foundation::Interner;

use crate::automaton::{Automaton, State, StateRepr};

/// Renders compiled automata with annotation names resolved.
pub struct AutomatonFormatter<'a> {
    interner: &'a Interner,
}

impl<'a> AutomatonFormatter<'a> {
    /// Creates a formatter resolving names through `interner`.
    #[must_use]
    pub fn new(interner: &'a Interner) -> Self {
        Self { interner }
    }

    /// Formats every arena node plus the entry state shape.
    ///
    /// Annotation ids the interner does not know render as `?`.
    #[must_use]
    pub fn format(&self, automaton: &Automaton) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "automaton ({} nodes)", automaton.node_count());

        for (index, node) in automaton.nodes.iter().enumerate() {
            let mut parts = Vec::new();
            if node.success {
                parts.push("success".to_string());
            }
            if let Some((annotation, target)) = node.annotation {
                parts.push(format!(
                    "@{} -> {target}",
                    self.interner.resolve(annotation).unwrap_or("?")
                ));
            }
            if let Some(target) = node.descend {
                parts.push(format!("descend -> {target}"));
            }
            if parts.is_empty() {
                parts.push("no transitions".to_string());
            }
            let _ = writeln!(out, "  node {index}: {}", parts.join(", "));
        }

        let _ = writeln!(out, "entry: {}", shape(&automaton.entry));
        out
    }
}

fn shape(state: &State) -> String {
    match &state.0 {
        StateRepr::Node(index) => format!("node {index}"),
        StateRepr::Or(a, b) => format!("or({}, {})", shape(a), shape(b)),
        StateRepr::And(a, b) => format!("and({}, {})", shape(a), shape(b)),
    }
}
