//! Compiled predicate state machines.
//!
//! An [`Automaton`] is the executable form of a canonical predicate. Its
//! concrete nodes live in an arena owned by the automaton, are built once
//! by [`Automaton::compile`], and are never mutated afterwards; a
//! traversal carries a lightweight [`State`] value per path and
//! "transitions" by producing a new value. `Or`/`And` predicates compile
//! to thin composite states over their operands' states instead of a
//! materialized product machine.
//!
//! Two events drive a state: observing an annotation on the current
//! declaration, and descending into a child declaration. A state with no
//! transition for an event is simply retained, which is how `Any` and
//! fully descended `UnderAnnotated` states persist forever.

use std::sync::Arc;

use insignia_foundation::AnnotationFqn;
use insignia_predicate::SimplifiedPredicate;
use insignia_tree::{DeclId, DeclTree};

// =============================================================================
// States
// =============================================================================

/// Progress of one automaton at one position in the declaration tree.
///
/// Cheap to clone; composite states share their operand states via `Arc`.
/// A state is only meaningful to the automaton that produced it.
#[derive(Clone, Debug)]
pub struct State(pub(crate) StateRepr);

#[derive(Clone, Debug)]
pub(crate) enum StateRepr {
    /// A concrete node in the automaton's arena.
    Node(usize),
    /// Both operand states, tracked side by side.
    Or(Arc<State>, Arc<State>),
    And(Arc<State>, Arc<State>),
}

/// A concrete automaton node: a success flag plus outgoing transitions.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) success: bool,
    /// Fires when this annotation is observed on the current declaration.
    pub(crate) annotation: Option<(AnnotationFqn, usize)>,
    /// Fires when the traversal descends into a child declaration.
    pub(crate) descend: Option<usize>,
}

// =============================================================================
// The automaton
// =============================================================================

/// A compiled predicate, ready to be driven over a declaration tree.
#[derive(Debug)]
pub struct Automaton {
    pub(crate) nodes: Vec<Node>,
    pub(crate) entry: State,
    pub(crate) initial: State,
}

impl Automaton {
    /// Compiles a canonical predicate into a state machine.
    #[must_use]
    pub fn compile(predicate: &SimplifiedPredicate) -> Self {
        let mut nodes = Vec::new();
        let entry = build(predicate, &mut nodes);
        let mut automaton = Self {
            nodes,
            initial: entry.clone(),
            entry,
        };
        let initial = automaton.on_descend(&automaton.entry);
        automaton.initial = initial;
        automaton
    }

    /// The automaton that never reports success, for predicates that
    /// resolved to nothing matchable.
    #[must_use]
    pub fn never() -> Self {
        let nodes = vec![Node {
            success: false,
            annotation: None,
            descend: None,
        }];
        let entry = State(StateRepr::Node(0));
        Self {
            nodes,
            initial: entry.clone(),
            entry,
        }
    }

    /// The raw entry state, before the virtual-root descend.
    ///
    /// Visitor-driven walks seed each path with this state and perform a
    /// descend on entering every declaration, top-level ones included.
    #[must_use]
    pub fn entry_state(&self) -> State {
        self.entry.clone()
    }

    /// The entry state with the virtual-root descend already applied.
    ///
    /// This is the state in force just before the first declaration's own
    /// annotations are folded in. Ancestor-chain replays start here.
    #[must_use]
    pub fn initial_state(&self) -> State {
        self.initial.clone()
    }

    /// Number of concrete nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Does this state denote a match right now?
    #[must_use]
    pub fn is_success(&self, state: &State) -> bool {
        match &state.0 {
            StateRepr::Node(index) => self.nodes.get(*index).is_some_and(|node| node.success),
            StateRepr::Or(a, b) => self.is_success(a) || self.is_success(b),
            StateRepr::And(a, b) => self.is_success(a) && self.is_success(b),
        }
    }

    /// Applies an annotation observation, retaining `state` when no
    /// transition fires.
    #[must_use]
    pub fn on_annotation(&self, state: &State, annotation: AnnotationFqn) -> State {
        self.step_annotation(state, annotation)
            .unwrap_or_else(|| state.clone())
    }

    /// Applies a descend into a child declaration, retaining `state` when
    /// no transition fires.
    #[must_use]
    pub fn on_descend(&self, state: &State) -> State {
        self.step_descend(state).unwrap_or_else(|| state.clone())
    }

    /// Matches a single declaration by replaying its ancestor chain,
    /// without scanning the whole tree.
    ///
    /// A `decl` minted by a different tree matches nothing.
    #[must_use]
    pub fn matches(&self, tree: &DeclTree, decl: DeclId) -> bool {
        let Some(target) = tree.get(decl) else {
            return false;
        };

        let mut chain: Vec<DeclId> = tree.ancestors(decl).collect();
        chain.reverse();

        let mut state = self.initial_state();
        for ancestor in chain {
            if let Some(above) = tree.get(ancestor) {
                for &annotation in above.annotations.iter() {
                    state = self.on_annotation(&state, annotation);
                }
            }
            state = self.on_descend(&state);
        }
        for &annotation in target.annotations.iter() {
            state = self.on_annotation(&state, annotation);
        }
        self.is_success(&state)
    }

    /// `None` means no transition fired anywhere in the state.
    fn step_annotation(&self, state: &State, annotation: AnnotationFqn) -> Option<State> {
        match &state.0 {
            StateRepr::Node(index) => match self.nodes.get(*index)?.annotation {
                Some((key, target)) if key == annotation => Some(State(StateRepr::Node(target))),
                _ => None,
            },
            StateRepr::Or(a, b) => recombine(
                a,
                b,
                self.step_annotation(a, annotation),
                self.step_annotation(b, annotation),
                StateRepr::Or,
            ),
            StateRepr::And(a, b) => recombine(
                a,
                b,
                self.step_annotation(a, annotation),
                self.step_annotation(b, annotation),
                StateRepr::And,
            ),
        }
    }

    fn step_descend(&self, state: &State) -> Option<State> {
        match &state.0 {
            StateRepr::Node(index) => {
                let target = self.nodes.get(*index)?.descend?;
                Some(State(StateRepr::Node(target)))
            }
            StateRepr::Or(a, b) => recombine(
                a,
                b,
                self.step_descend(a),
                self.step_descend(b),
                StateRepr::Or,
            ),
            StateRepr::And(a, b) => recombine(
                a,
                b,
                self.step_descend(a),
                self.step_descend(b),
                StateRepr::And,
            ),
        }
    }
}

/// Rebuilds a composite from stepped sides, reusing the original state of
/// any side that did not transition. Both sides unmoved means the whole
/// composite reports no transition.
fn recombine(
    original_a: &Arc<State>,
    original_b: &Arc<State>,
    stepped_a: Option<State>,
    stepped_b: Option<State>,
    compose: fn(Arc<State>, Arc<State>) -> StateRepr,
) -> Option<State> {
    match (stepped_a, stepped_b) {
        (None, None) => None,
        (a, b) => {
            let left = a.map_or_else(|| Arc::clone(original_a), Arc::new);
            let right = b.map_or_else(|| Arc::clone(original_b), Arc::new);
            Some(State(compose(left, right)))
        }
    }
}

// =============================================================================
// Compilation
// =============================================================================

fn build(predicate: &SimplifiedPredicate, nodes: &mut Vec<Node>) -> State {
    match predicate {
        // A fixed point: success with no way out.
        SimplifiedPredicate::Any => {
            let index = nodes.len();
            nodes.push(Node {
                success: true,
                annotation: None,
                descend: None,
            });
            State(StateRepr::Node(index))
        }

        // Entry is `end`: the virtual-root descend moves it to `start`
        // before any annotations are folded. Descending from `end` resets
        // to `start`, so only the annotated declaration itself matches.
        SimplifiedPredicate::HasAnnotation(annotation) => {
            let start = nodes.len();
            let end = start + 1;
            nodes.push(Node {
                success: false,
                annotation: Some((*annotation, end)),
                descend: None,
            });
            nodes.push(Node {
                success: true,
                annotation: None,
                descend: Some(start),
            });
            State(StateRepr::Node(end))
        }

        // `start` waits at any depth for the annotation; `end` has no
        // transitions, so every transitive descendant stays matched.
        SimplifiedPredicate::UnderAnnotated(annotation) => {
            let start = nodes.len();
            let middle = start + 1;
            let end = start + 2;
            nodes.push(Node {
                success: false,
                annotation: Some((*annotation, middle)),
                descend: None,
            });
            nodes.push(Node {
                success: false,
                annotation: None,
                descend: Some(end),
            });
            nodes.push(Node {
                success: true,
                annotation: None,
                descend: None,
            });
            State(StateRepr::Node(start))
        }

        SimplifiedPredicate::Or(a, b) => {
            let left = build(a, nodes);
            let right = build(b, nodes);
            State(StateRepr::Or(Arc::new(left), Arc::new(right)))
        }

        SimplifiedPredicate::And(a, b) => {
            let left = build(a, nodes);
            let right = build(b, nodes);
            State(StateRepr::And(Arc::new(left), Arc::new(right)))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
