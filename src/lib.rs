//! Insignia - Annotation-predicate matching for compiler plugins
//!
//! This crate re-exports all layers of the Insignia system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: insignia_engine     - Automata, shared scanning, registry
//! Layer 2: insignia_predicate  - Predicate DSL, resolution, canonical form
//! Layer 1: insignia_tree       - Declaration trees, walking, ancestors
//! Layer 0: insignia_foundation - Core types (AnnotationFqn, Error, InSet)
//! ```

pub use insignia_engine as engine;
pub use insignia_foundation as foundation;
pub use insignia_predicate as predicate;
pub use insignia_tree as tree;
