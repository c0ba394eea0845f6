//! Error types for the Insignia system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! There is no user-facing error surface in this subsystem: every variant
//! signals a defect in the compiler's own plugin-registration code, never
//! in the program being compiled.

use std::fmt;

use thiserror::Error;

/// The main error type for Insignia operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an empty annotation set error.
    #[must_use]
    pub fn empty_annotation_set(builder: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyAnnotationSet {
            builder: builder.into(),
        })
    }

    /// Creates an unresolved meta-annotation error.
    #[must_use]
    pub fn unresolved_meta(count: usize) -> Self {
        Self::new(ErrorKind::UnresolvedMeta { count })
    }

    /// Creates an unknown declaration error.
    #[must_use]
    pub fn unknown_declaration(index: u32) -> Self {
        Self::new(ErrorKind::UnknownDeclaration { index })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An empty annotation set was passed to a predicate builder.
    #[error("empty annotation set passed to `{builder}`")]
    EmptyAnnotationSet {
        /// The builder function that rejected the set.
        builder: String,
    },

    /// A meta-annotation leaf reached the canonicalizer without having
    /// been resolved first.
    #[error("unresolved meta-annotation leaf reached the canonicalizer ({count} meta-annotations)")]
    UnresolvedMeta {
        /// Number of meta-annotations on the offending leaf.
        count: usize,
    },

    /// A declaration id did not refer to any declaration in the tree.
    #[error("unknown declaration: index {index}")]
    UnknownDeclaration {
        /// The raw index that was looked up.
        index: u32,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The predicate or extension name being processed.
    pub source: Option<String>,
    /// Free-form notes accumulated on the way out.
    pub notes: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            notes: Vec::new(),
        }
    }

    /// Sets the source label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.notes.is_empty() {
            writeln!(f)?;
            for note in &self.notes {
                writeln!(f, "  note: {note}")?;
            }
        }
        Ok(())
    }
}
