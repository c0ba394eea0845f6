//! Integration tests for the predicate layer
//!
//! Builder surface, direct evaluation, meta-annotation resolution, and
//! canonicalization.
