//! Integration tests for the declaration tree layer
//!
//! Arena construction, containment queries, and depth-first walking.
