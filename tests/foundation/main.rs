//! Integration tests for the foundation layer
//!
//! Persistent collections, annotation interning, and error reporting.

mod interning;
