//! Curriculum domain model.
//!
//! # Responsibility
//! - Define topic/content records shared by the drag session and sync layers.
//! - Map raw backend identifiers to prefix-tagged UI identifiers.
//!
//! # Invariants
//! - Identifiers are unique across the whole tree regardless of kind.
//! - A content item belongs to exactly one topic at any instant.

pub mod curriculum;
