//! Backend synchronization.
//!
//! # Responsibility
//! - Define the backend contract for fetching and ordering curriculum.
//! - Encode order payloads and deliver them off the drag-handling path.
//!
//! # Invariants
//! - Persistence is fire-and-forget: failures never roll back local state.
//! - No automatic retry.

pub mod backend;
pub mod payload;
pub mod persister;
