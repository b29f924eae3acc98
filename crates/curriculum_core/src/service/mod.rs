//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate session state and backend calls into builder-level APIs.
//! - Keep UI/host layers decoupled from transport details.

pub mod curriculum_service;
