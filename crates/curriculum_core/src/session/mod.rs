//! UI-session curriculum state.
//!
//! # Responsibility
//! - Own the local curriculum tree and its expanded-topic bookkeeping.
//! - Run the drag state machine that mutates the tree per gesture.
//!
//! # Invariants
//! - All tree mutation happens through `&mut` borrows on one owner.
//! - A content item removed from one topic is re-inserted into exactly one
//!   topic within the same call.

use crate::model::curriculum::{DragId, TopicKey};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod drag;
pub mod tree;

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Drag handle does not resolve to an item in the tree.
    UnknownItem(DragId),
    /// A drag is already active; end or cancel it first.
    DragInProgress(DragId),
    /// Topic key does not resolve to a topic in the tree.
    TopicNotFound(TopicKey),
    /// Fetched curriculum lists the same topic or content id twice.
    DuplicateId(DragId),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "drag item not found in curriculum: {id}"),
            Self::DragInProgress(id) => write!(f, "drag already in progress for {id}"),
            Self::TopicNotFound(key) => write!(f, "topic not found: {key}"),
            Self::DuplicateId(id) => write!(f, "duplicate id in fetched curriculum: {id}"),
        }
    }
}

impl Error for SessionError {}
