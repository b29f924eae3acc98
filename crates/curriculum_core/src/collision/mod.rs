//! Drop-target hit testing.
//!
//! # Responsibility
//! - Provide geometric collision strategies over droppable rectangles.
//! - Choose one strategy per drag event from the dragged kind and the
//!   candidate kinds.
//!
//! # Invariants
//! - Strategy selection is pure: same inputs, same strategy.
//! - Results are ordered best match first.
//! - No candidates means no collisions.

mod geometry;
mod strategy;

pub use geometry::{Point, Rect};
pub use strategy::{
    detect_collisions, select_strategy, ClosestCenter, Collision, CollisionArgs,
    CollisionStrategy, Droppable, DragKind, PointerWithin, RectIntersection, StrategyKind,
};
