//! Curriculum reordering engine for the course builder.
//! This crate is the single source of truth for curriculum tree invariants.

pub mod collision;
pub mod config;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod service;
pub mod session;
pub mod sync;

pub use collision::{
    detect_collisions, select_strategy, Collision, CollisionArgs, CollisionStrategy, Droppable,
    Point, Rect, StrategyKind,
};
pub use config::{BackendConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::curriculum::{
    Content, ContentKind, DragId, IdError, ServerContent, ServerTopic, Topic, TopicKey,
};
pub use ordering::move_to;
pub use service::curriculum_service::{CurriculumError, CurriculumService, Notice, NoticeSource};
pub use session::drag::{
    ActiveItem, ContentOrigin, DragSession, DragState, DropOutcome, DropReport,
};
pub use session::tree::CurriculumTree;
pub use session::SessionError;
pub use sync::backend::{AjaxBackend, BackendError, BackendResult, CurriculumBackend};
pub use sync::payload::{ContentOrderPayload, ContentParent, TopicOrder};
pub use sync::persister::{PersistOutcome, Persister};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
