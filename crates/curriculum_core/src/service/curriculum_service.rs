//! Curriculum builder use-case service.
//!
//! # Responsibility
//! - Own one builder session: tree, drag state and order persistence.
//! - Hydrate from the backend and hand drop payloads to the persister.
//! - Turn backend failures into non-blocking notices.
//!
//! # Invariants
//! - Local tree changes are applied before persistence and never rolled
//!   back when persistence fails.
//! - Drag-over handling performs no I/O.

use crate::collision::{detect_collisions, Collision, CollisionArgs, Droppable, Point, Rect};
use crate::model::curriculum::{DragId, IdError, TopicKey};
use crate::session::drag::{ActiveItem, DragSession, DropOutcome};
use crate::session::tree::CurriculumTree;
use crate::session::SessionError;
use crate::sync::backend::{BackendError, CurriculumBackend};
use crate::sync::persister::{PersistOutcome, Persister};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Errors from curriculum service operations.
#[derive(Debug)]
pub enum CurriculumError {
    /// UI handle cannot be parsed.
    Id(IdError),
    /// Session rejected the operation.
    Session(SessionError),
    /// Backend round-trip failed.
    Backend(BackendError),
}

impl Display for CurriculumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CurriculumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Id(err) => Some(err),
            Self::Session(err) => Some(err),
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<IdError> for CurriculumError {
    fn from(value: IdError) -> Self {
        Self::Id(value)
    }
}

impl From<SessionError> for CurriculumError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<BackendError> for CurriculumError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

/// Which round-trip a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSource {
    Fetch,
    Persist,
}

/// Non-blocking user notification for a failed backend round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub source: NoticeSource,
    pub message: String,
}

/// One course builder session.
pub struct CurriculumService {
    course_id: String,
    backend: Arc<dyn CurriculumBackend>,
    tree: CurriculumTree,
    drag: DragSession,
    persister: Persister,
    notices: Vec<Notice>,
}

impl CurriculumService {
    /// Creates an empty session for one course.
    pub fn new(course_id: impl Into<String>, backend: Arc<dyn CurriculumBackend>) -> Self {
        let persister = Persister::spawn(Arc::clone(&backend));
        Self {
            course_id: course_id.into(),
            backend,
            tree: CurriculumTree::new(),
            drag: DragSession::new(),
            persister,
            notices: Vec::new(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn tree(&self) -> &CurriculumTree {
        &self.tree
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Fetches the course curriculum and merges it into local state.
    ///
    /// On failure local state is kept and a fetch notice is recorded.
    pub fn load(&mut self) -> Result<(), CurriculumError> {
        let result = self
            .backend
            .fetch_topics(&self.course_id)
            .map_err(CurriculumError::from)
            .and_then(|topics| self.tree.hydrate(topics).map_err(CurriculumError::from));
        match &result {
            Ok(()) => info!(
                "event=curriculum_load module=service status=ok course_id={} topics={}",
                self.course_id,
                self.tree.len()
            ),
            Err(err) => {
                warn!(
                    "event=curriculum_load module=service status=error course_id={} error={}",
                    self.course_id, err
                );
                self.notices.push(Notice {
                    source: NoticeSource::Fetch,
                    message: err.to_string(),
                });
            }
        }
        result
    }

    pub fn add_topic(&mut self) -> TopicKey {
        self.tree.add_topic()
    }

    pub fn delete_topic(&mut self, key: &TopicKey) -> Result<(), CurriculumError> {
        self.tree.delete_topic(key)?;
        Ok(())
    }

    pub fn toggle_collapse(&mut self, key: &TopicKey) -> Result<bool, CurriculumError> {
        Ok(self.tree.toggle_collapse(key)?)
    }

    pub fn set_all_collapsed(&mut self, is_collapsed: bool) {
        self.tree.set_all_collapsed(is_collapsed);
    }

    pub fn focus_topic(&mut self, key: &TopicKey) {
        self.tree.focus_topic(key);
    }

    pub fn promote_draft(
        &mut self,
        draft: Uuid,
        server_id: impl Into<String>,
    ) -> Result<TopicKey, CurriculumError> {
        Ok(self.tree.promote_draft(draft, server_id)?)
    }

    /// Starts dragging the item behind one UI handle.
    pub fn drag_start(&mut self, handle: &str) -> Result<(), CurriculumError> {
        let active = DragId::parse(handle)?;
        self.drag.drag_start(&self.tree, active)?;
        Ok(())
    }

    /// Hit-tests the current drag against registered drop targets.
    pub fn collisions(
        &self,
        active_rect: Rect,
        pointer: Option<Point>,
        candidates: &[Droppable],
    ) -> Vec<Collision> {
        let Some(active) = self.drag.active() else {
            return Vec::new();
        };
        let handle = active.to_string();
        detect_collisions(&CollisionArgs {
            active: &handle,
            active_rect,
            pointer,
            candidates,
        })
    }

    /// Live hover feedback; unparsable handles are ignored.
    pub fn drag_over(&mut self, handle: &str) -> bool {
        match DragId::parse(handle) {
            Ok(over) => self.drag.drag_over(&mut self.tree, &over),
            Err(_) => false,
        }
    }

    /// Finalizes the drag and queues persistence for accepted drops.
    ///
    /// `None` or an unparsable handle cancels the drag.
    pub fn drag_end(&mut self, handle: Option<&str>) -> DropOutcome {
        let over = handle.and_then(|value| DragId::parse(value).ok());
        let report = self.drag.drag_end(&mut self.tree, over.as_ref());
        if let Some(payload) = report.payload {
            self.persister.submit(payload);
        }
        report.outcome
    }

    /// Abandons the drag; hovered content returns to where it started.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel(&mut self.tree);
    }

    pub fn active_item(&self) -> Option<ActiveItem> {
        self.drag.active_item(&self.tree)
    }

    /// Collects finished deliveries; failures become persist notices.
    pub fn poll_persistence(&mut self) -> Vec<PersistOutcome> {
        let outcomes = self.persister.drain();
        self.record_failures(&outcomes);
        outcomes
    }

    /// Blocks up to `timeout` for the next delivery result.
    pub fn wait_persistence(&mut self, timeout: std::time::Duration) -> Option<PersistOutcome> {
        let outcome = self.persister.wait(timeout)?;
        self.record_failures(std::slice::from_ref(&outcome));
        Some(outcome)
    }

    /// Returns and clears pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn record_failures(&mut self, outcomes: &[PersistOutcome]) {
        for outcome in outcomes {
            if let Err(err) = &outcome.result {
                self.notices.push(Notice {
                    source: NoticeSource::Persist,
                    message: err.to_string(),
                });
            }
        }
    }
}
