//! Drag session state machine.
//!
//! # Responsibility
//! - Track the dragged item between drag start and drop.
//! - Apply live cross-topic moves on drag-over and final placement on drop.
//! - Produce the order payload for every drop that should be persisted.
//!
//! # Invariants
//! - `Idle -> Dragging -> Idle`; every drop or cancel returns to `Idle`.
//! - Drag-over never triggers persistence; only drops do.
//! - Collapsed topics never receive content.
//! - A cancelled or rejected drop puts hovered content back where the drag
//!   began, leaving the tree as it was at drag start.
//! - Every content id present before a transition is present exactly once
//!   after it.

use super::tree::CurriculumTree;
use super::SessionError;
use crate::model::curriculum::{ContentKind, DragId, Topic, TopicKey};
use crate::sync::payload::{ContentOrderPayload, ContentParent};
use log::{debug, info};

/// Current drag state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: DragId,
        /// Position of the dragged content when the drag began.
        origin: Option<ContentOrigin>,
    },
}

/// Where a dragged content item sat at drag start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOrigin {
    pub topic: TopicKey,
    pub index: usize,
}

/// Result of one drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released over no target.
    Cancelled,
    /// Target refused the item (collapsed or unknown); nothing persisted.
    Rejected,
    /// Valid target but the drop itself moved nothing. Drag-over may still
    /// have changed the tree, so the order is persisted.
    Unchanged,
    TopicsReordered {
        from: usize,
        to: usize,
    },
    ContentReordered {
        topic: TopicKey,
        from: usize,
        to: usize,
    },
    ContentTransferred {
        content: DragId,
        from_topic: TopicKey,
        to_topic: TopicKey,
    },
}

impl DropOutcome {
    pub fn should_persist(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::Rejected)
    }
}

/// Drop result handed to the sync layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropReport {
    pub outcome: DropOutcome,
    /// Present iff `outcome.should_persist()`.
    pub payload: Option<ContentOrderPayload>,
}

/// Summary of the dragged item for the drag overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveItem {
    pub id: DragId,
    pub title: String,
    /// `None` for topics.
    pub kind: Option<ContentKind>,
}

/// Drag state machine over one curriculum tree.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active(&self) -> Option<&DragId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { active, .. } => Some(active),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Captures the dragged item. Does not touch the tree.
    pub fn drag_start(&mut self, tree: &CurriculumTree, active: DragId) -> Result<(), SessionError> {
        if let DragState::Dragging { active, .. } = &self.state {
            return Err(SessionError::DragInProgress(active.clone()));
        }
        if !tree.contains(&active) {
            return Err(SessionError::UnknownItem(active));
        }

        let origin = tree.topic_index_of_content(&active).and_then(|index| {
            let topic = tree.topic_at(index);
            topic.content_index(&active).map(|position| ContentOrigin {
                topic: topic.key.clone(),
                index: position,
            })
        });
        debug!("event=drag_start module=session status=ok active={active}");
        self.state = DragState::Dragging { active, origin };
        Ok(())
    }

    /// Applies live cross-topic feedback while hovering `over`.
    ///
    /// Returns whether the tree changed.
    pub fn drag_over(&mut self, tree: &mut CurriculumTree, over: &DragId) -> bool {
        let Some(active) = self.active().cloned() else {
            return false;
        };
        if !active.is_content() {
            return false;
        }
        let Some(source) = tree.topic_index_of_content(&active) else {
            return false;
        };

        let (destination, insert_at) = match over {
            DragId::Content(_) => {
                let Some(destination) = tree.topic_index_of_content(over) else {
                    return false;
                };
                (destination, tree.topic_at(destination).content_index(over))
            }
            DragId::Topic(_) => {
                let Some(destination) = tree.topic_index(over) else {
                    return false;
                };
                if !tree.topic_at(destination).contents.is_empty() {
                    return false;
                }
                (destination, None)
            }
        };

        if source == destination || tree.topic_at(destination).is_collapsed {
            return false;
        }

        let Some(content_index) = tree.topic_at(source).content_index(&active) else {
            return false;
        };
        tree.transfer_content(source, content_index, destination, insert_at);
        debug!(
            "event=drag_over_transfer module=session status=ok active={active} over={over}"
        );
        true
    }

    /// Abandons the drag and undoes any drag-over moves.
    pub fn cancel(&mut self, tree: &mut CurriculumTree) {
        if let DragState::Dragging { active, origin } = std::mem::take(&mut self.state) {
            revert_hover(tree, &active, origin.as_ref());
            debug!("event=drag_cancel module=session status=ok active={active}");
        }
    }

    /// Finalizes placement and returns to `Idle`.
    ///
    /// `over = None` behaves as cancel.
    pub fn drag_end(&mut self, tree: &mut CurriculumTree, over: Option<&DragId>) -> DropReport {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { active, origin } = state else {
            return DropReport {
                outcome: DropOutcome::Cancelled,
                payload: None,
            };
        };
        let Some(over) = over else {
            revert_hover(tree, &active, origin.as_ref());
            debug!("event=drag_end module=session status=cancelled active={active}");
            return DropReport {
                outcome: DropOutcome::Cancelled,
                payload: None,
            };
        };

        let outcome = match (&active, over) {
            (DragId::Topic(_), DragId::Topic(_)) => drop_topic_on_topic(tree, &active, over),
            (DragId::Content(_), DragId::Content(_)) => {
                drop_content_on_content(tree, &active, over)
            }
            (DragId::Content(_), DragId::Topic(_)) => drop_content_on_topic(tree, &active, over),
            (DragId::Topic(_), DragId::Content(_)) => DropOutcome::Unchanged,
        };

        if !outcome.should_persist() {
            revert_hover(tree, &active, origin.as_ref());
            debug!("event=drag_end module=session status=rejected active={active} over={over}");
            return DropReport {
                outcome,
                payload: None,
            };
        }

        let origin_topic = origin.as_ref().map(|origin| &origin.topic);
        let content_parent = moved_content_parent(tree, &active, origin_topic);
        let payload = ContentOrderPayload::from_topics(tree.topics(), content_parent);
        info!(
            "event=drag_end module=session status=ok active={active} over={over} topics={} contents={}",
            payload.sorting.len(),
            payload.content_count()
        );
        DropReport {
            outcome,
            payload: Some(payload),
        }
    }

    /// Title and kind of the dragged item, for the drag overlay.
    pub fn active_item(&self, tree: &CurriculumTree) -> Option<ActiveItem> {
        let active = self.active()?;
        match active {
            DragId::Topic(_) => tree.topic_index(active).map(|index| ActiveItem {
                id: active.clone(),
                title: tree.topic_at(index).title.clone(),
                kind: None,
            }),
            DragId::Content(_) => tree.find_content(active).map(|content| ActiveItem {
                id: active.clone(),
                title: content.title.clone(),
                kind: Some(content.kind.clone()),
            }),
        }
    }

    /// Collapsed flag a topic should render with right now.
    ///
    /// Every saved topic renders collapsed while a topic is dragged; drafts
    /// always render expanded.
    pub fn display_collapsed(&self, topic: &Topic) -> bool {
        if !topic.is_saved() {
            return false;
        }
        if self.active().is_some_and(DragId::is_topic) {
            return true;
        }
        topic.is_collapsed
    }

    /// Topic sorting is off while content is dragged, or while the only
    /// topic is dragged.
    pub fn is_topic_sorting_disabled(&self, tree: &CurriculumTree) -> bool {
        match self.active() {
            None => false,
            Some(DragId::Content(_)) => true,
            Some(DragId::Topic(_)) => tree.len() == 1,
        }
    }
}

fn drop_topic_on_topic(tree: &mut CurriculumTree, active: &DragId, over: &DragId) -> DropOutcome {
    if active == over {
        return DropOutcome::Unchanged;
    }
    let (Some(from), Some(to)) = (tree.topic_index(active), tree.topic_index(over)) else {
        return DropOutcome::Rejected;
    };
    tree.reorder_topics(from, to);
    DropOutcome::TopicsReordered { from, to }
}

fn drop_content_on_content(
    tree: &mut CurriculumTree,
    active: &DragId,
    over: &DragId,
) -> DropOutcome {
    let (Some(source), Some(destination)) = (
        tree.topic_index_of_content(active),
        tree.topic_index_of_content(over),
    ) else {
        return DropOutcome::Rejected;
    };
    if tree.topic_at(destination).is_collapsed {
        return DropOutcome::Rejected;
    }

    let (Some(from), Some(to)) = (
        tree.topic_at(source).content_index(active),
        tree.topic_at(destination).content_index(over),
    ) else {
        return DropOutcome::Rejected;
    };

    if source == destination {
        if from == to {
            return DropOutcome::Unchanged;
        }
        tree.reorder_contents(source, from, to);
        return DropOutcome::ContentReordered {
            topic: tree.topic_at(source).key.clone(),
            from,
            to,
        };
    }

    let from_topic = tree.topic_at(source).key.clone();
    let to_topic = tree.topic_at(destination).key.clone();
    tree.transfer_content(source, from, destination, Some(to));
    DropOutcome::ContentTransferred {
        content: active.clone(),
        from_topic,
        to_topic,
    }
}

fn drop_content_on_topic(tree: &mut CurriculumTree, active: &DragId, over: &DragId) -> DropOutcome {
    let (Some(source), Some(destination)) =
        (tree.topic_index_of_content(active), tree.topic_index(over))
    else {
        return DropOutcome::Rejected;
    };
    let target = tree.topic_at(destination);
    if target.is_collapsed {
        return DropOutcome::Rejected;
    }
    if source == destination || !target.contents.is_empty() {
        return DropOutcome::Unchanged;
    }

    let Some(from) = tree.topic_at(source).content_index(active) else {
        return DropOutcome::Rejected;
    };
    let from_topic = tree.topic_at(source).key.clone();
    let to_topic = tree.topic_at(destination).key.clone();
    tree.transfer_content(source, from, destination, None);
    DropOutcome::ContentTransferred {
        content: active.clone(),
        from_topic,
        to_topic,
    }
}

/// Puts dragged content back at its drag-start position.
fn revert_hover(tree: &mut CurriculumTree, active: &DragId, origin: Option<&ContentOrigin>) {
    if let Some(origin) = origin {
        if tree.restore_content(active, &origin.topic, origin.index) {
            debug!("event=drag_revert module=session status=ok active={active}");
        }
    }
}

/// Parent relation for a content item that ended in a different topic than
/// the one it was dragged from, including moves made during drag-over.
fn moved_content_parent(
    tree: &CurriculumTree,
    active: &DragId,
    origin_topic: Option<&TopicKey>,
) -> Option<ContentParent> {
    let current = tree.topic_at(tree.topic_index_of_content(active)?);
    if Some(&current.key) == origin_topic {
        return None;
    }
    match &current.key {
        TopicKey::Saved(raw) => Some(ContentParent {
            parent_topic_id: raw.clone(),
            content_id: active.raw().to_string(),
        }),
        TopicKey::Draft(_) => None,
    }
}
