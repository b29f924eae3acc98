//! Local curriculum tree with expand/collapse bookkeeping.
//!
//! # Responsibility
//! - Hold topics in display order and the user's expanded-topic set.
//! - Merge fetched backend topics without losing local UI state.
//! - Provide the splice/reorder primitives used by the drag session.
//!
//! # Invariants
//! - The expanded set is tracked apart from fetched data, so a refetch
//!   never collapses a topic the user opened.
//! - Draft topics survive hydration and are never collapsed by bulk toggles.

use super::SessionError;
use crate::model::curriculum::{Content, DragId, ServerTopic, Topic, TopicKey};
use crate::ordering::move_to;
use log::debug;
use std::collections::BTreeSet;
use uuid::Uuid;

/// In-memory curriculum tree owned by one builder session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurriculumTree {
    topics: Vec<Topic>,
    expanded: BTreeSet<TopicKey>,
}

impl CurriculumTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from ready topics; expanded saved topics seed the
    /// expanded set.
    pub fn from_topics(topics: Vec<Topic>) -> Self {
        let expanded = topics
            .iter()
            .filter(|topic| topic.is_saved() && !topic.is_collapsed)
            .map(|topic| topic.key.clone())
            .collect();
        Self { topics, expanded }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn topic(&self, key: &TopicKey) -> Option<&Topic> {
        self.topics.iter().find(|topic| &topic.key == key)
    }

    /// Returns topic keys the user currently keeps open.
    pub fn expanded(&self) -> &BTreeSet<TopicKey> {
        &self.expanded
    }

    pub fn has_saved_topics(&self) -> bool {
        self.topics.iter().any(Topic::is_saved)
    }

    /// Index of the saved topic named by a `DragId::Topic` handle.
    pub fn topic_index(&self, id: &DragId) -> Option<usize> {
        self.topics.iter().position(|topic| topic.key.matches(id))
    }

    /// Index of the topic currently holding one content handle.
    pub fn topic_index_of_content(&self, id: &DragId) -> Option<usize> {
        if !id.is_content() {
            return None;
        }
        self.topics
            .iter()
            .position(|topic| topic.content_index(id).is_some())
    }

    pub fn find_content(&self, id: &DragId) -> Option<&Content> {
        self.topics
            .iter()
            .flat_map(|topic| topic.contents.iter())
            .find(|content| &content.id == id)
    }

    /// Returns whether a handle resolves to a topic or content in the tree.
    pub fn contains(&self, id: &DragId) -> bool {
        match id {
            DragId::Topic(_) => self.topic_index(id).is_some(),
            DragId::Content(_) => self.topic_index_of_content(id).is_some(),
        }
    }

    /// All content handles in display order.
    pub fn content_ids(&self) -> Vec<DragId> {
        self.topics
            .iter()
            .flat_map(|topic| topic.contents.iter().map(|content| content.id.clone()))
            .collect()
    }

    /// Merges freshly fetched backend topics into local state.
    ///
    /// Saved topics are replaced in backend order. When the tree held no
    /// topics only the first fetched topic opens; otherwise a topic opens
    /// iff it is in the expanded set. Drafts are kept after saved topics.
    /// An empty fetch leaves local state untouched, and so does a fetch
    /// that repeats a topic or content id.
    pub fn hydrate(&mut self, server_topics: Vec<ServerTopic>) -> Result<(), SessionError> {
        if server_topics.is_empty() {
            return Ok(());
        }
        ensure_unique_ids(&server_topics)?;

        let had_topics = !self.topics.is_empty();
        let drafts = self
            .topics
            .drain(..)
            .filter(|topic| !topic.is_saved())
            .collect::<Vec<_>>();

        let mut next = Vec::with_capacity(server_topics.len() + drafts.len());
        for (index, server_topic) in server_topics.into_iter().enumerate() {
            let key = TopicKey::Saved(server_topic.id.clone());
            let is_first = index == 0;
            let is_collapsed = if had_topics {
                !self.expanded.contains(&key)
            } else {
                !is_first
            };
            if is_first && !had_topics {
                self.expanded = BTreeSet::from([key]);
            }
            next.push(server_topic.into_topic(is_collapsed));
        }

        let draft_count = drafts.len();
        next.extend(drafts);
        self.topics = next;
        debug!(
            "event=curriculum_hydrate module=session status=ok topics={} drafts={} expanded={}",
            self.topics.len(),
            draft_count,
            self.expanded.len()
        );
        Ok(())
    }

    /// Appends an expanded draft topic and returns its key.
    ///
    /// On a non-empty tree every existing topic collapses and the expanded
    /// set is cleared so the new draft has focus.
    pub fn add_topic(&mut self) -> TopicKey {
        let draft = Topic::draft();
        let key = draft.key.clone();
        if !self.topics.is_empty() {
            for topic in &mut self.topics {
                topic.is_collapsed = true;
            }
            self.expanded.clear();
        }
        self.topics.push(draft);
        key
    }

    /// Removes one topic with all its contents.
    pub fn delete_topic(&mut self, key: &TopicKey) -> Result<Topic, SessionError> {
        let index = self
            .topics
            .iter()
            .position(|topic| &topic.key == key)
            .ok_or_else(|| SessionError::TopicNotFound(key.clone()))?;
        self.expanded.remove(key);
        Ok(self.topics.remove(index))
    }

    /// Flips one topic's collapsed flag and returns the new value.
    pub fn toggle_collapse(&mut self, key: &TopicKey) -> Result<bool, SessionError> {
        let topic = self
            .topics
            .iter_mut()
            .find(|topic| &topic.key == key)
            .ok_or_else(|| SessionError::TopicNotFound(key.clone()))?;
        topic.is_collapsed = !topic.is_collapsed;

        if !self.expanded.remove(key) {
            self.expanded.insert(key.clone());
        }
        Ok(topic.is_collapsed)
    }

    /// Collapses or expands every saved topic; drafts are left alone.
    pub fn set_all_collapsed(&mut self, is_collapsed: bool) {
        self.expanded.clear();
        for topic in self.topics.iter_mut().filter(|topic| topic.is_saved()) {
            topic.is_collapsed = is_collapsed;
            if !is_collapsed {
                self.expanded.insert(topic.key.clone());
            }
        }
    }

    /// Makes one topic the sole member of the expanded set (after copy/edit).
    pub fn focus_topic(&mut self, key: &TopicKey) {
        self.expanded = BTreeSet::from([key.clone()]);
    }

    /// Gives a saved draft its backend id.
    pub fn promote_draft(
        &mut self,
        draft: Uuid,
        server_id: impl Into<String>,
    ) -> Result<TopicKey, SessionError> {
        let draft_key = TopicKey::Draft(draft);
        let topic = self
            .topics
            .iter_mut()
            .find(|topic| topic.key == draft_key)
            .ok_or(SessionError::TopicNotFound(draft_key))?;

        topic.key = TopicKey::Saved(server_id.into());
        let key = topic.key.clone();
        if !topic.is_collapsed {
            self.expanded.insert(key.clone());
        }
        Ok(key)
    }

    pub(crate) fn topic_at(&self, index: usize) -> &Topic {
        &self.topics[index]
    }

    pub(crate) fn reorder_topics(&mut self, from: usize, to: usize) {
        self.topics = move_to(&self.topics, from as isize, to as isize);
    }

    pub(crate) fn reorder_contents(&mut self, topic: usize, from: usize, to: usize) {
        let contents = move_to(&self.topics[topic].contents, from as isize, to as isize);
        self.topics[topic].contents = contents;
    }

    /// Moves one content item between topics; `insert_at = None` appends.
    pub(crate) fn transfer_content(
        &mut self,
        from_topic: usize,
        content_index: usize,
        to_topic: usize,
        insert_at: Option<usize>,
    ) {
        let content = self.topics[from_topic].contents.remove(content_index);
        let destination = &mut self.topics[to_topic].contents;
        let index = insert_at
            .unwrap_or(destination.len())
            .min(destination.len());
        destination.insert(index, content);
    }

    /// Moves content `id` back to `index` within topic `key`.
    ///
    /// Returns whether the tree changed.
    pub(crate) fn restore_content(&mut self, id: &DragId, key: &TopicKey, index: usize) -> bool {
        let Some(current_topic) = self.topic_index_of_content(id) else {
            return false;
        };
        let Some(target_topic) = self.topics.iter().position(|topic| &topic.key == key) else {
            return false;
        };
        let Some(current_index) = self.topics[current_topic].content_index(id) else {
            return false;
        };
        if current_topic == target_topic && current_index == index {
            return false;
        }
        self.transfer_content(current_topic, current_index, target_topic, Some(index));
        true
    }
}

fn ensure_unique_ids(server_topics: &[ServerTopic]) -> Result<(), SessionError> {
    let mut seen = BTreeSet::new();
    for topic in server_topics {
        let ids = std::iter::once(DragId::topic(topic.id.as_str())).chain(
            topic
                .contents
                .iter()
                .map(|content| DragId::content(content.id.as_str())),
        );
        for id in ids {
            if seen.contains(&id) {
                return Err(SessionError::DuplicateId(id));
            }
            seen.insert(id);
        }
    }
    Ok(())
}
