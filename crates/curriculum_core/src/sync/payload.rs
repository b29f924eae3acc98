//! Content-order payload sent after a drop.
//!
//! # Responsibility
//! - Flatten the local tree into `position -> topic -> position -> content`.
//! - Encode the payload as the form fields the order action expects.
//!
//! # Invariants
//! - Always carries the full order of saved topics, never a diff.
//! - Identifiers are sent without UI prefixes.
//! - Draft topics are not part of the order.

use crate::model::curriculum::{Topic, TopicKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Form field carrying the JSON-encoded sorting map.
pub const SORTING_FIELD: &str = "tutor_topics_lessons_sorting";
/// Form field naming the destination topic of a cross-topic move.
pub const PARENT_TOPIC_FIELD: &str = "content_parent[parent_topic_id]";
/// Form field naming the moved content of a cross-topic move.
pub const PARENT_CONTENT_FIELD: &str = "content_parent[content_id]";

/// Order of one topic and its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOrder {
    pub topic_id: String,
    pub lesson_ids: BTreeMap<usize, String>,
}

/// Explicit destination of a content item that changed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentParent {
    pub parent_topic_id: String,
    pub content_id: String,
}

/// Whole-curriculum order request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOrderPayload {
    pub sorting: BTreeMap<usize, TopicOrder>,
    pub content_parent: Option<ContentParent>,
}

impl ContentOrderPayload {
    /// Flattens topics in display order.
    pub fn from_topics(topics: &[Topic], content_parent: Option<ContentParent>) -> Self {
        let sorting = topics
            .iter()
            .filter_map(|topic| match &topic.key {
                TopicKey::Saved(raw) => Some((raw, topic)),
                TopicKey::Draft(_) => None,
            })
            .enumerate()
            .map(|(position, (raw, topic))| {
                let lesson_ids = topic
                    .contents
                    .iter()
                    .enumerate()
                    .map(|(index, content)| (index, content.id.raw().to_string()))
                    .collect();
                (
                    position,
                    TopicOrder {
                        topic_id: raw.clone(),
                        lesson_ids,
                    },
                )
            })
            .collect();

        Self {
            sorting,
            content_parent,
        }
    }

    /// Total number of content ids in the payload.
    pub fn content_count(&self) -> usize {
        self.sorting
            .values()
            .map(|topic| topic.lesson_ids.len())
            .sum()
    }

    /// Encodes the payload as form fields (without action/nonce).
    pub fn to_form_fields(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut fields = vec![(
            SORTING_FIELD.to_string(),
            serde_json::to_string(&self.sorting)?,
        )];
        if let Some(parent) = &self.content_parent {
            fields.push((
                PARENT_TOPIC_FIELD.to_string(),
                parent.parent_topic_id.clone(),
            ));
            fields.push((PARENT_CONTENT_FIELD.to_string(), parent.content_id.clone()));
        }
        Ok(fields)
    }
}
