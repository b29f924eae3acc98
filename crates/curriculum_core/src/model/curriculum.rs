//! Topic/content records and prefix-tagged identifiers.
//!
//! # Responsibility
//! - Define the in-memory curriculum tree shape.
//! - Parse and render `topic-<id>` / `content-<id>` drag identifiers.
//! - Decode backend topic records into tree records.
//!
//! # Invariants
//! - `DragId` always carries a non-empty raw id.
//! - Draft topics have no server id and are never drag handles.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// UI prefix for saved topic identifiers.
pub const TOPIC_PREFIX: &str = "topic-";
/// UI prefix for content identifiers.
pub const CONTENT_PREFIX: &str = "content-";

static DRAG_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(topic|content)-(\S+)$").expect("valid drag id regex"));

/// Identifier parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Value carries neither the topic nor the content prefix.
    MissingPrefix(String),
    /// Backend record identifier is blank.
    EmptyServerId,
}

impl Display for IdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPrefix(value) => {
                write!(f, "identifier `{value}` is not a topic or content handle")
            }
            Self::EmptyServerId => write!(f, "server identifier must not be blank"),
        }
    }
}

impl Error for IdError {}

/// Prefix-tagged drag handle.
///
/// The raw part is the backend identifier; the variant encodes the prefix so
/// a drop target can be classified without looking it up in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DragId {
    Topic(String),
    Content(String),
}

impl DragId {
    /// Builds a topic handle from a backend id.
    pub fn topic(raw: impl Into<String>) -> Self {
        Self::Topic(raw.into())
    }

    /// Builds a content handle from a backend id.
    pub fn content(raw: impl Into<String>) -> Self {
        Self::Content(raw.into())
    }

    /// Parses a prefixed UI identifier.
    pub fn parse(value: &str) -> Result<Self, IdError> {
        let captures = DRAG_ID_RE
            .captures(value.trim())
            .ok_or_else(|| IdError::MissingPrefix(value.to_string()))?;
        let raw = captures[2].to_string();
        match &captures[1] {
            "topic" => Ok(Self::Topic(raw)),
            _ => Ok(Self::Content(raw)),
        }
    }

    /// Returns the backend identifier with the UI prefix stripped.
    pub fn raw(&self) -> &str {
        match self {
            Self::Topic(raw) | Self::Content(raw) => raw.as_str(),
        }
    }

    pub fn is_topic(&self) -> bool {
        matches!(self, Self::Topic(_))
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }
}

impl Display for DragId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic(raw) => write!(f, "{TOPIC_PREFIX}{raw}"),
            Self::Content(raw) => write!(f, "{CONTENT_PREFIX}{raw}"),
        }
    }
}

/// Topic identity inside the local tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TopicKey {
    /// Persisted topic, keyed by backend id.
    Saved(String),
    /// Client-only topic created by "add topic" and not yet saved.
    Draft(Uuid),
}

impl TopicKey {
    /// Returns the drag handle for saved topics; drafts are not draggable.
    pub fn drag_id(&self) -> Option<DragId> {
        match self {
            Self::Saved(raw) => Some(DragId::Topic(raw.clone())),
            Self::Draft(_) => None,
        }
    }

    /// Returns true when `id` is this topic's drag handle.
    pub fn matches(&self, id: &DragId) -> bool {
        match (self, id) {
            (Self::Saved(raw), DragId::Topic(other)) => raw == other,
            _ => false,
        }
    }
}

impl Display for TopicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Saved(raw) => write!(f, "{TOPIC_PREFIX}{raw}"),
            Self::Draft(uuid) => write!(f, "{uuid}"),
        }
    }
}

/// Kind of curriculum leaf item, serialized with backend `post_type` names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    #[default]
    #[serde(rename = "lesson")]
    Lesson,
    #[serde(rename = "tutor_quiz")]
    Quiz,
    #[serde(rename = "tutor_assignments")]
    Assignment,
    #[serde(rename = "tutor_zoom_meeting")]
    ZoomMeeting,
    #[serde(rename = "tutor-google-meet")]
    GoogleMeet,
    #[serde(rename = "tutor_h5p_quiz")]
    H5pQuiz,
    #[serde(untagged)]
    Other(String),
}

/// Curriculum leaf item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Always `DragId::Content`.
    pub id: DragId,
    pub title: String,
    pub kind: ContentKind,
}

impl Content {
    pub fn new(raw_id: impl Into<String>, title: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            id: DragId::content(raw_id),
            title: title.into(),
            kind,
        }
    }
}

/// Ordered container of content items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub key: TopicKey,
    pub title: String,
    pub summary: String,
    pub contents: Vec<Content>,
    /// Transient UI flag; never sent to the backend.
    pub is_collapsed: bool,
}

impl Topic {
    /// Creates a saved topic with no contents.
    pub fn saved(raw_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: TopicKey::Saved(raw_id.into()),
            title: title.into(),
            summary: String::new(),
            contents: Vec::new(),
            is_collapsed: false,
        }
    }

    /// Creates an empty, expanded, client-only topic.
    pub fn draft() -> Self {
        Self {
            key: TopicKey::Draft(Uuid::new_v4()),
            title: String::new(),
            summary: String::new(),
            contents: Vec::new(),
            is_collapsed: false,
        }
    }

    pub fn with_contents(mut self, contents: Vec<Content>) -> Self {
        self.contents = contents;
        self
    }

    pub fn collapsed(mut self, is_collapsed: bool) -> Self {
        self.is_collapsed = is_collapsed;
        self
    }

    /// Returns whether the backend knows this topic.
    pub fn is_saved(&self) -> bool {
        matches!(self.key, TopicKey::Saved(_))
    }

    /// Returns the index of one content item by handle.
    pub fn content_index(&self, id: &DragId) -> Option<usize> {
        self.contents.iter().position(|content| &content.id == id)
    }
}

/// Topic record as returned by the backend fetch action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerTopic {
    #[serde(deserialize_with = "deserialize_server_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub summary: String,
    #[serde(default)]
    pub contents: Vec<ServerContent>,
}

/// Content record as returned by the backend fetch action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerContent {
    #[serde(rename = "ID", deserialize_with = "deserialize_server_id")]
    pub id: String,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub post_type: ContentKind,
}

impl ServerTopic {
    /// Maps one backend topic into a tree topic with prefixed ids.
    pub fn into_topic(self, is_collapsed: bool) -> Topic {
        Topic {
            key: TopicKey::Saved(self.id),
            title: self.title,
            summary: self.summary,
            contents: self
                .contents
                .into_iter()
                .map(|content| Content::new(content.id, content.post_title, content.post_type))
                .collect(),
            is_collapsed,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawServerId {
    Number(u64),
    Text(String),
}

fn deserialize_server_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawServerId::deserialize(deserializer)? {
        RawServerId::Number(value) => value.to_string(),
        RawServerId::Text(value) => value.trim().to_string(),
    };
    if value.is_empty() {
        return Err(serde::de::Error::custom(IdError::EmptyServerId));
    }
    Ok(value)
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
