//! Collision strategies and per-event strategy selection.

use super::geometry::{Point, Rect};
use crate::model::curriculum::DragId;

/// What a UI handle refers to, decided by its prefix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Topic,
    Content,
    /// Handle from outside the curriculum tree.
    Unknown,
}

impl DragKind {
    pub fn classify(handle: &str) -> Self {
        match DragId::parse(handle) {
            Ok(DragId::Topic(_)) => Self::Topic,
            Ok(DragId::Content(_)) => Self::Content,
            Err(_) => Self::Unknown,
        }
    }
}

/// One registered drop target.
#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    /// Prefixed UI handle (`topic-12`, `content-34`, ...).
    pub id: String,
    pub rect: Rect,
}

impl Droppable {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }
}

/// Input of one hit-testing pass.
#[derive(Debug, Clone, Copy)]
pub struct CollisionArgs<'a> {
    pub active: &'a str,
    /// Current rectangle of the dragged element.
    pub active_rect: Rect,
    pub pointer: Option<Point>,
    pub candidates: &'a [Droppable],
}

/// One hit, ranked by `value` (lower is better for distances, higher for
/// ratios; strategies already return them best first).
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub id: String,
    pub value: f64,
}

/// Geometric hit-testing strategy.
pub trait CollisionStrategy {
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision>;
}

/// Nearest center-to-center distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestCenter;

impl CollisionStrategy for ClosestCenter {
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        let center = args.active_rect.center();
        let mut hits = args
            .candidates
            .iter()
            .map(|candidate| Collision {
                id: candidate.id.clone(),
                value: center.distance(&candidate.rect.center()),
            })
            .collect::<Vec<_>>();
        hits.sort_by(|a, b| a.value.total_cmp(&b.value));
        hits
    }
}

/// Candidates whose bounds contain the pointer, nearest center first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerWithin;

impl CollisionStrategy for PointerWithin {
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        let Some(pointer) = args.pointer else {
            return Vec::new();
        };
        let mut hits = args
            .candidates
            .iter()
            .filter(|candidate| candidate.rect.contains(pointer))
            .map(|candidate| Collision {
                id: candidate.id.clone(),
                value: pointer.distance(&candidate.rect.center()),
            })
            .collect::<Vec<_>>();
        hits.sort_by(|a, b| a.value.total_cmp(&b.value));
        hits
    }
}

/// Bounding-box overlap ranked by intersection ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectIntersection;

impl CollisionStrategy for RectIntersection {
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        let mut hits = args
            .candidates
            .iter()
            .filter_map(|candidate| {
                let ratio = args.active_rect.intersection_ratio(&candidate.rect);
                (ratio > 0.0).then(|| Collision {
                    id: candidate.id.clone(),
                    value: ratio,
                })
            })
            .collect::<Vec<_>>();
        hits.sort_by(|a, b| b.value.total_cmp(&a.value));
        hits
    }
}

/// Strategy chosen for one drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Topic reordering; only topic targets are considered.
    TopicClosestCenter,
    /// Content over topic containers, so empty topics can accept drops.
    PointerWithin,
    /// Content among content siblings.
    ContentClosestCenter,
    RectIntersection,
}

impl StrategyKind {
    pub fn strategy(self) -> &'static dyn CollisionStrategy {
        match self {
            Self::TopicClosestCenter | Self::ContentClosestCenter => &ClosestCenter,
            Self::PointerWithin => &PointerWithin,
            Self::RectIntersection => &RectIntersection,
        }
    }
}

/// Picks the hit-testing strategy for the dragged handle and its candidates.
pub fn select_strategy(active: &str, candidates: &[Droppable]) -> StrategyKind {
    match DragKind::classify(active) {
        DragKind::Topic => StrategyKind::TopicClosestCenter,
        DragKind::Content => {
            let has_topic_target = candidates
                .iter()
                .any(|candidate| DragKind::classify(&candidate.id) == DragKind::Topic);
            if has_topic_target {
                StrategyKind::PointerWithin
            } else {
                StrategyKind::ContentClosestCenter
            }
        }
        DragKind::Unknown => StrategyKind::RectIntersection,
    }
}

/// Runs the selected strategy for one drag event.
pub fn detect_collisions(args: &CollisionArgs<'_>) -> Vec<Collision> {
    if args.candidates.is_empty() {
        return Vec::new();
    }

    let kind = select_strategy(args.active, args.candidates);
    if kind == StrategyKind::TopicClosestCenter {
        let topics = args
            .candidates
            .iter()
            .filter(|candidate| DragKind::classify(&candidate.id) == DragKind::Topic)
            .cloned()
            .collect::<Vec<_>>();
        let scoped = CollisionArgs {
            candidates: &topics,
            ..*args
        };
        return kind.strategy().detect(&scoped);
    }
    kind.strategy().detect(args)
}

#[cfg(test)]
mod tests {
    use super::{select_strategy, DragKind, Droppable, StrategyKind};
    use crate::collision::Rect;

    fn target(id: &str) -> Droppable {
        Droppable::new(id, Rect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn classify_uses_prefix_only() {
        assert_eq!(DragKind::classify("topic-1"), DragKind::Topic);
        assert_eq!(DragKind::classify("content-1"), DragKind::Content);
        assert_eq!(DragKind::classify("sidebar"), DragKind::Unknown);
    }

    #[test]
    fn selection_covers_all_four_branches() {
        let mixed = [target("topic-1"), target("content-2")];
        let contents = [target("content-2"), target("content-3")];

        assert_eq!(
            select_strategy("topic-9", &mixed),
            StrategyKind::TopicClosestCenter
        );
        assert_eq!(
            select_strategy("content-9", &mixed),
            StrategyKind::PointerWithin
        );
        assert_eq!(
            select_strategy("content-9", &contents),
            StrategyKind::ContentClosestCenter
        );
        assert_eq!(
            select_strategy("widget", &mixed),
            StrategyKind::RectIntersection
        );
    }
}
