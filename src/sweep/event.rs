//! Sweep events and their ordering

use std::cmp::Ordering;

use crate::geometry::{approx_eq, Circle, Point};

use super::beachline::ArcId;

/// Index of a circle event in the engine's arena
pub(crate) type CircleId = usize;

#[derive(Debug, Clone, Copy)]
pub(crate) enum EventKind {
    /// A site (cell index) reaches the sweep line
    Site(usize),
    /// An arc may vanish at the top of a circle
    Circle(CircleId),
}

/// A queued event at `point`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event {
    pub point: Point,
    pub kind: EventKind,
}

impl Event {
    pub fn site(cell: usize, point: Point) -> Self {
        Self {
            point,
            kind: EventKind::Site(cell),
        }
    }

    pub fn circle(id: CircleId, point: Point) -> Self {
        Self {
            point,
            kind: EventKind::Circle(id),
        }
    }

    #[inline]
    pub fn is_site(&self) -> bool {
        matches!(self.kind, EventKind::Site(_))
    }
}

/// Events compare equal when they share the same `y`
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.point.y, other.point.y)
    }
}

/// Sweep order: `y` ascending; on (approximately) equal `y`, sites before
/// circles, then `x` ascending.
pub(crate) fn event_order(a: &Event, b: &Event) -> Ordering {
    if approx_eq(a.point.y, b.point.y) {
        match (a.is_site(), b.is_site()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.point.x.total_cmp(&b.point.x),
        }
    } else {
        a.point.y.total_cmp(&b.point.y)
    }
}

/// A potential vertex: the arc `arc` disappears when the sweep reaches the
/// top of `circle`. Dead events stay in the queue and are skipped on pop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CircleEvent {
    pub circle: Circle,
    pub arc: ArcId,
    pub alive: bool,
}
