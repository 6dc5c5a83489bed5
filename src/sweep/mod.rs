//! Fortune's sweep
//!
//! The sweep line moves in ascending `y`. Site events insert arcs into the
//! beach line, circle events remove them and emit Voronoi vertices; each
//! breakpoint traces an [`Edge`]. When the queue runs dry the still-open
//! edges are extended far beyond the diagram.
//!
//! The engine works on plain indices: site `i` of the input owns cell `i`.

pub(crate) mod beachline;
pub(crate) mod edge;
pub(crate) mod event;
pub(crate) mod parabola;

use crate::geometry::{approx_eq, cross, Circle, Point, Size, EPSILON};
use crate::queue::PriorityQueue;

use beachline::{ArcId, BeachLine};
pub(crate) use edge::{Edge, EdgeId, HalfEdge, HalfEdgeId};
use event::{event_order, CircleEvent, CircleId, Event, EventKind};
use parabola::Parabola;

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SweepState {
    Idle,
    ProcessingEvent,
    Finished,
}

/// Axis-aligned box covering the boundary and every site
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: Point,
    max: Point,
}

impl Extent {
    fn new(sites: &[Point], boundary: Size) -> Self {
        let mut min = Point::ZERO;
        let mut max = Point::new(boundary.width, boundary.height);
        for site in sites {
            min = min.min(*site);
            max = max.max(*site);
        }
        Self { min, max }
    }

    fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }

    /// A distance from `from` that is guaranteed to leave the extent
    fn reach_from(&self, from: Point) -> f64 {
        let center = (self.min + self.max) * 0.5;
        from.distance(center) + 2.0 * self.diagonal() + 1.0
    }
}

/// Everything the sweep traced
#[derive(Debug, Clone)]
pub(crate) struct SweepOutput {
    pub edges: Vec<Edge>,
    pub half_edges: Vec<HalfEdge>,
    pub vertex_events: usize,
}

impl SweepOutput {
    /// Whether every edge received an end point
    pub fn all_closed(&self) -> bool {
        self.edges.iter().all(Edge::has_set_end)
    }
}

pub(crate) struct SweepEngine<'a> {
    sites: &'a [Point],
    extent: Extent,
    beach: BeachLine,
    events: PriorityQueue<Event>,
    circles: Vec<CircleEvent>,
    edges: Vec<Edge>,
    half_edges: Vec<HalfEdge>,
    sweep_line: f64,
    vertex_events: usize,
    state: SweepState,
}

impl<'a> SweepEngine<'a> {
    pub fn new(sites: &'a [Point], boundary: Size) -> Self {
        let events = sites
            .iter()
            .enumerate()
            .map(|(cell, site)| Event::site(cell, *site))
            .collect();

        Self {
            sites,
            extent: Extent::new(sites, boundary),
            beach: BeachLine::new(),
            events: PriorityQueue::from_items(events, true, event_order),
            circles: Vec::new(),
            edges: Vec::new(),
            half_edges: Vec::new(),
            sweep_line: 0.0,
            vertex_events: 0,
            state: SweepState::Idle,
        }
    }

    /// Run the sweep to completion
    pub fn run(mut self) -> SweepOutput {
        while self.step() != SweepState::Finished {}

        tracing::debug!(
            sites = self.sites.len(),
            edges = self.edges.len(),
            vertices = self.vertex_events,
            "sweep finished"
        );

        let output = SweepOutput {
            edges: self.edges,
            half_edges: self.half_edges,
            vertex_events: self.vertex_events,
        };
        if !output.all_closed() {
            tracing::warn!("sweep left open edges");
        }
        output
    }

    /// Process a single live event
    pub fn step(&mut self) -> SweepState {
        if self.state == SweepState::Finished {
            return self.state;
        }

        if let Some(event) = self.next_live_event() {
            self.state = SweepState::ProcessingEvent;
            self.sweep_line = event.point.y;
            match event.kind {
                EventKind::Site(cell) => {
                    tracing::trace!(cell, y = event.point.y, arcs = self.beach.len(), "site event");
                    self.add_site(cell);
                }
                EventKind::Circle(id) => {
                    tracing::trace!(id, y = event.point.y, "circle event");
                    self.remove_arc(id);
                }
            }
        }

        if self.events.is_empty() {
            self.finalize_edges();
            self.state = SweepState::Finished;
        } else {
            self.state = SweepState::Idle;
        }
        self.state
    }

    /// Pop events until one that is still meaningful comes up
    fn next_live_event(&mut self) -> Option<Event> {
        while let Some(event) = self.events.pop() {
            match event.kind {
                EventKind::Circle(id) if !self.circles[id].alive => continue,
                _ => return Some(event),
            }
        }
        None
    }

    fn add_site(&mut self, cell: usize) {
        let focus = self.sites[cell];
        if self.beach.is_empty() {
            self.beach.insert_root(Parabola::new(cell, focus));
            return;
        }

        let Some(found) = self.beach.find_arc_above(focus.x, self.sweep_line) else {
            return;
        };
        let arc = self.beach.arc(found).clone();

        if approx_eq(arc.focus.y, focus.y) {
            self.split_level(found, &arc, cell, focus);
            return;
        }

        let start = Point::new(focus.x, arc.y_for_x(focus.x, self.sweep_line));
        let left_edge = self.new_edge(start, (arc.cell, arc.focus), (cell, focus));
        let right_edge = self.new_edge(start, (cell, focus), (arc.cell, arc.focus));
        self.edges[left_edge].twin = Some(right_edge);
        self.edges[right_edge].twin = Some(left_edge);

        let mut left = Parabola::new(arc.cell, arc.focus);
        left.left_edge = arc.left_edge;
        left.right_edge = Some(left_edge);

        let mut middle = Parabola::new(cell, focus);
        middle.left_edge = Some(left_edge);
        middle.right_edge = Some(right_edge);

        let mut right = Parabola::new(arc.cell, arc.focus);
        right.left_edge = Some(right_edge);
        right.right_edge = arc.right_edge;

        let (l, _, r) = self.beach.split_three(found, left, middle, right);
        self.transfer_circle_event(&arc, l, r);

        // The split arc's cell meets itself across the new site, and the new
        // site's two rays meet at their shared start.
        let outer_left = self.edges[left_edge].half_of(arc.cell);
        let outer_right = self.edges[right_edge].half_of(arc.cell);
        edge::link(&mut self.half_edges, outer_left, outer_right);
        let inner_left = self.edges[left_edge].half_of(cell);
        let inner_right = self.edges[right_edge].half_of(cell);
        edge::link(&mut self.half_edges, inner_left, inner_right);

        self.check_circle_event(l);
        self.check_circle_event(r);
    }

    /// Split an arc whose focus sits on the sweep line next to the new site.
    /// Both arcs are still vertical rays, so the separating edge comes up from
    /// far below.
    fn split_level(&mut self, found: ArcId, arc: &Parabola, cell: usize, focus: Point) {
        let below = self.extent.min.y - self.extent.reach_from(self.extent.min);
        let start = Point::new((arc.focus.x + focus.x) / 2.0, below);

        let site_is_right = arc.focus.x < focus.x;
        let (left_side, right_side) = if site_is_right {
            ((arc.cell, arc.focus), (cell, focus))
        } else {
            ((cell, focus), (arc.cell, arc.focus))
        };
        let edge = self.new_edge(start, left_side, right_side);

        let mut left = Parabola::new(left_side.0, left_side.1);
        left.left_edge = arc.left_edge;
        left.right_edge = Some(edge);
        let mut right = Parabola::new(right_side.0, right_side.1);
        right.left_edge = Some(edge);
        right.right_edge = arc.right_edge;

        let (l, r) = self.beach.split(found, left, right);
        self.transfer_circle_event(arc, l, r);
        self.check_circle_event(l);
        self.check_circle_event(r);
    }

    /// Hand a split arc's pending circle event to the copy on the side of the
    /// circle's center.
    fn transfer_circle_event(&mut self, arc: &Parabola, left: ArcId, right: ArcId) {
        let Some(id) = arc.circle_event else {
            return;
        };
        if !self.circles[id].alive {
            return;
        }
        let target = if self.circles[id].circle.center.x > arc.focus.x {
            right
        } else {
            left
        };
        self.circles[id].arc = target;
        self.beach.arc_mut(target).circle_event = Some(id);
    }

    fn remove_arc(&mut self, id: CircleId) {
        let CircleEvent { circle, arc, alive } = self.circles[id];
        if !alive || !self.beach.arc(arc).alive {
            return;
        }
        self.circles[id].alive = false;
        self.beach.arc_mut(arc).circle_event = None;

        let (Some(left), Some(right)) = (self.beach.arc_to_left(arc), self.beach.arc_to_right(arc))
        else {
            return;
        };

        let center = circle.center;
        let middle = self.beach.arc(arc).clone();
        let (left_cell, left_focus) = (self.beach.arc(left).cell, self.beach.arc(left).focus);
        let (right_cell, right_focus) = (self.beach.arc(right).cell, self.beach.arc(right).focus);

        if let Some(e) = middle.left_edge {
            self.edges[e].close(center);
        }
        if let Some(e) = middle.right_edge {
            self.edges[e].close(center);
        }

        let new_edge = self.new_edge(center, (left_cell, left_focus), (right_cell, right_focus));
        self.beach.arc_mut(left).right_edge = Some(new_edge);
        self.beach.arc_mut(right).left_edge = Some(new_edge);

        if let (Some(a), Some(b)) = (middle.left_edge, middle.right_edge) {
            let ha = self.edges[a].half_of(middle.cell);
            let hb = self.edges[b].half_of(middle.cell);
            edge::link(&mut self.half_edges, ha, hb);
        }
        if let Some(a) = middle.left_edge {
            let ha = self.edges[a].half_of(left_cell);
            let hn = self.edges[new_edge].half_of(left_cell);
            edge::link(&mut self.half_edges, ha, hn);
        }
        if let Some(b) = middle.right_edge {
            let hb = self.edges[b].half_of(right_cell);
            let hn = self.edges[new_edge].half_of(right_cell);
            edge::link(&mut self.half_edges, hb, hn);
        }

        self.beach.remove(arc);
        self.vertex_events += 1;

        self.check_circle_event(left);
        self.check_circle_event(right);
    }

    /// Recompute the circle event of arc `id` from its current neighbors
    fn check_circle_event(&mut self, id: ArcId) {
        let candidate = self.circle_for(id);
        let existing = self
            .beach
            .arc(id)
            .circle_event
            .filter(|&c| self.circles[c].alive);

        match (candidate, existing) {
            (Some(circle), Some(current)) if self.circles[current].circle.approx_eq(&circle) => {}
            (candidate, existing) => {
                if let Some(current) = existing {
                    self.circles[current].alive = false;
                }
                self.beach.arc_mut(id).circle_event = None;

                if let Some(circle) = candidate {
                    let event_id = self.circles.len();
                    self.circles.push(CircleEvent {
                        circle,
                        arc: id,
                        alive: true,
                    });
                    self.beach.arc_mut(id).circle_event = Some(event_id);
                    self.events.push(Event::circle(event_id, circle.top()));
                }
            }
        }
    }

    /// The circle at which arc `id` would vanish, if its neighbors converge
    fn circle_for(&self, id: ArcId) -> Option<Circle> {
        let left = self.beach.arc_to_left(id)?;
        let right = self.beach.arc_to_right(id)?;
        let (l, m, r) = (self.beach.arc(left), self.beach.arc(id), self.beach.arc(right));
        if l.cell == r.cell {
            return None;
        }

        let circle = Circle::through(l.focus, m.focus, r.focus)?;
        if cross(m.focus - l.focus, r.focus - m.focus) <= 0.0 {
            return None;
        }
        if circle.top().y < self.sweep_line - EPSILON {
            return None;
        }

        for edge in [m.left_edge?, m.right_edge?] {
            let edge = &self.edges[edge];
            let dir_len = edge.direction.length();
            if (circle.center - edge.start).dot(edge.direction) < -EPSILON * dir_len {
                return None;
            }
        }
        Some(circle)
    }

    /// Extend every open edge along its direction beyond the extent
    fn finalize_edges(&mut self) {
        for edge in self.edges.iter_mut().filter(|e| !e.has_set_end()) {
            let reach = self.extent.reach_from(edge.start);
            let end = if approx_eq(edge.direction.x, 0.0) {
                Point::new(edge.start.x, edge.start.y + edge.direction.y.signum() * reach)
            } else {
                edge.start + edge.direction.normalize() * reach
            };
            edge.close(end);
        }
    }

    fn new_edge(&mut self, start: Point, left: (usize, Point), right: (usize, Point)) -> EdgeId {
        let id = self.edges.len();
        let halves: [HalfEdgeId; 2] = [self.half_edges.len(), self.half_edges.len() + 1];
        self.half_edges.push(HalfEdge {
            owner: left.0,
            edge: id,
            links: Vec::new(),
        });
        self.half_edges.push(HalfEdge {
            owner: right.0,
            edge: id,
            links: Vec::new(),
        });
        self.edges.push(Edge::new(start, left, right, halves));
        id
    }
}

/// Sweep `sites` inside `boundary` and return the traced edges
pub(crate) fn sweep(sites: &[Point], boundary: Size) -> SweepOutput {
    SweepEngine::new(sites, boundary).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PointExt;

    fn run(sites: &[Point]) -> SweepOutput {
        sweep(sites, Size::new(100.0, 100.0))
    }

    #[test]
    fn test_empty_and_single_site() {
        let out = run(&[]);
        assert!(out.edges.is_empty());

        let out = run(&[Point::new(50.0, 50.0)]);
        assert!(out.edges.is_empty());
        assert_eq!(out.vertex_events, 0);
    }

    #[test]
    fn test_two_sites_same_height() {
        let out = run(&[Point::new(25.0, 50.0), Point::new(75.0, 50.0)]);
        assert_eq!(out.edges.len(), 1);
        let edge = &out.edges[0];
        assert!(approx_eq(edge.start.x, 50.0));
        assert!(edge.start.y < 0.0);
        assert!(edge.end.unwrap().y > 100.0);
        assert!(out.all_closed());
    }

    #[test]
    fn test_three_sites_meet_at_circumcenter() {
        let out = run(&[
            Point::new(25.0, 25.0),
            Point::new(75.0, 25.0),
            Point::new(50.0, 75.0),
        ]);
        let center = Point::new(50.0, 43.75);
        assert_eq!(out.vertex_events, 1);
        assert!(out.all_closed());

        let touching = out
            .edges
            .iter()
            .filter(|e| e.start.approx_eq(center) || e.end.unwrap().approx_eq(center))
            .count();
        assert!(touching >= 3);
    }

    #[test]
    fn test_collinear_sites_have_no_vertices() {
        let out = run(&[
            Point::new(25.0, 50.0),
            Point::new(50.0, 50.0),
            Point::new(75.0, 50.0),
        ]);
        assert_eq!(out.vertex_events, 0);
        assert_eq!(out.edges.len(), 2);
        for edge in &out.edges {
            assert!(approx_eq(edge.direction.x, 0.0));
        }
    }

    #[test]
    fn test_step_state_machine() {
        let sites = [Point::new(10.0, 10.0), Point::new(90.0, 20.0)];
        let mut engine = SweepEngine::new(&sites, Size::new(100.0, 100.0));
        assert_eq!(engine.step(), SweepState::Idle);
        assert_eq!(engine.step(), SweepState::Finished);
        assert_eq!(engine.step(), SweepState::Finished);
        assert!(engine.edges.iter().all(Edge::has_set_end));
    }

    #[test]
    fn test_half_edges_link_at_shared_vertex() {
        let out = run(&[
            Point::new(20.0, 20.0),
            Point::new(80.0, 30.0),
            Point::new(45.0, 70.0),
            Point::new(60.0, 90.0),
        ]);
        for half in &out.half_edges {
            let edge = &out.edges[half.edge];
            for &other in &half.links {
                let other_edge = &out.edges[out.half_edges[other].edge];
                assert_eq!(out.half_edges[other].owner, half.owner);
                let ends = [edge.start, edge.end.unwrap()];
                let other_ends = [other_edge.start, other_edge.end.unwrap()];
                assert!(ends
                    .iter()
                    .any(|a| other_ends.iter().any(|b| a.approx_eq(*b))));
            }
        }
    }
}
