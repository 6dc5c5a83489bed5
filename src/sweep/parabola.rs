//! Beach line arcs and the parabola algebra behind breakpoints

use crate::geometry::{approx_eq, Point};

use super::beachline::NodeId;
use super::edge::EdgeId;
use super::event::CircleId;

/// One arc of the beach line
///
/// The directrix is not stored: every query passes the current sweep
/// position explicitly.
#[derive(Debug, Clone)]
pub(crate) struct Parabola {
    /// Cell (site index) this arc belongs to
    pub cell: usize,
    pub focus: Point,
    pub left_edge: Option<EdgeId>,
    pub right_edge: Option<EdgeId>,
    pub circle_event: Option<CircleId>,
    /// Leaf node holding this arc; maintained by the beach line
    pub node: NodeId,
    pub alive: bool,
}

impl Parabola {
    pub fn new(cell: usize, focus: Point) -> Self {
        Self {
            cell,
            focus,
            left_edge: None,
            right_edge: None,
            circle_event: None,
            node: NodeId::MAX,
            alive: true,
        }
    }

    /// Height of the arc above `x` for the given directrix
    ///
    /// Undefined (infinite) when the focus lies on the directrix.
    #[inline]
    pub fn y_for_x(&self, x: f64, directrix: f64) -> f64 {
        y_for_x(self.focus, x, directrix)
    }
}

#[inline]
fn y_for_x(focus: Point, x: f64, directrix: f64) -> f64 {
    let p = (focus.y - directrix) / 2.0;
    let k = (focus.y + directrix) / 2.0;
    let dx = x - focus.x;
    dx * dx / (4.0 * p) + k
}

/// Intersections of the two parabolas with foci `f1`, `f2` and a shared
/// directrix.
///
/// Equal focal distances give a single solution, returned twice. A focus on
/// the directrix degenerates into a vertical ray that meets the other
/// parabola right above that focus. No real intersection gives an empty list.
pub(crate) fn parabola_collisions(f1: Point, f2: Point, directrix: f64) -> Vec<Point> {
    let p1 = (f1.y - directrix) / 2.0;
    let p2 = (f2.y - directrix) / 2.0;
    let (h1, h2) = (f1.x, f2.x);

    if approx_eq(p1, 0.0) && approx_eq(p2, 0.0) {
        let x = (h1 + h2) / 2.0;
        let hit = Point::new(x, f64::NEG_INFINITY);
        return vec![hit, hit];
    }
    if approx_eq(p1, p2) {
        let x = (h1 + h2) / 2.0;
        let hit = Point::new(x, y_for_x(f1, x, directrix));
        return vec![hit, hit];
    }
    if approx_eq(p1, 0.0) {
        return vec![Point::new(h1, y_for_x(f2, h1, directrix))];
    }
    if approx_eq(p2, 0.0) {
        return vec![Point::new(h2, y_for_x(f1, h2, directrix))];
    }

    let k1 = (f1.y + directrix) / 2.0;
    let k2 = (f2.y + directrix) / 2.0;
    let a = 1.0 / p1 - 1.0 / p2;
    let b = 2.0 * (h2 / p2 - h1 / p1);
    let c = 4.0 * (k1 - k2) + h1 * h1 / p1 - h2 * h2 / p2;

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let x1 = q / a;
    let x2 = if q != 0.0 { c / q } else { x1 };

    vec![
        Point::new(x1, y_for_x(f1, x1, directrix)),
        Point::new(x2, y_for_x(f1, x2, directrix)),
    ]
}

/// X coordinate of the breakpoint between a left and a right arc
///
/// Of the two intersections the left one is taken when the left focus is
/// lower, the right one otherwise.
pub(crate) fn breakpoint_x(left: Point, right: Point, directrix: f64) -> Option<f64> {
    let hits = parabola_collisions(left, right, directrix);
    let first = hits.first()?;
    let (lo, hi) = hits
        .iter()
        .fold((first.x, first.x), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    Some(if left.y < right.y { lo } else { hi })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_on_both(p: Point, f1: Point, f2: Point, directrix: f64) {
        let to_line = directrix - p.y;
        assert!((p.distance(f1) - to_line).abs() < 1e-6);
        assert!((p.distance(f2) - to_line).abs() < 1e-6);
    }

    #[test]
    fn test_y_for_x() {
        let arc = Parabola::new(0, Point::new(75.0, 25.0));
        assert!(approx_eq(arc.y_for_x(50.0, 75.0), 43.75));
        assert!(approx_eq(arc.y_for_x(75.0, 75.0), 50.0));
    }

    #[test]
    fn test_collisions_equal_height() {
        let hits = parabola_collisions(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 10.0);
        assert_eq!(hits.len(), 2);
        assert!(approx_eq(hits[0].x, 5.0));
        assert_eq!(hits[0], hits[1]);
        assert_on_both(hits[0], Point::new(0.0, 0.0), Point::new(10.0, 0.0), 10.0);
    }

    #[test]
    fn test_collisions_general() {
        let f1 = Point::new(0.0, 0.0);
        let f2 = Point::new(4.0, 5.0);
        let hits = parabola_collisions(f1, f2, 10.0);
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert_on_both(*hit, f1, f2, 10.0);
        }
        assert!(!approx_eq(hits[0].x, hits[1].x));
    }

    #[test]
    fn test_collisions_degenerate_focus() {
        let f1 = Point::new(3.0, 10.0);
        let f2 = Point::new(0.0, 2.0);
        let hits = parabola_collisions(f1, f2, 10.0);
        assert_eq!(hits.len(), 1);
        assert!(approx_eq(hits[0].x, 3.0));
        assert_on_both(hits[0], f1, f2, 10.0);
    }

    #[test]
    fn test_breakpoint_choice() {
        let low = Point::new(0.0, 0.0);
        let high = Point::new(4.0, 5.0);
        let hits = parabola_collisions(low, high, 10.0);
        let lo = hits[0].x.min(hits[1].x);
        let hi = hits[0].x.max(hits[1].x);

        assert!(approx_eq(breakpoint_x(low, high, 10.0).unwrap(), lo));
        assert!(approx_eq(breakpoint_x(high, low, 10.0).unwrap(), hi));
    }
}
