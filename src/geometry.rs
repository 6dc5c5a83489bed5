//! Planar geometry primitives
//!
//! Points are `glam::DVec2`. Every approximate comparison in the crate goes
//! through the single absolute tolerance [`EPSILON`].

use std::collections::HashMap;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point (or vector) in the plane
pub type Point = DVec2;

/// Absolute tolerance shared by all approximate comparisons
pub const EPSILON: f64 = 1e-5;

/// Approximate equality of two scalars
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Two-dimensional cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Extra point operations used by the sweep and the cell reconstruction
pub trait PointExt {
    /// Component-wise approximate equality
    fn approx_eq(self, other: Self) -> bool;

    /// Angle of the vector from `self` to `other`, in `(-π, π]`
    fn heading_to(self, other: Self) -> f64;
}

impl PointExt for DVec2 {
    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }

    #[inline]
    fn heading_to(self, other: Self) -> f64 {
        let d = other - self;
        d.y.atan2(d.x)
    }
}

/// One side of the bounding rectangle
///
/// `Down` is the `y = 0` side and `Up` is the `y = height` side.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four directions
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Direction::Left => 1,
            Direction::Right => 2,
            Direction::Up => 4,
            Direction::Down => 8,
        }
    }
}

/// A set of rectangle sides touched by a cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sides(u8);

impl Sides {
    /// The empty set
    pub const NONE: Sides = Sides(0);

    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    #[inline]
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of sides in the set
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the contained directions
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for Sides {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut sides = Sides::NONE;
        for direction in iter {
            sides.insert(direction);
        }
        sides
    }
}

/// The bounding rectangle `[0, width] × [0, height]`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the point lies inside the closed rectangle
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Whether the point lies at least `margin` away from every side
    #[inline]
    pub fn contains_inset(&self, point: Point, margin: f64) -> bool {
        point.x > margin
            && point.x < self.width - margin
            && point.y > margin
            && point.y < self.height - margin
    }

    /// Corners: bottom-left, bottom-right, top-right, top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ]
    }

    /// Sides of the rectangle the point lies on (within `EPSILON`)
    pub fn sides_touched_by(&self, point: Point) -> Sides {
        let mut sides = Sides::NONE;
        if approx_eq(point.x, 0.0) {
            sides.insert(Direction::Left);
        }
        if approx_eq(point.x, self.width) {
            sides.insert(Direction::Right);
        }
        if approx_eq(point.y, 0.0) {
            sides.insert(Direction::Down);
        }
        if approx_eq(point.y, self.height) {
            sides.insert(Direction::Up);
        }
        sides
    }

    /// Clip the segment `a → b` to the rectangle grown by `margin` on every
    /// side (Liang–Barsky). Returns `None` when nothing of the segment is inside.
    pub fn clip_segment(&self, a: Point, b: Point, margin: f64) -> Option<(Point, Point)> {
        let d = b - a;
        let (min_x, min_y) = (-margin, -margin);
        let (max_x, max_y) = (self.width + margin, self.height + margin);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        for (p, q) in [
            (-d.x, a.x - min_x),
            (d.x, max_x - a.x),
            (-d.y, a.y - min_y),
            (d.y, max_y - a.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((a + d * t0, a + d * t1))
    }
}

/// A directed line through two points, used for half-plane tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Signed distance of `point` from the line; positive on the left of
    /// `start → end`.
    pub fn signed_distance(&self, point: Point) -> f64 {
        let dir = self.end - self.start;
        let len = dir.length();
        if len == 0.0 {
            return 0.0;
        }
        cross(dir, point - self.start) / len
    }

    /// Whether the point is strictly on the left ("above") of the line
    #[inline]
    pub fn lies_above(&self, point: Point) -> bool {
        self.signed_distance(point) > 0.0
    }

    /// Whether `a` and `b` are strictly on the same side of the line
    pub fn same_side(&self, a: Point, b: Point) -> bool {
        if self.signed_distance(a) == 0.0 || self.signed_distance(b) == 0.0 {
            return false;
        }
        self.lies_above(a) == self.lies_above(b)
    }
}

/// A circle given by center and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// The circle through three points, `None` when they are collinear
    pub fn through(a: Point, b: Point, c: Point) -> Option<Circle> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if approx_eq(d, 0.0) {
            return None;
        }
        let a2 = a.length_squared();
        let b2 = b.length_squared();
        let c2 = c.length_squared();
        let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        let center = Point::new(ux, uy);
        Some(Circle {
            center,
            radius: center.distance(a),
        })
    }

    /// Highest point of the circle; where the sweep line leaves it
    #[inline]
    pub fn top(&self) -> Point {
        Point::new(self.center.x, self.center.y + self.radius)
    }

    /// Same center and radius within `EPSILON`
    pub fn approx_eq(&self, other: &Circle) -> bool {
        self.center.approx_eq(other.center) && approx_eq(self.radius, other.radius)
    }
}

/// Hash set of points that treats points within `EPSILON` as equal
#[derive(Debug, Default)]
pub(crate) struct PointSet {
    buckets: HashMap<(i64, i64), Vec<(Point, usize)>>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(point: Point) -> (i64, i64) {
        (
            (point.x / EPSILON).floor() as i64,
            (point.y / EPSILON).floor() as i64,
        )
    }

    /// Tag of a stored point approximately equal to `point`
    pub fn find(&self, point: Point) -> Option<usize> {
        let (kx, ky) = Self::key(point);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(kx + dx, ky + dy)) else {
                    continue;
                };
                if let Some((_, tag)) = bucket.iter().find(|(p, _)| p.approx_eq(point)) {
                    return Some(*tag);
                }
            }
        }
        None
    }

    /// Store `point` under `tag`. Returns the tag of an existing
    /// approximately equal point instead, leaving the set unchanged.
    pub fn insert(&mut self, point: Point, tag: usize) -> std::result::Result<(), usize> {
        if let Some(existing) = self.find(point) {
            return Err(existing);
        }
        self.buckets
            .entry(Self::key(point))
            .or_default()
            .push((point, tag));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_set_merges_close_points() {
        let mut set = PointSet::new();
        assert!(set.insert(Point::new(1.0, 1.0), 0).is_ok());
        assert!(set.insert(Point::new(2.0, 1.0), 1).is_ok());
        assert_eq!(set.insert(Point::new(1.0 + 1e-7, 1.0 - 1e-7), 2), Err(0));
        assert_eq!(set.find(Point::new(2.0, 1.0)), Some(1));
        assert_eq!(set.find(Point::new(3.0, 1.0)), None);
    }

    #[test]
    fn test_circle_through_right_triangle() {
        let circle = Circle::through(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        )
        .unwrap();
        assert!(circle.center.approx_eq(Point::new(2.0, 1.5)));
        assert!(approx_eq(circle.radius, 2.5));
        assert!(circle.top().approx_eq(Point::new(2.0, 4.0)));
    }

    #[test]
    fn test_circle_through_collinear_is_none() {
        let circle = Circle::through(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 3.0),
        );
        assert!(circle.is_none());
    }

    #[test]
    fn test_clip_segment_crossing() {
        let size = Size::new(10.0, 10.0);
        let (a, b) = size
            .clip_segment(Point::new(-5.0, 5.0), Point::new(15.0, 5.0), 0.0)
            .unwrap();
        assert!(a.approx_eq(Point::new(0.0, 5.0)));
        assert!(b.approx_eq(Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_clip_segment_outside() {
        let size = Size::new(10.0, 10.0);
        assert!(size
            .clip_segment(Point::new(-5.0, -1.0), Point::new(15.0, -1.0), 0.0)
            .is_none());
        assert!(size
            .clip_segment(Point::new(12.0, 0.0), Point::new(20.0, 30.0), 0.0)
            .is_none());
    }

    #[test]
    fn test_clip_segment_inside_untouched() {
        let size = Size::new(10.0, 10.0);
        let (a, b) = size
            .clip_segment(Point::new(1.0, 2.0), Point::new(3.0, 4.0), 0.0)
            .unwrap();
        assert_eq!(a, Point::new(1.0, 2.0));
        assert_eq!(b, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_sides_touched_by_corner() {
        let size = Size::new(10.0, 20.0);
        let sides = size.sides_touched_by(Point::new(10.0, 0.0));
        assert!(sides.contains(Direction::Right));
        assert!(sides.contains(Direction::Down));
        assert_eq!(sides.len(), 2);
        assert!(size.sides_touched_by(Point::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_line_sides() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(line.lies_above(Point::new(3.0, 1.0)));
        assert!(!line.lies_above(Point::new(3.0, -1.0)));
        assert!(line.same_side(Point::new(1.0, 1.0), Point::new(9.0, 7.0)));
        assert!(!line.same_side(Point::new(1.0, 0.0), Point::new(9.0, 7.0)));
        assert!(line.same_side(Point::new(1.0, -1.0), Point::new(9.0, -7.0)));
        assert!(!line.same_side(Point::new(1.0, -1.0), Point::new(9.0, 7.0)));
    }

    #[test]
    fn test_contains_inset() {
        let size = Size::new(10.0, 20.0);
        assert!(size.contains(Point::new(0.0, 0.0)));
        assert!(!size.contains_inset(Point::new(0.0, 0.0), EPSILON));
        assert!(!size.contains_inset(Point::new(5.0, 20.0), EPSILON));
        assert!(size.contains_inset(Point::new(5.0, 19.0), EPSILON));
    }

    #[test]
    fn test_heading_to() {
        let origin = Point::new(1.0, 1.0);
        assert!(approx_eq(origin.heading_to(Point::new(2.0, 1.0)), 0.0));
        assert!(approx_eq(
            origin.heading_to(Point::new(1.0, 2.0)),
            std::f64::consts::FRAC_PI_2
        ));
    }
}
