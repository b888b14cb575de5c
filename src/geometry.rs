//! Integer polygon geometry for zone containment.
//!
//! All coordinates live in the frame's pixel grid. Cross products are taken
//! in `i128` so no pair of `i32` coordinates can overflow them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Closed polygon over integer vertices.
///
/// Construction only checks the vertex count. Self-intersecting outlines are
/// accepted; `contains` still answers for them (nonzero winding rule).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

/// Minimum number of vertices for a closed region.
pub const MIN_VERTICES: usize = 3;

impl Polygon {
    /// Returns `None` when fewer than three vertices are given.
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        if vertices.len() < MIN_VERTICES {
            return None;
        }
        Some(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Boundary-inclusive point-in-polygon test.
    ///
    /// Points exactly on an edge or vertex are inside. Interior points are
    /// decided by winding number, which matches even-odd for simple polygons.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        let mut winding = 0i32;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];

            let cross = cross(a, b, p);
            if cross == 0 && within_bounds(a, b, p) {
                return true;
            }

            if a.y <= p.y {
                if b.y > p.y && cross > 0 {
                    winding += 1;
                }
            } else if b.y <= p.y && cross < 0 {
                winding -= 1;
            }
        }
        winding != 0
    }
}

/// Twice the signed area of triangle (a, b, p). Positive when p is left of a->b.
fn cross(a: Point, b: Point, p: Point) -> i128 {
    let (ax, ay) = (a.x as i128, a.y as i128);
    let (bx, by) = (b.x as i128, b.y as i128);
    let (px, py) = (p.x as i128, p.y as i128);
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

fn within_bounds(a: Point, b: Point, p: Point) -> bool {
    a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x) && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[(i32, i32)]) -> Polygon {
        Polygon::new(points.iter().copied().map(Point::from).collect()).expect("valid polygon")
    }

    fn square() -> Polygon {
        poly(&[(0, 0), (10, 0), (10, 10), (0, 10)])
    }

    #[test]
    fn rejects_fewer_than_three_vertices() {
        assert!(Polygon::new(vec![]).is_none());
        assert!(Polygon::new(vec![Point::new(0, 0), Point::new(1, 1)]).is_none());
    }

    #[test]
    fn square_interior_exterior_and_edges() {
        let sq = square();
        assert!(sq.contains(Point::new(5, 5)));
        assert!(!sq.contains(Point::new(50, 50)));
        assert!(!sq.contains(Point::new(-1, 5)));
        assert!(!sq.contains(Point::new(11, 5)));
        assert!(sq.contains(Point::new(10, 5)));
        assert!(sq.contains(Point::new(0, 5)));
        assert!(sq.contains(Point::new(5, 0)));
        assert!(sq.contains(Point::new(5, 10)));
    }

    #[test]
    fn vertices_count_as_inside() {
        let sq = square();
        for v in sq.vertices() {
            assert!(sq.contains(*v));
        }
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let cw = poly(&[(0, 0), (0, 10), (10, 10), (10, 0)]);
        assert!(cw.contains(Point::new(5, 5)));
        assert!(cw.contains(Point::new(10, 5)));
        assert!(!cw.contains(Point::new(15, 5)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape: notch between x=4..6 from y=4 upward.
        let u = poly(&[
            (0, 0),
            (10, 0),
            (10, 10),
            (6, 10),
            (6, 4),
            (4, 4),
            (4, 10),
            (0, 10),
        ]);
        assert!(u.contains(Point::new(2, 8)));
        assert!(u.contains(Point::new(8, 8)));
        assert!(u.contains(Point::new(5, 2)));
        assert!(!u.contains(Point::new(5, 8)));
        assert!(u.contains(Point::new(5, 4)));
    }

    #[test]
    fn ray_through_vertex_is_counted_once() {
        let diamond = poly(&[(5, 0), (10, 5), (5, 10), (0, 5)]);
        assert!(diamond.contains(Point::new(5, 5)));
        assert!(!diamond.contains(Point::new(-3, 5)));
        assert!(!diamond.contains(Point::new(1, 1)));
    }

    #[test]
    fn degenerate_polygons_do_not_panic() {
        let line = poly(&[(0, 0), (5, 5), (10, 10)]);
        assert!(line.contains(Point::new(3, 3)));
        assert!(!line.contains(Point::new(3, 4)));

        let bowtie = poly(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        let _ = bowtie.contains(Point::new(5, 5));
        let _ = bowtie.contains(Point::new(2, 5));

        let extreme = poly(&[(i32::MIN, i32::MIN), (i32::MAX, i32::MIN), (i32::MAX, i32::MAX)]);
        assert!(extreme.contains(Point::new(0, -1)));
    }
}
