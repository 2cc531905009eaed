//! Segment-intersection geometry used for movement blocking and
//! line-of-sight.
//!
//! Walls are rectangle outlines decomposed into four segments each, so one
//! general-purpose intersection routine covers both "can the player move
//! there" and "where does the sight line stop". All functions are pure.

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Segment {
        Segment { a, b }
    }
}

/// Axis-aligned rectangle in maze pixel coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The four boundary edges of `rect` in winding order: top, right, bottom,
/// left. Each edge starts where the previous one ended.
pub fn segments_of_rect(rect: &Rect) -> [Segment; 4] {
    let Rect {
        x,
        y,
        width,
        height,
    } = *rect;
    let tl = Point::new(x, y);
    let tr = Point::new(x + width, y);
    let br = Point::new(x + width, y + height);
    let bl = Point::new(x, y + height);
    [
        Segment::new(tl, tr),
        Segment::new(tr, br),
        Segment::new(br, bl),
        Segment::new(bl, tl),
    ]
}

/// Ray-casting even-odd test. Points exactly on an edge get whatever the
/// ray cast happens to report.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// True iff the segments intersect, endpoints included. Parallel or
/// coincident segments divide by zero into non-finite parameters, which
/// fail the range test and report no intersection.
pub fn segments_intersect(seg_a: Segment, seg_b: Segment) -> bool {
    let d1 = (seg_a.b.x - seg_a.a.x, seg_a.b.y - seg_a.a.y);
    let d2 = (seg_b.b.x - seg_b.a.x, seg_b.b.y - seg_b.a.y);
    let denom = -d2.0 * d1.1 + d1.0 * d2.1;

    let s = (-d1.1 * (seg_a.a.x - seg_b.a.x) + d1.0 * (seg_a.a.y - seg_b.a.y)) / denom;
    let t = (d2.0 * (seg_a.a.y - seg_b.a.y) - d2.1 * (seg_a.a.x - seg_b.a.x)) / denom;
    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Intersection of the two *infinite* lines through the segments, or `None`
/// when they are parallel. The returned point may lie outside either
/// segment; callers that want a segment intersection must check
/// [`segments_intersect`] first.
pub fn intersection_point(line_a: Segment, line_b: Segment) -> Option<Point> {
    let denominator = (line_b.b.y - line_b.a.y) * (line_a.b.x - line_a.a.x)
        - (line_b.b.x - line_b.a.x) * (line_a.b.y - line_a.a.y);
    if denominator == 0.0 {
        return None;
    }

    let dy = line_a.a.y - line_b.a.y;
    let dx = line_a.a.x - line_b.a.x;
    let numerator = (line_b.b.x - line_b.a.x) * dy - (line_b.b.y - line_b.a.y) * dx;
    let ua = numerator / denominator;

    Some(Point::new(
        line_a.a.x + ua * (line_a.b.x - line_a.a.x),
        line_a.a.y + ua * (line_a.b.y - line_a.a.y),
    ))
}

pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Nearest true intersection of `ray` with any wall outline, measured from
/// the ray origin, or `None` when the ray is unobstructed. `walls` holds one
/// four-segment group per wall rectangle.
pub fn closest_intersection(ray: Segment, walls: &[[Segment; 4]]) -> Option<Point> {
    let mut closest: Option<(Point, f64)> = None;
    for group in walls {
        for &segment in group {
            if !segments_intersect(ray, segment) {
                continue;
            }
            if let Some(point) = intersection_point(ray, segment) {
                let d = distance(ray.a, point);
                if closest.is_none_or(|(_, best)| d < best) {
                    closest = Some((point, d));
                }
            }
        }
    }
    closest.map(|(point, _)| point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(Point::new(ax, ay), Point::new(bx, by))
    }

    #[test]
    fn rect_decomposes_into_chained_edges() {
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        };
        let edges = segments_of_rect(&rect);
        assert_eq!(edges[0], seg(10.0, 20.0, 40.0, 20.0));
        assert_eq!(edges[1], seg(40.0, 20.0, 40.0, 60.0));
        assert_eq!(edges[2], seg(40.0, 60.0, 10.0, 60.0));
        assert_eq!(edges[3], seg(10.0, 60.0, 10.0, 20.0));
        for i in 0..4 {
            assert_eq!(edges[i].b, edges[(i + 1) % 4].a);
        }
    }

    #[test]
    fn polygon_contains_centroid_not_far_points() {
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 50.0,
        };
        let polygon: Vec<Point> = segments_of_rect(&rect).iter().map(|s| s.a).collect();
        assert!(point_in_polygon(Point::new(25.0, 25.0), &polygon));
        assert!(!point_in_polygon(Point::new(100.0, 25.0), &polygon));
        assert!(!point_in_polygon(Point::new(25.0, -100.0), &polygon));
        assert!(!point_in_polygon(Point::new(-1.0, -1.0), &polygon));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &[]));
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(
            seg(0.0, 0.0, 10.0, 10.0),
            seg(0.0, 10.0, 10.0, 0.0)
        ));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!segments_intersect(
            seg(0.0, 0.0, 10.0, 0.0),
            seg(0.0, 5.0, 10.0, 5.0)
        ));
        // Coincident segments fall through the same non-finite path.
        assert!(!segments_intersect(
            seg(0.0, 0.0, 10.0, 0.0),
            seg(2.0, 0.0, 8.0, 0.0)
        ));
    }

    #[test]
    fn disjoint_segments_do_not_intersect() {
        assert!(!segments_intersect(
            seg(0.0, 0.0, 1.0, 1.0),
            seg(5.0, 0.0, 5.0, 10.0)
        ));
    }

    #[test]
    fn touching_endpoint_counts_as_intersection() {
        assert!(segments_intersect(
            seg(0.0, 0.0, 5.0, 5.0),
            seg(5.0, 5.0, 10.0, 0.0)
        ));
    }

    #[test]
    fn infinite_line_intersection_point() {
        let p = intersection_point(seg(0.0, 0.0, 10.0, 0.0), seg(5.0, -5.0, 5.0, 5.0))
            .expect("lines cross");
        assert_eq!(p, Point::new(5.0, 0.0));

        // Outside both segments but the infinite lines still cross.
        let p = intersection_point(seg(0.0, 0.0, 1.0, 0.0), seg(5.0, -5.0, 5.0, 5.0))
            .expect("infinite lines cross");
        assert_eq!(p, Point::new(5.0, 0.0));

        assert_eq!(
            intersection_point(seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 5.0, 10.0, 5.0)),
            None
        );
    }

    #[test]
    fn closest_intersection_picks_nearest_wall() {
        let ray = seg(0.0, 0.0, 100.0, 0.0);
        let far = Rect {
            x: 70.0,
            y: -10.0,
            width: 2.0,
            height: 20.0,
        };
        let near = Rect {
            x: 30.0,
            y: -10.0,
            width: 2.0,
            height: 20.0,
        };
        let walls = [segments_of_rect(&far), segments_of_rect(&near)];
        let hit = closest_intersection(ray, &walls).expect("ray hits both walls");
        assert_eq!(hit, Point::new(30.0, 0.0));
    }

    #[test]
    fn unobstructed_ray_has_no_intersection() {
        let wall = Rect {
            x: 30.0,
            y: 10.0,
            width: 2.0,
            height: 20.0,
        };
        let walls = [segments_of_rect(&wall)];
        assert_eq!(
            closest_intersection(seg(0.0, 0.0, 100.0, 0.0), &walls),
            None
        );
    }
}
