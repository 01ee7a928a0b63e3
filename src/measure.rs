use crate::models::Point;

/// Fixed conversion between image pixels and inches
pub const PIXELS_PER_UNIT: f32 = 50.0;

/// Suffix appended to every measurement label
pub const UNIT_SUFFIX: &str = "in";

/// Convert a pixel distance to real-world units, rounded to two decimals
pub fn to_units(pixels: f32) -> String {
    format!("{:.2}", pixels / PIXELS_PER_UNIT)
}

/// One measured edge of an outline
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// True for the edge from the last point back to the first
    pub closing: bool,
}

impl Segment {
    pub fn length_pixels(&self) -> f32 {
        self.start.distance_to(&self.end)
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(&self.end)
    }

    pub fn label(&self) -> String {
        format!("{} {}", to_units(self.length_pixels()), UNIT_SUFFIX)
    }
}

/// Edges of the outline through `points` in order.
///
/// Adjacent pairs always produce a segment. The closing edge is only added
/// once the outline has more than two points, so a two-point outline stays a
/// single open line.
pub fn segments(points: &[Point]) -> Vec<Segment> {
    let mut result: Vec<Segment> = points
        .windows(2)
        .map(|pair| Segment {
            start: pair[0],
            end: pair[1],
            closing: false,
        })
        .collect();

    if points.len() > 2 {
        result.push(Segment {
            start: points[points.len() - 1],
            end: points[0],
            closing: true,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pixels_to_units() {
        assert_eq!(to_units(100.0), "2.00");
        assert_eq!(to_units(25.0), "0.50");
        assert_eq!(to_units(0.0), "0.00");
    }

    #[test]
    fn two_points_make_one_open_segment() {
        let pts = [Point::new(0.0, 0.0), Point::new(30.0, 40.0)];
        let segs = segments(&pts);
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].closing);
        assert_eq!(segs[0].label(), "1.00 in");
    }

    #[test]
    fn four_points_close_the_outline() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(0.0, 50.0),
        ];
        let segs = segments(&pts);
        assert_eq!(segs.len(), 4);
        assert!(segs[3].closing);
        assert_eq!(segs[3].start, pts[3]);
        assert_eq!(segs[3].end, pts[0]);
        assert_eq!(segs[3].midpoint(), Point::new(0.0, 25.0));
    }

    #[test]
    fn single_point_has_no_segments() {
        assert!(segments(&[Point::new(5.0, 5.0)]).is_empty());
        assert!(segments(&[]).is_empty());
    }
}
