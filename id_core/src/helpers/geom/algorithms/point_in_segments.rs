use ultraviolet::Vec2;

use crate::helpers::geom::Line2d;

/// Even-odd test of `point` against an unordered set of boundary segments.
///
/// Sector boundaries are just the linedefs that face into the sector, so
/// there's no contour to walk: every segment is tested on its own.
/// Points exactly on a segment count as outside.
pub fn point_in_segments(point: Vec2, segments: &[Line2d]) -> bool {
    let mut crossings = 0;

    for segment in segments {
        let (a, b) = (segment.start, segment.end);

        if segment.distance_to_sq(point, true) == 0.0 {
            return false;
        }

        // Half-open on y so shared endpoints are only counted once.
        if (a.y > point.y) == (b.y > point.y) {
            continue;
        }

        let x_at = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if point.x < x_at {
            crossings += 1;
        }
    }

    crossings % 2 == 1
}
