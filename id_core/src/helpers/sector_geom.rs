use id_map::{Linedef, Map, SectorIndex};
use ultraviolet::Vec2;

use crate::helpers::geom::{point_in_segments, Bounds2d, Line2d};

pub fn linedef_line(map: &Map, linedef: &Linedef) -> Option<Line2d> {
    let (start, end) = map.linedef_vertices(linedef)?;
    Some(Line2d::new(
        Vec2::new(start.x, start.y),
        Vec2::new(end.x, end.y),
    ))
}

/// Every linedef bounding the sector, as 2D segments.
pub fn sector_segments(map: &Map, sector: SectorIndex) -> Vec<Line2d> {
    map.sector_sides(sector)
        .into_iter()
        .filter_map(|side| map.linedef(side.linedef_idx))
        .filter_map(|linedef| linedef_line(map, linedef))
        .collect()
}

pub fn sector_bounds(map: &Map, sector: SectorIndex) -> Option<Bounds2d> {
    Bounds2d::from_points(
        sector_segments(map, sector)
            .into_iter()
            .flat_map(|line| [line.start, line.end]),
    )
}

/// Center of the sector's bounding box, or the origin for sectors without lines.
pub fn sector_center(map: &Map, sector: SectorIndex) -> Vec2 {
    sector_bounds(map, sector)
        .map(|bounds| bounds.center())
        .unwrap_or(Vec2::zero())
}

/// Finds the sector containing `point`.
pub fn sector_at(map: &Map, point: Vec2) -> Option<SectorIndex> {
    (0..map.sectors.len()).find(|&sector| {
        let segments = sector_segments(map, sector);
        let in_bounds = Bounds2d::from_points(segments.iter().flat_map(|l| [l.start, l.end]))
            .is_some_and(|bounds| bounds.has_point(point));

        in_bounds && point_in_segments(point, &segments)
    })
}
