use std::collections::HashSet;

use id_map::{Map, Sector, SectorIndex};

use crate::{context::VisualContext, helpers::PixelColor};

/// Context for tests: brightness maps straight to gray, geometry rebuilds
/// are recorded in order.
pub struct TestContext {
    pub map: Map,
    pub visual_sectors: HashSet<SectorIndex>,
    pub rebuilt: Vec<(SectorIndex, bool)>,
}

impl TestContext {
    pub fn new(map: Map) -> Self {
        Self {
            map,
            visual_sectors: HashSet::new(),
            rebuilt: Vec::new(),
        }
    }
}

impl VisualContext for TestContext {
    fn map(&self) -> &Map {
        &self.map
    }

    fn calculate_brightness(&self, level: i32) -> i32 {
        PixelColor::gray(level.clamp(0, 255) as u8).to_int()
    }

    fn visual_sector_exists(&self, sector: SectorIndex) -> bool {
        self.visual_sectors.contains(&sector)
    }

    fn update_sector_geometry(&mut self, sector: SectorIndex, include_neighbours: bool) {
        self.rebuilt.push((sector, include_neighbours));
    }
}

/// Adds a sector bounded by one-sided lines through `points`, which go
/// clockwise so the sector is on the front side.
pub fn add_polygon_sector(map: &mut Map, points: &[(f32, f32)], sector: Sector) -> SectorIndex {
    let sector = map.add_sector(sector);
    let vertices: Vec<_> = points.iter().map(|&(x, y)| map.add_vertex(x, y)).collect();

    for (i, &start) in vertices.iter().enumerate() {
        let end = vertices[(i + 1) % vertices.len()];
        map.add_linedef(start, end, Some(sector), None);
    }

    sector
}

/// Adds an axis-aligned rectangular sector. The first line added is the
/// left edge, going up.
pub fn add_rect_sector(
    map: &mut Map,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    sector: Sector,
) -> SectorIndex {
    add_polygon_sector(map, &[(x0, y0), (x0, y1), (x1, y1), (x1, y0)], sector)
}
