use id_map::{LinedefIndex, Map, SectorIndex};
use ultraviolet::Vec2;

use crate::helpers::{geom::Plane3d, linedef_line};

use super::{at_z, EffectContext, EffectSource, LevelStack, PlaneSide};

/// `Plane_Align`: slopes the target's floor and/or ceiling so that it meets
/// the sector on the other side of the line.
#[derive(Debug, Clone)]
pub struct EffectLineSlope {
    linedef: LinedefIndex,
}

impl EffectLineSlope {
    pub fn new(linedef: LinedefIndex) -> Self {
        Self { linedef }
    }

    /// The sector each plane of `sector` aligns with, if any.
    fn aligned_with(&self, map: &Map, sector: SectorIndex) -> [(PlaneSide, Option<SectorIndex>); 2] {
        let Some(line) = map.linedef(self.linedef) else {
            return [(PlaneSide::Floor, None), (PlaneSide::Ceiling, None)];
        };
        let front = map.front_sector(line);
        let back = map.back_sector(line);

        let other = |arg: i32| match arg {
            1 if front == Some(sector) => back,
            2 if back == Some(sector) => front,
            _ => None,
        };

        [
            (PlaneSide::Floor, other(line.args[0])),
            (PlaneSide::Ceiling, other(line.args[1])),
        ]
    }

    pub fn sources(&self, map: &Map, sector: SectorIndex) -> Vec<EffectSource> {
        let mut sources: Vec<EffectSource> = Vec::new();
        for (_, other) in self.aligned_with(map, sector) {
            if let Some(other) = other {
                if !sources.iter().any(|s| s.sector == other) {
                    sources.push(EffectSource {
                        sector: other,
                        include_neighbours: true,
                    });
                }
            }
        }
        sources
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let map = ctx.map;
        let target = stack.sector();
        let (Some(line), Some(sector)) = (
            map.linedef(self.linedef).and_then(|l| linedef_line(map, l)),
            map.sector(target),
        ) else {
            return;
        };

        // The target's vertex farthest away from the line stays at the
        // target's own height.
        let farthest = map
            .sector_sides(target)
            .into_iter()
            .filter_map(|side| {
                let linedef = map.linedef(side.linedef_idx)?;
                let (start, end) = map.linedef_vertices(linedef)?;
                let v = if side.is_front { start } else { end };
                Some(Vec2::new(v.x, v.y))
            })
            .map(|v| (line.distance_to_sq(v, false), v))
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, v)| v);
        let Some(farthest) = farthest else {
            return;
        };

        for (side, other) in self.aligned_with(map, target) {
            let Some((other, other_sector)) = other.and_then(|o| Some((o, map.sector(o)?))) else {
                continue;
            };
            stack.depend_on(other, true);

            let line_z = side.height(other_sector);
            let plane = Plane3d::from_points(
                at_z(line.start, line_z),
                at_z(line.end, line_z),
                at_z(farthest, side.height(sector)),
                side.is_floor(),
            );

            match plane {
                Some(plane) => *stack.plane_mut(side) = plane,
                None => log::warn!(
                    "Linedef {} can't slope sector {}, its vertices are collinear",
                    self.linedef,
                    target
                ),
            }
        }
    }
}

/// `Plane_Copy`: copies the computed floor and/or ceiling planes of other
/// sectors onto one side of the line.
#[derive(Debug, Clone)]
pub struct EffectPlaneCopySlope {
    linedef: LinedefIndex,
    /// Applies to the line's front sector, otherwise to its back sector.
    front: bool,
}

impl EffectPlaneCopySlope {
    pub fn new(linedef: LinedefIndex, front: bool) -> Self {
        Self { linedef, front }
    }

    /// Which sector each plane is copied from.
    fn copies(&self, map: &Map) -> Vec<(PlaneSide, SectorIndex)> {
        let Some(line) = map.linedef(self.linedef) else {
            return Vec::new();
        };
        let args = line.args;

        // Without a tag, the share bits copy across the line itself.
        let (floor_tag, ceiling_tag, floor_share, ceiling_share, across) = if self.front {
            (args[0], args[1], 2, 8, map.back_sector(line))
        } else {
            (args[2], args[3], 1, 4, map.front_sector(line))
        };

        let pick = |tag: i32, share: i32| {
            if tag != 0 {
                map.sectors_with_tag(tag).next()
            } else if args[4] & share != 0 {
                across
            } else {
                None
            }
        };

        [
            (PlaneSide::Floor, pick(floor_tag, floor_share)),
            (PlaneSide::Ceiling, pick(ceiling_tag, ceiling_share)),
        ]
        .into_iter()
        .filter_map(|(side, sector)| Some((side, sector?)))
        .collect()
    }

    pub fn sources(&self, map: &Map) -> Vec<EffectSource> {
        let mut sources: Vec<EffectSource> = Vec::new();
        for (_, sector) in self.copies(map) {
            if !sources.iter().any(|s| s.sector == sector) {
                sources.push(EffectSource {
                    sector,
                    include_neighbours: true,
                });
            }
        }
        sources
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        for (side, source) in self.copies(ctx.map) {
            if source == stack.sector() {
                continue;
            }
            let Some(sd) = ctx.sector_data.get(source) else {
                continue;
            };
            stack.depend_on(source, true);

            let plane = match side {
                PlaneSide::Floor => sd.floor().plane,
                PlaneSide::Ceiling => sd.ceiling().plane,
            };
            *stack.plane_mut(side) = plane;
        }
    }
}
