use id_map::{Map, SectorIndex, ThingIndex, Vertex};
use ultraviolet::Vec3;

use crate::helpers::geom::Plane3d;

use super::{EffectContext, LevelStack, PlaneSide};

/// Corners of a triangular sector, one per side, in side order.
pub(super) fn triangle_vertices(map: &Map, sector: SectorIndex) -> Option<[Vertex; 3]> {
    let sides = map.sector_sides(sector);
    if sides.len() != 3 {
        return None;
    }

    let mut vertices = [Vertex::default(); 3];
    for (vertex, side) in vertices.iter_mut().zip(sides) {
        let linedef = map.linedef(side.linedef_idx)?;
        let (start, end) = map.linedef_vertices(linedef)?;
        *vertex = if side.is_front { end } else { start };
    }
    Some(vertices)
}

fn triangle_plane(points: [Vec3; 3], side: PlaneSide) -> Option<Plane3d> {
    Plane3d::from_points(points[0], points[1], points[2], side.is_floor())
}

/// Vertex height things: each corner of a triangular sector is raised to
/// the height of the thing standing on it.
#[derive(Debug, Clone)]
pub struct EffectThingVertexSlope {
    things: Vec<ThingIndex>,
    side: PlaneSide,
}

impl EffectThingVertexSlope {
    pub fn new(things: Vec<ThingIndex>, side: PlaneSide) -> Self {
        Self { things, side }
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let map = ctx.map;
        let target = stack.sector();
        let (Some(vertices), Some(sector)) = (triangle_vertices(map, target), map.sector(target))
        else {
            return;
        };
        let height = self.side.height(sector);

        // The thing's z is the absolute height of the corner.
        let points = vertices.map(|v| {
            let z = self
                .things
                .iter()
                .filter_map(|&t| map.thing(t))
                .find(|t| t.x.round() == v.x.round() && t.y.round() == v.y.round())
                .map(|t| t.z)
                .unwrap_or(height);
            Vec3::new(v.x, v.y, z)
        });

        if let Some(plane) = triangle_plane(points, self.side) {
            *stack.plane_mut(self.side) = plane;
        }
    }
}

/// UDMF `zfloor` / `zceiling` on the corners of a triangular sector.
#[derive(Debug, Clone, Default)]
pub struct EffectVertexOffset;

impl EffectVertexOffset {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let map = ctx.map;
        let target = stack.sector();
        let (Some(vertices), Some(sector)) = (triangle_vertices(map, target), map.sector(target))
        else {
            return;
        };

        for side in [PlaneSide::Floor, PlaneSide::Ceiling] {
            let offset = |v: &Vertex| match side {
                PlaneSide::Floor => v.z_floor,
                PlaneSide::Ceiling => v.z_ceiling,
            };
            if !vertices.iter().any(|v| offset(v).is_some()) {
                continue;
            }

            let height = side.height(sector);
            let points = vertices.map(|v| Vec3::new(v.x, v.y, offset(&v).unwrap_or(height)));
            if let Some(plane) = triangle_plane(points, side) {
                *stack.plane_mut(side) = plane;
            }
        }
    }
}
