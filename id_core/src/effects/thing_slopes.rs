use id_map::{Map, ThingIndex};
use ultraviolet::{Vec2, Vec3};

use crate::helpers::{geom::Plane3d, linedef_line};

use super::{at_z, EffectContext, EffectSource, LevelStack, PlaneSide};

/// Copies the computed plane of the first sector tagged by the thing's first
/// argument.
#[derive(Debug, Clone)]
pub struct EffectCopySlope {
    thing: ThingIndex,
    side: PlaneSide,
}

impl EffectCopySlope {
    pub fn new(thing: ThingIndex, side: PlaneSide) -> Self {
        Self { thing, side }
    }

    pub fn sources(&self, map: &Map) -> Vec<EffectSource> {
        map.thing(self.thing)
            .and_then(|t| map.sectors_with_tag(t.args[0]).next())
            .map(|sector| EffectSource {
                sector,
                include_neighbours: true,
            })
            .into_iter()
            .collect()
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let Some(thing) = ctx.map.thing(self.thing) else {
            return;
        };
        let Some((source, sd)) = ctx.tagged(thing.args[0]) else {
            log::warn!(
                "Slope copy thing {} points at tag {}, which no sector has",
                self.thing,
                thing.args[0]
            );
            return;
        };
        if source == stack.sector() {
            return;
        }
        stack.depend_on(source, true);

        *stack.plane_mut(self.side) = match self.side {
            PlaneSide::Floor => sd.floor().plane,
            PlaneSide::Ceiling => sd.ceiling().plane,
        };
    }
}

/// Slopes the plane from one of the sector's lines (picked by line id) up or
/// down to the thing.
#[derive(Debug, Clone)]
pub struct EffectThingLineSlope {
    thing: ThingIndex,
    side: PlaneSide,
}

impl EffectThingLineSlope {
    pub fn new(thing: ThingIndex, side: PlaneSide) -> Self {
        Self { thing, side }
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let map = ctx.map;
        let target = stack.sector();
        let (Some(thing), Some(sector)) = (map.thing(self.thing), map.sector(target)) else {
            return;
        };
        if thing.args[0] == 0 {
            return;
        }

        let line = map
            .sector_sides(target)
            .into_iter()
            .filter_map(|side| map.linedef(side.linedef_idx))
            .find(|linedef| linedef.tag == thing.args[0])
            .and_then(|linedef| linedef_line(map, linedef));
        let Some(line) = line else {
            return;
        };

        let line_z = self.side.height(sector);
        let thing_pos = Vec3::new(thing.x, thing.y, sector.floor_height as f32 + thing.z);

        match Plane3d::from_points(
            at_z(line.start, line_z),
            at_z(line.end, line_z),
            thing_pos,
            self.side.is_floor(),
        ) {
            Some(plane) => *stack.plane_mut(self.side) = plane,
            None => log::warn!("Slope thing {} stands on its own line", self.thing),
        }
    }
}

/// Tilts the plane around the thing: the thing's angle gives the direction,
/// its first argument the pitch in degrees (90 is flat).
#[derive(Debug, Clone)]
pub struct EffectThingSlope {
    thing: ThingIndex,
    side: PlaneSide,
}

impl EffectThingSlope {
    pub fn new(thing: ThingIndex, side: PlaneSide) -> Self {
        Self { thing, side }
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let map = ctx.map;
        let (Some(thing), Some(sector)) = (map.thing(self.thing), map.sector(stack.sector())) else {
            return;
        };

        let mut pitch = thing.args[0].clamp(1, 179) as f32;
        if !self.side.is_floor() {
            pitch += 180.0;
        }
        let pitch = pitch.to_radians();
        let yaw = (thing.angle as f32).to_radians();

        let normal = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.cos() * yaw.sin(),
            pitch.sin(),
        );
        let point = at_z(
            Vec2::new(thing.x, thing.y),
            self.side.height(sector) + thing.z,
        );

        *stack.plane_mut(self.side) = Plane3d::from_point_normal(point, normal);
    }
}
