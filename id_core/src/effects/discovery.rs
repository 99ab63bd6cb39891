use id_game_config::{GameConfig, GameFeatures, LineEffectKind, TagSource, ThingEffectKind};
use id_map::{SectorIndex, ThingIndex};
use multimap::MultiMap;
use ultraviolet::Vec2;

use crate::{context::VisualContext, helpers::sector_at, sector_data::SectorDataCache};

use super::{vertex_slopes::triangle_vertices, PlaneSide};

/// Scans the map for lines, things and vertices that change sector levels
/// and registers their effects, in that order. Returns how many effects were
/// registered.
pub fn init_sector_effects(
    cache: &mut SectorDataCache,
    ctx: &dyn VisualContext,
    config: &GameConfig,
) -> usize {
    let map = ctx.map();
    let mut count = 0;

    let mut tagged: MultiMap<i32, SectorIndex> = MultiMap::new();
    for (i, sector) in map.sectors.iter().enumerate() {
        for &tag in sector.tags.iter().filter(|&&tag| tag != 0) {
            tagged.insert(tag, i);
        }
    }

    let extra_floors = config.features.contains(GameFeatures::ExtraFloors);

    for (i, line) in map.linedefs.iter().enumerate() {
        let Some(effect) = config.line_effect(line.action) else {
            continue;
        };
        let tag = match effect.tag {
            TagSource::Arg0 => line.args[0],
            TagSource::LineTag => line.tag,
        };
        let targets = tagged.get_vec(&tag).cloned().unwrap_or_default();

        match effect.effect {
            LineEffectKind::Floor3d | LineEffectKind::BrightnessLevel if !extra_floors => {}
            LineEffectKind::Floor3d => {
                for &sector in &targets {
                    if cache.add_effect_3d_floor(ctx, sector, i) {
                        count += 1;
                    }
                }
            }
            LineEffectKind::BrightnessLevel => {
                for &sector in &targets {
                    if cache.add_effect_brightness_level(ctx, sector, i) {
                        count += 1;
                    }
                }
            }
            LineEffectKind::TransferFloorBrightness => {
                for &sector in &targets {
                    cache.add_effect_transfer_floor_brightness(ctx, sector, i);
                    count += 1;
                }
            }
            LineEffectKind::TransferCeilingBrightness => {
                for &sector in &targets {
                    cache.add_effect_transfer_ceiling_brightness(ctx, sector, i);
                    count += 1;
                }
            }
            LineEffectKind::LineSlope => {
                for sector in [map.front_sector(line), map.back_sector(line)]
                    .into_iter()
                    .flatten()
                {
                    cache.add_effect_line_slope(ctx, sector, i);
                    count += 1;
                }
            }
            LineEffectKind::PlaneCopySlope => {
                if let Some(front) = map.front_sector(line) {
                    cache.add_effect_plane_copy_slope(ctx, front, i, true);
                    count += 1;
                }
                if let Some(back) = map.back_sector(line) {
                    cache.add_effect_plane_copy_slope(ctx, back, i, false);
                    count += 1;
                }
            }
        }

        if targets.is_empty()
            && !matches!(
                effect.effect,
                LineEffectKind::LineSlope | LineEffectKind::PlaneCopySlope
            )
        {
            log::warn!("Linedef {} targets tag {}, which no sector has", i, tag);
        }
    }

    let mut vertex_things: Vec<(ThingIndex, PlaneSide)> = Vec::new();

    for (i, thing) in map.things.iter().enumerate() {
        let Some(effect) = config.thing_effect(thing.thing_type) else {
            continue;
        };

        let side = match effect.effect {
            ThingEffectKind::CopySlopeFloor
            | ThingEffectKind::LineSlopeFloor
            | ThingEffectKind::TiltFloor
            | ThingEffectKind::VertexSlopeFloor => PlaneSide::Floor,
            _ => PlaneSide::Ceiling,
        };

        // Vertex things sit on sector corners, they are matched up below.
        if matches!(
            effect.effect,
            ThingEffectKind::VertexSlopeFloor | ThingEffectKind::VertexSlopeCeiling
        ) {
            vertex_things.push((i, side));
            continue;
        }

        let Some(sector) = sector_at(map, Vec2::new(thing.x, thing.y)) else {
            log::warn!("Slope thing {} is outside of every sector", i);
            continue;
        };

        match effect.effect {
            ThingEffectKind::CopySlopeFloor | ThingEffectKind::CopySlopeCeiling => {
                cache.add_effect_copy_slope(ctx, sector, i, side)
            }
            ThingEffectKind::LineSlopeFloor | ThingEffectKind::LineSlopeCeiling => {
                cache.add_effect_thing_line_slope(ctx, sector, i, side)
            }
            _ => cache.add_effect_thing_slope(ctx, sector, i, side),
        }
        count += 1;
    }

    let vertex_offsets =
        config.features.contains(GameFeatures::VertexHeights) && ctx.has_custom_fields();

    for sector in 0..map.sectors.len() {
        let Some(vertices) = triangle_vertices(map, sector) else {
            continue;
        };
        let on_corner = |thing: ThingIndex| {
            map.thing(thing).is_some_and(|t| {
                vertices
                    .iter()
                    .any(|v| t.x.round() == v.x.round() && t.y.round() == v.y.round())
            })
        };

        for side in [PlaneSide::Floor, PlaneSide::Ceiling] {
            let things: Vec<ThingIndex> = vertex_things
                .iter()
                .filter(|(thing, s)| *s == side && on_corner(*thing))
                .map(|(thing, _)| *thing)
                .collect();
            if !things.is_empty() {
                cache.add_effect_thing_vertex_slope(ctx, sector, things, side);
                count += 1;
            }
        }

        if vertex_offsets
            && vertices
                .iter()
                .any(|v| v.z_floor.is_some() || v.z_ceiling.is_some())
        {
            cache.add_effect_vertex_offset(ctx, sector);
            count += 1;
        }
    }

    count
}
