use id_map::{LinedefIndex, Map, MapFormat, Sector, SectorIndex};
use ultraviolet::{Vec2, Vec3};

use super::*;
use crate::{
    effects::Floor3dFlags,
    sector_level::LightLevelType,
    testing::{add_rect_sector, TestContext},
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn sector(floor: i32, ceiling: i32, light: i32) -> Sector {
    Sector {
        floor_height: floor,
        ceiling_height: ceiling,
        light_level: light,
        ..Default::default()
    }
}

fn gray(level: u8) -> i32 {
    PixelColor::gray(level).to_int()
}

/// Adds a control sector off to the side, with its first line set up as
/// `action` with `args`.
fn add_control(
    map: &mut Map,
    index: usize,
    sector: Sector,
    action: u16,
    args: [i32; 5],
) -> LinedefIndex {
    let x = 1024.0 + index as f32 * 256.0;
    let control = add_rect_sector(map, x, 0.0, x + 64.0, 64.0, sector);
    let line = map.sector_sides(control)[0].linedef_idx;
    map.linedefs[line].action = action;
    map.linedefs[line].args = args;
    line
}

fn heights(data: &SectorData, pos: Vec2) -> Vec<f32> {
    data.light_levels().map(|l| l.z_at(pos)).collect()
}

fn at(z: f32) -> Vec3 {
    Vec3::new(64.0, 64.0, z)
}

#[test]
fn plain_sector() {
    let mut map = Map::new("MAP01", MapFormat::Doom);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 128.0, 128.0, sector(16, 200, 144));
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();

    let data = cache.sector_data(&ctx, target);
    assert!(data.is_updated());
    assert_eq!(data.light_levels().count(), 2);
    assert_eq!(data.floor().plane, Plane3d::flat_floor(16.0));
    assert_eq!(data.ceiling().plane, Plane3d::flat_ceiling(200.0));
    assert_eq!(data.floor().color, gray(144));
    assert_eq!(data.ceiling().brightness_below, 144);
    assert_eq!(data.ceiling().color_below, PixelColor::WHITE);
}

#[test]
fn sloped_and_degenerate_planes() {
    let mut map = Map::new("MAP01", MapFormat::Udmf);
    let target = add_rect_sector(
        &mut map,
        0.0,
        0.0,
        128.0,
        128.0,
        Sector {
            // z = x / 2
            floor_slope: Vec3::new(-0.5, 0.0, 1.0),
            floor_slope_offset: 0.0,
            // Vertical, no height anywhere.
            ceiling_slope: Vec3::new(1.0, 0.0, 0.0),
            ceiling_slope_offset: 10.0,
            ..sector(0, 128, 160)
        },
    );
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();

    let data = cache.sector_data(&ctx, target);
    assert!(close(data.floor().z_at(Vec2::new(64.0, 3.0)), 32.0));
    assert_eq!(data.ceiling().plane, Plane3d::flat_ceiling(128.0));
}

#[test]
fn light_fields() {
    let mut map = Map::new("MAP01", MapFormat::Udmf);
    let mut target_sector = sector(0, 128, 160);
    target_sector.fields.set("lightcolor", 0x00FF0000);
    target_sector.fields.set("lightfloor", 16);
    target_sector.fields.set("lightceiling", 64);
    target_sector.fields.set("lightceilingabsolute", true);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 128.0, 128.0, target_sector);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();

    let data = cache.sector_data(&ctx, target);
    assert_eq!(data.floor().color, PixelColor::new(255, 176, 0, 0).to_int());
    assert_eq!(data.ceiling().color, PixelColor::new(255, 64, 0, 0).to_int());
    assert_eq!(data.floor().brightness_below, 160);
    assert_eq!(data.floor().color_below, PixelColor::new(255, 255, 0, 0));
}

#[test]
fn recompute_is_idempotent() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    add_control(&mut map, 0, sector(64, 128, 100), 160, [1, 1, 0, 255, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let first: Vec<SectorLevel> = cache.sector_data(&ctx, target).light_levels().copied().collect();
    cache.update_forced(&ctx, target);
    let second: Vec<SectorLevel> = cache.sector_data(&ctx, target).light_levels().copied().collect();

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn reset_matches_fresh_data() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    add_control(&mut map, 0, sector(64, 128, 100), 160, [1, 1, 0, 255, 0]);
    add_control(&mut map, 1, sector(0, 192, 120), 50, [1, 0, 0, 0, 0]);
    let mut ctx = TestContext::new(map);

    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);
    cache.sector_data(&ctx, target);
    cache.reset(&mut ctx, target);
    assert!(!cache.get(target).is_some_and(|d| d.is_updated()));
    let reset: Vec<SectorLevel> = cache.sector_data(&ctx, target).light_levels().copied().collect();

    let mut fresh_cache = SectorDataCache::default();
    init_effects(&mut fresh_cache, &ctx);
    let fresh: Vec<SectorLevel> = fresh_cache
        .sector_data(&ctx, target)
        .light_levels()
        .copied()
        .collect();

    assert_eq!(reset, fresh);
}

#[test]
fn equal_heights_keep_registration_order() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 128, 200)
    });
    add_control(&mut map, 0, sector(0, 64, 100), 50, [1, 0, 0, 0, 0]);
    add_control(&mut map, 1, sector(0, 64, 50), 50, [1, 0, 0, 0, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(heights(data, Vec2::new(64.0, 64.0)), vec![0.0, 64.0, 64.0, 128.0]);

    let ids: Vec<usize> = data.light_level_ids().iter().map(|id| id.index()).collect();
    assert_eq!(ids, vec![0, 2, 3, 1]);
}

#[test]
fn light_casts_down_from_level_above() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    add_control(&mut map, 0, sector(0, 128, 100), 50, [1, 0, 0, 0, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(data.floor().color, gray(100));
    assert_eq!(data.floor().brightness_below, 100);
    assert_eq!(data.ceiling().color, gray(200));

    let light = data.level_above(at(64.0)).unwrap();
    assert!(light.is_light());
    assert_eq!(light.brightness_below, 100);
}

#[test]
fn type1_light_stops_at_control_floor() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    add_control(&mut map, 0, sector(64, 192, 100), 50, [1, 1, 0, 0, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(heights(data, Vec2::new(64.0, 64.0)), vec![0.0, 64.0, 192.0, 256.0]);

    let inside = data.level_above(at(100.0)).unwrap();
    assert_eq!(inside.light_type, LightLevelType::Type1);
    assert_eq!(inside.brightness_below, 100);

    let below = data.level_above(at(32.0)).unwrap();
    assert_eq!(below.light_type, LightLevelType::Type1Bottom);
    assert_eq!(below.brightness_below, 200);
    assert_eq!(data.floor().color, gray(200));
}

#[test]
fn floor_light_under_unlit_3d_floor() {
    let mut map = Map::new("MAP01", MapFormat::Udmf);
    let mut target_sector = Sector {
        tags: vec![1],
        ..sector(0, 256, 160)
    };
    target_sector.fields.set("lightfloor", 200);
    target_sector.fields.set("lightfloorabsolute", true);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, target_sector);
    let flags = Floor3dFlags::DisableLighting.bits();
    add_control(&mut map, 0, sector(64, 96, 100), 160, [1, 1, flags, 255, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(heights(data, Vec2::new(64.0, 64.0)), vec![0.0, 64.0, 96.0, 256.0]);

    let bottom = data.level_above(at(32.0)).unwrap();
    assert_eq!(bottom.level_type, SectorLevelType::Ceiling);
    assert_eq!(bottom.brightness_below, 200);
    assert_eq!(bottom.color, gray(160));
    assert_eq!(data.floor().color, gray(200));
}

#[test]
fn extra_floor_levels() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    let control = map.sectors.len();
    add_control(&mut map, 0, sector(64, 128, 100), 160, [1, 1, 0, 255, 0]);
    let mut ctx = TestContext::new(map);
    ctx.visual_sectors.insert(target);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    let top = data.floor_below(at(200.0)).unwrap();
    assert!(top.extra_floor);
    assert_eq!(top.sector, control);
    assert!(close(top.z_at(Vec2::new(10.0, 10.0)), 128.0));
    assert!(top.plane.normal.z > 0.0);

    let bottom = data.ceiling_above(at(32.0)).unwrap();
    assert!(bottom.extra_floor);
    assert!(close(bottom.z_at(Vec2::new(10.0, 10.0)), 64.0));
    assert!(bottom.plane.normal.z < 0.0);
    // The control sector's light reaches down to the real floor.
    assert_eq!(top.color, gray(100));
    assert_eq!(data.floor().color, gray(100));

    // Raising the control sector moves the 3D floor.
    ctx.map.sectors[control].ceiling_height = 160;
    cache.reset(&mut ctx, control);
    assert_eq!(ctx.rebuilt, vec![(target, false)]);

    let data = cache.sector_data(&ctx, target);
    let top = data.floor_below(at(200.0)).unwrap();
    assert!(close(top.z_at(Vec2::new(10.0, 10.0)), 160.0));
}

#[test]
fn transfer_floor_brightness() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    let control = map.sectors.len();
    add_control(&mut map, 0, sector(0, 64, 80), 210, [1, 0, 0, 0, 0]);
    let mut ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(data.floor().color, gray(80));
    assert_eq!(data.ceiling().color, gray(200));

    ctx.map.sectors[control].light_level = 40;
    cache.reset(&mut ctx, control);
    assert_eq!(cache.sector_data(&ctx, target).floor().color, gray(40));
}

/// Two 128x128 sectors side by side, `front` on the left and `back` on the
/// right of the line at x = 128 they share.
fn add_split_sectors(
    map: &mut Map,
    front: Sector,
    back: Sector,
) -> (SectorIndex, SectorIndex, LinedefIndex) {
    let front = map.add_sector(front);
    let back = map.add_sector(back);

    let a = map.add_vertex(0.0, 0.0);
    let b = map.add_vertex(0.0, 128.0);
    let c = map.add_vertex(128.0, 128.0);
    let d = map.add_vertex(128.0, 0.0);
    let e = map.add_vertex(256.0, 128.0);
    let f = map.add_vertex(256.0, 0.0);

    map.add_linedef(a, b, Some(front), None);
    map.add_linedef(b, c, Some(front), None);
    let shared = map.add_linedef(c, d, Some(front), Some(back));
    map.add_linedef(d, a, Some(front), None);
    map.add_linedef(c, e, Some(back), None);
    map.add_linedef(e, f, Some(back), None);
    map.add_linedef(f, d, Some(back), None);

    (front, back, shared)
}

#[test]
fn line_slope_meets_other_side() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let (target, other, shared) =
        add_split_sectors(&mut map, sector(0, 256, 160), sector(64, 256, 160));
    map.linedefs[shared].action = 181;
    map.linedefs[shared].args = [1, 0, 0, 0, 0];

    let mut ctx = TestContext::new(map);
    ctx.visual_sectors.insert(target);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert!(close(data.floor().z_at(Vec2::new(0.0, 64.0)), 0.0));
    assert!(close(data.floor().z_at(Vec2::new(64.0, 10.0)), 32.0));
    assert!(close(data.floor().z_at(Vec2::new(128.0, 100.0)), 64.0));
    assert_eq!(data.ceiling().plane, Plane3d::flat_ceiling(256.0));

    // The other side isn't sloped, it has nothing to align with.
    assert_eq!(
        cache.sector_data(&ctx, other).floor().plane,
        Plane3d::flat_floor(64.0)
    );
    assert_eq!(cache.get(other).map(|d| d.update_also().get(&target)), Some(Some(&true)));

    cache.reset(&mut ctx, other);
    assert_eq!(ctx.rebuilt, vec![(target, false)]);
}

#[test]
fn point_queries() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    add_control(&mut map, 0, sector(0, 128, 100), 50, [1, 0, 0, 0, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);
    let data = cache.sector_data(&ctx, target);
    let z = |level: Option<&SectorLevel>| level.map(|l| l.z_at(Vec2::new(64.0, 64.0)));

    assert_eq!(z(data.level_above(at(64.0))), Some(128.0));
    assert_eq!(z(data.level_below(at(64.0))), Some(0.0));
    assert_eq!(z(data.level_above(at(300.0))), None);
    assert_eq!(z(data.level_below(at(-1.0))), None);

    assert_eq!(z(data.level_above(at(128.0))), Some(256.0));
    assert_eq!(z(data.level_above_or_at(at(128.0))), Some(128.0));
    assert_eq!(z(data.ceiling_above(at(64.0))), Some(256.0));
    assert_eq!(z(data.floor_below(at(200.0))), Some(0.0));
    assert_eq!(z(data.floor_below(at(0.0))), None);
}

#[test]
fn cyclic_dependencies() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let first = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    let second = add_rect_sector(&mut map, 512.0, 0.0, 768.0, 256.0, Sector {
        tags: vec![2],
        ..sector(0, 256, 100)
    });
    // Each sector controls a 3D floor in the other.
    let line = map.sector_sides(second)[0].linedef_idx;
    map.linedefs[line].action = 160;
    map.linedefs[line].args = [1, 1, 0, 255, 0];
    let line = map.sector_sides(first)[0].linedef_idx;
    map.linedefs[line].action = 160;
    map.linedefs[line].args = [2, 1, 0, 255, 0];

    let mut ctx = TestContext::new(map);
    ctx.visual_sectors.extend([first, second]);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    assert_eq!(cache.sector_data(&ctx, first).light_levels().count(), 4);
    assert!(cache.get(second).is_some_and(|d| d.is_updated()));

    cache.reset(&mut ctx, first);
    assert_eq!(ctx.rebuilt, vec![(first, false), (second, false)]);
    assert!(!cache.get(first).is_some_and(|d| d.is_updated()));
    assert!(!cache.get(second).is_some_and(|d| d.is_updated()));

    assert_eq!(cache.sector_data(&ctx, second).light_levels().count(), 4);
}

#[test]
fn plane_copy_from_tagged_sector() {
    let mut map = Map::new("MAP01", MapFormat::Udmf);
    let (target, _, shared) =
        add_split_sectors(&mut map, sector(0, 256, 160), sector(0, 256, 160));
    let source = add_rect_sector(&mut map, 512.0, 0.0, 640.0, 128.0, Sector {
        tags: vec![3],
        // z = x / 2
        floor_slope: Vec3::new(-0.5, 0.0, 1.0),
        floor_slope_offset: 0.0,
        ..sector(0, 512, 160)
    });
    map.linedefs[shared].action = 118;
    map.linedefs[shared].args = [3, 0, 0, 0, 0];

    let mut ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let source_floor = cache.sector_data(&ctx, source).floor().plane;
    let data = cache.sector_data(&ctx, target);
    assert_eq!(data.floor().plane, source_floor);
    assert!(close(data.floor().z_at(Vec2::new(64.0, 0.0)), 32.0));
    assert_eq!(data.ceiling().plane, Plane3d::flat_ceiling(256.0));

    ctx.map.sectors[source].floor_slope_offset = -16.0;
    cache.reset(&mut ctx, source);
    let floor = cache.sector_data(&ctx, target).floor().plane;
    assert!(close(floor.z_at(Vec2::new(64.0, 0.0)), 48.0));
}

#[test]
fn plane_copy_shares_across_line() {
    let mut map = Map::new("MAP01", MapFormat::Udmf);
    let (front, back, shared) = add_split_sectors(
        &mut map,
        Sector {
            // z = 200 + x / 2
            ceiling_slope: Vec3::new(0.5, 0.0, -1.0),
            ceiling_slope_offset: 200.0,
            ..sector(0, 256, 160)
        },
        Sector {
            // z = x / 2
            floor_slope: Vec3::new(-0.5, 0.0, 1.0),
            floor_slope_offset: 0.0,
            ..sector(0, 300, 160)
        },
    );
    map.linedefs[shared].action = 118;
    // Back floor to front, front ceiling to back.
    map.linedefs[shared].args = [0, 0, 0, 0, 2 | 4];

    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    assert_eq!(init_effects(&mut cache, &ctx), 2);

    let data = cache.sector_data(&ctx, front);
    assert!(close(data.floor().z_at(Vec2::new(64.0, 0.0)), 32.0));
    assert!(close(data.ceiling().z_at(Vec2::new(64.0, 0.0)), 232.0));

    let data = cache.sector_data(&ctx, back);
    assert!(close(data.floor().z_at(Vec2::new(192.0, 0.0)), 96.0));
    assert!(close(data.ceiling().z_at(Vec2::new(192.0, 0.0)), 296.0));
}

#[test]
fn vavoom_3d_floor_keeps_control_planes() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    let control = map.sectors.len();
    add_control(&mut map, 0, sector(64, 128, 100), 160, [1, 0, 0, 255, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(heights(data, Vec2::new(64.0, 64.0)), vec![0.0, 64.0, 128.0, 256.0]);

    // The control floor is the top, the control ceiling the bottom.
    let top = data.floor_below(at(100.0)).unwrap();
    assert_eq!(top.sector, control);
    assert!(top.extra_floor);
    assert_eq!(top.plane, Plane3d::flat_floor(64.0));
    assert_eq!(top.color, gray(100));

    let bottom = data.ceiling_above(at(100.0)).unwrap();
    assert_eq!(bottom.plane, Plane3d::flat_ceiling(128.0));
    assert!(!bottom.split_sides);

    assert_eq!(data.floor().color, gray(100));
}

#[test]
fn relative_floor_light_under_restricted_3d_floor() {
    let mut map = Map::new("MAP01", MapFormat::Udmf);
    let mut target_sector = Sector {
        tags: vec![1],
        ..sector(0, 256, 160)
    };
    target_sector.fields.set("lightfloor", 16);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, target_sector);
    let flags = Floor3dFlags::RestrictLighting.bits();
    add_control(&mut map, 0, sector(64, 96, 100), 160, [1, 1, flags, 255, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    let top = data.floor_below(at(200.0)).unwrap();
    assert!(top.restrict_lighting);
    assert_eq!(top.color, gray(100));

    // The bottom is lit from the top, but passes the sector's own
    // light + 16 down to the floor.
    let bottom = data.level_above(at(32.0)).unwrap();
    assert!(bottom.restrict_lighting);
    assert_eq!(bottom.color, gray(100));
    assert_eq!(bottom.brightness_below, 176);
    assert_eq!(data.floor().color, gray(176));
}

#[test]
fn type1_bottom_takes_light_from_level_inside() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    add_control(&mut map, 0, sector(64, 192, 100), 50, [1, 1, 0, 0, 0]);
    add_control(&mut map, 1, sector(0, 128, 50), 50, [1, 0, 0, 0, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(
        heights(data, Vec2::new(64.0, 64.0)),
        vec![0.0, 64.0, 128.0, 192.0, 256.0]
    );

    let inner = data.level_above(at(100.0)).unwrap();
    assert_eq!(inner.light_type, LightLevelType::Type0);
    assert_eq!(inner.brightness_below, 50);

    let bottom = data.level_above(at(32.0)).unwrap();
    assert_eq!(bottom.light_type, LightLevelType::Type1Bottom);
    assert_eq!(bottom.brightness_below, 50);
    assert_eq!(data.floor().color, gray(50));
    assert_eq!(data.floor().brightness_below, 50);
}

#[test]
fn light_starts_at_real_ceiling() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 128, 200)
    });
    let flags = Floor3dFlags::DisableLighting.bits();
    add_control(&mut map, 0, sector(160, 192, 100), 160, [1, 1, flags, 255, 0]);
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);

    let data = cache.sector_data(&ctx, target);
    assert_eq!(heights(data, Vec2::new(64.0, 64.0)), vec![0.0, 128.0, 160.0, 192.0]);

    // Above the real ceiling nothing is lit.
    let above = data.level_above(at(140.0)).unwrap();
    assert_eq!(above.level_type, SectorLevelType::Ceiling);
    assert_eq!(above.color, 0);
    assert_eq!(above.brightness_below, SectorLevel::NO_BRIGHTNESS);

    assert_eq!(data.ceiling().color, gray(200));
    assert_eq!(data.floor().color, gray(200));
}

#[test]
fn slopes_need_plane_equations() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 128.0, 128.0, Sector {
        floor_slope: Vec3::new(-0.5, 0.0, 1.0),
        floor_slope_offset: 0.0,
        ..sector(16, 128, 160)
    });
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();

    assert_eq!(cache.sector_data(&ctx, target).floor().plane, Plane3d::flat_floor(16.0));
}

#[test]
fn control_sector_required() {
    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    let a = map.add_vertex(512.0, 0.0);
    let b = map.add_vertex(512.0, 64.0);
    let floor_line = map.add_linedef(a, b, None, Some(target));
    map.linedefs[floor_line].action = 160;
    map.linedefs[floor_line].args = [1, 1, 0, 255, 0];
    let light_line = map.add_linedef(b, a, None, Some(target));
    map.linedefs[light_line].action = 50;
    map.linedefs[light_line].args = [1, 0, 0, 0, 0];

    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    assert_eq!(init_effects(&mut cache, &ctx), 0);
    assert!(!cache.add_effect_3d_floor(&ctx, target, floor_line));

    let data = cache.sector_data(&ctx, target);
    assert_eq!(heights(data, Vec2::new(64.0, 64.0)), vec![0.0, 256.0]);
    assert!(data.effects().is_empty());
}

#[test]
fn cyclic_3d_floors_read_baseline() {
    fn stacks(
        cache: &mut SectorDataCache,
        ctx: &TestContext,
        sectors: [usize; 2],
    ) -> Vec<Vec<SectorLevel>> {
        cache.sector_data(ctx, sectors[0]);
        sectors
            .iter()
            .map(|&s| cache.sector_data(ctx, s).light_levels().copied().collect())
            .collect()
    }

    let mut map = Map::new("MAP01", MapFormat::Hexen);
    let first = add_rect_sector(&mut map, 0.0, 0.0, 256.0, 256.0, Sector {
        tags: vec![1],
        ..sector(0, 256, 200)
    });
    let second = add_rect_sector(&mut map, 512.0, 0.0, 768.0, 256.0, Sector {
        tags: vec![2],
        ..sector(0, 192, 100)
    });
    let line = map.sector_sides(second)[0].linedef_idx;
    map.linedefs[line].action = 160;
    map.linedefs[line].args = [1, 1, 0, 255, 0];
    let line = map.sector_sides(first)[0].linedef_idx;
    map.linedefs[line].action = 160;
    map.linedefs[line].args = [2, 1, 0, 255, 0];

    let mut ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();
    init_effects(&mut cache, &ctx);
    let center = Vec2::new(64.0, 64.0);

    // Second is computed while first is still in progress, and sees
    // first's own ceiling as the top of the 3D floor.
    cache.sector_data(&ctx, first);
    let data = cache.get(second).unwrap();
    assert!(data.is_updated());
    assert_eq!(heights(data, center), vec![0.0, 0.0, 192.0, 256.0]);
    assert_eq!(heights(cache.get(first).unwrap(), center), vec![0.0, 0.0, 192.0, 256.0]);

    ctx.map.sectors[first].ceiling_height = 300;
    cache.reset(&mut ctx, first);
    let after = stacks(&mut cache, &ctx, [first, second]);
    assert_eq!(heights(cache.get(second).unwrap(), center), vec![0.0, 0.0, 192.0, 300.0]);

    let mut fresh_cache = SectorDataCache::default();
    init_effects(&mut fresh_cache, &ctx);
    assert_eq!(after, stacks(&mut fresh_cache, &ctx, [first, second]));
}

#[test]
fn dependencies_are_overwritten() {
    let mut data = SectorData::new(0);
    data.add_update_sector(3, true);
    data.add_update_sector(5, false);
    data.add_update_sector(3, false);

    assert_eq!(data.update_also().get(&3), Some(&false));
    assert_eq!(data.update_also().keys().copied().collect::<Vec<_>>(), vec![3, 5]);
}

#[test]
fn changed_flags_accumulate() {
    let mut map = Map::new("MAP01", MapFormat::Doom);
    let target = add_rect_sector(&mut map, 0.0, 0.0, 64.0, 64.0, sector(0, 128, 160));
    let ctx = TestContext::new(map);
    let mut cache = SectorDataCache::default();

    let data = cache.get_or_create(target);
    data.set_floor_changed(true);
    data.set_floor_changed(false);
    assert!(data.floor_changed());
    assert!(!data.ceiling_changed());

    cache.update(&ctx, target);
    assert!(cache.get(target).is_some_and(|d| !d.floor_changed()));
}

#[test]
fn missing_sector_uses_defaults() {
    let ctx = TestContext::new(Map::new("MAP01", MapFormat::Doom));
    let mut cache = SectorDataCache::default();

    let data = cache.sector_data(&ctx, 12);
    assert_eq!(data.floor().plane, Plane3d::flat_floor(0.0));
    assert_eq!(data.ceiling().plane, Plane3d::flat_ceiling(0.0));
}

fn init_effects(cache: &mut SectorDataCache, ctx: &TestContext) -> usize {
    let config = id_game_config::GameConfig::from_game(id_game_config::Game::from_map_format(
        ctx.map.format,
    ))
    .unwrap();
    crate::effects::init_sector_effects(cache, ctx, &config)
}
