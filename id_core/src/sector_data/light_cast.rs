use id_map::{Sector, SectorIndex};

use crate::{
    context::VisualContext,
    helpers::PixelColor,
    sector_level::{LevelId, LightLevelType, SectorLevel, SectorLevelType},
};

/// Casts light down through a sorted stack of levels.
///
/// `order` lists the levels from bottom to top. Each level takes its color
/// from the light below the level directly above it, unless it already has
/// one of its own.
pub(super) fn cast_light(
    levels: &mut [SectorLevel],
    order: &[LevelId],
    sector_idx: SectorIndex,
    sector: &Sector,
    ctx: &dyn VisualContext,
) {
    if order.len() < 2 {
        return;
    }
    let count = order.len();

    // A 3D floor can reach above the real ceiling, light starts at the latter.
    let start = (0..count - 1)
        .rev()
        .find(|&i| {
            let level = &levels[order[i].0];
            level.level_type == SectorLevelType::Ceiling && level.sector == sector_idx
        })
        .unwrap_or(count - 2);

    let mut stored = LevelId::CEILING;

    for i in (0..=start).rev() {
        let l_id = order[i];
        let pl_id = order[i + 1];

        if levels[l_id.0].light_type == LightLevelType::Type1 {
            stored = pl_id;
        }

        // A 3D floor that doesn't cast its light down lets the real floor
        // keep its own light.
        if l_id == LevelId::FLOOR
            && count > 2
            && ctx.has_custom_fields()
            && sector.fields.contains_key("lightfloor")
        {
            let pl = &mut levels[pl_id.0];
            if pl.disable_lighting || pl.restrict_lighting {
                let light = sector.fields.get_value("lightfloor", pl.brightness_below);
                pl.brightness_below = if sector.fields.get_value("lightfloorabsolute", false) {
                    light
                } else {
                    sector.light_level + light
                };
            }
        }

        let pl = levels[pl_id.0];
        let stored_level = levels[stored.0];
        let l = &mut levels[l_id.0];

        let light_level_above = !l.is_light() && pl.is_light();

        if l.color == 0 || (l_id == LevelId::FLOOR && count > 2) || light_level_above {
            let brightness = PixelColor::from_int(ctx.calculate_brightness(pl.brightness_below));
            l.color = pl.color_below.modulate(brightness).with_alpha(255).to_int();

            if light_level_above {
                l.brightness_below = pl.brightness_below;
            }
        } else if l.light_type == LightLevelType::Type1Bottom {
            if pl.is_light() && pl.light_type != LightLevelType::Type1 {
                l.brightness_below = pl.brightness_below;
                l.color_below = pl.color_below;
            } else if stored_level.is_light() {
                l.brightness_below = stored_level.brightness_below;
                l.color_below = stored_level.color_below;
            }
        }

        if l.color_below.a == 0 {
            l.color_below = pl.color_below;
        }
        if l.brightness_below == SectorLevel::NO_BRIGHTNESS {
            l.brightness_below = pl.brightness_below;
        }
    }
}
