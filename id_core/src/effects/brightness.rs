use id_map::{LinedefIndex, Map, SectorIndex};

use crate::{
    helpers::PixelColor,
    sector_data::SectorData,
    sector_level::{LevelId, LightLevelType, SectorLevel, SectorLevelType},
};

use super::{control_source, EffectContext, EffectSource, LevelStack, PlaneSide};

/// Light-only extra floor: a level that only changes the light below it,
/// placed at the control sector's ceiling.
#[derive(Debug, Clone)]
pub struct EffectBrightnessLevel {
    linedef: LinedefIndex,
    light_type: LightLevelType,
    level: LevelId,
    /// Where a [LightLevelType::Type1] light stops.
    bottom: Option<LevelId>,
}

impl EffectBrightnessLevel {
    /// Allocates the light level in `data`, and where a
    /// [LightLevelType::Type1] light stops.
    pub fn new(
        data: &mut SectorData,
        linedef: LinedefIndex,
        control: SectorIndex,
        light_type: LightLevelType,
    ) -> Self {
        let mut level = SectorLevel::new(control, SectorLevelType::Light);
        level.light_type = light_type;
        let level = data.add_sector_level(level);

        let bottom = (light_type == LightLevelType::Type1).then(|| {
            let mut bottom = SectorLevel::new(control, SectorLevelType::Light);
            bottom.light_type = LightLevelType::Type1Bottom;
            data.add_sector_level(bottom)
        });

        Self {
            linedef,
            light_type,
            level,
            bottom,
        }
    }

    pub fn linedef(&self) -> LinedefIndex {
        self.linedef
    }

    pub fn light_type(&self) -> LightLevelType {
        self.light_type
    }

    pub fn sources(&self, map: &Map) -> Vec<EffectSource> {
        control_source(map, self.linedef, false)
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let Some((control, cd)) = ctx.control(self.linedef) else {
            log::warn!(
                "Light level linedef {} in sector {} has no control sector",
                self.linedef,
                stack.sector()
            );
            return;
        };
        stack.depend_on(control, false);

        let mut level = *cd.ceiling();
        level.level_type = SectorLevelType::Light;
        level.light_type = self.light_type;
        level.plane = cd.ceiling().plane.inverted();
        level.extra_floor = false;
        level.split_sides = false;
        level.alpha = 255;
        stack.set_level(self.level, level);

        if let Some(bottom_id) = self.bottom {
            // Below the control sector the real ceiling's light takes over again.
            let ceiling = *stack.ceiling();
            let mut bottom = SectorLevel::new(control, SectorLevelType::Light);
            bottom.light_type = LightLevelType::Type1Bottom;
            bottom.plane = cd.floor().plane;
            bottom.color = ceiling.color;
            bottom.brightness_below = ceiling.brightness_below;
            bottom.color_below = ceiling.color_below;
            stack.set_level(bottom_id, bottom);
        }
    }
}

/// Sets the brightness of one of the target's planes from the control
/// sector's light level, keeping the target's light color.
#[derive(Debug, Clone)]
pub struct EffectTransferBrightness {
    linedef: LinedefIndex,
    side: PlaneSide,
}

impl EffectTransferBrightness {
    pub fn new(linedef: LinedefIndex, side: PlaneSide) -> Self {
        Self { linedef, side }
    }

    pub fn side(&self) -> PlaneSide {
        self.side
    }

    pub fn sources(&self, map: &Map) -> Vec<EffectSource> {
        control_source(map, self.linedef, false)
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let control = ctx
            .map
            .linedef(self.linedef)
            .and_then(|l| ctx.map.front_sector(l));
        let Some(light) = control
            .and_then(|s| ctx.map.sector(s))
            .map(|s| s.light_level)
        else {
            log::warn!(
                "Light transfer linedef {} in sector {} has no control sector",
                self.linedef,
                stack.sector()
            );
            return;
        };
        if let Some(control) = control {
            stack.depend_on(control, false);
        }

        let brightness = PixelColor::from_int(ctx.visual.calculate_brightness(light));
        if let Some(level) = stack.level_mut(self.side.level_id()) {
            level.color = level
                .color_below
                .modulate(brightness)
                .with_alpha(255)
                .to_int();
        }
    }
}
