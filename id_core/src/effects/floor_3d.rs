use bitflags::bitflags;
use id_map::{LinedefIndex, Map, SectorIndex};

use crate::{
    sector_data::SectorData,
    sector_level::{LevelId, SectorLevel, SectorLevelType},
};

use super::{control_source, EffectContext, EffectSource, LevelStack};

/// Second argument of `Sector_Set3dFloor`, low two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor3dType {
    /// The control sector's floor is the top, its ceiling the bottom.
    Vavoom,
    Solid,
    Swimmable,
    NonSolid,
}

impl Floor3dType {
    pub fn from_arg(arg: i32) -> Self {
        match arg & 3 {
            0 => Floor3dType::Vavoom,
            1 => Floor3dType::Solid,
            2 => Floor3dType::Swimmable,
            _ => Floor3dType::NonSolid,
        }
    }
}

/// Added to the type argument: render the 3D floor's inside too.
pub const FLOOR3D_RENDER_INSIDE: i32 = 4;

bitflags! {
    /// Third argument of `Sector_Set3dFloor`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Floor3dFlags: i32 {
        const DisableLighting = 1;
        const RestrictLighting = 2;
        const Fog = 4;
        const IgnoreBottomHeight = 8;
        const UseUpperTexture = 16;
        const UseLowerTexture = 32;
        const RenderAdditive = 64;
        const Fade = 512;
        const ResetLighting = 1024;
    }
}

/// A 3D floor: a slab copied from a control sector, drawn inside the tagged
/// sector. Contributes a top (floor type, seen from above) and a bottom
/// (ceiling type, seen from below).
#[derive(Debug, Clone)]
pub struct Effect3dFloor {
    linedef: LinedefIndex,
    floor: LevelId,
    ceiling: LevelId,
}

impl Effect3dFloor {
    /// Allocates the two levels of the 3D floor in `data`.
    pub fn new(data: &mut SectorData, linedef: LinedefIndex, control: SectorIndex) -> Self {
        let floor = data.add_sector_level(SectorLevel::new(control, SectorLevelType::Floor));
        let ceiling = data.add_sector_level(SectorLevel::new(control, SectorLevelType::Ceiling));

        Self {
            linedef,
            floor,
            ceiling,
        }
    }

    pub fn linedef(&self) -> LinedefIndex {
        self.linedef
    }

    /// Level of the 3D floor's top surface.
    pub fn floor(&self) -> LevelId {
        self.floor
    }

    /// Level of the 3D floor's bottom surface.
    pub fn ceiling(&self) -> LevelId {
        self.ceiling
    }

    pub fn sources(&self, map: &Map) -> Vec<EffectSource> {
        control_source(map, self.linedef, true)
    }

    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        let (Some(line), Some((control, cd))) = (ctx.map.linedef(self.linedef), ctx.control(self.linedef))
        else {
            log::warn!(
                "3D floor linedef {} in sector {} has no control sector",
                self.linedef,
                stack.sector()
            );
            return;
        };
        stack.depend_on(control, true);

        let (floor, ceiling) = match Floor3dType::from_arg(line.args[1]) {
            Floor3dType::Vavoom => vavoom_levels(cd),
            _ => {
                let render_inside = line.args[1] & FLOOR3D_RENDER_INSIDE != 0;
                let flags = Floor3dFlags::from_bits_truncate(line.args[2]);
                let alpha = line.args[3].clamp(0, 255) as u8;
                levels(cd, flags, alpha, render_inside)
            }
        };

        stack.set_level(self.floor, floor);
        stack.set_level(self.ceiling, ceiling);
    }
}

fn levels(
    cd: &SectorData,
    flags: Floor3dFlags,
    alpha: u8,
    render_inside: bool,
) -> (SectorLevel, SectorLevel) {
    let ignore_bottom_height = flags.contains(Floor3dFlags::IgnoreBottomHeight);
    let render_additive = flags.contains(Floor3dFlags::RenderAdditive);

    // Seen from above, the top of the slab is the control sector's ceiling.
    let mut floor = *cd.ceiling();
    floor.level_type = SectorLevelType::Floor;
    floor.plane = cd.ceiling().plane.inverted();

    let mut ceiling = *cd.floor();
    ceiling.level_type = SectorLevelType::Ceiling;
    ceiling.plane = if ignore_bottom_height {
        cd.ceiling().plane
    } else {
        cd.floor().plane.inverted()
    };

    let clip_sides = !render_inside && !render_additive && alpha > 254 && !ignore_bottom_height;

    for level in [&mut floor, &mut ceiling] {
        level.alpha = alpha;
        level.extra_floor = true;
        level.light_type = Default::default();
    }
    floor.split_sides = !clip_sides;
    ceiling.split_sides = !clip_sides && !ignore_bottom_height;

    let disable_lighting = flags.contains(Floor3dFlags::DisableLighting);
    let restrict_lighting = flags.contains(Floor3dFlags::RestrictLighting);
    floor.reset_lighting = flags.contains(Floor3dFlags::ResetLighting);

    if disable_lighting || restrict_lighting {
        floor.disable_lighting = disable_lighting;
        floor.restrict_lighting = restrict_lighting;
        if disable_lighting {
            floor.clear_lighting();
        }

        // The bottom takes whatever light reaches it from above.
        ceiling.disable_lighting = disable_lighting;
        ceiling.restrict_lighting = restrict_lighting;
        ceiling.clear_lighting();
    }

    (floor, ceiling)
}

fn vavoom_levels(cd: &SectorData) -> (SectorLevel, SectorLevel) {
    let mut floor = *cd.floor();
    floor.level_type = SectorLevelType::Floor;

    let mut ceiling = *cd.ceiling();
    ceiling.level_type = SectorLevelType::Ceiling;

    for level in [&mut floor, &mut ceiling] {
        level.alpha = 255;
        level.extra_floor = true;
        level.split_sides = false;
        level.light_type = Default::default();
    }

    (floor, ceiling)
}
