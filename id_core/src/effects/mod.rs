//! Effects change a sector's levels beyond what the sector itself declares:
//! 3D floors, light-only levels, light transfers and the various ways of
//! sloping a plane.
//!
//! Every effect is re-run, in registration order, each time its sector is
//! recomputed, starting from the sector's plain floor and ceiling. Effects read
//! other sectors' levels through [EffectContext] and report which sectors they
//! read, so that changes there invalidate this sector too.

mod brightness;
mod discovery;
mod floor_3d;
mod line_slopes;
mod thing_slopes;
mod vertex_slopes;

use id_map::{Map, SectorIndex};

use crate::{
    context::VisualContext,
    helpers::geom::Plane3d,
    sector_level::{LevelId, SectorLevel},
    sector_data::{SectorData, SectorDataCache},
};

pub use brightness::*;
pub use discovery::*;
pub use floor_3d::*;
pub use line_slopes::*;
pub use thing_slopes::*;
pub use vertex_slopes::*;

/// Which of a sector's two real planes an effect works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    Floor,
    Ceiling,
}

impl PlaneSide {
    pub fn level_id(&self) -> LevelId {
        match self {
            PlaneSide::Floor => LevelId::FLOOR,
            PlaneSide::Ceiling => LevelId::CEILING,
        }
    }

    pub fn is_floor(&self) -> bool {
        matches!(self, PlaneSide::Floor)
    }

    /// The sector's declared height for this side.
    pub fn height(&self, sector: &id_map::Sector) -> f32 {
        match self {
            PlaneSide::Floor => sector.floor_height as f32,
            PlaneSide::Ceiling => sector.ceiling_height as f32,
        }
    }
}

/// A sector an effect reads from. Changing it must invalidate the sector the
/// effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectSource {
    pub sector: SectorIndex,
    /// Passed on to the geometry rebuild of the dependent sector.
    pub include_neighbours: bool,
}

/// Read-only view of everything an effect may look at while it runs.
pub struct EffectContext<'a> {
    pub map: &'a Map,
    pub sector_data: &'a SectorDataCache,
    pub visual: &'a dyn VisualContext,
}

impl<'a> EffectContext<'a> {
    pub fn new(sector_data: &'a SectorDataCache, visual: &'a dyn VisualContext) -> Self {
        Self {
            map: visual.map(),
            sector_data,
            visual,
        }
    }

    /// The control sector of a linedef (its front sector) and that sector's data.
    pub fn control(&self, linedef: usize) -> Option<(SectorIndex, &'a SectorData)> {
        let sector = self.map.linedef(linedef).and_then(|l| self.map.front_sector(l))?;
        Some((sector, self.sector_data.get(sector)?))
    }

    /// The first sector carrying `tag`, and its data.
    pub fn tagged(&self, tag: i32) -> Option<(SectorIndex, &'a SectorData)> {
        let sector = self.map.sectors_with_tag(tag).next()?;
        Some((sector, self.sector_data.get(sector)?))
    }
}

/// The levels of the sector being recomputed, as effects see them.
pub struct LevelStack<'a> {
    pub(crate) sector: SectorIndex,
    pub(crate) levels: &'a mut [SectorLevel],
    pub(crate) sources: &'a mut Vec<EffectSource>,
}

impl LevelStack<'_> {
    pub fn sector(&self) -> SectorIndex {
        self.sector
    }

    pub fn floor(&self) -> &SectorLevel {
        &self.levels[LevelId::FLOOR.0]
    }

    pub fn ceiling(&self) -> &SectorLevel {
        &self.levels[LevelId::CEILING.0]
    }

    pub fn level_mut(&mut self, id: LevelId) -> Option<&mut SectorLevel> {
        self.levels.get_mut(id.0)
    }

    pub fn set_level(&mut self, id: LevelId, level: SectorLevel) {
        if let Some(slot) = self.levels.get_mut(id.0) {
            *slot = level;
        }
    }

    pub fn plane_mut(&mut self, side: PlaneSide) -> &mut Plane3d {
        &mut self.levels[side.level_id().0].plane
    }

    /// Records that this sector reads from `sector`.
    pub fn depend_on(&mut self, sector: SectorIndex, include_neighbours: bool) {
        self.sources.push(EffectSource {
            sector,
            include_neighbours,
        });
    }
}

pub enum SectorEffect {
    Floor3d(Effect3dFloor),
    BrightnessLevel(EffectBrightnessLevel),
    TransferBrightness(EffectTransferBrightness),
    LineSlope(EffectLineSlope),
    PlaneCopySlope(EffectPlaneCopySlope),
    CopySlope(EffectCopySlope),
    ThingLineSlope(EffectThingLineSlope),
    ThingSlope(EffectThingSlope),
    ThingVertexSlope(EffectThingVertexSlope),
    VertexOffset(EffectVertexOffset),
}

impl SectorEffect {
    /// Applies the effect to the levels being recomputed.
    pub fn update(&self, stack: &mut LevelStack, ctx: &EffectContext) {
        match self {
            SectorEffect::Floor3d(e) => e.update(stack, ctx),
            SectorEffect::BrightnessLevel(e) => e.update(stack, ctx),
            SectorEffect::TransferBrightness(e) => e.update(stack, ctx),
            SectorEffect::LineSlope(e) => e.update(stack, ctx),
            SectorEffect::PlaneCopySlope(e) => e.update(stack, ctx),
            SectorEffect::CopySlope(e) => e.update(stack, ctx),
            SectorEffect::ThingLineSlope(e) => e.update(stack, ctx),
            SectorEffect::ThingSlope(e) => e.update(stack, ctx),
            SectorEffect::ThingVertexSlope(e) => e.update(stack, ctx),
            SectorEffect::VertexOffset(e) => e.update(stack, ctx),
        }
    }

    /// Sectors this effect reads from when applied to `sector`. Their data
    /// is brought up to date before the effect runs.
    pub fn sources(&self, map: &Map, sector: SectorIndex) -> Vec<EffectSource> {
        match self {
            SectorEffect::Floor3d(e) => e.sources(map),
            SectorEffect::BrightnessLevel(e) => e.sources(map),
            SectorEffect::TransferBrightness(e) => e.sources(map),
            SectorEffect::LineSlope(e) => e.sources(map, sector),
            SectorEffect::PlaneCopySlope(e) => e.sources(map),
            SectorEffect::CopySlope(e) => e.sources(map),
            SectorEffect::ThingLineSlope(_)
            | SectorEffect::ThingSlope(_)
            | SectorEffect::ThingVertexSlope(_)
            | SectorEffect::VertexOffset(_) => Vec::new(),
        }
    }

    pub fn as_3d_floor(&self) -> Option<&Effect3dFloor> {
        match self {
            SectorEffect::Floor3d(e) => Some(e),
            _ => None,
        }
    }
}

/// Control sector of a linedef, as an [EffectSource].
fn control_source(map: &Map, linedef: usize, include_neighbours: bool) -> Vec<EffectSource> {
    map.linedef(linedef)
        .and_then(|l| map.front_sector(l))
        .map(|sector| EffectSource {
            sector,
            include_neighbours,
        })
        .into_iter()
        .collect()
}

/// Lifts a 2D point into 3D at the given height.
fn at_z(point: ultraviolet::Vec2, z: f32) -> ultraviolet::Vec3 {
    ultraviolet::Vec3::new(point.x, point.y, z)
}
