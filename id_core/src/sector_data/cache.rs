use std::collections::{HashMap, HashSet};

use id_map::{LinedefIndex, SectorIndex, ThingIndex};

use crate::{
    context::VisualContext,
    effects::{
        Effect3dFloor, EffectBrightnessLevel, EffectContext, EffectCopySlope, EffectLineSlope,
        EffectPlaneCopySlope, EffectThingLineSlope, EffectThingSlope, EffectThingVertexSlope,
        EffectTransferBrightness, EffectVertexOffset, PlaneSide, SectorEffect,
    },
    sector_level::LightLevelType,
};

use super::SectorData;

/// Sector data of one editing session, created on first access.
#[derive(Default)]
pub struct SectorDataCache {
    data: HashMap<SectorIndex, SectorData>,
}

impl SectorDataCache {
    pub fn get(&self, sector: SectorIndex) -> Option<&SectorData> {
        self.data.get(&sector)
    }

    pub fn get_or_create(&mut self, sector: SectorIndex) -> &mut SectorData {
        self.data
            .entry(sector)
            .or_insert_with(|| SectorData::new(sector))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The sector's data, recomputed first if it isn't up to date.
    pub fn sector_data(&mut self, ctx: &dyn VisualContext, sector: SectorIndex) -> &SectorData {
        self.update(ctx, sector);
        self.get_or_create(sector)
    }

    /// Recomputes the sector's levels unless they are up to date, or the
    /// sector is already being recomputed further up the call chain.
    ///
    /// Sectors the effects read from are brought up to date first. Inside a
    /// dependency cycle, the sector that started it is read with just its
    /// own floor and ceiling.
    pub fn update(&mut self, ctx: &dyn VisualContext, sector: SectorIndex) {
        let map = ctx.map();
        let data = self.get_or_create(sector);
        if data.is_updating() || data.is_updated() {
            return;
        }
        data.set_updating(true);
        data.basic_setup(ctx);

        let sources: Vec<SectorIndex> = data
            .effects()
            .iter()
            .flat_map(|e| e.sources(map, sector))
            .map(|s| s.sector)
            .filter(|&s| s != sector)
            .collect();
        for source in sources {
            self.update(ctx, source);
        }

        let Some(data) = self.data.get(&sector) else {
            return;
        };
        let recomputed = data.recompute(&EffectContext::new(self, ctx));

        for source in &recomputed.sources {
            if source.sector != sector {
                self.get_or_create(source.sector)
                    .add_update_sector(sector, source.include_neighbours);
            }
        }

        self.get_or_create(sector).apply(recomputed);
    }

    /// Recomputes the sector even if it is up to date.
    pub fn update_forced(&mut self, ctx: &dyn VisualContext, sector: SectorIndex) {
        log::debug!("Forced update of sector {}", sector);
        self.get_or_create(sector).invalidate();
        self.update(ctx, sector);
    }

    /// Invalidates the sector and everything that depends on it, and asks
    /// for their live geometry to be rebuilt.
    ///
    /// Each sector is visited once, sectors in the middle of a recompute are
    /// left alone.
    pub fn reset(&mut self, ctx: &mut dyn VisualContext, sector: SectorIndex) {
        let mut visited = HashSet::new();
        let mut pending = vec![sector];

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }

            let dependents: Vec<SectorIndex> = match self.data.get_mut(&current) {
                Some(data) if data.is_updating() => continue,
                Some(data) => {
                    data.invalidate();
                    // Reversed, so the first registered dependent is reset first.
                    data.update_also().keys().rev().copied().collect()
                }
                None => Vec::new(),
            };

            if ctx.visual_sector_exists(current) {
                ctx.update_sector_geometry(current, false);
            }
            pending.extend(dependents);
        }

        log::debug!("Reset sector {} and {} dependent(s)", sector, visited.len() - 1);
    }

    /// Invalidates every sector, for changes that affect all of them
    /// (lighting settings).
    pub fn invalidate_all(&mut self, ctx: &mut dyn VisualContext) {
        for (&sector, data) in self.data.iter_mut() {
            data.invalidate();
            if ctx.visual_sector_exists(sector) {
                ctx.update_sector_geometry(sector, false);
            }
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Adds the effect to `sector` and registers `sector` as dependent on
    /// every sector the effect reads from.
    fn add_effect(&mut self, ctx: &dyn VisualContext, sector: SectorIndex, effect: SectorEffect) {
        let sources = effect.sources(ctx.map(), sector);
        self.get_or_create(sector).add_effect(effect);

        for source in sources {
            if source.sector != sector {
                self.get_or_create(source.sector)
                    .add_update_sector(sector, source.include_neighbours);
            }
        }
    }

    /// Returns false, adding nothing, if the line has no control sector in
    /// front of it.
    pub fn add_effect_3d_floor(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        linedef: LinedefIndex,
    ) -> bool {
        let Some(control) = control_sector(ctx, linedef) else {
            log::warn!("3D floor linedef {} has no control sector", linedef);
            return false;
        };

        let effect = Effect3dFloor::new(self.get_or_create(sector), linedef, control);
        self.add_effect(ctx, sector, SectorEffect::Floor3d(effect));
        true
    }

    /// Returns false, adding nothing, if the line has no control sector in
    /// front of it.
    pub fn add_effect_brightness_level(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        linedef: LinedefIndex,
    ) -> bool {
        let map = ctx.map();
        let (Some(line), Some(control)) = (map.linedef(linedef), control_sector(ctx, linedef))
        else {
            log::warn!("Light level linedef {} has no control sector", linedef);
            return false;
        };

        let light_type = LightLevelType::from_arg(line.args[1]);
        let effect =
            EffectBrightnessLevel::new(self.get_or_create(sector), linedef, control, light_type);
        self.add_effect(ctx, sector, SectorEffect::BrightnessLevel(effect));
        true
    }

    pub fn add_effect_transfer_floor_brightness(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        linedef: LinedefIndex,
    ) {
        let effect = EffectTransferBrightness::new(linedef, PlaneSide::Floor);
        self.add_effect(ctx, sector, SectorEffect::TransferBrightness(effect));
    }

    pub fn add_effect_transfer_ceiling_brightness(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        linedef: LinedefIndex,
    ) {
        let effect = EffectTransferBrightness::new(linedef, PlaneSide::Ceiling);
        self.add_effect(ctx, sector, SectorEffect::TransferBrightness(effect));
    }

    pub fn add_effect_line_slope(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        linedef: LinedefIndex,
    ) {
        let effect = EffectLineSlope::new(linedef);
        self.add_effect(ctx, sector, SectorEffect::LineSlope(effect));
    }

    /// `front` selects which side of the line `sector` is on.
    pub fn add_effect_plane_copy_slope(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        linedef: LinedefIndex,
        front: bool,
    ) {
        let effect = EffectPlaneCopySlope::new(linedef, front);
        self.add_effect(ctx, sector, SectorEffect::PlaneCopySlope(effect));
    }

    pub fn add_effect_copy_slope(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        thing: ThingIndex,
        side: PlaneSide,
    ) {
        let effect = EffectCopySlope::new(thing, side);
        self.add_effect(ctx, sector, SectorEffect::CopySlope(effect));
    }

    pub fn add_effect_thing_line_slope(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        thing: ThingIndex,
        side: PlaneSide,
    ) {
        let effect = EffectThingLineSlope::new(thing, side);
        self.add_effect(ctx, sector, SectorEffect::ThingLineSlope(effect));
    }

    pub fn add_effect_thing_slope(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        thing: ThingIndex,
        side: PlaneSide,
    ) {
        let effect = EffectThingSlope::new(thing, side);
        self.add_effect(ctx, sector, SectorEffect::ThingSlope(effect));
    }

    pub fn add_effect_thing_vertex_slope(
        &mut self,
        ctx: &dyn VisualContext,
        sector: SectorIndex,
        things: Vec<ThingIndex>,
        side: PlaneSide,
    ) {
        let effect = EffectThingVertexSlope::new(things, side);
        self.add_effect(ctx, sector, SectorEffect::ThingVertexSlope(effect));
    }

    pub fn add_effect_vertex_offset(&mut self, ctx: &dyn VisualContext, sector: SectorIndex) {
        self.add_effect(
            ctx,
            sector,
            SectorEffect::VertexOffset(EffectVertexOffset::new()),
        );
    }

    /// Makes `dependent` reset whenever `sector` is.
    pub fn add_update_sector(
        &mut self,
        sector: SectorIndex,
        dependent: SectorIndex,
        include_neighbours: bool,
    ) {
        self.get_or_create(sector)
            .add_update_sector(dependent, include_neighbours);
    }
}

fn control_sector(ctx: &dyn VisualContext, linedef: LinedefIndex) -> Option<SectorIndex> {
    let map = ctx.map();
    map.linedef(linedef).and_then(|l| map.front_sector(l))
}
