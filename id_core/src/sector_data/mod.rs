//! Per-sector resolved geometry and lighting for the 3D preview.
//!
//! A [SectorData] holds the ordered stack of levels of one sector: its real
//! floor and ceiling, plus whatever effects add (3D floors, light-only
//! levels). The stack is recomputed lazily, and changes to a sector
//! invalidate every sector whose effects read from it, see [SectorDataCache].

mod cache;
mod light_cast;

use id_map::{Sector, SectorIndex};
use indexmap::IndexMap;
use ultraviolet::{Vec2, Vec3};

use crate::{
    context::VisualContext,
    effects::{Effect3dFloor, EffectContext, EffectSource, LevelStack, SectorEffect},
    helpers::{geom::Plane3d, sector_center, PixelColor},
    sector_level::{LevelId, SectorLevel, SectorLevelType},
};

pub use cache::SectorDataCache;

pub struct SectorData {
    sector: SectorIndex,

    updated: bool,
    updating: bool,

    /// Levels as effects allocated them, before any effect ran.
    templates: Vec<SectorLevel>,
    levels: Vec<SectorLevel>,
    /// Levels sorted bottom to top.
    light_levels: Vec<LevelId>,

    effects: Vec<SectorEffect>,

    /// Sectors to reset along with this one, and whether their neighbours'
    /// geometry has to be rebuilt too.
    update_also: IndexMap<SectorIndex, bool>,

    floor_changed: bool,
    ceiling_changed: bool,
}

/// Result of recomputing a sector's levels, applied all at once.
pub(crate) struct Recomputed {
    levels: Vec<SectorLevel>,
    light_levels: Vec<LevelId>,
    pub(crate) sources: Vec<EffectSource>,
}

impl SectorData {
    pub fn new(sector: SectorIndex) -> Self {
        let templates = vec![
            SectorLevel::new(sector, SectorLevelType::Floor),
            SectorLevel::new(sector, SectorLevelType::Ceiling),
        ];

        Self {
            sector,
            updated: false,
            updating: false,
            levels: templates.clone(),
            templates,
            light_levels: vec![LevelId::FLOOR, LevelId::CEILING],
            effects: Vec::new(),
            update_also: IndexMap::new(),
            floor_changed: false,
            ceiling_changed: false,
        }
    }

    pub fn sector(&self) -> SectorIndex {
        self.sector
    }

    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub fn floor(&self) -> &SectorLevel {
        &self.levels[LevelId::FLOOR.0]
    }

    pub fn ceiling(&self) -> &SectorLevel {
        &self.levels[LevelId::CEILING.0]
    }

    pub fn level(&self, id: LevelId) -> Option<&SectorLevel> {
        self.levels.get(id.0)
    }

    /// All levels, bottom to top.
    pub fn light_levels(&self) -> impl Iterator<Item = &SectorLevel> + '_ {
        self.light_levels.iter().map(|id| &self.levels[id.0])
    }

    pub fn light_level_ids(&self) -> &[LevelId] {
        &self.light_levels
    }

    pub fn effects(&self) -> &[SectorEffect] {
        &self.effects
    }

    pub fn extra_floors(&self) -> Vec<&Effect3dFloor> {
        self.effects.iter().filter_map(|e| e.as_3d_floor()).collect()
    }

    pub fn update_also(&self) -> &IndexMap<SectorIndex, bool> {
        &self.update_also
    }

    pub fn floor_changed(&self) -> bool {
        self.floor_changed
    }

    pub fn ceiling_changed(&self) -> bool {
        self.ceiling_changed
    }

    /// Flags only accumulate until the next recompute clears them.
    pub fn set_floor_changed(&mut self, changed: bool) {
        self.floor_changed |= changed;
    }

    pub fn set_ceiling_changed(&mut self, changed: bool) {
        self.ceiling_changed |= changed;
    }

    /// Allocates a level slot for an effect. Extra levels sit between the
    /// floor and the ceiling until the next recompute sorts them.
    pub fn add_sector_level(&mut self, level: SectorLevel) -> LevelId {
        let id = LevelId(self.templates.len());
        self.templates.push(level);
        self.levels.push(level);
        self.light_levels.insert(self.light_levels.len() - 1, id);
        self.updated = false;
        id
    }

    pub(crate) fn add_effect(&mut self, effect: SectorEffect) {
        self.effects.push(effect);
        self.updated = false;
    }

    /// `sector` is reset whenever this one is. Registering it again replaces
    /// the neighbours flag.
    pub fn add_update_sector(&mut self, sector: SectorIndex, include_neighbours: bool) {
        self.update_also.insert(sector, include_neighbours);
    }

    pub(crate) fn is_updating(&self) -> bool {
        self.updating
    }

    pub(crate) fn set_updating(&mut self, updating: bool) {
        self.updating = updating;
    }

    pub(crate) fn invalidate(&mut self) {
        self.updated = false;
    }

    /// Puts the sector's own floor and ceiling back in place of the last
    /// computed stack. Other sectors reading this one while it is being
    /// recomputed see these.
    pub(crate) fn basic_setup(&mut self, ctx: &dyn VisualContext) {
        self.levels = self.baseline(ctx);
    }

    /// Allocated levels with the sector's own floor and ceiling, before any
    /// effect ran.
    fn baseline(&self, ctx: &dyn VisualContext) -> Vec<SectorLevel> {
        let fallback = Sector::default();
        let sector = ctx.map().sector(self.sector).unwrap_or(&fallback);

        let mut levels = self.templates.clone();
        let (floor, ceiling) = base_levels(self.sector, sector, ctx);
        levels[LevelId::FLOOR.0] = floor;
        levels[LevelId::CEILING.0] = ceiling;
        levels
    }

    /// Computes the level stack from the sector and its effects, without
    /// touching the current one.
    pub(crate) fn recompute(&self, ctx: &EffectContext) -> Recomputed {
        let map = ctx.map;
        let fallback = Sector::default();
        let sector = map.sector(self.sector).unwrap_or(&fallback);

        let mut levels = self.baseline(ctx.visual);

        let mut sources = Vec::new();
        let mut stack = LevelStack {
            sector: self.sector,
            levels: &mut levels,
            sources: &mut sources,
        };
        for effect in &self.effects {
            effect.update(&mut stack, ctx);
        }

        // Floor first, extra levels in the order they were added, ceiling last.
        let mut light_levels: Vec<LevelId> = std::iter::once(LevelId::FLOOR)
            .chain((2..levels.len()).map(LevelId))
            .chain(std::iter::once(LevelId::CEILING))
            .collect();

        if light_levels.len() > 2 {
            let center = sector_center(map, self.sector);
            let height = |id: &LevelId| (levels[id.0].z_at(center) * 1000.0).round();
            light_levels.sort_by(|a, b| height(a).total_cmp(&height(b)));
        }

        light_cast::cast_light(&mut levels, &light_levels, self.sector, sector, ctx.visual);

        Recomputed {
            levels,
            light_levels,
            sources,
        }
    }

    pub(crate) fn apply(&mut self, recomputed: Recomputed) {
        self.levels = recomputed.levels;
        self.light_levels = recomputed.light_levels;

        self.floor_changed = false;
        self.ceiling_changed = false;
        self.updated = true;
        self.updating = false;
    }

    /// Nearest level strictly above `pos`.
    pub fn level_above(&self, pos: Vec3) -> Option<&SectorLevel> {
        self.nearest(pos, |_| true, |z| z - pos.z, false)
    }

    /// Nearest level above `pos`, or the one `pos` lies on.
    pub fn level_above_or_at(&self, pos: Vec3) -> Option<&SectorLevel> {
        self.nearest(pos, |_| true, |z| z - pos.z, true)
    }

    pub fn ceiling_above(&self, pos: Vec3) -> Option<&SectorLevel> {
        self.nearest(
            pos,
            |l| l.level_type == SectorLevelType::Ceiling,
            |z| z - pos.z,
            false,
        )
    }

    pub fn level_below(&self, pos: Vec3) -> Option<&SectorLevel> {
        self.nearest(pos, |_| true, |z| pos.z - z, false)
    }

    pub fn floor_below(&self, pos: Vec3) -> Option<&SectorLevel> {
        self.nearest(
            pos,
            |l| l.level_type == SectorLevelType::Floor,
            |z| pos.z - z,
            false,
        )
    }

    fn nearest(
        &self,
        pos: Vec3,
        filter: impl Fn(&SectorLevel) -> bool,
        distance: impl Fn(f32) -> f32,
        inclusive: bool,
    ) -> Option<&SectorLevel> {
        let mut found = None;
        let mut dist = f32::MAX;

        for level in self.light_levels().filter(|l| filter(l)) {
            let d = distance(level.z_at(Vec2::new(pos.x, pos.y)));
            if (d > 0.0 || (inclusive && d == 0.0)) && d < dist {
                dist = d;
                found = Some(level);
            }
        }

        found
    }
}

/// The sector's own floor and ceiling, lit the way plain Doom lights them.
fn base_levels(
    sector_idx: SectorIndex,
    sector: &Sector,
    ctx: &dyn VisualContext,
) -> (SectorLevel, SectorLevel) {
    let mut floor = SectorLevel::new(sector_idx, SectorLevelType::Floor);
    let mut ceiling = SectorLevel::new(sector_idx, SectorLevelType::Ceiling);

    let plane_equations = ctx.has_plane_equations();
    floor.plane = slope_plane(sector.floor_slope, sector.floor_slope_offset)
        .filter(|_| plane_equations)
        .unwrap_or(Plane3d::flat_floor(sector.floor_height as f32));
    ceiling.plane = slope_plane(sector.ceiling_slope, sector.ceiling_slope_offset)
        .filter(|_| plane_equations)
        .unwrap_or(Plane3d::flat_ceiling(sector.ceiling_height as f32));

    let fields = &sector.fields;
    let (color, floor_light, ceiling_light) = if ctx.has_custom_fields() {
        let relative = |light: i32, absolute: bool| {
            if absolute {
                light
            } else {
                sector.light_level + light
            }
        };
        (
            fields.get_value("lightcolor", -1),
            relative(
                fields.get_value("lightfloor", 0),
                fields.get_value("lightfloorabsolute", false),
            ),
            relative(
                fields.get_value("lightceiling", 0),
                fields.get_value("lightceilingabsolute", false),
            ),
        )
    } else {
        (-1, sector.light_level, sector.light_level)
    };

    let light_color = PixelColor::from_int(color);
    for (level, light) in [(&mut floor, floor_light), (&mut ceiling, ceiling_light)] {
        let brightness = PixelColor::from_int(ctx.calculate_brightness(light));
        level.color = light_color.modulate(brightness).with_alpha(255).to_int();
        level.brightness_below = sector.light_level;
        level.color_below = light_color.with_alpha(255);
    }

    (floor, ceiling)
}

/// Plane from an explicit plane equation, unless it's degenerate.
fn slope_plane(normal: Vec3, offset: f32) -> Option<Plane3d> {
    (normal.mag_sq() > 0.0 && (offset / normal.z).is_finite()).then(|| Plane3d::new(normal, offset))
}

#[cfg(test)]
mod tests;
