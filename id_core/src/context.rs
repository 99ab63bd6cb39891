use std::collections::HashSet;

use id_game_config::{GameConfig, GameFeatures};
use id_map::{Map, SectorIndex};

use crate::{
    cvars::{cvar_bool, CVarsMap},
    helpers::{PixelColor, RebuildSet},
};

/// What sector data needs from the editor around it.
///
/// Sector data never holds on to the context; it is passed into every
/// operation that needs it.
pub trait VisualContext {
    fn map(&self) -> &Map;

    /// Maps a raw sector light value to a packed ARGB display brightness.
    fn calculate_brightness(&self, level: i32) -> i32;

    /// Whether sectors may carry custom fields (lightfloor, lightcolor, ...).
    fn has_custom_fields(&self) -> bool {
        self.map().format.has_custom_fields()
    }

    /// Whether explicit sector plane equations replace the flat heights.
    fn has_plane_equations(&self) -> bool {
        self.map().format.has_custom_fields()
    }

    /// Whether the renderer has live geometry for the sector.
    fn visual_sector_exists(&self, sector: SectorIndex) -> bool;

    /// Asks the renderer to rebuild the sector's live geometry, and its
    /// neighbours' sidedefs too with `include_neighbours`.
    fn update_sector_geometry(&mut self, sector: SectorIndex, include_neighbours: bool);
}

/// The editor side of a 3D preview session.
pub struct EditorContext {
    pub map: Map,
    pub game_config: GameConfig,
    pub cvars: CVarsMap,

    /// Sectors the renderer currently has geometry for.
    pub visual_sectors: HashSet<SectorIndex>,
    /// Geometry rebuilds requested since the renderer last looked.
    pub rebuilds: RebuildSet<SectorIndex>,
}

impl EditorContext {
    pub fn new(map: Map, game_config: GameConfig, cvars: CVarsMap) -> Self {
        Self {
            map,
            game_config,
            cvars,
            visual_sectors: HashSet::new(),
            rebuilds: RebuildSet::default(),
        }
    }
}

impl VisualContext for EditorContext {
    fn map(&self) -> &Map {
        &self.map
    }

    fn calculate_brightness(&self, level: i32) -> i32 {
        if cvar_bool(&self.cvars, "r_fullbright", false) {
            return PixelColor::gray(255).to_int();
        }

        let mut flevel = level as f32;
        if level < 192 && cvar_bool(&self.cvars, "r_doomlightlevels", true) {
            flevel = 192.0 - (192 - level) as f32 * 1.5;
        }

        PixelColor::gray((flevel as i32).clamp(0, 255) as u8).to_int()
    }

    fn has_custom_fields(&self) -> bool {
        self.map.format.has_custom_fields()
            && self
                .game_config
                .features
                .contains(GameFeatures::CustomFields)
    }

    fn has_plane_equations(&self) -> bool {
        self.map.format.has_custom_fields()
            && self
                .game_config
                .features
                .contains(GameFeatures::PlaneEquations)
    }

    fn visual_sector_exists(&self, sector: SectorIndex) -> bool {
        self.visual_sectors.contains(&sector)
    }

    fn update_sector_geometry(&mut self, sector: SectorIndex, include_neighbours: bool) {
        self.rebuilds.request(sector, include_neighbours);
    }
}
