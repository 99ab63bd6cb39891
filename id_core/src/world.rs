use id_game_config::{Game, GameConfig};
use id_map::{Map, SectorIndex};

use anyhow::Result;

use crate::{
    context::EditorContext,
    cvars::{default_cvars, set_cvar},
    effects::init_sector_effects,
    helpers::Stopwatch,
    sector_data::{SectorData, SectorDataCache},
};

/// A 3D preview session over one map.
pub struct World {
    pub game: Game,
    pub context: EditorContext,
    pub sector_data: SectorDataCache,
}

impl World {
    pub fn new(map: Map) -> Result<Self> {
        map.validate()?;

        let game = Game::from_map_format(map.format);
        let game_config = GameConfig::from_game(game)?;

        // Time how long it takes to find the effects.
        let mut stopwatch = Stopwatch::new();

        let context = EditorContext::new(map, game_config, default_cvars());
        let mut sector_data = SectorDataCache::default();
        let count = init_sector_effects(&mut sector_data, &context, &context.game_config);

        log::info!(
            "Registered {} sector effects in {} ({}).",
            count,
            context.map.name,
            game.name()
        );
        log::info!("Setup time: {:?}", stopwatch.lap());

        Ok(Self {
            game,
            context,
            sector_data,
        })
    }

    pub fn map(&self) -> &Map {
        &self.context.map
    }

    /// For edits to the map. Call [World::sector_changed] for every sector
    /// touched, or [World::reload_effects] if specials or things changed.
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.context.map
    }

    /// Levels of a sector, brought up to date first.
    pub fn sector_data(&mut self, sector: SectorIndex) -> &SectorData {
        self.sector_data.sector_data(&self.context, sector)
    }

    pub fn sector_changed(&mut self, sector: SectorIndex) {
        self.sector_data.reset(&mut self.context, sector);
    }

    /// Drops all sector data and finds the effects again.
    pub fn reload_effects(&mut self) -> usize {
        let mut stopwatch = Stopwatch::new();

        self.sector_data.clear();
        let count = init_sector_effects(
            &mut self.sector_data,
            &self.context,
            &self.context.game_config,
        );

        log::debug!("Reloaded {} sector effects in {:?}", count, stopwatch.lap());
        count
    }

    /// Lighting cvars change every level's colors, so everything is
    /// invalidated.
    pub fn set_cvar(&mut self, name: &str, value: &str) -> Result<()> {
        set_cvar(&mut self.context.cvars, name, value)?;
        self.sector_data.invalidate_all(&mut self.context);
        Ok(())
    }

    /// The renderer has built geometry for the sector and wants to hear
    /// when it changes.
    pub fn add_visual_sector(&mut self, sector: SectorIndex) {
        self.context.visual_sectors.insert(sector);
    }

    pub fn remove_visual_sector(&mut self, sector: SectorIndex) {
        self.context.visual_sectors.remove(&sector);
    }

    /// Sectors whose geometry must be rebuilt, and whether their
    /// neighbours' sides must be too.
    pub fn take_rebuilds(&mut self) -> Vec<(SectorIndex, bool)> {
        self.context.rebuilds.drain()
    }
}
