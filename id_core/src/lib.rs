pub mod context;
pub mod cvars;
pub mod effects;
pub mod sector_data;
pub mod sector_level;
pub mod world;

pub(crate) mod helpers;

#[cfg(test)]
mod testing;

pub use context::{EditorContext, VisualContext};
pub use helpers::{geom::Plane3d, PixelColor};
pub use sector_data::{SectorData, SectorDataCache};
pub use sector_level::{LevelId, LightLevelType, SectorLevel, SectorLevelType};
pub use world::World;
