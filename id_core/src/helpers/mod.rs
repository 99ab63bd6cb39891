pub mod geom;

mod pixel_color;
mod rebuild_set;
mod sector_geom;
mod stopwatch;

pub use pixel_color::PixelColor;
pub use rebuild_set::RebuildSet;
pub use sector_geom::*;
pub use stopwatch::Stopwatch;
