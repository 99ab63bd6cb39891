mod bounds2d;
mod line2d;
mod plane3d;

pub use bounds2d::*;
pub use line2d::*;
pub use plane3d::*;
