mod point_in_segments;

pub use point_in_segments::*;
