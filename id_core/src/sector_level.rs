use id_map::SectorIndex;
use ultraviolet::Vec2;

use crate::helpers::{geom::Plane3d, PixelColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorLevelType {
    Floor,
    Ceiling,
    /// Only affects lighting of what is below it.
    Light,
}

/// How a light-only level casts its light downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightLevelType {
    #[default]
    None,
    /// Light reaches down to the next light level.
    Type0,
    /// Light reaches down to the bottom of the control sector.
    Type1,
    /// Light reaches down to the next solid 3D floor.
    Type2,
    /// Where a [LightLevelType::Type1] light stops.
    Type1Bottom,
}

impl LightLevelType {
    /// From the second argument of a light-only extra floor.
    pub fn from_arg(arg: i32) -> Self {
        match arg.clamp(0, 2) {
            0 => LightLevelType::Type0,
            1 => LightLevelType::Type1,
            _ => LightLevelType::Type2,
        }
    }
}

/// Handle to a level owned by a [SectorData](crate::SectorData).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelId(pub(crate) usize);

impl LevelId {
    pub const FLOOR: LevelId = LevelId(0);
    pub const CEILING: LevelId = LevelId(1);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// One plane in a sector's vertical stack, along with how it is lit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorLevel {
    /// Sector this level comes from. For 3D floors and light levels, this is
    /// the control sector.
    pub sector: SectorIndex,
    pub level_type: SectorLevelType,
    pub plane: Plane3d,

    /// Packed ARGB color of the level itself. 0 means not set yet.
    pub color: i32,
    /// Light level below this plane. [SectorLevel::NO_BRIGHTNESS] means not set yet.
    pub brightness_below: i32,
    /// Light color below this plane. Fully transparent means not set yet.
    pub color_below: PixelColor,

    pub light_type: LightLevelType,
    pub disable_lighting: bool,
    pub restrict_lighting: bool,
    pub reset_lighting: bool,

    pub alpha: u8,
    /// Belongs to a 3D floor.
    pub extra_floor: bool,
    /// Sidedefs crossing this level must be split at it.
    pub split_sides: bool,
}

impl SectorLevel {
    pub const NO_BRIGHTNESS: i32 = -1;

    pub fn new(sector: SectorIndex, level_type: SectorLevelType) -> Self {
        let plane = match level_type {
            SectorLevelType::Ceiling => Plane3d::flat_ceiling(0.0),
            _ => Plane3d::flat_floor(0.0),
        };

        Self {
            sector,
            level_type,
            plane,
            color: 0,
            brightness_below: Self::NO_BRIGHTNESS,
            color_below: PixelColor::TRANSPARENT,
            light_type: LightLevelType::None,
            disable_lighting: false,
            restrict_lighting: false,
            reset_lighting: false,
            alpha: 255,
            extra_floor: false,
            split_sides: false,
        }
    }

    pub fn z_at(&self, pos: Vec2) -> f32 {
        self.plane.z_at(pos)
    }

    pub fn is_light(&self) -> bool {
        self.level_type == SectorLevelType::Light
    }

    /// Clears everything the light casting fills in from the level above.
    pub(crate) fn clear_lighting(&mut self) {
        self.color = 0;
        self.brightness_below = Self::NO_BRIGHTNESS;
        self.color_below = PixelColor::TRANSPARENT;
    }
}
