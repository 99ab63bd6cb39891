use id_map::MapFormat;

use bitflags::bitflags;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    /// Vanilla Doom and Boom, in the Doom map format.
    Boom,
    /// ZDoom in the Hexen map format.
    Hexen,
    /// GZDoom with UDMF maps.
    Udmf,
}

impl Game {
    /// The map format is the only thing the editor preview needs to pick a
    /// configuration.
    pub fn from_map_format(format: MapFormat) -> Game {
        match format {
            MapFormat::Doom => Game::Boom,
            MapFormat::Hexen => Game::Hexen,
            MapFormat::Udmf => Game::Udmf,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Game::Boom => "Boom",
            Game::Hexen => "ZDoom (Hexen)",
            Game::Udmf => "GZDoom (UDMF)",
        }
    }
}

#[derive(Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub features: GameFeatures,
    pub line_effects: Vec<LineEffectConfig>,
    pub thing_effects: Vec<ThingEffectConfig>,
}

bitflags! {
    /// Engine features that change how sectors are set up for the preview.
    #[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq)]
    #[serde(try_from = "String")]
    pub struct GameFeatures: u32 {
        /// Custom fields on map elements (lightfloor, lightcolor, ...).
        ///
        /// String code: F
        const CustomFields = 0b00000001;
        /// Explicit floor/ceiling plane equations on sectors.
        ///
        /// String code: P
        const PlaneEquations = 0b00000010;
        /// Per-vertex floor/ceiling heights.
        ///
        /// String code: V
        const VertexHeights = 0b00000100;
        /// 3D floors and light-only extra floors.
        ///
        /// String code: 3
        const ExtraFloors = 0b00001000;
    }
}

impl TryFrom<String> for GameFeatures {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut flags = GameFeatures::empty();
        for c in s.chars() {
            match c {
                'F' => flags |= GameFeatures::CustomFields,
                'P' => flags |= GameFeatures::PlaneEquations,
                'V' => flags |= GameFeatures::VertexHeights,
                '3' => flags |= GameFeatures::ExtraFloors,
                _ => return Err("Invalid feature"),
            }
        }

        Ok(flags)
    }
}

/// Where a line effect takes the tag of the sectors it applies to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagSource {
    /// First action argument (Hexen and UDMF specials).
    #[default]
    Arg0,
    /// The linedef's own tag (Boom generalized types).
    LineTag,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LineEffectKind {
    Floor3d,
    BrightnessLevel,
    TransferFloorBrightness,
    TransferCeilingBrightness,
    LineSlope,
    PlaneCopySlope,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ThingEffectKind {
    CopySlopeFloor,
    CopySlopeCeiling,
    LineSlopeFloor,
    LineSlopeCeiling,
    TiltFloor,
    TiltCeiling,
    VertexSlopeFloor,
    VertexSlopeCeiling,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LineEffectConfig {
    pub action: u16,
    pub effect: LineEffectKind,
    #[serde(default)]
    pub tag: TagSource,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ThingEffectConfig {
    pub thing_type: u16,
    pub effect: ThingEffectKind,
}

impl GameConfig {
    pub fn from_game(game: Game) -> serde_json::Result<Self> {
        let config_str = match game {
            Game::Boom => include_str!("../config/boom.json"),
            Game::Hexen => include_str!("../config/hexen.json"),
            Game::Udmf => include_str!("../config/udmf.json"),
        };

        serde_json::from_str(config_str)
    }

    pub fn line_effect(&self, action: u16) -> Option<&LineEffectConfig> {
        if action == 0 {
            return None;
        }
        self.line_effects.iter().find(|e| e.action == action)
    }

    pub fn thing_effect(&self, thing_type: u16) -> Option<&ThingEffectConfig> {
        self.thing_effects.iter().find(|e| e.thing_type == thing_type)
    }
}
