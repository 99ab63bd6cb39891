mod fields;
mod helpers;

use ultraviolet::Vec3;

pub use fields::*;
pub use helpers::MapError;

pub type SectorIndex = usize;
pub type SidedefIndex = usize;
pub type LinedefIndex = usize;
pub type VertexIndex = usize;
pub type ThingIndex = usize;

/// The format a map was loaded from. Decides which features the editor
/// may use, e.g. custom fields only exist in UDMF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapFormat {
    /// Vanilla and Boom style binary maps.
    #[default]
    Doom,
    /// Binary maps with line/thing arguments (ZDoom in Hexen format).
    Hexen,
    /// Textual maps with custom fields.
    Udmf,
}

impl MapFormat {
    pub fn has_custom_fields(&self) -> bool {
        matches!(self, MapFormat::Udmf)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Thing {
    pub x: f32,
    pub y: f32,
    /// Height relative to the floor of the sector the thing is in.
    pub z: f32,
    /// In degrees. Counter-clockwise from east.
    pub angle: u16,

    pub thing_type: u16,
    pub spawn_flags: u16,
    pub args: [i32; 5],

    pub fields: UniFields,
}

#[derive(Debug, Clone, Default)]
pub struct Sector {
    pub floor_height: i32,
    pub ceiling_height: i32,

    pub floor_flat: String,
    pub ceiling_flat: String,

    /// Sector brightness, 0..255 in practice.
    pub light_level: i32,

    pub special_type: u16,
    /// Binary formats have a single tag, UDMF may list more.
    pub tags: Vec<i32>,

    /// Plane equation `(a, b, c)` of a sloped floor; zero when not sloped.
    pub floor_slope: Vec3,
    pub floor_slope_offset: f32,
    /// Plane equation `(a, b, c)` of a sloped ceiling; zero when not sloped.
    pub ceiling_slope: Vec3,
    pub ceiling_slope_offset: f32,

    pub fields: UniFields,
}

impl Sector {
    /// Tag 0 means "untagged" and never matches.
    pub fn has_tag(&self, tag: i32) -> bool {
        tag != 0 && self.tags.contains(&tag)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sidedef {
    pub x_offset: i16,
    pub y_offset: i16,

    pub upper_texture: String,
    pub lower_texture: String,
    pub middle_texture: String,

    pub sector_idx: SectorIndex,
}

#[derive(Debug, Clone, Default)]
pub struct Linedef {
    pub start_vertex_idx: VertexIndex,
    pub end_vertex_idx: VertexIndex,

    /// Flags are game (and engine) dependent.
    pub flags: u32,

    pub action: u16,
    pub args: [i32; 5],
    /// Sector tag for binary Doom maps, line id otherwise.
    pub tag: i32,

    /// The front side is on the right of the line's direction.
    pub right_sidedef_idx: Option<SidedefIndex>,
    pub left_sidedef_idx: Option<SidedefIndex>,

    pub fields: UniFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    /// UDMF `zfloor`: absolute floor height at this vertex.
    pub z_floor: Option<f32>,
    /// UDMF `zceiling`: absolute ceiling height at this vertex.
    pub z_ceiling: Option<f32>,
}

/// One side of a sector's boundary: the linedef and whether the sector is on
/// its front side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorSide {
    pub linedef_idx: LinedefIndex,
    pub is_front: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Map {
    pub name: String,
    pub format: MapFormat,

    /// "Things" indicate monsters, items, etc.
    pub things: Vec<Thing>,

    /// Sectors are geometry-agnostic, and defined with floor/ceiling height.
    pub sectors: Vec<Sector>,
    /// Sidedefs tie a linedef's face to a sector.
    pub sidedefs: Vec<Sidedef>,
    /// Linedefs connect a front/back face sidedef to a start/end vertex.
    pub linedefs: Vec<Linedef>,
    /// Vertices are just points in X,Y space.
    pub vertices: Vec<Vertex>,
}

impl Map {
    pub fn new(name: &str, format: MapFormat) -> Self {
        Self {
            name: name.to_string(),
            format,
            ..Default::default()
        }
    }

    pub fn sector(&self, idx: SectorIndex) -> Option<&Sector> {
        self.sectors.get(idx)
    }

    pub fn linedef(&self, idx: LinedefIndex) -> Option<&Linedef> {
        self.linedefs.get(idx)
    }

    pub fn thing(&self, idx: ThingIndex) -> Option<&Thing> {
        self.things.get(idx)
    }

    pub fn front_sector(&self, linedef: &Linedef) -> Option<SectorIndex> {
        linedef
            .right_sidedef_idx
            .and_then(|idx| self.sidedefs.get(idx))
            .map(|side| side.sector_idx)
    }

    pub fn back_sector(&self, linedef: &Linedef) -> Option<SectorIndex> {
        linedef
            .left_sidedef_idx
            .and_then(|idx| self.sidedefs.get(idx))
            .map(|side| side.sector_idx)
    }

    /// Start and end vertex of a linedef.
    pub fn linedef_vertices(&self, linedef: &Linedef) -> Option<(Vertex, Vertex)> {
        let start = self.vertices.get(linedef.start_vertex_idx)?;
        let end = self.vertices.get(linedef.end_vertex_idx)?;
        Some((*start, *end))
    }

    /// All linedef sides facing into `sector`, in linedef order.
    pub fn sector_sides(&self, sector: SectorIndex) -> Vec<SectorSide> {
        let mut sides = Vec::new();
        for (i, linedef) in self.linedefs.iter().enumerate() {
            if self.front_sector(linedef) == Some(sector) {
                sides.push(SectorSide {
                    linedef_idx: i,
                    is_front: true,
                });
            }
            if self.back_sector(linedef) == Some(sector) {
                sides.push(SectorSide {
                    linedef_idx: i,
                    is_front: false,
                });
            }
        }
        sides
    }

    pub fn sectors_with_tag(&self, tag: i32) -> impl Iterator<Item = SectorIndex> + '_ {
        self.sectors
            .iter()
            .enumerate()
            .filter(move |(_, sector)| sector.has_tag(tag))
            .map(|(i, _)| i)
    }

    pub fn add_vertex(&mut self, x: f32, y: f32) -> VertexIndex {
        self.vertices.push(Vertex {
            x,
            y,
            ..Default::default()
        });
        self.vertices.len() - 1
    }

    pub fn add_sector(&mut self, sector: Sector) -> SectorIndex {
        self.sectors.push(sector);
        self.sectors.len() - 1
    }

    pub fn add_thing(&mut self, thing: Thing) -> ThingIndex {
        self.things.push(thing);
        self.things.len() - 1
    }

    /// Adds a linedef, creating a sidedef for each sector given.
    pub fn add_linedef(
        &mut self,
        start: VertexIndex,
        end: VertexIndex,
        front: Option<SectorIndex>,
        back: Option<SectorIndex>,
    ) -> LinedefIndex {
        let right_sidedef_idx = front.map(|sector| self.add_sidedef(sector));
        let left_sidedef_idx = back.map(|sector| self.add_sidedef(sector));

        self.linedefs.push(Linedef {
            start_vertex_idx: start,
            end_vertex_idx: end,
            right_sidedef_idx,
            left_sidedef_idx,
            ..Default::default()
        });
        self.linedefs.len() - 1
    }

    fn add_sidedef(&mut self, sector: SectorIndex) -> SidedefIndex {
        self.sidedefs.push(Sidedef {
            sector_idx: sector,
            ..Default::default()
        });
        self.sidedefs.len() - 1
    }

    /// Checks that every index stored in the map points at something.
    pub fn validate(&self) -> Result<(), MapError> {
        for (i, sidedef) in self.sidedefs.iter().enumerate() {
            if sidedef.sector_idx >= self.sectors.len() {
                return Err(MapError::MissingSector {
                    sidedef: i,
                    sector: sidedef.sector_idx,
                });
            }
        }

        for (i, linedef) in self.linedefs.iter().enumerate() {
            for vertex in [linedef.start_vertex_idx, linedef.end_vertex_idx] {
                if vertex >= self.vertices.len() {
                    return Err(MapError::MissingVertex { linedef: i, vertex });
                }
            }

            let sidedefs = [linedef.right_sidedef_idx, linedef.left_sidedef_idx];
            for sidedef in sidedefs.into_iter().flatten() {
                if sidedef >= self.sidedefs.len() {
                    return Err(MapError::MissingSidedef { linedef: i, sidedef });
                }
            }

            if linedef.right_sidedef_idx.is_none() {
                return Err(MapError::MissingFrontSide(i));
            }
        }

        Ok(())
    }
}
