use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("Sidedef {sidedef} references missing sector {sector}")]
    MissingSector { sidedef: usize, sector: usize },
    #[error("Linedef {linedef} references missing sidedef {sidedef}")]
    MissingSidedef { linedef: usize, sidedef: usize },
    #[error("Linedef {linedef} references missing vertex {vertex}")]
    MissingVertex { linedef: usize, vertex: usize },
    #[error("Linedef {0} has no front sidedef")]
    MissingFrontSide(usize),

    #[error("Field {name} is {found}, expected {expected}")]
    FieldType {
        name: String,
        found: &'static str,
        expected: &'static str,
    },
}
