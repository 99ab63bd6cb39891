use std::collections::HashMap;

use anyhow::{anyhow, Error};

pub const DEFAULT_CVARS: &[(&str, CVar)] = &[
    // #############################
    // PREVIEW LIGHTING VARIABLES:
    // Changing any of these invalidates every sector's levels.
    // #############################
    (
        "r_doomlightlevels",
        CVar {
            description: "Darken light levels below 192 the way the Doom renderer does.",
            value: CVarValue::Bool(true),
        },
    ),
    (
        "r_fullbright",
        CVar {
            description: "Draw every level at full brightness.",
            value: CVarValue::Bool(false),
        },
    ),
];

pub type CVarsMap = HashMap<&'static str, CVar>;

pub fn default_cvars() -> CVarsMap {
    DEFAULT_CVARS.iter().copied().collect::<CVarsMap>()
}

/// Reads a boolean cvar, falling back to `default` if it's missing or not a bool.
pub fn cvar_bool(cvars: &CVarsMap, name: &str, default: bool) -> bool {
    cvars
        .get(name)
        .and_then(|cvar| cvar.value.as_bool())
        .unwrap_or(default)
}

/// Parses `value` into the cvar called `name`, keeping its type.
pub fn set_cvar(cvars: &mut CVarsMap, name: &str, value: &str) -> Result<(), Error> {
    let cvar = cvars
        .get_mut(name)
        .ok_or_else(|| anyhow!("Unknown cvar {}", name))?;
    cvar.value.set_from_str(value)
}

#[derive(Debug, Clone, Copy)]
pub struct CVar {
    pub description: &'static str,
    pub value: CVarValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CVarValue {
    Bool(bool),
    U32(u32),
    F32(f32),
}

impl CVarValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CVarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            CVarValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            CVarValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CVarValue::Bool(_) => "bool",
            CVarValue::U32(_) => "u32",
            CVarValue::F32(_) => "f32",
        }
    }

    /// Leaves the value untouched if `value` doesn't parse as the same type.
    pub fn set_from_str(&mut self, value: &str) -> Result<(), Error> {
        let parsed = match self {
            CVarValue::Bool(_) => value.parse().map(CVarValue::Bool).ok(),
            CVarValue::U32(_) => value.parse().map(CVarValue::U32).ok(),
            CVarValue::F32(_) => value.parse().map(CVarValue::F32).ok(),
        };

        *self = parsed.ok_or_else(|| anyhow!("Expected a {}, got {:?}", self.type_name(), value))?;
        Ok(())
    }
}
