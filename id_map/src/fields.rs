use indexmap::IndexMap;

use crate::MapError;

/// A single UDMF custom field value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
}

impl UniValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            UniValue::Int(_) => "int",
            UniValue::Float(_) => "float",
            UniValue::Bool(_) => "bool",
            UniValue::String(_) => "string",
        }
    }
}

impl From<i32> for UniValue {
    fn from(value: i32) -> Self {
        UniValue::Int(value)
    }
}

impl From<f32> for UniValue {
    fn from(value: f32) -> Self {
        UniValue::Float(value)
    }
}

impl From<bool> for UniValue {
    fn from(value: bool) -> Self {
        UniValue::Bool(value)
    }
}

impl From<&str> for UniValue {
    fn from(value: &str) -> Self {
        UniValue::String(value.to_string())
    }
}

/// Conversion out of a [UniValue], used for typed field lookups.
pub trait FromUniValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_uni_value(value: &UniValue) -> Option<Self>;
}

impl FromUniValue for i32 {
    const TYPE_NAME: &'static str = "int";

    fn from_uni_value(value: &UniValue) -> Option<Self> {
        match value {
            UniValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromUniValue for f32 {
    const TYPE_NAME: &'static str = "float";

    // Integers are valid wherever a float is expected.
    fn from_uni_value(value: &UniValue) -> Option<Self> {
        match value {
            UniValue::Float(v) => Some(*v),
            UniValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl FromUniValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_uni_value(value: &UniValue) -> Option<Self> {
        match value {
            UniValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromUniValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_uni_value(value: &UniValue) -> Option<Self> {
        match value {
            UniValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Custom fields attached to a map element, in declaration order.
///
/// Only UDMF maps carry these; for other formats the set is always empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniFields {
    fields: IndexMap<String, UniValue>,
}

impl UniFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<UniValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<UniValue> {
        self.fields.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&UniValue> {
        self.fields.get(name)
    }

    /// Returns the field converted to `T`, or `default` when the field is
    /// absent or holds a different type.
    pub fn get_value<T: FromUniValue>(&self, name: &str, default: T) -> T {
        self.fields
            .get(name)
            .and_then(T::from_uni_value)
            .unwrap_or(default)
    }

    /// Like [UniFields::get_value], but reports a type mismatch instead of
    /// silently falling back.
    pub fn try_get<T: FromUniValue>(&self, name: &str) -> Result<Option<T>, MapError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => match T::from_uni_value(value) {
                Some(v) => Ok(Some(v)),
                None => Err(MapError::FieldType {
                    name: name.to_string(),
                    found: value.type_name(),
                    expected: T::TYPE_NAME,
                }),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UniValue)> {
        self.fields.iter()
    }
}
