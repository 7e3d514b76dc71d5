//! Typed, insertion-ordered cell properties.

use physnet_common::BitLiteral;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Free-form text such as `"TRUE"`.
    String(String),
    /// An integer such as a BUFGCTRL inversion flag.
    Int(i64),
    /// A boolean.
    Bool(bool),
    /// A sized bit literal such as `64'h0000FFFF0000FFFF`.
    Bits(BitLiteral),
}

impl PropertyValue {
    /// Returns the bit literal, if this is a `Bits` value.
    pub fn as_bits(&self) -> Option<&BitLiteral> {
        match self {
            PropertyValue::Bits(bits) => Some(bits),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{s}\""),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Bits(bits) => write!(f, "{bits}"),
        }
    }
}

impl From<BitLiteral> for PropertyValue {
    fn from(bits: BitLiteral) -> Self {
        PropertyValue::Bits(bits)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

/// An ordered list of `(name, value)` properties with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(Vec<(String, PropertyValue)>);

impl PropertyMap {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of the named property.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Sets a property. An existing property keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    /// Removes a property, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    /// Iterates over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
