//! Pin references (`I0`, `DI[2]`) and per-cell logical-to-physical pin maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A reference to a scalar port or one bit of a bus port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PinRef {
    /// Port name.
    pub port: String,
    /// Bus bit, or `None` for a scalar port.
    pub index: Option<u32>,
}

impl PinRef {
    /// A scalar port reference.
    pub fn scalar(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            index: None,
        }
    }

    /// A reference to bit `index` of a bus port.
    pub fn bit(port: impl Into<String>, index: u32) -> Self {
        Self {
            port: port.into(),
            index: Some(index),
        }
    }
}

/// Error returned for malformed pin text such as `DI[` or `[3]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed pin reference `{0}`")]
pub struct ParsePinError(pub String);

impl FromStr for PinRef {
    type Err = ParsePinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParsePinError(s.to_string());
        let (port, index) = match s.split_once('[') {
            None => (s, None),
            Some((port, rest)) => {
                let digits = rest.strip_suffix(']').ok_or_else(malformed)?;
                let index: u32 = digits.parse().map_err(|_| malformed())?;
                (port, Some(index))
            }
        };
        if port.is_empty() || port.contains(']') {
            return Err(malformed());
        }
        Ok(Self {
            port: port.to_string(),
            index,
        })
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{i}]", self.port),
            None => f.write_str(&self.port),
        }
    }
}

impl TryFrom<String> for PinRef {
    type Error = ParsePinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PinRef> for String {
    fn from(pin: PinRef) -> String {
        pin.to_string()
    }
}

/// A placed cell's logical-pin to physical-BEL-pin correspondence.
///
/// For a LUT on `A6LUT` this might be `I0 -> A3, I1 -> A1, O -> O6`. For a
/// routethrough occupant it holds a single entry naming the consumer's
/// logical pin and the LUT input the signal enters on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinMap(BTreeMap<PinRef, String>);

impl PinMap {
    /// Creates an empty pin map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(logical, physical)` text pairs.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ParsePinError> {
        let mut map = Self::new();
        for (logical, physical) in pairs {
            map.insert(logical.parse()?, physical);
        }
        Ok(map)
    }

    /// Maps `logical` to `physical`, replacing any previous entry.
    pub fn insert(&mut self, logical: PinRef, physical: impl Into<String>) {
        self.0.insert(logical, physical.into());
    }

    /// Returns the physical pin for a logical pin.
    pub fn physical(&self, logical: &PinRef) -> Option<&str> {
        self.0.get(logical).map(String::as_str)
    }

    /// Returns the logical pin mapped onto a physical pin.
    pub fn logical(&self, physical: &str) -> Option<&PinRef> {
        self.0
            .iter()
            .find(|(_, p)| p.as_str() == physical)
            .map(|(l, _)| l)
    }

    /// Iterates over `(logical, physical)` entries in logical-pin order.
    pub fn iter(&self) -> impl Iterator<Item = (&PinRef, &str)> {
        self.0.iter().map(|(l, p)| (l, p.as_str()))
    }

    /// Returns the number of mapped pins.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no pins are mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
