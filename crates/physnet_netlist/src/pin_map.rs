//! Default logical-to-physical pin tables per primitive kind.
//!
//! A placed cell whose pin map equals its kind's default table has had no
//! input or output permuted by the router; pass-through primitives are only
//! accepted in that state.

use crate::pin::{PinMap, PinRef};
use crate::primitive::PrimitiveKind;

/// Version of the tables below. Bumped whenever an entry changes, since
/// lowered netlists depend on them.
pub const PIN_MAP_VERSION: u32 = 1;

type Table = &'static [(&'static str, &'static str)];

const LUT1: Table = &[("I0", "A1"), ("O", "O6")];
const LUT2: Table = &[("I0", "A1"), ("I1", "A2"), ("O", "O6")];
const LUT3: Table = &[("I0", "A1"), ("I1", "A2"), ("I2", "A3"), ("O", "O6")];
const LUT4: Table = &[
    ("I0", "A1"),
    ("I1", "A2"),
    ("I2", "A3"),
    ("I3", "A4"),
    ("O", "O6"),
];
const LUT5: Table = &[
    ("I0", "A1"),
    ("I1", "A2"),
    ("I2", "A3"),
    ("I3", "A4"),
    ("I4", "A5"),
    ("O", "O6"),
];
const LUT6: Table = &[
    ("I0", "A1"),
    ("I1", "A2"),
    ("I2", "A3"),
    ("I3", "A4"),
    ("I4", "A5"),
    ("I5", "A6"),
    ("O", "O6"),
];
const LUT6_2: Table = &[
    ("I0", "A1"),
    ("I1", "A2"),
    ("I2", "A3"),
    ("I3", "A4"),
    ("I4", "A5"),
    ("I5", "A6"),
    ("O5", "O5"),
    ("O6", "O6"),
];
const RAM32X1S: Table = &[
    ("A0", "A1"),
    ("A1", "A2"),
    ("A2", "A3"),
    ("A3", "A4"),
    ("A4", "A5"),
    ("D", "DI1"),
    ("WCLK", "CLK"),
    ("WE", "WE"),
    ("O", "O6"),
];
const BUFG: Table = &[("I", "I0"), ("O", "O")];
const CARRY4: Table = &[
    ("CI", "CIN"),
    ("CYINIT", "CYINIT"),
    ("DI[0]", "DI0"),
    ("DI[1]", "DI1"),
    ("DI[2]", "DI2"),
    ("DI[3]", "DI3"),
    ("S[0]", "S0"),
    ("S[1]", "S1"),
    ("S[2]", "S2"),
    ("S[3]", "S3"),
    ("CO[0]", "CO0"),
    ("CO[1]", "CO1"),
    ("CO[2]", "CO2"),
    ("CO[3]", "CO3"),
    ("O[0]", "O0"),
    ("O[1]", "O1"),
    ("O[2]", "O2"),
    ("O[3]", "O3"),
];
const MUXF: Table = &[("I0", "0"), ("I1", "1"), ("S", "S0"), ("O", "OUT")];
const IBUF: Table = &[("I", "PAD"), ("O", "OUT")];
const OBUF: Table = &[("I", "IN"), ("O", "OUT")];
const OBUFT: Table = &[("I", "IN"), ("T", "TRI"), ("O", "OUT")];
const FDRE: Table = &[("C", "CK"), ("CE", "CE"), ("D", "D"), ("R", "SR"), ("Q", "Q")];
const FDSE: Table = &[("C", "CK"), ("CE", "CE"), ("D", "D"), ("S", "SR"), ("Q", "Q")];
const FDCE: Table = &[("C", "CK"), ("CE", "CE"), ("CLR", "SR"), ("D", "D"), ("Q", "Q")];
const FDPE: Table = &[("C", "CK"), ("CE", "CE"), ("D", "D"), ("PRE", "SR"), ("Q", "Q")];

fn table(kind: &PrimitiveKind) -> Option<Table> {
    let table = match kind {
        PrimitiveKind::Lut1 => LUT1,
        PrimitiveKind::Lut2 => LUT2,
        PrimitiveKind::Lut3 => LUT3,
        PrimitiveKind::Lut4 => LUT4,
        PrimitiveKind::Lut5 => LUT5,
        PrimitiveKind::Lut6 => LUT6,
        PrimitiveKind::Lut6_2 => LUT6_2,
        PrimitiveKind::Ram32X1S => RAM32X1S,
        PrimitiveKind::Bufg => BUFG,
        PrimitiveKind::Carry4 => CARRY4,
        PrimitiveKind::Muxf7 | PrimitiveKind::Muxf8 => MUXF,
        PrimitiveKind::Ibuf => IBUF,
        PrimitiveKind::Obuf => OBUF,
        PrimitiveKind::Obuft => OBUFT,
        PrimitiveKind::Fdre => FDRE,
        PrimitiveKind::Fdse => FDSE,
        PrimitiveKind::Fdce => FDCE,
        PrimitiveKind::Fdpe => FDPE,
        _ => return None,
    };
    Some(table)
}

/// Returns `true` if the kind has a default pin table.
pub fn has_default_mapping(kind: &PrimitiveKind) -> bool {
    table(kind).is_some()
}

/// Returns the default physical pin for a logical pin of the given kind.
pub fn default_physical(kind: &PrimitiveKind, logical: &PinRef) -> Option<&'static str> {
    let text = logical.to_string();
    table(kind)?
        .iter()
        .find(|(l, _)| *l == text)
        .map(|(_, p)| *p)
}

/// Returns the logical pin the default table maps onto `physical`.
pub fn default_logical(kind: &PrimitiveKind, physical: &str) -> Option<PinRef> {
    table(kind)?
        .iter()
        .find(|(_, p)| *p == physical)
        .and_then(|(l, _)| l.parse().ok())
}

/// Returns the full default table of a kind as a [`PinMap`].
pub fn default_pin_map(kind: &PrimitiveKind) -> Option<PinMap> {
    PinMap::from_pairs(table(kind)?.iter().copied()).ok()
}

/// Returns `true` if every entry of `pins` agrees with the kind's default
/// table. Kinds without a table never match.
pub fn is_default_mapping(kind: &PrimitiveKind, pins: &PinMap) -> bool {
    has_default_mapping(kind)
        && pins
            .iter()
            .all(|(logical, physical)| default_physical(kind, logical) == Some(physical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_inverse_lookup() {
        let kind = PrimitiveKind::Carry4;
        assert_eq!(default_physical(&kind, &PinRef::bit("DI", 2)), Some("DI2"));
        assert_eq!(default_logical(&kind, "CIN"), Some(PinRef::scalar("CI")));
        assert_eq!(default_logical(&kind, "CO3"), Some(PinRef::bit("CO", 3)));
        assert_eq!(default_logical(&kind, "A1"), None);
    }

    #[test]
    fn identity_mapping_is_default() {
        let kind = PrimitiveKind::Muxf7;
        let pins = default_pin_map(&kind).unwrap();
        assert!(is_default_mapping(&kind, &pins));
    }

    #[test]
    fn partial_default_mapping_still_default() {
        let pins = PinMap::from_pairs([("I", "I0")]).unwrap();
        assert!(is_default_mapping(&PrimitiveKind::Bufg, &pins));
    }

    #[test]
    fn swapped_pins_are_not_default() {
        let pins = PinMap::from_pairs([("S[0]", "S1"), ("S[1]", "S0")]).unwrap();
        assert!(!is_default_mapping(&PrimitiveKind::Carry4, &pins));
    }

    #[test]
    fn kinds_without_table_never_match() {
        let pins = PinMap::new();
        assert!(!is_default_mapping(&PrimitiveKind::Ramb36e1, &pins));
        assert!(default_pin_map(&PrimitiveKind::Ram32M).is_none());
    }

    #[test]
    fn every_table_parses_and_is_injective() {
        for name in [
            "LUT1", "LUT2", "LUT3", "LUT4", "LUT5", "LUT6", "LUT6_2", "RAM32X1S", "BUFG", "CARRY4",
            "MUXF7", "MUXF8", "IBUF", "OBUF", "OBUFT", "FDRE", "FDSE", "FDCE", "FDPE",
        ] {
            let kind = PrimitiveKind::from_name(name);
            let map = default_pin_map(&kind).unwrap();
            let mut physical: Vec<&str> = map.iter().map(|(_, p)| p).collect();
            let total = physical.len();
            physical.sort_unstable();
            physical.dedup();
            assert_eq!(physical.len(), total, "{name}");
        }
    }

    #[test]
    fn default_tables_only_use_declared_ports() {
        for name in ["LUT6_2", "CARRY4", "FDCE", "OBUFT", "RAM32X1S"] {
            let kind = PrimitiveKind::from_name(name);
            for (logical, _) in default_pin_map(&kind).unwrap().iter() {
                assert!(kind.port(&logical.port).is_some(), "{name}.{logical}");
            }
        }
    }
}
