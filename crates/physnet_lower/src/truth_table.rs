//! Re-derivation of LUT truth tables over physical LUT inputs.
//!
//! A logical `LUTk` evaluates `INIT[Σ Ij << j]`. Once placed, logical input
//! `Ij` arrives on physical pin `An`, so the function the BEL implements is a
//! 64-entry table indexed by `Σ A(n) << (n-1)`. These helpers compute that
//! table so paired LUTs can be recombined into one LUT6_2 `INIT`.

use crate::error::TransformError;
use physnet_common::BitLiteral;
use physnet_netlist::{PinMap, PinRef};

/// Number of rows in a physical LUT table.
pub const ROWS: u32 = 64;

/// Returns the zero-based physical input index of pin `A1`..`A6`.
pub fn physical_input(pin: &str) -> Option<u32> {
    let digit = pin.strip_prefix('A')?.parse::<u32>().ok()?;
    (1..=6).contains(&digit).then(|| digit - 1)
}

/// Returns the zero-based logical input index of pin `I0`..`I5`.
fn logical_input(pin: &PinRef) -> Option<u32> {
    if pin.index.is_some() {
        return None;
    }
    let index = pin.port.strip_prefix('I')?.parse::<u32>().ok()?;
    (index < 6).then_some(index)
}

/// Computes the physical table of a logical `LUTk` with the given `INIT`
/// and placement pin map.
///
/// Logical inputs without a physical pin read as 1, matching the VCC tie the
/// pass gives every unconnected LUT6_2 input.
pub fn physical_table(
    cell: &str,
    init: &BitLiteral,
    inputs: u32,
    pins: &PinMap,
) -> Result<u64, TransformError> {
    if init.width() != 1 << inputs {
        return Err(TransformError::invariant(format!(
            "cell `{cell}`: INIT is {} bits wide, a {inputs}-input LUT needs {}",
            init.width(),
            1u32 << inputs
        )));
    }
    // position[j] = physical input carrying logical input j
    let mut position: Vec<Option<u32>> = vec![None; inputs as usize];
    for (logical, physical) in pins.iter() {
        if physical.starts_with('O') {
            continue;
        }
        let j = logical_input(logical)
            .filter(|j| *j < inputs)
            .ok_or_else(|| {
                TransformError::invariant(format!(
                    "cell `{cell}`: pin map names unknown LUT input `{logical}`"
                ))
            })?;
        let n = physical_input(physical).ok_or_else(|| {
            TransformError::invariant(format!(
                "cell `{cell}`: `{logical}` is mapped to non-LUT pin `{physical}`"
            ))
        })?;
        position[j as usize] = Some(n);
    }

    let mut table = 0u64;
    for row in 0..ROWS {
        let mut index = 0u32;
        for (j, pos) in position.iter().enumerate() {
            let value = match pos {
                Some(n) => (row >> n) & 1,
                None => 1,
            };
            index |= value << j;
        }
        if init.bit(index) {
            table |= 1 << row;
        }
    }
    Ok(table)
}

/// Computes the table of a routethrough: the identity of the single LUT
/// input the routed signal enters on.
pub fn routethru_table(consumer: &str, pins: &PinMap) -> Result<u64, TransformError> {
    let mut entries = pins.iter();
    let (Some((_, physical)), None) = (entries.next(), entries.next()) else {
        return Err(TransformError::invariant(format!(
            "routethrough into `{consumer}` must map exactly one pin, found {}",
            pins.len()
        )));
    };
    let n = physical_input(physical).ok_or_else(|| {
        TransformError::invariant(format!(
            "routethrough into `{consumer}` enters on non-LUT pin `{physical}`"
        ))
    })?;
    let mut table = 0u64;
    for row in 0..ROWS {
        if (row >> n) & 1 == 1 {
            table |= 1 << row;
        }
    }
    Ok(table)
}

/// Returns `true` if the table's output changes with physical input `n`.
pub fn depends_on(table: u64, n: u32) -> bool {
    (0..ROWS).any(|row| ((table >> row) & 1) != ((table >> (row ^ (1 << n))) & 1))
}

/// Evaluates a table at one physical input vector.
pub fn eval(table: u64, row: u32) -> bool {
    (table >> row) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins(pairs: &[(&str, &str)]) -> PinMap {
        PinMap::from_pairs(pairs.iter().copied()).unwrap()
    }

    fn init(text: &str) -> BitLiteral {
        text.parse().unwrap()
    }

    #[test]
    fn physical_input_names() {
        assert_eq!(physical_input("A1"), Some(0));
        assert_eq!(physical_input("A6"), Some(5));
        assert_eq!(physical_input("A7"), None);
        assert_eq!(physical_input("A0"), None);
        assert_eq!(physical_input("O6"), None);
    }

    #[test]
    fn identity_lut6_keeps_init() {
        let map = pins(&[
            ("I0", "A1"),
            ("I1", "A2"),
            ("I2", "A3"),
            ("I3", "A4"),
            ("I4", "A5"),
            ("I5", "A6"),
            ("O", "O6"),
        ]);
        let lit = init("64'hFEDCBA9876543210");
        let table = physical_table("u", &lit, 6, &map).unwrap();
        assert_eq!(table, 0xFEDC_BA98_7654_3210);
    }

    #[test]
    fn swapped_inputs_permute_rows() {
        // LUT2 computing I0 & !I1 (INIT rows: 01 -> 1)
        let lit = init("4'h2");
        let map = pins(&[("I0", "A2"), ("I1", "A1"), ("O", "O6")]);
        let table = physical_table("u", &lit, 2, &map).unwrap();
        for row in 0..ROWS {
            let a1 = row & 1 == 1;
            let a2 = (row >> 1) & 1 == 1;
            assert_eq!(eval(table, row), a2 && !a1, "row {row}");
        }
    }

    #[test]
    fn unmapped_inputs_read_as_one() {
        // LUT2 = I0 & I1, only I0 mapped: behaves as I0
        let lit = init("4'h8");
        let map = pins(&[("I0", "A3"), ("O", "O6")]);
        let table = physical_table("u", &lit, 2, &map).unwrap();
        for row in 0..ROWS {
            assert_eq!(eval(table, row), (row >> 2) & 1 == 1);
        }
    }

    #[test]
    fn width_mismatch_rejected() {
        let lit = init("32'h0");
        let err = physical_table("u", &lit, 6, &PinMap::new()).unwrap_err();
        assert!(matches!(err, TransformError::InvariantViolation(_)));
    }

    #[test]
    fn bad_pin_names_rejected() {
        let lit = init("4'h8");
        assert!(physical_table("u", &lit, 2, &pins(&[("I2", "A1")])).is_err());
        assert!(physical_table("u", &lit, 2, &pins(&[("I0", "B1")])).is_err());
    }

    #[test]
    fn routethru_is_identity_of_entry_pin() {
        let table = routethru_table("ff", &pins(&[("D", "A4")])).unwrap();
        for row in 0..ROWS {
            assert_eq!(eval(table, row), (row >> 3) & 1 == 1);
        }
        assert!(depends_on(table, 3));
        assert!(!depends_on(table, 5));
    }

    #[test]
    fn routethru_requires_single_entry() {
        assert!(routethru_table("ff", &PinMap::new()).is_err());
        assert!(routethru_table("ff", &pins(&[("D", "A1"), ("CE", "A2")])).is_err());
        assert!(routethru_table("ff", &pins(&[("D", "O6")])).is_err());
    }

    #[test]
    fn dependence() {
        assert!(!depends_on(0, 0));
        assert!(!depends_on(u64::MAX, 5));
        assert!(depends_on(0xFFFF_FFFF_0000_0000, 5));
        assert!(!depends_on(0xFFFF_FFFF_0000_0000, 4));
    }
}
