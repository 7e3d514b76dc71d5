//! Sized bit literals in the `<width>'<radix><digits>` form used by primitive
//! properties (`64'h0000FFFF0000FFFF`, `1'b1`, `4'd8`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The widest literal representable; LUT6_2 and RAM32M quadrant tables are 64 bits.
pub const MAX_WIDTH: u32 = 64;

/// The radix a literal was written in. Only affects formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Radix {
    /// `'b`
    Binary,
    /// `'d`
    Decimal,
    /// `'h`
    Hex,
}

impl Radix {
    fn letter(self) -> char {
        match self {
            Radix::Binary => 'b',
            Radix::Decimal => 'd',
            Radix::Hex => 'h',
        }
    }

    fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }
}

/// Error returned when parsing or constructing a bit literal fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBitsError {
    /// The text has no `'` separating width and digits.
    #[error("missing width separator in bit literal `{0}`")]
    MissingSeparator(String),
    /// The width prefix is not a decimal integer.
    #[error("invalid width in bit literal `{0}`")]
    InvalidWidth(String),
    /// The width is zero or larger than 64.
    #[error("bit literal width {0} is outside 1..=64")]
    WidthOutOfRange(u32),
    /// The radix letter is not one of `b`, `d`, `h`.
    #[error("unknown radix `{0}` in bit literal")]
    UnknownRadix(char),
    /// The digits are empty or not valid in the given radix.
    #[error("invalid digits in bit literal `{0}`")]
    InvalidDigits(String),
    /// The value has bits set above the declared width.
    #[error("value does not fit in {width} bits")]
    Overflow {
        /// The declared width.
        width: u32,
    },
}

/// A fixed-width unsigned value of at most 64 bits.
///
/// Equality, ordering and hashing consider only `(width, value)`, so `32'hF`
/// and `32'd15` compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitLiteral {
    width: u32,
    value: u64,
    radix: Radix,
}

impl BitLiteral {
    /// Creates a hex literal, rejecting widths outside `1..=64` and values
    /// that overflow the width.
    pub fn new(width: u32, value: u64) -> Result<Self, ParseBitsError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(ParseBitsError::WidthOutOfRange(width));
        }
        if value & !mask(width) != 0 {
            return Err(ParseBitsError::Overflow { width });
        }
        Ok(Self {
            width,
            value,
            radix: Radix::Hex,
        })
    }

    /// Returns the declared width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns the radix the literal formats in.
    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// Returns bit `index` (0 = least significant). Bits past the width read as 0.
    pub fn bit(&self, index: u32) -> bool {
        index < self.width && (self.value >> index) & 1 == 1
    }

    /// Zero-extends (or keeps) the value at a new width, formatted as hex.
    pub fn widen(&self, width: u32) -> Result<Self, ParseBitsError> {
        Self::new(width, self.value)
    }
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl PartialEq for BitLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.value == other.value
    }
}

impl Eq for BitLiteral {}

impl Hash for BitLiteral {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.value.hash(state);
    }
}

impl PartialOrd for BitLiteral {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitLiteral {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.width, self.value).cmp(&(other.width, other.value))
    }
}

impl FromStr for BitLiteral {
    type Err = ParseBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (width_text, rest) = s
            .split_once('\'')
            .ok_or_else(|| ParseBitsError::MissingSeparator(s.to_string()))?;
        let width: u32 = width_text
            .parse()
            .map_err(|_| ParseBitsError::InvalidWidth(s.to_string()))?;
        let mut chars = rest.chars();
        let radix = match chars.next() {
            Some('b') | Some('B') => Radix::Binary,
            Some('d') | Some('D') => Radix::Decimal,
            Some('h') | Some('H') => Radix::Hex,
            Some(other) => return Err(ParseBitsError::UnknownRadix(other)),
            None => return Err(ParseBitsError::InvalidDigits(s.to_string())),
        };
        let digits: String = chars.filter(|c| *c != '_').collect();
        if digits.is_empty() {
            return Err(ParseBitsError::InvalidDigits(s.to_string()));
        }
        let value = u64::from_str_radix(&digits, radix.base())
            .map_err(|_| ParseBitsError::InvalidDigits(s.to_string()))?;
        let mut lit = Self::new(width, value)?;
        lit.radix = radix;
        Ok(lit)
    }
}

impl fmt::Display for BitLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Hex => {
                let digits = self.width.div_ceil(4) as usize;
                write!(f, "{}'h{:0digits$X}", self.width, self.value)
            }
            Radix::Binary => {
                let digits = self.width as usize;
                write!(f, "{}'b{:0digits$b}", self.width, self.value)
            }
            Radix::Decimal => write!(f, "{}'{}{}", self.width, self.radix.letter(), self.value),
        }
    }
}

impl TryFrom<String> for BitLiteral {
    type Error = ParseBitsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BitLiteral> for String {
    fn from(lit: BitLiteral) -> String {
        lit.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_init() {
        let lit: BitLiteral = "64'h0000FFFF0000FFFF".parse().unwrap();
        assert_eq!(lit.width(), 64);
        assert_eq!(lit.value(), 0x0000_FFFF_0000_FFFF);
        assert_eq!(lit.radix(), Radix::Hex);
    }

    #[test]
    fn parse_binary_and_decimal() {
        let one: BitLiteral = "1'b1".parse().unwrap();
        assert_eq!(one.value(), 1);
        assert_eq!(one.width(), 1);
        let eight: BitLiteral = "4'd8".parse().unwrap();
        assert_eq!(eight.value(), 8);
    }

    #[test]
    fn display_pads_hex_digits() {
        let lit = BitLiteral::new(64, 0xAB).unwrap();
        assert_eq!(lit.to_string(), "64'h00000000000000AB");
        let lit = BitLiteral::new(32, 0x1).unwrap();
        assert_eq!(lit.to_string(), "32'h00000001");
        let lit = BitLiteral::new(2, 0x3).unwrap();
        assert_eq!(lit.to_string(), "2'h3");
    }

    #[test]
    fn display_binary() {
        let lit: BitLiteral = "3'b101".parse().unwrap();
        assert_eq!(lit.to_string(), "3'b101");
    }

    #[test]
    fn lowercase_hex_accepted() {
        let lit: BitLiteral = "32'hdeadbeef".parse().unwrap();
        assert_eq!(lit.value(), 0xDEAD_BEEF);
        assert_eq!(lit.to_string(), "32'hDEADBEEF");
    }

    #[test]
    fn equality_ignores_radix() {
        let a: BitLiteral = "32'hF".parse().unwrap();
        let b: BitLiteral = "32'd15".parse().unwrap();
        assert_eq!(a, b);
        let c: BitLiteral = "16'hF".parse().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn overflow_rejected() {
        let err = "4'h1F".parse::<BitLiteral>().unwrap_err();
        assert_eq!(err, ParseBitsError::Overflow { width: 4 });
    }

    #[test]
    fn width_out_of_range() {
        assert_eq!(
            BitLiteral::new(0, 0).unwrap_err(),
            ParseBitsError::WidthOutOfRange(0)
        );
        assert_eq!(
            "65'h0".parse::<BitLiteral>().unwrap_err(),
            ParseBitsError::WidthOutOfRange(65)
        );
    }

    #[test]
    fn malformed_text() {
        assert!(matches!(
            "FFFF".parse::<BitLiteral>(),
            Err(ParseBitsError::MissingSeparator(_))
        ));
        assert!(matches!(
            "x'hF".parse::<BitLiteral>(),
            Err(ParseBitsError::InvalidWidth(_))
        ));
        assert!(matches!(
            "8'qF".parse::<BitLiteral>(),
            Err(ParseBitsError::UnknownRadix('q'))
        ));
        assert!(matches!(
            "8'h".parse::<BitLiteral>(),
            Err(ParseBitsError::InvalidDigits(_))
        ));
        assert!(matches!(
            "8'hZZ".parse::<BitLiteral>(),
            Err(ParseBitsError::InvalidDigits(_))
        ));
    }

    #[test]
    fn bit_access() {
        let lit = BitLiteral::new(8, 0b1010_0001).unwrap();
        assert!(lit.bit(0));
        assert!(!lit.bit(1));
        assert!(lit.bit(7));
        assert!(!lit.bit(8));
    }

    #[test]
    fn widen_zero_extends() {
        let lit: BitLiteral = "32'h89ABCDEF".parse().unwrap();
        let wide = lit.widen(64).unwrap();
        assert_eq!(wide.to_string(), "64'h0000000089ABCDEF");
        assert!(lit.widen(16).is_err());
    }

    #[test]
    fn serde_as_string() {
        let lit: BitLiteral = "64'h00000000000000FF".parse().unwrap();
        let json = serde_json::to_string(&lit).unwrap();
        assert_eq!(json, "\"64'h00000000000000FF\"");
        let back: BitLiteral = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lit);
    }

    #[test]
    fn error_display() {
        let err = ParseBitsError::WidthOutOfRange(70);
        assert_eq!(err.to_string(), "bit literal width 70 is outside 1..=64");
    }
}
