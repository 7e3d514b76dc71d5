//! The closed set of primitive kinds the lowering pass understands, with
//! their static port declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a primitive port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven by the net.
    Input,
    /// Drives the net.
    Output,
}

/// Static declaration of one port of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDecl {
    /// Port name, e.g. `I0` or `DI`.
    pub name: &'static str,
    /// Port direction.
    pub direction: PortDirection,
    /// Bus width, or `None` for a scalar port.
    pub width: Option<u32>,
}

const fn input(name: &'static str) -> PortDecl {
    PortDecl {
        name,
        direction: PortDirection::Input,
        width: None,
    }
}

const fn output(name: &'static str) -> PortDecl {
    PortDecl {
        name,
        direction: PortDirection::Output,
        width: None,
    }
}

const fn input_bus(name: &'static str, width: u32) -> PortDecl {
    PortDecl {
        name,
        direction: PortDirection::Input,
        width: Some(width),
    }
}

const fn output_bus(name: &'static str, width: u32) -> PortDecl {
    PortDecl {
        name,
        direction: PortDirection::Output,
        width: Some(width),
    }
}

const LUT1_PORTS: &[PortDecl] = &[input("I0"), output("O")];
const LUT2_PORTS: &[PortDecl] = &[input("I0"), input("I1"), output("O")];
const LUT3_PORTS: &[PortDecl] = &[input("I0"), input("I1"), input("I2"), output("O")];
const LUT4_PORTS: &[PortDecl] = &[
    input("I0"),
    input("I1"),
    input("I2"),
    input("I3"),
    output("O"),
];
const LUT5_PORTS: &[PortDecl] = &[
    input("I0"),
    input("I1"),
    input("I2"),
    input("I3"),
    input("I4"),
    output("O"),
];
const LUT6_PORTS: &[PortDecl] = &[
    input("I0"),
    input("I1"),
    input("I2"),
    input("I3"),
    input("I4"),
    input("I5"),
    output("O"),
];
const LUT6_2_PORTS: &[PortDecl] = &[
    input("I0"),
    input("I1"),
    input("I2"),
    input("I3"),
    input("I4"),
    input("I5"),
    output("O5"),
    output("O6"),
];
const RAM32X1S_PORTS: &[PortDecl] = &[
    input("A0"),
    input("A1"),
    input("A2"),
    input("A3"),
    input("A4"),
    input("D"),
    input("WCLK"),
    input("WE"),
    output("O"),
];
const RAM32X1D_PORTS: &[PortDecl] = &[
    input("A0"),
    input("A1"),
    input("A2"),
    input("A3"),
    input("A4"),
    input("D"),
    input("DPRA0"),
    input("DPRA1"),
    input("DPRA2"),
    input("DPRA3"),
    input("DPRA4"),
    input("WCLK"),
    input("WE"),
    output("DPO"),
    output("SPO"),
];
const RAM32M_PORTS: &[PortDecl] = &[
    input_bus("ADDRA", 5),
    input_bus("ADDRB", 5),
    input_bus("ADDRC", 5),
    input_bus("ADDRD", 5),
    input_bus("DIA", 2),
    input_bus("DIB", 2),
    input_bus("DIC", 2),
    input_bus("DID", 2),
    input("WCLK"),
    input("WE"),
    output_bus("DOA", 2),
    output_bus("DOB", 2),
    output_bus("DOC", 2),
    output_bus("DOD", 2),
];
const BUFG_PORTS: &[PortDecl] = &[input("I"), output("O")];
const BUFGCTRL_PORTS: &[PortDecl] = &[
    input("CE0"),
    input("CE1"),
    input("I0"),
    input("I1"),
    input("IGNORE0"),
    input("IGNORE1"),
    input("S0"),
    input("S1"),
    output("O"),
];
const CARRY4_PORTS: &[PortDecl] = &[
    input("CI"),
    input("CYINIT"),
    input_bus("DI", 4),
    input_bus("S", 4),
    output_bus("CO", 4),
    output_bus("O", 4),
];
const MUXF_PORTS: &[PortDecl] = &[input("I0"), input("I1"), input("S"), output("O")];
const IBUF_PORTS: &[PortDecl] = &[input("I"), output("O")];
const OBUFT_PORTS: &[PortDecl] = &[input("I"), input("T"), output("O")];
const FDRE_PORTS: &[PortDecl] = &[input("C"), input("CE"), input("D"), input("R"), output("Q")];
const FDSE_PORTS: &[PortDecl] = &[input("C"), input("CE"), input("D"), input("S"), output("Q")];
const FDCE_PORTS: &[PortDecl] = &[
    input("C"),
    input("CE"),
    input("CLR"),
    input("D"),
    output("Q"),
];
const FDPE_PORTS: &[PortDecl] = &[
    input("C"),
    input("CE"),
    input("D"),
    input("PRE"),
    output("Q"),
];
const GND_PORTS: &[PortDecl] = &[output("G")];
const VCC_PORTS: &[PortDecl] = &[output("P")];

/// A primitive cell kind.
///
/// The lowering pass matches on this exhaustively; kinds it has no rule for
/// arrive as [`PrimitiveKind::Unsupported`] and are rejected there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrimitiveKind {
    /// 1-input LUT.
    Lut1,
    /// 2-input LUT.
    Lut2,
    /// 3-input LUT.
    Lut3,
    /// 4-input LUT.
    Lut4,
    /// 5-input LUT.
    Lut5,
    /// 6-input LUT.
    Lut6,
    /// Dual-output LUT macro (`O6` over six inputs, `O5` over five).
    Lut6_2,
    /// 32x1 single-port distributed RAM.
    Ram32X1S,
    /// 32x1 dual-port distributed RAM.
    Ram32X1D,
    /// 32x2 quad-port distributed RAM.
    Ram32M,
    /// Global clock buffer.
    Bufg,
    /// Global clock buffer with select/enable control.
    Bufgctrl,
    /// Fast carry chain.
    Carry4,
    /// Wide function multiplexer combining two LUTs.
    Muxf7,
    /// Wide function multiplexer combining two MUXF7s.
    Muxf8,
    /// Input buffer.
    Ibuf,
    /// Output buffer.
    Obuf,
    /// Tristate output buffer.
    Obuft,
    /// Flip-flop with clock enable and synchronous reset.
    Fdre,
    /// Flip-flop with clock enable and synchronous set.
    Fdse,
    /// Flip-flop with clock enable and asynchronous clear.
    Fdce,
    /// Flip-flop with clock enable and asynchronous preset.
    Fdpe,
    /// 36Kb block RAM.
    Ramb36e1,
    /// Constant-0 generator.
    Gnd,
    /// Constant-1 generator.
    Vcc,
    /// Any primitive outside the known set, by its library name.
    Unsupported(String),
}

impl PrimitiveKind {
    /// Looks up a kind by its library name (`"LUT6"`, `"CARRY4"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "LUT1" => Self::Lut1,
            "LUT2" => Self::Lut2,
            "LUT3" => Self::Lut3,
            "LUT4" => Self::Lut4,
            "LUT5" => Self::Lut5,
            "LUT6" => Self::Lut6,
            "LUT6_2" => Self::Lut6_2,
            "RAM32X1S" => Self::Ram32X1S,
            "RAM32X1D" => Self::Ram32X1D,
            "RAM32M" => Self::Ram32M,
            "BUFG" => Self::Bufg,
            "BUFGCTRL" => Self::Bufgctrl,
            "CARRY4" => Self::Carry4,
            "MUXF7" => Self::Muxf7,
            "MUXF8" => Self::Muxf8,
            "IBUF" => Self::Ibuf,
            "OBUF" => Self::Obuf,
            "OBUFT" => Self::Obuft,
            "FDRE" => Self::Fdre,
            "FDSE" => Self::Fdse,
            "FDCE" => Self::Fdce,
            "FDPE" => Self::Fdpe,
            "RAMB36E1" => Self::Ramb36e1,
            "GND" => Self::Gnd,
            "VCC" => Self::Vcc,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Returns the library name of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::Lut1 => "LUT1",
            Self::Lut2 => "LUT2",
            Self::Lut3 => "LUT3",
            Self::Lut4 => "LUT4",
            Self::Lut5 => "LUT5",
            Self::Lut6 => "LUT6",
            Self::Lut6_2 => "LUT6_2",
            Self::Ram32X1S => "RAM32X1S",
            Self::Ram32X1D => "RAM32X1D",
            Self::Ram32M => "RAM32M",
            Self::Bufg => "BUFG",
            Self::Bufgctrl => "BUFGCTRL",
            Self::Carry4 => "CARRY4",
            Self::Muxf7 => "MUXF7",
            Self::Muxf8 => "MUXF8",
            Self::Ibuf => "IBUF",
            Self::Obuf => "OBUF",
            Self::Obuft => "OBUFT",
            Self::Fdre => "FDRE",
            Self::Fdse => "FDSE",
            Self::Fdce => "FDCE",
            Self::Fdpe => "FDPE",
            Self::Ramb36e1 => "RAMB36E1",
            Self::Gnd => "GND",
            Self::Vcc => "VCC",
            Self::Unsupported(name) => name,
        }
    }

    /// Returns the declared ports, or `None` for opaque kinds whose pins are
    /// not checked (block RAM and unsupported primitives).
    pub fn ports(&self) -> Option<&'static [PortDecl]> {
        let ports = match self {
            Self::Lut1 => LUT1_PORTS,
            Self::Lut2 => LUT2_PORTS,
            Self::Lut3 => LUT3_PORTS,
            Self::Lut4 => LUT4_PORTS,
            Self::Lut5 => LUT5_PORTS,
            Self::Lut6 => LUT6_PORTS,
            Self::Lut6_2 => LUT6_2_PORTS,
            Self::Ram32X1S => RAM32X1S_PORTS,
            Self::Ram32X1D => RAM32X1D_PORTS,
            Self::Ram32M => RAM32M_PORTS,
            Self::Bufg => BUFG_PORTS,
            Self::Bufgctrl => BUFGCTRL_PORTS,
            Self::Carry4 => CARRY4_PORTS,
            Self::Muxf7 | Self::Muxf8 => MUXF_PORTS,
            Self::Ibuf | Self::Obuf => IBUF_PORTS,
            Self::Obuft => OBUFT_PORTS,
            Self::Fdre => FDRE_PORTS,
            Self::Fdse => FDSE_PORTS,
            Self::Fdce => FDCE_PORTS,
            Self::Fdpe => FDPE_PORTS,
            Self::Gnd => GND_PORTS,
            Self::Vcc => VCC_PORTS,
            Self::Ramb36e1 | Self::Unsupported(_) => return None,
        };
        Some(ports)
    }

    /// Returns the declaration of the named port, if the kind declares it.
    pub fn port(&self, name: &str) -> Option<&'static PortDecl> {
        self.ports()?.iter().find(|p| p.name == name)
    }

    /// Returns the input count for `LUT1`..`LUT6`, `None` otherwise.
    pub fn lut_inputs(&self) -> Option<u32> {
        match self {
            Self::Lut1 => Some(1),
            Self::Lut2 => Some(2),
            Self::Lut3 => Some(3),
            Self::Lut4 => Some(4),
            Self::Lut5 => Some(5),
            Self::Lut6 => Some(6),
            _ => None,
        }
    }

    /// Returns the `(property, bit width)` pairs of the truth-table or
    /// memory-contents properties this kind must carry.
    pub fn init_properties(&self) -> &'static [(&'static str, u32)] {
        match self {
            Self::Lut1 => &[("INIT", 2)],
            Self::Lut2 => &[("INIT", 4)],
            Self::Lut3 => &[("INIT", 8)],
            Self::Lut4 => &[("INIT", 16)],
            Self::Lut5 => &[("INIT", 32)],
            Self::Lut6 | Self::Lut6_2 => &[("INIT", 64)],
            Self::Ram32X1S | Self::Ram32X1D => &[("INIT", 32)],
            Self::Ram32M => &[
                ("INIT_A", 64),
                ("INIT_B", 64),
                ("INIT_C", 64),
                ("INIT_D", 64),
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for PrimitiveKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<PrimitiveKind> for String {
    fn from(kind: PrimitiveKind) -> String {
        kind.name().to_string()
    }
}
