//! Register map of the MCP23xxx family.
//!
//! Datasheets:
//! - MCP23008/MCP23S08: https://ww1.microchip.com/downloads/en/DeviceDoc/MCP23008-MCP23S08-Data-Sheet-20001919F.pdf
//! - MCP23009/MCP23S09: https://ww1.microchip.com/downloads/en/DeviceDoc/20002121C.pdf
//! - MCP23017/MCP23S17: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//! - MCP23018/MCP23S18: https://ww1.microchip.com/downloads/en/DeviceDoc/22103a.pdf
//!
//! The 8-bit parts have a single bank of 11 registers at 0x00..=0x0A.  The 16-bit parts have
//! one register per port for each function (except `IOCON`, which is shared), laid out according
//! to the `IOCON.BANK` bit:
//!
//! - `BANK=0` (power-on default): A/B registers interleaved, `IODIRA=0x00`, `IODIRB=0x01`, ...
//! - `BANK=1`: port A registers at 0x00..=0x0A, port B registers at 0x10..=0x1A.
use core::str::FromStr;

use bitflags::bitflags;

use crate::error::ParseError;

bitflags! {
    /// I/O expander configuration register (`IOCON`) bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IoCon: u8 {
        /// Interrupt clearing control (MCP23x18 only): 1 = reading INTCAP clears the
        /// interrupt, 0 = reading GPIO clears the interrupt.
        const INTCC = 0b0000_0001;
        /// Polarity of the INT output: 1 = active-high, 0 = active-low.
        const INTPOL = 0b0000_0010;
        /// INT pin as open-drain output (overrides INTPOL).
        const ODR = 0b0000_0100;
        /// Hardware address enable (SPI parts).
        const HAEN = 0b0000_1000;
        /// Disable slew rate control on SDA.
        const DISSLW = 0b0001_0000;
        /// Sequential operation disabled, the address pointer does not increment.
        const SEQOP = 0b0010_0000;
        /// INT pins mirrored (16-bit parts).
        const MIRROR = 0b0100_0000;
        /// Port registers separated into two banks (16-bit parts).
        const BANK = 0b1000_0000;
    }
}

/// Width of the chip's GPIO port and register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWidth {
    Bits8,
    Bits16,
}

/// Register addressing mode of 16-bit parts, selected by `IOCON.BANK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bank {
    /// A/B registers interleaved in pairs (`BANK=0`)
    #[default]
    Interleaved,
    /// A/B registers in two separate blocks (`BANK=1`)
    Separated,
}

impl Bank {
    pub fn from_iocon(iocon: IoCon) -> Self {
        if iocon.contains(IoCon::BANK) {
            Bank::Separated
        } else {
            Bank::Interleaved
        }
    }
}

/// Register mnemonics.
///
/// Mnemonics without a port suffix belong to the 8-bit parts, mnemonics ending in `A`/`B` to
/// the 16-bit parts.  `IOCON` exists on both.
///
/// For all registers the reset value is 0x00, except for `IODIR*` which are 0xFF (making all
/// pins inputs) at reset.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIR,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOL,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    GPINTEN,
    /// DEFVAL: default values for interrupt-on-change
    DEFVAL,
    /// INTCON: interrupt-on-change config: 0=compare to previous pin value;
    ///   1=compare to corresponding bit in DEFVAL
    INTCON,
    /// IOCON: configuration register, see [`IoCon`]
    IOCON,
    /// GPPU: GPIO pull-ups
    GPPU,
    /// INTF: interrupt flags: 1=corresponding pin caused interrupt
    INTF,
    /// INTCAP: value of each pin at the time they caused an interrupt
    INTCAP,
    /// GPIO: reflects logic level on pins
    GPIO,
    /// OLAT: output latches
    OLAT,
    IODIRA,
    IODIRB,
    IPOLA,
    IPOLB,
    GPINTENA,
    GPINTENB,
    DEFVALA,
    DEFVALB,
    INTCONA,
    INTCONB,
    GPPUA,
    GPPUB,
    INTFA,
    INTFB,
    INTCAPA,
    INTCAPB,
    GPIOA,
    GPIOB,
    OLATA,
    OLATB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Port {
    /// Shared by both widths
    Common,
    /// 8-bit parts only
    Single,
    A,
    B,
}

const NAMES: [(&str, Register); 31] = [
    ("IODIR", Register::IODIR),
    ("IPOL", Register::IPOL),
    ("GPINTEN", Register::GPINTEN),
    ("DEFVAL", Register::DEFVAL),
    ("INTCON", Register::INTCON),
    ("IOCON", Register::IOCON),
    ("GPPU", Register::GPPU),
    ("INTF", Register::INTF),
    ("INTCAP", Register::INTCAP),
    ("GPIO", Register::GPIO),
    ("OLAT", Register::OLAT),
    ("IODIRA", Register::IODIRA),
    ("IODIRB", Register::IODIRB),
    ("IPOLA", Register::IPOLA),
    ("IPOLB", Register::IPOLB),
    ("GPINTENA", Register::GPINTENA),
    ("GPINTENB", Register::GPINTENB),
    ("DEFVALA", Register::DEFVALA),
    ("DEFVALB", Register::DEFVALB),
    ("INTCONA", Register::INTCONA),
    ("INTCONB", Register::INTCONB),
    ("GPPUA", Register::GPPUA),
    ("GPPUB", Register::GPPUB),
    ("INTFA", Register::INTFA),
    ("INTFB", Register::INTFB),
    ("INTCAPA", Register::INTCAPA),
    ("INTCAPB", Register::INTCAPB),
    ("GPIOA", Register::GPIOA),
    ("GPIOB", Register::GPIOB),
    ("OLATA", Register::OLATA),
    ("OLATB", Register::OLATB),
];

impl Register {
    /// Offset of the register function within one bank, and the port it belongs to.
    fn layout(self) -> (u8, Port) {
        use Register::*;
        match self {
            IODIR => (0x00, Port::Single),
            IPOL => (0x01, Port::Single),
            GPINTEN => (0x02, Port::Single),
            DEFVAL => (0x03, Port::Single),
            INTCON => (0x04, Port::Single),
            IOCON => (0x05, Port::Common),
            GPPU => (0x06, Port::Single),
            INTF => (0x07, Port::Single),
            INTCAP => (0x08, Port::Single),
            GPIO => (0x09, Port::Single),
            OLAT => (0x0a, Port::Single),
            IODIRA => (0x00, Port::A),
            IODIRB => (0x00, Port::B),
            IPOLA => (0x01, Port::A),
            IPOLB => (0x01, Port::B),
            GPINTENA => (0x02, Port::A),
            GPINTENB => (0x02, Port::B),
            DEFVALA => (0x03, Port::A),
            DEFVALB => (0x03, Port::B),
            INTCONA => (0x04, Port::A),
            INTCONB => (0x04, Port::B),
            GPPUA => (0x06, Port::A),
            GPPUB => (0x06, Port::B),
            INTFA => (0x07, Port::A),
            INTFB => (0x07, Port::B),
            INTCAPA => (0x08, Port::A),
            INTCAPB => (0x08, Port::B),
            GPIOA => (0x09, Port::A),
            GPIOB => (0x09, Port::B),
            OLATA => (0x0a, Port::A),
            OLATB => (0x0a, Port::B),
        }
    }

    /// The register's mnemonic.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, r)| *r == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Resolve the register to its address on a chip of the given width and bank mode.
    ///
    /// `bank` is ignored for 8-bit parts.  Mnemonics of the other width are rejected instead
    /// of aliasing to some unrelated register.
    pub fn address(self, width: RegisterWidth, bank: Bank) -> Result<u8, ParseError> {
        let (offset, port) = self.layout();
        match (width, port) {
            (RegisterWidth::Bits8, Port::Common | Port::Single) => Ok(offset),
            (RegisterWidth::Bits8, Port::A | Port::B) => Err(ParseError::UnknownRegister),
            (RegisterWidth::Bits16, Port::Single) => Err(ParseError::UnknownRegister),
            (RegisterWidth::Bits16, port) => {
                let b = (port == Port::B) as u8;
                Ok(match bank {
                    Bank::Interleaved => (offset << 1) | b,
                    Bank::Separated => offset | (b << 4),
                })
            }
        }
    }
}

impl FromStr for Register {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(s))
            .map(|(_, r)| *r)
            .ok_or(ParseError::UnknownRegister)
    }
}

impl core::fmt::Display for Register {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that names a register: a [`Register`] or its mnemonic.
pub trait IntoRegister {
    fn into_register(self) -> Result<Register, ParseError>;
}

impl IntoRegister for Register {
    fn into_register(self) -> Result<Register, ParseError> {
        Ok(self)
    }
}

impl IntoRegister for &str {
    fn into_register(self) -> Result<Register, ParseError> {
        self.parse()
    }
}
