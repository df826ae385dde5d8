//! Descriptors of the supported MCP23xxx parts.
use crate::bus::BusKind;
use crate::error::ParseError;
use crate::register::{IoCon, RegisterWidth};

/// Static traits of one MCP23xxx model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipDescriptor {
    pub name: &'static str,
    pub bus: BusKind,
    pub width: RegisterWidth,
    /// Highest hardware address the part can be strapped to.
    pub max_address: u8,
    /// `IOCON` value written when the device is brought up.
    pub default_config: IoCon,
}

impl ChipDescriptor {
    const fn new(
        name: &'static str,
        bus: BusKind,
        width: RegisterWidth,
        max_address: u8,
        default_config: IoCon,
    ) -> Self {
        Self {
            name,
            bus,
            width,
            max_address,
            default_config,
        }
    }
}

// The MCP23S08 only has two address pins.
pub static CHIPS: [ChipDescriptor; 8] = [
    ChipDescriptor::new("MCP23008", BusKind::I2c, RegisterWidth::Bits8, 7, IoCon::SEQOP),
    ChipDescriptor::new(
        "MCP23S08",
        BusKind::Spi,
        RegisterWidth::Bits8,
        3,
        IoCon::HAEN.union(IoCon::SEQOP),
    ),
    ChipDescriptor::new("MCP23009", BusKind::I2c, RegisterWidth::Bits8, 7, IoCon::SEQOP),
    ChipDescriptor::new("MCP23S09", BusKind::Spi, RegisterWidth::Bits8, 7, IoCon::SEQOP),
    ChipDescriptor::new(
        "MCP23017",
        BusKind::I2c,
        RegisterWidth::Bits16,
        7,
        IoCon::SEQOP.union(IoCon::BANK),
    ),
    ChipDescriptor::new(
        "MCP23S17",
        BusKind::Spi,
        RegisterWidth::Bits16,
        7,
        IoCon::HAEN.union(IoCon::SEQOP).union(IoCon::BANK),
    ),
    ChipDescriptor::new(
        "MCP23018",
        BusKind::I2c,
        RegisterWidth::Bits16,
        7,
        IoCon::SEQOP.union(IoCon::BANK),
    ),
    ChipDescriptor::new(
        "MCP23S18",
        BusKind::Spi,
        RegisterWidth::Bits16,
        7,
        IoCon::SEQOP.union(IoCon::BANK),
    ),
];

/// Look up a model by name, ignoring case.
pub fn lookup(model: &str) -> Result<&'static ChipDescriptor, ParseError> {
    CHIPS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(model))
        .ok_or(ParseError::UnknownChip)
}
