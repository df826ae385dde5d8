//! Options for bringing up a device.
use core::str::FromStr;

use crate::bus::{Interface, Unbound};
use crate::error::ParseError;
use crate::register::IoCon;

/// Electrical configuration of the chip's INT output(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntMode {
    /// Active driver, low when an interrupt is pending
    #[default]
    ActiveLow,
    /// Active driver, high when an interrupt is pending
    ActiveHigh,
    /// Open-drain output, needs an external pull-up
    OpenDrain,
}

impl IntMode {
    /// Fold this mode into a configuration register value.
    pub fn apply(self, iocon: IoCon) -> IoCon {
        let iocon = iocon - (IoCon::INTPOL | IoCon::ODR);
        match self {
            IntMode::ActiveLow => iocon,
            IntMode::ActiveHigh => iocon | IoCon::INTPOL,
            IntMode::OpenDrain => iocon | IoCon::ODR,
        }
    }
}

impl FromStr for IntMode {
    type Err = ParseError;

    /// Accepts `active-low`, `active-high` and `open-drain`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ("active-low", IntMode::ActiveLow),
            ("active-high", IntMode::ActiveHigh),
            ("open-drain", IntMode::OpenDrain),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, mode)| mode)
        .ok_or(ParseError::UnknownIntMode)
    }
}

/// Construction options of an [`Mcp23xxx`][crate::Mcp23xxx].
///
/// ```
/// # let mut bus = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let i2c = bus.clone();
/// use mcp23xxx::{IntMode, Interface, Opts};
///
/// let opts = Opts::new("MCP23017")
///     .pins(true, false, false)
///     .interface(Interface::i2c(i2c))
///     .interrupt(IntMode::OpenDrain);
/// assert_eq!(opts.hardware_address_value(), 1);
/// # bus.done();
/// ```
pub struct Opts<'a, I2C = Unbound, SPI = Unbound> {
    pub(crate) model: &'a str,
    pub(crate) hardware_address: u8,
    pub(crate) interface: Option<Interface<I2C, SPI>>,
    pub(crate) interrupt: Option<IntMode>,
}

impl<'a> Opts<'a> {
    /// Options for the given model at hardware address 0, without an interface.
    pub fn new(model: &'a str) -> Self {
        Self {
            model,
            hardware_address: 0,
            interface: None,
            interrupt: None,
        }
    }
}

impl<'a, I2C, SPI> Opts<'a, I2C, SPI> {
    /// Hardware address from the logical state of the A0, A1 and A2 pins.
    pub fn pins(mut self, a0: bool, a1: bool, a2: bool) -> Self {
        self.hardware_address = ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        self
    }

    /// Hardware address as an integer, `0` to `7` (`0` to `3` on the MCP23S08).
    pub fn hardware_address(mut self, address: u8) -> Self {
        self.hardware_address = address;
        self
    }

    /// The hardware address configured so far.
    pub fn hardware_address_value(&self) -> u8 {
        self.hardware_address
    }

    /// Bus to bind the device to.  Its kind must match the model.
    pub fn interface<I, S>(self, interface: Interface<I, S>) -> Opts<'a, I, S> {
        Opts {
            model: self.model,
            hardware_address: self.hardware_address,
            interface: Some(interface),
            interrupt: self.interrupt,
        }
    }

    /// Configure the INT pin(s) of the chip.
    pub fn interrupt(mut self, mode: IntMode) -> Self {
        self.interrupt = Some(mode);
        self
    }
}
