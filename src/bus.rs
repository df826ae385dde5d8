use core::convert::Infallible;
use core::fmt;

use embedded_hal::i2c as hal_i2c;
use embedded_hal::spi as hal_spi;

use crate::chip::ChipDescriptor;
use crate::error::ErrorKind;

/// Bus an MCP23xxx part is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    I2c,
    Spi,
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusKind::I2c => "I²C",
            BusKind::Spi => "SPI",
        })
    }
}

/// Short description of a bus connection, used to identify a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusLabel {
    /// I2C device at the given 7-bit bus address
    I2c { address: u8 },
    Spi,
    /// Label of a custom [`Transport`]
    Other(&'static str),
}

impl fmt::Display for BusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusLabel::I2c { address } => write!(f, "I2C({:#04x})", address),
            BusLabel::Spi => f.write_str("SPI"),
            BusLabel::Other(s) => f.write_str(s),
        }
    }
}

/// A bus connection to a single MCP23xxx device.
///
/// This is the only thing the driver needs from the bus: one exchange which sends `write` and,
/// if `read` is not empty, fills `read` with the device's answer.  For SPI, the exchange is
/// full-duplex and `read` has the same length as `write`; for I2C, `read` holds only the bytes
/// clocked in after the write phase.
pub trait Transport {
    /// Error of a failed exchange, reported as [`ErrorKind::BusTransaction`].
    type BusError;

    /// Bus flavour, which decides the framing of register accesses.
    fn kind(&self) -> BusKind;
    /// Bus part of the device's [`Identity`][crate::Identity].
    fn label(&self) -> BusLabel;
    /// Perform one exchange.
    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::BusError>;
}

/// Placeholder for the bus type not in use by an [`Interface`].
///
/// This type has no values, so it can never actually be bound.
#[derive(Debug)]
pub enum Unbound {}

impl hal_i2c::ErrorType for Unbound {
    type Error = Infallible;
}

impl hal_i2c::I2c for Unbound {
    fn transaction(
        &mut self,
        _address: u8,
        _operations: &mut [hal_i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        match *self {}
    }
}

impl hal_spi::ErrorType for Unbound {
    type Error = Infallible;
}

impl hal_spi::SpiDevice for Unbound {
    fn transaction(
        &mut self,
        _operations: &mut [hal_spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// The bus a device should be bound to.
///
/// Use [`Interface::i2c()`] or [`Interface::spi()`] to create one.  For SPI, mode 0 and the
/// desired clock frequency (up to 10 MHz) are part of the `SpiDevice` configuration.
pub enum Interface<I2C, SPI> {
    I2c(I2C),
    Spi(SPI),
}

impl<I2C> Interface<I2C, Unbound> {
    /// Attach to an I2C bus.  The bus address is derived from the hardware address.
    pub fn i2c(bus: I2C) -> Self {
        Interface::I2c(bus)
    }
}

impl<SPI> Interface<Unbound, SPI> {
    /// Attach to an SPI device, with chip select handled by the `SpiDevice`.
    pub fn spi(device: SPI) -> Self {
        Interface::Spi(device)
    }
}

impl<I2C, SPI> Interface<I2C, SPI> {
    pub fn kind(&self) -> BusKind {
        match self {
            Interface::I2c(_) => BusKind::I2c,
            Interface::Spi(_) => BusKind::Spi,
        }
    }

    /// Bind to the bus, checking that the chip can be used on it.
    pub(crate) fn bind<E>(
        self,
        chip: &ChipDescriptor,
        hardware_address: u8,
    ) -> Result<Connection<I2C, SPI>, ErrorKind<E>> {
        if self.kind() != chip.bus {
            return Err(ErrorKind::WrongInterface { required: chip.bus });
        }
        Ok(match self {
            Interface::I2c(bus) => Connection::I2c {
                bus,
                address: 0x20 | hardware_address,
            },
            Interface::Spi(device) => Connection::Spi(device),
        })
    }
}

/// Error of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError<I, S> {
    I2c(I),
    Spi(S),
}

/// An established connection to a device, created from an [`Interface`].
pub enum Connection<I2C, SPI> {
    I2c { bus: I2C, address: u8 },
    Spi(SPI),
}

impl<I2C, SPI> Connection<I2C, SPI> {
    /// Give back the underlying bus.
    pub fn into_interface(self) -> Interface<I2C, SPI> {
        match self {
            Connection::I2c { bus, .. } => Interface::I2c(bus),
            Connection::Spi(device) => Interface::Spi(device),
        }
    }
}

impl<I2C, SPI> Transport for Connection<I2C, SPI>
where
    I2C: hal_i2c::I2c,
    SPI: hal_spi::SpiDevice,
{
    type BusError = BusError<I2C::Error, SPI::Error>;

    fn kind(&self) -> BusKind {
        match self {
            Connection::I2c { .. } => BusKind::I2c,
            Connection::Spi(_) => BusKind::Spi,
        }
    }

    fn label(&self) -> BusLabel {
        match self {
            Connection::I2c { address, .. } => BusLabel::I2c { address: *address },
            Connection::Spi(_) => BusLabel::Spi,
        }
    }

    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::BusError> {
        match self {
            Connection::I2c { bus, address } => {
                if read.is_empty() {
                    bus.write(*address, write)
                } else {
                    bus.write_read(*address, write, read)
                }
                .map_err(BusError::I2c)
            }
            Connection::Spi(device) => {
                if read.is_empty() {
                    device.write(write)
                } else {
                    device.transfer(read, write)
                }
                .map_err(BusError::Spi)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip;
    use embedded_hal_mock::eh1::{i2c as mock_i2c, spi as mock_spi};

    #[test]
    fn i2c_bus_address() {
        let mut bus = mock_i2c::Mock::new(&[]);
        let conn = Interface::i2c(bus.clone())
            .bind::<()>(chip::lookup("MCP23017").unwrap(), 5)
            .unwrap();
        assert_eq!(conn.label(), BusLabel::I2c { address: 0x25 });
        assert_eq!(conn.label().to_string(), "I2C(0x25)");
        bus.done();
    }

    #[test]
    fn wrong_bus_kind() {
        let mut bus = mock_spi::Mock::<u8>::new(&[]);
        let res = Interface::spi(bus.clone()).bind::<()>(chip::lookup("MCP23008").unwrap(), 0);
        assert!(matches!(
            res,
            Err(ErrorKind::WrongInterface {
                required: BusKind::I2c
            })
        ));
        bus.done();

        let mut bus = mock_i2c::Mock::new(&[]);
        let res = Interface::i2c(bus.clone()).bind::<()>(chip::lookup("MCP23S18").unwrap(), 0);
        assert!(matches!(
            res,
            Err(ErrorKind::WrongInterface {
                required: BusKind::Spi
            })
        ));
        bus.done();
    }

    #[test]
    fn i2c_transact() {
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0x05, 0x2a]),
            mock_i2c::Transaction::write_read(0x20, vec![0x05], vec![0x2a]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);
        let mut conn = Interface::i2c(bus.clone())
            .bind::<()>(chip::lookup("MCP23008").unwrap(), 0)
            .unwrap();

        conn.transact(&[0x05, 0x2a], &mut []).unwrap();
        let mut buf = [0x00];
        conn.transact(&[0x05], &mut buf).unwrap();
        assert_eq!(buf, [0x2a]);

        bus.done();
    }

    #[test]
    fn spi_transact() {
        let expectations = [
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::write_vec(vec![0x40, 0x05, 0x2a]),
            mock_spi::Transaction::transaction_end(),
            mock_spi::Transaction::transaction_start(),
            mock_spi::Transaction::transfer(vec![0x41, 0x05, 0x00], vec![0x00, 0x00, 0x2a]),
            mock_spi::Transaction::transaction_end(),
        ];
        let mut bus = mock_spi::Mock::new(&expectations);
        let mut conn = Interface::spi(bus.clone())
            .bind::<()>(chip::lookup("MCP23S08").unwrap(), 0)
            .unwrap();
        assert_eq!(conn.label().to_string(), "SPI");

        conn.transact(&[0x40, 0x05, 0x2a], &mut []).unwrap();
        let mut buf = [0x00; 3];
        conn.transact(&[0x41, 0x05, 0x00], &mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x00, 0x2a]);

        bus.done();
    }
}
