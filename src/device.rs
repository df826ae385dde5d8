//! Device handle and register driver.
use core::cell::RefCell;
use core::fmt;

use embedded_hal::i2c as hal_i2c;
use embedded_hal::spi as hal_spi;

use crate::bus::{BusKind, BusLabel, Connection, Transport};
use crate::chip::{self, ChipDescriptor};
use crate::config::{IntMode, Opts};
use crate::error::{Error, ErrorKind, Operation};
use crate::mutex::DeviceMutex;
use crate::register::{Bank, IntoRegister, IoCon, Register, RegisterWidth};

/// Identity of a device: `<model>/<bus>@<hardware address>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Model name as listed in the chip table
    pub model: &'static str,
    /// Bus connection the device is reached through
    pub bus: BusLabel,
    /// Hardware address set by the A0-A2 pins
    pub hardware_address: u8,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.model, self.bus, self.hardware_address)
    }
}

/// Bytes exchanged for one register access.
///
/// ```text
///                READ             WRITE
/// -------- ---------------- ----------------
///  I²C Tx        RR              RR WW
///      Rx        DD
/// -------- ---------------- ----------------
///  SPI Tx     CC RR 00         CC RR WW
///      Rx     xx xx DD
///
/// RR: register address
/// CC: control byte (SPI)
/// DD: data read
/// WW: data to write
/// ```
struct Frame {
    tx: [u8; 3],
    len: usize,
    read: bool,
}

/// Register driver of one device, owning the bus connection.
///
/// It mirrors the chip's `IOCON.BANK` bit to resolve register mnemonics.  This is the value kept
/// inside the [`DeviceMutex`] of an [`Mcp23xxx`].
pub struct Driver<B> {
    bus: B,
    chip: &'static ChipDescriptor,
    hardware_address: u8,
    bank: Bank,
}

impl<B> Driver<B> {
    fn new(bus: B, chip: &'static ChipDescriptor, hardware_address: u8) -> Self {
        Self {
            bus,
            chip,
            hardware_address,
            bank: Bank::Interleaved,
        }
    }

    pub fn chip(&self) -> &'static ChipDescriptor {
        self.chip
    }

    /// Register layout the driver currently assumes.  Always [`Bank::Interleaved`] on 8-bit
    /// parts.
    pub fn bank(&self) -> Bank {
        self.bank
    }
}

impl<B: Transport> Driver<B> {
    /// SPI opcode: `0 1 0 0 A2 A1 A0 R/W`
    fn control_byte(&self, read: bool) -> u8 {
        ((0x20 | self.hardware_address) << 1) | read as u8
    }

    fn frame(&self, addr: u8, write: Option<u8>) -> Frame {
        let mut tx = [0x00; 3];
        let mut len = 0;
        if self.bus.kind() == BusKind::Spi {
            tx[0] = self.control_byte(write.is_none());
            len += 1;
        }
        tx[len] = addr;
        len += 1;
        match write {
            Some(value) => {
                tx[len] = value;
                len += 1;
            }
            // Dummy byte, clocks in the register value
            None if self.bus.kind() == BusKind::Spi => len += 1,
            None => {}
        }
        Frame {
            tx,
            len,
            read: write.is_none(),
        }
    }

    fn exchange(&mut self, frame: Frame) -> Result<u8, ErrorKind<B::BusError>> {
        let tx = &frame.tx[..frame.len];
        let mut rx = [0x00; 3];
        let rx = if frame.read {
            &mut rx[..frame.len]
        } else {
            &mut rx[..0]
        };
        log::trace!("tx {:02x?}", tx);
        self.bus
            .transact(tx, rx)
            .map_err(ErrorKind::BusTransaction)?;
        Ok(rx.last().copied().unwrap_or(0))
    }

    pub(crate) fn read_reg(&mut self, reg: Register) -> Result<u8, ErrorKind<B::BusError>> {
        let addr = reg.address(self.chip.width, self.bank)?;
        let value = self.exchange(self.frame(addr, None))?;
        log::trace!("{} ({:#04x}) -> {:#04x}", reg, addr, value);
        Ok(value)
    }

    pub(crate) fn write_reg(
        &mut self,
        reg: Register,
        value: u8,
    ) -> Result<(), ErrorKind<B::BusError>> {
        let addr = reg.address(self.chip.width, self.bank)?;
        log::trace!("{} ({:#04x}) <- {:#04x}", reg, addr, value);
        self.exchange(self.frame(addr, Some(value)))?;

        if reg == Register::IOCON && self.chip.width == RegisterWidth::Bits16 {
            let bank = Bank::from_iocon(IoCon::from_bits_retain(value));
            if bank != self.bank {
                log::debug!("{}: register bank now {:?}", self.chip.name, bank);
                self.bank = bank;
            }
        }
        Ok(())
    }

    /// Write `IOCON` without knowing which bank mode the chip is in.
    ///
    /// 16-bit parts may still be in `BANK=1` from an earlier configuration, where the
    /// interleaved `IOCON` address is `OLATA`.  Address 0x0b is `IOCON` with `BANK=0` and
    /// unimplemented with `BANK=1`, so writing it with `BANK` set leaves the chip in `BANK=1`
    /// either way, and `IOCON` is then at 0x05.
    pub(crate) fn configure(&mut self, iocon: IoCon) -> Result<(), ErrorKind<B::BusError>> {
        if self.chip.width == RegisterWidth::Bits16 {
            let value = (iocon | IoCon::BANK).bits();
            log::trace!("IOCON (0x0b) <- {:#04x}", value);
            self.exchange(self.frame(0x0b, Some(value)))?;
            self.bank = Bank::Separated;
        }
        self.write_reg(Register::IOCON, iocon.bits())
    }

    pub(crate) fn update_reg(
        &mut self,
        reg: Register,
        mask_set: u8,
        mask_clear: u8,
    ) -> Result<(), ErrorKind<B::BusError>> {
        let mut value = self.read_reg(reg)?;
        value |= mask_set;
        value &= !mask_clear;
        self.write_reg(reg, value)
    }

    /// Make all pins inputs, like after power-on.
    pub(crate) fn halt(&mut self) -> Result<(), ErrorKind<B::BusError>> {
        match self.chip.width {
            RegisterWidth::Bits8 => self.write_reg(Register::IODIR, 0xff),
            RegisterWidth::Bits16 => {
                self.write_reg(Register::IODIRA, 0xff)?;
                self.write_reg(Register::IODIRB, 0xff)
            }
        }
    }
}

/// Handle to an initialized MCP23xxx I/O expander.
///
/// All register access goes through the mutex `M`, so read-modify-write cycles are never
/// interleaved with other accesses to the same chip.
pub struct Mcp23xxx<M> {
    identity: Identity,
    driver: M,
}

impl<I2C, SPI> Mcp23xxx<RefCell<Driver<Connection<I2C, SPI>>>>
where
    I2C: hal_i2c::I2c,
    SPI: hal_spi::SpiDevice,
{
    /// Bring up a device as described by `opts`.
    ///
    /// ```
    /// # use embedded_hal_mock::eh1::i2c as mock_i2c;
    /// # let mut bus = mock_i2c::Mock::new(&[
    /// #     mock_i2c::Transaction::write(0x27, vec![0x05, 0x20]),
    /// #     mock_i2c::Transaction::write_read(0x27, vec![0x09], vec![0x81]),
    /// # ]);
    /// # let i2c = bus.clone();
    /// use mcp23xxx::{Interface, Mcp23xxx, Opts};
    ///
    /// let mcp = Mcp23xxx::new(
    ///     Opts::new("MCP23008")
    ///         .pins(true, true, true)
    ///         .interface(Interface::i2c(i2c)),
    /// )
    /// .unwrap();
    /// assert_eq!(mcp.read_register("GPIO").unwrap(), 0x81);
    /// # bus.done();
    /// ```
    pub fn new(
        opts: Opts<'_, I2C, SPI>,
    ) -> Result<Self, Error<<Connection<I2C, SPI> as Transport>::BusError>> {
        Self::with_mutex(opts)
    }
}

impl<I2C, SPI, M> Mcp23xxx<M>
where
    I2C: hal_i2c::I2c,
    SPI: hal_spi::SpiDevice,
    M: DeviceMutex<Device = Driver<Connection<I2C, SPI>>>,
{
    /// Like [`Mcp23xxx::new()`], with a custom mutex type.
    pub fn with_mutex(
        opts: Opts<'_, I2C, SPI>,
    ) -> Result<Self, Error<<Connection<I2C, SPI> as Transport>::BusError>> {
        let chip = Self::validate(opts.model, opts.hardware_address)?;
        let Some(interface) = opts.interface else {
            return Err(Error::new(ErrorKind::MissingInterface));
        };
        let connection = interface
            .bind::<<Connection<I2C, SPI> as Transport>::BusError>(chip, opts.hardware_address)
            .map_err(Error::new)?;
        Self::bring_up(chip, opts.hardware_address, connection, opts.interrupt)
    }
}

impl<B, M> Mcp23xxx<M>
where
    B: Transport,
    M: DeviceMutex<Device = Driver<B>>,
{
    /// Bring up a device over a custom [`Transport`].
    pub fn from_transport(
        model: &str,
        hardware_address: u8,
        transport: B,
        interrupt: Option<IntMode>,
    ) -> Result<Self, Error<B::BusError>> {
        let chip = Self::validate(model, hardware_address)?;
        if transport.kind() != chip.bus {
            return Err(Error::new(ErrorKind::WrongInterface { required: chip.bus }));
        }
        Self::bring_up(chip, hardware_address, transport, interrupt)
    }

    fn validate(
        model: &str,
        hardware_address: u8,
    ) -> Result<&'static ChipDescriptor, Error<B::BusError>> {
        let chip = chip::lookup(model)?;
        if hardware_address > chip.max_address {
            return Err(Error::new(ErrorKind::AddressRange {
                address: hardware_address,
                max: chip.max_address,
            }));
        }
        Ok(chip)
    }

    fn bring_up(
        chip: &'static ChipDescriptor,
        hardware_address: u8,
        transport: B,
        interrupt: Option<IntMode>,
    ) -> Result<Self, Error<B::BusError>> {
        let iocon = match interrupt {
            Some(mode) => mode.apply(chip.default_config),
            None => chip.default_config,
        };
        let identity = Identity {
            model: chip.name,
            bus: transport.label(),
            hardware_address,
        };

        let mut driver = Driver::new(transport, chip, hardware_address);
        driver
            .configure(iocon)
            .map_err(|kind| Error::with_context(identity, Operation::Configure, kind))?;

        log::debug!("{}: configured, IOCON={:#04x}", identity, iocon.bits());
        Ok(Self {
            identity,
            driver: M::create(driver),
        })
    }

    fn fail(&self, op: Operation, kind: ErrorKind<B::BusError>) -> Error<B::BusError> {
        if let ErrorKind::BusTransaction(_) = kind {
            log::warn!("{}: {}: bus transaction failed", self.identity, op);
        }
        Error::with_context(self.identity, op, kind)
    }

    /// `<model>/<bus>@<hardware address>`, e.g. `MCP23017/I2C(0x21)@1`.
    pub fn identify(&self) -> Identity {
        self.identity
    }

    pub fn chip(&self) -> &'static ChipDescriptor {
        self.driver.lock(|drv| drv.chip())
    }

    pub fn bank(&self) -> Bank {
        self.driver.lock(|drv| drv.bank())
    }

    /// Read a register, given as [`Register`] or by its mnemonic.
    pub fn read_register<R: IntoRegister>(&self, reg: R) -> Result<u8, Error<B::BusError>> {
        let op = Operation::ReadRegister;
        let reg = reg.into_register().map_err(|e| self.fail(op, e.into()))?;
        self.driver
            .lock(|drv| drv.read_reg(reg))
            .map_err(|kind| self.fail(op, kind))
    }

    /// Write a register, given as [`Register`] or by its mnemonic.
    ///
    /// Writing `IOCON` on a 16-bit part switches register addressing to the written `BANK` mode.
    pub fn write_register<R: IntoRegister>(
        &self,
        reg: R,
        value: u8,
    ) -> Result<(), Error<B::BusError>> {
        let op = Operation::WriteRegister;
        let reg = reg.into_register().map_err(|e| self.fail(op, e.into()))?;
        self.driver
            .lock(|drv| drv.write_reg(reg, value))
            .map_err(|kind| self.fail(op, kind))
    }

    /// Set (`set = true`) or clear the bits of `mask` in a register.
    ///
    /// The read and the write happen under a single lock of the device mutex.
    pub fn update_register_bits<R: IntoRegister>(
        &self,
        reg: R,
        mask: u8,
        set: bool,
    ) -> Result<(), Error<B::BusError>> {
        let op = Operation::UpdateRegister;
        let reg = reg.into_register().map_err(|e| self.fail(op, e.into()))?;
        let (mask_set, mask_clear) = if set { (mask, 0) } else { (0, mask) };
        self.driver
            .lock(|drv| drv.update_reg(reg, mask_set, mask_clear))
            .map_err(|kind| self.fail(op, kind))
    }

    /// Return all pins to inputs.
    pub fn halt(&self) -> Result<(), Error<B::BusError>> {
        self.driver
            .lock(|drv| drv.halt())
            .map_err(|kind| self.fail(Operation::Halt, kind))
    }

    /// Destroy the handle and give back the bus connection.
    pub fn release(self) -> B {
        self.driver.into_inner().bus
    }
}

impl<M> fmt::Display for Mcp23xxx<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.identity, f)
    }
}
