//! Register-level driver for the Microchip MCP23xxx family of I/O expanders.
//!
//! Supported parts: MCP23008, MCP23S08, MCP23009, MCP23S09, MCP23017, MCP23S17, MCP23018 and
//! MCP23S18.  The `S` variants are attached over SPI ([`embedded_hal::spi::SpiDevice`]), all
//! others over I2C ([`embedded_hal::i2c::I2c`]).
//!
//! ```
//! # use embedded_hal_mock::eh1::spi as mock_spi;
//! # let mut bus = mock_spi::Mock::new(&[
//! #     mock_spi::Transaction::transaction_start(),
//! #     mock_spi::Transaction::write_vec(vec![0x42, 0x0b, 0xaa]),
//! #     mock_spi::Transaction::transaction_end(),
//! #     mock_spi::Transaction::transaction_start(),
//! #     mock_spi::Transaction::write_vec(vec![0x42, 0x05, 0xaa]),
//! #     mock_spi::Transaction::transaction_end(),
//! #     mock_spi::Transaction::transaction_start(),
//! #     mock_spi::Transaction::transfer(vec![0x43, 0x00, 0x00], vec![0x00, 0x00, 0xff]),
//! #     mock_spi::Transaction::transaction_end(),
//! #     mock_spi::Transaction::transaction_start(),
//! #     mock_spi::Transaction::write_vec(vec![0x42, 0x00, 0xfe]),
//! #     mock_spi::Transaction::transaction_end(),
//! # ]);
//! # let spi = bus.clone();
//! use mcp23xxx::{IntMode, Interface, Mcp23xxx, Opts};
//!
//! let mcp = Mcp23xxx::new(
//!     Opts::new("MCP23S17")
//!         .pins(true, false, false)
//!         .interface(Interface::spi(spi))
//!         .interrupt(IntMode::ActiveHigh),
//! )
//! .unwrap();
//!
//! // GPA0 as output
//! mcp.update_register_bits("IODIRA", 0x01, false).unwrap();
//! # bus.done();
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bus;
pub mod chip;
mod config;
mod device;
pub mod error;
mod mutex;
pub mod register;

pub use bus::{BusError, BusKind, BusLabel, Connection, Interface, Transport, Unbound};
pub use chip::ChipDescriptor;
pub use config::{IntMode, Opts};
pub use device::{Driver, Identity, Mcp23xxx};
pub use error::{Error, ErrorKind, ParseError};
pub use mutex::DeviceMutex;
pub use register::{Bank, IoCon, Register, RegisterWidth};
