//! Error types.
//!
//! All errors are `no_std` friendly.  Construction failures are reported without context, while
//! failures during register access carry the identity of the device and the operation that was
//! attempted, so they can be told apart when several expanders share a bus.
use core::fmt;

use crate::bus::BusKind;
use crate::device::Identity;

/// Failure to parse a textual selector (model name, register mnemonic, interrupt mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The model name is not one of the supported MCP23xxx parts.
    UnknownChip,
    /// The register mnemonic does not exist for the chip's register width.
    UnknownRegister,
    /// The interrupt pin mode is not one of `active-low`, `active-high` or `open-drain`.
    UnknownIntMode,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownChip => f.write_str("unknown chip"),
            ParseError::UnknownRegister => f.write_str("unknown register"),
            ParseError::UnknownIntMode => f.write_str("unknown INT pin configuration"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind<E> {
    /// The model name is not one of the supported MCP23xxx parts.
    UnknownChip,
    /// The hardware address exceeds what the chip can be strapped to.
    AddressRange {
        /// Requested hardware address
        address: u8,
        /// Highest address supported by the chip
        max: u8,
    },
    /// The chip requires a different bus than the one it was bound to.
    WrongInterface {
        /// Bus kind the chip requires
        required: BusKind,
    },
    /// No bus interface was supplied.
    MissingInterface,
    /// The register mnemonic does not exist for the chip's register width.
    UnknownRegister,
    /// The interrupt pin mode is not recognized.
    UnknownIntMode,
    /// The underlying bus transaction failed.
    BusTransaction(E),
}

impl<E> From<ParseError> for ErrorKind<E> {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnknownChip => ErrorKind::UnknownChip,
            ParseError::UnknownRegister => ErrorKind::UnknownRegister,
            ParseError::UnknownIntMode => ErrorKind::UnknownIntMode,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for ErrorKind<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnknownChip => f.write_str("unknown chip"),
            ErrorKind::AddressRange { address, max } => {
                write!(f, "hardware address {} too high (max {})", address, max)
            }
            ErrorKind::WrongInterface { required } => {
                write!(f, "chip must be configured with {}", required)
            }
            ErrorKind::MissingInterface => f.write_str("missing interface configuration"),
            ErrorKind::UnknownRegister => f.write_str("invalid register"),
            ErrorKind::UnknownIntMode => f.write_str("unknown INT pin configuration"),
            ErrorKind::BusTransaction(e) => write!(f, "bus transaction failed: {:?}", e),
        }
    }
}

/// The register-level operation during which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Writing `IOCON` while bringing up the device
    Configure,
    ReadRegister,
    WriteRegister,
    /// Read-modify-write of a register
    UpdateRegister,
    /// Returning all pins to inputs
    Halt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Configure => "configure",
            Operation::ReadRegister => "read register",
            Operation::WriteRegister => "write register",
            Operation::UpdateRegister => "update register",
            Operation::Halt => "halt",
        })
    }
}

/// Device identity and operation attached to register access errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Device the operation was addressed to
    pub device: Identity,
    /// Operation that failed
    pub op: Operation,
}

/// Error returned by all fallible operations of this crate.
///
/// `E` is the error type of the bus connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error<E> {
    context: Option<Context>,
    kind: ErrorKind<E>,
}

impl<E> Error<E> {
    pub(crate) fn new(kind: ErrorKind<E>) -> Self {
        Self {
            context: None,
            kind,
        }
    }

    pub(crate) fn with_context(device: Identity, op: Operation, kind: ErrorKind<E>) -> Self {
        Self {
            context: Some(Context { device, op }),
            kind,
        }
    }

    pub fn kind(&self) -> &ErrorKind<E> {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind<E> {
        self.kind
    }

    /// Device and operation, for errors raised during register access.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

impl<E> From<ErrorKind<E>> for Error<E> {
    fn from(kind: ErrorKind<E>) -> Self {
        Self::new(kind)
    }
}

impl<E> From<ParseError> for Error<E> {
    fn from(e: ParseError) -> Self {
        Self::new(e.into())
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}: {}: {}", ctx.device, ctx.op, self.kind),
            None => write!(f, "mcp23xxx: {}", self.kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
