//! Wire model for the tank command link.
//!
//! A command travels as a single fixed-size frame: magic and version markers,
//! the command byte, two PWM magnitudes, a wrapping sequence number, zero
//! padding up to the cipher block size, and a CRC over everything before it.
//! Both ends compile the same layout; there are no variable-length fields.

pub mod checksum;

mod command;
mod frame;
mod magic_value;

pub use command::Command;
pub use frame::{
    ControlFrame,
    DecodeError,
    Magic,
    Version,
    FRAME_SIZE,
};
pub use magic_value::MagicValue;
