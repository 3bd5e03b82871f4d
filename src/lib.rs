//! Operational glue shared by the `pilot` (transmit) and `drive` (receive)
//! binaries: logging setup, key provisioning, operator line parsing, and a
//! logging stand-in for the motor hardware.

pub mod console;
pub mod key;
pub mod motor;
pub mod trace;
