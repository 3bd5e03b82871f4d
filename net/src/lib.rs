//! Transport boundary for the command link.
//!
//! The core only ever hands the transport a sealed frame of exactly
//! [`message::FRAME_SIZE`] bytes and polls it for the same. Radio tuning,
//! socket lifecycle, and link-level retries all live on the far side of
//! these traits.

mod datagram;

pub use datagram::{
    FrameReceiver,
    FrameSender,
};
