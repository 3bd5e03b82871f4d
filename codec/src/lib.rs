//! Byte-level codecs for the command link: the frame cipher and a
//! [`tokio_util::codec`] adapter that composes plaintext encoding with
//! encryption, so a framed transport can speak [`message::ControlFrame`]
//! directly.

mod cipher;
mod frame_codec;

pub use cipher::{
    FrameCipher,
    KEY_SIZE,
};
pub use frame_codec::{
    CodecError,
    SecureFrameCodec,
};
