use bytes::{
    BufMut,
    BytesMut,
};
use tokio_util::codec::{
    Decoder,
    Encoder,
};

use message::{
    ControlFrame,
    DecodeError,
    FRAME_SIZE,
};

use crate::cipher::{
    FrameCipher,
    KEY_SIZE,
};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Packing(#[from] packed_struct::PackingError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// `Encoder`/`Decoder` pair for the sealed wire frame: plaintext encode then
/// encrypt on the way out, decrypt then validate on the way in.
///
/// One frame in, one fixed-size datagram out; there is no delimiting or
/// reassembly at this layer.
#[derive(Debug)]
pub struct SecureFrameCodec {
    cipher: FrameCipher,
}

impl SecureFrameCodec {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self {
            cipher: FrameCipher::new(key),
        }
    }
}

impl Encoder<ControlFrame> for SecureFrameCodec {
    type Error = CodecError;

    fn encode(&mut self, frame: ControlFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let plain = frame.encode()?;
        dst.put_slice(&self.cipher.seal(&plain));

        Ok(())
    }
}

impl Decoder for SecureFrameCodec {
    type Error = CodecError;
    type Item = ControlFrame;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_SIZE {
            if !src.is_empty() {
                tracing::trace!(buffered = src.len(), "partial frame, waiting for more bytes");
            }
            return Ok(None);
        }

        let raw = src.split_to(FRAME_SIZE);
        let mut sealed = [0u8; FRAME_SIZE];
        sealed.copy_from_slice(&raw);

        let plain = self.cipher.open(&sealed);
        let frame = ControlFrame::decode(&plain)?;

        Ok(Some(frame))
    }
}
