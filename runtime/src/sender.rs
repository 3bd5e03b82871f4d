use bytes::BytesMut;
use tokio_util::codec::Encoder;

use codec::{
    CodecError,
    SecureFrameCodec,
    KEY_SIZE,
};
use message::{
    Command,
    ControlFrame,
    FRAME_SIZE,
};
use net::FrameSender;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("failed to encode frame: {0}")]
    Encode(#[from] CodecError),

    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}

/// The transmitting half of the link: owns the wrapping sequence counter,
/// the sealing codec, and the transport handle.
///
/// Fire-and-forget: one datagram per command, no acknowledgment, no retry.
/// Reliability comes from the operator re-issuing commands periodically and
/// from the receiver's safety timeout.
pub struct CommandSender<T> {
    transport: T,
    codec:     SecureFrameCodec,
    sequence:  u8,
    buf:       BytesMut,
}

impl<T> CommandSender<T>
where
    T: FrameSender,
{
    pub fn new(transport: T, key: [u8; KEY_SIZE]) -> Self {
        Self {
            transport,
            codec: SecureFrameCodec::new(key),
            sequence: 0,
            buf: BytesMut::with_capacity(FRAME_SIZE),
        }
    }

    /// Seal and transmit one command.
    ///
    /// The sequence number is consumed even when the send fails, so a retry
    /// by the caller is a new frame, never a self-replay.
    pub async fn send(
        &mut self,
        command: Command,
        left_speed: u8,
        right_speed: u8,
    ) -> Result<(), SendError> {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);

        let frame = ControlFrame {
            command,
            left_speed,
            right_speed,
            sequence,
        };

        self.buf.clear();
        self.codec.encode(frame, &mut self.buf)?;

        let mut wire = [0u8; FRAME_SIZE];
        wire.copy_from_slice(&self.buf);

        self.transport.transmit(&wire).await?;
        tracing::debug!(?command, left_speed, right_speed, sequence, "command sent");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use tokio::sync::mpsc;

    use codec::FrameCipher;

    use super::*;

    const KEY: [u8; KEY_SIZE] = [0x42; KEY_SIZE];

    /// A link that is always down.
    struct DeadLink;

    #[async_trait::async_trait]
    impl FrameSender for DeadLink {
        async fn transmit(&self, _frame: &[u8; FRAME_SIZE]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::ConnectionAborted, "no carrier"))
        }
    }

    #[tokio::test]
    async fn sequences_are_consecutive() {
        let (tx, mut rx) = mpsc::channel::<[u8; FRAME_SIZE]>(8);
        let mut sender = CommandSender::new(tx, KEY);

        for _ in 0..3 {
            sender.send(Command::Forward, 200, 200).await.unwrap();
        }

        let cipher = FrameCipher::new(KEY);
        for expected_seq in 0..3u8 {
            let wire = rx.try_recv().unwrap();
            let frame = ControlFrame::decode(&cipher.open(&wire)).unwrap();
            assert_eq!(frame.sequence, expected_seq);
            assert_eq!(frame.command, Command::Forward);
        }
    }

    #[tokio::test]
    async fn failed_send_still_consumes_a_sequence() {
        let mut sender = CommandSender::new(DeadLink, KEY);
        assert!(matches!(
            sender.send(Command::Stop, 0, 0).await,
            Err(SendError::Transport(_))
        ));
        assert_eq!(sender.sequence, 1);
    }

    #[tokio::test]
    async fn sequence_wraps() {
        let (tx, mut rx) = mpsc::channel::<[u8; FRAME_SIZE]>(8);
        let mut sender = CommandSender::new(tx, KEY);
        sender.sequence = 255;

        sender.send(Command::Forward, 10, 10).await.unwrap();
        sender.send(Command::Forward, 10, 10).await.unwrap();

        let cipher = FrameCipher::new(KEY);
        let first = ControlFrame::decode(&cipher.open(&rx.try_recv().unwrap())).unwrap();
        let second = ControlFrame::decode(&cipher.open(&rx.try_recv().unwrap())).unwrap();

        assert_eq!(first.sequence, 255);
        assert_eq!(second.sequence, 0);
    }
}
