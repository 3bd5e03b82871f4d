use std::{
    fmt::Debug,
    hash::Hash,
};

use codec::{
    FrameCipher,
    KEY_SIZE,
};
use message::{
    ControlFrame,
    DecodeError,
    FRAME_SIZE,
};

use crate::replay::ReplayGuard;

/// Why an incoming frame was dropped. Never echoed to the wire: a reject is
/// logged locally and otherwise silent, so an attacker probing the link
/// learns nothing about which stage refused them.
#[derive(Debug, thiserror::Error)]
pub enum RejectReason {
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(#[source] DecodeError),

    #[error("integrity check failed: {0}")]
    Integrity(#[source] DecodeError),

    #[error("stale or duplicate sequence {sequence}")]
    StaleOrDuplicate { sequence: u8 },
}

/// The validating half of the receive path: decrypt, decode, replay-check.
///
/// Each stage short-circuits, and a frame that fails anywhere has no effect
/// on any state: the replay window only advances for fully accepted frames.
pub struct CommandReceiver<K> {
    cipher: FrameCipher,
    replay: ReplayGuard<K>,
}

impl<K> CommandReceiver<K>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self {
            cipher: FrameCipher::new(key),
            replay: ReplayGuard::new(),
        }
    }

    pub fn on_frame(
        &mut self,
        sender: K,
        raw: &[u8; FRAME_SIZE],
    ) -> Result<ControlFrame, RejectReason> {
        let plain = self.cipher.open(raw);

        let frame = ControlFrame::decode(&plain).map_err(|e| {
            if e.is_integrity() {
                RejectReason::Integrity(e)
            } else {
                RejectReason::ProtocolMismatch(e)
            }
        })?;

        if !self.replay.accept(sender, frame.sequence) {
            return Err(RejectReason::StaleOrDuplicate {
                sequence: frame.sequence,
            });
        }

        Ok(frame)
    }
}
