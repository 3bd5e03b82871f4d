use aes::{
    cipher::{
        generic_array::GenericArray,
        BlockDecryptMut,
        BlockEncryptMut,
        KeyIvInit,
    },
    Aes256,
};

use message::FRAME_SIZE;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// The link key is AES-256: 32 bytes, provisioned out-of-band on every
/// legitimate sender and the receiver. Rotation and distribution are an
/// operational concern, not handled here.
pub const KEY_SIZE: usize = 32;

/// IV policy, part of the wire contract: fixed all-zero.
///
/// The frame is exactly one cipher block, so CBC degenerates to a
/// single-block operation and the IV never chains into anything. Freshness
/// comes from the sequence number and checksum inside the plaintext, not
/// from IV uniqueness; a deployment wanting IV-derived uniqueness would have
/// to grow the wire frame to carry a per-frame IV.
const IV: [u8; FRAME_SIZE] = [0u8; FRAME_SIZE];

// The whole frame must fit one AES block; the layout in `message` and this
// cipher agree at compile time or not at all.
const _: () = assert!(FRAME_SIZE == 16);

/// AES-256-CBC over exactly one frame-sized block.
///
/// Operating on `[u8; FRAME_SIZE]` makes a length mismatch unrepresentable;
/// the slice-facing [`crate::SecureFrameCodec`] is where undersized input is
/// reported.
pub struct FrameCipher {
    key: [u8; KEY_SIZE],
}

impl FrameCipher {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self {
            key,
        }
    }

    pub fn seal(&self, plain: &[u8; FRAME_SIZE]) -> [u8; FRAME_SIZE] {
        let mut block = GenericArray::from(*plain);
        Aes256CbcEnc::new((&self.key).into(), (&IV).into()).encrypt_block_mut(&mut block);
        block.into()
    }

    pub fn open(&self, sealed: &[u8; FRAME_SIZE]) -> [u8; FRAME_SIZE] {
        let mut block = GenericArray::from(*sealed);
        Aes256CbcDec::new((&self.key).into(), (&IV).into()).decrypt_block_mut(&mut block);
        block.into()
    }
}

impl std::fmt::Debug for FrameCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never render the key.
        f.debug_struct("FrameCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn fips_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        for (i, b) in key.iter_mut().enumerate() {
            *b = i as u8;
        }
        key
    }

    #[test]
    fn fips_197_known_answer() {
        // FIPS-197 appendix C.3. With an all-zero IV the first CBC block
        // equals the raw AES-256 example, which pins both the cipher choice
        // and the IV policy.
        let cipher = FrameCipher::new(fips_key());

        let mut plain = [0u8; FRAME_SIZE];
        plain.copy_from_slice(&hex::decode("00112233445566778899aabbccddeeff").unwrap());

        let sealed = cipher.seal(&plain);
        assert_eq!(hex::encode(sealed), "8ea2b7ca516745bfeafc49904b496089");
        assert_eq!(cipher.open(&sealed), plain);
    }

    #[test]
    fn different_keys_do_not_interoperate() {
        let a = FrameCipher::new([0x11; KEY_SIZE]);
        let b = FrameCipher::new([0x22; KEY_SIZE]);

        let plain = [0x5a; FRAME_SIZE];
        assert_ne!(b.open(&a.seal(&plain)), plain);
    }

    proptest! {
        #[test]
        fn seal_open_round_trip(plain in any::<[u8; FRAME_SIZE]>(), key in any::<[u8; KEY_SIZE]>()) {
            let cipher = FrameCipher::new(key);
            prop_assert_eq!(cipher.open(&cipher.seal(&plain)), plain);
        }
    }
}
