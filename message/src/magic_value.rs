use packed_struct::{
    prelude::*,
    PackedStructInfo,
    PackingResult,
};

/// A single marker byte with exactly one valid value, usable as a
/// `packed_struct` field. Unpacking any other byte fails, which is how
/// frames from unrelated transmitters on the same channel get filtered
/// before any further work happens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MagicValue<const C: u8>;

impl<const C: u8> MagicValue<C> {
    pub const INSTANCE: Self = Self;
    pub const VALUE: u8 = C;
}

impl<const C: u8> PackedStruct for MagicValue<C> {
    type ByteArray = [u8; 1];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok([C])
    }

    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        if src[0] == C {
            Ok(Self)
        } else {
            Err(PackingError::InvalidValue)
        }
    }
}

impl<const C: u8> PackedStructInfo for MagicValue<C> {
    #[inline]
    fn packed_bits() -> usize {
        8
    }
}
