use codec::KEY_SIZE;

/// Parse the out-of-band provisioned link key: exactly 64 hex digits.
pub fn parse(hex_key: &str) -> eyre::Result<[u8; KEY_SIZE]> {
    let bytes =
        hex::decode(hex_key.trim()).map_err(|e| eyre::eyre!("link key is not valid hex: {e}"))?;

    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        eyre::eyre!(
            "link key must be {KEY_SIZE} bytes ({} hex digits), got {len}",
            KEY_SIZE * 2
        )
    })
}
