use packed_struct::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

/// Operator intent, one byte on the wire.
///
/// Direction commands carry no sign of their own: the receiver derives the
/// per-channel sign pattern from the variant and applies the speed fields as
/// magnitudes. `SetSpeed` changes magnitudes while leaving each channel's
/// current direction alone.
///
/// The serde names match the JSON command set the browser bridge emits
/// (`"forward"`, `"setspeed"`, ...), so gateway glue can deserialize straight
/// into this type.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PrimitiveEnum_u8, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Command {
    Stop     = 0x00,
    Forward  = 0x01,
    Backward = 0x02,
    Left     = 0x03,
    Right    = 0x04,
    SetSpeed = 0x05,
}

#[cfg(test)]
mod test {
    use packed_struct::PrimitiveEnum;

    use super::*;

    #[test]
    fn discriminants_are_wire_contract() {
        assert_eq!(Command::Stop.to_primitive(), 0x00);
        assert_eq!(Command::Forward.to_primitive(), 0x01);
        assert_eq!(Command::Backward.to_primitive(), 0x02);
        assert_eq!(Command::Left.to_primitive(), 0x03);
        assert_eq!(Command::Right.to_primitive(), 0x04);
        assert_eq!(Command::SetSpeed.to_primitive(), 0x05);

        assert_eq!(Command::from_primitive(0x06), None);
        assert_eq!(Command::from_primitive(0xff), None);
    }

    #[test]
    fn serde_names_match_bridge_json() {
        assert_eq!(serde_json::to_string(&Command::SetSpeed).unwrap(), r#""setspeed""#);
        assert_eq!(
            serde_json::from_str::<Command>(r#""backward""#).unwrap(),
            Command::Backward
        );
    }
}
