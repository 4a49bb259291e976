//! Message type registry

/// Message type codes used by the client.
///
/// The header carries the raw u16; unknown codes are passed through by
/// the codec and only rejected when a specific response is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MessageType {
    GetService = 2,
    StateService = 3,
    GetHostFirmware = 14,
    StateHostFirmware = 15,
    GetPower = 20,
    StatePower = 22,
    GetLabel = 23,
    StateLabel = 25,
    GetVersion = 32,
    StateVersion = 33,
    Acknowledgement = 45,
    GetColor = 101,
    SetColor = 102,
    SetWaveform = 103,
    LightState = 107,
    GetLightPower = 116,
    SetLightPower = 117,
    StateLightPower = 118,
    SetExtendedColorZones = 510,
    GetExtendedColorZones = 511,
    StateExtendedColorZones = 512,
}

impl MessageType {
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            2 => Some(MessageType::GetService),
            3 => Some(MessageType::StateService),
            14 => Some(MessageType::GetHostFirmware),
            15 => Some(MessageType::StateHostFirmware),
            20 => Some(MessageType::GetPower),
            22 => Some(MessageType::StatePower),
            23 => Some(MessageType::GetLabel),
            25 => Some(MessageType::StateLabel),
            32 => Some(MessageType::GetVersion),
            33 => Some(MessageType::StateVersion),
            45 => Some(MessageType::Acknowledgement),
            101 => Some(MessageType::GetColor),
            102 => Some(MessageType::SetColor),
            103 => Some(MessageType::SetWaveform),
            107 => Some(MessageType::LightState),
            116 => Some(MessageType::GetLightPower),
            117 => Some(MessageType::SetLightPower),
            118 => Some(MessageType::StateLightPower),
            510 => Some(MessageType::SetExtendedColorZones),
            511 => Some(MessageType::GetExtendedColorZones),
            512 => Some(MessageType::StateExtendedColorZones),
            _ => None,
        }
    }
}

impl From<MessageType> for u16 {
    fn from(t: MessageType) -> u16 {
        t as u16
    }
}
