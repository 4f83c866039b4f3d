//! Sources:
//! - https://www.wiibrew.org/wiki/Wiimote
//! - https://www.bluetooth.com/specifications/specs/human-interface-device-profile-1-1-1/
use packed_struct::{
    prelude::*,
    types::{Integer, SizedInteger},
};

/// Size of the HID transaction header that precedes every packet
pub const HID_HEADER_SIZE: usize = 1;
/// Size of the address field carried by memory access commands
pub const ADDRESS_SIZE: usize = 3;
/// Offset of the address field in a memory access command, after the report
/// id and the rumble/address space flags byte
pub const ADDRESS_OFFSET: usize = 2;
/// Size of a packed [PackedAckReport]
pub const ACK_REPORT_SIZE: usize = 9;

/// Reply sent on the control channel after a SET_REPORT was processed
pub const HANDSHAKE_SUCCESSFUL: [u8; 1] = [0x00];

/// HID transaction type, stored in the high nibble of the header byte
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HidType {
    Handshake,
    SetReport,
    Data,
    Unknown(u8),
}

impl HidType {
    pub fn to_u8(&self) -> u8 {
        match self {
            HidType::Handshake => 0x0,
            HidType::SetReport => 0x5,
            HidType::Data => 0xA,
            HidType::Unknown(value) => *value,
        }
    }
}

impl From<u8> for HidType {
    fn from(value: u8) -> Self {
        match value {
            0x0 => Self::Handshake,
            0x5 => Self::SetReport,
            0xA => Self::Data,
            _ => Self::Unknown(value),
        }
    }
}

/// HID transaction parameter (report direction), stored in the low nibble
/// of the header byte
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HidParam {
    Input,
    Output,
    Unknown(u8),
}

impl HidParam {
    pub fn to_u8(&self) -> u8 {
        match self {
            HidParam::Input => 0x1,
            HidParam::Output => 0x2,
            HidParam::Unknown(value) => *value,
        }
    }
}

impl From<u8> for HidParam {
    fn from(value: u8) -> Self {
        match value {
            0x1 => Self::Input,
            0x2 => Self::Output,
            _ => Self::Unknown(value),
        }
    }
}

/// Report identifiers used by the controller. Output reports flow from the
/// host to the device, input reports from the device to the host.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReportType {
    // Output
    Rumble,
    PlayerLeds,
    DataReportingMode,
    IrCameraEnable,
    SpeakerEnable,
    StatusRequest,
    WriteMemory,
    ReadMemory,
    SpeakerData,
    SpeakerMute,
    IrCameraEnable2,
    // Input
    Status,
    ReadMemoryData,
    Acknowledge,
    Unknown(u8),
}

impl ReportType {
    pub fn to_u8(&self) -> u8 {
        match self {
            ReportType::Rumble => 0x10,
            ReportType::PlayerLeds => 0x11,
            ReportType::DataReportingMode => 0x12,
            ReportType::IrCameraEnable => 0x13,
            ReportType::SpeakerEnable => 0x14,
            ReportType::StatusRequest => 0x15,
            ReportType::WriteMemory => 0x16,
            ReportType::ReadMemory => 0x17,
            ReportType::SpeakerData => 0x18,
            ReportType::SpeakerMute => 0x19,
            ReportType::IrCameraEnable2 => 0x1a,
            ReportType::Status => 0x20,
            ReportType::ReadMemoryData => 0x21,
            ReportType::Acknowledge => 0x22,
            ReportType::Unknown(value) => *value,
        }
    }

    /// Memory access commands carry a 24-bit address at [ADDRESS_OFFSET]
    pub fn has_address(&self) -> bool {
        matches!(self, ReportType::WriteMemory | ReportType::ReadMemory)
    }
}

impl From<u8> for ReportType {
    fn from(value: u8) -> Self {
        match value {
            0x10 => Self::Rumble,
            0x11 => Self::PlayerLeds,
            0x12 => Self::DataReportingMode,
            0x13 => Self::IrCameraEnable,
            0x14 => Self::SpeakerEnable,
            0x15 => Self::StatusRequest,
            0x16 => Self::WriteMemory,
            0x17 => Self::ReadMemory,
            0x18 => Self::SpeakerData,
            0x19 => Self::SpeakerMute,
            0x1a => Self::IrCameraEnable2,
            0x20 => Self::Status,
            0x21 => Self::ReadMemoryData,
            0x22 => Self::Acknowledge,
            _ => Self::Unknown(value),
        }
    }
}

/// Input report formats the device can stream every frame. [ReportingMode::None]
/// means nothing is streamed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ReportingMode {
    #[default]
    None,
    /// Core buttons
    Core,
    /// Core buttons and accelerometer
    CoreAccel,
    /// Core buttons, accelerometer and 12 IR bytes
    CoreAccelIr12,
    /// Core buttons, accelerometer and 16 extension bytes
    CoreAccelExt16,
    /// Core buttons, accelerometer, 10 IR bytes and 6 extension bytes
    CoreAccelIr10Ext6,
}

impl ReportingMode {
    pub fn to_u8(&self) -> u8 {
        match self {
            ReportingMode::None => 0x00,
            ReportingMode::Core => 0x30,
            ReportingMode::CoreAccel => 0x31,
            ReportingMode::CoreAccelIr12 => 0x33,
            ReportingMode::CoreAccelExt16 => 0x35,
            ReportingMode::CoreAccelIr10Ext6 => 0x37,
        }
    }
}

impl From<u8> for ReportingMode {
    /// Report ids outside of the supported set are never streamed.
    fn from(value: u8) -> Self {
        match value {
            0x30 => Self::Core,
            0x31 => Self::CoreAccel,
            0x33 => Self::CoreAccelIr12,
            0x35 => Self::CoreAccelExt16,
            0x37 => Self::CoreAccelIr10Ext6,
            _ => Self::None,
        }
    }
}

/// Raw HID transaction header
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "1")]
pub struct PackedHidHeader {
    #[packed_field(bits = "0..=3")]
    pub transaction_type: Integer<u8, packed_bits::Bits<4>>,
    #[packed_field(bits = "4..=7")]
    pub param: Integer<u8, packed_bits::Bits<4>>,
}

impl PackedHidHeader {
    pub fn new(hid_type: HidType, param: HidParam) -> Self {
        Self {
            transaction_type: Integer::from_primitive(hid_type.to_u8() & 0x0f),
            param: Integer::from_primitive(param.to_u8() & 0x0f),
        }
    }

    pub fn hid_type(&self) -> HidType {
        HidType::from(self.transaction_type.to_primitive())
    }

    pub fn param(&self) -> HidParam {
        HidParam::from(self.param.to_primitive())
    }
}

/// A borrowed view over a received HID packet. Only lives for the duration
/// of a single dispatch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HidPacket<'a> {
    pub hid_type: HidType,
    pub param: HidParam,
    pub payload: &'a [u8],
}

impl<'a> HidPacket<'a> {
    /// Split the header byte from the payload. Returns [None] for an empty
    /// buffer.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let (header, payload) = data.split_first()?;
        let header = PackedHidHeader::unpack(&[*header]).ok()?;
        Some(Self {
            hid_type: header.hid_type(),
            param: header.param(),
            payload,
        })
    }
}

/// Returns the big-endian 24-bit address stored in the first three bytes of
/// the given buffer.
pub fn convert_24bit(src: &[u8]) -> Option<u32> {
    match src {
        [hi, mid, lo, ..] => {
            Some((u32::from(*hi) << 16) | (u32::from(*mid) << 8) | u32::from(*lo))
        }
        _ => None,
    }
}

/// Returns the big-endian 16-bit value stored in the first two bytes of the
/// given buffer.
pub fn convert_16bit(src: &[u8]) -> Option<u16> {
    match src {
        [hi, lo, ..] => Some((u16::from(*hi) << 8) | u16::from(*lo)),
        _ => None,
    }
}

/// Input report confirming that an output command has been processed.
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "9")]
pub struct PackedAckReport {
    // byte 0
    #[packed_field(bytes = "0")]
    pub hid_header: u8, // Always DATA/INPUT (0xa1)
    // byte 1
    #[packed_field(bytes = "1")]
    pub report_id: u8, // Always 0x22

    // byte 2-3
    #[packed_field(bytes = "2..=3", endian = "msb")]
    pub buttons: u16,

    // byte 4-5
    #[packed_field(bytes = "4")]
    pub acked_report_id: u8,
    #[packed_field(bytes = "5")]
    pub error_code: u8, // 0x00 on success

    // byte 6-8
    #[packed_field(bytes = "6..=8", endian = "msb")]
    pub address: Integer<u32, packed_bits::Bits<24>>,
}

impl PackedAckReport {
    pub fn new(acked_report: ReportType, address: u32) -> Self {
        Self {
            hid_header: (HidType::Data.to_u8() << 4) | HidParam::Input.to_u8(),
            report_id: ReportType::Acknowledge.to_u8(),
            buttons: 0,
            acked_report_id: acked_report.to_u8(),
            error_code: 0,
            address: Integer::from_primitive(address & 0x00ff_ffff),
        }
    }
}
