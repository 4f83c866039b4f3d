use std::fmt;

use packed_struct::PackingError;
use thiserror::Error;

use crate::drivers::wiimote::{
    hid_report::{HidParam, HidType},
    registers::{ChannelId, DeviceState},
};

pub mod wiimote;

/// Logical HID channel a packet was received on
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    /// Streaming output commands and input reports
    Interrupt,
    /// Configuration handshakes
    Control,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Interrupt => write!(f, "interrupt"),
            ChannelKind::Control => write!(f, "control"),
        }
    }
}

/// Faults raised while dispatching a HID packet. None of these are fatal;
/// the device keeps working and the next packet is handled normally.
#[derive(Error, Debug)]
pub enum ProtocolFault {
    #[error("unexpected HID packet on {channel} channel: type {hid_type:?} and param {param:?}")]
    UnexpectedPacket {
        channel: ChannelKind,
        hid_type: HidType,
        param: HidParam,
    },
    #[error("malformed HID packet: expected at least {expected} bytes but got {actual}")]
    MalformedPacket { expected: usize, actual: usize },
    #[error("unable to pack report: {0:?}")]
    PackingError(#[from] PackingError),
}

/// Consumer of output commands (LEDs, rumble, memory access, reporting mode,
/// ...). Implementations may mutate the device state through its bounded
/// accessors.
pub trait OutputReportRouter {
    /// Handle a single output command. `report` starts with the report id.
    /// Any internal failure must be handled by the router itself so the
    /// caller can continue with its acknowledgement.
    fn route_output_report(&mut self, state: &mut DeviceState, channel: ChannelId, report: &[u8]);
}

/// Capability of the host to send data back to the console
pub trait HostSender {
    fn send(&mut self, channel: ChannelId, data: &[u8]);
}

/// Builders for the streamed input reports. Each method builds and
/// transmits a complete report on the given channel.
pub trait ReportFormatter {
    fn send_core(&mut self, state: &DeviceState, channel: ChannelId);
    fn send_core_accel(&mut self, state: &DeviceState, channel: ChannelId);
    fn send_core_accel_ir12(&mut self, state: &DeviceState, channel: ChannelId);
    fn send_core_accel_ext16(&mut self, state: &DeviceState, channel: ChannelId);
    fn send_core_accel_ir10_ext6(&mut self, state: &DeviceState, channel: ChannelId);
}
