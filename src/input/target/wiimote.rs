use packed_struct::PackedStruct;

use crate::drivers::wiimote::{
    hid_report::{
        convert_24bit, HidPacket, HidParam, HidType, PackedAckReport, ReportType, ReportingMode,
        ADDRESS_OFFSET, ADDRESS_SIZE, HANDSHAKE_SUCCESSFUL, HID_HEADER_SIZE,
    },
    registers::{ChannelId, DeviceState},
    snapshot::SnapshotResult,
};

use super::{ChannelKind, HostSender, OutputReportRouter, ProtocolFault, ReportFormatter};

/// Result of dispatching a single HID packet
pub type DispatchResult = Result<(), ProtocolFault>;

/// An emulated controller attached to a host. The device exclusively owns
/// its [DeviceState]; the host serializes all calls into it.
#[derive(Debug)]
pub struct WiimoteDevice<R, H, F> {
    state: DeviceState,
    router: R,
    host: H,
    formatter: F,
}

impl<R, H, F> WiimoteDevice<R, H, F>
where
    R: OutputReportRouter,
    H: HostSender,
    F: ReportFormatter,
{
    /// Create a new device with factory contents
    pub fn new(router: R, host: H, formatter: F) -> Self {
        Self {
            state: DeviceState::new(),
            router,
            host,
            formatter,
        }
    }

    /// Reset the device to factory defaults
    pub fn initialize(&mut self) {
        log::debug!("Initializing emulated controller");
        self.state.initialize();
    }

    /// Stop reporting. Register contents are only kept if they were
    /// captured with [WiimoteDevice::save_state] beforehand. The reporting
    /// channel is kept so a save-state taken after shutdown still names the
    /// channel the host assigned.
    pub fn shutdown(&mut self) {
        log::debug!("Shutting down emulated controller");
        self.state
            .set_reporting_mode(ReportingMode::None, self.state.reporting_channel());
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    pub fn save_state(&self) -> Vec<u8> {
        self.state.save_state()
    }

    pub fn load_state(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        self.state.load_state(bytes)
    }

    /// Handle a packet received on the interrupt channel. Output commands are
    /// processed and then acknowledged with a write acknowledgement report.
    /// Faults are raised before the command is routed, so a rejected packet
    /// never changes the device state.
    pub fn handle_interrupt(&mut self, channel: ChannelId, data: &[u8]) -> DispatchResult {
        log::trace!("Interrupt channel {channel} data: {}", hex_dump(data));
        let packet = parse_packet(data)?;

        match (packet.hid_type, packet.param) {
            (HidType::Data, HidParam::Output) => {
                let Some(report_id) = packet.payload.first() else {
                    return Err(ProtocolFault::MalformedPacket {
                        expected: HID_HEADER_SIZE + 1,
                        actual: data.len(),
                    });
                };
                let report_type = ReportType::from(*report_id);

                // Memory access commands are validated before anything is
                // routed. Other commands are acknowledged without an address.
                let address = if report_type.has_address() {
                    let address = packet.payload.get(ADDRESS_OFFSET..).and_then(convert_24bit);
                    let Some(address) = address else {
                        return Err(ProtocolFault::MalformedPacket {
                            expected: HID_HEADER_SIZE + ADDRESS_OFFSET + ADDRESS_SIZE,
                            actual: data.len(),
                        });
                    };
                    address
                } else {
                    0
                };

                log::debug!("Routing output report {report_type:?} from channel {channel}");
                self.router
                    .route_output_report(&mut self.state, channel, packet.payload);

                // The acknowledgement has to follow the command. Some titles
                // stop working if they see it before the command's effects.
                self.send_ack(channel, report_type, address)
            }
            (hid_type, param) => Err(ProtocolFault::UnexpectedPacket {
                channel: ChannelKind::Interrupt,
                hid_type,
                param,
            }),
        }
    }

    /// Handle a packet received on the control channel. Only SET_REPORT
    /// output commands are accepted and answered with a handshake.
    pub fn handle_control(&mut self, channel: ChannelId, data: &[u8]) -> DispatchResult {
        log::trace!("Control channel {channel} data: {}", hex_dump(data));
        let packet = parse_packet(data)?;

        match (packet.hid_type, packet.param) {
            (HidType::SetReport, HidParam::Output) => {
                if packet.payload.is_empty() {
                    return Err(ProtocolFault::MalformedPacket {
                        expected: HID_HEADER_SIZE + 1,
                        actual: data.len(),
                    });
                }
                log::debug!(
                    "Routing SET_REPORT {:?} from channel {channel}",
                    ReportType::from(packet.payload[0])
                );
                self.router
                    .route_output_report(&mut self.state, channel, packet.payload);
                self.host.send(channel, &HANDSHAKE_SUCCESSFUL);
                Ok(())
            }
            // Handshake negotiation, input SET_REPORT and DATA transfers are
            // not expected from the console on this channel.
            (hid_type, param) => Err(ProtocolFault::UnexpectedPacket {
                channel: ChannelKind::Control,
                hid_type,
                param,
            }),
        }
    }

    /// Stream the input report for the current reporting mode. Called once
    /// per emulated frame; the reporting mode is kept between ticks.
    pub fn tick(&mut self) {
        let channel = self.state.reporting_channel();
        match self.state.reporting_mode() {
            ReportingMode::None => (),
            ReportingMode::Core => self.formatter.send_core(&self.state, channel),
            ReportingMode::CoreAccel => self.formatter.send_core_accel(&self.state, channel),
            ReportingMode::CoreAccelIr12 => {
                self.formatter.send_core_accel_ir12(&self.state, channel)
            }
            ReportingMode::CoreAccelExt16 => {
                self.formatter.send_core_accel_ext16(&self.state, channel)
            }
            ReportingMode::CoreAccelIr10Ext6 => {
                self.formatter.send_core_accel_ir10_ext6(&self.state, channel)
            }
        }
    }

    /// Send a write acknowledgement for the given output report
    fn send_ack(&mut self, channel: ChannelId, report: ReportType, address: u32) -> DispatchResult {
        let ack = PackedAckReport::new(report, address);
        let data = ack.pack()?;
        log::debug!("Acknowledging {report:?} at address {address:#08x} on channel {channel}");
        self.host.send(channel, &data);
        Ok(())
    }
}

fn parse_packet(data: &[u8]) -> Result<HidPacket<'_>, ProtocolFault> {
    HidPacket::parse(data).ok_or(ProtocolFault::MalformedPacket {
        expected: HID_HEADER_SIZE,
        actual: data.len(),
    })
}

/// Format the given bytes as space separated hex pairs
pub fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<String>>()
        .join(" ")
}
