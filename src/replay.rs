//! Host-side stand-ins used to drive an emulated controller from a recorded
//! [Session].
use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    config::{LoadError, Session, Step},
    drivers::wiimote::{
        hid_report::{ReportType, ReportingMode},
        registers::{ChannelId, DeviceState},
    },
    input::target::{
        wiimote::{hex_dump, WiimoteDevice},
        HostSender, OutputReportRouter, ReportFormatter,
    },
};

/// Something observable the emulated controller did during a replay
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    /// Output command handed to the router
    Routed { channel: ChannelId, report: Vec<u8> },
    /// Bytes sent back to the host
    Sent { channel: ChannelId, data: Vec<u8> },
    /// Input report streamed for the current reporting mode
    Streamed {
        mode: ReportingMode,
        channel: ChannelId,
    },
    /// Packet rejected by the dispatcher
    Fault { step: usize, message: String },
}

impl fmt::Display for ReplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayEvent::Routed { channel, report } => {
                write!(f, "route  [{channel}] {}", hex_dump(report))
            }
            ReplayEvent::Sent { channel, data } => write!(f, "send   [{channel}] {}", hex_dump(data)),
            ReplayEvent::Streamed { mode, channel } => {
                write!(f, "stream [{channel}] {mode:?} ({:#04x})", mode.to_u8())
            }
            ReplayEvent::Fault { step, message } => write!(f, "fault  step {step}: {message}"),
        }
    }
}

pub type EventLog = Rc<RefCell<Vec<ReplayEvent>>>;

/// Router that records every command and applies data reporting mode
/// changes. All other commands are only logged.
#[derive(Debug)]
pub struct HarnessRouter {
    events: EventLog,
}

impl OutputReportRouter for HarnessRouter {
    fn route_output_report(&mut self, state: &mut DeviceState, channel: ChannelId, report: &[u8]) {
        self.events.borrow_mut().push(ReplayEvent::Routed {
            channel,
            report: report.to_vec(),
        });

        let Some((report_id, payload)) = report.split_first() else {
            return;
        };
        match ReportType::from(*report_id) {
            ReportType::DataReportingMode => {
                // Payload: flags, report id
                let Some(mode) = payload.get(1) else {
                    log::warn!("Data reporting mode command without a mode");
                    return;
                };
                state.set_reporting_mode_raw(*mode, channel);
            }
            report_type => {
                log::debug!("Ignoring output report {report_type:?}");
            }
        }
    }
}

/// Host that records everything the controller sends
#[derive(Debug)]
pub struct HarnessHost {
    events: EventLog,
}

impl HostSender for HarnessHost {
    fn send(&mut self, channel: ChannelId, data: &[u8]) {
        self.events.borrow_mut().push(ReplayEvent::Sent {
            channel,
            data: data.to_vec(),
        });
    }
}

/// Formatter that records which report would have been streamed
#[derive(Debug)]
pub struct HarnessFormatter {
    events: EventLog,
}

impl HarnessFormatter {
    fn stream(&self, mode: ReportingMode, channel: ChannelId) {
        log::trace!("Streaming {mode:?} on channel {channel}");
        self.events
            .borrow_mut()
            .push(ReplayEvent::Streamed { mode, channel });
    }
}

impl ReportFormatter for HarnessFormatter {
    fn send_core(&mut self, _state: &DeviceState, channel: ChannelId) {
        self.stream(ReportingMode::Core, channel);
    }

    fn send_core_accel(&mut self, _state: &DeviceState, channel: ChannelId) {
        self.stream(ReportingMode::CoreAccel, channel);
    }

    fn send_core_accel_ir12(&mut self, _state: &DeviceState, channel: ChannelId) {
        self.stream(ReportingMode::CoreAccelIr12, channel);
    }

    fn send_core_accel_ext16(&mut self, _state: &DeviceState, channel: ChannelId) {
        self.stream(ReportingMode::CoreAccelExt16, channel);
    }

    fn send_core_accel_ir10_ext6(&mut self, _state: &DeviceState, channel: ChannelId) {
        self.stream(ReportingMode::CoreAccelIr10Ext6, channel);
    }
}

pub type HarnessDevice = WiimoteDevice<HarnessRouter, HarnessHost, HarnessFormatter>;

/// Replays sessions against a single emulated controller
pub struct Replayer {
    device: HarnessDevice,
    events: EventLog,
}

impl Replayer {
    pub fn new() -> Self {
        let events: EventLog = Rc::new(RefCell::new(Vec::new()));
        let device = WiimoteDevice::new(
            HarnessRouter {
                events: events.clone(),
            },
            HarnessHost {
                events: events.clone(),
            },
            HarnessFormatter {
                events: events.clone(),
            },
        );
        Self { device, events }
    }

    pub fn device(&self) -> &HarnessDevice {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut HarnessDevice {
        &mut self.device
    }

    /// Run every step of the session and return the events it produced.
    /// Protocol faults are recorded and do not stop the replay.
    pub fn run(&mut self, session: &Session) -> Result<Vec<ReplayEvent>, LoadError> {
        log::info!("Replaying session '{}'", session.name);
        let interrupt = ChannelId(session.interrupt_channel);
        let control = ChannelId(session.control_channel);

        for (index, step) in session.steps.iter().enumerate() {
            let result = match step {
                Step::Interrupt(_) => {
                    let data = step.packet()?.unwrap_or_default();
                    self.device.handle_interrupt(interrupt, &data)
                }
                Step::Control(_) => {
                    let data = step.packet()?.unwrap_or_default();
                    self.device.handle_control(control, &data)
                }
                Step::Tick(count) => {
                    for _ in 0..*count {
                        self.device.tick();
                    }
                    Ok(())
                }
                Step::Initialize => {
                    self.device.initialize();
                    Ok(())
                }
            };

            if let Err(e) = result {
                log::warn!("Step {index} raised a protocol fault: {e}");
                self.events.borrow_mut().push(ReplayEvent::Fault {
                    step: index,
                    message: e.to_string(),
                });
            }
        }

        let events = self.events.borrow_mut().drain(..).collect();
        Ok(events)
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new()
    }
}
