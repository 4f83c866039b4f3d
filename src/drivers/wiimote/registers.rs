use std::fmt;

use thiserror::Error;

use super::{
    factory_data::{
        EEPROM_BLOCK_16D0_OFFSET, EEPROM_DATA_0, EEPROM_DATA_16D0, EXTENSION_CALIBRATION_OFFSET,
        EXTENSION_ID_OFFSET, NUNCHUK_CALIBRATION, NUNCHUK_ID,
    },
    hid_report::ReportingMode,
};

/// Size of the virtual EEPROM image
pub const EEPROM_SIZE: usize = 0x1700;
/// Size of the extension register file
pub const EXTENSION_REGISTER_SIZE: usize = 0x100;

// Factory blocks must fit their regions
const _: () = assert!(EEPROM_DATA_0.len() <= EEPROM_SIZE);
const _: () = assert!(EEPROM_BLOCK_16D0_OFFSET + EEPROM_DATA_16D0.len() <= EEPROM_SIZE);
const _: () =
    assert!(EXTENSION_CALIBRATION_OFFSET + NUNCHUK_CALIBRATION.len() <= EXTENSION_REGISTER_SIZE);
const _: () = assert!(EXTENSION_ID_OFFSET + NUNCHUK_ID.len() <= EXTENSION_REGISTER_SIZE);

/// Possible errors when accessing device memory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("access of {len} bytes at offset {offset:#06x} exceeds region size {size:#06x}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },
}

/// Opaque identifier of the HID channel a packet arrived on. Assigned by the
/// host and only threaded through to report emission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChannelId(pub u16);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Persistent state of a single emulated controller
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub(crate) eeprom: Box<[u8; EEPROM_SIZE]>,
    pub(crate) extension: Box<[u8; EXTENSION_REGISTER_SIZE]>,
    pub(crate) reporting_mode: ReportingMode,
    pub(crate) reporting_channel: ChannelId,
}

impl DeviceState {
    /// Create a new device state with factory contents
    pub fn new() -> Self {
        let mut state = Self {
            eeprom: Box::new([0; EEPROM_SIZE]),
            extension: Box::new([0; EXTENSION_REGISTER_SIZE]),
            reporting_mode: ReportingMode::None,
            reporting_channel: ChannelId::default(),
        };
        state.initialize();
        state
    }

    /// Reset the EEPROM, extension registers and reporting mode to factory
    /// defaults.
    pub fn initialize(&mut self) {
        self.eeprom.fill(0);
        copy_block(self.eeprom.as_mut_slice(), 0, &EEPROM_DATA_0);
        copy_block(
            self.eeprom.as_mut_slice(),
            EEPROM_BLOCK_16D0_OFFSET,
            &EEPROM_DATA_16D0,
        );

        self.reporting_mode = ReportingMode::None;

        // The obscured key at EXTENSION_KEY_OFFSET is left zeroed; writing it
        // breaks titles that program a real key.
        self.extension.fill(0);
        copy_block(
            self.extension.as_mut_slice(),
            EXTENSION_CALIBRATION_OFFSET,
            &NUNCHUK_CALIBRATION,
        );
        copy_block(self.extension.as_mut_slice(), EXTENSION_ID_OFFSET, &NUNCHUK_ID);
    }

    /// Returns the full EEPROM image
    pub fn eeprom(&self) -> &[u8] {
        self.eeprom.as_slice()
    }

    /// Returns the full extension register image
    pub fn extension_registers(&self) -> &[u8] {
        self.extension.as_slice()
    }

    /// Mutable access to the extension registers, e.g. for
    /// [super::crypto::write_obscured_u16].
    pub fn extension_registers_mut(&mut self) -> &mut [u8] {
        self.extension.as_mut_slice()
    }

    pub fn reporting_mode(&self) -> ReportingMode {
        self.reporting_mode
    }

    pub fn reporting_channel(&self) -> ChannelId {
        self.reporting_channel
    }

    /// Select the input report streamed every tick and the channel it is
    /// streamed on.
    pub fn set_reporting_mode(&mut self, mode: ReportingMode, channel: ChannelId) {
        log::debug!("Setting reporting mode {mode:?} on channel {channel}");
        self.reporting_mode = mode;
        self.reporting_channel = channel;
    }

    /// Same as [DeviceState::set_reporting_mode] with a raw report id.
    /// Unsupported report ids disable reporting.
    pub fn set_reporting_mode_raw(&mut self, mode: u8, channel: ChannelId) {
        let reporting_mode = ReportingMode::from(mode);
        if reporting_mode == ReportingMode::None && mode != 0 {
            log::debug!("Unsupported reporting mode {mode:#04x}, disabling reports");
        }
        self.set_reporting_mode(reporting_mode, channel);
    }

    pub fn read_eeprom(&self, offset: usize, len: usize) -> Result<&[u8], RegisterError> {
        read_region(self.eeprom.as_slice(), offset, len)
    }

    pub fn write_eeprom(&mut self, offset: usize, data: &[u8]) -> Result<(), RegisterError> {
        write_region(self.eeprom.as_mut_slice(), offset, data)
    }

    pub fn read_extension(&self, offset: usize, len: usize) -> Result<&[u8], RegisterError> {
        read_region(self.extension.as_slice(), offset, len)
    }

    pub fn write_extension(&mut self, offset: usize, data: &[u8]) -> Result<(), RegisterError> {
        write_region(self.extension.as_mut_slice(), offset, data)
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceState")
            .field("eeprom_size", &self.eeprom.len())
            .field("extension_size", &self.extension.len())
            .field("reporting_mode", &self.reporting_mode)
            .field("reporting_channel", &self.reporting_channel)
            .finish()
    }
}

/// Copy a factory table into a region. The tables are checked to fit at
/// compile time.
fn copy_block(region: &mut [u8], offset: usize, block: &[u8]) {
    region[offset..offset + block.len()].copy_from_slice(block);
}

fn read_region(region: &[u8], offset: usize, len: usize) -> Result<&[u8], RegisterError> {
    let size = region.len();
    offset
        .checked_add(len)
        .and_then(|end| region.get(offset..end))
        .ok_or(RegisterError::OutOfBounds { offset, len, size })
}

fn write_region(region: &mut [u8], offset: usize, data: &[u8]) -> Result<(), RegisterError> {
    let size = region.len();
    let len = data.len();
    let target = offset
        .checked_add(len)
        .and_then(|end| region.get_mut(offset..end))
        .ok_or(RegisterError::OutOfBounds { offset, len, size })?;
    target.copy_from_slice(data);
    Ok(())
}
