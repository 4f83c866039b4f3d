//! Save-state encoding for [DeviceState].
//!
//! Layout (all integers little-endian):
//! - magic `WMST`
//! - format version major, minor (u8, u8)
//! - reporting mode report id (u8)
//! - reporting channel (u16)
//! - EEPROM length (u32) followed by the EEPROM image
//! - extension length (u32) followed by the extension register image
use thiserror::Error;

use super::{
    hid_report::ReportingMode,
    registers::{ChannelId, DeviceState, EEPROM_SIZE, EXTENSION_REGISTER_SIZE},
};

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"WMST";
pub const SNAPSHOT_VERSION_MAJOR: u8 = 1;
pub const SNAPSHOT_VERSION_MINOR: u8 = 0;

/// Possible errors when restoring a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot does not start with the expected magic")]
    InvalidMagic,
    #[error("unsupported snapshot version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
    #[error("snapshot ended while reading {0}")]
    Truncated(&'static str),
    #[error("{region} length {actual} does not match the expected length {expected}")]
    LengthMismatch {
        region: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

impl DeviceState {
    /// Serialize the complete device state
    pub fn save_state(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + EEPROM_SIZE + EXTENSION_REGISTER_SIZE);
        out.extend_from_slice(&SNAPSHOT_MAGIC);
        out.push(SNAPSHOT_VERSION_MAJOR);
        out.push(SNAPSHOT_VERSION_MINOR);
        out.push(self.reporting_mode.to_u8());
        out.extend_from_slice(&self.reporting_channel.0.to_le_bytes());
        write_region(&mut out, self.eeprom.as_slice());
        write_region(&mut out, self.extension.as_slice());
        out
    }

    /// Restore state produced by [DeviceState::save_state]. The current state
    /// is left untouched if the snapshot is invalid.
    pub fn load_state(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        let mut reader = Reader { bytes };

        if reader.take(SNAPSHOT_MAGIC.len(), "magic")? != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic);
        }
        let major = reader.u8("version")?;
        let minor = reader.u8("version")?;
        if major != SNAPSHOT_VERSION_MAJOR {
            return Err(SnapshotError::UnsupportedVersion { major, minor });
        }

        let reporting_mode = ReportingMode::from(reader.u8("reporting mode")?);
        let reporting_channel = ChannelId(reader.u16("reporting channel")?);
        let eeprom = reader.region("eeprom", EEPROM_SIZE)?;
        let extension = reader.region("extension registers", EXTENSION_REGISTER_SIZE)?;

        self.eeprom.copy_from_slice(eeprom);
        self.extension.copy_from_slice(extension);
        self.reporting_mode = reporting_mode;
        self.reporting_channel = reporting_channel;
        log::debug!("Restored device state: {:?}", self);

        Ok(())
    }
}

fn write_region(out: &mut Vec<u8>, region: &[u8]) {
    // Regions are fixed-size constants well below u32::MAX
    out.extend_from_slice(&(region.len() as u32).to_le_bytes());
    out.extend_from_slice(region);
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, what: &'static str) -> SnapshotResult<&'a [u8]> {
        if self.bytes.len() < len {
            return Err(SnapshotError::Truncated(what));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn u8(&mut self, what: &'static str) -> SnapshotResult<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> SnapshotResult<u16> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self, what: &'static str) -> SnapshotResult<u32> {
        let bytes = self.take(4, what)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn region(&mut self, region: &'static str, expected: usize) -> SnapshotResult<&'a [u8]> {
        let actual = self.u32(region)? as usize;
        if actual != expected {
            return Err(SnapshotError::LengthMismatch {
                region,
                expected,
                actual,
            });
        }
        self.take(actual, region)
    }
}
