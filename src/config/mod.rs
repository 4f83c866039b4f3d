use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
pub mod config_test;

/// Represents all possible errors loading a [Session]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Invalid hex data: {0}")]
    InvalidHex(String),
}

/// A recorded sequence of host interactions that can be replayed against an
/// emulated controller.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    pub version: u32,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    /// Channel id the host assigned to the interrupt channel
    pub interrupt_channel: u16,
    /// Channel id the host assigned to the control channel
    pub control_channel: u16,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl Session {
    /// Load a [Session] from the given YAML string
    pub fn from_yaml(content: String) -> Result<Session, LoadError> {
        let session: Session = serde_yaml::from_str(content.as_str())?;
        session.validate()?;
        Ok(session)
    }

    /// Load a [Session] from the given YAML file
    pub fn from_yaml_file(path: String) -> Result<Session, LoadError> {
        let file = std::fs::File::open(path)?;
        let session: Session = serde_yaml::from_reader(file)?;
        session.validate()?;
        Ok(session)
    }

    /// Ensure every packet in the session is valid hex
    fn validate(&self) -> Result<(), LoadError> {
        for step in self.steps.iter() {
            step.packet()?;
        }
        Ok(())
    }
}

/// A single host interaction
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Packet received on the interrupt channel, as hex
    Interrupt(String),
    /// Packet received on the control channel, as hex
    Control(String),
    /// Run the given number of emulation frames
    Tick(u32),
    /// Reset the controller to factory defaults
    Initialize,
}

impl Step {
    /// Returns the decoded packet for interrupt and control steps
    pub fn packet(&self) -> Result<Option<Vec<u8>>, LoadError> {
        match self {
            Step::Interrupt(data) | Step::Control(data) => Ok(Some(parse_hex(data)?)),
            Step::Tick(_) | Step::Initialize => Ok(None),
        }
    }
}

/// Parse hex pairs, optionally separated by whitespace, e.g. "a2 16 00" or
/// "a21600".
pub fn parse_hex(value: &str) -> Result<Vec<u8>, LoadError> {
    hex::decode(value.split_whitespace().collect::<String>())
        .map_err(|e| LoadError::InvalidHex(format!("{value}: {e}")))
}
