use std::error::Error;

use crate::drivers::wiimote::{
    factory_data::{
        EEPROM_BLOCK_16D0_OFFSET, EEPROM_DATA_0, EEPROM_DATA_16D0, EXTENSION_CALIBRATION_OFFSET,
        EXTENSION_ID_OFFSET, NUNCHUK_CALIBRATION, NUNCHUK_ID,
    },
    hid_report::ReportingMode,
    registers::{ChannelId, DeviceState, RegisterError, EEPROM_SIZE, EXTENSION_REGISTER_SIZE},
};

#[test]
fn test_factory_contents() {
    let state = DeviceState::new();
    assert_eq!(state.eeprom().len(), EEPROM_SIZE);
    assert_eq!(state.extension_registers().len(), EXTENSION_REGISTER_SIZE);

    assert_eq!(state.eeprom()[..EEPROM_DATA_0.len()], EEPROM_DATA_0);
    let end = EEPROM_BLOCK_16D0_OFFSET + EEPROM_DATA_16D0.len();
    assert_eq!(state.eeprom()[EEPROM_BLOCK_16D0_OFFSET..end], EEPROM_DATA_16D0);
    assert!(state.eeprom()[EEPROM_DATA_0.len()..EEPROM_BLOCK_16D0_OFFSET]
        .iter()
        .all(|b| *b == 0));

    let end = EXTENSION_CALIBRATION_OFFSET + NUNCHUK_CALIBRATION.len();
    assert_eq!(
        state.extension_registers()[EXTENSION_CALIBRATION_OFFSET..end],
        NUNCHUK_CALIBRATION
    );
    assert_eq!(state.extension_registers()[EXTENSION_ID_OFFSET..], NUNCHUK_ID);
    assert_eq!(state.reporting_mode(), ReportingMode::None);
}

#[test]
fn test_initialize_is_idempotent() -> Result<(), Box<dyn Error>> {
    let mut once = DeviceState::new();
    once.initialize();

    let mut twice = DeviceState::new();
    twice.write_eeprom(0x200, &[0xde, 0xad])?;
    twice.write_extension(0x40, &[0xbe, 0xef])?;
    twice.set_reporting_mode(ReportingMode::CoreAccel, ChannelId(0x41));
    twice.initialize();
    twice.initialize();

    assert_eq!(once.eeprom(), twice.eeprom());
    assert_eq!(once.extension_registers(), twice.extension_registers());
    assert_eq!(twice.reporting_mode(), ReportingMode::None);
    Ok(())
}

#[test]
fn test_bounded_access() -> Result<(), Box<dyn Error>> {
    let mut state = DeviceState::new();

    state.write_eeprom(EEPROM_SIZE - 2, &[1, 2])?;
    assert_eq!(state.read_eeprom(EEPROM_SIZE - 2, 2)?, [1, 2]);

    assert_eq!(
        state.write_eeprom(EEPROM_SIZE - 1, &[1, 2]),
        Err(RegisterError::OutOfBounds {
            offset: EEPROM_SIZE - 1,
            len: 2,
            size: EEPROM_SIZE
        })
    );
    assert_eq!(state.read_eeprom(EEPROM_SIZE - 1, 1)?, [2]);
    assert!(state.read_eeprom(usize::MAX, 2).is_err());

    assert!(state.write_extension(EXTENSION_REGISTER_SIZE, &[0]).is_err());
    assert!(state.read_extension(0xfa, 7).is_err());
    assert_eq!(state.read_extension(0xfa, 6)?, NUNCHUK_ID);
    Ok(())
}

#[test]
fn test_set_reporting_mode_raw() {
    let mut state = DeviceState::new();
    state.set_reporting_mode_raw(0x33, ChannelId(0x41));
    assert_eq!(state.reporting_mode(), ReportingMode::CoreAccelIr12);
    assert_eq!(state.reporting_channel(), ChannelId(0x41));

    state.set_reporting_mode_raw(0x3e, ChannelId(0x42));
    assert_eq!(state.reporting_mode(), ReportingMode::None);
    assert_eq!(state.reporting_channel(), ChannelId(0x42));
}
