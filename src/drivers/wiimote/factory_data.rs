//! Factory contents written into a freshly initialized controller.
//! Source: https://www.wiibrew.org/wiki/Wiimote#EEPROM_Memory

/// Offset of the secondary EEPROM block
pub const EEPROM_BLOCK_16D0_OFFSET: usize = 0x16d0;

/// Accelerometer and IR camera calibration, stored at the start of the EEPROM
pub const EEPROM_DATA_0: [u8; 42] = [
    0xA1, 0xAA, 0x8B, 0x99, 0xAE, 0x9E, 0x78, 0x30, 0xA7, 0x74, 0xD3, // IR calibration
    0xA1, 0xAA, 0x8B, 0x99, 0xAE, 0x9E, 0x78, 0x30, 0xA7, 0x74, 0xD3, // IR calibration (copy)
    0x82, 0x82, 0x82, 0x15, 0x9C, 0x9C, 0x9E, 0x38, 0x40, 0x3E, // Accelerometer calibration
    0x82, 0x82, 0x82, 0x15, 0x9C, 0x9C, 0x9E, 0x38, 0x40, 0x3E, // Accelerometer calibration (copy)
];

/// Secondary data block at [EEPROM_BLOCK_16D0_OFFSET]
pub const EEPROM_DATA_16D0: [u8; 24] = [
    0x00, 0x00, 0x00, 0xFF, 0x11, 0xEE, 0x00, 0x00, //
    0x33, 0xCC, 0x44, 0xBB, 0x00, 0x00, 0x66, 0x99, //
    0x77, 0x88, 0x00, 0x00, 0x2B, 0x01, 0xE8, 0x13, //
];

/// Offset of the calibration block in the extension registers
pub const EXTENSION_CALIBRATION_OFFSET: usize = 0x20;
/// Offset of the identification block in the extension registers
pub const EXTENSION_ID_OFFSET: usize = 0xfa;
/// Offset of the obscured key in the extension registers
pub const EXTENSION_KEY_OFFSET: usize = 0xfe;

/// Nunchuk calibration
pub const NUNCHUK_CALIBRATION: [u8; 16] = [
    0x80, 0x80, 0x80, 0x00, // Accelerometer x, y, z at 0g
    0xB3, 0xB3, 0xB3, 0x00, // Accelerometer x, y, z at 1g
    0xE0, 0x20, 0x80, // Stick x max, min, center
    0xE0, 0x20, 0x80, // Stick y max, min, center
    0x00, 0x00, // Checksum
];

/// Nunchuk identification bytes
pub const NUNCHUK_ID: [u8; 6] = [0x00, 0x00, 0xA4, 0x20, 0x00, 0x00];
