//! Byte transform applied to the extension key region.
//!
//! Homebrew titles that program an all-zero key expect extension data in
//! this form. The same formula is used for both directions, but it is not
//! its own inverse: `encrypt_byte(encrypt_byte(b)) != b` for most values.
use super::registers::RegisterError;

const KEY: u8 = 0x17;

/// Transform a single byte: `(b - 0x17) ^ 0x17` with 8-bit wraparound.
pub const fn encrypt_byte(value: u8) -> u8 {
    value.wrapping_sub(KEY) ^ KEY
}

/// Transform every byte of the buffer in place
pub fn crypt_buffer(buffer: &mut [u8]) {
    for byte in buffer.iter_mut() {
        *byte = encrypt_byte(*byte);
    }
}

/// Transform the two bytes of `value` and store them little-endian at
/// `offset` in the given register block.
pub fn write_obscured_u16(
    registers: &mut [u8],
    offset: usize,
    value: u16,
) -> Result<(), RegisterError> {
    let size = registers.len();
    let Some(target) = registers.get_mut(offset..offset.saturating_add(2)) else {
        return Err(RegisterError::OutOfBounds {
            offset,
            len: 2,
            size,
        });
    };

    let mut crypted = value.to_le_bytes();
    crypt_buffer(&mut crypted);
    target.copy_from_slice(&crypted);
    log::trace!("Converted {value:04x} to {:04x}", u16::from_le_bytes(crypted));

    Ok(())
}
