use soroban_sdk::String;

use crate::RegistryError;

const MIN_NAME_LEN: u32 = 1;
const MAX_NAME_LEN: u32 = 128;
const MAX_NOTE_LEN: u32 = 256;

/// Validate a participant, drug or manufacturer name.
/// Names must be 1..=MAX_NAME_LEN bytes and contain at least one
/// non-whitespace character.
pub fn validate_name(name: &String) -> Result<(), RegistryError> {
    let len = name.len();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(RegistryError::InvalidArgument);
    }

    let mut buf = [0u8; MAX_NAME_LEN as usize];
    name.copy_into_slice(&mut buf[..len as usize]);

    if buf[..len as usize].iter().all(|b| b.is_ascii_whitespace()) {
        return Err(RegistryError::InvalidArgument);
    }

    Ok(())
}

/// Validate a free-text transfer note or deactivation reason. May be empty.
pub fn validate_note(note: &String) -> Result<(), RegistryError> {
    if note.len() > MAX_NOTE_LEN {
        return Err(RegistryError::InvalidArgument);
    }
    Ok(())
}

/// Expiry must follow manufacture and lie in the future.
pub fn validate_batch_dates(
    manufacturing_date: u64,
    expiry_date: u64,
    now: u64,
) -> Result<(), RegistryError> {
    if expiry_date <= manufacturing_date || expiry_date <= now {
        return Err(RegistryError::InvalidArgument);
    }
    Ok(())
}

pub fn validate_quantity(quantity: u64) -> Result<(), RegistryError> {
    if quantity == 0 {
        return Err(RegistryError::InvalidArgument);
    }
    Ok(())
}
