use thiserror::Error;

use crate::constants::MAX_ROM_SIZE;

/// Failures surfaced by the Chip-8 core.
///
/// Guest programs can't produce these: unknown opcodes are no-ops and
/// out-of-range memory or stack accesses wrap. Only loading a ROM can fail.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),
}

impl Chip8Error {
    pub(crate) fn rom_too_large(size: usize) -> Self {
        Chip8Error::RomTooLarge {
            size,
            max: MAX_ROM_SIZE,
        }
    }
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
