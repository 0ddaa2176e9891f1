pub use chip8::Chip8;
pub use constants::{CLOCK_SPEED, TIMER_FREQUENCY};
pub use error::{Chip8Error, Result};

mod chip8;
pub mod constants;
mod error;
pub mod instruction;
mod opcode;
mod operations;
pub mod state;
