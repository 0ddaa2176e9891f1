/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// Return addresses the call stack can hold
pub const STACK_SIZE: usize = 0x10;

/// General purpose registers V0..VF
pub const REGISTER_COUNT: usize = 0x10;

/// Keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 0x10;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG: usize = 0xF;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Where ROMs are loaded and execution begins
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Where the sprite sheet lives in memory
pub const FONT_START: u16 = 0x050;

/// Bytes (rows) per glyph in the sprite sheet
pub const FONT_SPRITE_SIZE: u16 = 5;

/// Rate at which the delay and sound timers count down, in Hz
pub const TIMER_FREQUENCY: u32 = 60;

/// Default instruction rate, in Hz
pub const CLOCK_SPEED: u32 = 500;

/// # Sprite Sheet
/// One 8x5 glyph per hexadecimal digit, only the high nibble of each row is lit.
///
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
