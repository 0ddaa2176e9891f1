use log::debug;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    REGISTER_COUNT, SPRITE_SHEET, STACK_SIZE,
};

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer, always the index of the next free stack slot
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - A tone should play while the sound timer is non-zero
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the sprite sheet
///     - ROMs are loaded at 0x200
/// - 32x64 frame buffer
///
/// ## Input
/// - pressed status of keys 0..F
/// - Emulation halts while `register_needing_key` is Some register
///
/// ## Out of range access
/// Memory addresses wrap at 4096 and the stack pointer wraps at 16,
/// so no guest program can index outside of the state.
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; KEY_COUNT],
    pub register_needing_key: Option<usize>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            register_needing_key: None,
        }
    }

    /// Reads the byte at `addr`, wrapping at the end of memory
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEMORY_SIZE]
    }

    /// Writes `byte` at `addr`, wrapping at the end of memory.
    /// The sprite sheet is read only, writes into it are dropped.
    pub fn write(&mut self, addr: u16, byte: u8) {
        let addr = addr as usize % MEMORY_SIZE;
        let font = FONT_START as usize;
        if (font..font + SPRITE_SHEET.len()).contains(&addr) {
            debug!("dropping write of {:#04X} into the sprite sheet at {:#05X}", byte, addr);
            return;
        }
        self.memory[addr] = byte;
    }

    /// The lowest numbered key that is currently held down
    pub fn lowest_pressed_key(&self) -> Option<u8> {
        self.pressed_keys
            .iter()
            .position(|&pressed| pressed)
            .map(|key| key as u8)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
