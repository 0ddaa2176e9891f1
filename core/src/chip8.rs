use std::io::Read;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MAX_ROM_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - a random number source for `Cxkk`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU by one instruction
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
/// - whether a tone should currently be playing
///
/// The CPU and the timers are advanced independently; the host is expected to
/// call `tick` at `TIMER_FREQUENCY` regardless of how fast it calls `cycle`.
pub struct Chip8 {
    state: State,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a Chip-8 whose `Cxkk` results are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Chip8 {
            state: State::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Copies a rom into memory at `PROGRAM_START`
    ///
    /// # Arguments
    /// * `rom` the program's bytes
    ///
    /// Memory is left untouched if the rom doesn't fit.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::rom_too_large(rom.len()));
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte rom at {:#05X}", rom.len(), start);
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom_from(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        // read one byte past the limit so oversized roms are caught without reading them whole
        reader.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    /// Set the pressed status of a key
    ///
    /// # Arguments
    /// * `key` the hex digit of the key, 0x0..=0xF
    /// * `pressed` whether the key is now held down
    ///
    /// Pressing a key while waiting on `Fx0A` stores the lowest held key in the
    /// waiting register and lets the next `cycle` carry on.
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        let key = key as usize;
        if key >= KEY_COUNT {
            warn!("ignoring event for unknown key {:#X}", key);
            return;
        }
        self.state.pressed_keys[key] = pressed;

        if pressed {
            if let Some(register) = self.state.register_needing_key {
                if let Some(lowest) = self.state.lowest_pressed_key() {
                    debug!("key {:X} released wait on V{:X}", lowest, register);
                    self.state.v[register] = lowest;
                    self.state.register_needing_key = None;
                }
            }
        }
    }

    /// Whether the CPU is stalled on `Fx0A`
    pub fn is_blocked(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    /// Advances the CPU by a single instruction
    /// - does nothing while awaiting a keypress
    /// - gets the next opcode and moves the pc past it
    /// - decodes and executes it
    pub fn cycle(&mut self) {
        if self.is_blocked() {
            return;
        }
        let op = self.get_op();
        self.state.pc = self.state.pc.wrapping_add(0x2);
        let instruction = Instruction::decode(op);
        trace!(
            "{:04X} {:?} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        instruction.execute(&mut self.state, &mut self.rng);
    }

    /// Counts both timers down by one, stopping at zero.
    /// Should be called at `TIMER_FREQUENCY`.
    pub fn tick(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Whether a tone should be playing
    pub fn is_sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Whether the pixel at `row`, `col` is lit.
    /// Coordinates off the screen are never lit.
    pub fn pixel_at(&self, row: usize, col: usize) -> bool {
        row < DISPLAY_HEIGHT && col < DISPLAY_WIDTH && self.state.frame_buffer[row][col]
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if it changed since the last call
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> u16 {
        let left = u16::from(self.state.read(self.state.pc));
        let right = u16::from(self.state.read(self.state.pc.wrapping_add(1)));
        left << 8 | right
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLAG;

    fn chip8_with(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_seed(0x8);
        chip8.load_rom(program).unwrap();
        chip8
    }

    #[test]
    fn test_chip8_gets_op() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(chip8.get_op(), 0xAABB);
    }

    #[test]
    fn test_get_op_wraps_at_end_of_memory() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0x0FFF;
        chip8.state.memory[0xFFF] = 0x12;
        chip8.state.memory[0x000] = 0x34;
        assert_eq!(chip8.get_op(), 0x1234);
    }

    #[test]
    fn test_cycle_advances_pc() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        chip8.cycle();
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_cycle_lets_jumps_overwrite_pc() {
        let mut chip8 = chip8_with(&[0x13, 0x45]);
        chip8.cycle();
        assert_eq!(chip8.state.pc, 0x345);
    }

    #[test]
    fn test_unknown_opcode_only_advances_pc() {
        let mut chip8 = chip8_with(&[0xF1, 0xFF]);
        chip8.cycle();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v, [0; 16]);
    }

    #[test]
    fn test_call_then_return_is_noop() {
        // 0x200: call 0x300
        let mut chip8 = chip8_with(&[0x23, 0x00]);
        chip8.state.memory[0x300..0x302].copy_from_slice(&[0x00, 0xEE]);
        let sp = chip8.state.sp;

        chip8.cycle();
        assert_eq!(chip8.state.pc, 0x300);
        chip8.cycle();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.sp, sp);
    }

    #[test]
    fn test_wait_for_key_blocks_until_pressed() {
        // 0x200: wait for key into V5, 0x202: V0 = 0x42
        let mut chip8 = chip8_with(&[0xF5, 0x0A, 0x60, 0x42]);

        chip8.cycle();
        assert!(chip8.is_blocked());
        for _ in 0..10 {
            chip8.cycle();
            assert_eq!(chip8.state.pc, 0x202);
        }
        assert_eq!(chip8.state.v[0x0], 0x0);

        chip8.set_key(0xB, true);
        assert!(!chip8.is_blocked());
        assert_eq!(chip8.state.v[0x5], 0xB);

        chip8.cycle();
        assert_eq!(chip8.state.pc, 0x204);
        assert_eq!(chip8.state.v[0x0], 0x42);
    }

    #[test]
    fn test_releasing_key_doesnt_unblock() {
        let mut chip8 = chip8_with(&[0xF5, 0x0A]);
        chip8.cycle();
        chip8.set_key(0x3, false);
        assert!(chip8.is_blocked());
    }

    #[test]
    fn test_wait_for_key_takes_lowest_held_key() {
        let mut chip8 = chip8_with(&[0xF5, 0x0A]);
        chip8.set_key(0xA, true);
        chip8.set_key(0x6, true);
        chip8.cycle();
        assert!(!chip8.is_blocked());
        assert_eq!(chip8.state.v[0x5], 0x6);
    }

    #[test]
    fn test_set_key_ignores_unknown_keys() {
        let mut chip8 = Chip8::new();
        chip8.set_key(0x10, true);
        assert!(chip8.state.pressed_keys.iter().all(|&k| !k));
    }

    #[test]
    fn test_tick_decrements_timers() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 0x2;
        chip8.state.sound_timer = 0x1;
        assert!(chip8.is_sound_active());

        chip8.tick();
        assert_eq!(chip8.state.delay_timer, 0x1);
        assert_eq!(chip8.state.sound_timer, 0x0);
        assert!(!chip8.is_sound_active());

        chip8.tick();
        chip8.tick();
        assert_eq!(chip8.state.delay_timer, 0x0);
        assert_eq!(chip8.state.sound_timer, 0x0);
    }

    #[test]
    fn test_timers_tick_while_blocked() {
        let mut chip8 = chip8_with(&[0xF0, 0x0A]);
        chip8.state.delay_timer = 0x5;
        chip8.cycle();
        chip8.tick();
        assert!(chip8.is_blocked());
        assert_eq!(chip8.state.delay_timer, 0x4);
    }

    #[test]
    fn test_sprite_drawn_twice_erases_itself() {
        // V0 = 0, V1 = 0, I = 0x300, draw 8x1 at (V0, V1) twice
        let mut chip8 = chip8_with(&[0x60, 0x00, 0x61, 0x00, 0xA3, 0x00, 0xD0, 0x11, 0xD0, 0x11]);
        chip8.state.memory[0x300] = 0xFF;
        for _ in 0..4 {
            chip8.cycle();
        }
        assert!((0..8).all(|col| chip8.pixel_at(0, col)));
        assert!(!chip8.pixel_at(0, 8));
        assert!(!chip8.pixel_at(1, 0));
        assert_eq!(chip8.state.v[FLAG], 0x0);

        chip8.cycle();
        assert!((0..8).all(|col| !chip8.pixel_at(0, col)));
        assert_eq!(chip8.state.v[FLAG], 0x1);
    }

    #[test]
    fn test_clear_screen_blanks_every_pixel() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        for row in chip8.state.frame_buffer.iter_mut() {
            for pixel in row.iter_mut() {
                *pixel = true;
            }
        }
        chip8.cycle();
        for row in 0..DISPLAY_HEIGHT {
            for col in 0..DISPLAY_WIDTH {
                assert!(!chip8.pixel_at(row, col));
            }
        }
    }

    #[test]
    fn test_pixel_at_out_of_range() {
        let mut chip8 = Chip8::new();
        chip8.state.frame_buffer[0][0] = true;
        assert!(chip8.pixel_at(0, 0));
        assert!(!chip8.pixel_at(32, 0));
        assert!(!chip8.pixel_at(0, 64));
    }

    #[test]
    fn test_take_frame_resets_draw_flag() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        assert!(chip8.take_frame().is_none());
        chip8.cycle();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_bulk_store_then_load_round_trips() {
        // I = 0x300, store V0..=V3, I = 0x300, load V0..=V3
        let mut chip8 = chip8_with(&[0xA3, 0x00, 0xF3, 0x55, 0xA3, 0x00, 0xF3, 0x65]);
        let registers = [0x12, 0x34, 0x56, 0x78];
        chip8.state.v[..4].copy_from_slice(&registers);

        chip8.cycle();
        chip8.cycle();
        assert_eq!(chip8.state.i, 0x304);

        chip8.state.v = [0; 16];
        chip8.cycle();
        chip8.cycle();
        assert_eq!(chip8.state.v[..4], registers);
        assert_eq!(chip8.state.i, 0x304);
    }

    #[test]
    fn test_bulk_store_then_load_without_reset_advances_twice() {
        let mut chip8 = chip8_with(&[0xF3, 0x55, 0xF3, 0x65]);
        chip8.state.i = 0x300;
        chip8.cycle();
        chip8.cycle();
        assert_eq!(chip8.state.i, 0x308);
    }

    #[test]
    fn test_bulk_store_cant_overwrite_sprite_sheet() {
        // I = 0x050, V0 = 0xAA, store V0..=V0
        let mut chip8 = chip8_with(&[0xA0, 0x50, 0x60, 0xAA, 0xF0, 0x55]);
        for _ in 0..3 {
            chip8.cycle();
        }
        assert_eq!(chip8.state.memory[0x050], 0xF0);
        assert_eq!(chip8.state.i, 0x051);
    }

    #[test]
    fn test_load_rom_copies_program() {
        let chip8 = chip8_with(&[0x00, 0xE0, 0x12, 0x00]);
        assert_eq!(chip8.state.memory[0x200..0x204], [0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_load_rom_fills_memory() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; MAX_ROM_SIZE];
        chip8.load_rom(&rom).unwrap();
        assert_eq!(chip8.state.memory[0xFFF], 0xAB);
    }

    #[test]
    fn test_load_rom_rejects_oversized() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; MAX_ROM_SIZE + 1];
        match chip8.load_rom(&rom) {
            Err(Chip8Error::RomTooLarge { size, max }) => {
                assert_eq!(size, 0xE01);
                assert_eq!(max, 0xE00);
            }
            _ => panic!("expected RomTooLarge"),
        }
        assert!(chip8.state.memory[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_rom_from_reader() {
        let mut chip8 = Chip8::new();
        let mut reader: &[u8] = &[0x60, 0x07];
        chip8.load_rom_from(&mut reader).unwrap();
        chip8.cycle();
        assert_eq!(chip8.state.v[0x0], 0x07);
    }

    #[test]
    fn test_load_rom_from_rejects_oversized() {
        let mut chip8 = Chip8::new();
        let rom = vec![0x0; MAX_ROM_SIZE + 10];
        let mut reader: &[u8] = &rom;
        assert!(matches!(
            chip8.load_rom_from(&mut reader),
            Err(Chip8Error::RomTooLarge { size, .. }) if size == MAX_ROM_SIZE + 1
        ));
    }

    struct UnreadableRom;

    impl Read for UnreadableRom {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_load_rom_from_unreadable_storage() {
        let mut chip8 = Chip8::new();
        assert!(matches!(
            chip8.load_rom_from(&mut UnreadableRom),
            Err(Chip8Error::Io(_))
        ));
        assert!(chip8.state.memory[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_seeded_chip8s_agree() {
        let program = [0xC0, 0xFF, 0xC1, 0xFF];
        let mut a = Chip8::with_seed(0x42);
        let mut b = Chip8::with_seed(0x42);
        a.load_rom(&program).unwrap();
        b.load_rom(&program).unwrap();
        for _ in 0..2 {
            a.cycle();
            b.cycle();
        }
        assert_eq!(a.state.v, b.state.v);
    }
}
