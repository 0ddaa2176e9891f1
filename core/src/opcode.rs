/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. The top nibble selects
/// the operation and the rest is laid out in one of three ways:
/// - `[_nnn]` a 12-bit address
/// - `[_xkk]` a register Vx and an 8-bit immediate
/// - `[_xyn]` registers Vx, Vy and a 4-bit literal
///
/// Some selectors (0x0, 0x8, 0xE, 0xF) reuse the low byte or low nibble to pick
/// between several operations.
pub trait Opcode {
    /// Returns the Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The Opcode's most significant nibble.
    /// `[s___]`
    fn selector(&self) -> u8;

    /// The register index in the second nibble.
    /// `[_x__]`
    fn x(&self) -> usize;

    /// The register index in the third nibble.
    /// `[__y_]`
    fn y(&self) -> usize;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.selector(), self.x() as u8, self.y() as u8, self.n())
    }

    fn selector(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}
