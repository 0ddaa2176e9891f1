use rand::Rng;

use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction.
///
/// Register operands are indices into `State::v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - clear the screen
    ClearScreen,
    /// 00EE - return from subroutine
    Return,
    /// 1nnn - jump to nnn
    Jump(u16),
    /// 2nnn - call subroutine at nnn
    Call(u16),
    /// 3xkk - skip next if Vx == kk
    SkipIfEqual(usize, u8),
    /// 4xkk - skip next if Vx != kk
    SkipIfNotEqual(usize, u8),
    /// 5xy_ - skip next if Vx == Vy
    SkipIfRegistersEqual(usize, usize),
    /// 6xkk - Vx = kk
    Load(usize, u8),
    /// 7xkk - Vx += kk
    Add(usize, u8),
    /// 8xy0 - Vx = Vy
    Move(usize, usize),
    /// 8xy1 - Vx |= Vy
    Or(usize, usize),
    /// 8xy2 - Vx &= Vy
    And(usize, usize),
    /// 8xy3 - Vx ^= Vy
    Xor(usize, usize),
    /// 8xy4 - Vx += Vy with carry in VF
    AddWithCarry(usize, usize),
    /// 8xy5 - Vx -= Vy with !borrow in VF
    Sub(usize, usize),
    /// 8xy6 - Vx = Vy >> 1 with the shifted out bit in VF
    ShiftRight(usize, usize),
    /// 8xy7 - Vx = Vy - Vx with !borrow in VF
    SubN(usize, usize),
    /// 8xyE - Vx = Vy << 1 with the shifted out bit in VF
    ShiftLeft(usize, usize),
    /// 9xy_ - skip next if Vx != Vy
    SkipIfRegistersNotEqual(usize, usize),
    /// Annn - I = nnn
    LoadIndex(u16),
    /// Bnnn - jump to nnn + V0
    JumpOffset(u16),
    /// Cxkk - Vx = random & kk
    Random(usize, u8),
    /// Dxyn - draw an n row sprite at (Vx, Vy)
    Draw(usize, usize, u8),
    /// Ex9E - skip next if key Vx is pressed
    SkipIfPressed(usize),
    /// ExA1 - skip next if key Vx is not pressed
    SkipIfNotPressed(usize),
    /// Fx07 - Vx = DT
    LoadDelay(usize),
    /// Fx0A - wait for a key press and store it in Vx
    WaitForKey(usize),
    /// Fx15 - DT = Vx
    SetDelay(usize),
    /// Fx18 - ST = Vx
    SetSound(usize),
    /// Fx1E - I += Vx
    AddIndex(usize),
    /// Fx29 - I = address of the glyph for Vx
    LoadGlyph(usize),
    /// Fx33 - mem[I..I+3] = bcd(Vx)
    StoreBcd(usize),
    /// Fx55 - mem[I..=I+x] = V0..=Vx
    StoreRegisters(usize),
    /// Fx65 - V0..=Vx = mem[I..=I+x]
    LoadRegisters(usize),
    /// Anything else. Executes as a no-op so data can be run as code.
    Unknown(u16),
}

impl Instruction {
    /// Decodes an Opcode.
    ///
    /// The top nibble picks the instruction. 0x0, 0xE and 0xF are further keyed
    /// by the low byte and 0x8 by the low nibble; 0x5 and 0x9 ignore theirs.
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        match op.nibbles() {
            (0x0, _, 0xE, 0x0) => ClearScreen,
            (0x0, _, 0xE, 0xE) => Return,
            (0x1, ..) => Jump(op.nnn()),
            (0x2, ..) => Call(op.nnn()),
            (0x3, ..) => SkipIfEqual(op.x(), op.kk()),
            (0x4, ..) => SkipIfNotEqual(op.x(), op.kk()),
            (0x5, ..) => SkipIfRegistersEqual(op.x(), op.y()),
            (0x6, ..) => Load(op.x(), op.kk()),
            (0x7, ..) => Add(op.x(), op.kk()),
            (0x8, .., 0x0) => Move(op.x(), op.y()),
            (0x8, .., 0x1) => Or(op.x(), op.y()),
            (0x8, .., 0x2) => And(op.x(), op.y()),
            (0x8, .., 0x3) => Xor(op.x(), op.y()),
            (0x8, .., 0x4) => AddWithCarry(op.x(), op.y()),
            (0x8, .., 0x5) => Sub(op.x(), op.y()),
            (0x8, .., 0x6) => ShiftRight(op.x(), op.y()),
            (0x8, .., 0x7) => SubN(op.x(), op.y()),
            (0x8, .., 0xE) => ShiftLeft(op.x(), op.y()),
            (0x9, ..) => SkipIfRegistersNotEqual(op.x(), op.y()),
            (0xA, ..) => LoadIndex(op.nnn()),
            (0xB, ..) => JumpOffset(op.nnn()),
            (0xC, ..) => Random(op.x(), op.kk()),
            (0xD, ..) => Draw(op.x(), op.y(), op.n()),
            (0xE, _, 0x9, 0xE) => SkipIfPressed(op.x()),
            (0xE, _, 0xA, 0x1) => SkipIfNotPressed(op.x()),
            (0xF, _, 0x0, 0x7) => LoadDelay(op.x()),
            (0xF, _, 0x0, 0xA) => WaitForKey(op.x()),
            (0xF, _, 0x1, 0x5) => SetDelay(op.x()),
            (0xF, _, 0x1, 0x8) => SetSound(op.x()),
            (0xF, _, 0x1, 0xE) => AddIndex(op.x()),
            (0xF, _, 0x2, 0x9) => LoadGlyph(op.x()),
            (0xF, _, 0x3, 0x3) => StoreBcd(op.x()),
            (0xF, _, 0x5, 0x5) => StoreRegisters(op.x()),
            (0xF, _, 0x6, 0x5) => LoadRegisters(op.x()),
            _ => Unknown(op),
        }
    }

    /// Applies the instruction to `state`.
    /// `rng` is only consulted by `Random`.
    pub fn execute<R: Rng + ?Sized>(self, state: &mut State, rng: &mut R) {
        use Instruction::*;

        match self {
            ClearScreen => cls(state),
            Return => ret(state),
            Jump(nnn) => jump(state, nnn),
            Call(nnn) => call(state, nnn),
            SkipIfEqual(x, kk) => ske(state, x, kk),
            SkipIfNotEqual(x, kk) => skne(state, x, kk),
            SkipIfRegistersEqual(x, y) => skre(state, x, y),
            Load(x, kk) => load(state, x, kk),
            Add(x, kk) => add(state, x, kk),
            Move(x, y) => mv(state, x, y),
            Or(x, y) => or(state, x, y),
            And(x, y) => and(state, x, y),
            Xor(x, y) => xor(state, x, y),
            AddWithCarry(x, y) => addr(state, x, y),
            Sub(x, y) => sub(state, x, y),
            ShiftRight(x, y) => shr(state, x, y),
            SubN(x, y) => subn(state, x, y),
            ShiftLeft(x, y) => shl(state, x, y),
            SkipIfRegistersNotEqual(x, y) => skrne(state, x, y),
            LoadIndex(nnn) => loadi(state, nnn),
            JumpOffset(nnn) => jumpi(state, nnn),
            Random(x, kk) => rand(state, rng, x, kk),
            Draw(x, y, n) => draw(state, x, y, n),
            SkipIfPressed(x) => skpr(state, x),
            SkipIfNotPressed(x) => skup(state, x),
            LoadDelay(x) => moved(state, x),
            WaitForKey(x) => keyd(state, x),
            SetDelay(x) => setd(state, x),
            SetSound(x) => sets(state, x),
            AddIndex(x) => addi(state, x),
            LoadGlyph(x) => ldspr(state, x),
            StoreBcd(x) => bcd(state, x),
            StoreRegisters(x) => stor(state, x),
            LoadRegisters(x) => read(state, x),
            Unknown(_) => {}
        }
    }
}
