//! Opcode handlers.
//!
//! The program counter has already been moved past the current opcode when a
//! handler runs, so skips add another 2 and jumps simply overwrite it.

use log::{debug, warn};
use rand::Rng;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG, FONT_SPRITE_SIZE, FONT_START, STACK_SIZE,
};
use crate::state::State;

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc = state.pc.wrapping_add(0x2);
    }
}

/// clear
pub fn cls(state: &mut State) {
    state.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
}

/// PC = STACK.pop()
pub fn ret(state: &mut State) {
    state.sp = match state.sp {
        0 => {
            warn!("stack underflow at {:#05X}, wrapping", state.pc.wrapping_sub(0x2));
            STACK_SIZE as u8 - 1
        }
        sp => sp - 1,
    };
    state.pc = state.stack[state.sp as usize];
}

/// PC = nnn
pub fn jump(state: &mut State, nnn: u16) {
    state.pc = nnn;
}

/// STACK.push(PC); PC = nnn
pub fn call(state: &mut State, nnn: u16) {
    state.stack[state.sp as usize] = state.pc;
    state.sp += 1;
    if state.sp as usize == STACK_SIZE {
        warn!("stack overflow at {:#05X}, wrapping", state.pc.wrapping_sub(0x2));
        state.sp = 0;
    }
    state.pc = nnn;
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] == kk;
    skip_if(state, condition);
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: usize, kk: u8) {
    let condition = state.v[x] != kk;
    skip_if(state, condition);
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] == state.v[y];
    skip_if(state, condition);
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: usize, y: usize) {
    let condition = state.v[x] != state.v[y];
    skip_if(state, condition);
}

/// Vx = kk
pub fn load(state: &mut State, x: usize, kk: u8) {
    state.v[x] = kk;
}

/// Vx += kk
/// Wraps on overflow and leaves VF alone
pub fn add(state: &mut State, x: usize, kk: u8) {
    state.v[x] = state.v[x].wrapping_add(kk);
}

/// Vx = Vy
pub fn mv(state: &mut State, x: usize, y: usize) {
    state.v[x] = state.v[y];
}

/// Vx |= Vy
pub fn or(state: &mut State, x: usize, y: usize) {
    state.v[x] |= state.v[y];
}

/// Vx &= Vy
pub fn and(state: &mut State, x: usize, y: usize) {
    state.v[x] &= state.v[y];
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: usize, y: usize) {
    state.v[x] ^= state.v[y];
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: usize, y: usize) {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    state.v[x] = res;
    state.v[FLAG] = over as u8;
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[x].overflowing_sub(state.v[y]);
    state.v[x] = res;
    state.v[FLAG] = !under as u8;
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[y].overflowing_sub(state.v[x]);
    state.v[x] = res;
    state.v[FLAG] = !under as u8;
}

/// Vx = Vy >> 1; VF = lsb(Vy)
pub fn shr(state: &mut State, x: usize, y: usize) {
    let source = state.v[y];
    state.v[x] = source >> 1;
    state.v[FLAG] = source & 0x1;
}

/// Vx = Vy << 1; VF = msb(Vy)
pub fn shl(state: &mut State, x: usize, y: usize) {
    let source = state.v[y];
    state.v[x] = source << 1;
    state.v[FLAG] = source >> 7;
}

/// I = nnn
pub fn loadi(state: &mut State, nnn: u16) {
    state.i = nnn;
}

/// PC = V0 + nnn
pub fn jumpi(state: &mut State, nnn: u16) {
    state.pc = u16::from(state.v[0x0]) + nnn;
}

/// Vx = rand_byte & kk
pub fn rand<R: Rng + ?Sized>(state: &mut State, rng: &mut R, x: usize, kk: u8) {
    state.v[x] = rng.gen::<u8>() & kk;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs an n byte sprite read from memory at I onto the FrameBuffer.
/// The origin wraps onto the screen but the sprite itself is clipped at the edges.
/// Sets VF if any pixels are erased
pub fn draw(state: &mut State, x: usize, y: usize, n: u8) {
    let left = state.v[x] as usize % DISPLAY_WIDTH;
    let top = state.v[y] as usize % DISPLAY_HEIGHT;

    state.v[FLAG] = 0x0;

    for byte in 0..n {
        let row = top + byte as usize;
        if row >= DISPLAY_HEIGHT {
            break;
        }
        let sprite_row = state.read(state.i.wrapping_add(u16::from(byte)));
        for bit in 0..8 {
            let col = left + bit;
            if col >= DISPLAY_WIDTH {
                break;
            }
            if (sprite_row >> (7 - bit)) & 0x1 == 0x1 {
                let pixel = &mut state.frame_buffer[row][col];
                if *pixel {
                    state.v[FLAG] = 0x1;
                }
                *pixel = !*pixel;
            }
        }
    }

    state.draw_flag = true;
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, x: usize) {
    let key = (state.v[x] & 0xF) as usize;
    let condition = state.pressed_keys[key];
    skip_if(state, condition);
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, x: usize) {
    let key = (state.v[x] & 0xF) as usize;
    let condition = !state.pressed_keys[key];
    skip_if(state, condition);
}

/// Vx = DT
pub fn moved(state: &mut State, x: usize) {
    state.v[x] = state.delay_timer;
}

/// await keypress for Vx
/// A key that is already held satisfies the wait straight away
pub fn keyd(state: &mut State, x: usize) {
    match state.lowest_pressed_key() {
        Some(key) => {
            state.register_needing_key = None;
            state.v[x] = key;
        }
        None => {
            debug!("blocking until a key is pressed for V{:X}", x);
            state.register_needing_key = Some(x);
        }
    }
}

/// DT = Vx
pub fn setd(state: &mut State, x: usize) {
    state.delay_timer = state.v[x];
}

/// ST = Vx
pub fn sets(state: &mut State, x: usize) {
    state.sound_timer = state.v[x];
}

/// I += Vx; VF = I > 0xFFF
pub fn addi(state: &mut State, x: usize) {
    let sum = u32::from(state.i) + u32::from(state.v[x]);
    state.i = state.i.wrapping_add(u16::from(state.v[x]));
    state.v[FLAG] = (sum > 0x0FFF) as u8;
}

/// I = FONT_START + Vx * 5
/// Set I to the memory address of the glyph for the hex digit in Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: usize) {
    state.i = FONT_START + u16::from(state.v[x] & 0xF) * FONT_SPRITE_SIZE;
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address I
pub fn bcd(state: &mut State, x: usize) {
    let value = state.v[x];
    let digits = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in (0u16..).zip(digits.iter()) {
        state.write(state.i.wrapping_add(offset), *digit);
    }
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(state: &mut State, x: usize) {
    for r in 0..=x {
        state.write(state.i.wrapping_add(r as u16), state.v[r]);
    }
    state.i = state.i.wrapping_add(x as u16 + 1);
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(state: &mut State, x: usize) {
    for r in 0..=x {
        state.v[r] = state.read(state.i.wrapping_add(r as u16));
    }
    state.i = state.i.wrapping_add(x as u16 + 1);
}
