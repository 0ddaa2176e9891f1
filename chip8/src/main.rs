use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use chip8_core::CLOCK_SPEED;

mod keymap;
mod run;

/// Fastest clock whose period is still a whole nanosecond
const MAX_CLOCK_SPEED: i64 = 1_000_000_000;

/// Runs a Chip-8 ROM in an SDL2 window.
///
/// Keys 1-4, Q-R, A-F and Z-V map onto the hex keypad. Hold Space to fast
/// forward and press Escape to quit.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Config {
    /// Path to the ROM to run
    pub rom: PathBuf,

    /// Instructions executed per second, at most one per nanosecond
    #[arg(
        long,
        default_value_t = CLOCK_SPEED,
        value_parser = clap::value_parser!(u32).range(1..=MAX_CLOCK_SPEED)
    )]
    pub clock_speed: u32,

    /// Size of each Chip-8 pixel in screen pixels
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: u32,

    /// Pitch of the beep in Hz
    #[arg(long, default_value_t = 440.0)]
    pub tone: f32,
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    if let Err(e) = run::run(config) {
        error!("{}", e);
        process::exit(1);
    }
}
