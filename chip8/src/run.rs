use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use log::{info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::{Chip8, TIMER_FREQUENCY};
use chip8_display::{Beeper, Display};

use crate::keymap::keymap;
use crate::Config;

/// Upper bound on how far behind the wall clock the emulator may fall,
/// so a stall (e.g. a dragged window) doesn't cause a burst of catch-up cycles.
const MAX_LAG: Duration = Duration::from_millis(250);

/// Idle time between iterations once the emulator has caught up
const IDLE: Duration = Duration::from_millis(1);

/// Accumulates elapsed wall time and hands it back in fixed periods
struct Pacer {
    period: Duration,
    lag: Duration,
}

impl Pacer {
    fn new(frequency: u32) -> Self {
        Pacer {
            period: Duration::from_secs(1) / frequency,
            lag: Duration::from_secs(0),
        }
    }

    fn add(&mut self, elapsed: Duration) {
        self.lag = (self.lag + elapsed).min(MAX_LAG);
    }

    /// Consumes one period if a whole one has elapsed
    fn due(&mut self) -> bool {
        if self.lag >= self.period {
            self.lag -= self.period;
            true
        } else {
            false
        }
    }
}

pub fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::new();

    // Load ROM
    let file = File::open(&config.rom)?;
    let mut reader = BufReader::new(file);
    chip8.load_rom_from(&mut reader)?;
    info!("loaded {}", config.rom.display());

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, config.scale)?;
    let mut beeper = Beeper::new(&sdl, config.tone)?;
    let mut events = sdl.event_pump()?;

    let mut cpu = Pacer::new(config.clock_speed);
    let mut timers = Pacer::new(TIMER_FREQUENCY);
    let mut previous = Instant::now();

    // Whether or not the clock speed should be respected
    let mut fast_forward = false;

    'event: loop {
        // Handle input; SDL also turns SIGINT and SIGTERM into Quit
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.set_key(kc, true),
                    (Keycode::Space, _) => fast_forward = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.set_key(kc, false),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Handle timing
        let current = Instant::now();
        let elapsed = current - previous;
        previous = current;
        cpu.add(elapsed);
        timers.add(elapsed);

        // Update state
        if fast_forward {
            cpu.lag = MAX_LAG;
        }
        while cpu.due() {
            chip8.cycle();
        }
        while timers.due() {
            chip8.tick();
        }
        beeper.set_active(chip8.is_sound_active());

        // If the frame changed, render it
        if let Some(frame) = chip8.take_frame() {
            if let Err(e) = display.render(frame) {
                warn!("failed to render frame: {}", e);
            }
        }

        std::thread::sleep(IDLE);
    }

    info!("shutting down");
    Ok(())
}
