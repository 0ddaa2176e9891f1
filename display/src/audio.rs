use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const VOLUME: f32 = 0.25;

/// A square wave at a fixed pitch
struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// Plays a tone for as long as the Chip-8's sound timer is running.
///
/// The Chip-8 only says whether a tone should be sounding, so the beeper keeps
/// track of whether it already is and only touches the device on a change.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Beeper {
    /// # Arguments
    /// * `sdl` an sdl2 context with which to play audio
    /// * `tone` the pitch of the beep in Hz
    pub fn new(sdl: &sdl2::Sdl, tone: f32) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| {
            debug!("opened audio device at {}Hz", spec.freq);
            SquareWave {
                phase_inc: tone / spec.freq as f32,
                phase: 0.0,
                volume: VOLUME,
            }
        })?;

        Ok(Beeper {
            device,
            playing: false,
        })
    }

    /// Starts or stops the tone
    pub fn set_active(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
        self.playing = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave_alternates() {
        // a quarter of a period per sample
        let mut wave = SquareWave {
            phase_inc: 0.25,
            phase: 0.0,
            volume: 0.5,
        };
        let mut out = [0.0; 8];
        wave.callback(&mut out);
        assert_eq!(out, [0.5, 0.5, 0.5, -0.5, 0.5, 0.5, 0.5, -0.5]);
    }
}
