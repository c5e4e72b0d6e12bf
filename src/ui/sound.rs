/// Sound cues: short procedural effects via rodio, one per game event.
///
/// Every buffer is synthesised into an in-memory WAV once at start-up and
/// replayed fire-and-forget through a detached Sink.
///
/// Without the "sound" feature the stub `SoundEngine` accepts the same
/// calls and does nothing.

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::sim::event::GameEvent;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_crack: Arc<Vec<u8>>,
        sfx_door_open: Arc<Vec<u8>>,
        sfx_door_shut: Arc<Vec<u8>>,
        sfx_smash: Arc<Vec<u8>>,
        sfx_alarm: Arc<Vec<u8>>,
        sfx_caught: Arc<Vec<u8>>,
        sfx_escape: Arc<Vec<u8>>,
        sfx_perfect: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_crack: Arc::new(make_wav(&gen_crack())),
                sfx_door_open: Arc::new(make_wav(&gen_door(140.0))),
                sfx_door_shut: Arc::new(make_wav(&gen_door(90.0))),
                sfx_smash: Arc::new(make_wav(&gen_smash())),
                sfx_alarm: Arc::new(make_wav(&gen_alarm())),
                sfx_caught: Arc::new(make_wav(&gen_caught())),
                sfx_escape: Arc::new(make_wav(&gen_escape())),
                sfx_perfect: Arc::new(make_wav(&gen_perfect())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_event(&self, event: &GameEvent) {
            let buf = match event {
                GameEvent::SafeCracked => &self.sfx_crack,
                GameEvent::DoorToggled { open: true } => &self.sfx_door_open,
                GameEvent::DoorToggled { open: false } => &self.sfx_door_shut,
                GameEvent::CameraBroken => &self.sfx_smash,
                GameEvent::CameraTripped => &self.sfx_alarm,
                GameEvent::Captured => &self.sfx_caught,
                GameEvent::Escaped => &self.sfx_escape,
                GameEvent::Perfect => &self.sfx_perfect,
            };
            self.play(buf);
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators, mono f32 samples
    // ════════════════════════════════════════════════════════════

    fn samples_for(seconds: f32) -> usize {
        (SAMPLE_RATE as f32 * seconds) as usize
    }

    /// Append a decaying tone with an optional octave overtone.
    fn push_note(out: &mut Vec<f32>, freq: f32, seconds: f32, overtone: f32, volume: f32) {
        let n = samples_for(seconds);
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            let wave = (t * freq * TAU).sin() * (1.0 - overtone) + (t * freq * 2.0 * TAU).sin() * overtone;
            out.push(wave * env * volume);
        }
    }

    /// Cash: the tumblers click, then a bright rising pair.
    fn gen_crack() -> Vec<f32> {
        let mut samples = Vec::new();
        for _ in 0..3 {
            push_note(&mut samples, 2200.0, 0.012, 0.0, 0.2);
            samples.extend(std::iter::repeat(0.0).take(samples_for(0.03)));
        }
        push_note(&mut samples, 1319.0, 0.05, 0.3, 0.25);
        push_note(&mut samples, 1976.0, 0.09, 0.3, 0.25);
        samples
    }

    /// Door or hatch: a low filtered thump. Shutting sits lower than opening.
    fn gen_door(body_hz: f32) -> Vec<f32> {
        let n = samples_for(0.09);
        let mut rng: u32 = 0x2545_f491;
        let mut last = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // one-pole low-pass keeps only the body of the knock
                last += (noise - last) * 0.08;
                let tone = (i as f32 / SAMPLE_RATE as f32 * body_hz * TAU).sin();
                (tone * 0.5 + last * 2.0) * (1.0 - t).powi(2) * 0.35
            })
            .collect()
    }

    /// Camera smashed: bright noise burst.
    fn gen_smash() -> Vec<f32> {
        let n = samples_for(0.16);
        let mut rng: u32 = 98_765;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                noise * (1.0 - t).powf(1.5) * 0.3
            })
            .collect()
    }

    /// Camera tripped: two-tone warble.
    fn gen_alarm() -> Vec<f32> {
        let mut samples = Vec::new();
        for _ in 0..2 {
            push_note(&mut samples, 880.0, 0.07, 0.5, 0.22);
            push_note(&mut samples, 660.0, 0.07, 0.5, 0.22);
        }
        samples
    }

    /// Caught: slow descending minor line.
    fn gen_caught() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [392.0_f32, 311.0, 261.0, 196.0] {
            push_note(&mut samples, freq, 0.13, 0.1, 0.3);
        }
        samples
    }

    /// Escaped short of the full take: a plain major triad.
    fn gen_escape() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [523.0_f32, 659.0, 784.0] {
            push_note(&mut samples, freq, 0.1, 0.3, 0.3);
        }
        samples
    }

    /// Every safe emptied: the triad plus a held top note.
    fn gen_perfect() -> Vec<f32> {
        let mut samples = gen_escape();
        push_note(&mut samples, 1047.0, 0.3, 0.3, 0.3);
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder
    // ════════════════════════════════════════════════════════════

    /// 16-bit mono PCM in a RIFF container.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API, no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn play_event(&self, _event: &GameEvent) {}
}

/// Route an event to the engine if there is one.
pub fn play(sound: Option<&SoundEngine>, event: &GameEvent) {
    if let Some(sfx) = sound {
        sfx.play_event(event);
    }
}
