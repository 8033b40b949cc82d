//! Synthesized fallback: three short 880 Hz sine pulses, 200 ms apart.
//!
//! Each pulse ramps linearly to a quarter of the requested gain over 20 ms
//! and then decays exponentially to 0.01 by the end of its 300 ms.

use std::f32::consts::TAU;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

use super::{play_detached, AlarmError, Notifier};

pub const TONE_SAMPLE_RATE: u32 = 44_100;

const TONE_HZ: f32 = 880.0;
const PULSE_OFFSETS_MS: [u32; 3] = [0, 200, 400];
const PULSE_MS: u32 = 300;
const ATTACK_SECS: f32 = 0.02;
const PEAK_SCALE: f32 = 0.25;
const DECAY_FLOOR: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct ToneAlarm {
    sample_rate: u32,
}

impl Default for ToneAlarm {
    fn default() -> Self {
        Self {
            sample_rate: TONE_SAMPLE_RATE,
        }
    }
}

impl Notifier for ToneAlarm {
    fn name(&self) -> &'static str {
        "tone"
    }

    fn notify(&self, gain: f32) -> Result<(), AlarmError> {
        let sample_rate = self.sample_rate;
        let samples = synthesize_pulses(gain, sample_rate);
        play_detached("alarm-tone", move || {
            let (stream, handle) = OutputStream::try_default().map_err(|e| e.to_string())?;
            let sink = Sink::try_new(&handle).map_err(|e| e.to_string())?;
            sink.append(SamplesBuffer::new(1, sample_rate, samples));
            Ok((stream, sink))
        })
        .map_err(AlarmError::SynthesisUnavailable)
    }
}

fn envelope(t: f32, peak: f32) -> f32 {
    if peak <= 0.0 {
        return 0.0;
    }
    if t < ATTACK_SECS {
        return peak * t / ATTACK_SECS;
    }
    let decay_secs = PULSE_MS as f32 / 1000.0 - ATTACK_SECS;
    let floor = DECAY_FLOOR.min(peak);
    peak * (floor / peak).powf((t - ATTACK_SECS) / decay_secs)
}

fn ms_to_samples(ms: u32, sample_rate: u32) -> usize {
    (u64::from(ms) * u64::from(sample_rate) / 1000) as usize
}

/// Mono samples for the full three-pulse pattern at `gain` (0.0..=1.0).
pub fn synthesize_pulses(gain: f32, sample_rate: u32) -> Vec<f32> {
    let peak = gain.clamp(0.0, 1.0) * PEAK_SCALE;
    let pulse_len = ms_to_samples(PULSE_MS, sample_rate);
    let last_offset = PULSE_OFFSETS_MS[PULSE_OFFSETS_MS.len() - 1];
    let total_len = ms_to_samples(last_offset + PULSE_MS, sample_rate);

    let mut samples = vec![0.0f32; total_len];
    for offset_ms in PULSE_OFFSETS_MS {
        let start = ms_to_samples(offset_ms, sample_rate);
        for i in 0..pulse_len {
            let Some(slot) = samples.get_mut(start + i) else {
                break;
            };
            let t = i as f32 / sample_rate as f32;
            *slot += envelope(t, peak) * (TAU * TONE_HZ * t).sin();
        }
    }
    for s in &mut samples {
        *s = s.clamp(-1.0, 1.0);
    }
    samples
}
