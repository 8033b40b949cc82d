//! Best-effort alarm playback.
//!
//! An [`AlarmPlayer`] tries its [`Notifier`]s in order until one starts
//! playing. The standard chain is a sampled sound file followed by a
//! synthesized tone. Failures are logged and swallowed: ringing the alarm
//! never returns an error to the caller and never blocks until the sound
//! has finished.

mod sampled;
mod tone;

pub use sampled::SampledAlarm;
pub use tone::{synthesize_pulses, ToneAlarm, TONE_SAMPLE_RATE};

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use rodio::{OutputStream, Sink};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlarmError {
    /// The sampled alarm could not start.
    #[error("Alarm playback unavailable: {0}")]
    PlaybackUnavailable(String),

    /// The synthesized fallback could not start.
    #[error("Alarm synthesis unavailable: {0}")]
    SynthesisUnavailable(String),
}

/// One way of making noise. `gain` is already clamped to `0.0..=1.0`.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Start playback. Returns once playback has begun (or failed to);
    /// the sound itself may keep playing afterwards.
    fn notify(&self, gain: f32) -> Result<(), AlarmError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmOutcome {
    Played(&'static str),
    Silent,
}

pub struct AlarmPlayer {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl AlarmPlayer {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Sampled sound from `sound_path`, falling back to the synthesized tone.
    pub fn standard(sound_path: Option<PathBuf>) -> Self {
        Self::new(vec![
            Box::new(SampledAlarm::new(sound_path)),
            Box::new(ToneAlarm::default()),
        ])
    }

    /// A player that never makes a sound.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn play(&self, volume_percent: u32) -> AlarmOutcome {
        let gain = volume_percent.min(100) as f32 / 100.0;
        for notifier in &self.notifiers {
            match notifier.notify(gain) {
                Ok(()) => {
                    tracing::debug!(notifier = notifier.name(), gain, "Alarm playing");
                    return AlarmOutcome::Played(notifier.name());
                }
                Err(err) => {
                    tracing::warn!(notifier = notifier.name(), error = %err, "Alarm notifier failed");
                }
            }
        }
        AlarmOutcome::Silent
    }
}

/// Run `open` on a dedicated thread that keeps the output stream alive
/// until the sink drains. Returns as soon as `open` has succeeded or failed.
pub(crate) fn play_detached<F>(thread_name: &str, open: F) -> Result<(), String>
where
    F: FnOnce() -> Result<(OutputStream, Sink), String> + Send + 'static,
{
    let (ack_tx, ack_rx) = mpsc::channel();
    thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || match open() {
            Ok((_stream, sink)) => {
                let _ = ack_tx.send(Ok(()));
                sink.sleep_until_end();
            }
            Err(err) => {
                let _ = ack_tx.send(Err(err));
            }
        })
        .map_err(|e| e.to_string())?;
    ack_rx
        .recv()
        .map_err(|_| "playback thread exited early".to_string())?
}
