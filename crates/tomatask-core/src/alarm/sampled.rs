use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use rodio::{Decoder, OutputStream, Sink};

use super::{play_detached, AlarmError, Notifier};

/// Plays a sound file (wav, ogg or mp3).
#[derive(Debug, Clone)]
pub struct SampledAlarm {
    path: Option<PathBuf>,
}

impl SampledAlarm {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl Notifier for SampledAlarm {
    fn name(&self) -> &'static str {
        "sampled"
    }

    fn notify(&self, gain: f32) -> Result<(), AlarmError> {
        let Some(path) = self.path.clone() else {
            return Err(AlarmError::PlaybackUnavailable(
                "no alarm sound configured".into(),
            ));
        };
        if !path.is_file() {
            return Err(AlarmError::PlaybackUnavailable(format!(
                "{} not found",
                path.display()
            )));
        }

        play_detached("alarm-sampled", move || {
            let (stream, handle) = OutputStream::try_default().map_err(|e| e.to_string())?;
            let file = File::open(&path).map_err(|e| e.to_string())?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())?;
            let sink = Sink::try_new(&handle).map_err(|e| e.to_string())?;
            sink.set_volume(gain);
            sink.append(source);
            Ok((stream, sink))
        })
        .map_err(AlarmError::PlaybackUnavailable)
    }
}
