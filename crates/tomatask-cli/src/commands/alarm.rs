use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use tomatask_core::{AlarmOutcome, AlarmPlayer, Config};

use crate::common::{CliResult, Context};

/// Playback runs on a detached thread; keep the process alive long enough
/// to hear it.
const PLAYBACK_GRACE: Duration = Duration::from_secs(3);

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Play the alarm at the configured volume
    Test {
        /// Override the volume (0-100)
        #[arg(long)]
        volume: Option<u32>,
    },
}

/// Alarm player honoring `alarm.enabled` and `alarm.sound_path`.
pub fn player_for(config: &Config) -> Arc<AlarmPlayer> {
    if config.alarm.enabled {
        Arc::new(AlarmPlayer::standard(config.alarm_sound_path()))
    } else {
        Arc::new(AlarmPlayer::silent())
    }
}

pub fn run(action: AlarmAction) -> CliResult {
    let ctx = Context::load()?;

    match action {
        AlarmAction::Test { volume } => {
            let volume = volume.unwrap_or(ctx.effective_settings().alarm_volume);
            match player_for(&ctx.config).play(volume) {
                AlarmOutcome::Played(name) => {
                    println!("playing {name} alarm at {}%", volume.min(100));
                    std::thread::sleep(PLAYBACK_GRACE);
                }
                AlarmOutcome::Silent => println!("alarm unavailable (see log for details)"),
            }
        }
    }
    Ok(())
}
