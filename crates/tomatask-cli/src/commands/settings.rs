use clap::Subcommand;
use tomatask_core::{PomodoroSettings, SettingsUpdate, DEFAULT_SETTINGS};

use crate::common::{signed_in, CliResult, Context};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the effective settings as JSON
    Show,
    /// Save new values. Out-of-range values are clamped.
    Set {
        /// Work interval in minutes (1-60)
        #[arg(long, allow_negative_numbers = true)]
        work: Option<i64>,
        /// Short break in minutes (1-30)
        #[arg(long, allow_negative_numbers = true)]
        short_break: Option<i64>,
        /// Long break in minutes (1-60)
        #[arg(long, allow_negative_numbers = true)]
        long_break: Option<i64>,
        /// Work sessions before a long break (1-10)
        #[arg(long, allow_negative_numbers = true)]
        sessions: Option<i64>,
        /// Alarm volume in percent (0-100)
        #[arg(long, allow_negative_numbers = true)]
        volume: Option<i64>,
    },
    /// Save the default values
    Reset,
}

fn full_update(settings: &PomodoroSettings) -> SettingsUpdate {
    SettingsUpdate {
        work_duration: Some(settings.work_duration.into()),
        short_break_duration: Some(settings.short_break_duration.into()),
        long_break_duration: Some(settings.long_break_duration.into()),
        sessions_before_long_break: Some(settings.sessions_before_long_break.into()),
        alarm_volume: Some(settings.alarm_volume.into()),
    }
}

fn save(ctx: &Context, update: &SettingsUpdate) -> CliResult {
    let saved = signed_in(ctx.resolver().save(&ctx.identity(), update))?;
    println!("{}", serde_json::to_string_pretty(&saved)?);
    Ok(())
}

pub fn run(action: SettingsAction) -> CliResult {
    let ctx = Context::load()?;
    match action {
        SettingsAction::Show => {
            let settings = ctx.effective_settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        SettingsAction::Set {
            work,
            short_break,
            long_break,
            sessions,
            volume,
        } => {
            let update = SettingsUpdate {
                work_duration: work,
                short_break_duration: short_break,
                long_break_duration: long_break,
                sessions_before_long_break: sessions,
                alarm_volume: volume,
            };
            if update.is_empty() {
                return Err("nothing to set; pass at least one option".into());
            }
            save(&ctx, &update)
        }
        SettingsAction::Reset => save(&ctx, &full_update(&DEFAULT_SETTINGS)),
    }
}
