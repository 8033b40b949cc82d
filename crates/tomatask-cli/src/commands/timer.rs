//! Interactive pomodoro timer.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tomatask_core::display::{format_clock, status_line};
use tomatask_core::{
    duration_secs, Event, PomodoroEngine, PomodoroMode, PomodoroSession, SessionCommand,
    TimerSnapshot,
};

use super::alarm::player_for;
use crate::common::{CliResult, Context};

/// How often a running timer re-reads settings saved by other processes.
const SETTINGS_POLL: Duration = Duration::from_secs(5);

const HELP: &str = "commands: s=start p=pause r=reset k=skip a=alarm q=quit (enter toggles)";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive timer session
    Run {
        /// Start the first work interval immediately
        #[arg(long)]
        auto_start: bool,
    },
    /// Print the interval durations in seconds as JSON
    Durations,
}

enum Input {
    Command(SessionCommand),
    Toggle,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Input::Toggle,
        "s" | "start" => Input::Command(SessionCommand::Start),
        "p" | "pause" => Input::Command(SessionCommand::Pause),
        "r" | "reset" => Input::Command(SessionCommand::Reset),
        "k" | "skip" => Input::Command(SessionCommand::Skip),
        "a" | "alarm" => Input::Command(SessionCommand::PlayAlarm),
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Help,
    }
}

fn redraw(snapshot: &TimerSnapshot) {
    print!("\r\x1b[2K{}", status_line(snapshot));
    let _ = std::io::stdout().flush();
}

fn announce(event: &Event) {
    match event {
        Event::TimerCompleted {
            finished,
            next,
            next_duration_secs,
            ..
        } => println!(
            "\r\x1b[2K{} finished. Next: {} ({})",
            finished.label(),
            next.label(),
            format_clock(*next_duration_secs)
        ),
        Event::TimerSkipped { from, to, .. } => {
            println!("\r\x1b[2KSkipped {}. Next: {}", from.label(), to.label())
        }
        _ => {}
    }
}

pub fn run(action: TimerAction) -> CliResult {
    let ctx = Context::load()?;

    match action {
        TimerAction::Durations => {
            let settings = ctx.effective_settings();
            let durations = serde_json::json!({
                "work": duration_secs(PomodoroMode::Work, &settings),
                "short_break": duration_secs(PomodoroMode::ShortBreak, &settings),
                "long_break": duration_secs(PomodoroMode::LongBreak, &settings),
            });
            println!("{}", serde_json::to_string_pretty(&durations)?);
            Ok(())
        }
        TimerAction::Run { auto_start } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(interactive(&ctx, auto_start));
            // The stdin reader blocks in the background; don't wait for it.
            runtime.shutdown_background();
            result
        }
    }
}

async fn interactive(ctx: &Context, auto_start: bool) -> CliResult {
    let identity = ctx.identity();
    let resolver = ctx.resolver();
    let engine = PomodoroEngine::new(resolver.effective(&identity));
    let (handle, mut events, join) = PomodoroSession::spawn(engine, player_for(&ctx.config));
    let mut snapshots = handle.watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut settings_poll = tokio::time::interval(SETTINGS_POLL);
    settings_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    println!("{HELP}");
    if auto_start {
        handle.start().await?;
    }
    redraw(&handle.snapshot());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let cmd = match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Input::Toggle if handle.snapshot().running => SessionCommand::Pause,
                    Input::Toggle => SessionCommand::Start,
                    Input::Command(cmd) => cmd,
                };
                handle.send(cmd).await?;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                redraw(&snapshot);
            }
            Some(event) = events.recv() => announce(&event),
            _ = settings_poll.tick() => {
                let latest = resolver.effective(&identity);
                if latest != handle.snapshot().settings {
                    tracing::info!(?latest, "Settings changed, applying to running session");
                    handle.apply_settings(latest).await?;
                }
            }
        }
    }

    println!();
    handle.shutdown().await?;
    let engine = join.await?;
    tracing::debug!(
        mode = ?engine.mode(),
        completed_sessions = engine.completed_sessions(),
        "Timer session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_commands() {
        assert!(matches!(
            parse_input("s"),
            Input::Command(SessionCommand::Start)
        ));
        assert!(matches!(
            parse_input(" Skip "),
            Input::Command(SessionCommand::Skip)
        ));
        assert!(matches!(
            parse_input("a"),
            Input::Command(SessionCommand::PlayAlarm)
        ));
        assert!(matches!(parse_input(""), Input::Toggle));
        assert!(matches!(parse_input("q"), Input::Quit));
        assert!(matches!(parse_input("??"), Input::Help));
    }
}
