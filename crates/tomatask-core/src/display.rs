//! Text rendering helpers shared by front ends.

use crate::timer::TimerSnapshot;

/// `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Filled and total dots for the long-break cadence.
///
/// Returns `None` when the cadence is 1 or less (every break is long, so
/// there is nothing to count towards).
pub fn session_dots(completed_sessions: u32, cadence: u32) -> Option<(u32, u32)> {
    if cadence <= 1 {
        return None;
    }
    Some((completed_sessions % cadence, cadence))
}

pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One status line, e.g. `24:59 [#---------] Work  ●○○○`.
pub fn status_line(snapshot: &TimerSnapshot) -> String {
    let mut line = format!(
        "{} {} {}",
        format_clock(snapshot.remaining_secs),
        progress_bar(snapshot.progress, 20),
        snapshot.mode.label()
    );
    if let Some((filled, total)) = session_dots(
        snapshot.completed_sessions,
        snapshot.settings.sessions_before_long_break,
    ) {
        line.push_str("  ");
        for i in 0..total {
            line.push(if i < filled { '●' } else { '○' });
        }
    }
    if !snapshot.running {
        line.push_str(if snapshot.progress > 0.0 {
            "  (paused)"
        } else {
            "  (ready)"
        });
    }
    line
}
