use chrono::Utc;
use clap::Subcommand;
use tomatask_core::CompletionStats;

use crate::common::{CliResult, Context};

const BAR_WIDTH: u32 = 30;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completions per day for the last seven days
    Week {
        /// Print JSON instead of a chart
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let ctx = Context::load()?;

    match action {
        StatsAction::Week { json } => {
            let stats = ctx.db.completion_stats(&ctx.identity(), Utc::now())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_chart(&stats));
            }
        }
    }
    Ok(())
}

/// One line per day, bars scaled to the busiest day.
fn render_chart(stats: &CompletionStats) -> String {
    let peak = stats
        .daily_counts
        .iter()
        .map(|d| d.count)
        .max()
        .unwrap_or(0)
        .max(1);
    let mut out = String::new();
    for day in &stats.daily_counts {
        let len = (day.count * BAR_WIDTH).div_ceil(peak) as usize;
        out.push_str(&format!(
            "{} {:<width$} {}\n",
            day.date.format("%a %m-%d"),
            "█".repeat(len),
            day.count,
            width = BAR_WIDTH as usize
        ));
    }
    out.push_str(&format!("Total completed: {}\n", stats.total_completed));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tomatask_core::DailyCount;

    #[test]
    fn chart_scales_to_peak_and_prints_total() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let daily_counts = (0..7)
            .map(|i| DailyCount {
                date: start + chrono::Duration::days(i),
                count: if i == 6 { 4 } else if i == 0 { 2 } else { 0 },
            })
            .collect();
        let chart = render_chart(&CompletionStats {
            daily_counts,
            total_completed: 9,
        });
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("Wed 03-04"));
        assert_eq!(lines[0].matches('█').count(), 15);
        assert_eq!(lines[6].matches('█').count(), 30);
        assert_eq!(lines[1].matches('█').count(), 0);
        assert_eq!(lines[7], "Total completed: 9");
    }
}
