//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use duck_curve_core::models::display_mode::DisplayMode;

#[derive(Debug, Parser)]
#[command(name = "duck-curve")]
#[command(version, about = "Net-load and ramp-rate explorer for half-hourly load curves")]
#[command(
    after_help = "Commands once running:\n  \
    n / p             next / previous day\n  \
    N / P             next / previous month\n  \
    jump <date>       go to a day (YYYY-MM-DD)\n  \
    mode <mode>       change display mode\n  \
    on <feed>         keep a component in the total (solar, wh, car, hvac)\n  \
    off <feed>        subtract a component from the total\n  \
    r                 refresh\n  \
    q                 quit"
)]
pub struct CliOptions {
    /// Load settings from a JSON file (falls back to $DUCK_CURVE_CONFIG)
    #[arg(long, value_name = "PATH", env = "DUCK_CURVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial display mode (weekdays, weekends, all, single)
    #[arg(long)]
    pub mode: Option<DisplayMode>,

    /// Initial day, YYYY-MM-DD; also selects its month
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Print the initial chart and exit instead of reading commands
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

/// Help text for the interactive prompt.
pub fn command_help() -> &'static str {
    "commands: n/p day, N/P month, jump <date>, mode <mode>, on|off <feed>, r refresh, q quit"
}
