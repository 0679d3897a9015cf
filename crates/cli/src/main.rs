mod args;
mod commands;
mod render;

use std::process;

use clap::Parser;
use duck_curve_core::models::settings::Settings;
use duck_curve_core::models::view_state::first_of_month;
use duck_curve_core::{DuckCurveExplorer, NavigationOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::{parse_command, Command};

fn load_settings(opts: &args::CliOptions) -> Result<Settings, String> {
    let mut settings = match &opts.config {
        Some(path) => Settings::from_json_file(path).map_err(|e| e.to_string())?,
        None => Settings::default(),
    };
    settings.apply_env_overrides().map_err(|e| e.to_string())?;

    if let Some(mode) = opts.mode {
        settings.initial_mode = mode;
    }
    if let Some(date) = opts.date {
        settings.initial_date = date;
        settings.initial_month = first_of_month(date);
    }
    Ok(settings)
}

fn show(explorer: &DuckCurveExplorer, outcome: NavigationOutcome) {
    match outcome {
        NavigationOutcome::Applied => {
            if let Some(view) = explorer.view() {
                println!("{}", render::render_chart(view));
            }
        }
        NavigationOutcome::Stale => {}
        NavigationOutcome::Failed(e) => {
            eprintln!("could not load data ({e}); showing previous chart");
        }
    }
    println!(
        "{}",
        render::render_navigation(explorer.state(), explorer.bounds())
    );
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let opts = args::CliOptions::parse();

    let settings = match load_settings(&opts) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    info!(api = %settings.base_url(), mode = %settings.initial_mode, "starting explorer");

    let mut explorer = match DuckCurveExplorer::new(settings) {
        Ok(explorer) => explorer,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let outcome = explorer.refresh().await;
    show(&explorer, outcome);
    if opts.once {
        return;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("failed to read command: {e}");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Command::Navigate(transition)) => {
                let outcome = explorer.navigate(transition).await;
                show(&explorer, outcome);
            }
            Ok(Command::Refresh) => {
                let outcome = explorer.refresh().await;
                show(&explorer, outcome);
            }
            Ok(Command::Help) => println!("{}", args::command_help()),
            Ok(Command::Quit) => break,
            Err(e) => eprintln!("{e} (type 'help' for commands)"),
        }
    }
    info!("bye");
}
