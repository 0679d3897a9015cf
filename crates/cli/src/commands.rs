use chrono::NaiveDate;
use duck_curve_core::models::display_mode::DisplayMode;
use duck_curve_core::models::feed::Feed;
use duck_curve_core::models::view_state::ViewTransition;

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Navigate(ViewTransition),
    Refresh,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("");
    let arg = parts.next();

    let command = match (head, arg) {
        ("n", None) => Command::Navigate(ViewTransition::NextDay),
        ("p", None) => Command::Navigate(ViewTransition::PreviousDay),
        ("N", None) => Command::Navigate(ViewTransition::NextMonth),
        ("P", None) => Command::Navigate(ViewTransition::PreviousMonth),
        ("mode", Some(m)) => {
            let mode = m.parse::<DisplayMode>().map_err(|e| e.to_string())?;
            Command::Navigate(ViewTransition::ChangeDisplayMode(mode))
        }
        ("on" | "off", Some(f)) => {
            let feed = f.parse::<Feed>().map_err(|e| e.to_string())?;
            if !feed.is_component() {
                return Err(format!("'{feed}' is not a component"));
            }
            Command::Navigate(ViewTransition::SetComponentEnabled(feed, head == "on"))
        }
        ("jump" | "j", Some(d)) => {
            let date = NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| format!("\"{d}\" is not a valid YYYY-MM-DD date"))?;
            Command::Navigate(ViewTransition::JumpToDate(date))
        }
        ("r", None) => Command::Refresh,
        ("h" | "help" | "?", None) => Command::Help,
        ("q" | "quit", None) => Command::Quit,
        ("", None) => return Err("empty command".to_string()),
        _ => return Err(format!("unrecognized command: {}", line.trim())),
    };
    Ok(command)
}
