#![deny(clippy::all, clippy::pedantic)]

use penman::application::listing::PaginationControls;
use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// One-line rendering of the page controls, e.g. `< ... 4 5 [6] 7 8 ... >`.
/// Disabled previous/next controls are shown in parentheses.
pub fn render_controls(controls: &PaginationControls) -> String {
    let mut parts = Vec::with_capacity(controls.pages.len() + 4);
    parts.push(if controls.previous.enabled { "<" } else { "(<)" }.to_string());
    if controls.leading_ellipsis {
        parts.push("...".to_string());
    }
    for link in &controls.pages {
        parts.push(if link.current {
            format!("[{}]", link.number)
        } else {
            link.number.to_string()
        });
    }
    if controls.trailing_ellipsis {
        parts.push("...".to_string());
    }
    parts.push(if controls.next.enabled { ">" } else { "(>)" }.to_string());
    parts.join(" ")
}
