//! Markers command: print the marker table.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::marker::Marker;

/// Execute markers command
pub fn print_markers() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for line in marker_lines() {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

/// One aligned line per marker: name, helper, payload.
fn marker_lines() -> Vec<String> {
    let width = Marker::ALL.iter().map(|m| m.name().len()).max().unwrap_or(0);
    Marker::ALL
        .iter()
        .map(|marker| {
            let name = format!("{:<width$}", marker.name());
            format!(
                "{}  {:<10}  {}",
                name.bold(),
                marker.helper().name(),
                marker.payload().dimmed()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_marker_listed() {
        owo_colors::set_override(false);
        let lines = marker_lines();
        assert_eq!(lines.len(), Marker::ALL.len());
        assert!(lines[0].starts_with("xpc-attr-if "));
        assert!(lines.iter().any(|l| l.contains("xpc-rich-text-wrap") && l.contains("rich-text")));
    }
}
