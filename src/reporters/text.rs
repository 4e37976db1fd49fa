//! Text (terminal) reporter with colors and formatting

use crate::compare::Comparison;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";

/// Render a comparison as a formatted terminal table: one row per
/// feature, the user value first, then every genre baseline.
pub fn render(comparison: &Comparison) -> Result<String> {
    let mut out = String::new();
    let genres: Vec<&String> = comparison.genres.keys().collect();

    out.push_str(&format!("\n{BOLD}Stylometer Comparison{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));

    // Header row
    out.push_str(&format!("{:<28}{:>12}", "feature", "you"));
    for genre in &genres {
        out.push_str(&format!("{:>12}", truncate(genre, 11)));
    }
    out.push('\n');

    for row in comparison.rows() {
        out.push_str(&format!(
            "{:<28}{CYAN}{:>12.3}{RESET}",
            row.feature, row.user
        ));
        if row.baselines.is_empty() {
            out.push_str(&format!("{DIM}{:>12}{RESET}", "-").repeat(genres.len()));
        } else {
            for (_, value) in &row.baselines {
                out.push_str(&format!("{:>12.3}", value));
            }
        }
        out.push('\n');
    }

    Ok(out)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}…")
    }
}
