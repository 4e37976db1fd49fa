//! JSON reporter
//!
//! Outputs the full comparison as pretty-printed JSON for machine
//! consumption or piping to jq.

use crate::compare::Comparison;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    user: &'a crate::features::FeatureVector,
    rows: Vec<crate::compare::FeatureRow>,
}

/// Render a comparison as JSON
pub fn render(comparison: &Comparison) -> Result<String> {
    let report = JsonReport {
        user: &comparison.user,
        rows: comparison.rows(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
