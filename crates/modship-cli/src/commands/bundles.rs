//! `modship bundles` command implementation.
//!
//! Reads a bundle declaration file and prints either the planned
//! bundles (`--json`) or the `define.bundle.map(...)` payload the
//! loader runtime consumes.

use miette::{IntoDiagnostic, Result};
use modship_core::{parse_declarations, plan_bundles, plans_to_json, Config};
use serde_json::json;
use std::path::Path;

pub async fn run(file: &Path, config: &Config, json: bool) -> Result<()> {
    let bytes = tokio::fs::read(file).await.into_diagnostic()?;
    let declarations = parse_declarations(&bytes).into_diagnostic()?;
    let plans = plan_bundles(&declarations, config).await.into_diagnostic()?;
    let value = plans_to_json(&plans);

    if json {
        let result = json!({ "ok": true, "bundles": value });
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("define.bundle.map({value});");
    }

    Ok(())
}
