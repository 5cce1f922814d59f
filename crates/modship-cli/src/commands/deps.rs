//! `modship deps` command implementation.
//!
//! Prints the dependency manifest for a seed id: a JSON array of
//! module ids in first-discovery order.

use miette::{IntoDiagnostic, Result};
use modship_core::{dependencies, Config};
use serde::Serialize;

/// JSON output for the deps command (`--json`; the default output is
/// the bare manifest array).
#[derive(Serialize)]
struct DepsResultJson {
    ok: bool,
    id: String,
    count: usize,
    dependencies: Vec<String>,
}

pub async fn run(id: &str, config: &Config, json: bool) -> Result<()> {
    let list = dependencies(&[id.to_string()], config)
        .await
        .into_diagnostic()?;

    if json {
        let result = DepsResultJson {
            ok: true,
            id: id.to_string(),
            count: list.len(),
            dependencies: list,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("{}", serde_json::to_string(&list).into_diagnostic()?);
    }

    Ok(())
}
