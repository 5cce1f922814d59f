//! `modship aggregate` command implementation.
//!
//! Concatenates several wrapped modules into one payload with the
//! bootstrap prologue.

use miette::{IntoDiagnostic, Result};
use modship_core::{aggregate, Config};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for the aggregate command.
#[derive(Serialize)]
struct AggregateResultJson {
    ok: bool,
    ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outfile: Option<String>,
    size_bytes: usize,
    last_modified: String,
    duration_ms: u64,
}

pub async fn run(ids: &[String], out: Option<PathBuf>, config: &Config, json: bool) -> Result<()> {
    let start = Instant::now();
    let payload = aggregate(ids, config).await.into_diagnostic()?;

    if let Some(path) = &out {
        tokio::fs::write(path, &payload.content)
            .await
            .into_diagnostic()?;
    }

    if json {
        let result = AggregateResultJson {
            ok: true,
            ids: ids.to_vec(),
            outfile: out.as_ref().map(|p| p.display().to_string()),
            size_bytes: payload.content.len(),
            last_modified: super::http_date(payload.modified),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else if out.is_none() {
        print!("{}", payload.content);
    }

    Ok(())
}
