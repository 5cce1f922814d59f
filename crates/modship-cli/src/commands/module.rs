//! `modship module` command implementation.
//!
//! Prints one module wrapped in loader registration boilerplate.

use miette::{IntoDiagnostic, Result};
use modship_core::{wrap_module, Config};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for the module command.
#[derive(Serialize)]
struct ModuleResultJson {
    ok: bool,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    outfile: Option<String>,
    size_bytes: usize,
    last_modified: String,
    cache_control: String,
    duration_ms: u64,
}

pub async fn run(id: &str, out: Option<PathBuf>, config: &Config, json: bool) -> Result<()> {
    let start = Instant::now();
    let wrapped = wrap_module(id, config).await.into_diagnostic()?;

    if let Some(path) = &out {
        tokio::fs::write(path, &wrapped.content)
            .await
            .into_diagnostic()?;
    }

    if json {
        let result = ModuleResultJson {
            ok: true,
            id: id.to_string(),
            outfile: out.as_ref().map(|p| p.display().to_string()),
            size_bytes: wrapped.content.len(),
            last_modified: super::http_date(wrapped.modified),
            cache_control: format!("public, max-age={}", config.max_age),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else if out.is_none() {
        print!("{}", wrapped.content);
    }

    Ok(())
}
