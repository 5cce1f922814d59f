//! Payload emission.
//!
//! Wraps translated module bodies in loader registration boilerplate
//! and concatenates them into aggregate payloads.

use crate::bundles::{parse_declarations, plan_bundles, plans_to_json};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resolve::{resolve_id, BUNDLE_MANIFEST_ID, LOADER_ID};
use crate::translate::{json_string, translate};
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;

/// Bootstrap prologue for aggregate payloads: lazily defines the
/// registration primitive so an aggregate can load ahead of the loader
/// runtime. Fixed template, selected by a single condition in
/// [`aggregate`].
const BOOTSTRAP: &str = "\
if (!this.define) { this.define = (function() {\n\
\tfunction define(id, fn) { defs[id] = fn; }\n\
\tvar defs = define.defs = {};\n\
\treturn define;\n\
}()); }\n\n";

/// A single browser-deliverable unit.
#[derive(Debug, Clone)]
pub struct WrappedModule {
    /// Final payload text.
    pub content: String,
    /// Modification time of the backing file (maximum across files for
    /// aggregates), for `Last-Modified` headers.
    pub modified: SystemTime,
}

/// Produce the deliverable for one module id.
///
/// The translated body is wrapped as a `define` registration call
/// naming the id and a factory taking the three conventional loader
/// bindings. The loader runtime id is emitted raw, and ids matching a
/// `nowrap` rule are emitted translated but unwrapped. A request for
/// the bundle-manifest id yields the bundle map payload instead. The
/// compression hook, when configured, runs last.
pub async fn wrap_module(id: &str, config: &Config) -> Result<WrappedModule> {
    let id = id.strip_suffix(".js").unwrap_or(id);
    let location = resolve_id(id, config).await?;
    let modified = stat_modified(&location.path).await?;
    let bytes = read(&location.path).await?;

    if id == BUNDLE_MANIFEST_ID {
        let declarations = parse_declarations(&bytes)?;
        let plans = plan_bundles(&declarations, config).await?;
        let content = format!("define.bundle.map({});\n", plans_to_json(&plans));
        debug!(bundles = plans.len(), "emitted bundle map");
        return Ok(WrappedModule { content, modified });
    }

    let mut content = if id == LOADER_ID {
        // The loader runtime bootstraps `define` itself; ship it raw.
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        let body = translate(id, &location.path, &bytes, config)?;
        if config.nowrap.iter().any(|rule| rule.matches(id)) {
            body
        } else {
            format!(
                "define({},function(require,exports,module){{{body}\n}});\n",
                json_string(id)
            )
        }
    };

    if let Some(compress) = &config.compress {
        content = compress(&content).map_err(|message| Error::Hook {
            hook: "compress",
            id: id.to_string(),
            message,
        })?;
    }

    Ok(WrappedModule { content, modified })
}

/// Concatenate several wrapped modules into one payload.
///
/// Each module is wrapped individually with compression disabled; a
/// configured compression hook runs once over the concatenated text
/// instead, which is cheaper and compresses across module boundaries.
/// The bootstrap prologue is prepended unless the sequence starts with
/// the loader runtime itself. The reported timestamp is the maximum
/// modification time across all included modules.
pub async fn aggregate(ids: &[String], config: &Config) -> Result<WrappedModule> {
    let inner = Config {
        compress: None,
        ..config.clone()
    };

    let first = ids.first().map(|id| id.strip_suffix(".js").unwrap_or(id));
    let mut out = if first == Some(LOADER_ID) {
        String::new()
    } else {
        BOOTSTRAP.to_string()
    };
    let mut modified = SystemTime::UNIX_EPOCH;

    for id in ids {
        let wrapped = wrap_module(id, &inner).await?;
        out.push_str(&wrapped.content);
        if wrapped.modified > modified {
            modified = wrapped.modified;
        }
    }

    if let Some(compress) = &config.compress {
        out = compress(&out).map_err(|message| Error::Hook {
            hook: "compress",
            id: ids.join(","),
            message,
        })?;
    }

    Ok(WrappedModule {
        content: out,
        modified,
    })
}

async fn stat_modified(path: &Path) -> Result<SystemTime> {
    let meta = fs::metadata(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    meta.modified().map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

async fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
