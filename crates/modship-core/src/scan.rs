//! Static dependency discovery.
//!
//! Scans module-body text for `require("...")` call forms and computes
//! transitive closures over them. This is a textual scan, not a parser:
//! computed or conditional dependency expressions are invisible to it,
//! and string contents anywhere in the text (including comments) are
//! scanned. That boundary is deliberate; callers depend on it.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::resolve::resolve_id;
use crate::translate::translate;
use std::collections::HashSet;
use std::io::ErrorKind;
use tokio::fs;
use tracing::{debug, trace};

/// Scan source text for `require` calls whose sole argument is a quoted
/// literal.
///
/// Returns the literals in first-appearance order, deduplicated.
#[must_use]
pub fn scan_requires(source: &str) -> Vec<String> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if matches_keyword(&chars, i, "require") {
            if let Some((spec, end)) = scan_require_call(&chars, i + 7) {
                if !spec.is_empty() && seen.insert(spec.clone()) {
                    results.push(spec);
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }

    results
}

/// Check if chars at position match a keyword (with word boundary).
fn matches_keyword(chars: &[char], pos: usize, keyword: &str) -> bool {
    let kw: Vec<char> = keyword.chars().collect();
    let len = kw.len();

    if pos + len > chars.len() {
        return false;
    }
    if pos > 0 && (chars[pos - 1].is_alphanumeric() || chars[pos - 1] == '_') {
        return false;
    }
    for (j, &c) in kw.iter().enumerate() {
        if chars[pos + j] != c {
            return false;
        }
    }
    if pos + len < chars.len() && (chars[pos + len].is_alphanumeric() || chars[pos + len] == '_') {
        return false;
    }
    true
}

/// Scan a `("...")` call tail starting just past the keyword.
/// Returns the quoted literal and the position past the closing paren.
fn scan_require_call(chars: &[char], start: usize) -> Option<(String, usize)> {
    let len = chars.len();
    let mut i = start;

    while i < len && chars[i].is_whitespace() {
        i += 1;
    }
    if i >= len || chars[i] != '(' {
        return None;
    }
    i += 1;
    while i < len && chars[i].is_whitespace() {
        i += 1;
    }

    if i >= len || (chars[i] != '"' && chars[i] != '\'') {
        return None;
    }
    let quote = chars[i];
    i += 1;
    let spec_start = i;
    while i < len && chars[i] != quote {
        if chars[i] == '\n' {
            return None;
        }
        i += 1;
    }
    if i >= len {
        return None;
    }
    let spec: String = chars[spec_start..i].iter().collect();
    i += 1;

    while i < len && chars[i].is_whitespace() {
        i += 1;
    }
    if i < len && chars[i] == ')' {
        return Some((spec, i + 1));
    }
    None
}

/// Resolve a discovered dependency literal against the id it was found
/// in.
///
/// A trailing `.js` is stripped first. A leading `.` segment anchors
/// the literal in the current id's directory; each `..` pops one
/// trailing segment, clamping at the root when nothing is left to pop.
/// Non-relative literals are used as-is.
#[must_use]
pub fn resolve_relative(spec: &str, base: &str) -> String {
    let spec = spec.strip_suffix(".js").unwrap_or(spec);
    let joined = if spec.starts_with('.') {
        match base.rfind('/') {
            Some(i) => format!("{}/{spec}", &base[..i]),
            None => spec.to_string(),
        }
    } else {
        spec.to_string()
    };

    let mut terms: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            ".." => {
                terms.pop();
            }
            "." => {}
            p => terms.push(p),
        }
    }
    terms.join("/")
}

/// Compute the transitive closure of statically discoverable
/// dependencies for the given seed ids.
///
/// The result contains the seeds plus everything reachable, in
/// first-discovery order, unique. Absent files are pruned from the
/// result without error (a stale or optional reference must not abort
/// the walk); any other resolution, read, or translation failure aborts
/// the scan.
///
/// The worklist drains strictly one item at a time, so discovery order
/// is deterministic for a fixed filesystem snapshot.
pub async fn dependencies(seeds: &[String], config: &Config) -> Result<Vec<String>> {
    let mut list: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = Vec::new();

    for seed in seeds {
        if seen.insert(seed.clone()) {
            list.push(seed.clone());
            stack.push(seed.clone());
        }
    }

    while let Some(id) = stack.pop() {
        let location = resolve_id(&id, config).await?;
        let bytes = match fs::read(&location.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(id = %id, "pruning absent module from scan");
                list.retain(|known| known != &id);
                continue;
            }
            Err(e) => {
                return Err(Error::Read {
                    path: location.path,
                    source: e,
                })
            }
        };
        let source = translate(&id, &location.path, &bytes, config)?;

        for raw in scan_requires(&source) {
            let resolved = resolve_relative(&raw, &id);
            if seen.insert(resolved.clone()) {
                list.push(resolved.clone());
                stack.push(resolved);
            }
        }
    }

    debug!(seeds = seeds.len(), modules = list.len(), "dependency scan complete");
    Ok(list)
}
