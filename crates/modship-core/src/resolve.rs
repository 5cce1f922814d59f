//! Module id resolution.
//!
//! Maps a hierarchical module id to a filesystem location under the
//! configured root, enforcing the access boundary before any probe
//! touches the disk.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::paths;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::trace;

/// Id of the in-browser loader runtime. Never wrapped, and allowed to
/// live outside the served tree for bootstrapping.
pub const LOADER_ID: &str = "require";

/// Id of the bundle manifest. Requests for it produce the bundle map
/// instead of a wrapped module.
pub const BUNDLE_MANIFEST_ID: &str = "bundles.json";

/// What the existence probe found at a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Missing,
}

/// A module id resolved to an absolute location.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// Resolve a module id to a filesystem location.
///
/// Mapped ids are used verbatim and trusted. Everything else joins onto
/// the root and must stay inside it, except the two infrastructure ids
/// ([`LOADER_ID`], [`BUNDLE_MANIFEST_ID`]) needed for bootstrapping.
/// The forbid list is evaluated against the normalized path in order,
/// first match failing with [`Error::Forbidden`].
///
/// If the exact path is absent, `<path>.js` is probed and used when
/// present; a directory prefers `<path>/index.js` when present.
pub async fn resolve_id(id: &str, config: &Config) -> Result<ResolvedLocation> {
    let mapped = config.id_map.get(id).map(|t| t.target(id));
    let trusted = mapped.is_some() || id == LOADER_ID || id == BUNDLE_MANIFEST_ID;
    // Fold any dot segments out of the joined path before the checks
    // below; forbid rules must see the path the OS would resolve.
    let path = match mapped {
        Some(p) => p,
        None => paths::normalize(&config.root.join(id)),
    };

    if !trusted {
        if !paths::is_within(&config.root, &path) {
            return Err(Error::Forbidden {
                id: id.to_string(),
                path,
            });
        }
        let subject = path.to_string_lossy();
        if config.forbid.iter().any(|rule| rule.matches(&subject)) {
            return Err(Error::Forbidden {
                id: id.to_string(),
                path,
            });
        }
    }

    probe(path).await
}

/// Existence/kind probe with the `.js` and `index.js` fallbacks.
async fn probe(path: PathBuf) -> Result<ResolvedLocation> {
    match fs::metadata(&path).await {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut with_ext = path.clone().into_os_string();
            with_ext.push(".js");
            let with_ext = PathBuf::from(with_ext);
            if exists(&with_ext).await? {
                trace!(path = %with_ext.display(), "resolved via .js probe");
                Ok(ResolvedLocation {
                    path: with_ext,
                    kind: FileKind::File,
                })
            } else {
                Ok(ResolvedLocation {
                    path,
                    kind: FileKind::Missing,
                })
            }
        }
        Err(e) => Err(Error::Read { path, source: e }),
        Ok(meta) if meta.is_dir() => {
            let index = path.join("index.js");
            if exists(&index).await? {
                trace!(path = %index.display(), "resolved via index.js probe");
                Ok(ResolvedLocation {
                    path: index,
                    kind: FileKind::File,
                })
            } else {
                Ok(ResolvedLocation {
                    path,
                    kind: FileKind::Directory,
                })
            }
        }
        Ok(_) => Ok(ResolvedLocation {
            path,
            kind: FileKind::File,
        }),
    }
}

async fn exists(path: &std::path::Path) -> Result<bool> {
    fs::try_exists(path).await.map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}
