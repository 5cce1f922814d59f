//! Engine configuration.
//!
//! A sparse configuration is completed by [`Config::normalize`];
//! everything downstream assumes every field is populated. Hooks are
//! `Arc` closures so a normalized config clones cheaply and can be read
//! by any number of concurrent calls.

use crate::error::{Error, Result};
use regex_lite::Regex;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Compression hook: final payload text in, compressed text out.
pub type CompressHook = Arc<dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync>;

/// Translation hook: `(id, location, bytes, config)` to module-body text.
pub type TranslateHook =
    Arc<dyn Fn(&str, &Path, &[u8], &Config) -> std::result::Result<String, String> + Send + Sync>;

/// Id-map resolver function: module id to filesystem location.
pub type IdMapFn = Arc<dyn Fn(&str) -> PathBuf + Send + Sync>;

/// Predicate shape for [`Matcher`].
pub type PredicateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Override target for a mapped module id.
///
/// Mapped locations are trusted: they bypass the root boundary check
/// and the forbid list.
#[derive(Clone)]
pub enum MapTarget {
    /// Fixed filesystem location.
    Path(PathBuf),
    /// Location computed from the id.
    Fn(IdMapFn),
}

impl MapTarget {
    #[must_use]
    pub fn target(&self, id: &str) -> PathBuf {
        match self {
            Self::Path(p) => p.clone(),
            Self::Fn(f) => f(id),
        }
    }
}

impl fmt::Debug for MapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// One entry of the `forbid` or `nowrap` lists.
///
/// Both lists use the same three shapes and the same evaluation:
/// a string matches by prefix (a full id or path is the degenerate
/// exact match), a pattern by regex test, a predicate by truthy return.
#[derive(Clone)]
pub enum Matcher {
    Prefix(String),
    Pattern(Regex),
    Predicate(PredicateFn),
}

impl Matcher {
    /// First-match evaluation used by both the forbid and nowrap lists.
    #[must_use]
    pub fn matches(&self, subject: &str) -> bool {
        match self {
            Self::Prefix(prefix) => subject.starts_with(prefix.as_str()),
            Self::Pattern(pattern) => pattern.is_match(subject),
            Self::Predicate(test) => test(subject),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(p) => f.debug_tuple("Prefix").field(p).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone)]
pub struct Config {
    /// Base directory every non-mapped id resolves under.
    pub root: PathBuf,
    /// URL prefix the routing collaborator strips before handing ids in.
    pub url_prefix: String,
    /// `Cache-Control: public, max-age=<n>` value for the routing layer.
    pub max_age: u32,
    /// Optional compression pass applied to final payload text.
    pub compress: Option<CompressHook>,
    /// Whether the routing layer should advertise bundle support.
    pub bundles: bool,
    /// Module id overrides, exempt from the access boundary.
    pub id_map: HashMap<String, MapTarget>,
    /// Translation hooks keyed by exact resolved file path.
    pub translate_file: HashMap<PathBuf, TranslateHook>,
    /// Translation hooks keyed by exact module id.
    pub translate_id: HashMap<String, TranslateHook>,
    /// Translation hooks keyed by trailing file extension.
    pub translate_ext: HashMap<String, TranslateHook>,
    /// Access rules evaluated against resolved paths, first match wins.
    pub forbid: Vec<Matcher>,
    /// Ids emitted without loader boilerplate, same shapes as `forbid`.
    pub nowrap: Vec<Matcher>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl Config {
    /// Create a configuration with built-in defaults rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url_prefix: "/module/".to_string(),
            max_age: 0,
            compress: None,
            bundles: false,
            id_map: HashMap::new(),
            translate_file: HashMap::new(),
            translate_id: HashMap::new(),
            translate_ext: HashMap::new(),
            forbid: Vec::new(),
            nowrap: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, seconds: u32) -> Self {
        self.max_age = seconds;
        self
    }

    #[must_use]
    pub fn with_compress(mut self, hook: CompressHook) -> Self {
        self.compress = Some(hook);
        self
    }

    #[must_use]
    pub fn with_bundles(mut self, bundles: bool) -> Self {
        self.bundles = bundles;
        self
    }

    #[must_use]
    pub fn map_id(mut self, id: impl Into<String>, target: MapTarget) -> Self {
        self.id_map.insert(id.into(), target);
        self
    }

    #[must_use]
    pub fn translate_by_file(mut self, path: impl Into<PathBuf>, hook: TranslateHook) -> Self {
        self.translate_file.insert(path.into(), hook);
        self
    }

    #[must_use]
    pub fn translate_by_id(mut self, id: impl Into<String>, hook: TranslateHook) -> Self {
        self.translate_id.insert(id.into(), hook);
        self
    }

    #[must_use]
    pub fn translate_by_ext(mut self, ext: impl Into<String>, hook: TranslateHook) -> Self {
        self.translate_ext.insert(ext.into(), hook);
        self
    }

    #[must_use]
    pub fn forbid(mut self, rule: Matcher) -> Self {
        self.forbid.push(rule);
        self
    }

    /// Forbid by regex pattern, failing with a `Hook` error on an
    /// invalid expression.
    pub fn forbid_pattern(self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| Error::Hook {
            hook: "forbid",
            id: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.forbid(Matcher::Pattern(re)))
    }

    #[must_use]
    pub fn nowrap(mut self, rule: Matcher) -> Self {
        self.nowrap.push(rule);
        self
    }

    /// Complete the configuration: anchor `forbid` prefix entries under
    /// `root` as absolute paths. Idempotent, so normalizing an already
    /// normalized configuration is a no-op.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        let root = self.root.clone();
        for rule in &mut self.forbid {
            if let Matcher::Prefix(prefix) = rule {
                let p = Path::new(prefix.as_str());
                if p.is_relative() {
                    *prefix = root.join(p).to_string_lossy().into_owned();
                }
            }
        }
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("root", &self.root)
            .field("url_prefix", &self.url_prefix)
            .field("max_age", &self.max_age)
            .field("compress", &self.compress.is_some())
            .field("bundles", &self.bundles)
            .field("id_map", &self.id_map)
            .field("forbid", &self.forbid)
            .field("nowrap", &self.nowrap)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = Config::new("/srv/app").normalize();
        assert_eq!(config.url_prefix, "/module/");
        assert_eq!(config.max_age, 0);
        assert!(!config.bundles);
        assert!(config.compress.is_none());
        assert!(config.forbid.is_empty());
    }

    #[test]
    fn normalize_anchors_relative_forbid_prefixes() {
        let config = Config::new("/srv/app")
            .forbid(Matcher::Prefix("private".to_string()))
            .normalize();
        match &config.forbid[0] {
            Matcher::Prefix(p) => assert_eq!(p, "/srv/app/private"),
            other => panic!("unexpected matcher: {other:?}"),
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = Config::new("/srv/app")
            .forbid(Matcher::Prefix("private".to_string()))
            .normalize();
        let twice = once.clone().normalize();
        match (&once.forbid[0], &twice.forbid[0]) {
            (Matcher::Prefix(a), Matcher::Prefix(b)) => assert_eq!(a, b),
            _ => panic!("prefix matcher expected"),
        }
    }

    #[test]
    fn matcher_shapes_agree() {
        let prefix = Matcher::Prefix("/srv/app/private".to_string());
        let pattern = Matcher::Pattern(Regex::new("^/srv/app/private").unwrap());
        let predicate =
            Matcher::Predicate(Arc::new(|s: &str| s.starts_with("/srv/app/private")));

        for subject in ["/srv/app/private/key.js", "/srv/app/public/x.js"] {
            assert_eq!(prefix.matches(subject), pattern.matches(subject));
            assert_eq!(prefix.matches(subject), predicate.matches(subject));
        }
    }
}
