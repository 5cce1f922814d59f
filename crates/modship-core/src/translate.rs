//! Raw file bytes to module-body text.
//!
//! Hook priority: exact file path, then exact id, then file extension,
//! then the built-in defaults. Exactly one rule fires.

use crate::config::{Config, TranslateHook};
use crate::error::{Error, Result};
use std::path::Path;

/// Translate raw bytes into module-body source text.
///
/// Built-in defaults: `js` is decoded verbatim, `json` becomes an
/// export assignment of the parsed value, and any other extension is
/// exported as a single JSON string literal (binary-safe fallback).
pub fn translate(id: &str, location: &Path, bytes: &[u8], config: &Config) -> Result<String> {
    if let Some(hook) = config.translate_file.get(location) {
        return run_hook(hook, id, location, bytes, config);
    }
    if let Some(hook) = config.translate_id.get(id) {
        return run_hook(hook, id, location, bytes, config);
    }
    let ext = location
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if let Some(hook) = config.translate_ext.get(ext) {
        return run_hook(hook, id, location, bytes, config);
    }

    let text = String::from_utf8_lossy(bytes);
    Ok(match ext {
        "js" => text.into_owned(),
        "json" => format!("module.exports = {text}"),
        _ => format!("module.exports = {}", json_string(&text)),
    })
}

fn run_hook(
    hook: &TranslateHook,
    id: &str,
    location: &Path,
    bytes: &[u8],
    config: &Config,
) -> Result<String> {
    hook(id, location, bytes, config).map_err(|message| Error::Hook {
        hook: "translate",
        id: id.to_string(),
        message,
    })
}

/// Encode a string as a JSON string literal.
pub(crate) fn json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn config() -> Config {
        Config::new("/srv/app").normalize()
    }

    #[test]
    fn js_passes_through_verbatim() {
        let body = translate("a", Path::new("/srv/app/a.js"), b"var x = 1;", &config()).unwrap();
        assert_eq!(body, "var x = 1;");
    }

    #[test]
    fn json_becomes_export_assignment() {
        let body = translate(
            "conf",
            Path::new("/srv/app/conf.json"),
            b"{\"a\":1}",
            &config(),
        )
        .unwrap();
        assert_eq!(body, "module.exports = {\"a\":1}");
    }

    #[test]
    fn other_extensions_export_string_literal() {
        let body = translate(
            "tmpl",
            Path::new("/srv/app/tmpl.html"),
            b"<p>\"hi\"</p>\n",
            &config(),
        )
        .unwrap();
        assert_eq!(body, "module.exports = \"<p>\\\"hi\\\"</p>\\n\"");
    }

    #[test]
    fn file_hook_beats_id_and_extension_hooks() {
        let config = config()
            .translate_by_file(
                "/srv/app/a.js",
                Arc::new(|_, _, _, _| Ok("by file".to_string())),
            )
            .translate_by_id("a", Arc::new(|_, _, _, _| Ok("by id".to_string())))
            .translate_by_ext("js", Arc::new(|_, _, _, _| Ok("by ext".to_string())));

        let body = translate("a", Path::new("/srv/app/a.js"), b"", &config).unwrap();
        assert_eq!(body, "by file");
    }

    #[test]
    fn id_hook_beats_extension_hook() {
        let config = config()
            .translate_by_id("a", Arc::new(|_, _, _, _| Ok("by id".to_string())))
            .translate_by_ext("js", Arc::new(|_, _, _, _| Ok("by ext".to_string())));

        let body = translate("a", Path::new("/srv/app/a.js"), b"", &config).unwrap();
        assert_eq!(body, "by id");
    }

    #[test]
    fn hook_failure_is_attributed() {
        let config =
            config().translate_by_ext("js", Arc::new(|_, _, _, _| Err("boom".to_string())));
        let err = translate("a", Path::new("/srv/app/a.js"), b"", &config).unwrap_err();
        assert!(matches!(err, Error::Hook { hook: "translate", .. }));
    }

    #[test]
    fn json_string_escapes() {
        assert_eq!(json_string("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }
}
