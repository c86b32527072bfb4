//! File extension to MIME type lookup for static assets.
//!
//! Lookups go to the `mime_guess` table first. A system `mime.types` file,
//! read once at startup, can add extensions that table does not know. The
//! registry is then shared read-only by every request through an
//! [`Arc`](std::sync::Arc).

use std::collections::HashMap;
use std::path::Path;

/// Fallback type for files whose extension is not registered.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Conventional location of the system MIME type table.
pub const SYSTEM_MIME_TYPES: &str = "/etc/mime.types";

/// Immutable extension-to-type table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeRegistry {
    extra: HashMap<String, String>,
}

impl MimeRegistry {
    /// Registry containing only the types `mime_guess` knows.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Built-in types extended with entries from a `mime.types` file.
    ///
    /// A missing or unreadable file is not an error: the problem is logged
    /// and the built-ins returned.
    pub fn load(mime_types: Option<&Path>) -> Self {
        let mut registry = Self::builtin();
        let Some(path) = mime_types else {
            return registry;
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let added = registry.extend_from_table(&contents);
                tracing::debug!(path = %path.display(), added, "Loaded MIME types");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "MIME types file not loaded");
            }
        }
        registry
    }

    /// Add entries from `mime.types` formatted text.
    ///
    /// Each line holds a type followed by its extensions; `#` starts a
    /// comment. Extensions already known, built in or from an earlier line,
    /// keep their type. Returns the number of extensions added.
    pub fn extend_from_table(&mut self, table: &str) -> usize {
        let mut added = 0_usize;
        for line in table.lines() {
            let line = line.split('#').next().unwrap_or_default();
            let mut fields = line.split_whitespace();
            let Some(mime) = fields.next() else {
                continue;
            };
            for ext in fields {
                let ext = ext.to_ascii_lowercase();
                if builtin_type(&ext).is_none() && !self.extra.contains_key(&ext) {
                    self.extra.insert(ext, mime.to_owned());
                    added = added.saturating_add(1);
                }
            }
        }
        added
    }

    /// MIME type for a file name, by its extension (case-insensitive).
    pub fn guess(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        builtin_type(&ext).or_else(|| self.extra.get(&ext).map(String::as_str))
    }

    /// MIME type for a file name, falling back to [`OCTET_STREAM`].
    pub fn content_type(&self, path: &Path) -> &str {
        self.guess(path).unwrap_or(OCTET_STREAM)
    }
}

fn builtin_type(ext: &str) -> Option<&'static str> {
    mime_guess::from_ext(ext).first_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_types() {
        let registry = MimeRegistry::builtin();
        assert_eq!(registry.guess(Path::new("style.css")), Some("text/css"));
        assert_eq!(registry.guess(Path::new("LOGO.PNG")), Some("image/png"));
        assert_eq!(registry.guess(Path::new("index.html")), Some("text/html"));
        assert!(
            registry
                .guess(Path::new("common.js"))
                .is_some_and(|mime| mime.ends_with("javascript"))
        );
    }

    #[test]
    fn unknown_extension_falls_back() {
        let registry = MimeRegistry::builtin();
        assert_eq!(registry.guess(Path::new("data.zzq9")), None);
        assert_eq!(registry.content_type(Path::new("data.zzq9")), OCTET_STREAM);
        assert_eq!(registry.content_type(Path::new("README")), OCTET_STREAM);
    }

    #[test]
    fn table_adds_unknown_extensions() {
        let mut registry = MimeRegistry::builtin();
        let added = registry.extend_from_table(
            "# comment line\n\
             application/x-maws-layout mawslay # trailing comment\n\
             application/x-maws-state mawssta mawsinp\n\
             application/x-empty\n",
        );
        assert_eq!(added, 3);
        assert_eq!(
            registry.guess(Path::new("pacman.mawslay")),
            Some("application/x-maws-layout")
        );
        assert_eq!(
            registry.guess(Path::new("PACMAN.MAWSINP")),
            Some("application/x-maws-state")
        );
    }

    #[test]
    fn builtins_win_over_table() {
        let mut registry = MimeRegistry::builtin();
        let added = registry.extend_from_table("application/x-stylesheet css\n");
        assert_eq!(added, 0);
        assert_eq!(registry.guess(Path::new("style.css")), Some("text/css"));
    }

    #[test]
    fn first_table_entry_wins() {
        let mut registry = MimeRegistry::builtin();
        registry.extend_from_table("application/x-first zzq9\napplication/x-second zzq9\n");
        assert_eq!(registry.guess(Path::new("a.zzq9")), Some("application/x-first"));
    }

    #[test]
    fn missing_table_file_keeps_builtins() {
        let registry = MimeRegistry::load(Some(Path::new("/nonexistent/mime.types")));
        assert_eq!(registry, MimeRegistry::builtin());
    }
}
