//! Incremental consumption of the request path.
//!
//! The dispatcher and the handlers each take one leading segment off the
//! path. Whatever is left afterwards tells a handler whether the client
//! asked for a sub-path of a resource that has none.
//!
//! Shifting follows the usual gateway convention: on every shift, empty and
//! `.` segments anywhere between the first and the last segment are
//! dropped, so `/a//b` and `/a/./b` read the same as `/a/b`. A trailing
//! slash leaves a remaining path of `/`.

use percent_encoding::percent_decode_str;

/// Cursor over a percent-decoded request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCursor {
    consumed: String,
    remaining: String,
}

impl PathCursor {
    /// Create a cursor over a raw (still percent-encoded) request path.
    pub fn new(raw_path: &str) -> Self {
        Self {
            consumed: String::new(),
            remaining: percent_decode_str(raw_path).decode_utf8_lossy().into_owned(),
        }
    }

    /// Take the next segment off the remaining path.
    ///
    /// Returns `None` when the remaining path is empty. An empty string is
    /// returned for a bare trailing `/` or a final `.`.
    pub fn shift(&mut self) -> Option<String> {
        let rest = self.remaining.strip_prefix('/')?;

        let mut segments: Vec<&str> = rest.split('/').collect();
        let last = segments.pop().unwrap_or_default();
        segments.retain(|segment| !segment.is_empty() && *segment != ".");
        segments.push(last);

        let mut segments = segments.into_iter();
        let name = match segments.next() {
            Some(".") | None => String::new(),
            Some(name) => name.to_owned(),
        };
        let tail: Vec<&str> = segments.collect();
        let remaining = if tail.is_empty() {
            String::new()
        } else {
            format!("/{}", tail.join("/"))
        };

        self.consumed.push('/');
        self.consumed.push_str(&name);
        self.remaining = remaining;
        Some(name)
    }

    /// Path segments consumed so far, each preceded by `/`.
    pub fn consumed(&self) -> &str {
        &self.consumed
    }

    /// The part of the path not yet consumed, starting with `/` if
    /// non-empty.
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    /// Whether any path remains after the consumed segments.
    pub fn has_remaining(&self) -> bool {
        !self.remaining.is_empty()
    }
}
