//! Absolute link construction relative to the application's base URI.
//!
//! Every path segment is percent-encoded before it is appended, so short
//! names and file names containing `?`, `#` or `%` still produce working
//! links. The results are plain URIs; callers HTML-escape them when placing
//! them inside an attribute.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::escape::escape_html;

/// Characters that must be encoded inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/');

/// Builds links to the application's pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    /// Create a builder for the given base URI.
    ///
    /// A trailing `/` is added when missing so joined paths land below the
    /// base rather than replacing its last segment.
    pub fn new(base: &str) -> Self {
        let mut base = base.to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// The base URI, always ending in `/`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Link to the static assets directory.
    pub fn assets(&self) -> String {
        self.join(["static"])
    }

    /// Link to a machine detail page.
    pub fn machine(&self, shortname: &str) -> String {
        self.join(["machine", shortname])
    }

    /// Link to a source file page or listing.
    ///
    /// The path is split on `/` and each component encoded separately.
    pub fn sourcefile(&self, path: &str) -> String {
        self.join(std::iter::once("sourcefile").chain(path.split('/')))
    }

    /// Render a source file path as HTML with each directory linked.
    ///
    /// The final component is linked too when `link_final` is set;
    /// otherwise it is emitted as escaped text.
    pub fn linked_title(&self, filename: &str, link_final: bool) -> String {
        let mut parts: Vec<&str> = filename.split('/').collect();
        let last = parts.pop().unwrap_or_default();

        let mut prefix = String::new();
        let mut title = String::new();
        for part in parts {
            prefix.push_str(part);
            title.push_str(&format!(
                r#"<a href="{}">{}</a>/"#,
                escape_html(&self.sourcefile(&prefix)),
                escape_html(part)
            ));
            prefix.push('/');
        }

        if link_final {
            prefix.push_str(last);
            title.push_str(&format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(&self.sourcefile(&prefix)),
                escape_html(last)
            ));
        } else {
            title.push_str(&escape_html(last));
        }
        title
    }

    fn join<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> String {
        let mut link = self.base.clone();
        for (index, segment) in segments.into_iter().enumerate() {
            if index > 0 {
                link.push('/');
            }
            link.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> LinkBuilder {
        LinkBuilder::new("http://localhost:8080")
    }

    #[test]
    fn base_gets_trailing_slash() {
        assert_eq!(links().base(), "http://localhost:8080/");
        assert_eq!(LinkBuilder::new("http://h/maws/").base(), "http://h/maws/");
    }

    #[test]
    fn machine_and_asset_links() {
        assert_eq!(links().machine("pacman"), "http://localhost:8080/machine/pacman");
        assert_eq!(links().assets(), "http://localhost:8080/static");
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(
            links().machine("a?b#c/d"),
            "http://localhost:8080/machine/a%3Fb%23c%2Fd"
        );
    }

    #[test]
    fn sourcefile_keeps_directory_separators() {
        assert_eq!(
            links().sourcefile("pacman/pacman.cpp"),
            "http://localhost:8080/sourcefile/pacman/pacman.cpp"
        );
    }

    #[test]
    fn linked_title_links_directories() {
        let title = links().linked_title("pacman/pacman.cpp", false);
        assert_eq!(
            title,
            r#"<a href="http://localhost:8080/sourcefile/pacman">pacman</a>/pacman.cpp"#
        );
    }

    #[test]
    fn linked_title_with_final_link() {
        let title = links().linked_title("a/b/c.cpp", true);
        assert_eq!(
            title,
            concat!(
                r#"<a href="http://localhost:8080/sourcefile/a">a</a>/"#,
                r#"<a href="http://localhost:8080/sourcefile/a/b">b</a>/"#,
                r#"<a href="http://localhost:8080/sourcefile/a/b/c.cpp">c.cpp</a>"#,
            )
        );
    }

    #[test]
    fn linked_title_escapes_text() {
        let title = links().linked_title("misc/odd&ends.cpp", false);
        assert!(title.ends_with("/odd&amp;ends.cpp"));
    }
}
