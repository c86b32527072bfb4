//! HTML fragment templates rendered via `minijinja`.
//!
//! Pages are assembled from fragments: a prologue, repeated rows and a
//! closing fragment. The fragments are compiled into the binary so the
//! server has no runtime dependency on a templates directory.
//!
//! Automatic escaping is disabled. Values are escaped explicitly with the
//! `html` filter, which leaves pre-rendered markup (linked titles) passed
//! without the filter intact.

use axum::body::Bytes;
use minijinja::{AutoEscape, Environment, Value};
use serde::Serialize;

use crate::escape::escape_html;

/// The HTML fragments pages are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// Complete error page with status code and reason phrase.
    ErrorPage,
    /// Machine page head and the start of its info table.
    MachinePrologue,
    /// Parent machine or parent ROM set row of the info table.
    MachineParent,
    /// Heading and head of a device reference table.
    ReferenceTableOpen,
    /// One row of a device reference table.
    MachineRow,
    /// End of a sortable table.
    TableClose,
    /// Source file listing head and the start of its table.
    SourceFileListPrologue,
    /// One row of the source file listing.
    SourceFileListRow,
    /// Source file detail page head.
    SourceFilePrologue,
    /// Head of the machine table on a source file page.
    SourceFileMachinesOpen,
    /// One row of the machine table on a source file page.
    SourceFileMachineRow,
}

impl Fragment {
    const ALL: [Self; 11] = [
        Self::ErrorPage,
        Self::MachinePrologue,
        Self::MachineParent,
        Self::ReferenceTableOpen,
        Self::MachineRow,
        Self::TableClose,
        Self::SourceFileListPrologue,
        Self::SourceFileListRow,
        Self::SourceFilePrologue,
        Self::SourceFileMachinesOpen,
        Self::SourceFileMachineRow,
    ];

    /// Template name registered in the environment.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ErrorPage => "error",
            Self::MachinePrologue => "machine_prologue",
            Self::MachineParent => "machine_parent",
            Self::ReferenceTableOpen => "reference_table_open",
            Self::MachineRow => "machine_row",
            Self::TableClose => "table_close",
            Self::SourceFileListPrologue => "sourcefile_list_prologue",
            Self::SourceFileListRow => "sourcefile_list_row",
            Self::SourceFilePrologue => "sourcefile_prologue",
            Self::SourceFileMachinesOpen => "sourcefile_machines_open",
            Self::SourceFileMachineRow => "sourcefile_machine_row",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::ErrorPage => include_str!("../templates/error.html"),
            Self::MachinePrologue => include_str!("../templates/machine_prologue.html"),
            Self::MachineParent => include_str!("../templates/machine_parent.html"),
            Self::ReferenceTableOpen => include_str!("../templates/reference_table_open.html"),
            Self::MachineRow => include_str!("../templates/machine_row.html"),
            Self::TableClose => include_str!("../templates/table_close.html"),
            Self::SourceFileListPrologue => {
                include_str!("../templates/sourcefile_list_prologue.html")
            }
            Self::SourceFileListRow => include_str!("../templates/sourcefile_list_row.html"),
            Self::SourceFilePrologue => include_str!("../templates/sourcefile_prologue.html"),
            Self::SourceFileMachinesOpen => {
                include_str!("../templates/sourcefile_machines_open.html")
            }
            Self::SourceFileMachineRow => include_str!("../templates/sourcefile_machine_row.html"),
        }
    }
}

/// Compiled page fragments.
///
/// Built once at startup and shared by all requests.
#[derive(Debug)]
pub struct PageTemplates {
    env: Environment<'static>,
}

impl PageTemplates {
    /// Compile every fragment.
    ///
    /// # Errors
    ///
    /// Returns the template syntax error of the first fragment that fails
    /// to compile.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_filter("html", html_filter);

        for fragment in Fragment::ALL {
            env.add_template(fragment.name(), fragment.source())?;
        }

        Ok(Self { env })
    }

    /// Render a fragment to UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns the `minijinja` error if rendering fails.
    pub fn render<S: Serialize>(&self, fragment: Fragment, ctx: S) -> Result<Bytes, minijinja::Error> {
        let text = self.env.get_template(fragment.name())?.render(ctx)?;
        Ok(Bytes::from(text))
    }
}

/// `html` filter: escape a value for element content or attributes.
///
/// `none` renders as the empty string.
fn html_filter(value: Value) -> String {
    if value.is_none() || value.is_undefined() {
        String::new()
    } else {
        escape_html(&value.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use minijinja::context;

    use super::*;

    fn render(fragment: Fragment, ctx: Value) -> String {
        let templates = PageTemplates::new().unwrap();
        let bytes = templates.render(fragment, ctx).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn all_fragments_compile() {
        assert!(PageTemplates::new().is_ok());
    }

    #[test]
    fn error_page_escapes() {
        let html = render(
            Fragment::ErrorPage,
            context! { code => "404", message => "Not <Found>" },
        );
        assert!(html.contains("<title>404 Not &lt;Found&gt;</title>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn machine_row_without_description() {
        let html = render(
            Fragment::MachineRow,
            context! {
                machinehref => "http://h/machine/namco_audio",
                shortname => "namco_audio",
                description => Value::from(()),
                sourcehref => "",
                sourcefile => "",
            },
        );
        assert_eq!(
            html,
            "        <tr><td><a href=\"http://h/machine/namco_audio\">namco_audio</a></td><td></td><td></td></tr>\n"
        );
    }

    #[test]
    fn machine_row_with_description() {
        let html = render(
            Fragment::MachineRow,
            context! {
                machinehref => "http://h/machine/z80ctc",
                shortname => "z80ctc",
                description => "Z80 \"CTC\"",
                sourcehref => "http://h/sourcefile/machine/z80ctc.cpp",
                sourcefile => "machine/z80ctc.cpp",
            },
        );
        assert!(html.contains(">Z80 &quot;CTC&quot;</a>"));
        assert!(html.ends_with("</tr>\n"));
        assert_eq!(html.lines().count(), 1);
    }

    #[test]
    fn prologue_omits_year_when_absent() {
        let html = render(
            Fragment::MachinePrologue,
            context! {
                assets => "http://h/static",
                description => "Z80 CTC",
                shortname => "z80ctc",
                isdevice => "Yes",
                runnable => "No",
                sourcehref => "http://h/sourcefile/machine/z80ctc.cpp",
                sourcefile => "machine/z80ctc.cpp",
                year => Value::from(()),
                manufacturer => "",
            },
        );
        assert!(!html.contains("Year:"));
        assert!(html.ends_with("Source file:</th><td><a href=\"http://h/sourcefile/machine/z80ctc.cpp\">machine/z80ctc.cpp</a></td></tr>\n"));
    }

    #[test]
    fn linked_markup_passes_through() {
        let html = render(
            Fragment::SourceFileListRow,
            context! { sourcefile => "<a href=\"x\">x</a>", machines => "3" },
        );
        assert!(html.contains("<td><a href=\"x\">x</a></td>"));
    }
}
