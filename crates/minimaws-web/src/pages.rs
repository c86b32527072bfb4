//! Lazy page bodies.
//!
//! Each page is a stream of HTML chunks. Nothing is queried or rendered
//! until the server polls the body, which happens after the response head
//! has been committed. Queries for a table run when the table is reached,
//! and a table with no rows is left out of the page entirely.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use minijinja::context;
use minimaws_db::{DatabasePool, DbError};
use minimaws_types::{DeviceRef, MachineInfo, SourceFileId, SourceFileMachine};

use crate::error::WebError;
use crate::links::LinkBuilder;
use crate::templates::{Fragment, PageTemplates};

/// A page body: HTML chunks produced on demand.
pub type PageStream = BoxStream<'static, Result<Bytes, WebError>>;

const INFO_TABLE_CLOSE: &[u8] = b"</table>\n";
const PAGE_CLOSE: &[u8] = b"</body>\n</html>\n";
const NO_MACHINES: &[u8] = b"<p>No machines found.</p>\n";

/// Everything a page needs to render, cloned out of the application state.
#[derive(Debug, Clone)]
pub struct PageContext {
    db: DatabasePool,
    templates: Arc<PageTemplates>,
    links: LinkBuilder,
}

impl PageContext {
    /// Bundle the data handle, templates and link builder for one request.
    pub const fn new(db: DatabasePool, templates: Arc<PageTemplates>, links: LinkBuilder) -> Self {
        Self { db, templates, links }
    }

    /// Machine detail page.
    ///
    /// The info table lists the parent machine and, when different, the
    /// parent ROM set; these are followed by the devices the machine
    /// references and the machines that reference it.
    pub fn machine(self, machine: MachineInfo) -> PageStream {
        let prologue = {
            let page = self.clone();
            let machine = machine.clone();
            stream::once(async move {
                let ctx = context! {
                    assets => page.links.assets(),
                    description => &machine.description,
                    shortname => &machine.shortname,
                    isdevice => yes_no(machine.isdevice),
                    runnable => yes_no(machine.runnable),
                    sourcehref => page.links.sourcefile(&machine.sourcefile),
                    sourcefile => &machine.sourcefile,
                    year => &machine.year,
                    manufacturer => &machine.manufacturer,
                };
                Ok::<_, WebError>(page.templates.render(Fragment::MachinePrologue, ctx)?)
            })
        };

        let parents = {
            let page = self.clone();
            let cloneof = machine.cloneof.clone();
            let romof = machine.distinct_romof().map(ToOwned::to_owned);
            stream::once(async move {
                let mut chunks = Vec::with_capacity(2);
                if let Some(parent) = cloneof {
                    chunks.push(page.parent_row("Parent Machine", &parent).await?);
                }
                if let Some(parent) = romof {
                    chunks.push(page.parent_row("Parent ROM set", &parent).await?);
                }
                Ok::<_, WebError>(chunks)
            })
            .map_ok(chunk_stream)
            .try_flatten()
        };

        let devices = {
            let db = self.db.clone();
            let id = machine.id;
            self.reference_table(
                "Devices Referenced",
                "tbl-dev-refs",
                async move { db.machines().devices_referenced(id).await },
            )
        };

        let referenced_by = {
            let db = self.db.clone();
            let shortname = machine.shortname;
            self.reference_table(
                "Referenced By",
                "tbl-ref-by",
                async move { db.machines().device_references(&shortname).await },
            )
        };

        prologue
            .chain(parents)
            .chain(fixed(INFO_TABLE_CLOSE))
            .chain(devices)
            .chain(referenced_by)
            .chain(fixed(PAGE_CLOSE))
            .boxed()
    }

    /// Source file listing, either complete or filtered by a glob pattern.
    pub fn sourcefile_listing(self, pattern: Option<String>) -> PageStream {
        let (title, heading) = match &pattern {
            None => ("All Source Files".to_owned(), "All Source Files".to_owned()),
            Some(pattern) => (
                format!("Source Files: {pattern}"),
                self.links.linked_title(pattern, false),
            ),
        };

        let prologue = {
            let page = self.clone();
            stream::once(async move {
                let ctx = context! {
                    assets => page.links.assets(),
                    title,
                    heading,
                };
                Ok::<_, WebError>(page.templates.render(Fragment::SourceFileListPrologue, ctx)?)
            })
        };

        let rows = stream::once(async move {
            let files = self.db.sourcefiles().sourcefiles(pattern.as_deref()).await?;
            let mut chunks = Vec::with_capacity(files.len().saturating_add(1));
            for file in &files {
                let ctx = context! {
                    sourcefile => self.links.linked_title(&file.filename, true),
                    machines => file.machines,
                };
                chunks.push(self.templates.render(Fragment::SourceFileListRow, ctx)?);
            }
            chunks.push(
                self.templates
                    .render(Fragment::TableClose, context! { table_id => "tbl-sourcefiles" })?,
            );
            Ok::<_, WebError>(chunks)
        })
        .map_ok(chunk_stream)
        .try_flatten();

        prologue.chain(rows).chain(fixed(PAGE_CLOSE)).boxed()
    }

    /// Detail page for a single source file.
    pub fn sourcefile(self, filename: String, id: SourceFileId) -> PageStream {
        let prologue = {
            let page = self.clone();
            stream::once(async move {
                let ctx = context! {
                    assets => page.links.assets(),
                    title => page.links.linked_title(&filename, false),
                    filename,
                };
                Ok::<_, WebError>(page.templates.render(Fragment::SourceFilePrologue, ctx)?)
            })
        };

        let machines = stream::once(async move {
            let machines = self.db.sourcefiles().sourcefile_machines(id).await?;
            if machines.is_empty() {
                return Ok(vec![Bytes::from_static(NO_MACHINES)]);
            }

            let mut chunks = Vec::with_capacity(machines.len().saturating_add(2));
            chunks.push(self.templates.render(Fragment::SourceFileMachinesOpen, context! {})?);
            for machine in &machines {
                chunks.push(self.sourcefile_machine_row(machine)?);
            }
            chunks.push(
                self.templates
                    .render(Fragment::TableClose, context! { table_id => "tbl-machines" })?,
            );
            Ok::<_, WebError>(chunks)
        })
        .map_ok(chunk_stream)
        .try_flatten();

        prologue.chain(machines).chain(fixed(PAGE_CLOSE)).boxed()
    }

    /// Info table row linking to a parent machine.
    ///
    /// The parent's description is shown when the parent has a record of
    /// its own.
    async fn parent_row(&self, label: &str, parent: &str) -> Result<Bytes, WebError> {
        let description = self.db.machines().description(parent).await?;
        let ctx = context! {
            label,
            href => self.links.machine(parent),
            description,
            shortname => parent,
        };
        Ok(self.templates.render(Fragment::MachineParent, ctx)?)
    }

    /// A sortable device reference table, or nothing when there are no rows.
    fn reference_table<F>(&self, heading: &'static str, table_id: &'static str, rows: F) -> PageStream
    where
        F: Future<Output = Result<Vec<DeviceRef>, DbError>> + Send + 'static,
    {
        let page = self.clone();
        stream::once(async move {
            let rows = rows.await?;
            if rows.is_empty() {
                return Ok(Vec::new());
            }

            let mut chunks = Vec::with_capacity(rows.len().saturating_add(2));
            chunks.push(
                page.templates
                    .render(Fragment::ReferenceTableOpen, context! { heading, table_id })?,
            );
            for row in &rows {
                chunks.push(page.device_row(row)?);
            }
            chunks.push(page.templates.render(Fragment::TableClose, context! { table_id })?);
            Ok::<_, WebError>(chunks)
        })
        .map_ok(chunk_stream)
        .try_flatten()
        .boxed()
    }

    fn device_row(&self, device: &DeviceRef) -> Result<Bytes, minijinja::Error> {
        let sourcehref = device
            .sourcefile
            .as_deref()
            .map(|sourcefile| self.links.sourcefile(sourcefile));
        let ctx = context! {
            machinehref => self.links.machine(&device.shortname),
            shortname => &device.shortname,
            description => &device.description,
            sourcehref,
            sourcefile => &device.sourcefile,
        };
        self.templates.render(Fragment::MachineRow, ctx)
    }

    fn sourcefile_machine_row(&self, machine: &SourceFileMachine) -> Result<Bytes, minijinja::Error> {
        let parenthref = machine
            .cloneof
            .as_deref()
            .map(|parent| self.links.machine(parent));
        let ctx = context! {
            machinehref => self.links.machine(&machine.shortname),
            shortname => &machine.shortname,
            description => &machine.description,
            year => &machine.year,
            manufacturer => &machine.manufacturer,
            runnable => yes_no(machine.runnable),
            parent => &machine.cloneof,
            parenthref,
        };
        self.templates.render(Fragment::SourceFileMachineRow, ctx)
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, WebError>> {
    stream::iter(chunks.into_iter().map(Ok))
}

fn fixed(chunk: &'static [u8]) -> impl futures::Stream<Item = Result<Bytes, WebError>> {
    stream::once(async move { Ok(Bytes::from_static(chunk)) })
}
