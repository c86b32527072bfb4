//! Static asset resolution and streaming.
//!
//! Assets live directly in one directory; names are single path segments
//! and never resolve outside it.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use futures::stream::{self, Stream};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::mime::MimeRegistry;

/// Assets shipped with this crate (stylesheet and table-sorting script).
pub const DEFAULT_ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Size of each chunk read from an asset file.
const CHUNK_SIZE: usize = 8192;

/// Maps asset names to files and their content types.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    directory: PathBuf,
    mime: Arc<MimeRegistry>,
}

/// An asset that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Full path of the file.
    pub path: PathBuf,
    /// MIME type derived from the file extension.
    pub content_type: String,
}

impl AssetResolver {
    /// Create a resolver serving files from `directory`.
    pub fn new(directory: impl Into<PathBuf>, mime: Arc<MimeRegistry>) -> Self {
        Self {
            directory: directory.into(),
            mime,
        }
    }

    /// Resolve an asset name to a regular file in the assets directory.
    ///
    /// Returns `None` for names that are empty, contain a separator, are
    /// `.` or `..`, or do not name a regular file.
    pub async fn resolve(&self, name: &str) -> Option<ResolvedAsset> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return None;
        }

        let path = self.directory.join(name);
        let metadata = tokio::fs::metadata(&path).await.ok()?;
        if !metadata.is_file() {
            return None;
        }

        let content_type = self.mime.content_type(&path).to_owned();
        Some(ResolvedAsset { path, content_type })
    }
}

impl ResolvedAsset {
    /// Open the file for streaming.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened, e.g. because it
    /// was removed after being resolved or is not readable.
    pub async fn open(&self) -> io::Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static> {
        let file = File::open(&self.path).await?;
        Ok(file_chunks(file))
    }
}

/// Read a file as a stream of chunks.
///
/// The file handle is owned by the stream and closed when the stream is
/// exhausted or dropped.
fn file_chunks(file: File) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0_u8; CHUNK_SIZE];
        let read = file.read(&mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        buf.truncate(read);
        Ok::<_, io::Error>(Some((Bytes::from(buf), file)))
    })
}
