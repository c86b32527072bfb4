//! Plain-text listings of the machine database.
//!
//! Each listing prints a header line followed by one aligned row per
//! match. Nothing at all is printed when there are no matches; the caller
//! reports that on stderr.

use std::io::{self, Write};

use minimaws_db::DatabasePool;
use minimaws_types::{Brother, CloneOf, FullName, MachineSource};

use crate::error::AppError;

/// The listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Short names and descriptions.
    Full,
    /// Short names and source files.
    Source,
    /// Clones and their parents.
    Clones,
    /// Machines sharing a source file with a match.
    Brothers,
}

impl Listing {
    /// Query the database and write the listing to `out`.
    ///
    /// Returns whether anything matched `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails or
    /// [`AppError::Output`] if writing fails.
    pub async fn run<W: Write>(
        self,
        db: &DatabasePool,
        pattern: &str,
        out: &mut W,
    ) -> Result<bool, AppError> {
        let store = db.listings();
        let found = match self {
            Self::Full => write_full_names(out, &store.full_names(pattern).await?)?,
            Self::Source => write_sources(out, &store.sources(pattern).await?)?,
            Self::Clones => write_clones(out, &store.clones(pattern).await?)?,
            Self::Brothers => write_brothers(out, &store.brothers(pattern).await?)?,
        };
        tracing::debug!(listing = ?self, pattern, found, "Listing complete");
        Ok(found)
    }

    /// Message printed when nothing matched.
    pub fn no_match_message(self, pattern: &str) -> String {
        match self {
            Self::Full | Self::Source | Self::Brothers => {
                format!("No matching systems found for '{pattern}'")
            }
            Self::Clones => format!("No matching clones found for '{pattern}'"),
        }
    }
}

fn write_full_names(out: &mut impl Write, rows: &[FullName]) -> io::Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    writeln!(out, "{:<16}  Description:", "Name:")?;
    for row in rows {
        writeln!(out, "{:<16}  \"{}\"", row.shortname, row.description)?;
    }
    Ok(true)
}

fn write_sources(out: &mut impl Write, rows: &[MachineSource]) -> io::Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    writeln!(out, "{:<16}  Source file:", "Name:")?;
    for row in rows {
        writeln!(out, "{:<16}  {}", row.shortname, row.sourcefile)?;
    }
    Ok(true)
}

fn write_clones(out: &mut impl Write, rows: &[CloneOf]) -> io::Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    writeln!(out, "{:<16}  Clone of:", "Name:")?;
    for row in rows {
        writeln!(out, "{:<16}  {}", row.shortname, row.parent)?;
    }
    Ok(true)
}

fn write_brothers(out: &mut impl Write, rows: &[Brother]) -> io::Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    writeln!(out, "{:<20}  {:<16}  Parent:", "Source file:", "Name:")?;
    for row in rows {
        writeln!(
            out,
            "{:<20}  {:<16}  {}",
            row.sourcefile,
            row.shortname,
            row.parent.as_deref().unwrap_or_default()
        )?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const FIXTURE: &str = include_str!("../../minimaws-db/tests/fixtures/sample.sql");

    async fn sample_db() -> DatabasePool {
        let db = DatabasePool::open_in_memory().await.unwrap();
        sqlx::raw_sql(FIXTURE).execute(db.pool()).await.unwrap();
        db
    }

    async fn list(listing: Listing, pattern: &str) -> (bool, String) {
        let db = sample_db().await;
        let mut out = Vec::new();
        let found = listing.run(&db, pattern, &mut out).await.unwrap();
        (found, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn full_names_aligned() {
        let (found, text) = list(Listing::Full, "pac*").await;
        assert!(found);
        assert_eq!(
            text,
            "Name:             Description:\n\
             pacman            \"Pac-Man (Midway)\"\n\
             pacmanf           \"Pac-Man (Midway, with speedup hack)\"\n"
        );
    }

    #[tokio::test]
    async fn sources_for_every_machine() {
        let (found, text) = list(Listing::Source, "*").await;
        assert!(found);
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("z80ctc            machine/z80ctc.cpp\n"));
    }

    #[tokio::test]
    async fn clones_match_parent_name() {
        let (found, text) = list(Listing::Clones, "puckman").await;
        assert!(found);
        assert_eq!(
            text,
            "Name:             Clone of:\n\
             pacman            puckman\n\
             pacmanf           puckman\n"
        );
    }

    #[tokio::test]
    async fn brothers_share_source_file() {
        let (found, text) = list(Listing::Brothers, "puckman").await;
        assert!(found);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "pacman/pacman.cpp     pacman            puckman");
        assert_eq!(lines[3], "pacman/pacman.cpp     puckman           ");
    }

    #[tokio::test]
    async fn no_match_writes_nothing() {
        let (found, text) = list(Listing::Full, "nosuch*").await;
        assert!(!found);
        assert!(text.is_empty());
        assert_eq!(
            Listing::Full.no_match_message("nosuch*"),
            "No matching systems found for 'nosuch*'"
        );
    }
}
