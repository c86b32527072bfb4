//! Source file lookup and listing queries.
//!
//! Patterns use `SQLite` `GLOB` semantics: `*` matches any run of
//! characters (including `/`), `?` matches a single character, and the
//! match is case-sensitive.

use minimaws_types::{SourceFileId, SourceFileMachine, SourceFileSummary};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Operations on the `sourcefile` table.
pub struct SourceFileStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SourceFileStore<'a> {
    /// Create a new source file store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the row ID of the source file with exactly this path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn sourcefile_id(&self, filename: &str) -> Result<Option<SourceFileId>, DbError> {
        let id = sqlx::query_scalar::<_, i64>(r"SELECT id FROM sourcefile WHERE filename = ?1")
            .bind(filename)
            .fetch_optional(self.pool)
            .await?;

        tracing::debug!(filename, found = id.is_some(), "Queried source file ID");
        Ok(id.map(SourceFileId))
    }

    /// Count the source files whose path matches a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn count_sourcefiles(&self, pattern: &str) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM sourcefile WHERE filename GLOB ?1",
        )
        .bind(pattern)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(pattern, count, "Counted source files");
        Ok(count)
    }

    /// List source files with their machine counts, ordered by path.
    ///
    /// With no pattern every source file is listed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn sourcefiles(
        &self,
        pattern: Option<&str>,
    ) -> Result<Vec<SourceFileSummary>, DbError> {
        let rows = if let Some(pattern) = pattern {
            sqlx::query_as::<_, SourceFileSummaryRow>(
                r"SELECT sourcefile.filename AS filename, COUNT(machine.id) AS machines
                  FROM sourcefile
                  LEFT JOIN machine ON sourcefile.id = machine.sourcefile
                  WHERE sourcefile.filename GLOB ?1
                  GROUP BY sourcefile.id
                  ORDER BY sourcefile.filename ASC",
            )
            .bind(pattern)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, SourceFileSummaryRow>(
                r"SELECT sourcefile.filename AS filename, COUNT(machine.id) AS machines
                  FROM sourcefile
                  LEFT JOIN machine ON sourcefile.id = machine.sourcefile
                  GROUP BY sourcefile.id
                  ORDER BY sourcefile.filename ASC",
            )
            .fetch_all(self.pool)
            .await?
        };

        tracing::debug!(?pattern, count = rows.len(), "Listed source files");
        Ok(rows.into_iter().map(SourceFileSummary::from).collect())
    }

    /// Machines defined in the given source file, ordered by short name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn sourcefile_machines(
        &self,
        id: SourceFileId,
    ) -> Result<Vec<SourceFileMachine>, DbError> {
        let rows = sqlx::query_as::<_, SourceFileMachineRow>(
            r"SELECT machine.shortname AS shortname, machine.description AS description,
                     machine.runnable AS runnable,
                     system.year AS year, system.manufacturer AS manufacturer,
                     cloneof.parent AS cloneof
              FROM machine
              LEFT JOIN system ON machine.id = system.id
              LEFT JOIN cloneof ON machine.id = cloneof.id
              WHERE machine.sourcefile = ?1
              ORDER BY machine.shortname ASC",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(%id, count = rows.len(), "Queried source file machines");
        Ok(rows.into_iter().map(SourceFileMachine::from).collect())
    }
}

/// Row returned by the source file listing queries.
#[derive(Debug, sqlx::FromRow)]
struct SourceFileSummaryRow {
    filename: String,
    machines: i64,
}

impl From<SourceFileSummaryRow> for SourceFileSummary {
    fn from(row: SourceFileSummaryRow) -> Self {
        Self {
            filename: row.filename,
            machines: row.machines,
        }
    }
}

/// Row returned by the source file machines query.
#[derive(Debug, sqlx::FromRow)]
struct SourceFileMachineRow {
    shortname: String,
    description: String,
    runnable: bool,
    year: Option<String>,
    manufacturer: Option<String>,
    cloneof: Option<String>,
}

impl From<SourceFileMachineRow> for SourceFileMachine {
    fn from(row: SourceFileMachineRow) -> Self {
        Self {
            shortname: row.shortname,
            description: row.description,
            year: row.year,
            manufacturer: row.manufacturer,
            runnable: row.runnable,
            cloneof: row.cloneof,
        }
    }
}
