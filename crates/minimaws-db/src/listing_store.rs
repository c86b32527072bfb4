//! Pattern queries backing the command-line listing commands.

use minimaws_types::{Brother, CloneOf, FullName, MachineSource};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Glob-pattern listings over machine short names.
pub struct ListingStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ListingStore<'a> {
    /// Create a new listing store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Short names and descriptions of matching machines.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn full_names(&self, pattern: &str) -> Result<Vec<FullName>, DbError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r"SELECT shortname, description
              FROM machine
              WHERE shortname GLOB ?1
              ORDER BY shortname ASC",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(shortname, description)| FullName {
                shortname,
                description,
            })
            .collect())
    }

    /// Short names and source files of matching machines.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn sources(&self, pattern: &str) -> Result<Vec<MachineSource>, DbError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r"SELECT machine.shortname, sourcefile.filename
              FROM machine
              JOIN sourcefile ON machine.sourcefile = sourcefile.id
              WHERE machine.shortname GLOB ?1
              ORDER BY machine.shortname ASC",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(shortname, sourcefile)| MachineSource {
                shortname,
                sourcefile,
            })
            .collect())
    }

    /// Clones whose own short name or parent short name matches.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn clones(&self, pattern: &str) -> Result<Vec<CloneOf>, DbError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r"SELECT machine.shortname, cloneof.parent
              FROM machine
              JOIN cloneof ON machine.id = cloneof.id
              WHERE machine.shortname GLOB ?1 OR cloneof.parent GLOB ?1
              ORDER BY machine.shortname ASC",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(shortname, parent)| CloneOf { shortname, parent })
            .collect())
    }

    /// Every machine defined in the same source file as a matching machine.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn brothers(&self, pattern: &str) -> Result<Vec<Brother>, DbError> {
        let rows = sqlx::query_as::<_, (String, String, Option<String>)>(
            r"SELECT sourcefile.filename, machine.shortname, cloneof.parent
              FROM machine
              JOIN sourcefile ON machine.sourcefile = sourcefile.id
              LEFT JOIN cloneof ON machine.id = cloneof.id
              WHERE machine.sourcefile IN (SELECT sourcefile FROM machine WHERE shortname GLOB ?1)
              ORDER BY sourcefile.filename ASC, machine.shortname ASC",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(pattern, count = rows.len(), "Queried brothers");
        Ok(rows
            .into_iter()
            .map(|(sourcefile, shortname, parent)| Brother {
                sourcefile,
                shortname,
                parent,
            })
            .collect())
    }
}
