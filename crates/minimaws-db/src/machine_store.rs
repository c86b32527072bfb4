//! Machine detail and device reference queries.
//!
//! Device references are stored by short name rather than row ID, so a
//! machine may reference a device that has no record of its own. Those
//! rows come back with `description` and `sourcefile` unset.

use minimaws_types::{DeviceRef, MachineId, MachineInfo};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Operations on the `machine` table and its satellite tables.
pub struct MachineStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MachineStore<'a> {
    /// Create a new machine store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up a machine by short name.
    ///
    /// Returns `None` if no machine has that short name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn machine_info(&self, shortname: &str) -> Result<Option<MachineInfo>, DbError> {
        let row = sqlx::query_as::<_, MachineInfoRow>(
            r"SELECT machine.id AS id, machine.shortname AS shortname, machine.description AS description,
                     machine.isdevice AS isdevice, machine.runnable AS runnable,
                     sourcefile.filename AS sourcefile, system.year AS year,
                     system.manufacturer AS manufacturer, cloneof.parent AS cloneof,
                     romof.parent AS romof
              FROM machine
              JOIN sourcefile ON machine.sourcefile = sourcefile.id
              LEFT JOIN system ON machine.id = system.id
              LEFT JOIN cloneof ON machine.id = cloneof.id
              LEFT JOIN romof ON machine.id = romof.id
              WHERE machine.shortname = ?1",
        )
        .bind(shortname)
        .fetch_optional(self.pool)
        .await?;

        tracing::debug!(shortname, found = row.is_some(), "Queried machine info");
        Ok(row.map(MachineInfo::from))
    }

    /// Look up just the description of a machine, used for parent links.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn description(&self, shortname: &str) -> Result<Option<String>, DbError> {
        let description = sqlx::query_scalar::<_, String>(
            r"SELECT description FROM machine WHERE shortname = ?1",
        )
        .bind(shortname)
        .fetch_optional(self.pool)
        .await?;
        Ok(description)
    }

    /// Devices referenced by the given machine, ordered by short name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn devices_referenced(&self, machine: MachineId) -> Result<Vec<DeviceRef>, DbError> {
        let rows = sqlx::query_as::<_, DeviceRefRow>(
            r"SELECT devicereference.device AS shortname, machine.description AS description,
                     sourcefile.filename AS sourcefile
              FROM devicereference
              LEFT JOIN machine ON devicereference.device = machine.shortname
              LEFT JOIN sourcefile ON machine.sourcefile = sourcefile.id
              WHERE devicereference.machine = ?1
              ORDER BY devicereference.device ASC",
        )
        .bind(machine.into_inner())
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(%machine, count = rows.len(), "Queried devices referenced");
        Ok(rows.into_iter().map(DeviceRef::from).collect())
    }

    /// Machines that reference the device with the given short name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn device_references(&self, shortname: &str) -> Result<Vec<DeviceRef>, DbError> {
        let rows = sqlx::query_as::<_, DeviceRefRow>(
            r"SELECT machine.shortname AS shortname, machine.description AS description,
                     sourcefile.filename AS sourcefile
              FROM machine
              JOIN sourcefile ON machine.sourcefile = sourcefile.id
              WHERE machine.id IN (SELECT machine FROM devicereference WHERE device = ?1)
              ORDER BY machine.shortname ASC",
        )
        .bind(shortname)
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(shortname, count = rows.len(), "Queried device references");
        Ok(rows.into_iter().map(DeviceRef::from).collect())
    }
}

/// Row returned by the machine detail query.
#[derive(Debug, sqlx::FromRow)]
struct MachineInfoRow {
    id: i64,
    shortname: String,
    description: String,
    sourcefile: String,
    isdevice: bool,
    runnable: bool,
    year: Option<String>,
    manufacturer: Option<String>,
    cloneof: Option<String>,
    romof: Option<String>,
}

impl From<MachineInfoRow> for MachineInfo {
    fn from(row: MachineInfoRow) -> Self {
        Self {
            id: MachineId(row.id),
            shortname: row.shortname,
            description: row.description,
            sourcefile: row.sourcefile,
            isdevice: row.isdevice,
            runnable: row.runnable,
            year: row.year,
            manufacturer: row.manufacturer,
            cloneof: row.cloneof,
            romof: row.romof,
        }
    }
}

/// Row returned by both device reference queries.
#[derive(Debug, sqlx::FromRow)]
struct DeviceRefRow {
    shortname: String,
    description: Option<String>,
    sourcefile: Option<String>,
}

impl From<DeviceRefRow> for DeviceRef {
    fn from(row: DeviceRefRow) -> Self {
        Self {
            shortname: row.shortname,
            description: row.description,
            sourcefile: row.sourcefile,
        }
    }
}
