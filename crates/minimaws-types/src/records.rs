//! Read-only records served by the page handlers.
//!
//! These mirror the rows the data layer returns. They carry no behaviour
//! beyond a few derived views used when rendering.

use serde::{Deserialize, Serialize};

use crate::ids::MachineId;

/// Full detail for a single machine, as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    /// Row ID, used to look up the devices this machine references.
    pub id: MachineId,
    /// Unique short name (e.g. `pacman`).
    pub shortname: String,
    /// Human-readable description.
    pub description: String,
    /// Path of the source file that defines the machine.
    pub sourcefile: String,
    /// Whether the record describes a device rather than a system.
    pub isdevice: bool,
    /// Whether the machine can be run on its own.
    pub runnable: bool,
    /// Release year, present for systems only.
    pub year: Option<String>,
    /// Manufacturer, present for systems only.
    pub manufacturer: Option<String>,
    /// Short name of the parent machine when this is a clone.
    pub cloneof: Option<String>,
    /// Short name of the machine whose ROMs this one borrows.
    pub romof: Option<String>,
}

impl MachineInfo {
    /// The ROM parent, when it is not already listed as the clone parent.
    pub fn distinct_romof(&self) -> Option<&str> {
        match (&self.romof, &self.cloneof) {
            (Some(romof), Some(cloneof)) if romof == cloneof => None,
            (Some(romof), _) => Some(romof.as_str()),
            (None, _) => None,
        }
    }
}

/// One side of a device reference.
///
/// `description` and `sourcefile` are absent when the referenced device
/// has no record of its own in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    /// Short name of the referenced (or referencing) machine.
    pub shortname: String,
    /// Description, if the machine exists in the store.
    pub description: Option<String>,
    /// Source file, if the machine exists in the store.
    pub sourcefile: Option<String>,
}

/// A source file with the number of machines it defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileSummary {
    /// Path of the source file.
    pub filename: String,
    /// Number of machines defined in the file.
    pub machines: i64,
}

/// A machine row on a source file detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileMachine {
    /// Unique short name.
    pub shortname: String,
    /// Human-readable description.
    pub description: String,
    /// Release year, if known.
    pub year: Option<String>,
    /// Manufacturer, if known.
    pub manufacturer: Option<String>,
    /// Whether the machine can be run on its own.
    pub runnable: bool,
    /// Clone parent short name.
    pub cloneof: Option<String>,
}
