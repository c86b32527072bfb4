//! Shared record types for the minimaws machine-info browser.
//!
//! The data layer produces these records and both the web front-end and
//! the command-line listings consume them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for integer row IDs
//! - [`records`] -- Machine, device reference and source file records
//! - [`listing`] -- Rows printed by the command-line listing commands

pub mod ids;
pub mod listing;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use ids::{MachineId, SourceFileId};
pub use listing::{Brother, CloneOf, FullName, MachineSource};
pub use records::{DeviceRef, MachineInfo, SourceFileMachine, SourceFileSummary};
