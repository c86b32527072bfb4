//! Rows produced by the command-line listing queries.

use serde::{Deserialize, Serialize};

/// A machine's short name and description (`listfull`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    /// Unique short name.
    pub shortname: String,
    /// Human-readable description.
    pub description: String,
}

/// A machine's short name and the file defining it (`listsource`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSource {
    /// Unique short name.
    pub shortname: String,
    /// Path of the defining source file.
    pub sourcefile: String,
}

/// A clone and its parent (`listclones`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOf {
    /// Short name of the clone.
    pub shortname: String,
    /// Short name of the parent.
    pub parent: String,
}

/// A machine sharing a source file with a matched machine (`listbrothers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brother {
    /// Path of the shared source file.
    pub sourcefile: String,
    /// Unique short name.
    pub shortname: String,
    /// Clone parent, if the machine is a clone.
    pub parent: Option<String>,
}
