//! Type-safe wrappers around the integer row identifiers of the store.
//!
//! Machines and source files are both keyed by `INTEGER PRIMARY KEY`
//! columns. Wrapping them keeps a machine ID from being passed where a
//! source file ID is expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around an `i64` row ID with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner row ID.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Row ID of a record in the `machine` table.
    MachineId
);

define_id!(
    /// Row ID of a record in the `sourcefile` table.
    SourceFileId
);
