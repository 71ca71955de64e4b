use serde::{Deserialize, Serialize};

use super::model::Table;

// ---------------------------------------------------------------------------
// Missing-data policy applied right after a sheet is read
// ---------------------------------------------------------------------------

/// How gaps in a freshly loaded table are cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Leave the table as read.
    Keep,
    /// Drop any row with a missing measure.
    DropIncompleteRows,
    /// Fill gaps by positional linear interpolation down each column.
    InterpolateLinear,
}

impl MissingPolicy {
    pub fn apply<K>(self, table: Table<K>) -> Table<K> {
        match self {
            MissingPolicy::Keep => table,
            MissingPolicy::DropIncompleteRows => table.drop_incomplete_rows(),
            MissingPolicy::InterpolateLinear => table.interpolate_linear(),
        }
    }
}
