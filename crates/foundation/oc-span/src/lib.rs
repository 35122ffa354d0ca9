//! Source locations

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A unique identifier for a source file
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[display("{_0}")]
pub struct FileId(pub u32);

impl FileId {
    /// Wrap a raw file number
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A `(file, line, column)` triple, printed as `file.line.column`
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[display("{file}.{line}.{column}")]
pub struct Location {
    /// File the location belongs to
    pub file: FileId,
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
}

impl Location {
    /// Build a location from its parts
    pub fn new(file: FileId, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// Identifier-safe rendering, `file_line_column`, used to key labels
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location::new(FileId(0), 12, 4);
        assert_eq!(loc.to_string(), "0.12.4");
    }

    #[test]
    fn test_location_key() {
        let loc = Location::new(FileId(2), 3, 0);
        assert_eq!(loc.key(), "2_3_0");
    }

    #[test]
    fn test_locations_order_by_file_then_line() {
        let a = Location::new(FileId(0), 9, 9);
        let b = Location::new(FileId(1), 1, 1);
        let c = Location::new(FileId(1), 2, 0);
        assert!(a < b);
        assert!(b < c);
    }
}
