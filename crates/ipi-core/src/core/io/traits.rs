use crate::core::models::atom::AtomSet;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading coordinate file formats.
///
/// Implementors handle format-specific parsing; the provided method takes care
/// of opening files.
pub trait CoordinateFile {
    /// Format-specific data that does not belong in the [`AtomSet`].
    type Metadata;

    /// The error type for parsing and I/O.
    type Error: Error + From<io::Error>;

    /// Reads an atom set from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<(AtomSet, Self::Metadata), Self::Error>;

    /// Reads an atom set from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(AtomSet, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
