use crate::core::io::traits::CoordinateFile;
use crate::core::models::atom::{Atom, AtomSet};
use nalgebra::Vector3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    /// The free-form second line of the file.
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("File declares {declared} atoms but only {found} atom lines were found")]
    TooFewAtoms { declared: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("Invalid {axis} coordinate '{value}'")]
    InvalidCoordinate { axis: char, value: String },
    #[error("Atom line needs a name and three coordinates")]
    MissingField,
    #[error("File is empty")]
    Empty,
}

/// The plain XYZ format: a count line, a comment line, then `name x y z` per atom.
///
/// Columns after `z` (velocities, forces) are accepted and ignored. Lines after
/// the declared atom count are ignored too, so only the first frame of a
/// trajectory is read.
pub struct XyzFile;

impl CoordinateFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<(AtomSet, Self::Metadata), Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().ok_or(XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::Empty,
        })??;
        let declared: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidCount(count_line.trim().to_string()),
        })?;

        let comment = match lines.next() {
            Some(line) => line?.trim_end().to_string(),
            None if declared == 0 => String::new(),
            None => return Err(XyzError::TooFewAtoms { declared, found: 0 }),
        };

        let mut atoms = AtomSet::new();
        for (offset, line_res) in lines.take(declared).enumerate() {
            let line = line_res?;
            let line_num = offset + 3;
            atoms.push(parse_atom_line(&line, line_num)?);
        }

        if atoms.len() < declared {
            return Err(XyzError::TooFewAtoms {
                declared,
                found: atoms.len(),
            });
        }

        Ok((atoms, XyzMetadata { comment }))
    }
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, XyzError> {
    let mut fields = line.split_whitespace();
    let name = fields.next().ok_or(XyzError::Parse {
        line: line_num,
        kind: XyzParseErrorKind::MissingField,
    })?;

    let mut coords = [0.0; 3];
    for (slot, axis) in coords.iter_mut().zip(['x', 'y', 'z']) {
        let raw = fields.next().ok_or(XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::MissingField,
        })?;
        *slot = raw.parse().map_err(|_| XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::InvalidCoordinate {
                axis,
                value: raw.to_string(),
            },
        })?;
    }

    Ok(Atom::new(name, Vector3::from(coords)))
}
