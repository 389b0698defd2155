/*!
 Errors that can happen when decoding archived `NSKeyedArchiver` records.
*/

use std::fmt::{Display, Formatter, Result};

use crate::archive::models::Shape;

/// Errors that can happen when decoding archived `NSKeyedArchiver` records
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveError {
    /// The candidate does not have the structure required for the attempted shape
    ShapeMismatch(Shape),
    /// A required field is present but holds the wrong kind of value; carries the
    /// field name and the expected kind
    InvalidType(&'static str, &'static str),
    /// The parallel `NS.keys` and `NS.objects` arrays have different lengths
    LengthMismatch(usize, usize),
    /// The `NS.keys` array contains a repeated key
    DuplicateKey,
    /// The `NS.time` offset describes a date outside the representable range
    InvalidDate(f64),
}

impl Display for ArchiveError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            ArchiveError::ShapeMismatch(shape) => write!(
                fmt,
                "Object does not have the correct structure for {shape} serialized to a NSKeyedArchiver!"
            ),
            ArchiveError::InvalidType(field, expected) => {
                write!(fmt, "The '{field}' value is an unexpected type (expected {expected})!")
            }
            ArchiveError::LengthMismatch(keys, values) => write!(
                fmt,
                "The length of 'NS.keys' ({keys}) is not equal to that of 'NS.objects' ({values})!"
            ),
            ArchiveError::DuplicateKey => {
                write!(fmt, "The 'NS.keys' array contains duplicate entries!")
            }
            ArchiveError::InvalidDate(seconds) => write!(
                fmt,
                "Offset of {seconds} seconds from the reference date is out of range!"
            ),
        }
    }
}
