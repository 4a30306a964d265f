/*!
 * Error types for the edml library.
 *
 * This module contains the error types raised while decoding timecodes,
 * assigning keyword data to section fields and assembling documents,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when decoding or encoding a TCF timecode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// The text does not follow the `HH?MM?SS?FF[?RRRR]` layout or uses an
    /// indicator character that has no table entry
    #[error("Invalid TCF format: {0}")]
    InvalidFormat(String),

    /// A numeric field is outside its allowed range
    #[error("TCF field {field} out of range in '{value}': {reason}")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// The complete timecode text
        value: String,
        /// What the allowed range is
        reason: String,
    },
}

/// Errors raised when a section receives keyword data it cannot accept.
///
/// These are never escalated: the parser records them as validation
/// messages on the owning section.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Fewer data tokens than the keyword requires
    #[error("({keyword}) expects {expected} data fields, found {found}")]
    MissingData {
        keyword: String,
        expected: usize,
        found: usize,
    },

    /// More data tokens than the keyword can hold
    #[error("({keyword}) takes at most {expected} data fields, found {found}")]
    ExtraData {
        keyword: String,
        expected: usize,
        found: usize,
    },

    /// A data token could not be converted to the field's type
    #[error("({keyword}) invalid value \"{value}\": {reason}")]
    InvalidValue {
        keyword: String,
        value: String,
        reason: String,
    },

    /// The keyword is not known to the section
    #[error("Unknown keyword ({keyword}) in {section} section")]
    UnknownKeyword { keyword: String, section: String },

    /// A keyword that continues an entry arrived without the entry header
    #[error("({keyword}) found without a preceding ({expected})")]
    OutOfSequence { keyword: String, expected: String },

    /// A timecode inside the keyword data failed to decode
    #[error("({keyword}) {source}")]
    Timecode {
        keyword: String,
        #[source]
        source: TimecodeError,
    },
}

impl FieldError {
    /// Build an invalid-value error for a keyword
    pub fn invalid(keyword: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            keyword: keyword.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap a timecode error with the keyword it belongs to
    pub fn timecode(keyword: &str, source: TimecodeError) -> Self {
        Self::Timecode {
            keyword: keyword.to_string(),
            source,
        }
    }
}

/// Main library error type
#[derive(Error, Debug)]
pub enum AdlError {
    /// A value failed to decode at construction time
    #[error("Invalid format: {0}")]
    InvalidFormat(#[from] TimecodeError),

    /// The tag structure is broken and the parser runs in strict mode
    #[error("Structural error in {section}: {message}")]
    Structural {
        /// Section whose parse loop detected the problem
        section: String,
        /// Human readable description with line information
        message: String,
    },

    /// Error reading the document source
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AdlError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
