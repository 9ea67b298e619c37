// gfaedit: Reading, validating, editing and rewriting GFA assembly graphs.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Errors returned by the codecs, the record model and the graph.
//!
//! Every failure is reported as a [GfaError] carrying the kind of problem
//! and a message. Codec failures name the field, the raw text and the
//! datatype involved.
//!

/// Kinds of failures.
#[derive(Debug)]
pub enum GfaError {
    /// Malformed syntax: wrong number of fields, bad tag syntax.
    Format(String),
    /// Well formed but invalid content.
    Value(String),
    /// Value of the wrong kind for a field, or unknown datatype.
    Type(String),
    /// Duplicated tag or duplicated name.
    NotUnique(String),
    /// A referenced record or field does not exist.
    NotFound(String),
    /// Unknown or incompatible specification version.
    Version(String),
    /// Contradicting information in different fields or records.
    Inconsistency(String),
    /// Operation not allowed in the current state.
    Runtime(String),
    /// Underlying reader or writer failed.
    Io(std::io::Error),
}

impl GfaError {
    /// Prefixes the message with `context`, keeping the kind.
    pub fn context(self, context: &str) -> Self {
        match self {
            GfaError::Format(msg) => GfaError::Format(format!("{}: {}", context, msg)),
            GfaError::Value(msg) => GfaError::Value(format!("{}: {}", context, msg)),
            GfaError::Type(msg) => GfaError::Type(format!("{}: {}", context, msg)),
            GfaError::NotUnique(msg) => GfaError::NotUnique(format!("{}: {}", context, msg)),
            GfaError::NotFound(msg) => GfaError::NotFound(format!("{}: {}", context, msg)),
            GfaError::Version(msg) => GfaError::Version(format!("{}: {}", context, msg)),
            GfaError::Inconsistency(msg) => GfaError::Inconsistency(format!("{}: {}", context, msg)),
            GfaError::Runtime(msg) => GfaError::Runtime(format!("{}: {}", context, msg)),
            GfaError::Io(err) => GfaError::Io(err),
        }
    }

    /// Short name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GfaError::Format(_) => "FormatError",
            GfaError::Value(_) => "ValueError",
            GfaError::Type(_) => "TypeError",
            GfaError::NotUnique(_) => "NotUniqueError",
            GfaError::NotFound(_) => "NotFoundError",
            GfaError::Version(_) => "VersionError",
            GfaError::Inconsistency(_) => "InconsistencyError",
            GfaError::Runtime(_) => "RuntimeError",
            GfaError::Io(_) => "IoError",
        }
    }
}

impl std::fmt::Display for GfaError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GfaError::Io(err) => write!(f, "{}: {}", self.kind(), err),
            GfaError::Format(msg)
                | GfaError::Value(msg)
                | GfaError::Type(msg)
                | GfaError::NotUnique(msg)
                | GfaError::NotFound(msg)
                | GfaError::Version(msg)
                | GfaError::Inconsistency(msg)
                | GfaError::Runtime(msg) => write!(f, "{}: {}", self.kind(), msg),
        }
    }
}

impl std::error::Error for GfaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GfaError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GfaError {
    fn from(err: std::io::Error) -> Self {
        GfaError::Io(err)
    }
}

impl From<serde_json::Error> for GfaError {
    fn from(err: serde_json::Error) -> Self {
        GfaError::Format(format!("invalid JSON: {}", err))
    }
}

impl From<std::num::ParseIntError> for GfaError {
    fn from(err: std::num::ParseIntError) -> Self {
        GfaError::Format(format!("invalid integer: {}", err))
    }
}

impl From<std::num::ParseFloatError> for GfaError {
    fn from(err: std::num::ParseFloatError) -> Self {
        GfaError::Format(format!("invalid float: {}", err))
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn context_keeps_kind() {
        use super::GfaError;

        let err = GfaError::Value("negative position".to_string()).context("field 'pos'");
        assert_eq!(err.kind(), "ValueError");
        assert_eq!(err.to_string(), "ValueError: field 'pos': negative position");
    }

    #[test]
    fn parse_int_error_is_format_error() {
        use super::GfaError;

        let err: GfaError = "12x".parse::<i64>().unwrap_err().into();
        assert_eq!(err.kind(), "FormatError");
    }
}
