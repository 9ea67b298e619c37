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

//! GFA2 positions.
//!
//! A position is a non-negative offset in a segment. A trailing `$` marks
//! the position as the last one of the segment, e.g. `120$` in a segment of
//! length 120.
//!

use crate::error::GfaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Value(i64),
    /// Last position of the segment.
    Last(i64),
}

impl Position {
    /// Build a position, rejecting negative values.
    pub fn new(
        value: i64,
        last: bool,
    ) -> Result<Self, GfaError> {
        if value < 0 {
            return Err(GfaError::Value(format!("position {} is negative", value)))
        }
        Ok(Position::new_trusted(value, last))
    }

    /// Build a position without checking the value.
    pub fn new_trusted(
        value: i64,
        last: bool,
    ) -> Self {
        if last { Position::Last(value) } else { Position::Value(value) }
    }

    pub fn value(&self) -> i64 {
        match self {
            Position::Value(x) | Position::Last(x) => *x,
        }
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Position::Last(_))
    }

    pub fn is_first(&self) -> bool {
        self.value() == 0
    }

    pub fn validate(&self) -> Result<(), GfaError> {
        if self.value() < 0 {
            return Err(GfaError::Value(format!("position {} is negative", self)))
        }
        Ok(())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Position::Value(x) => write!(f, "{}", x),
            Position::Last(x) => write!(f, "{}$", x),
        }
    }
}

/// Decode a position.
///
/// Negative values are rejected unless `trusted` is set.
pub fn decode(
    text: &str,
    trusted: bool,
) -> Result<Position, GfaError> {
    let (digits, last) = match text.strip_suffix('$') {
        Some(digits) => (digits, true),
        None => (text, false),
    };
    let value = digits.parse::<i64>()
        .map_err(|_| GfaError::Format(format!("'{}' is not a valid position", text)))?;
    if trusted {
        Ok(Position::new_trusted(value, last))
    } else {
        Position::new(value, last)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn decode_last_position() {
        use super::{decode, Position};

        let got = decode("120$", false).unwrap();
        assert_eq!(got, Position::Last(120));
        assert!(got.is_last());
        assert_eq!(got.to_string(), "120$");
    }

    #[test]
    fn decode_plain_position() {
        use super::{decode, Position};

        let got = decode("0", false).unwrap();
        assert_eq!(got, Position::Value(0));
        assert!(got.is_first());
        assert!(!got.is_last());
    }

    #[test]
    fn negative_position_needs_trust() {
        use super::{decode, Position};

        assert!(decode("-3", false).is_err());
        assert_eq!(decode("-3", true).unwrap(), Position::Value(-3));
        assert!(Position::new(-1, true).is_err());
    }
}
