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

//! Orientations, oriented identifiers and segment ends.

use crate::error::GfaError;

/// Strand of a segment or reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn invert(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }

    /// Slot of this orientation in two-element tables.
    pub fn index(self) -> usize {
        match self {
            Orientation::Forward => 0,
            Orientation::Reverse => 1,
        }
    }

    pub fn is_reverse(self) -> bool {
        self == Orientation::Reverse
    }
}

impl std::str::FromStr for Orientation {
    type Err = GfaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Orientation::Forward),
            "-" => Ok(Orientation::Reverse),
            _ => Err(GfaError::Format(format!("'{}' is not a valid orientation", s))),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A name with an orientation, e.g. `11+`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrientedLine {
    pub name: String,
    pub orient: Orientation,
}

impl OrientedLine {
    pub fn new(
        name: &str,
        orient: Orientation,
    ) -> Self {
        OrientedLine { name: name.to_string(), orient }
    }

    pub fn invert(&self) -> Self {
        OrientedLine { name: self.name.clone(), orient: self.orient.invert() }
    }
}

impl std::str::FromStr for OrientedLine {
    type Err = GfaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let orient = match s.as_bytes().last() {
            Some(b'+') => Orientation::Forward,
            Some(b'-') => Orientation::Reverse,
            _ => return Err(GfaError::Format(format!("'{}' is not an oriented identifier", s))),
        };
        let name = &s[..s.len() - 1];
        if name.is_empty() {
            return Err(GfaError::Format(format!("'{}' is not an oriented identifier", s)))
        }
        Ok(OrientedLine { name: name.to_string(), orient })
    }
}

impl std::fmt::Display for OrientedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.orient)
    }
}

/// Either end of a segment.
///
/// `Begin` is the left end of the forward strand (`L`), `End` the right end (`R`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndType {
    Begin,
    End,
}

impl EndType {
    pub fn invert(self) -> Self {
        match self {
            EndType::Begin => EndType::End,
            EndType::End => EndType::Begin,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            EndType::Begin => 'L',
            EndType::End => 'R',
        }
    }
}

/// One end of a named segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SegmentEnd {
    pub name: String,
    pub end: EndType,
}

impl SegmentEnd {
    pub fn new(
        name: &str,
        end: EndType,
    ) -> Self {
        SegmentEnd { name: name.to_string(), end }
    }

    pub fn invert(&self) -> Self {
        SegmentEnd { name: self.name.clone(), end: self.end.invert() }
    }

    /// The end a dovetail overlap leaves from when the segment is read in `orient`.
    pub fn exit_of(
        name: &str,
        orient: Orientation,
    ) -> Self {
        match orient {
            Orientation::Forward => SegmentEnd::new(name, EndType::End),
            Orientation::Reverse => SegmentEnd::new(name, EndType::Begin),
        }
    }

    /// The end a dovetail overlap enters when the segment is read in `orient`.
    pub fn entry_of(
        name: &str,
        orient: Orientation,
    ) -> Self {
        SegmentEnd::exit_of(name, orient).invert()
    }
}

impl std::fmt::Display for SegmentEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.end.as_char())
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn parse_oriented_line() {
        use super::{Orientation, OrientedLine};

        let got: OrientedLine = "contig_12-".parse().unwrap();
        let expected = OrientedLine::new("contig_12", Orientation::Reverse);

        assert_eq!(got, expected);
        assert_eq!(got.to_string(), "contig_12-");
    }

    #[test]
    fn reject_oriented_line_without_orientation() {
        use super::OrientedLine;

        assert!("contig_12".parse::<OrientedLine>().is_err());
        assert!("+".parse::<OrientedLine>().is_err());
    }

    #[test]
    fn exit_and_entry_ends() {
        use super::{EndType, Orientation, SegmentEnd};

        assert_eq!(SegmentEnd::exit_of("a", Orientation::Forward).end, EndType::End);
        assert_eq!(SegmentEnd::exit_of("a", Orientation::Reverse).end, EndType::Begin);
        assert_eq!(SegmentEnd::entry_of("a", Orientation::Forward).end, EndType::Begin);
        assert_eq!(SegmentEnd::entry_of("a", Orientation::Reverse).end, EndType::End);
    }
}
