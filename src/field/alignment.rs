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

//! Alignments between two sequences.
//!
//! An alignment field holds one of:
//!   - a CIGAR string, e.g. `12M1D2I`,
//!   - a trace, a comma separated list of integers (GFA2 only), e.g. `12,4,7`,
//!   - the placeholder `*`.
//!
//! GFA1 accepts the extended CIGAR operations `=`, `X`, `S`, `H` and `N` in
//! addition to `M`, `I`, `D` and `P`. GFA2 only accepts the latter four.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::field::alignment::{parse_alignment, Alignment};
//! use gfaedit::Version;
//!
//! let aln = parse_alignment("2M1D3M", Version::Gfa1).unwrap();
//! let Alignment::Cigar(cigar) = aln else { panic!() };
//!
//! assert_eq!(cigar.complement().to_string(), "3M1I2M");
//! assert_eq!(cigar.length_on_reference(), 6);
//! assert_eq!(cigar.length_on_query(), 5);
//! ```
//!

use crate::error::GfaError;
use crate::line::Version;

/// CIGAR operation codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CigarCode {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Padding,
    SequenceMatch,
    Mismatch,
}

impl CigarCode {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'M' => Some(CigarCode::Match),
            'I' => Some(CigarCode::Insertion),
            'D' => Some(CigarCode::Deletion),
            'N' => Some(CigarCode::Skip),
            'S' => Some(CigarCode::SoftClip),
            'H' => Some(CigarCode::HardClip),
            'P' => Some(CigarCode::Padding),
            '=' => Some(CigarCode::SequenceMatch),
            'X' => Some(CigarCode::Mismatch),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CigarCode::Match => 'M',
            CigarCode::Insertion => 'I',
            CigarCode::Deletion => 'D',
            CigarCode::Skip => 'N',
            CigarCode::SoftClip => 'S',
            CigarCode::HardClip => 'H',
            CigarCode::Padding => 'P',
            CigarCode::SequenceMatch => '=',
            CigarCode::Mismatch => 'X',
        }
    }

    /// Codes only accepted in GFA1.
    pub fn is_extended(self) -> bool {
        !matches!(self, CigarCode::Match | CigarCode::Insertion | CigarCode::Deletion | CigarCode::Padding)
    }

    fn complement(self) -> Self {
        match self {
            CigarCode::Insertion => CigarCode::Deletion,
            CigarCode::Deletion => CigarCode::Insertion,
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CigarOp {
    pub length: u64,
    pub code: CigarCode,
}

impl CigarOp {
    pub fn new(
        length: u64,
        code: CigarCode,
    ) -> Self {
        CigarOp { length, code }
    }
}

impl std::fmt::Display for CigarOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.code.as_char())
    }
}

/// Ordered CIGAR operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cigar(Vec<CigarOp>);

impl Cigar {
    pub fn new(ops: Vec<CigarOp>) -> Self {
        Cigar(ops)
    }

    pub fn push(&mut self, op: CigarOp) {
        self.0.push(op);
    }

    pub fn get(&self, index: usize) -> Option<&CigarOp> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CigarOp> {
        self.0.iter()
    }

    /// The same alignment seen from the other sequence.
    ///
    /// Reverses the operations and swaps insertions with deletions.
    pub fn complement(&self) -> Self {
        Cigar(self.0.iter().rev().map(|op| CigarOp::new(op.length, op.code.complement())).collect())
    }

    /// Number of reference bases covered.
    pub fn length_on_reference(&self) -> u64 {
        self.0.iter().filter(|op| matches!(op.code,
            CigarCode::Match | CigarCode::SequenceMatch | CigarCode::Mismatch | CigarCode::Deletion | CigarCode::Skip
        )).map(|op| op.length).sum()
    }

    /// Number of query bases covered.
    pub fn length_on_query(&self) -> u64 {
        self.0.iter().filter(|op| matches!(op.code,
            CigarCode::Match | CigarCode::SequenceMatch | CigarCode::Mismatch | CigarCode::Insertion | CigarCode::SoftClip
        )).map(|op| op.length).sum()
    }

    /// True if every operation is `M` or `=`.
    pub fn is_all_match(&self) -> bool {
        self.0.iter().all(|op| matches!(op.code, CigarCode::Match | CigarCode::SequenceMatch))
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for op in self.0.iter() {
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// Trace points of a GFA2 alignment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Trace(Vec<u64>);

impl Trace {
    pub fn new(points: Vec<u64>) -> Self {
        Trace(points)
    }

    pub fn push(&mut self, point: u64) {
        self.0.push(point);
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.0.iter()
    }
}

impl std::fmt::Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let points = self.0.iter().map(|x| x.to_string()).collect::<Vec<String>>();
        write!(f, "{}", points.join(","))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Placeholder,
    Cigar(Cigar),
    Trace(Trace),
}

impl Alignment {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Alignment::Placeholder)
    }

    /// Complement of a CIGAR alignment.
    ///
    /// Traces can not be complemented without the trace spacing and become
    /// a placeholder.
    pub fn complement(&self) -> Self {
        match self {
            Alignment::Cigar(cigar) => Alignment::Cigar(cigar.complement()),
            Alignment::Trace(_) | Alignment::Placeholder => Alignment::Placeholder,
        }
    }

    /// Check the alignment is allowed in `version`.
    pub fn validate(
        &self,
        version: Version,
    ) -> Result<(), GfaError> {
        match self {
            Alignment::Placeholder => Ok(()),
            Alignment::Trace(_) => {
                if version == Version::Gfa1 {
                    return Err(GfaError::Format("trace alignments are only allowed in GFA2".to_string()))
                }
                Ok(())
            },
            Alignment::Cigar(cigar) => {
                if version != Version::Gfa1 {
                    if let Some(op) = cigar.iter().find(|op| op.code.is_extended()) {
                        return Err(GfaError::Format(format!("CIGAR operation '{}' is only allowed in GFA1", op.code.as_char())))
                    }
                }
                Ok(())
            },
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Alignment::Placeholder => write!(f, "*"),
            Alignment::Cigar(cigar) => write!(f, "{}", cigar),
            Alignment::Trace(trace) => write!(f, "{}", trace),
        }
    }
}

fn parse_cigar(text: &str) -> Result<Cigar, GfaError> {
    let mut cigar = Cigar::default();
    let mut start = 0;
    for (pos, c) in text.char_indices() {
        if c.is_ascii_digit() {
            continue
        }
        let code = CigarCode::from_char(c)
            .ok_or_else(|| GfaError::Format(format!("'{}' is not a CIGAR operation in '{}'", c, text)))?;
        if start == pos {
            return Err(GfaError::Format(format!("CIGAR operation '{}' has no length in '{}'", c, text)))
        }
        let length = text[start..pos].parse::<u64>()?;
        cigar.push(CigarOp::new(length, code));
        start = pos + c.len_utf8();
    }
    if start != text.len() {
        return Err(GfaError::Format(format!("CIGAR '{}' ends without an operation", text)))
    }
    Ok(cigar)
}

fn parse_trace(text: &str) -> Result<Trace, GfaError> {
    let mut trace = Trace::default();
    for point in text.split(',') {
        let value = point.parse::<i64>()
            .map_err(|_| GfaError::Format(format!("'{}' is not a valid trace", text)))?;
        if value < 0 {
            return Err(GfaError::Value(format!("trace '{}' contains negative values", text)))
        }
        trace.push(value as u64);
    }
    Ok(trace)
}

/// Parse an alignment without checking which operations `version` allows.
pub fn parse_alignment_unchecked(text: &str) -> Result<Alignment, GfaError> {
    if text == "*" {
        return Ok(Alignment::Placeholder)
    }
    let first_non_digit = text.chars().find(|c| !c.is_ascii_digit());
    match first_non_digit {
        _ if text.is_empty() => Err(GfaError::Format("empty alignment".to_string())),
        None | Some(',') | Some('-') => Ok(Alignment::Trace(parse_trace(text)?)),
        Some(_) => Ok(Alignment::Cigar(parse_cigar(text)?)),
    }
}

/// Parse an alignment by looking at its leading characters.
///
/// `*` is a placeholder, digits followed by a comma (or only digits) are a
/// trace and digits followed by an operation code are a CIGAR.
pub fn parse_alignment(
    text: &str,
    version: Version,
) -> Result<Alignment, GfaError> {
    let alignment = parse_alignment_unchecked(text)?;
    alignment.validate(version)?;
    Ok(alignment)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn parse_cigar_with_zero_length_op() {
        use super::{parse_alignment, Alignment, CigarCode, CigarOp};
        use crate::line::Version;

        let got = parse_alignment("12M1D2I0M1P", Version::Gfa2).unwrap();
        let Alignment::Cigar(cigar) = &got else { panic!("expected a CIGAR") };
        let expected = vec![
            CigarOp::new(12, CigarCode::Match),
            CigarOp::new(1, CigarCode::Deletion),
            CigarOp::new(2, CigarCode::Insertion),
            CigarOp::new(0, CigarCode::Match),
            CigarOp::new(1, CigarCode::Padding),
        ];

        assert_eq!(cigar.iter().copied().collect::<Vec<CigarOp>>(), expected);
        assert_eq!(got.to_string(), "12M1D2I0M1P");
    }

    #[test]
    fn complement_swaps_insertions_and_deletions() {
        use super::{parse_alignment, Alignment};
        use crate::line::Version;

        let Alignment::Cigar(cigar) = parse_alignment("2M1D3M", Version::Gfa1).unwrap() else { panic!() };
        assert_eq!(cigar.complement().to_string(), "3M1I2M");
        assert_eq!(cigar.complement().complement(), cigar);
    }

    #[test]
    fn extended_operations_only_in_gfa1() {
        use super::parse_alignment;
        use crate::line::Version;

        assert!(parse_alignment("5=1X2S", Version::Gfa1).is_ok());
        assert!(parse_alignment("5=1X2S", Version::Gfa2).is_err());
        assert!(parse_alignment("5=1X2S", Version::Generic).is_err());
    }

    #[test]
    fn trace_only_in_gfa2() {
        use super::{parse_alignment, Alignment, Trace};
        use crate::line::Version;

        assert_eq!(parse_alignment("12,14,15", Version::Gfa2).unwrap(), Alignment::Trace(Trace::new(vec![12, 14, 15])));
        assert!(parse_alignment("12,14,15", Version::Gfa1).is_err());
        assert!(parse_alignment("12,-1", Version::Gfa2).is_err());
    }

    #[test]
    fn placeholder_alignment() {
        use super::{parse_alignment, Alignment};
        use crate::line::Version;

        let got = parse_alignment("*", Version::Gfa1).unwrap();
        assert_eq!(got, Alignment::Placeholder);
        assert!(got.is_placeholder());
        assert_eq!(got.to_string(), "*");
    }

    #[test]
    fn malformed_cigars() {
        use super::parse_alignment;
        use crate::line::Version;

        assert!(parse_alignment("M12", Version::Gfa1).is_err());
        assert!(parse_alignment("12M3", Version::Gfa1).is_err());
        assert!(parse_alignment("12Q", Version::Gfa1).is_err());
        assert!(parse_alignment("", Version::Gfa1).is_err());
    }
}
