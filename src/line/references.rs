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

//! Segments referenced by a record and the geometry of its overlaps.

use crate::error::GfaError;
use crate::field::alignment::Alignment;
use crate::field::oriented::{EndType, Orientation, OrientedLine, SegmentEnd};
use crate::field::position::Position;
use crate::field::Value;
use crate::line::{Line, RecordType, Version};

/// Which side of a record a reference is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    From,
    To,
}

impl Direction {
    pub fn index(self) -> usize {
        match self {
            Direction::From => 0,
            Direction::To => 1,
        }
    }
}

/// A segment referenced by a record.
///
/// Paths and groups list segments without direction or orientation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub direction: Option<Direction>,
    pub orient: Option<Orientation>,
}

/// How two segments overlap in a GFA2 edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// An end of one segment overlaps an end of the other.
    Dovetail,
    /// One segment is contained in the other.
    Containment,
    Internal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Substring {
    Whole,
    Prefix,
    Suffix,
    Internal,
}

fn substring(
    beg: Position,
    end: Position,
) -> Substring {
    match (beg.is_first(), end.is_last()) {
        (true, true) => Substring::Whole,
        (true, false) => Substring::Prefix,
        (false, true) => Substring::Suffix,
        (false, false) => Substring::Internal,
    }
}

fn identifier(value: &Value) -> Result<&str, GfaError> {
    value.as_str().ok_or_else(|| GfaError::Type(format!("expected an identifier, found a {}", value.kind())))
}

fn oriented(value: &Value) -> Result<&OrientedLine, GfaError> {
    value.as_oriented().ok_or_else(|| GfaError::Type(format!("expected an oriented identifier, found a {}", value.kind())))
}

fn orientation(value: &Value) -> Result<Orientation, GfaError> {
    value.as_orientation().ok_or_else(|| GfaError::Type(format!("expected an orientation, found a {}", value.kind())))
}

fn position(value: &Value) -> Result<Position, GfaError> {
    value.as_position().ok_or_else(|| GfaError::Type(format!("expected a position, found a {}", value.kind())))
}

impl Line {
    /// Name of the record: segment, path and group names, edge and gap identifiers.
    pub fn name(&self) -> Result<Option<String>, GfaError> {
        let Some(field) = self.schema().name_field else { return Ok(None) };
        match self.field(field)? {
            Value::Identifier(name) => Ok(Some(name.clone())),
            _ => Ok(None),
        }
    }

    /// Segment name and orientation on one side of a link, containment, edge or gap.
    pub fn side(
        &self,
        direction: Direction,
    ) -> Result<OrientedLine, GfaError> {
        match (self.record_type(), direction) {
            (RecordType::Link | RecordType::Containment, Direction::From) => {
                Ok(OrientedLine::new(identifier(self.field("from_segment")?)?, orientation(self.field("from_orient")?)?))
            },
            (RecordType::Link | RecordType::Containment, Direction::To) => {
                Ok(OrientedLine::new(identifier(self.field("to_segment")?)?, orientation(self.field("to_orient")?)?))
            },
            (RecordType::Edge | RecordType::Gap, Direction::From) => Ok(oriented(self.field("sid1")?)?.clone()),
            (RecordType::Edge | RecordType::Gap, Direction::To) => Ok(oriented(self.field("sid2")?)?.clone()),
            (RecordType::Fragment, Direction::From) => Ok(OrientedLine::new(identifier(self.field("sid")?)?, Orientation::Forward)),
            (record_type, _) => Err(GfaError::Runtime(format!("{} records have no {:?} side", record_type.code(), direction))),
        }
    }

    /// Overwrite one side of a link, containment, edge or gap.
    pub(crate) fn set_side(
        &mut self,
        direction: Direction,
        side: &OrientedLine,
    ) -> Result<(), GfaError> {
        match (self.record_type(), direction) {
            (RecordType::Link | RecordType::Containment, Direction::From) => {
                self.set_unchecked("from_segment", Value::Identifier(side.name.clone()))?;
                self.set_unchecked("from_orient", Value::Orientation(side.orient))
            },
            (RecordType::Link | RecordType::Containment, Direction::To) => {
                self.set_unchecked("to_segment", Value::Identifier(side.name.clone()))?;
                self.set_unchecked("to_orient", Value::Orientation(side.orient))
            },
            (RecordType::Edge | RecordType::Gap, Direction::From) => self.set_unchecked("sid1", Value::OrientedIdentifier(side.clone())),
            (RecordType::Edge | RecordType::Gap, Direction::To) => self.set_unchecked("sid2", Value::OrientedIdentifier(side.clone())),
            (RecordType::Fragment, Direction::From) => self.set_unchecked("sid", Value::Identifier(side.name.clone())),
            (record_type, _) => Err(GfaError::Runtime(format!("{} records have no {:?} side", record_type.code(), direction))),
        }
    }

    /// Segments this record refers to.
    ///
    /// Paths and groups report each listed name once. Group items may also
    /// name edges or other groups, telling them apart needs a graph.
    pub fn references(&self) -> Result<Vec<Reference>, GfaError> {
        let sided = |direction: Direction| -> Result<Reference, GfaError> {
            let side = self.side(direction)?;
            Ok(Reference { name: side.name, direction: Some(direction), orient: Some(side.orient) })
        };
        let listed = |names: Vec<&str>| -> Vec<Reference> {
            let mut refs: Vec<Reference> = Vec::with_capacity(names.len());
            for name in names {
                if !refs.iter().any(|x| x.name == name) {
                    refs.push(Reference { name: name.to_string(), direction: None, orient: None });
                }
            }
            refs
        };
        match self.record_type() {
            RecordType::Link | RecordType::Containment | RecordType::Edge | RecordType::Gap => {
                Ok(vec![sided(Direction::From)?, sided(Direction::To)?])
            },
            RecordType::Fragment => Ok(vec![sided(Direction::From)?]),
            RecordType::Path => match self.field("segment_names")? {
                Value::OrientedIdentifierList(items) => Ok(listed(items.iter().map(|x| x.name.as_str()).collect())),
                other => Err(GfaError::Type(format!("expected a list of segments, found a {}", other.kind()))),
            },
            RecordType::OrderedGroup => match self.field("items")? {
                Value::OrientedIdentifierList(items) => Ok(listed(items.iter().map(|x| x.name.as_str()).collect())),
                other => Err(GfaError::Type(format!("expected a list of items, found a {}", other.kind()))),
            },
            RecordType::UnorderedGroup => match self.field("items")? {
                Value::IdentifierList(items) => Ok(listed(items.iter().map(|x| x.as_str()).collect())),
                other => Err(GfaError::Type(format!("expected a list of items, found a {}", other.kind()))),
            },
            _ => Ok(Vec::new()),
        }
    }

    /// Replace every reference to segment `old` by `new`.
    ///
    /// Returns true if the record referenced `old`.
    pub(crate) fn rename_reference(
        &mut self,
        old: &str,
        new: &str,
    ) -> Result<bool, GfaError> {
        let mut changed = false;
        match self.record_type() {
            RecordType::Link | RecordType::Containment | RecordType::Edge | RecordType::Gap | RecordType::Fragment => {
                let directions: &[Direction] = if self.record_type() == RecordType::Fragment {
                    &[Direction::From]
                } else {
                    &[Direction::From, Direction::To]
                };
                for direction in directions {
                    let side = self.side(*direction)?;
                    if side.name == old {
                        self.set_side(*direction, &OrientedLine::new(new, side.orient))?;
                        changed = true;
                    }
                }
            },
            RecordType::Path | RecordType::OrderedGroup => {
                let field = if self.record_type() == RecordType::Path { "segment_names" } else { "items" };
                let renamed: Option<Vec<OrientedLine>> = match self.field(field)? {
                    Value::OrientedIdentifierList(items) if items.iter().any(|x| x.name == old) => Some(items.iter().map(|x| {
                        if x.name == old { OrientedLine::new(new, x.orient) } else { x.clone() }
                    }).collect()),
                    _ => None,
                };
                if let Some(items) = renamed {
                    self.set_unchecked(field, Value::OrientedIdentifierList(items))?;
                    changed = true;
                }
            },
            RecordType::UnorderedGroup => {
                let renamed: Option<Vec<String>> = match self.field("items")? {
                    Value::IdentifierList(items) if items.iter().any(|x| x == old) => {
                        Some(items.iter().map(|x| if x == old { new.to_string() } else { x.clone() }).collect())
                    },
                    _ => None,
                };
                if let Some(items) = renamed {
                    self.set_unchecked("items", Value::IdentifierList(items))?;
                    changed = true;
                }
            },
            _ => {},
        }
        Ok(changed)
    }

    /// Length of a segment: the sequence length, the `LN` tag or the GFA2 `slen`.
    pub fn segment_length(&self) -> Result<Option<i64>, GfaError> {
        if self.record_type() != RecordType::Segment {
            return Err(GfaError::Runtime(format!("{} records have no length", self.record_type().code())))
        }
        if self.version() == Version::Gfa2 {
            return Ok(self.field("slen")?.as_i64())
        }
        match self.field("sequence")? {
            Value::String(sequence) => Ok(Some(sequence.len() as i64)),
            _ => Ok(self.get("LN")?.and_then(|x| x.as_i64())),
        }
    }

    /// Sequence of a segment, None for the `*` placeholder.
    pub fn sequence(&self) -> Result<Option<&str>, GfaError> {
        match self.field("sequence")? {
            Value::String(sequence) => Ok(Some(sequence.as_str())),
            _ => Ok(None),
        }
    }

    /// Kind of overlap described by a link, containment or edge.
    pub fn edge_kind(&self) -> Result<EdgeKind, GfaError> {
        match self.record_type() {
            RecordType::Link => Ok(EdgeKind::Dovetail),
            RecordType::Containment => Ok(EdgeKind::Containment),
            RecordType::Edge => {
                let first = substring(position(self.field("beg1")?)?, position(self.field("end1")?)?);
                let second = substring(position(self.field("beg2")?)?, position(self.field("end2")?)?);
                match (first, second) {
                    (Substring::Whole, _) | (_, Substring::Whole) => Ok(EdgeKind::Containment),
                    (Substring::Internal, _) | (_, Substring::Internal) => Ok(EdgeKind::Internal),
                    _ => Ok(EdgeKind::Dovetail),
                }
            },
            record_type => Err(GfaError::Runtime(format!("{} records do not describe overlaps", record_type.code()))),
        }
    }

    /// Segment ends joined by a dovetail overlap, in (from, to) order.
    ///
    /// None for containments and internal overlaps.
    pub fn dovetail_ends(&self) -> Result<Option<(SegmentEnd, SegmentEnd)>, GfaError> {
        match self.record_type() {
            RecordType::Link => {
                let from = self.side(Direction::From)?;
                let to = self.side(Direction::To)?;
                Ok(Some((SegmentEnd::exit_of(&from.name, from.orient), SegmentEnd::entry_of(&to.name, to.orient))))
            },
            RecordType::Edge if self.edge_kind()? == EdgeKind::Dovetail => {
                let first = oriented(self.field("sid1")?)?;
                let second = oriented(self.field("sid2")?)?;
                let end1 = if position(self.field("end1")?)?.is_last() { EndType::End } else { EndType::Begin };
                let end2 = if position(self.field("beg2")?)?.is_first() { EndType::Begin } else { EndType::End };
                Ok(Some((SegmentEnd::new(&first.name, end1), SegmentEnd::new(&second.name, end2))))
            },
            _ => Ok(None),
        }
    }

    /// Length of the overlap on the (from, to) segments of a dovetail.
    ///
    /// None if the overlap is not an exact match and the segments can not
    /// be joined by trimming it.
    pub fn overlap_lengths(&self) -> Result<Option<(u64, u64)>, GfaError> {
        let alignment = match self.record_type() {
            RecordType::Link => self.field("overlap")?,
            RecordType::Edge => self.field("alignment")?,
            record_type => return Err(GfaError::Runtime(format!("{} records do not describe overlaps", record_type.code()))),
        };
        let cigar_length = match alignment.as_alignment() {
            Some(Alignment::Placeholder) => None,
            Some(Alignment::Cigar(cigar)) if cigar.is_all_match() => Some(cigar.length_on_reference()),
            _ => return Ok(None),
        };
        if self.record_type() == RecordType::Link {
            let length = cigar_length.unwrap_or(0);
            return Ok(Some((length, length)))
        }
        let first = position(self.field("end1")?)?.value() - position(self.field("beg1")?)?.value();
        let second = position(self.field("end2")?)?.value() - position(self.field("beg2")?)?.value();
        if first != second || cigar_length.is_some_and(|x| x != first as u64) {
            return Ok(None)
        }
        Ok(Some((first as u64, second as u64)))
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn link_dovetail_ends() {
        use crate::field::oriented::{EndType, SegmentEnd};
        use crate::line::Line;

        let link: Line = "L\t1\t+\t2\t-\t4M".parse().unwrap();
        let (from, to) = link.dovetail_ends().unwrap().unwrap();
        assert_eq!(from, SegmentEnd::new("1", EndType::End));
        assert_eq!(to, SegmentEnd::new("2", EndType::End));

        let link: Line = "L\t1\t-\t2\t+\t4M".parse().unwrap();
        let (from, to) = link.dovetail_ends().unwrap().unwrap();
        assert_eq!(from, SegmentEnd::new("1", EndType::Begin));
        assert_eq!(to, SegmentEnd::new("2", EndType::Begin));
    }

    #[test]
    fn edge_kinds() {
        use super::EdgeKind;
        use crate::line::Line;

        let dovetail: Line = "E\t*\t1+\t2+\t90\t100$\t0\t10\t10M".parse().unwrap();
        assert_eq!(dovetail.edge_kind().unwrap(), EdgeKind::Dovetail);
        let containment: Line = "E\t*\t1+\t2+\t20\t30\t0\t10$\t10M".parse().unwrap();
        assert_eq!(containment.edge_kind().unwrap(), EdgeKind::Containment);
        let internal: Line = "E\t*\t1+\t2+\t20\t30\t5\t15\t10M".parse().unwrap();
        assert_eq!(internal.edge_kind().unwrap(), EdgeKind::Internal);
        assert!(internal.dovetail_ends().unwrap().is_none());
    }

    #[test]
    fn edge_dovetail_ends() {
        use crate::field::oriented::{EndType, SegmentEnd};
        use crate::line::Line;

        let edge: Line = "E\t*\t1+\t2-\t90\t100$\t90\t100$\t10M".parse().unwrap();
        let (from, to) = edge.dovetail_ends().unwrap().unwrap();
        assert_eq!(from, SegmentEnd::new("1", EndType::End));
        assert_eq!(to, SegmentEnd::new("2", EndType::End));
        assert_eq!(edge.overlap_lengths().unwrap(), Some((10, 10)));
    }

    #[test]
    fn overlap_must_be_exact_match() {
        use crate::line::Line;

        let link: Line = "L\t1\t+\t2\t+\t2M1I2M".parse().unwrap();
        assert_eq!(link.overlap_lengths().unwrap(), None);
        let link: Line = "L\t1\t+\t2\t+\t*".parse().unwrap();
        assert_eq!(link.overlap_lengths().unwrap(), Some((0, 0)));
    }

    #[test]
    fn references_of_paths_are_unique() {
        use crate::line::Line;

        let path: Line = "P\tp1\t1+,2-,1+\t*".parse().unwrap();
        let names: Vec<String> = path.references().unwrap().into_iter().map(|x| x.name).collect();
        assert_eq!(names, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn rename_references() {
        use crate::line::Line;

        let mut link: Line = "L\t1\t+\t1\t-\t*".parse().unwrap();
        assert!(link.rename_reference("1", "x").unwrap());
        assert_eq!(link.to_string(), "L\tx\t+\tx\t-\t*");
        assert!(!link.rename_reference("1", "y").unwrap());

        let mut group: Line = "U\tg\t1 2 3".parse().unwrap();
        assert!(group.rename_reference("2", "b").unwrap());
        assert_eq!(group.to_string(), "U\tg\t1 b 3");
    }

    #[test]
    fn segment_lengths() {
        use crate::line::Line;

        let seg: Line = "S\t1\tACGT".parse().unwrap();
        assert_eq!(seg.segment_length().unwrap(), Some(4));
        let seg: Line = "S\t1\t*\tLN:i:12".parse().unwrap();
        assert_eq!(seg.segment_length().unwrap(), Some(12));
        let seg: Line = "S\t1\t100\t*".parse().unwrap();
        assert_eq!(seg.segment_length().unwrap(), Some(100));
    }
}
