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

//! Conversion of records between GFA1 and GFA2.
//!
//! Segments, links, containments, paths and ordered groups have
//! counterparts in the other version. Links and containments become edges
//! with coordinates, which needs the lengths of the segments they join.
//! Gaps, fragments, unordered groups and custom records exist only in GFA2
//! and can not be converted.
//!

use log::debug;

use crate::error::GfaError;
use crate::field::alignment::{Alignment, Cigar, CigarCode, CigarOp};
use crate::field::oriented::{EndType, Orientation, OrientedLine};
use crate::field::position::Position;
use crate::field::{text, Value};
use crate::line::references::{Direction, EdgeKind};
use crate::line::{Line, RecordType, Version};

/// Copy the tags of `source` that fit the schema of `target`.
fn copy_tags(
    source: &Line,
    target: &mut Line,
    skip: &[&str],
) {
    for (name, field) in source.tags.iter() {
        if skip.contains(&name.as_str()) {
            continue
        }
        if let Some(expected) = target.schema.predefined_datatype(name) {
            if expected != field.datatype {
                debug!("Dropped tag {} with a datatype not allowed in {}", name, target.version);
                continue
            }
        }
        target.tags.insert(name.clone(), field.clone());
    }
}

/// A coordinate on a segment of `length`, marked as last if it is at the end.
fn coordinate(
    value: i64,
    length: i64,
) -> Position {
    Position::new_trusted(value, value == length)
}

/// Rewrite a GFA1 CIGAR with the operations GFA2 allows.
fn cigar_to_gfa2(cigar: &Cigar) -> Result<Cigar, GfaError> {
    let mut converted = Cigar::default();
    let mut last: Option<CigarOp> = None;
    for op in cigar.iter() {
        let code = match op.code {
            CigarCode::Match | CigarCode::SequenceMatch | CigarCode::Mismatch => CigarCode::Match,
            CigarCode::Insertion => CigarCode::Insertion,
            CigarCode::Deletion | CigarCode::Skip => CigarCode::Deletion,
            CigarCode::Padding => CigarCode::Padding,
            CigarCode::SoftClip | CigarCode::HardClip => {
                return Err(GfaError::Version(format!("CIGAR {} with clipping has no GFA2 counterpart", cigar)))
            },
        };
        last = match last {
            Some(prev) if prev.code == code => Some(CigarOp::new(prev.length + op.length, code)),
            Some(prev) => {
                converted.push(prev);
                Some(CigarOp::new(op.length, code))
            },
            None => Some(CigarOp::new(op.length, code)),
        };
    }
    if let Some(op) = last {
        converted.push(op);
    }
    Ok(converted)
}

fn required_length<F: Fn(&str) -> Option<i64>>(
    lengths: &F,
    name: &str,
) -> Result<i64, GfaError> {
    lengths(name).ok_or_else(|| GfaError::Runtime(format!("length of segment {} is unknown", name)))
}

impl Line {
    /// Convert to `version` without knowing segment lengths.
    ///
    /// Links and containments need the lengths of their segments in GFA2,
    /// use [to_version_with](Line::to_version_with) or convert the whole
    /// graph for them.
    pub fn to_version(
        &self,
        version: Version,
    ) -> Result<Line, GfaError> {
        self.to_version_with(version, |_| None)
    }

    /// Convert to `version`, looking up segment lengths with `lengths`.
    pub fn to_version_with<F: Fn(&str) -> Option<i64>>(
        &self,
        version: Version,
        lengths: F,
    ) -> Result<Line, GfaError> {
        if version == Version::Generic {
            return Err(GfaError::Version("records can only be converted to GFA1 or GFA2".to_string()))
        }
        match (self.record_type, self.version) {
            (RecordType::Header, _) => {
                let mut line = self.clone();
                if line.tags.contains_key("VN") {
                    if let Some(value) = version.header_value() {
                        line.set_unchecked("VN", Value::String(value.to_string()))?;
                    }
                }
                Ok(line)
            },
            (RecordType::Comment, _) => Ok(self.clone()),
            (_, current) if current == version => Ok(self.clone()),
            (RecordType::Segment, Version::Gfa1) => self.segment_to_gfa2(),
            (RecordType::Segment, Version::Gfa2) => self.segment_to_gfa1(),
            (RecordType::Link, _) => self.link_to_edge(&lengths),
            (RecordType::Containment, _) => self.containment_to_edge(&lengths),
            (RecordType::Path, _) => self.path_to_group(),
            (RecordType::Edge, _) => self.edge_to_gfa1(),
            (RecordType::OrderedGroup, _) => self.group_to_path(),
            (record_type, _) => Err(GfaError::Version(format!("{} records have no {} counterpart", record_type.code(), version))),
        }
    }

    pub fn to_gfa1(&self) -> Result<Line, GfaError> {
        self.to_version(Version::Gfa1)
    }

    pub fn to_gfa2(&self) -> Result<Line, GfaError> {
        self.to_version(Version::Gfa2)
    }

    fn required_name(&self) -> Result<String, GfaError> {
        self.name()?.ok_or_else(|| GfaError::Runtime(format!("{} record has no name", self.record_type.code())))
    }

    fn segment_to_gfa2(&self) -> Result<Line, GfaError> {
        let name = self.required_name()?;
        let length = self.segment_length()?
            .ok_or_else(|| GfaError::Runtime(format!("length of segment {} is unknown, add a sequence or an LN tag", name)))?;
        let sequence = self.field("sequence")?.clone();
        let mut line = Line::with_vlevel(
            RecordType::Segment, Version::Gfa2,
            vec![Value::Identifier(name), Value::Integer(length), sequence],
            self.vlevel,
        )?;
        copy_tags(self, &mut line, &["LN"]);
        Ok(line)
    }

    fn segment_to_gfa1(&self) -> Result<Line, GfaError> {
        let name = self.required_name()?;
        text::check_segment_name(&name).map_err(|err| err.context("not a GFA1 segment name"))?;
        let length = self.field("slen")?.clone();
        let sequence = self.field("sequence")?.clone();
        let mut line = Line::with_vlevel(
            RecordType::Segment, Version::Gfa1,
            vec![Value::Identifier(name), sequence],
            self.vlevel,
        )?;
        copy_tags(self, &mut line, &[]);
        line.set_unchecked("LN", length)?;
        Ok(line)
    }

    fn edge_name(&self) -> Value {
        match self.tags.get("ID").and_then(|field| field.value(self.vlevel).ok()) {
            Some(Value::String(id)) => Value::Identifier(id.clone()),
            _ => Value::Placeholder,
        }
    }

    fn link_to_edge<F: Fn(&str) -> Option<i64>>(
        &self,
        lengths: &F,
    ) -> Result<Line, GfaError> {
        let from = self.side(Direction::From)?;
        let to = self.side(Direction::To)?;
        let cigar = match self.field("overlap")?.as_alignment() {
            Some(Alignment::Cigar(cigar)) => cigar.clone(),
            _ => return Err(GfaError::Value(format!("link {} {} has no overlap to place on the segments", from, to))),
        };
        let from_length = required_length(lengths, &from.name)?;
        let to_length = required_length(lengths, &to.name)?;
        let on_from = cigar.length_on_reference() as i64;
        let on_to = cigar.length_on_query() as i64;
        if on_from > from_length || on_to > to_length {
            return Err(GfaError::Inconsistency(format!("overlap {} is longer than the segments of link {} {}", cigar, from, to)))
        }

        let (beg1, end1) = match from.orient {
            Orientation::Forward => (coordinate(from_length - on_from, from_length), Position::Last(from_length)),
            Orientation::Reverse => (Position::Value(0), coordinate(on_from, from_length)),
        };
        let (beg2, end2) = match to.orient {
            Orientation::Forward => (Position::Value(0), coordinate(on_to, to_length)),
            Orientation::Reverse => (coordinate(to_length - on_to, to_length), Position::Last(to_length)),
        };

        let mut line = Line::with_vlevel(RecordType::Edge, Version::Gfa2, vec![
            self.edge_name(),
            Value::OrientedIdentifier(from),
            Value::OrientedIdentifier(to),
            Value::Position(beg1),
            Value::Position(end1),
            Value::Position(beg2),
            Value::Position(end2),
            Value::Alignment(Alignment::Cigar(cigar_to_gfa2(&cigar)?)),
        ], self.vlevel)?;
        copy_tags(self, &mut line, &["ID"]);
        Ok(line)
    }

    fn containment_to_edge<F: Fn(&str) -> Option<i64>>(
        &self,
        lengths: &F,
    ) -> Result<Line, GfaError> {
        let container = self.side(Direction::From)?;
        let contained = self.side(Direction::To)?;
        let container_length = required_length(lengths, &container.name)?;
        let contained_length = required_length(lengths, &contained.name)?;
        let pos = self.field("pos")?.as_i64().unwrap_or_default();
        let (on_container, alignment) = match self.field("overlap")?.as_alignment() {
            Some(Alignment::Cigar(cigar)) => (cigar.length_on_reference() as i64, Alignment::Cigar(cigar_to_gfa2(cigar)?)),
            _ => (contained_length, Alignment::Placeholder),
        };
        if pos + on_container > container_length {
            return Err(GfaError::Inconsistency(format!(
                "segment {} does not fit in {} at position {}", contained.name, container.name, pos
            )))
        }

        let mut line = Line::with_vlevel(RecordType::Edge, Version::Gfa2, vec![
            self.edge_name(),
            Value::OrientedIdentifier(container),
            Value::OrientedIdentifier(contained),
            Value::Position(coordinate(pos, container_length)),
            Value::Position(coordinate(pos + on_container, container_length)),
            Value::Position(Position::Value(0)),
            Value::Position(Position::Last(contained_length)),
            Value::Alignment(alignment),
        ], self.vlevel)?;
        copy_tags(self, &mut line, &["ID"]);
        Ok(line)
    }

    fn path_to_group(&self) -> Result<Line, GfaError> {
        let name = self.required_name()?;
        let items = self.field("segment_names")?.clone();
        if let Value::AlignmentList(overlaps) = self.field("overlaps")? {
            if !overlaps.is_empty() {
                debug!("Overlaps of path {} are not kept in GFA2", name);
            }
        }
        let mut line = Line::with_vlevel(
            RecordType::OrderedGroup, Version::Gfa2,
            vec![Value::Identifier(name), items],
            self.vlevel,
        )?;
        copy_tags(self, &mut line, &[]);
        Ok(line)
    }

    fn group_to_path(&self) -> Result<Line, GfaError> {
        let name = self.name()?
            .ok_or_else(|| GfaError::Version("ordered groups without a name have no GFA1 counterpart".to_string()))?;
        let items = self.field("items")?.clone();
        if let Value::OrientedIdentifierList(items) = &items {
            items.iter().try_for_each(|item| text::check_segment_name(&item.name))?;
        }
        let mut line = Line::with_vlevel(
            RecordType::Path, Version::Gfa1,
            vec![Value::Identifier(name), items, Value::AlignmentList(Vec::new())],
            self.vlevel,
        )?;
        copy_tags(self, &mut line, &[]);
        Ok(line)
    }

    fn edge_to_gfa1(&self) -> Result<Line, GfaError> {
        let alignment = match self.field("alignment")?.as_alignment() {
            Some(Alignment::Cigar(cigar)) => Alignment::Cigar(cigar.clone()),
            _ => Alignment::Placeholder,
        };
        let mut line = match self.edge_kind()? {
            EdgeKind::Internal => {
                return Err(GfaError::Version("edges between internal parts of segments have no GFA1 counterpart".to_string()))
            },
            EdgeKind::Dovetail => {
                let (from, to) = self.dovetail_ends()?
                    .ok_or_else(|| GfaError::Runtime("dovetail edge without segment ends".to_string()))?;
                let from_orient = if from.end == EndType::End { Orientation::Forward } else { Orientation::Reverse };
                let to_orient = if to.end == EndType::Begin { Orientation::Forward } else { Orientation::Reverse };
                Line::with_vlevel(RecordType::Link, Version::Gfa1, vec![
                    Value::Identifier(from.name),
                    Value::Orientation(from_orient),
                    Value::Identifier(to.name),
                    Value::Orientation(to_orient),
                    Value::Alignment(alignment),
                ], self.vlevel)?
            },
            EdgeKind::Containment => {
                let first = self.side(Direction::From)?;
                let second = self.side(Direction::To)?;
                let second_whole = self.field("beg2")?.as_position().is_some_and(|x| x.is_first())
                    && self.field("end2")?.as_position().is_some_and(|x| x.is_last());
                let (container, contained, pos, alignment): (OrientedLine, OrientedLine, i64, Alignment) = if second_whole {
                    let pos = self.field("beg1")?.as_position().map(|x| x.value()).unwrap_or_default();
                    (first, second, pos, alignment)
                } else {
                    let pos = self.field("beg2")?.as_position().map(|x| x.value()).unwrap_or_default();
                    (second, first, pos, alignment.complement())
                };
                Line::with_vlevel(RecordType::Containment, Version::Gfa1, vec![
                    Value::Identifier(container.name),
                    Value::Orientation(container.orient),
                    Value::Identifier(contained.name),
                    Value::Orientation(contained.orient),
                    Value::Integer(pos),
                    Value::Alignment(alignment),
                ], self.vlevel)?
            },
        };
        copy_tags(self, &mut line, &[]);
        if let Value::Identifier(id) = self.field("eid")? {
            line.set_unchecked("ID", Value::String(id.clone()))?;
        }
        Ok(line)
    }
}
