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

//! A GFA graph: every record of a file, their names and connections.
//!
//! Records live in slots addressed by a [LineId] that stays valid until the
//! record is deleted. Segments referenced before they are defined get a
//! virtual placeholder slot which the real segment later fills in place.
//!
//! The version of a graph is fixed by the first record that implies one.
//! Headers without a version and comments seen before that are queued and
//! added once the version is known.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::graph::Graph;
//!
//! let mut graph = Graph::new();
//! graph.add_str("L\t1\t+\t2\t+\t*").unwrap();
//! assert_eq!(graph.virtual_segment_names(), vec!["1".to_string(), "2".to_string()]);
//!
//! graph.add_str("S\t1\tACGT").unwrap();
//! graph.add_str("S\t2\tTTGA").unwrap();
//! graph.validate().unwrap();
//!
//! assert_eq!(graph.to_string(), "S\t1\tACGT\nS\t2\tTTGA\nL\t1\t+\t2\t+\t*\n");
//! ```
//!

pub mod convert;
pub mod index;
pub mod linear_paths;
pub mod multiplication;
pub mod naming;

use std::collections::HashMap;
use std::io::{BufRead, Write};

use log::{debug, info, warn};
use roaring::RoaringBitmap;

use crate::error::GfaError;
use crate::field::oriented::{EndType, Orientation, OrientedLine, SegmentEnd};
use crate::field::Value;
use crate::line::references::{Direction, EdgeKind, Reference};
use crate::line::{Line, RecordType, ValidationLevel, Version};
use index::ConnectionIndex;

/// Slot of a record in a [Graph].
pub type LineId = u32;

/// Tags holding counts that are split or summed with their segments.
pub const COUNT_TAGS: [&str; 3] = ["KC", "RC", "FC"];

#[derive(Debug, Default)]
pub struct Graph {
    lines: Vec<Option<Line>>,
    by_kind: HashMap<RecordType, RoaringBitmap>,
    // Real and virtual segments.
    segments: HashMap<String, LineId>,
    // Paths, groups, named edges and gaps.
    named: HashMap<String, LineId>,
    index: ConnectionIndex,
    version: Option<Version>,
    queue: Vec<Line>,
    vlevel: ValidationLevel,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Empty graph of a known version.
    pub fn with_version(version: Version) -> Self {
        Graph {
            version: if version == Version::Generic { None } else { Some(version) },
            ..Default::default()
        }
    }

    /// Set the validation level of lines parsed by [add_str](Graph::add_str).
    pub fn with_vlevel(mut self, vlevel: ValidationLevel) -> Self {
        self.vlevel = vlevel;
        self
    }

    /// Version of the graph, None while it can not be told yet.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn vlevel(&self) -> ValidationLevel {
        self.vlevel
    }

    /// A record that is in the graph, None for deleted and virtual slots.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id as usize)?.as_ref().filter(|line| !line.is_virtual())
    }

    fn real_line(&self, id: LineId) -> Result<&Line, GfaError> {
        self.line(id).ok_or_else(|| GfaError::NotFound(format!("no line with id {}", id)))
    }

    /// Every record in slot order, excluding virtual segments.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines.iter().enumerate()
            .filter_map(|(id, line)| line.as_ref().map(|line| (id as LineId, line)))
            .filter(|(_, line)| !line.is_virtual())
    }

    /// Ids of the records of `kind`, in slot order.
    pub fn ids(&self, kind: RecordType) -> Vec<LineId> {
        self.by_kind.get(&kind).map(|ids| ids.iter().collect()).unwrap_or_default()
    }

    /// Number of records per record type.
    pub fn counts(&self) -> Vec<(RecordType, u64)> {
        let mut counts: Vec<(RecordType, u64)> = self.by_kind.iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(kind, ids)| (*kind, ids.len()))
            .collect();
        counts.sort();
        counts
    }

    /// Id of the segment called `name`, None if it is missing or virtual.
    pub fn segment_id(&self, name: &str) -> Option<LineId> {
        let id = *self.segments.get(name)?;
        self.line(id).map(|_| id)
    }

    pub fn segment(&self, name: &str) -> Option<&Line> {
        self.segment_id(name).and_then(|id| self.line(id))
    }

    /// Names of the real segments in slot order.
    pub fn segment_names(&self) -> Vec<String> {
        let mut names: Vec<(LineId, &String)> = self.segments.iter()
            .filter(|(_, id)| self.line(**id).is_some())
            .map(|(name, id)| (*id, name))
            .collect();
        names.sort();
        names.into_iter().map(|(_, name)| name.clone()).collect()
    }

    /// Length of the segment called `name` if it is known.
    pub fn segment_length(&self, name: &str) -> Option<i64> {
        self.segment(name)?.segment_length().ok().flatten()
    }

    /// Names referenced by some record without a segment definition.
    pub fn virtual_segment_names(&self) -> Vec<String> {
        self.index.virtual_names()
    }

    /// Id of the path, group, edge or gap called `name`.
    pub fn named_id(&self, name: &str) -> Option<LineId> {
        self.named.get(name).copied()
    }

    /// True if a segment, virtual segment or named record is called `name`.
    pub fn is_name_used(&self, name: &str) -> bool {
        self.segments.contains_key(name) || self.named.contains_key(name)
    }

    pub(crate) fn index(&self) -> &ConnectionIndex {
        &self.index
    }

    /// Parse one line of text and add it.
    ///
    /// The line is parsed with the version and validation level of the graph.
    pub fn add_str(&mut self, text: &str) -> Result<Option<LineId>, GfaError> {
        let line = Line::parse(text, self.version, self.vlevel)?;
        self.add_line(line)
    }

    /// Add a record.
    ///
    /// Returns the id of the record, or None if it was queued because the
    /// version of the graph is not known yet.
    pub fn add_line(&mut self, line: Line) -> Result<Option<LineId>, GfaError> {
        let declared = header_version(&line)?;
        match self.version {
            None => {
                if let Some(version) = declared {
                    self.set_version(version)?;
                } else if line.version() == Version::Generic {
                    self.queue.push(line);
                    return Ok(None)
                } else {
                    self.set_version(line.version())?;
                }
            },
            Some(version) => {
                let found = declared.unwrap_or(line.version());
                if found != Version::Generic && found != version {
                    return Err(GfaError::Version(format!(
                        "{} record of {} added to a {} graph", line.record_type().code(), found, version
                    )))
                }
            },
        }
        self.insert(line).map(Some)
    }

    fn set_version(&mut self, version: Version) -> Result<(), GfaError> {
        debug!("Graph version set to {}", version);
        self.version = Some(version);
        let queued = std::mem::take(&mut self.queue);
        if !queued.is_empty() {
            debug!("Adding {} queued lines", queued.len());
        }
        for line in queued {
            self.insert(line)?;
        }
        Ok(())
    }

    /// Signal the end of input.
    ///
    /// A graph whose version is still unknown becomes GFA1.
    pub fn finish(&mut self) -> Result<(), GfaError> {
        if self.version.is_none() {
            self.set_version(Version::Gfa1)?;
        }
        Ok(())
    }

    fn next_id(&self) -> Result<LineId, GfaError> {
        LineId::try_from(self.lines.len())
            .map_err(|_| GfaError::Runtime("too many lines in one graph".to_string()))
    }

    /// Segments referenced by `line` as far as the graph can tell.
    ///
    /// Group items that name other records are not segment references.
    fn references_of(&self, line: &Line) -> Result<Vec<Reference>, GfaError> {
        let mut refs = line.references()?;
        if matches!(line.record_type(), RecordType::OrderedGroup | RecordType::UnorderedGroup) {
            refs.retain(|x| !self.named.contains_key(&x.name));
        }
        Ok(refs)
    }

    fn ensure_segment(&mut self, name: &str) -> Result<(), GfaError> {
        if self.segments.contains_key(name) {
            return Ok(())
        }
        let id = self.next_id()?;
        let version = self.version.unwrap_or(Version::Gfa1);
        self.lines.push(Some(Line::virtual_segment(name, version)?));
        self.segments.insert(name.to_string(), id);
        Ok(())
    }

    fn is_virtual_slot(&self, id: LineId) -> bool {
        self.lines.get(id as usize).and_then(|x| x.as_ref()).is_some_and(|line| line.is_virtual())
    }

    /// Free the placeholder of `name` once nothing references it.
    fn prune_virtual(&mut self, name: &str) {
        let Some(&id) = self.segments.get(name) else { return };
        if self.is_virtual_slot(id) && !self.index.is_referenced(name) {
            self.index.discard_virtual(name);
            self.segments.remove(name);
            self.lines[id as usize] = None;
        }
    }

    fn insert(&mut self, mut line: Line) -> Result<LineId, GfaError> {
        let kind = line.record_type();
        let name = line.name()?;

        if kind == RecordType::Segment {
            let name = name.ok_or_else(|| GfaError::Format("segment without a name".to_string()))?;
            if self.named.contains_key(&name) {
                return Err(GfaError::NotUnique(format!("name {} is already used by another record", name)))
            }
            let id = match self.segments.get(&name) {
                Some(&id) if self.is_virtual_slot(id) => id,
                Some(_) => return Err(GfaError::NotUnique(format!("segment {} is defined more than once", name))),
                None => {
                    let id = self.next_id()?;
                    self.lines.push(None);
                    self.segments.insert(name.clone(), id);
                    id
                },
            };
            line.set_connected(true);
            self.lines[id as usize] = Some(line);
            self.index.adopt(&name);
            self.by_kind.entry(kind).or_default().insert(id);
            return Ok(id)
        }

        if let Some(name) = &name {
            if self.named.contains_key(name) {
                return Err(GfaError::NotUnique(format!("name {} is already used by another record", name)))
            }
            if let Some(&id) = self.segments.get(name) {
                let only_groups = self.index.virtual_kinds(name).iter()
                    .all(|kind| matches!(kind, RecordType::OrderedGroup | RecordType::UnorderedGroup));
                if !self.is_virtual_slot(id) || !only_groups {
                    return Err(GfaError::NotUnique(format!("name {} is already used by a segment", name)))
                }
                // Groups listed the name before the record was defined.
                self.index.discard_virtual(name);
                self.segments.remove(name);
                self.lines[id as usize] = None;
            }
        }

        let refs = self.references_of(&line)?;
        for reference in refs.iter() {
            self.ensure_segment(&reference.name)?;
        }
        let id = self.next_id()?;
        for reference in refs.iter() {
            self.index.add(kind, id, &reference.name, reference.direction, reference.orient)?;
        }
        line.set_connected(true);
        self.lines.push(Some(line));
        self.by_kind.entry(kind).or_default().insert(id);
        if let Some(name) = name {
            self.named.insert(name, id);
        }
        Ok(id)
    }

    /// Remove the record `id`.
    ///
    /// Returns the removed record first, followed by the records removed
    /// with it. Deleting a segment also deletes what depends on it, see
    /// [delete_segment](Graph::delete_segment).
    pub fn delete_line(&mut self, id: LineId) -> Result<Vec<Line>, GfaError> {
        let line = self.real_line(id)?;
        if line.record_type() == RecordType::Segment {
            let name = line.name()?.ok_or_else(|| GfaError::Format("segment without a name".to_string()))?;
            return self.delete_segment(&name)
        }
        self.remove_record(id)
    }

    fn remove_record(&mut self, id: LineId) -> Result<Vec<Line>, GfaError> {
        let (kind, refs, name) = {
            let line = self.real_line(id)?;
            (line.record_type(), self.references_of(line)?, line.name()?)
        };
        for reference in refs.iter() {
            self.index.delete(kind, id, &reference.name, reference.direction, reference.orient);
        }
        let Some(mut line) = self.lines[id as usize].take() else {
            return Err(GfaError::NotFound(format!("no line with id {}", id)))
        };
        if let Some(ids) = self.by_kind.get_mut(&kind) {
            ids.remove(id);
        }
        for reference in refs.iter() {
            self.prune_virtual(&reference.name);
        }
        line.set_connected(false);

        let mut removed = vec![line];
        if let Some(name) = name {
            if self.named.get(&name) == Some(&id) {
                self.named.remove(&name);
                removed.extend(self.drop_from_groups(&name)?);
            }
        }
        Ok(removed)
    }

    /// Drop `name` from the items of group `gid`.
    ///
    /// Returns true if the group has no items left.
    fn remove_group_item(&mut self, gid: LineId, name: &str) -> Result<bool, GfaError> {
        let Some(line) = self.lines.get_mut(gid as usize).and_then(|x| x.as_mut()) else { return Ok(false) };
        let kind = line.record_type();
        let (items, left) = match line.field("items")? {
            Value::OrientedIdentifierList(items) => {
                let kept: Vec<OrientedLine> = items.iter().filter(|x| x.name != name).cloned().collect();
                let left = kept.len();
                (Value::OrientedIdentifierList(kept), left)
            },
            Value::IdentifierList(items) => {
                let kept: Vec<String> = items.iter().filter(|x| *x != name).cloned().collect();
                let left = kept.len();
                (Value::IdentifierList(kept), left)
            },
            other => return Err(GfaError::Type(format!("expected a list of items, found a {}", other.kind()))),
        };
        line.set_unchecked("items", items)?;
        self.index.delete(kind, gid, name, None, None);
        Ok(left == 0)
    }

    /// Remove `name` from every group listing it, deleting emptied groups.
    fn drop_from_groups(&mut self, name: &str) -> Result<Vec<Line>, GfaError> {
        let mut listing: Vec<LineId> = Vec::new();
        for kind in [RecordType::OrderedGroup, RecordType::UnorderedGroup] {
            for gid in self.ids(kind) {
                if self.real_line(gid)?.references()?.iter().any(|x| x.name == name) {
                    listing.push(gid);
                }
            }
        }
        let mut removed = Vec::new();
        for gid in listing {
            if self.line(gid).is_some() && self.remove_group_item(gid, name)? {
                removed.extend(self.remove_record(gid)?);
            }
        }
        Ok(removed)
    }

    /// Delete the segment `name` and the records that depend on it.
    ///
    /// Links, containments, edges, gaps, fragments and paths referencing the
    /// segment are deleted too. Groups only lose the segment from their
    /// items, and are deleted if nothing is left. Returns the segment
    /// followed by the deleted records, none of them connected.
    pub fn delete_segment(&mut self, name: &str) -> Result<Vec<Line>, GfaError> {
        let removed = self.remove_segment(name)?;
        if removed.len() > 1 {
            warn!("Deleting segment {} also deleted {} lines referencing it", name, removed.len() - 1);
        } else {
            debug!("Deleted segment {}", name);
        }
        Ok(removed)
    }

    pub(crate) fn remove_segment(&mut self, name: &str) -> Result<Vec<Line>, GfaError> {
        let id = self.segment_id(name)
            .ok_or_else(|| GfaError::NotFound(format!("segment {} is not in the graph", name)))?;

        let mut dependents: Vec<Line> = Vec::new();
        for (kind, did) in self.index.find_all(name) {
            if matches!(kind, RecordType::OrderedGroup | RecordType::UnorderedGroup) || did == id {
                continue
            }
            if self.line(did).is_some() {
                dependents.extend(self.remove_record(did)?);
            }
        }
        dependents.extend(self.drop_from_groups(name)?);

        let Some(mut segment) = self.lines[id as usize].take() else {
            return Err(GfaError::NotFound(format!("segment {} is not in the graph", name)))
        };
        self.segments.remove(name);
        self.index.forget(name);
        if let Some(ids) = self.by_kind.get_mut(&RecordType::Segment) {
            ids.remove(id);
        }
        segment.set_connected(false);

        let mut removed = vec![segment];
        removed.extend(dependents);
        Ok(removed)
    }

    /// Rename a segment or a named record, updating every reference to it.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), GfaError> {
        if old == new {
            return Ok(())
        }
        if self.is_name_used(new) {
            return Err(GfaError::NotUnique(format!("name {} is already used", new)))
        }

        if let Some(id) = self.segment_id(old) {
            let mut renamed = self.take_line(id)?;
            let field = renamed.schema().name_field.unwrap_or("name");
            let result = renamed.set_unchecked(field, Value::Identifier(new.to_string()));
            self.lines[id as usize] = Some(renamed);
            result?;

            for (_, did) in self.index.find_all(old) {
                if let Some(line) = self.lines.get_mut(did as usize).and_then(|x| x.as_mut()) {
                    line.rename_reference(old, new)?;
                }
            }
            self.index.rename(old, new);
            self.segments.remove(old);
            self.segments.insert(new.to_string(), id);
            debug!("Renamed segment {} to {}", old, new);
            return Ok(())
        }

        if let Some(&id) = self.named.get(old) {
            let mut renamed = self.take_line(id)?;
            let field = renamed.schema().name_field.unwrap_or("name");
            let result = renamed.set_unchecked(field, Value::Identifier(new.to_string()));
            self.lines[id as usize] = Some(renamed);
            result?;

            self.named.remove(old);
            self.named.insert(new.to_string(), id);
            for kind in [RecordType::OrderedGroup, RecordType::UnorderedGroup] {
                for gid in self.ids(kind) {
                    if let Some(line) = self.lines.get_mut(gid as usize).and_then(|x| x.as_mut()) {
                        line.rename_reference(old, new)?;
                    }
                }
            }
            debug!("Renamed {} to {}", old, new);
            return Ok(())
        }

        Err(GfaError::NotFound(format!("no segment or named record is called {}", old)))
    }

    fn take_line(&mut self, id: LineId) -> Result<Line, GfaError> {
        self.real_line(id)?;
        self.lines[id as usize].take().ok_or_else(|| GfaError::NotFound(format!("no line with id {}", id)))
    }

    /// Set a field of record `id`.
    ///
    /// Writing the name of a record renames it. Writing a field that
    /// references segments moves the record in the connection index.
    pub fn set_field(&mut self, id: LineId, name: &str, value: impl Into<Value>) -> Result<(), GfaError> {
        let value = value.into();
        let line = self.real_line(id)?;
        let schema = line.schema();
        let canonical = schema.canonical(name);

        if schema.name_field == Some(canonical) {
            let old = line.name()?.ok_or_else(|| GfaError::Runtime("record has no name".to_string()))?;
            let new = value.as_str()
                .ok_or_else(|| GfaError::Type(format!("expected a name, found a {}", value.kind())))?
                .to_string();
            return self.rename(&old, &new)
        }
        if !schema.is_blocked(canonical) {
            let mut line = self.take_line(id)?;
            let result = line.set_unchecked(name, value);
            self.lines[id as usize] = Some(line);
            return result
        }

        let kind = line.record_type();
        let before = self.references_of(line)?;
        for reference in before.iter() {
            self.index.delete(kind, id, &reference.name, reference.direction, reference.orient);
        }
        let mut line = self.take_line(id)?;
        let result = line.set_unchecked(name, value);
        let after = self.references_of(&line);
        self.lines[id as usize] = Some(line);
        let after = after?;
        for reference in after.iter() {
            self.ensure_segment(&reference.name)?;
            self.index.add(kind, id, &reference.name, reference.direction, reference.orient)?;
        }
        for reference in before.iter() {
            self.prune_virtual(&reference.name);
        }
        result
    }

    /// Links and dovetail edges attached to a segment end.
    pub fn dovetails(&self, end: &SegmentEnd) -> Result<Vec<LineId>, GfaError> {
        let (from, to) = match end.end {
            EndType::End => (Orientation::Forward, Orientation::Reverse),
            EndType::Begin => (Orientation::Reverse, Orientation::Forward),
        };
        let mut found = self.index.find(RecordType::Link, &end.name, Some(Direction::From), Some(from));
        found |= self.index.find(RecordType::Link, &end.name, Some(Direction::To), Some(to));
        for id in self.index.find(RecordType::Edge, &end.name, None, None).iter() {
            if let Some((first, second)) = self.real_line(id)?.dovetail_ends()? {
                if first == *end || second == *end {
                    found.insert(id);
                }
            }
        }
        Ok(found.iter().collect())
    }

    /// Containments and containment edges involving segment `name`.
    pub fn containments(&self, name: &str) -> Result<Vec<LineId>, GfaError> {
        let mut found = self.index.find(RecordType::Containment, name, None, None);
        for id in self.index.find(RecordType::Edge, name, None, None).iter() {
            if self.real_line(id)?.edge_kind()? == EdgeKind::Containment {
                found.insert(id);
            }
        }
        Ok(found.iter().collect())
    }

    /// Number of dovetails on the (left, right) ends of segment `name`.
    pub fn connectivity(&self, name: &str) -> Result<(usize, usize), GfaError> {
        let left = self.dovetails(&SegmentEnd::new(name, EndType::Begin))?.len();
        let right = self.dovetails(&SegmentEnd::new(name, EndType::End))?.len();
        Ok((left, right))
    }

    /// The end a dovetail `id` joins to `end`.
    pub fn other_end(&self, id: LineId, end: &SegmentEnd) -> Result<SegmentEnd, GfaError> {
        let line = self.real_line(id)?;
        let (first, second) = line.dovetail_ends()?
            .ok_or_else(|| GfaError::Runtime(format!("line {} is not a dovetail overlap", id)))?;
        if first == *end {
            Ok(second)
        } else if second == *end {
            Ok(first)
        } else {
            Err(GfaError::NotFound(format!("line {} is not attached to {}", id, end)))
        }
    }

    /// Segments joined to `name` by a dovetail, in the order first seen.
    pub fn neighbours(&self, name: &str) -> Result<Vec<String>, GfaError> {
        let mut found: Vec<String> = Vec::new();
        for end in [EndType::Begin, EndType::End] {
            let end = SegmentEnd::new(name, end);
            for id in self.dovetails(&end)? {
                let other = self.other_end(id, &end)?;
                if !found.contains(&other.name) {
                    found.push(other.name);
                }
            }
        }
        Ok(found)
    }

    fn rebuild_index(&self) -> Result<ConnectionIndex, GfaError> {
        let mut index = ConnectionIndex::default();
        for name in self.segment_names() {
            index.adopt(&name);
        }
        for (id, line) in self.lines() {
            if line.record_type() == RecordType::Segment {
                continue
            }
            for reference in self.references_of(line)? {
                index.add(line.record_type(), id, &reference.name, reference.direction, reference.orient)?;
            }
        }
        Ok(index)
    }

    /// Check every record, that every referenced segment is defined and
    /// that the connection index matches the records.
    pub fn validate(&self) -> Result<(), GfaError> {
        for (id, line) in self.lines() {
            line.validate().map_err(|err| err.context(&format!("line {} ({})", id, line.record_type().code())))?;
        }
        if let Some(name) = self.virtual_segment_names().first() {
            return Err(GfaError::NotFound(format!("segment {} is referenced but not defined", name)))
        }
        self.index.check_consistency(&self.rebuild_index()?)
    }

    /// Queued lines, then headers, then segments, then the rest in slot order.
    fn ordered_lines(&self) -> Vec<&Line> {
        let mut ordered: Vec<&Line> = self.queue.iter().collect();
        for kind in [RecordType::Header, RecordType::Segment] {
            ordered.extend(self.ids(kind).into_iter().filter_map(|id| self.line(id)));
        }
        ordered.extend(self.lines()
            .filter(|(_, line)| !matches!(line.record_type(), RecordType::Header | RecordType::Segment))
            .map(|(_, line)| line));
        ordered
    }

    /// Write the graph as GFA text, one record per line.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<(), GfaError> {
        for line in self.ordered_lines() {
            writeln!(out, "{}", line.to_text()?)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Read a graph from GFA text, inferring its version.
    pub fn from_reader<R: BufRead>(conn: R) -> Result<Self, GfaError> {
        Graph::from_reader_with(conn, None, ValidationLevel::default())
    }

    pub fn from_reader_with<R: BufRead>(
        conn: R,
        version: Option<Version>,
        vlevel: ValidationLevel,
    ) -> Result<Self, GfaError> {
        let mut graph = match version {
            Some(version) => Graph::with_version(version),
            None => Graph::new(),
        }.with_vlevel(vlevel);
        for (i, text) in conn.lines().enumerate() {
            let text = text?;
            if text.trim().is_empty() {
                continue
            }
            graph.add_str(&text).map_err(|err| err.context(&format!("line {}", i + 1)))?;
        }
        graph.finish()?;
        info!("Read {} lines of {}", graph.lines().count(), graph.version.unwrap_or(Version::Gfa1));
        Ok(graph)
    }
}

/// Version declared by the `VN` tag of a header.
fn header_version(line: &Line) -> Result<Option<Version>, GfaError> {
    if line.record_type() != RecordType::Header {
        return Ok(None)
    }
    match line.get("VN")? {
        Some(value) => match value.as_str() {
            Some(text) => Version::from_header_value(text).map(Some),
            None => Err(GfaError::Type(format!("VN tag must be a string, found a {}", value.kind()))),
        },
        None => Ok(None),
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for line in self.ordered_lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// Tests
#[cfg(test)]
mod tests {

    fn graph(text: &str) -> super::Graph {
        super::Graph::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn forward_references_become_virtual() {
        use super::Graph;

        let mut graph = Graph::new();
        graph.add_str("L\t1\t+\t2\t-\t*").unwrap();
        assert_eq!(graph.virtual_segment_names(), vec!["1".to_string(), "2".to_string()]);
        assert!(graph.segment("1").is_none());
        assert_eq!(graph.validate().unwrap_err().kind(), "NotFoundError");

        graph.add_str("S\t1\tACGT").unwrap();
        graph.add_str("S\t2\tGGCC").unwrap();
        assert!(graph.virtual_segment_names().is_empty());
        graph.validate().unwrap();
        assert_eq!(graph.connectivity("1").unwrap(), (0, 1));
        assert_eq!(graph.connectivity("2").unwrap(), (0, 1));
    }

    #[test]
    fn version_is_inferred_from_records() {
        use super::Graph;
        use crate::line::{RecordType, Version};

        let mut graph = Graph::new();
        assert_eq!(graph.add_str("# assembled").unwrap(), None);
        assert_eq!(graph.add_str("H\tTS:i:100").unwrap(), None);
        assert_eq!(graph.version(), None);

        graph.add_str("E\t*\t1+\t2+\t10\t20$\t0\t10\t*").unwrap();
        assert_eq!(graph.version(), Some(Version::Gfa2));
        assert_eq!(graph.ids(RecordType::Comment).len(), 1);
        assert_eq!(graph.ids(RecordType::Header).len(), 1);

        let err = graph.add_str("L\t1\t+\t2\t+\t*").unwrap_err();
        assert_eq!(err.kind(), "VersionError");
    }

    #[test]
    fn header_declares_version() {
        use super::Graph;
        use crate::line::Version;

        let graph = graph("H\tVN:Z:2.0\nS\t1\t4\tACGT\n");
        assert_eq!(graph.version(), Some(Version::Gfa2));
        assert_eq!(graph.segment_length("1"), Some(4));

        let mut gfa1 = Graph::with_version(Version::Gfa1);
        assert_eq!(gfa1.add_str("H\tVN:Z:2.0").unwrap_err().kind(), "VersionError");
    }

    #[test]
    fn unknown_version_defaults_to_gfa1() {
        use crate::line::Version;

        let graph = graph("# only a comment\n");
        assert_eq!(graph.version(), Some(Version::Gfa1));
        assert_eq!(graph.to_string(), "# only a comment\n");
    }

    #[test]
    fn names_are_unique() {
        let mut graph = graph("S\t1\t*\nS\t2\t*\nP\tp1\t1+,2+\t*\n");
        assert_eq!(graph.add_str("S\t1\tACGT").unwrap_err().kind(), "NotUniqueError");
        assert_eq!(graph.add_str("S\tp1\tACGT").unwrap_err().kind(), "NotUniqueError");
        assert_eq!(graph.add_str("P\t1\t2+\t*").unwrap_err().kind(), "NotUniqueError");
    }

    #[test]
    fn delete_segment_cascades() {
        use crate::line::RecordType;

        let mut graph = graph(concat!(
            "S\t1\t*\nS\t2\t*\nS\t3\t*\n",
            "L\t1\t+\t2\t+\t*\nL\t2\t+\t3\t+\t*\nC\t1\t+\t3\t+\t0\t*\n",
            "P\tp1\t1+,2+,3+\t*,*\n",
        ));
        let removed = graph.delete_segment("2").unwrap();
        assert_eq!(removed.len(), 4);
        assert_eq!(removed[0].record_type(), RecordType::Segment);
        assert!(removed.iter().all(|line| !line.is_connected()));

        assert_eq!(graph.ids(RecordType::Link).len(), 0);
        assert_eq!(graph.ids(RecordType::Containment).len(), 1);
        assert_eq!(graph.ids(RecordType::Path).len(), 0);
        assert!(graph.is_name_used("1"));
        assert!(!graph.is_name_used("p1"));
        graph.validate().unwrap();
    }

    #[test]
    fn groups_lose_deleted_items() {
        use crate::line::RecordType;

        let mut graph = graph(concat!(
            "S\ta\t4\tACGT\nS\tb\t4\tACGT\n",
            "E\te1\ta+\tb+\t2\t4$\t0\t2\t2M\n",
            "U\tu1\ta b e1\n",
            "U\tu2\ta\n",
        ));
        graph.validate().unwrap();
        let removed = graph.delete_segment("a").unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(graph.ids(RecordType::UnorderedGroup).len(), 1);
        let u1 = graph.named_id("u1").unwrap();
        assert_eq!(graph.line(u1).unwrap().to_string(), "U\tu1\tb");
        graph.validate().unwrap();
    }

    #[test]
    fn groups_may_list_records_defined_later() {
        let mut graph = graph(concat!(
            "U\tu1\ta e1\n",
            "S\ta\t4\tACGT\nS\tb\t4\tACGT\n",
            "E\te1\ta+\tb+\t2\t4$\t0\t2\t2M\n",
        ));
        graph.validate().unwrap();
        assert!(graph.virtual_segment_names().is_empty());

        let e1 = graph.named_id("e1").unwrap();
        graph.delete_line(e1).unwrap();
        let u1 = graph.named_id("u1").unwrap();
        assert_eq!(graph.line(u1).unwrap().to_string(), "U\tu1\ta");
        graph.validate().unwrap();
    }

    #[test]
    fn rename_updates_references() {
        let mut graph = graph("S\t1\tACGT\nS\t2\tGG\nL\t1\t+\t2\t-\t*\nL\t1\t-\t1\t+\t*\nP\tp1\t1+,2-\t*\n");
        graph.rename("1", "one").unwrap();
        graph.validate().unwrap();
        assert!(graph.segment("1").is_none());
        assert_eq!(graph.segment("one").unwrap().to_string(), "S\tone\tACGT");
        assert_eq!(graph.to_string(), concat!(
            "S\tone\tACGT\nS\t2\tGG\n",
            "L\tone\t+\t2\t-\t*\nL\tone\t-\tone\t+\t*\n",
            "P\tp1\tone+,2-\t*\n",
        ));
        assert_eq!(graph.rename("2", "p1").unwrap_err().kind(), "NotUniqueError");
        assert_eq!(graph.rename("x", "y").unwrap_err().kind(), "NotFoundError");
    }

    #[test]
    fn set_field_reindexes_references() {
        use crate::field::Value;
        use crate::line::RecordType;

        let mut graph = graph("S\t1\t*\nS\t2\t*\nS\t3\t*\nL\t1\t+\t2\t+\t*\n");
        let link = graph.ids(RecordType::Link)[0];

        let err = graph.lines[link as usize].as_mut().unwrap().set("to_segment", "3").unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");

        graph.set_field(link, "to_segment", Value::Identifier("3".to_string())).unwrap();
        graph.validate().unwrap();
        assert_eq!(graph.connectivity("2").unwrap(), (0, 0));
        assert_eq!(graph.connectivity("3").unwrap(), (1, 0));

        graph.set_field(link, "KC", 12).unwrap();
        assert_eq!(graph.line(link).unwrap().to_string(), "L\t1\t+\t3\t+\t*\tKC:i:12");

        graph.set_field(link, "to_segment", Value::Identifier("4".to_string())).unwrap();
        assert_eq!(graph.virtual_segment_names(), vec!["4".to_string()]);
    }

    #[test]
    fn set_field_renames() {
        let mut graph = graph("S\t1\t*\nS\t2\t*\nL\t1\t+\t2\t+\t*\n");
        let id = graph.segment_id("2").unwrap();
        graph.set_field(id, "name", "b").unwrap();
        assert_eq!(graph.neighbours("1").unwrap(), vec!["b".to_string()]);
        graph.validate().unwrap();
    }

    #[test]
    fn dovetails_of_edges() {
        use crate::field::oriented::{EndType, SegmentEnd};

        let graph = graph(concat!(
            "S\t1\t100\t*\nS\t2\t50\t*\nS\t3\t20\t*\n",
            "E\t*\t1+\t2+\t90\t100$\t0\t10\t10M\n",
            "E\t*\t1+\t3+\t10\t30\t0\t20$\t20M\n",
        ));
        assert_eq!(graph.dovetails(&SegmentEnd::new("1", EndType::End)).unwrap().len(), 1);
        assert_eq!(graph.dovetails(&SegmentEnd::new("2", EndType::Begin)).unwrap().len(), 1);
        assert_eq!(graph.containments("3").unwrap().len(), 1);
        assert_eq!(graph.neighbours("1").unwrap(), vec!["2".to_string()]);
    }

    #[test]
    fn write_orders_headers_and_segments_first() {
        let graph = graph("L\t1\t+\t2\t+\t*\nS\t2\t*\nH\tVN:Z:1.0\nS\t1\t*\n");
        let mut out: Vec<u8> = Vec::new();
        graph.write(&mut out).unwrap();
        // Segment 1 fills the slot taken when the link referenced it.
        assert_eq!(String::from_utf8(out).unwrap(), "H\tVN:Z:1.0\nS\t1\t*\nS\t2\t*\nL\t1\t+\t2\t+\t*\n");
    }

    #[test]
    fn read_errors_name_the_line() {
        use super::Graph;

        let err = Graph::from_reader("S\t1\t*\n\nL\t1\t+\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "FormatError");
        assert!(err.to_string().contains("line 3"));
    }
}
