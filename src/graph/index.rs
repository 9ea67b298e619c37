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

//! Reverse lookup from segment names to the records referencing them.
//!
//! Links, containments, edges, gaps and fragments are stored under the
//! direction and orientation of the reference. Paths and groups only list
//! segments and are stored in a flat set per record type.
//!
//! References to names that are not (yet) real segments are kept in a
//! separate table of virtual segments until the segment is defined, see
//! [adopt](ConnectionIndex::adopt).
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::graph::index::ConnectionIndex;
//! use gfaedit::line::RecordType;
//! use gfaedit::line::references::Direction;
//! use gfaedit::field::oriented::Orientation;
//!
//! let mut index = ConnectionIndex::default();
//! index.add(RecordType::Link, 3, "s1", Some(Direction::From), Some(Orientation::Forward)).unwrap();
//! assert!(index.is_virtual("s1"));
//!
//! assert!(index.adopt("s1"));
//! assert!(!index.adopt("s1"));
//! assert_eq!(index.find(RecordType::Link, "s1", None, None).iter().collect::<Vec<u32>>(), vec![3]);
//! ```
//!

use std::collections::{BTreeSet, HashMap};

use roaring::RoaringBitmap;

use crate::error::GfaError;
use crate::field::oriented::Orientation;
use crate::line::references::Direction;
use crate::line::RecordType;

const DIRECTIONS: [Direction; 2] = [Direction::From, Direction::To];
const ORIENTATIONS: [Orientation; 2] = [Orientation::Forward, Orientation::Reverse];

/// One referenced record: (segment, virtual, kind, direction, orientation, record).
type Slot = (String, bool, RecordType, Option<Direction>, Option<Orientation>, u32);

#[derive(Clone, Debug, Default)]
struct Entry {
    /// Indexed by [direction][orientation].
    sided: HashMap<RecordType, [[RoaringBitmap; 2]; 2]>,
    listed: HashMap<RecordType, RoaringBitmap>,
}

impl Entry {
    fn is_empty(&self) -> bool {
        self.sided.values().all(|slots| slots.iter().flatten().all(|ids| ids.is_empty()))
            && self.listed.values().all(|ids| ids.is_empty())
    }

    fn kinds(&self) -> Vec<RecordType> {
        let mut kinds: Vec<RecordType> = self.sided.iter()
            .filter(|(_, slots)| slots.iter().flatten().any(|ids| !ids.is_empty()))
            .map(|(kind, _)| *kind)
            .chain(self.listed.iter().filter(|(_, ids)| !ids.is_empty()).map(|(kind, _)| *kind))
            .collect();
        kinds.sort();
        kinds
    }

    fn slots(
        &self,
        name: &str,
        is_virtual: bool,
        out: &mut BTreeSet<Slot>,
    ) {
        for (kind, slots) in self.sided.iter() {
            for direction in DIRECTIONS {
                for orient in ORIENTATIONS {
                    for id in slots[direction.index()][orient.index()].iter() {
                        out.insert((name.to_string(), is_virtual, *kind, Some(direction), Some(orient), id));
                    }
                }
            }
        }
        for (kind, ids) in self.listed.iter() {
            for id in ids.iter() {
                out.insert((name.to_string(), is_virtual, *kind, None, None, id));
            }
        }
    }
}

/// Records referencing each segment.
#[derive(Clone, Debug, Default)]
pub struct ConnectionIndex {
    segments: HashMap<String, Entry>,
    virtual_segments: HashMap<String, Entry>,
}

impl ConnectionIndex {
    /// Register `name` as a real segment.
    ///
    /// References stored while the segment was virtual are moved to it.
    /// Returns true if there was a virtual entry to adopt. Registering the
    /// same segment again does nothing.
    pub fn adopt(
        &mut self,
        name: &str,
    ) -> bool {
        if self.segments.contains_key(name) {
            return false
        }
        let adopted = self.virtual_segments.remove(name);
        let found = adopted.is_some();
        self.segments.insert(name.to_string(), adopted.unwrap_or_default());
        found
    }

    pub fn is_real(
        &self,
        name: &str,
    ) -> bool {
        self.segments.contains_key(name)
    }

    /// True if `name` is referenced but not a real segment.
    pub fn is_virtual(
        &self,
        name: &str,
    ) -> bool {
        !self.segments.contains_key(name) && self.virtual_segments.contains_key(name)
    }

    fn entry(
        &self,
        name: &str,
    ) -> Option<&Entry> {
        self.segments.get(name).or_else(|| self.virtual_segments.get(name))
    }

    fn entry_mut(
        &mut self,
        name: &str,
    ) -> &mut Entry {
        if self.segments.contains_key(name) {
            self.segments.entry(name.to_string()).or_default()
        } else {
            self.virtual_segments.entry(name.to_string()).or_default()
        }
    }

    /// Record that record `id` of `kind` references segment `name`.
    ///
    /// Direction and orientation are required except for paths and groups.
    pub fn add(
        &mut self,
        kind: RecordType,
        id: u32,
        name: &str,
        direction: Option<Direction>,
        orient: Option<Orientation>,
    ) -> Result<(), GfaError> {
        if kind.is_path_like() {
            self.entry_mut(name).listed.entry(kind).or_default().insert(id);
            return Ok(())
        }
        let (Some(direction), Some(orient)) = (direction, orient) else {
            return Err(GfaError::Runtime(format!(
                "{} records must be indexed with a direction and an orientation", kind.code()
            )))
        };
        self.entry_mut(name).sided.entry(kind).or_default()[direction.index()][orient.index()].insert(id);
        Ok(())
    }

    /// Remove a reference added with [add](ConnectionIndex::add).
    ///
    /// A missing direction or orientation removes the record from both.
    pub fn delete(
        &mut self,
        kind: RecordType,
        id: u32,
        name: &str,
        direction: Option<Direction>,
        orient: Option<Orientation>,
    ) {
        let entry = match self.segments.get_mut(name) {
            Some(entry) => entry,
            None => match self.virtual_segments.get_mut(name) {
                Some(entry) => entry,
                None => return,
            },
        };
        if kind.is_path_like() {
            if let Some(ids) = entry.listed.get_mut(&kind) {
                ids.remove(id);
            }
            return
        }
        if let Some(slots) = entry.sided.get_mut(&kind) {
            for d in DIRECTIONS.iter().filter(|d| direction.is_none_or(|x| x == **d)) {
                for o in ORIENTATIONS.iter().filter(|o| orient.is_none_or(|x| x == **o)) {
                    slots[d.index()][o.index()].remove(id);
                }
            }
        }
    }

    /// Records of `kind` referencing `name`.
    ///
    /// A missing direction or orientation matches both.
    pub fn find(
        &self,
        kind: RecordType,
        name: &str,
        direction: Option<Direction>,
        orient: Option<Orientation>,
    ) -> RoaringBitmap {
        let mut found = RoaringBitmap::new();
        let Some(entry) = self.entry(name) else { return found };
        if kind.is_path_like() {
            if let Some(ids) = entry.listed.get(&kind) {
                found |= ids;
            }
            return found
        }
        if let Some(slots) = entry.sided.get(&kind) {
            for d in DIRECTIONS.iter().filter(|d| direction.is_none_or(|x| x == **d)) {
                for o in ORIENTATIONS.iter().filter(|o| orient.is_none_or(|x| x == **o)) {
                    found |= &slots[d.index()][o.index()];
                }
            }
        }
        found
    }

    /// Every record referencing `name`, with its kind, ordered by record.
    pub fn find_all(
        &self,
        name: &str,
    ) -> Vec<(RecordType, u32)> {
        let Some(entry) = self.entry(name) else { return Vec::new() };
        let mut found: Vec<(u32, RecordType)> = Vec::new();
        for kind in entry.kinds() {
            found.extend(self.find(kind, name, None, None).iter().map(|id| (id, kind)));
        }
        found.sort();
        found.dedup();
        found.into_iter().map(|(id, kind)| (kind, id)).collect()
    }

    /// True if any record references `name`.
    pub fn is_referenced(
        &self,
        name: &str,
    ) -> bool {
        self.entry(name).is_some_and(|entry| !entry.is_empty())
    }

    /// Record types referencing the virtual segment `name`.
    pub fn virtual_kinds(
        &self,
        name: &str,
    ) -> Vec<RecordType> {
        self.virtual_segments.get(name).map(|entry| entry.kinds()).unwrap_or_default()
    }

    /// Names referenced without a real segment, sorted.
    pub fn virtual_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.virtual_segments.iter()
            .filter(|(_, entry)| !entry.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Drop the virtual entry of `name` with all its references.
    pub fn discard_virtual(
        &mut self,
        name: &str,
    ) -> bool {
        self.virtual_segments.remove(name).is_some()
    }

    /// Drop the entry of a removed real segment.
    pub fn forget(
        &mut self,
        name: &str,
    ) -> bool {
        self.segments.remove(name).is_some()
    }

    /// Move the references of `old` to `new`.
    pub fn rename(
        &mut self,
        old: &str,
        new: &str,
    ) {
        if let Some(entry) = self.segments.remove(old) {
            self.segments.insert(new.to_string(), entry);
        } else if let Some(entry) = self.virtual_segments.remove(old) {
            self.virtual_segments.insert(new.to_string(), entry);
        }
    }

    fn slots(&self) -> BTreeSet<Slot> {
        let mut slots = BTreeSet::new();
        for (name, entry) in self.segments.iter() {
            entry.slots(name, false, &mut slots);
        }
        for (name, entry) in self.virtual_segments.iter() {
            entry.slots(name, true, &mut slots);
        }
        slots
    }

    /// Compare against an index rebuilt from the records of a graph.
    ///
    /// Fails on the first reference present in only one of the two.
    pub fn check_consistency(
        &self,
        expected: &ConnectionIndex,
    ) -> Result<(), GfaError> {
        let ours = self.slots();
        let theirs = expected.slots();
        if let Some((name, _, kind, direction, orient, id)) = ours.difference(&theirs).next() {
            return Err(GfaError::Inconsistency(format!(
                "index lists {} record {} under segment {} ({:?}, {:?}) but the record does not reference it that way",
                kind.code(), id, name, direction, orient
            )))
        }
        if let Some((name, _, kind, direction, orient, id)) = theirs.difference(&ours).next() {
            return Err(GfaError::Inconsistency(format!(
                "{} record {} references segment {} ({:?}, {:?}) but is missing from the index",
                kind.code(), id, name, direction, orient
            )))
        }
        Ok(())
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn find_aggregates_orientations() {
        use super::ConnectionIndex;
        use crate::field::oriented::Orientation;
        use crate::line::references::Direction;
        use crate::line::RecordType;

        let mut index = ConnectionIndex::default();
        index.adopt("a");
        index.add(RecordType::Link, 1, "a", Some(Direction::From), Some(Orientation::Forward)).unwrap();
        index.add(RecordType::Link, 2, "a", Some(Direction::From), Some(Orientation::Reverse)).unwrap();
        index.add(RecordType::Link, 3, "a", Some(Direction::To), Some(Orientation::Forward)).unwrap();

        let got: Vec<u32> = index.find(RecordType::Link, "a", Some(Direction::From), None).iter().collect();
        assert_eq!(got, vec![1, 2]);
        let got: Vec<u32> = index.find(RecordType::Link, "a", None, Some(Orientation::Forward)).iter().collect();
        assert_eq!(got, vec![1, 3]);
        assert!(index.find(RecordType::Containment, "a", None, None).is_empty());
    }

    #[test]
    fn delete_without_orientation() {
        use super::ConnectionIndex;
        use crate::field::oriented::Orientation;
        use crate::line::references::Direction;
        use crate::line::RecordType;

        let mut index = ConnectionIndex::default();
        index.adopt("a");
        index.add(RecordType::Link, 1, "a", Some(Direction::From), Some(Orientation::Forward)).unwrap();
        index.add(RecordType::Link, 1, "a", Some(Direction::To), Some(Orientation::Reverse)).unwrap();
        index.delete(RecordType::Link, 1, "a", Some(Direction::From), None);

        let got: Vec<u32> = index.find(RecordType::Link, "a", None, None).iter().collect();
        assert_eq!(got, vec![1]);
        index.delete(RecordType::Link, 1, "a", None, None);
        assert!(!index.is_referenced("a"));
    }

    #[test]
    fn path_like_kinds_are_flat() {
        use super::ConnectionIndex;
        use crate::line::RecordType;

        let mut index = ConnectionIndex::default();
        index.add(RecordType::Path, 7, "a", None, None).unwrap();
        index.add(RecordType::UnorderedGroup, 8, "a", None, None).unwrap();
        assert_eq!(index.find_all("a"), vec![(RecordType::Path, 7), (RecordType::UnorderedGroup, 8)]);
        assert!(index.add(RecordType::Link, 9, "a", None, None).is_err());
    }

    #[test]
    fn virtual_segments_are_adopted_once() {
        use super::ConnectionIndex;
        use crate::field::oriented::Orientation;
        use crate::line::references::Direction;
        use crate::line::RecordType;

        let mut index = ConnectionIndex::default();
        index.add(RecordType::Link, 1, "b", Some(Direction::To), Some(Orientation::Forward)).unwrap();
        assert_eq!(index.virtual_names(), vec!["b".to_string()]);
        assert_eq!(index.virtual_kinds("b"), vec![RecordType::Link]);

        assert!(index.adopt("b"));
        assert!(!index.adopt("b"));
        assert!(index.is_real("b"));
        assert!(index.virtual_names().is_empty());
        assert_eq!(index.find(RecordType::Link, "b", Some(Direction::To), Some(Orientation::Forward)).len(), 1);
    }

    #[test]
    fn consistency_check_reports_differences() {
        use super::ConnectionIndex;
        use crate::field::oriented::Orientation;
        use crate::line::references::Direction;
        use crate::line::RecordType;

        let mut index = ConnectionIndex::default();
        index.adopt("a");
        index.add(RecordType::Link, 1, "a", Some(Direction::From), Some(Orientation::Forward)).unwrap();
        let expected = index.clone();
        assert!(index.check_consistency(&expected).is_ok());

        index.add(RecordType::Link, 2, "a", Some(Direction::From), Some(Orientation::Forward)).unwrap();
        let err = index.check_consistency(&expected).unwrap_err();
        assert_eq!(err.kind(), "InconsistencyError");
    }

    #[test]
    fn rename_moves_references() {
        use super::ConnectionIndex;
        use crate::line::RecordType;

        let mut index = ConnectionIndex::default();
        index.adopt("a");
        index.add(RecordType::Path, 1, "a", None, None).unwrap();
        index.rename("a", "z");
        assert!(index.is_real("z"));
        assert!(!index.is_referenced("a"));
        assert_eq!(index.find(RecordType::Path, "z", None, None).len(), 1);
    }
}
