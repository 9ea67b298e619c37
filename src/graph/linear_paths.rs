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

//! Unbranched chains of segments and merging them into one segment.
//!
//! A chain is a list of [SegmentEnd]s, one per segment, holding the end the
//! chain leaves the segment from. A segment left from its
//! [Begin](EndType::Begin) end is read reverse complemented.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::graph::Graph;
//! use gfaedit::graph::naming::Naming;
//!
//! let mut graph = Graph::from_reader("S\ta\tACGT\nS\tb\tGTCC\nL\ta\t+\tb\t+\t2M\n".as_bytes()).unwrap();
//!
//! let merged = graph.merge_linear_paths(&Naming::Joined, false).unwrap();
//! assert_eq!(merged, vec!["a_b".to_string()]);
//! assert_eq!(graph.to_string(), "S\ta_b\tACGTCC\n");
//! ```
//!

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, info, warn};

use crate::error::GfaError;
use crate::field::oriented::{EndType, Orientation, OrientedLine, SegmentEnd};
use crate::field::position::Position;
use crate::field::sequence::reverse_complement;
use crate::field::Value;
use crate::graph::naming::Naming;
use crate::graph::{Graph, LineId, COUNT_TAGS};
use crate::line::references::Direction;
use crate::line::{Line, RecordType, Version};

fn position(line: &Line, field: &str) -> Result<i64, GfaError> {
    line.field(field)?.as_position().map(|x| x.value())
        .ok_or_else(|| GfaError::Type(format!("{} of an edge is not a position", field)))
}

/// Copy a dovetail of the chain, moving the ends found in `ends` to the
/// merged segment.
///
/// `ends` maps an outer end of the chain to the end of the merged segment
/// it becomes and whether its segment was read reverse complemented.
fn reattach(
    line: &Line,
    merged: &str,
    merged_length: i64,
    ends: &HashMap<SegmentEnd, (EndType, bool)>,
) -> Result<Line, GfaError> {
    let (first, second) = line.dovetail_ends()?
        .ok_or_else(|| GfaError::Runtime(format!("{} is not a dovetail overlap", line)))?;
    let mut copy = line.clone();
    for (direction, touched) in [(Direction::From, first), (Direction::To, second)] {
        let Some(&(end, reversed)) = ends.get(&touched) else { continue };
        if line.record_type() == RecordType::Link {
            let orient = match (direction, end) {
                (Direction::From, EndType::End) | (Direction::To, EndType::Begin) => Orientation::Forward,
                _ => Orientation::Reverse,
            };
            copy.set_side(direction, &OrientedLine::new(merged, orient))?;
            continue
        }
        let (beg, fin) = match direction {
            Direction::From => ("beg1", "end1"),
            Direction::To => ("beg2", "end2"),
        };
        let overlap = position(line, fin)? - position(line, beg)?;
        let (from, to) = match end {
            EndType::Begin => (0, overlap),
            EndType::End => (merged_length - overlap, merged_length),
        };
        let side = line.side(direction)?;
        let orient = if reversed { side.orient.invert() } else { side.orient };
        copy.set_side(direction, &OrientedLine::new(merged, orient))?;
        copy.set_unchecked(beg, Value::Position(Position::new_trusted(from, from == merged_length)))?;
        copy.set_unchecked(fin, Value::Position(Position::new_trusted(to, to == merged_length)))?;
    }
    Ok(copy)
}

impl Graph {
    /// Walk from the exit end `start` while the walk can not branch.
    fn extend(
        &self,
        start: SegmentEnd,
        excluded: &mut HashSet<String>,
    ) -> Result<Vec<SegmentEnd>, GfaError> {
        let mut walked: Vec<SegmentEnd> = Vec::new();
        let mut current = start;
        loop {
            let dovetails = self.dovetails(&current)?;
            if dovetails.len() != 1 {
                break
            }
            let entered = self.other_end(dovetails[0], &current)?;
            if excluded.contains(&entered.name) || self.dovetails(&entered)?.len() != 1 {
                break
            }
            excluded.insert(entered.name.clone());
            current = entered.invert();
            walked.push(current.clone());
        }
        Ok(walked)
    }

    /// The longest unbranched chain through segment `seed`.
    ///
    /// Segments in `excluded` are not entered, and the segments of the
    /// chain are added to it. Returns None if no neighbour of `seed` can
    /// join it in a chain.
    pub fn linear_path(
        &self,
        seed: &str,
        excluded: &mut HashSet<String>,
    ) -> Result<Option<Vec<SegmentEnd>>, GfaError> {
        if self.segment_id(seed).is_none() {
            return Err(GfaError::NotFound(format!("segment {} is not in the graph", seed)))
        }
        excluded.insert(seed.to_string());
        let right = self.extend(SegmentEnd::new(seed, EndType::End), excluded)?;
        let left = self.extend(SegmentEnd::new(seed, EndType::Begin), excluded)?;

        let mut chain: Vec<SegmentEnd> = left.iter().rev().map(|x| x.invert()).collect();
        chain.push(SegmentEnd::new(seed, EndType::End));
        chain.extend(right);
        if chain.len() < 2 {
            return Ok(None)
        }
        Ok(Some(chain))
    }

    /// Every chain of two or more segments, each segment in at most one.
    pub fn linear_paths(&self) -> Result<Vec<Vec<SegmentEnd>>, GfaError> {
        let mut excluded: HashSet<String> = HashSet::new();
        let mut chains = Vec::new();
        for name in self.segment_names() {
            if excluded.contains(&name) {
                continue
            }
            if let Some(chain) = self.linear_path(&name, &mut excluded)? {
                chains.push(chain);
            }
        }
        debug!("Found {} linear paths", chains.len());
        Ok(chains)
    }

    /// Replace the segments of `chain` with one segment.
    ///
    /// Overlaps between consecutive segments must be exact matches and are
    /// kept once. Count tags are summed, and with `cut_counts` each segment
    /// only contributes the share of its count on the bases it keeps.
    /// Dovetails on the two outer ends are moved to the new segment. Other
    /// records referencing the merged segments are deleted.
    ///
    /// The chain is checked before the graph is changed.
    pub fn merge_linear_path(
        &mut self,
        chain: &[SegmentEnd],
        naming: &Naming,
        cut_counts: bool,
    ) -> Result<String, GfaError> {
        if chain.len() < 2 {
            return Err(GfaError::Value("a linear path has at least two segments".to_string()))
        }
        let names: Vec<String> = chain.iter().map(|x| x.name.clone()).collect();
        for (i, name) in names.iter().enumerate() {
            if self.segment_id(name).is_none() {
                return Err(GfaError::NotFound(format!("segment {} is not in the graph", name)))
            }
            if names[..i].contains(name) {
                return Err(GfaError::Value(format!("segment {} is in the linear path twice", name)))
            }
        }

        let mut junctions: Vec<LineId> = Vec::with_capacity(chain.len() - 1);
        let mut overlaps: Vec<i64> = Vec::with_capacity(chain.len() - 1);
        for pair in chain.windows(2) {
            let exit = &pair[0];
            let entry = pair[1].invert();
            let dovetails = self.dovetails(exit)?;
            if dovetails.len() != 1 || self.dovetails(&entry)?.len() != 1 || self.other_end(dovetails[0], exit)? != entry {
                return Err(GfaError::Runtime(format!("{} and {} are not joined by a single dovetail", exit, entry)))
            }
            let overlap = self.real_line(dovetails[0])?.overlap_lengths()?
                .ok_or_else(|| GfaError::Value(format!("overlap between {} and {} is not mergeable", exit, entry)))?;
            junctions.push(dovetails[0]);
            overlaps.push(overlap.0 as i64);
        }

        let mut sequence: Option<String> = Some(String::new());
        let mut length: Option<i64> = Some(0);
        let mut has_length_tag = false;
        let mut counts: [Option<i64>; 3] = [None; 3];
        for (i, element) in chain.iter().enumerate() {
            let segment = self.segment(&element.name)
                .ok_or_else(|| GfaError::NotFound(format!("segment {} is not in the graph", element.name)))?;
            let trim = if i == 0 { 0 } else { overlaps[i - 1] };
            let segment_length = segment.segment_length()?;
            if segment_length.is_some_and(|x| trim > x) {
                return Err(GfaError::Value(format!("overlap of {} bases is longer than segment {}", trim, element.name)))
            }
            length = match (length, segment_length) {
                (Some(total), Some(x)) => Some(total + x - trim),
                _ => None,
            };
            has_length_tag |= segment.version() == Version::Gfa1 && segment.get("LN")?.is_some();
            sequence = match (sequence, segment.sequence()?) {
                (Some(mut merged), Some(bases)) => {
                    let oriented = if element.end == EndType::Begin { reverse_complement(bases) } else { bases.to_string() };
                    let kept = oriented.get(trim as usize..)
                        .ok_or_else(|| GfaError::Value(format!("overlap of {} bases is longer than segment {}", trim, element.name)))?;
                    merged.push_str(kept);
                    Some(merged)
                },
                _ => None,
            };
            for (total, tag) in counts.iter_mut().zip(COUNT_TAGS) {
                if let Some(count) = segment.get(tag)?.and_then(|x| x.as_i64()) {
                    let count = match segment_length {
                        Some(x) if cut_counts && x > 0 => count * (x - trim) / x,
                        _ => count,
                    };
                    *total = Some(total.unwrap_or(0) + count);
                }
            }
        }

        let name = self.merged_name(&names, naming)?;
        let version = self.version.unwrap_or(Version::Gfa1);
        let bases = match &sequence {
            Some(bases) if !bases.is_empty() => Value::String(bases.clone()),
            _ => Value::Placeholder,
        };
        let mut merged = match version {
            Version::Gfa2 => {
                let length = length.ok_or_else(|| GfaError::Runtime(format!("length of merged segment {} is unknown", name)))?;
                Line::with_vlevel(RecordType::Segment, Version::Gfa2, vec![Value::Identifier(name.clone()), Value::Integer(length), bases], self.vlevel)?
            },
            _ => {
                let mut line = Line::with_vlevel(RecordType::Segment, Version::Gfa1, vec![Value::Identifier(name.clone()), bases], self.vlevel)?;
                if let Some(length) = length {
                    if has_length_tag || sequence.is_none() {
                        line.set_unchecked("LN", Value::Integer(length))?;
                    }
                }
                line
            },
        };
        for (tag, count) in COUNT_TAGS.iter().zip(counts) {
            if let Some(count) = count {
                merged.set_unchecked(tag, Value::Integer(count))?;
            }
        }

        let last = chain.len() - 1;
        let first_outer = chain[0].invert();
        let last_outer = chain[last].clone();
        let mut ends: HashMap<SegmentEnd, (EndType, bool)> = HashMap::new();
        ends.insert(first_outer.clone(), (EndType::Begin, chain[0].end == EndType::Begin));
        ends.insert(last_outer.clone(), (EndType::End, chain[last].end == EndType::Begin));
        let mut outer: BTreeSet<LineId> = BTreeSet::new();
        outer.extend(self.dovetails(&first_outer)?);
        outer.extend(self.dovetails(&last_outer)?);
        let merged_length = length.unwrap_or(0);
        let reattached = outer.iter()
            .map(|id| reattach(self.real_line(*id)?, &name, merged_length, &ends))
            .collect::<Result<Vec<Line>, GfaError>>()?;

        let mut lost: BTreeSet<LineId> = BTreeSet::new();
        for member in names.iter() {
            for (_, id) in self.index().find_all(member) {
                if !outer.contains(&id) && !junctions.contains(&id) {
                    lost.insert(id);
                }
            }
        }
        if !lost.is_empty() {
            warn!("Merging into {} deletes {} lines referencing the merged segments", name, lost.len());
        }

        for member in names.iter() {
            self.remove_segment(member)?;
        }
        self.add_line(merged)?;
        for line in reattached {
            self.add_line(line)?;
        }
        info!("Merged {} segments into {}", chain.len(), name);
        Ok(name)
    }

    /// Merge every linear path until none are left.
    ///
    /// Explicit names are used one per merged path in the order the paths
    /// are found. Returns the names of the new segments.
    pub fn merge_linear_paths(
        &mut self,
        naming: &Naming,
        cut_counts: bool,
    ) -> Result<Vec<String>, GfaError> {
        let mut merged: Vec<String> = Vec::new();
        loop {
            let chains = self.linear_paths()?;
            if chains.is_empty() {
                break
            }
            for chain in chains {
                let naming = match naming {
                    Naming::Explicit(names) => {
                        let name = names.get(merged.len())
                            .ok_or_else(|| GfaError::Value(format!("no name given for linear path {}", merged.len() + 1)))?;
                        Naming::Explicit(vec![name.clone()])
                    },
                    other => other.clone(),
                };
                merged.push(self.merge_linear_path(&chain, &naming, cut_counts)?);
            }
        }
        Ok(merged)
    }
}

// Tests
#[cfg(test)]
mod tests {

    fn graph(text: &str) -> crate::graph::Graph {
        crate::graph::Graph::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn merge_with_reverse_complement() {
        use crate::graph::naming::Naming;

        let mut graph = graph(concat!(
            "S\t0\tACGTA\nS\t1\tTAGGC\nS\t2\tATTGC\nS\t3\tTCCG\n",
            "L\t0\t+\t1\t+\t2M\n",
            "L\t1\t+\t2\t-\t2M\n",
            "L\t2\t-\t3\t+\t1M\n",
        ));
        let chains = graph.linear_paths().unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 4);

        let name = graph.merge_linear_path(&chains[0], &Naming::Joined, false).unwrap();
        assert_eq!(name, "0_1_2_3");
        assert_eq!(graph.to_string(), "S\t0_1_2_3\tACGTAGGCAATCCG\n");
        graph.validate().unwrap();
    }

    #[test]
    fn chains_start_from_any_member() {
        use std::collections::HashSet;
        use crate::field::oriented::{EndType, SegmentEnd};

        let graph = graph("S\ta\t*\nS\tb\t*\nS\tc\t*\nL\ta\t+\tb\t-\t*\nL\tb\t-\tc\t+\t*\n");
        let mut excluded = HashSet::new();
        let chain = graph.linear_path("b", &mut excluded).unwrap().unwrap();
        assert_eq!(chain, vec![
            SegmentEnd::new("c", EndType::Begin),
            SegmentEnd::new("b", EndType::End),
            SegmentEnd::new("a", EndType::Begin),
        ]);
        assert_eq!(excluded.len(), 3);
        assert!(graph.linear_path("a", &mut excluded).unwrap().is_none());
    }

    #[test]
    fn branches_end_chains() {
        use crate::graph::naming::Naming;

        let mut graph = graph(concat!(
            "S\tx\tTTAC\nS\tw\tGGAC\nS\ta\tACGT\tRC:i:10\nS\tb\tGTCC\tRC:i:20\nS\ty\tCCAA\nS\tz\tCCTT\n",
            "L\tx\t+\ta\t+\t2M\n",
            "L\tw\t+\ta\t+\t2M\n",
            "L\ta\t+\tb\t+\t2M\n",
            "L\tb\t+\ty\t+\t2M\n",
            "L\tb\t+\tz\t+\t2M\n",
        ));
        let chains = graph.linear_paths().unwrap();
        assert_eq!(chains.len(), 1);

        let merged = graph.merge_linear_paths(&Naming::Joined, true).unwrap();
        assert_eq!(merged, vec!["a_b".to_string()]);
        assert_eq!(graph.segment("a_b").unwrap().to_string(), "S\ta_b\tACGTCC\tRC:i:20");

        let mut neighbours = graph.neighbours("a_b").unwrap();
        neighbours.sort();
        assert_eq!(neighbours, vec!["w", "x", "y", "z"]);
        assert_eq!(graph.connectivity("a_b").unwrap(), (2, 2));
        assert!(graph.linear_paths().unwrap().is_empty());
        graph.validate().unwrap();
    }

    #[test]
    fn counts_are_summed_without_cutting() {
        use crate::graph::naming::{Naming, SuffixStyle};

        let mut graph = graph("S\ta\tACGT\tRC:i:10\tLN:i:4\nS\tb\tGTCC\tRC:i:20\nL\ta\t+\tb\t+\t2M\n");
        let merged = graph.merge_linear_paths(&Naming::Suffix(SuffixStyle::Numeric), false).unwrap();
        assert_eq!(merged, vec!["a_2".to_string()]);
        assert_eq!(graph.to_string(), "S\ta_2\tACGTCC\tLN:i:6\tRC:i:30\n");
    }

    #[test]
    fn gfa2_edges_are_moved() {
        use crate::graph::naming::Naming;

        let mut graph = graph(concat!(
            "S\ta\t4\tACGT\nS\tb\t4\tAAAC\nS\tc\t4\tGGGA\nS\td\t4\tTTTA\n",
            "E\te1\ta+\tb-\t2\t4$\t2\t4$\t2M\n",
            "E\te2\tc+\tb+\t3\t4$\t0\t1\t1M\n",
            "E\te3\td+\tb+\t3\t4$\t0\t1\t1M\n",
        ));
        let merged = graph.merge_linear_paths(&Naming::Joined, false).unwrap();
        assert_eq!(merged, vec!["a_b".to_string()]);
        assert_eq!(graph.segment("a_b").unwrap().to_string(), "S\ta_b\t6\tACGTTT");

        let e2 = graph.named_id("e2").unwrap();
        assert_eq!(graph.line(e2).unwrap().to_string(), "E\te2\tc+\ta_b-\t3\t4$\t5\t6$\t1M");
        assert!(graph.named_id("e1").is_none());
        graph.validate().unwrap();
    }

    #[test]
    fn unmergeable_overlaps_leave_the_graph_unchanged() {
        use crate::graph::naming::Naming;

        let mut graph = graph("S\ta\tACGT\nS\tb\tGTCC\nS\tc\tCCAA\nL\ta\t+\tb\t+\t2M\nL\tb\t+\tc\t+\t1M1I1M\n");
        let chain = graph.linear_paths().unwrap().remove(0);
        let before = graph.to_string();
        let err = graph.merge_linear_path(&chain, &Naming::Joined, false).unwrap_err();
        assert_eq!(err.kind(), "ValueError");
        assert_eq!(graph.to_string(), before);
    }

    #[test]
    fn lossy_merge_deletes_paths() {
        use crate::graph::naming::Naming;
        use crate::line::RecordType;

        let mut graph = graph("S\ta\tACGT\nS\tb\tGTCC\nL\ta\t+\tb\t+\t2M\nP\tp\ta+,b+\t2M\n");
        graph.merge_linear_paths(&Naming::Explicit(vec!["ab".to_string()]), false).unwrap();
        assert!(graph.ids(RecordType::Path).is_empty());
        assert_eq!(graph.to_string(), "S\tab\tACGTCC\n");
    }

    #[test]
    fn circular_chains_keep_the_closing_link() {
        use crate::graph::naming::Naming;

        let mut graph = graph("S\ta\tACGT\nS\tb\tGTCA\nL\ta\t+\tb\t+\t2M\nL\tb\t+\ta\t+\t2M\n");
        let merged = graph.merge_linear_paths(&Naming::Joined, false).unwrap();
        assert_eq!(merged, vec!["a_b".to_string()]);
        assert_eq!(graph.to_string(), "S\ta_b\tACGTCA\nL\ta_b\t+\ta_b\t+\t2M\n");
        graph.validate().unwrap();
    }
}
