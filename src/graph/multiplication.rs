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

//! Copies of a segment that split its counts.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::graph::Graph;
//! use gfaedit::graph::naming::{Naming, SuffixStyle};
//!
//! let mut graph = Graph::from_reader("S\t1\tACGT\tRC:i:6000\nS\t2\tGG\nL\t1\t+\t2\t+\t*\n".as_bytes()).unwrap();
//!
//! let copies = graph.multiply("1", 2, &Naming::Suffix(SuffixStyle::Lowercase), false).unwrap();
//! assert_eq!(copies, vec!["1b".to_string()]);
//! assert_eq!(graph.segment("1b").unwrap().to_string(), "S\t1b\tACGT\tRC:i:3000");
//! ```
//!

use std::collections::{HashSet, VecDeque};

use log::info;
use roaring::RoaringBitmap;

use crate::error::GfaError;
use crate::field::Value;
use crate::graph::naming::{Naming, SuffixStyle};
use crate::graph::{Graph, LineId, COUNT_TAGS};
use crate::line::{Line, RecordType};

/// Divide the count tags of `line` by `factor`, rounding down.
fn divide_counts(
    line: &mut Line,
    factor: i64,
) -> Result<(), GfaError> {
    for tag in COUNT_TAGS {
        if let Some(count) = line.get(tag)?.and_then(|x| x.as_i64()) {
            line.set_unchecked(tag, Value::Integer(count / factor))?;
        }
    }
    Ok(())
}

impl Graph {
    /// Links, containments and edges of segment `name`, each once.
    fn incident(&self, name: &str) -> RoaringBitmap {
        let mut found = RoaringBitmap::new();
        for kind in [RecordType::Link, RecordType::Containment, RecordType::Edge] {
            found |= self.index().find(kind, name, None, None);
        }
        found
    }

    /// Segments connected to `name` by a link, containment, edge or gap.
    fn adjacent(&self, name: &str) -> Result<Vec<String>, GfaError> {
        let mut ids = self.incident(name);
        ids |= self.index().find(RecordType::Gap, name, None, None);
        let mut found: Vec<String> = Vec::new();
        for id in ids.iter() {
            for reference in self.real_line(id)?.references()? {
                if reference.name != name && !found.contains(&reference.name) {
                    found.push(reference.name);
                }
            }
        }
        Ok(found)
    }

    /// True if deleting segment `name` splits its component in two or more.
    pub fn is_cut_segment(&self, name: &str) -> Result<bool, GfaError> {
        if self.segment_id(name).is_none() {
            return Err(GfaError::NotFound(format!("segment {} is not in the graph", name)))
        }
        let neighbours = self.adjacent(name)?;
        if neighbours.len() < 2 {
            return Ok(false)
        }
        let mut seen: HashSet<String> = HashSet::from([name.to_string(), neighbours[0].clone()]);
        let mut queue: VecDeque<String> = VecDeque::from([neighbours[0].clone()]);
        while let Some(current) = queue.pop_front() {
            for next in self.adjacent(&current)? {
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        Ok(neighbours.iter().any(|x| !seen.contains(x)))
    }

    /// Split segment `name` into `factor` copies.
    ///
    /// A factor of 0 deletes the segment, unless `conserve_components` is
    /// set and the segment holds its component together. A factor of 1
    /// changes nothing. Otherwise the count tags of the segment and of its
    /// links, containments and edges are divided by `factor` and `factor - 1`
    /// copies of them are added under the names chosen by `naming`.
    ///
    /// Returns the names of the copies.
    pub fn multiply(
        &mut self,
        name: &str,
        factor: usize,
        naming: &Naming,
        conserve_components: bool,
    ) -> Result<Vec<String>, GfaError> {
        let id = self.segment_id(name)
            .ok_or_else(|| GfaError::NotFound(format!("segment {} is not in the graph", name)))?;
        match factor {
            0 => {
                if conserve_components && self.is_cut_segment(name)? {
                    return Err(GfaError::Runtime(format!("deleting segment {} would split its component", name)))
                }
                self.delete_segment(name)?;
                return Ok(Vec::new())
            },
            1 => return Ok(Vec::new()),
            _ => {},
        }

        let names = self.names_for_copies(name, naming, factor - 1)?;
        let divisor = i64::try_from(factor).map_err(|_| GfaError::Value(format!("factor {} is too large", factor)))?;
        let incident: Vec<LineId> = self.incident(name).iter().collect();

        for line_id in std::iter::once(id).chain(incident.iter().copied()) {
            let mut line = self.take_line(line_id)?;
            let result = divide_counts(&mut line, divisor);
            self.lines[line_id as usize] = Some(line);
            result?;
        }

        for copy_name in names.iter() {
            let mut segment = self.real_line(id)?.clone();
            let field = segment.schema().name_field.unwrap_or("name");
            segment.set_unchecked(field, Value::Identifier(copy_name.clone()))?;
            self.add_line(segment)?;

            for line_id in incident.iter() {
                let mut copy = self.real_line(*line_id)?.clone();
                copy.rename_reference(name, copy_name)?;
                if let Some(own_name) = copy.name()? {
                    let field = copy.schema().name_field.unwrap_or("name");
                    let fresh = self.unused_names(&own_name, SuffixStyle::Lowercase, 1).remove(0);
                    copy.set_unchecked(field, Value::Identifier(fresh))?;
                }
                self.add_line(copy)?;
            }
        }
        info!("Multiplied segment {} by {}", name, factor);
        Ok(names)
    }
}

// Tests
#[cfg(test)]
mod tests {

    fn graph(text: &str) -> crate::graph::Graph {
        crate::graph::Graph::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn copies_share_counts() {
        use crate::graph::naming::{Naming, SuffixStyle};

        let mut graph = graph(concat!(
            "S\t1\tACGT\tRC:i:6000\nS\t2\tGG\nS\t3\tA\n",
            "L\t1\t+\t2\t+\t*\tKC:i:10\n",
            "C\t1\t+\t3\t+\t0\t*\n",
        ));
        let copies = graph.multiply("1", 2, &Naming::Suffix(SuffixStyle::Lowercase), false).unwrap();
        assert_eq!(copies, vec!["1b".to_string()]);
        assert_eq!(graph.segment_names().len(), 4);
        assert_eq!(graph.to_string(), concat!(
            "S\t1\tACGT\tRC:i:3000\nS\t2\tGG\nS\t3\tA\nS\t1b\tACGT\tRC:i:3000\n",
            "L\t1\t+\t2\t+\t*\tKC:i:5\n",
            "C\t1\t+\t3\t+\t0\t*\n",
            "L\t1b\t+\t2\t+\t*\tKC:i:5\n",
            "C\t1b\t+\t3\t+\t0\t*\n",
        ));
        graph.validate().unwrap();
    }

    #[test]
    fn explicit_names_and_truncation() {
        use crate::graph::naming::Naming;

        let mut graph = graph("S\ta\t*\tKC:i:10\tLN:i:100\n");
        let names = Naming::Explicit(vec!["x".to_string(), "y".to_string()]);
        let copies = graph.multiply("a", 3, &names, false).unwrap();
        assert_eq!(copies, vec!["x".to_string(), "y".to_string()]);
        for name in ["a", "x", "y"] {
            assert_eq!(graph.segment(name).unwrap().get("KC").unwrap().unwrap().as_i64(), Some(3));
        }
    }

    #[test]
    fn self_loops_are_divided_once() {
        use crate::graph::naming::{Naming, SuffixStyle};
        use crate::line::RecordType;

        let mut graph = graph("S\t1\t*\nL\t1\t+\t1\t+\t*\tKC:i:8\n");
        graph.multiply("1", 2, &Naming::Suffix(SuffixStyle::Uppercase), false).unwrap();
        let links = graph.ids(RecordType::Link);
        assert_eq!(links.len(), 2);
        assert_eq!(graph.line(links[0]).unwrap().to_string(), "L\t1\t+\t1\t+\t*\tKC:i:4");
        assert_eq!(graph.line(links[1]).unwrap().to_string(), "L\t1B\t+\t1B\t+\t*\tKC:i:4");
        graph.validate().unwrap();
    }

    #[test]
    fn named_edges_get_new_names() {
        use crate::graph::naming::{Naming, SuffixStyle};

        let mut graph = graph("S\ta\t4\tACGT\nS\tb\t4\tACGT\nE\te1\ta+\tb+\t2\t4$\t0\t2\t2M\n");
        graph.multiply("b", 3, &Naming::Suffix(SuffixStyle::Copy), false).unwrap();
        let e1b = graph.named_id("e1b").unwrap();
        assert_eq!(graph.line(e1b).unwrap().to_string(), "E\te1b\ta+\tb_copy+\t2\t4$\t0\t2\t2M");
        assert!(graph.named_id("e1c").is_some());
        assert_eq!(graph.neighbours("a").unwrap().len(), 3);
        graph.validate().unwrap();
    }

    #[test]
    fn factor_zero_respects_components() {
        use crate::graph::naming::{Naming, SuffixStyle};

        let naming = Naming::Suffix(SuffixStyle::Lowercase);
        let mut graph = graph("S\ta\t*\nS\tb\t*\nS\tc\t*\nL\ta\t+\tb\t+\t*\nL\tb\t+\tc\t+\t*\n");
        assert!(graph.is_cut_segment("b").unwrap());
        assert!(!graph.is_cut_segment("a").unwrap());

        let err = graph.multiply("b", 0, &naming, true).unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
        assert!(graph.multiply("a", 0, &naming, true).unwrap().is_empty());
        assert!(graph.segment("a").is_none());
        assert!(graph.multiply("b", 0, &naming, false).unwrap().is_empty());
        assert_eq!(graph.to_string(), "S\tc\t*\n");
    }

    #[test]
    fn factor_one_changes_nothing() {
        use crate::graph::naming::{Naming, SuffixStyle};

        let mut graph = graph("S\ta\t*\tRC:i:5\n");
        assert!(graph.multiply("a", 1, &Naming::Suffix(SuffixStyle::Lowercase), false).unwrap().is_empty());
        assert_eq!(graph.to_string(), "S\ta\t*\tRC:i:5\n");
        assert_eq!(graph.multiply("z", 2, &Naming::Suffix(SuffixStyle::Lowercase), false).unwrap_err().kind(), "NotFoundError");
    }
}
