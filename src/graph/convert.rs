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

//! Conversion of a whole graph between GFA1 and GFA2.
//!
//! Records are converted one at a time with
//! [to_version_with](crate::line::Line::to_version_with), which gets the
//! segment lengths from the source graph. Records that have no counterpart
//! in the target version are left out.
//!
//! ## Usage
//!
//! ```rust
//! use gfaedit::graph::Graph;
//!
//! let graph = Graph::from_reader("S\t1\tACGT\nS\t2\tGGTT\nL\t1\t+\t2\t+\t1M\n".as_bytes()).unwrap();
//! let gfa2 = graph.to_gfa2().unwrap();
//! assert_eq!(gfa2.to_string(), "S\t1\t4\tACGT\nS\t2\t4\tGGTT\nE\t*\t1+\t2+\t3\t4$\t0\t1\t1M\n");
//! ```
//!

use log::{info, warn};

use crate::error::GfaError;
use crate::graph::Graph;
use crate::line::Version;

impl Graph {
    /// Copy of the graph with every record converted to `version`.
    ///
    /// Records that can not be converted are skipped with a warning.
    pub fn to_version(&self, version: Version) -> Result<Graph, GfaError> {
        if version == Version::Generic {
            return Err(GfaError::Version("graphs can only be converted to GFA1 or GFA2".to_string()))
        }
        let mut converted = Graph::with_version(version).with_vlevel(self.vlevel);
        let mut skipped = 0;
        for line in self.ordered_lines() {
            match line.to_version_with(version, |name| self.segment_length(name)) {
                Ok(line) => {
                    converted.add_line(line)?;
                },
                Err(err) => {
                    warn!("Skipped {} record in conversion to {}: {}", line.record_type().code(), version, err);
                    skipped += 1;
                },
            }
        }
        converted.finish()?;
        info!("Converted {} lines to {}, skipped {}", converted.lines().count(), version, skipped);
        Ok(converted)
    }

    pub fn to_gfa1(&self) -> Result<Graph, GfaError> {
        self.to_version(Version::Gfa1)
    }

    pub fn to_gfa2(&self) -> Result<Graph, GfaError> {
        self.to_version(Version::Gfa2)
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn gfa1_to_gfa2_and_back() {
        use crate::graph::Graph;
        use crate::line::Version;

        let graph = Graph::from_reader(concat!(
            "H\tVN:Z:1.0\n",
            "S\t1\tACGT\nS\t2\t*\tLN:i:10\n",
            "L\t1\t+\t2\t+\t2M\n",
            "P\tp1\t1+,2+\t*\n",
        ).as_bytes()).unwrap();

        let gfa2 = graph.to_gfa2().unwrap();
        assert_eq!(gfa2.version(), Some(Version::Gfa2));
        assert_eq!(gfa2.to_string(), concat!(
            "H\tVN:Z:2.0\n",
            "S\t1\t4\tACGT\nS\t2\t10\t*\n",
            "E\t*\t1+\t2+\t2\t4$\t0\t2\t2M\n",
            "O\tp1\t1+ 2+\n",
        ));
        gfa2.validate().unwrap();
        assert_eq!(gfa2.neighbours("1").unwrap(), vec!["2".to_string()]);

        let gfa1 = gfa2.to_gfa1().unwrap();
        assert_eq!(gfa1.to_string(), concat!(
            "H\tVN:Z:1.0\n",
            "S\t1\tACGT\tLN:i:4\nS\t2\t*\tLN:i:10\n",
            "L\t1\t+\t2\t+\t2M\n",
            "P\tp1\t1+,2+\t*\n",
        ));
    }

    #[test]
    fn records_without_counterpart_are_skipped() {
        use crate::graph::Graph;
        use crate::line::RecordType;

        let graph = Graph::from_reader(concat!(
            "S\ta\t4\tACGT\nS\tb\t4\tACGT\n",
            "G\tg1\ta+\tb+\t100\t*\n",
            "U\tu1\ta b\n",
        ).as_bytes()).unwrap();
        let gfa1 = graph.to_gfa1().unwrap();
        assert_eq!(gfa1.to_string(), "S\ta\tACGT\tLN:i:4\nS\tb\tACGT\tLN:i:4\n");
        assert_eq!(gfa1.ids(RecordType::Gap).len(), 0);
        gfa1.validate().unwrap();
    }

    #[test]
    fn same_version_is_a_copy() {
        use crate::graph::Graph;
        use crate::line::Version;

        let graph = Graph::from_reader("S\t1\tACGT\tRC:i:3\n".as_bytes()).unwrap();
        let copy = graph.to_version(Version::Gfa1).unwrap();
        assert_eq!(copy.to_string(), graph.to_string());
        assert_eq!(graph.to_version(Version::Generic).unwrap_err().kind(), "VersionError");
    }
}
