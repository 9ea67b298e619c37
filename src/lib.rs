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

//! gfaedit is a library and a command-line client for:
//!
//!   - Reading and validating assembly graphs in the GFA1 and GFA2 formats.
//!   - Converting graphs between GFA1 and GFA2.
//!   - Merging linear paths of segments into single segments.
//!   - Multiplying segments into copies that share their read counts.
//!
//! The formats are described in the
//! [GFA specification](https://github.com/GFA-spec/GFA-spec).
//!
//! Internally, gfaedit indexes the connections of each segment end with
//! [roaring bitmaps](https://roaringbitmap.org/) over the ids of the records.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The gfaedit CLI supports the following subcommands:
//!   - `gfaedit view` read, validate and print a graph.
//!   - `gfaedit convert` convert a graph to GFA1 or GFA2.
//!   - `gfaedit merge` merge every linear path of a graph.
//!   - `gfaedit multiply` split a segment into copies.
//!   - `gfaedit stats` count the records of each type.
//!
//! Input files can be gzipped.
//!
//! ### Rust API
//!
//! The API provides functions for reading a [Graph] from a [Read] or a file
//! and writing it to a [Write]. The graph itself is edited through the
//! methods of [Graph].
//!
//! For use cases requiring access to a single record at a time, the following
//! structs are provided:
//!
//!   - [Line](line::Line): one record, parsed from a line of text.
//!   - [Value](field::Value): the decoded value of a field.
//!   - [ConnectionIndex](graph::index::ConnectionIndex): the records attached to each segment.
//!
//! See documentation for the appropriate functions or structs for usage examples.
//!

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

pub mod error;
pub mod field;
pub mod graph;
pub mod line;

pub use error::GfaError;
pub use graph::Graph;
pub use line::{Line, RecordType, ValidationLevel, Version};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a graph from something that implements [Read].
///
/// The version of the graph is inferred from its records, and defaults to
/// GFA1 if nothing tells it apart.
///
/// ## Usage
///
/// ```rust
/// use gfaedit::parse_from_read;
/// use gfaedit::Version;
/// use std::io::Cursor;
///
/// let mut input: Cursor<Vec<u8>> = Cursor::new(b"H\tVN:Z:2.0\nS\t1\t4\tACGT\n".to_vec());
/// let graph = parse_from_read(&mut input, gfaedit::ValidationLevel::default()).unwrap();
///
/// assert_eq!(graph.version(), Some(Version::Gfa2));
/// assert_eq!(graph.segment_names(), vec!["1".to_string()]);
/// ```
///
pub fn parse_from_read<R: Read>(
    conn_in: &mut R,
    vlevel: ValidationLevel,
) -> Result<Graph, GfaError> {
    Graph::from_reader_with(BufReader::new(conn_in), None, vlevel)
}

/// Write a graph to something that implements [Write].
///
/// Headers are written first, then segments, then the other records in the
/// order they were added.
///
/// ## Usage
///
/// ```rust
/// use gfaedit::{parse_from_read, write_to_write};
/// use std::io::Cursor;
///
/// let mut input: Cursor<Vec<u8>> = Cursor::new(b"L\t1\t+\t2\t-\t*\nS\t2\tGG\nS\t1\tAC\n".to_vec());
/// let graph = parse_from_read(&mut input, gfaedit::ValidationLevel::default()).unwrap();
///
/// let mut output: Vec<u8> = Vec::new();
/// write_to_write(&graph, &mut output).unwrap();
///
/// assert_eq!(output, b"S\t1\tAC\nS\t2\tGG\nL\t1\t+\t2\t-\t*\n".to_vec());
/// ```
///
pub fn write_to_write<W: Write>(
    graph: &Graph,
    conn_out: &mut W,
) -> Result<(), GfaError> {
    graph.write(conn_out)
}

/// Read a graph from the file at `path`, decompressing it if it is gzipped.
pub fn read_file<P: AsRef<Path>>(
    path: P,
    vlevel: ValidationLevel,
) -> Result<Graph, GfaError> {
    let path = path.as_ref();
    let f = File::open(path)
        .map_err(|err| std::io::Error::new(err.kind(), format!("{}: {}", path.display(), err)))?;
    let mut conn_in = BufReader::new(f);
    let is_gzip = conn_in.fill_buf()?.starts_with(&GZIP_MAGIC);
    let graph = if is_gzip {
        Graph::from_reader_with(BufReader::new(MultiGzDecoder::new(conn_in)), None, vlevel)
    } else {
        Graph::from_reader_with(conn_in, None, vlevel)
    };
    graph.map_err(|err| err.context(&path.display().to_string()))
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn read_plain_and_gzipped_files() {
        use super::{read_file, ValidationLevel};
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let text = b"S\t1\tACGT\nS\t2\tGG\nL\t1\t+\t2\t+\t*\n";
        let dir = std::env::temp_dir();

        let plain = dir.join(format!("gfaedit-read-{}.gfa", std::process::id()));
        std::fs::write(&plain, text).unwrap();

        let gzipped = dir.join(format!("gfaedit-read-{}.gfa.gz", std::process::id()));
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text).unwrap();
        std::fs::write(&gzipped, encoder.finish().unwrap()).unwrap();

        let got_plain = read_file(&plain, ValidationLevel::default()).unwrap();
        let got_gzipped = read_file(&gzipped, ValidationLevel::default()).unwrap();
        std::fs::remove_file(&plain).unwrap();
        std::fs::remove_file(&gzipped).unwrap();

        assert_eq!(got_plain.to_string(), String::from_utf8(text.to_vec()).unwrap());
        assert_eq!(got_gzipped.to_string(), got_plain.to_string());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        use super::{read_file, ValidationLevel};

        let err = read_file("/nonexistent/graph.gfa", ValidationLevel::default()).unwrap_err();
        assert_eq!(err.kind(), "IoError");
        assert!(err.to_string().contains("/nonexistent/graph.gfa"));
    }
}
