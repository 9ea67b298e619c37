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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Read, validate and print a graph
    View {
        // Input GFA file
        #[arg(group = "input", required = true, help = "Input file (.gfa or .gfa.gz)")]
        input_file: PathBuf,

        // Output file path, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Validation level
        #[arg(long = "vlevel", default_value_t = 3, help = "Validation level 0-5")]
        vlevel: u8,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Convert between GFA1 and GFA2
    Convert {
        // Input GFA file
        #[arg(group = "input", required = true, help = "Input file (.gfa or .gfa.gz)")]
        input_file: PathBuf,

        // Output file path, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Target version
        #[arg(long = "to", required = true, help = "Target version (gfa1 or gfa2)")]
        to: String,

        // Validation level
        #[arg(long = "vlevel", default_value_t = 1, help = "Validation level 0-5")]
        vlevel: u8,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Merge every linear path
    Merge {
        // Input GFA file
        #[arg(group = "input", required = true, help = "Input file (.gfa or .gfa.gz)")]
        input_file: PathBuf,

        // Output file path, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Names of the merged segments, one per path
        #[arg(long = "names", value_delimiter = ',', group = "naming", help = "Names of the merged segments")]
        names: Option<Vec<String>>,

        // Name merged segments after their first member
        #[arg(long = "suffix", group = "naming", help = "Suffix style (lowercase, uppercase, numeric, copy)")]
        suffix: Option<String>,

        // Scale counts by the length left after removing overlaps
        #[arg(long = "cut-counts", default_value_t = false)]
        cut_counts: bool,

        // Validation level
        #[arg(long = "vlevel", default_value_t = 1, help = "Validation level 0-5")]
        vlevel: u8,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Split a segment into copies
    Multiply {
        // Input GFA file
        #[arg(group = "input", required = true, help = "Input file (.gfa or .gfa.gz)")]
        input_file: PathBuf,

        // Output file path, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Segment to multiply
        #[arg(short = 's', long = "segment", required = true)]
        segment: String,

        // Number of copies including the original
        #[arg(short = 'f', long = "factor", required = true)]
        factor: usize,

        // Names of the new copies
        #[arg(long = "names", value_delimiter = ',', group = "naming", help = "Names of the copies")]
        names: Option<Vec<String>>,

        // Suffix appended to the name of the segment
        #[arg(long = "suffix", group = "naming", help = "Suffix style (lowercase, uppercase, numeric, copy), defaults to lowercase")]
        suffix: Option<String>,

        // Refuse to delete a segment that holds a component together
        #[arg(long = "conserve-components", default_value_t = false)]
        conserve_components: bool,

        // Validation level
        #[arg(long = "vlevel", default_value_t = 1, help = "Validation level 0-5")]
        vlevel: u8,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Count the records of each type
    Stats {
        // Input GFA file
        #[arg(group = "input", required = true, help = "Input file (.gfa or .gfa.gz)")]
        input_file: PathBuf,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
