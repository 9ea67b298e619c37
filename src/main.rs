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
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use gfaedit::graph::naming::{Naming, SuffixStyle};
use gfaedit::{Graph, ValidationLevel, Version};

mod cli;

type E = Box<dyn std::error::Error>;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

/// Writes `graph` to `out_file`, or to stdout if it is None.
fn write_graph(
    graph: &Graph,
    out_file: &Option<PathBuf>,
) -> Result<(), E> {
    match out_file {
        Some(path) => {
            let f = File::create(path)?;
            let mut conn_out = BufWriter::new(f);
            gfaedit::write_to_write(graph, &mut conn_out)?;
        },
        None => {
            let stdout = std::io::stdout();
            let mut conn_out = BufWriter::new(stdout.lock());
            gfaedit::write_to_write(graph, &mut conn_out)?;
        },
    }
    Ok(())
}

fn naming(
    names: &Option<Vec<String>>,
    suffix: &Option<String>,
    default: Naming,
) -> Result<Naming, E> {
    if let Some(names) = names {
        return Ok(Naming::Explicit(names.clone()))
    }
    match suffix {
        Some(style) => Ok(Naming::Suffix(style.parse::<SuffixStyle>()?)),
        None => Ok(default),
    }
}

fn main() -> Result<(), E> {
    let cli = cli::Cli::parse();

    // Subcommands:
    match &cli.command {
        // View
        Some(cli::Commands::View {
            input_file,
            out_file,
            vlevel,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let graph = gfaedit::read_file(input_file, ValidationLevel::from_u8(*vlevel)?)?;
            graph.validate()?;
            write_graph(&graph, out_file)?;
        },

        // Convert
        Some(cli::Commands::Convert {
            input_file,
            out_file,
            to,
            vlevel,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let version: Version = to.parse()?;
            let graph = gfaedit::read_file(input_file, ValidationLevel::from_u8(*vlevel)?)?;
            let converted = graph.to_version(version)?;
            write_graph(&converted, out_file)?;
        },

        // Merge
        Some(cli::Commands::Merge {
            input_file,
            out_file,
            names,
            suffix,
            cut_counts,
            vlevel,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let naming = naming(names, suffix, Naming::Joined)?;
            let mut graph = gfaedit::read_file(input_file, ValidationLevel::from_u8(*vlevel)?)?;
            let merged = graph.merge_linear_paths(&naming, *cut_counts)?;
            info!("Merged {} linear paths", merged.len());
            write_graph(&graph, out_file)?;
        },

        // Multiply
        Some(cli::Commands::Multiply {
            input_file,
            out_file,
            segment,
            factor,
            names,
            suffix,
            conserve_components,
            vlevel,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let naming = naming(names, suffix, Naming::Suffix(SuffixStyle::default()))?;
            let mut graph = gfaedit::read_file(input_file, ValidationLevel::from_u8(*vlevel)?)?;
            graph.multiply(segment, *factor, &naming, *conserve_components)?;
            write_graph(&graph, out_file)?;
        },

        // Stats
        Some(cli::Commands::Stats {
            input_file,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let graph = gfaedit::read_file(input_file, ValidationLevel::default())?;
            let stdout = std::io::stdout();
            let mut conn_out = stdout.lock();
            writeln!(conn_out, "version\t{}", graph.version().unwrap_or(Version::Gfa1))?;
            for (kind, count) in graph.counts() {
                writeln!(conn_out, "{}\t{}", kind.code(), count)?;
            }
            let total: i64 = graph.segment_names().iter().filter_map(|name| graph.segment_length(name)).sum();
            writeln!(conn_out, "total_length\t{}", total)?;
            writeln!(conn_out, "linear_paths\t{}", graph.linear_paths()?.len())?;
        },
        None => {},
    }
    Ok(())
}
