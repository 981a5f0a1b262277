use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SourceKind;

/// Ranks Zig web frameworks by the throughput their benchmarks measured.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Benchmark project root, holding build.zig.zon and the results directory
    #[clap(short, long, default_value = ".", env = "ZIGBENCH_ROOT")]
    pub root: PathBuf,
    /// Frameworks to include, e.g. `httpz,std,zzz:0.14.0`
    #[clap(short, long, value_delimiter = ',')]
    pub frameworks: Option<Vec<String>>,
    /// Where manifests are read from
    #[clap(long, value_enum)]
    pub source: Option<SourceKind>,
    /// Base URL manifests are fetched from when the source is remote
    #[clap(long)]
    pub remote_url: Option<String>,
    /// Directory holding `<framework>/bench.json`, relative to the root
    #[clap(long)]
    pub results_directory: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    ///Builds the ranked benchmark dataset and writes it as JSON
    Collect {
        /// Write to this file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
        #[clap(long)]
        pretty: bool,
    },
    ///Prints the resolved version and repository of every framework
    Resolve,
}
