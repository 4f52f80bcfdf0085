use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "patgen")]
#[command(about = "Generates pattern factories from #[unapply] extractor functions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate <Name>Patterns units for every #[patterns] declaration
    Generate {
        /// Crate source root to scan (usually `src`)
        src: PathBuf,

        /// Directory generated units are written to
        #[arg(short, long, env = "PATGEN_OUT")]
        out: PathBuf,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Run discovery and validation without writing anything
    Check {
        /// Crate source root to scan (usually `src`)
        src: PathBuf,

        #[command(flatten)]
        options: GenerateOptions,
    },
}

/// Flags shared by `generate` and `check`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Configuration file (defaults to the nearest patgen.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the derived name suffix
    #[arg(long)]
    pub suffix: Option<String>,

    /// Override the path generated code uses to reach the pattern runtime
    #[arg(long = "runtime-path")]
    pub runtime_path: Option<String>,

    /// Additional glob patterns for source files to skip
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    /// -v: Show round summaries
    /// -vv: Show per-declaration details
    /// -vvv: Show everything
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Commands {
    pub fn options(&self) -> &GenerateOptions {
        match self {
            Commands::Generate { options, .. } | Commands::Check { options, .. } => options,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
