//! CLI command definitions and argument parsing.

use clap::{ArgAction, Args, Parser, Subcommand};
use phasemine_extractor::{Quantization, RefinementPass};
use std::path::PathBuf;

/// Phasemine - Clean OCR'd papers and extract alloy phases with an LLM.
#[derive(Debug, Parser)]
#[command(name = "phasemine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PHASEMINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean raw OCR documents
    Clean(CleanArgs),

    /// Extract alloy/phase records from cleaned documents
    Extract(ExtractArgs),

    /// Clean, then extract
    Run(RunArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Cleaning overrides shared by `clean` and `run`.
#[derive(Debug, Clone, Default, Args)]
pub struct CleanOptions {
    /// Repetition threshold for collapsing OCR loops
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Keep front matter instead of truncating to the first anchor
    #[arg(long)]
    pub keep_front_matter: bool,
}

/// Arguments for the clean command.
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Directory of raw documents
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory to write cleaned documents to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub options: CleanOptions,
}

/// Extraction overrides shared by `extract` and `run`.
#[derive(Debug, Clone, Default, Args)]
pub struct ExtractOptions {
    /// Model identifier
    #[arg(short, long, env = "PHASEMINE_MODEL")]
    pub model: Option<String>,

    /// Token budget per chunk
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Quantization label (none, 4bit, 8bit)
    #[arg(short, long)]
    pub quantization: Option<Quantization>,

    /// Ollama endpoint
    #[arg(long, env = "PHASEMINE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// HuggingFace tokenizer.json used to size chunks
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Follow-up passes applied to each chunk's answer
    #[arg(long = "refine", value_enum)]
    pub refine: Vec<RefineArg>,

    /// Drop records outside the schema or phase vocabulary
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Directory of cleaned documents
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Root directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub options: ExtractOptions,
}

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory of raw documents
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for cleaned documents
    #[arg(long)]
    pub cleaned: Option<PathBuf>,

    /// Root directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub clean: CleanOptions,

    #[command(flatten)]
    pub extract: ExtractOptions,
}

/// Arguments for configuration management.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Refinement pass argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RefineArg {
    /// Remove single-element alloys
    CompositionCheck,
    /// Map phases onto the closed vocabulary
    PhaseNormalization,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<RefineArg> for RefinementPass {
    fn from(arg: RefineArg) -> Self {
        match arg {
            RefineArg::CompositionCheck => RefinementPass::CompositionCheck,
            RefineArg::PhaseNormalization => RefinementPass::PhaseNormalization,
        }
    }
}
