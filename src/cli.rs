// File: ./src/cli.rs
//! Command-line definitions shared by the binary and its tests.
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "syllabai")]
#[command(about = "Compare course syllabuses side by side and export a semester calendar")]
#[command(version)]
pub struct Cli {
    /// Use a different directory for the config file.
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Extraction backend, e.g. http://localhost:5000
    #[arg(long, global = true, env = "SYLLABAI_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Treat inputs as already-analyzed JSON records instead of uploading them.
    #[arg(long, global = true)]
    pub from_json: bool,

    /// -v for info, -vv for debug.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload files and list the sections every one of them has.
    Sections(SectionsArgs),
    /// Upload files and export a side-by-side comparison.
    Compare(CompareArgs),
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct SectionsArgs {
    /// Syllabus files (.pdf, .docx, .txt).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the per-file section matrix as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Section to include (repeatable). Defaults to every common section.
    #[arg(short, long = "section", value_name = "KEY")]
    pub sections: Vec<String>,

    /// Output path. Defaults to `output_file` from the config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
    pub format: OutputFormat,

    /// Year used to resolve "M/D" dates. Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the config file location.
    Path,
    /// Write a config file with the default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
