//! Command-line argument parsing for `forgec`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a Forge source file to a native object file.
    Build(BuildArgs),

    /// Compile and JIT-execute a Forge source file's `main` function.
    Run(RunArgs),

    /// Run the lexer, parser and semantic passes, reporting diagnostics.
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// The path to the Forge source file.
    #[arg(index = 1)]
    pub file: PathBuf,

    /// The path to the output object file.
    #[arg(short, long, default_value = "a.o")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// The path to the Forge source file.
    #[arg(index = 1)]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// The path to the Forge source file.
    #[arg(index = 1)]
    pub file: PathBuf,
}
