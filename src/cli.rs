use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(name = "elevator-sim", version, about = "Discrete-tick elevator bank simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation, live or for a fixed number of ticks
    Run(RunArgs),
    /// Print the effective configuration and exit
    ShowConfig(ConfigArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    #[arg(long, help = "Path to a .toml or .json config file")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Number of elevators (0 falls back to the default of 4)")]
    pub elevators: Option<usize>,
    #[arg(long, allow_hyphen_values = true)]
    pub min_floor: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub max_floor: Option<i32>,
    #[arg(long, help = "Milliseconds between simulation ticks")]
    pub interval_ms: Option<u64>,
    #[arg(long, help = "Milliseconds between random requests")]
    pub request_interval_ms: Option<u64>,
    #[arg(long, help = "Seed for the random request generator")]
    pub seed: Option<u64>,
    #[arg(long, help = "Disable random request generation")]
    pub no_random: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(
        long = "request",
        value_name = "SRC:DST",
        allow_hyphen_values = true,
        help = "Submit a request before the first tick (repeatable)"
    )]
    pub requests: Vec<String>,
    #[arg(long, help = "Run this many ticks without pausing, then exit")]
    pub ticks: Option<u64>,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Json,
}

/// Parses the command line. Help and version requests print and exit here.
pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => Error::Cli(err.to_string()),
    })
}

pub fn parse_request_entry(input: &str) -> Result<(i32, i32)> {
    let trimmed = input.trim();
    let mut parts = trimmed.split(':');
    let source = parts.next().unwrap_or("").trim();
    let destination = parts.next().unwrap_or("").trim();
    if parts.next().is_some() || source.is_empty() || destination.is_empty() {
        return Err(Error::InvalidRequestEntry(trimmed.to_string()));
    }

    let source = source
        .parse()
        .map_err(|_| Error::InvalidRequestEntry(trimmed.to_string()))?;
    let destination = destination
        .parse()
        .map_err(|_| Error::InvalidRequestEntry(trimmed.to_string()))?;
    Ok((source, destination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_entry_accepts_pairs() {
        assert_eq!(parse_request_entry("3:7").unwrap(), (3, 7));
        assert_eq!(parse_request_entry(" 9 : 2 ").unwrap(), (9, 2));
        assert_eq!(parse_request_entry("-1:4").unwrap(), (-1, 4));
    }

    #[test]
    fn parse_request_entry_rejects_malformed_input() {
        for input in ["", "3", "3:", ":7", "3:7:9", "three:7"] {
            assert!(parse_request_entry(input).is_err(), "{input}");
        }
        let err = parse_request_entry("3:x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid request entry '3:x': expected source:destination"
        );
    }

    #[test]
    fn run_accepts_repeatable_requests() {
        let cli = Cli::try_parse_from([
            "elevator-sim",
            "run",
            "--request",
            "3:7",
            "--request",
            "5:5",
            "--ticks",
            "4",
            "--no-random",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.requests, vec!["3:7", "5:5"]);
        assert_eq!(args.ticks, Some(4));
        assert!(args.config.no_random);
        assert_eq!(args.format, FormatArg::Human);
    }
}
