//! CLI argument parsing using clap

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Advent of Code input fetcher and answer submitter
#[derive(Parser, Debug)]
#[command(name = "aoc", about = "Fetch Advent of Code inputs and submit answers", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the Advent of Code site
    #[arg(long, global = true, default_value = "https://adventofcode.com")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Log request and cooldown activity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode - only print results
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a puzzle input into `input.txt`
    Input {
        #[command(flatten)]
        puzzle: PuzzleArgs,

        /// Directory to write `input.txt` into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Submit an answer
    Submit {
        #[command(flatten)]
        puzzle: PuzzleArgs,

        /// Part to submit
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
        part: u8,

        /// Answer text
        #[arg(allow_hyphen_values = true)]
        answer: String,

        /// Sleep through cooldowns and retry instead of giving up
        #[arg(long, default_value = "false")]
        auto_retry: bool,
    },

    /// Show star progress for every year, or per day for one year
    Stars {
        /// Year to show the calendar for
        #[arg(short, long)]
        year: Option<u16>,
    },

    /// List every year the event has run
    Years,

    /// Check the session cookie and print the account's user ID
    Verify,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
pub struct PuzzleArgs {
    /// Event year
    #[arg(short, long)]
    pub year: u16,

    /// Puzzle day
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: u8,
}
