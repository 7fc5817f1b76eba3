//! AOC CLI - fetch Advent of Code inputs and submit answers

mod cli;
mod config;
mod error;
mod input;
mod output;
mod submit;

use aoc_client::SubmissionRequest;
use clap::Parser;
use cli::{Args, Command};
use config::Config;
use error::CliError;
use input::InputFile;
use output::OutputFormatter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "aoc=info,aoc_client=debug"
    } else {
        "aoc=warn,aoc_client=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(&args);
    let client = config.client()?;
    let formatter = OutputFormatter::new(config.quiet);

    match args.command {
        Command::Input { puzzle, dir } => {
            let target = InputFile::new(&config::expand_tilde(&dir));
            // Checked before the download so an existing input is never refetched
            target.ensure_absent()?;

            let session = config::resolve_session()?;
            let input = client.get_input(puzzle.year, puzzle.day, &session)?;
            target.write(&input)?;
            if !config.quiet {
                println!("Wrote {}", target.path().display());
            }
        }
        Command::Submit {
            puzzle,
            part,
            answer,
            auto_retry,
        } => {
            let request = SubmissionRequest::new(puzzle.year, puzzle.day, part, answer)?;
            let session = config::resolve_session()?;
            let report = submit::submit_answer(&client, request, &session, auto_retry);
            formatter.print_submission(&report);
            if report.result.is_err() {
                return Err(CliError::SubmissionFailed);
            }
        }
        Command::Stars { year: Some(year) } => {
            let session = config::resolve_session()?;
            formatter.print_calendar(year, &client.calendar(year, &session)?);
        }
        Command::Stars { year: None } => {
            let session = config::resolve_session()?;
            formatter.print_years(&client.stars_by_year(&session)?);
        }
        Command::Years => {
            formatter.print_event_years(&client.years()?);
        }
        Command::Verify => {
            let session = config::resolve_session()?;
            let user_id = client.verify_session(&session)?;
            if config.quiet {
                println!("{}", user_id);
            } else {
                println!("Session is valid (user #{})", user_id);
            }
        }
    }

    Ok(())
}
