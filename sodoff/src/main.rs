use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sodoff::board::{
    BoardQuery, BoardSource, DEFAULT_INTERVAL_SECS, DEFAULT_ROWS, DEFAULT_TIME_WINDOW_MINS,
    TerminalEmitter,
};
use sodoff::config::{AppConfig, TOKEN_ENV_VAR, TOKEN_URL};
use sodoff::darwin::{DarwinClient, MockDarwinClient};
use sodoff::refresh::Refresher;
use sodoff::resolve::{StationResolver, TerminalPrompter};
use sodoff::stations::{StationCache, StationClient, StationError, StationRegistry};

/// Check live departures and arrivals between two stations for delays and
/// cancellations.
#[derive(Debug, Parser)]
#[command(name = "sodoff", version)]
struct Cli {
    /// Keep refreshing the boards until interrupted
    #[arg(short, long)]
    continuous: bool,

    /// Polling interval in seconds
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Departure station CRS code or name
    #[arg(short, long)]
    from: Option<String>,

    /// Destination station CRS code or name
    #[arg(short, long)]
    to: Option<String>,

    /// Number of services to fetch per board
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_ROWS,
        value_parser = clap::value_parser!(u8).range(1..=150)
    )]
    rows: u8,

    /// Time window in minutes
    #[arg(
        short = 'w',
        long,
        default_value_t = DEFAULT_TIME_WINDOW_MINS,
        value_parser = clap::value_parser!(u16).range(0..=120)
    )]
    time_window: u16,

    /// Show the full route of highlighted services
    #[arg(short = 'j', long)]
    show_journeys: bool,

    /// Serve boards from {CRS}.json files in this directory instead of Darwin
    #[arg(long, value_name = "DIR")]
    mock_data: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match &cli.mock_data {
        Some(dir) => {
            let source = match MockDarwinClient::new(dir) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("{}", format!("ERROR: {e}").red());
                    return ExitCode::FAILURE;
                }
            };
            info!(dir = %dir.display(), "serving boards from mock data");
            run(&cli, &config, &source).await
        }
        None => {
            let darwin_config = match config.darwin_config() {
                Ok(darwin_config) => darwin_config,
                Err(_) => {
                    print_token_guidance();
                    return ExitCode::FAILURE;
                }
            };
            let source = match DarwinClient::new(darwin_config) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("{}", format!("ERROR: failed to create Darwin client: {e}").red());
                    return ExitCode::FAILURE;
                }
            };
            run(&cli, &config, &source).await
        }
    }
}

/// Resolve both stations and show their boards.
async fn run<S: BoardSource>(cli: &Cli, config: &AppConfig, source: &S) -> ExitCode {
    let registry = match load_registry(config).await {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{}", format!("ERROR: failed to load stations: {e}").red());
            return ExitCode::FAILURE;
        }
    };

    let from = cli.from.as_deref().unwrap_or_default();
    let to = cli.to.as_deref().unwrap_or_default();

    let mut prompter = TerminalPrompter::new();
    let mut resolver = StationResolver::new(&registry, &mut prompter);

    let departure = match resolver.resolve(from, "Select Departure Station") {
        Ok(code) => code,
        Err(e) => {
            info!(error = %e, "departure station not resolved");
            eprintln!("Invalid departure station: {from}");
            return ExitCode::SUCCESS;
        }
    };
    let destination = match resolver.resolve(to, "Select Destination Station") {
        Ok(code) => code,
        Err(e) => {
            info!(error = %e, "destination station not resolved");
            eprintln!("Invalid destination station: {to}");
            return ExitCode::SUCCESS;
        }
    };

    let query = BoardQuery {
        departure,
        destination,
        rows: cli.rows,
        time_window_mins: cli.time_window,
        continuous: cli.continuous,
        interval_secs: cli.interval,
        show_journeys: cli.show_journeys,
    };

    let cancel = CancellationToken::new();
    if query.continuous {
        let token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let mut out = TerminalEmitter::stdout();
    match Refresher::new(source, &registry, &mut out)
        .run(&query, cancel)
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "refresh loop stopped");
            ExitCode::FAILURE
        }
    }
}

async fn load_registry(config: &AppConfig) -> Result<StationRegistry, StationError> {
    let cache = StationCache::new(config.station_cache_config());
    let client = config
        .station_client_config()
        .map(StationClient::new)
        .transpose()?;

    StationRegistry::load(&cache, client.as_ref()).await
}

fn print_token_guidance() {
    println!("{}", "ERROR: National Rail API access token not found!".red());
    println!(
        "Please set the environment variable {} with your National Rail API access token.",
        TOKEN_ENV_VAR.cyan()
    );
    println!("You can obtain a token from the following link:");
    println!("{}", TOKEN_URL.cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("sodoff").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]).unwrap();

        assert!(!cli.continuous);
        assert_eq!(cli.interval, 5);
        assert_eq!(cli.from, None);
        assert_eq!(cli.to, None);
        assert_eq!(cli.rows, 10);
        assert_eq!(cli.time_window, 60);
        assert!(!cli.show_journeys);
        assert_eq!(cli.mock_data, None);
    }

    #[test]
    fn short_flags() {
        let cli = parse(&[
            "-c", "-i", "30", "-f", "kgx", "-t", "York", "-r", "150", "-w", "0", "-j",
        ])
        .unwrap();

        assert!(cli.continuous);
        assert_eq!(cli.interval, 30);
        assert_eq!(cli.from.as_deref(), Some("kgx"));
        assert_eq!(cli.to.as_deref(), Some("York"));
        assert_eq!(cli.rows, 150);
        assert_eq!(cli.time_window, 0);
        assert!(cli.show_journeys);
    }

    #[test]
    fn long_flags() {
        let cli = parse(&[
            "--continuous",
            "--interval",
            "1",
            "--from",
            "EDB",
            "--to",
            "KGX",
            "--rows",
            "1",
            "--time-window",
            "120",
            "--show-journeys",
            "--mock-data",
            "data/mock_boards",
        ])
        .unwrap();

        assert!(cli.continuous);
        assert_eq!(cli.interval, 1);
        assert_eq!(cli.rows, 1);
        assert_eq!(cli.time_window, 120);
        assert!(cli.show_journeys);
        assert_eq!(cli.mock_data, Some(PathBuf::from("data/mock_boards")));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for args in [
            ["-r", "0"],
            ["-r", "151"],
            ["-w", "121"],
            ["-i", "0"],
            ["-w", "-1"],
        ] {
            assert!(parse(&args).is_err(), "{args:?} accepted");
        }
    }
}
