use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use carbontrip::report::format_distance;
use carbontrip::{CalculatorError, CarbonTripConfig, SortKey, TripCalculator, logging};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "carbontrip",
    version,
    about = "CarbonTrip - Travel emissions calculator comparing CO₂, time and cost across transport modes"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare all transport modes for a trip
    Compare {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Key of the transport mode you plan to use
        #[arg(long)]
        mode: String,
        /// Order of the comparison cards (defaults to the configured sort)
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Great-circle distance between two cities
    Distance {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// List known cities
    Cities {
        /// Only cities starting with this text
        #[arg(long)]
        prefix: Option<String>,
    },
    /// List transport modes
    Modes {
        /// Only modes whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CalculatorError>() {
                Some(calc_err) => eprintln!("Error: {}", calc_err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        verbose,
        command,
    } = cli;

    let config = CarbonTripConfig::load_from_path(config_path.clone())?;
    logging::init_tracing(&config.logging, verbose)?;
    tracing::debug!(?config, "loaded configuration");

    let Some(command) = command else {
        print_banner(config_path, verbose, &config);
        return Ok(());
    };

    let calculator = TripCalculator::from_config(&config)?;

    match command {
        Command::Compare {
            from,
            to,
            mode,
            sort,
            json,
        } => {
            let sort = sort.unwrap_or(config.defaults.sort);
            let report = calculator.compare(&from, &to, &mode, sort)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Command::Distance { from, to } => {
            let route = calculator.route(&from, &to)?;
            println!(
                "{} → {}: {} ({:.1} km)",
                route.from.name,
                route.to.name,
                format_distance(route.distance_km),
                route.distance_km
            );
        }
        Command::Cities { prefix } => {
            for city in calculator.cities().suggest(prefix.as_deref().unwrap_or("")) {
                match &city.country {
                    Some(country) => println!("{} ({country})", city.name),
                    None => println!("{}", city.name),
                }
            }
        }
        Command::Modes { filter } => {
            for mode in calculator.registry().suggest(filter.as_deref().unwrap_or("")) {
                println!(
                    "{:<14} {:<18} {:.3} kg CO₂/km  {:>5} km/h  ${:.2}/km",
                    mode.key,
                    mode.display(),
                    mode.emission,
                    mode.speed,
                    mode.cost
                );
            }
        }
    }

    Ok(())
}

fn print_banner(config_path: Option<PathBuf>, verbose: bool, config: &CarbonTripConfig) {
    println!("CarbonTrip {}", carbontrip::VERSION);
    println!("Compare the CO₂, time and cost of getting from A to B.");
    println!();
    println!("Try: carbontrip compare --from \"New York\" --to London --mode plane");
    println!("     carbontrip modes");
    println!("     carbontrip cities --prefix lo");

    if verbose {
        let config_path = config_path
            .or_else(CarbonTripConfig::get_config_path)
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
        println!();
        println!("Using config from: {config_path}");
        println!("Log level: {}", config.logging.level);
        println!(
            "Carbon price: ${}/kg CO₂, tree absorption: {} kg/year",
            config.comparison.carbon_price_per_kg, config.comparison.tree_absorption_kg
        );
    }
}
