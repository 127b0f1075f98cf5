use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use apex_rating::config::{self, Config};
use apex_rating::output::{self, OutputFormat};
use apex_rating::scoring::{self, ComponentSet, PointsResult};
use apex_rating::store::{self, EventKey, Store};
use apex_rating::{diagnostics, ingest, report, simulate};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one participant at one event from any subset of components
    #[command(group(
        ArgGroup::new("components")
            .required(true)
            .multiple(true)
            .args(["rr", "qr", "td", "oq", "wa"])
    ))]
    Score {
        /// Race pace (0-10)
        #[arg(long)]
        rr: Option<f64>,
        /// Qualifying pace (0-10)
        #[arg(long)]
        qr: Option<f64>,
        /// Tyre / stint management (0-10)
        #[arg(long)]
        td: Option<f64>,
        /// Overtaking quality (0-10)
        #[arg(long)]
        oq: Option<f64>,
        /// Wet-weather ability (0-10)
        #[arg(long)]
        wa: Option<f64>,
        /// Penalty factor; magnitude is used, capped at 2
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pf: f64,
        /// Relative car strength (1.0 = field average)
        #[arg(long, default_value_t = 1.0)]
        car_strength: f64,
    },
    /// Ingest event files (JSON, one event or a list) into the store
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate and ingest a simulated season
    Simulate {
        #[arg(long)]
        season: i32,
        #[arg(long, default_value_t = simulate::DEFAULT_ROUNDS)]
        rounds: u32,
    },
    /// Show one event (defaults to the latest event with results)
    Event {
        #[arg(long)]
        season: Option<i32>,
        #[arg(long, requires = "season")]
        round: Option<u32>,
        /// Show constructors instead of drivers
        #[arg(long)]
        teams: bool,
    },
    /// Season standings on the 0-100 scale
    Season {
        season: i32,
        /// Show constructors instead of drivers
        #[arg(long)]
        teams: bool,
        /// Show the per-round cumulative curve
        #[arg(long)]
        timeline: bool,
    },
    /// All-time table ranked by shrunk mean per event
    History {
        /// Show constructors instead of drivers
        #[arg(long)]
        teams: bool,
        /// Only names matching this pattern (substring or glob)
        #[arg(long)]
        filter: Option<String>,
        /// Show at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Seasons contested, championship positions and mean season value
    BestSeasons {
        /// Show constructors instead of drivers
        #[arg(long)]
        teams: bool,
    },
    /// Store summary and checks on the latest event
    Validate,
    /// Calendar rounds with and without results, per season
    Coverage,
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "apex")]
#[command(
    about = "Composite performance ratings for motorsport drivers and constructors",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/apex-rating/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the store file (overrides the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Output format for tables
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    apex_rating::logging::init(cli.verbose);
    let start_time = Instant::now();

    // Init runs before the config is loaded so a broken config can be replaced
    if let Commands::Init { force } = cli.command {
        match config::write_default_config(cli.config.clone(), force) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    if let Err(errors) =
        scoring::validate_scoring(&config.scoring, &config.constructor, &config.shrinkage)
    {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let store_path = config::resolve_store_path(cli.store.clone(), &config);
    debug!(store = %store_path.display(), "resolved store path");

    let code = match run(&cli, &config, &store_path) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_DATA
        }
    };

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(code);
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    points: f64,
    csi: f64,
    breakdown: &'a scoring::engine::PointsBreakdown,
}

fn print_score(
    result: &PointsResult,
    csi: f64,
    format: OutputFormat,
    use_colors: bool,
) -> Result<()> {
    let table = output::breakdown_table(result);
    let data = ScoreOutput {
        points: result.points,
        csi,
        breakdown: &result.breakdown,
    };
    if format == OutputFormat::Table {
        println!("{}", output::format_table(&table, "No components supplied.", use_colors));
        println!();
        println!(
            "Base {:.3} - penalty {:.3} = {:.3} points | CSI {:.3}",
            result.breakdown.base, result.breakdown.penalty, result.points, csi
        );
    } else {
        println!("{}", output::render(format, &table, &data, "", use_colors)?);
    }
    Ok(())
}

/// Latest round with results in `season`.
fn latest_round(store: &Store, season: i32) -> Option<EventKey> {
    store
        .rounds(season)
        .into_iter()
        .rev()
        .filter_map(|r| EventKey::new(season, r).ok())
        .find(|k| store.has_results(*k))
}

fn run(cli: &Cli, config: &Config, store_path: &std::path::Path) -> Result<i32> {
    let use_colors = output::should_use_colors();
    let format = cli.format;

    match &cli.command {
        // Handled in main before the config is loaded
        Commands::Init { .. } => {}

        Commands::Score {
            rr,
            qr,
            td,
            oq,
            wa,
            pf,
            car_strength,
        } => {
            let set = ComponentSet::new(*rr, *qr, *td, *oq, *wa);
            let result = scoring::calculate_points(&set, *pf, &config.scoring);
            let csi = scoring::calculate_csi(&set, *car_strength, &config.scoring);
            print_score(&result, csi, format, use_colors)?;
        }

        Commands::Ingest { files } => {
            let mut events = Vec::new();
            for file in files {
                let parsed = ingest::read_event_file(file)?;
                debug!(file = %file.display(), events = parsed.len(), "read event file");
                events.extend(parsed);
            }
            let mut store = store::load_store(store_path)?;
            let summary = ingest::ingest_events(&mut store, &events, config)?;
            store::save_store(store_path, &store)?;
            println!(
                "Ingested {} events ({} driver rows, {} constructor rows) into {}",
                summary.events,
                summary.drivers,
                summary.teams,
                store_path.display()
            );
        }

        Commands::Simulate { season, rounds } => {
            let events = simulate::simulate_season(*season, *rounds);
            let mut store = store::load_store(store_path)?;
            let summary = ingest::ingest_events(&mut store, &events, config)?;
            store::save_store(store_path, &store)?;
            info!(season, rounds, "simulated season");
            println!(
                "Simulated {} rounds of {} ({} driver rows) into {}",
                summary.events,
                season,
                summary.drivers,
                store_path.display()
            );
        }

        Commands::Event {
            season,
            round,
            teams,
        } => {
            let store = store::load_store(store_path)?;
            let key = match (season, round) {
                (Some(s), Some(r)) => Some(EventKey::new(*s, *r)?),
                (Some(s), None) => Some(
                    latest_round(&store, *s)
                        .with_context(|| format!("No results for season {}", s))?,
                ),
                _ => None,
            };

            let Some(event) = report::event_report(&store, key) else {
                println!("No event data. Ingest or simulate a season first.");
                return Ok(EXIT_SUCCESS);
            };

            if format == OutputFormat::Table {
                println!("{} ({})", event.event.name, event.event.key);
            }
            let rendered = if *teams {
                let table = output::event_teams_table(&event.teams);
                output::render(format, &table, &event.teams, "No constructor results.", use_colors)?
            } else {
                let table = output::event_drivers_table(&event.drivers);
                output::render(format, &table, &event.drivers, "No driver results.", use_colors)?
            };
            println!("{}", rendered);
        }

        Commands::Season {
            season,
            teams,
            timeline,
        } => {
            let store = store::load_store(store_path)?;
            let season_report = report::season_report(&store, *season)?;
            let empty = "No results for this season.";

            let rendered = match (*teams, *timeline) {
                (false, false) => {
                    let table = output::season_drivers_table(&season_report.drivers);
                    output::render(format, &table, &season_report.drivers, empty, use_colors)?
                }
                (true, false) => {
                    let table = output::season_teams_table(&season_report.teams);
                    output::render(format, &table, &season_report.teams, empty, use_colors)?
                }
                (false, true) => {
                    let timelines = &season_report.driver_timelines;
                    let table = output::timeline_table(timelines, "Driver");
                    output::render(format, &table, timelines, empty, use_colors)?
                }
                (true, true) => {
                    let timelines = &season_report.team_timelines;
                    let table = output::timeline_table(timelines, "Team");
                    output::render(format, &table, timelines, empty, use_colors)?
                }
            };
            println!("{}", rendered);
        }

        Commands::History {
            teams,
            filter,
            limit,
        } => {
            let store = store::load_store(store_path)?;
            let filter = filter
                .as_deref()
                .map(report::NameFilter::new)
                .transpose()
                .context("Invalid --filter pattern")?;
            let keep = |name: &str| filter.as_ref().map_or(true, |f| f.matches(name));
            let limit = limit.unwrap_or(usize::MAX);
            let empty = "No historical data.";

            let rendered = if *teams {
                let history = report::team_history(&store, &config.shrinkage);
                debug!(k = history.prior.k, mu = history.prior.mu, "constructor prior");
                let rows: Vec<_> = history
                    .rows
                    .into_iter()
                    .filter(|r| keep(&r.team))
                    .take(limit)
                    .collect();
                let table = output::history_teams_table(&rows);
                output::render(format, &table, &rows, empty, use_colors)?
            } else {
                let history = report::driver_history(&store, &config.shrinkage);
                debug!(k = history.prior.k, mu = history.prior.mu, "driver prior");
                let rows: Vec<_> = history
                    .rows
                    .into_iter()
                    .filter(|r| keep(&r.driver))
                    .take(limit)
                    .collect();
                let table = output::history_drivers_table(&rows);
                output::render(format, &table, &rows, empty, use_colors)?
            };
            println!("{}", rendered);
        }

        Commands::BestSeasons { teams } => {
            let store = store::load_store(store_path)?;
            let rows = if *teams {
                report::best_seasons_teams(&store)?
            } else {
                report::best_seasons_drivers(&store)?
            };
            let table = output::best_seasons_table(&rows);
            println!(
                "{}",
                output::render(format, &table, &rows, "No seasons with results.", use_colors)?
            );
        }

        Commands::Validate => {
            let store = store::load_store(store_path)?;
            let summary = diagnostics::quick_summary(&store);
            let checks = diagnostics::validate_latest_event(&store);
            if format == OutputFormat::Json {
                #[derive(Serialize)]
                struct ValidateOutput<'a> {
                    summary: &'a diagnostics::StoreSummary,
                    checks: &'a [diagnostics::Check],
                }
                let out = ValidateOutput {
                    summary: &summary,
                    checks: &checks,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("Failed to serialize output")?
                );
            } else {
                println!("{}", summary);
                println!();
                println!("{}", diagnostics::format_checks(&checks));
            }
            if !diagnostics::all_passed(&checks) {
                return Ok(EXIT_DATA);
            }
        }

        Commands::Coverage => {
            let store = store::load_store(store_path)?;
            let coverage = diagnostics::coverage_report(&store);
            if format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&coverage).context("Failed to serialize output")?
                );
            } else {
                println!("{}", diagnostics::format_coverage(&coverage));
            }
        }
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accepts_any_component_subset() {
        let cli = Cli::try_parse_from(["apex", "score", "--qr", "8.5"]).unwrap();
        match cli.command {
            Commands::Score { rr, qr, td, .. } => {
                assert_eq!(rr, None);
                assert_eq!(qr, Some(8.5));
                assert_eq!(td, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let args = ["apex", "score", "--rr", "9", "--wa", "7", "--pf", "-0.5"];
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_score_needs_a_component() {
        assert!(Cli::try_parse_from(["apex", "score", "--pf", "0.3"]).is_err());
    }
}
