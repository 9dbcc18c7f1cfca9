//! wc_draw CLI
//!
//! Single draws, large seed scans and the reports built from them.

#[cfg(feature = "cli")]
use anyhow::{bail, Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::sync::atomic::AtomicBool;
#[cfg(feature = "cli")]
use std::sync::Arc;
#[cfg(feature = "cli")]
use wc_cli::format::{format_cities, format_draw, format_pots, format_slots, PotsReport};
#[cfg(feature = "cli")]
use wc_core::{DrawConfig, DrawOptions, ScanMeta, ScanSettings};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "wc_draw")]
#[command(about = "World Cup group draw simulator", long_about = None)]
struct Cli {
    /// Roster CSV file
    #[arg(long, global = true, default_value = wc_cli::DEFAULT_ROSTER)]
    teams: PathBuf,

    /// Debug logging (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args, Clone, Copy)]
struct FeatureFlags {
    /// UEFA qualifying group winners never share a group
    #[arg(long)]
    uefa_group_winners_separated: bool,

    /// Seed UEFA playoff paths into pots by ranking
    #[arg(long)]
    uefa_playoffs_seeded: bool,

    /// Official procedure: top-4 bracket separation
    #[arg(long)]
    fifa_official_constraints: bool,
}

#[cfg(feature = "cli")]
impl FeatureFlags {
    fn config(self) -> DrawConfig {
        DrawConfig {
            uefa_group_winners_separated: self.uefa_group_winners_separated,
            uefa_playoffs_seeded: self.uefa_playoffs_seeded,
            fifa_official_constraints: self.fifa_official_constraints,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print the pots
    Pots {
        /// Also list placeholder slots
        #[arg(long)]
        slots: bool,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        features: FeatureFlags,
    },

    /// Run one full draw
    Draw {
        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u32>,

        /// Randomized attempts per pot before backtracking
        #[arg(long, default_value_t = DrawOptions::DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        features: FeatureFlags,
    },

    /// Draw a range of seeds in parallel into a JSONL file
    Scan {
        /// First seed (inclusive)
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// Last seed (exclusive)
        #[arg(long, default_value_t = 10_000)]
        end: u32,

        /// Worker threads (default: all cores but one)
        #[arg(long)]
        workers: Option<usize>,

        /// Primary attempt budget
        #[arg(long, default_value_t = 2000)]
        max_attempts: u32,

        /// Attempt budget for the retry of an infeasible seed
        #[arg(long, default_value_t = 10_000)]
        retry_attempts: u32,

        /// Re-validate every successful draw before recording it
        #[arg(long)]
        self_check: bool,

        /// Output JSONL path (appended to if it exists)
        #[arg(long, default_value = "seed_scan.jsonl")]
        output: PathBuf,

        #[command(flatten)]
        features: FeatureFlags,
    },

    /// Aggregate a scan file into statistics JSON
    Aggregate {
        /// Scan JSONL file
        #[arg(long)]
        input: PathBuf,

        /// Statistics JSON path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate one seed of a scan file against the roster
    Validate {
        /// Seed to look up
        seed: u32,

        /// Scan JSONL file
        #[arg(long, default_value = "seed_scan.jsonl")]
        input: PathBuf,

        #[command(flatten)]
        features: FeatureFlags,
    },

    /// Per-team host-city probabilities
    Cities {
        /// Statistics JSON from `aggregate`
        #[arg(long)]
        stats: PathBuf,

        /// Venue schedule JSON
        #[arg(long)]
        schedule: PathBuf,

        /// Only this team
        #[arg(long)]
        team: Option<String>,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        features: FeatureFlags,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Pots {
            slots,
            json,
            features,
        } => {
            let roster = wc_cli::load_roster(&cli.teams)?;
            let config = features.config();
            let pots = if config.uefa_playoffs_seeded {
                wc_core::assign_pots(&roster.pots(), &config)
            } else {
                roster.pots()
            };
            let slot_list = roster.slots();

            if json {
                let report = PotsReport::new(&pots, &slot_list);
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            println!("{}", format_pots(&pots, &slot_list));
            if slots {
                println!("\nSlots:");
                println!("{}", format_slots(&slot_list));
            }
        }

        Commands::Draw {
            seed,
            max_attempts,
            json,
            features,
        } => {
            let config = features.config();
            let roster = wc_cli::load_roster(&cli.teams)?;
            let pots = roster.draw_pots(&config)?;
            let slot_list = roster.slots();
            let seed = seed.unwrap_or_else(wc_core::draw::fresh_seed);
            let options = DrawOptions {
                max_attempts,
                ..DrawOptions::default()
            };

            let outcome = match wc_core::run_full_draw(&pots, Some(seed), &options, &config) {
                Ok(outcome) => outcome,
                Err(err) => bail!("Draw failed for seed {}: {}", seed, err),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.to_record())?);
            } else {
                println!("{}\n", format_pots(&pots, &slot_list));
                print!("{}", format_draw(&outcome, &slot_list));
            }
        }

        Commands::Scan {
            start,
            end,
            workers,
            max_attempts,
            retry_attempts,
            self_check,
            output,
            features,
        } => {
            if end <= start {
                bail!("Empty seed range {}..{}", start, end);
            }
            let config = features.config();
            let pots = wc_cli::load_roster(&cli.teams)?.draw_pots(&config)?;
            let workers = workers.unwrap_or_else(default_workers);
            let settings = ScanSettings {
                config,
                options: DrawOptions::with_max_attempts(max_attempts),
                retry_attempts,
                self_check,
            };

            let cancel = Arc::new(AtomicBool::new(false));
            signal_hook::flag::register(signal_hook::consts::signal::SIGINT, Arc::clone(&cancel))
                .context("Failed to install Ctrl-C handler")?;

            println!("Scanning seeds {}..{} with {} workers", start, end, workers);
            println!("   Config: {}", config);
            println!("   Output: {}", output.display());

            wc_cli::write_header_if_new(
                &output,
                ScanMeta {
                    start,
                    end,
                    workers,
                },
            )?;
            let writer = wc_cli::JsonlWriter::open(&output)?;
            let summary = wc_cli::run_scan(&pots, start..end, workers, &settings, &writer, &cancel)?;

            if summary.cancelled {
                bail!(
                    "Interrupted after {} seeds; {} holds only complete records",
                    summary.completed,
                    output.display()
                );
            }
            println!(
                "Finished seeds {}..{}: {}/{} succeeded -> {}",
                start,
                end,
                summary.succeeded,
                summary.completed,
                output.display()
            );
        }

        Commands::Aggregate { input, output } => {
            let report = wc_cli::StatsReport::from_scan(&input)?;
            match output {
                Some(path) => {
                    report.save(&path)?;
                    println!(
                        "{} runs, {} successes ({:.2}%) -> {}",
                        report.stats.total_runs,
                        report.stats.successes,
                        report.stats.success_rate * 100.0,
                        path.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::Validate {
            seed,
            input,
            features,
        } => {
            let config = features.config();
            let pots = wc_cli::load_roster(&cli.teams)?.draw_pots(&config)?;
            let lines = wc_cli::read_scan(&input)?;
            let Some(record) = wc_cli::find_seed_record(&lines, seed) else {
                bail!("Seed {} not found in {}", seed, input.display());
            };

            let violations = wc_cli::validate_record(record, &pots, &config)?;
            if !violations.is_empty() {
                for violation in &violations {
                    eprintln!("  {}", violation);
                }
                bail!("Seed {} violates {} constraint(s)", seed, violations.len());
            }
            println!("Seed {}: valid ({})", seed, config);
        }

        Commands::Cities {
            stats,
            schedule,
            team,
            json,
            features,
        } => {
            let config = features.config();
            let pots = wc_cli::load_roster(&cli.teams)?.draw_pots(&config)?;
            let stats = wc_cli::load_stats(&stats)?;
            let mut report = wc_cli::city_report(&stats, &pots, &schedule)?;
            if let Some(name) = team {
                report.retain(|t, _| *t == name);
                if report.is_empty() {
                    bail!("No statistics for {}", name);
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (name, cities) in &report {
                    println!("{}\n", format_cities(name, cities));
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("Error: CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
