use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::WrapErr;
use pfos_core::{ScheduleConfig, Scheduler, summarize};

mod input;
mod logging;
mod render;

#[derive(Parser, Debug)]
#[command(name = "pfos")]
#[command(about = "Validate financial event manifests and expand them into monthly schedules")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Write logs to `pfos.log` in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a manifest and report every problem found
    Check {
        /// Manifest file (.json, .yaml or .yml)
        file: PathBuf,
    },

    /// Print the ordered monthly events of a manifest
    Schedule {
        /// Manifest file (.json, .yaml or .yml)
        file: PathBuf,

        /// First month to print
        #[arg(long, default_value_t = 0)]
        from: u32,

        /// Number of months to print (default: through the horizon)
        #[arg(long)]
        months: Option<u32>,

        /// Planning horizon in years
        #[arg(long)]
        horizon_years: Option<u32>,

        /// Print per-month cash-flow totals instead of events
        #[arg(long)]
        summary: bool,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// List registered event kinds with their phase and default priority
    Kinds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Yaml,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _log_guard = logging::init_logging(&args.log_level, args.log_dir.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Check { file } => {
            let manifest = input::read_manifest(&file)?;
            writeln!(
                out,
                "{}: ok ({} events, {} goals, net worth {:.2})",
                file.display(),
                manifest.events().len(),
                manifest.goals().len(),
                manifest.initial_net_worth()
            )?;
        }
        Command::Schedule {
            file,
            from,
            months,
            horizon_years,
            summary,
            format,
        } => {
            let manifest = input::read_manifest(&file)?;
            let mut config = ScheduleConfig::from_manifest(&manifest);
            if let Some(years) = horizon_years {
                config = config.with_horizon_months(years.saturating_mul(12));
            }
            let end = months.map_or(config.horizon_months, |n| from.saturating_add(n));

            let scheduler = Scheduler::new(&manifest, config)
                .wrap_err("manifest cannot be scheduled")?;
            let schedule = scheduler.schedule_range(from..end);
            tracing::info!(
                months = schedule.len(),
                events = schedule.event_count(),
                "Schedule built"
            );

            match (format, summary) {
                (Format::Table, false) => render::schedule_table(&schedule, &mut out)?,
                (Format::Table, true) => render::summary_table(&summarize(&schedule), &mut out)?,
                (Format::Json, false) => render::json(&schedule, &mut out)?,
                (Format::Json, true) => render::json(&summarize(&schedule), &mut out)?,
                (Format::Yaml, false) => render::yaml(&schedule, &mut out)?,
                (Format::Yaml, true) => render::yaml(&summarize(&schedule), &mut out)?,
            }
        }
        Command::Kinds => render::kinds_table(&mut out)?,
    }

    tracing::debug!("Done");
    Ok(())
}
