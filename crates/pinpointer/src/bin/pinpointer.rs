use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nalgebra::Point2;
use pinpointer::core::ErrorDimension;
use pinpointer::io::{
    analyze_session_file, default_report_path, write_report_csv, write_report_json,
};
use pinpointer::{ErrorStatistics, ExportPayload, Point, ScaleCalibration};

#[derive(Parser, Debug)]
#[command(name = "pinpointer", version)]
#[command(about = "Positional error statistics for motor skill acquisition trials")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute per-trial errors and session statistics from a session file
    Analyze {
        /// Session JSON file
        session: PathBuf,
        /// Where to write the JSON report (default: <session>_report.json)
        #[arg(long)]
        report: Option<PathBuf>,
        /// Also write the tabular CSV report here
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the real-world scale factor of a two-point reference
    Scale {
        /// Real-world distance between the two points
        #[arg(long)]
        distance: f64,
        /// First reference point as X,Y (pixels)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,
        /// Second reference point as X,Y (pixels)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
    },
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Point2::new(x, y))
}

/// Default log filter for a `-v` count; `RUST_LOG` overrides it.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or(default_filter(verbose));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn print_summary(payload: &ExportPayload) {
    println!(
        "trials: {} (skipped: {})",
        payload.session.trial_count, payload.session.skipped_count
    );
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "", "mean", "std", "median", "min", "max"
    );
    for dim in ErrorDimension::ALL {
        let s: &ErrorStatistics = payload.statistics.get(dim);
        println!(
            "{:<8} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            dim.name(),
            s.mean,
            s.std_dev,
            s.median,
            s.min,
            s.max
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze {
            session,
            report,
            csv,
        } => {
            let payload = analyze_session_file(&session)?;
            let report_path = report.unwrap_or_else(|| default_report_path(&session));
            write_report_json(&payload, &report_path)?;
            log::info!("report written to {}", report_path.display());
            if let Some(csv_path) = csv {
                write_report_csv(&payload, &csv_path)?;
                log::info!("csv written to {}", csv_path.display());
            }
            print_summary(&payload);
        }
        Command::Scale { distance, from, to } => {
            let scale = ScaleCalibration::from_reference(distance, from, to)?;
            println!("{}", scale.factor());
        }
    }
    Ok(())
}
