use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::adapters::render::{
    default_report_file_name, render_bar_chart, render_history, render_report,
};
use crate::adapters::sqlite::{DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_PATH, StoreConfig};
use crate::error::AppError;
use crate::models::{Measurement, Parameter, Report};
use crate::quality::classifier::Assessment;

#[derive(Parser, Debug)]
#[command(author, version, about = "Water quality analyzer: classify, store and report drinking-water samples", long_about = None)]
pub struct Args {
    #[arg(
        long,
        global = true,
        env = "WATER_QUALITY_DB",
        value_name = "FILE",
        default_value = DEFAULT_DB_PATH,
        help = "SQLite database holding the report history"
    )]
    pub db: PathBuf,
    #[arg(long, global = true, value_name = "MS", default_value_t = DEFAULT_BUSY_TIMEOUT_MS)]
    pub busy_timeout_ms: u64,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "More log output on stderr (-v info, -vv debug)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify one sample and save it to the history
    Analyze(AnalyzeArgs),
    /// Show the most recent reports
    History(HistoryArgs),
}

/// The nine readings as typed by the operator; parsed by `parse_readings`.
#[derive(ClapArgs, Debug, Default)]
pub struct Readings {
    #[arg(long, allow_hyphen_values = true)]
    pub ph: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Total dissolved solids (ppm)")]
    pub tds: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Turbidity (NTU)")]
    pub turbidity: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Hardness (mg/L)")]
    pub hardness: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Chlorine (mg/L)")]
    pub chlorine: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Conductivity (µS/cm)")]
    pub conductivity: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Nitrates (mg/L)")]
    pub nitrates: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Fluoride (mg/L)")]
    pub fluoride: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Iron (mg/L)")]
    pub iron: Option<String>,
}

impl Readings {
    fn raw(&self, p: Parameter) -> Option<&String> {
        match p {
            Parameter::Ph => self.ph.as_ref(),
            Parameter::Tds => self.tds.as_ref(),
            Parameter::Turbidity => self.turbidity.as_ref(),
            Parameter::Hardness => self.hardness.as_ref(),
            Parameter::Chlorine => self.chlorine.as_ref(),
            Parameter::Conductivity => self.conductivity.as_ref(),
            Parameter::Nitrates => self.nitrates.as_ref(),
            Parameter::Fluoride => self.fluoride.as_ref(),
            Parameter::Iron => self.iron.as_ref(),
        }
    }

    fn is_empty(&self) -> bool {
        Parameter::ALL.iter().all(|p| self.raw(*p).is_none())
    }
}

#[derive(ClapArgs, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub readings: Readings,
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON file with a 'measurement' object; '-' reads from stdin"
    )]
    pub input: Option<String>,
    #[arg(
        long,
        value_name = "JSON",
        help = "Inline JSON measurement (overrides --input and reading flags)"
    )]
    pub inputs_json: Option<String>,
    #[arg(long)]
    pub json: bool,
    #[arg(long, help = "Print a bar chart of the readings")]
    pub chart: bool,
    #[arg(long, help = "Write a printable report with a timestamped file name")]
    pub report: bool,
    #[arg(long, value_name = "FILE", help = "Write the printable report to FILE")]
    pub report_path: Option<PathBuf>,
    #[arg(long, help = "Classify only; do not save to the history")]
    pub no_save: bool,
}

#[derive(ClapArgs, Debug)]
pub struct HistoryArgs {
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.db.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins unless `-v` is given.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("water_quality_rs=warn")),
        1 => EnvFilter::new("water_quality_rs=info"),
        _ => EnvFilter::new("water_quality_rs=debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Parse one operator-entered reading. Only finite numbers are accepted.
pub fn parse_reading(field: &'static str, text: &str) -> Result<f64, AppError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::InvalidInput {
            field,
            value: text.to_string(),
        })
}

/// Parse all nine reading flags; every one must be present.
pub fn parse_readings(readings: &Readings) -> Result<Measurement, AppError> {
    let mut values = [0.0; 9];
    for (slot, p) in values.iter_mut().zip(Parameter::ALL) {
        let text = readings
            .raw(p)
            .ok_or(AppError::MissingReading(p.key()))?;
        *slot = parse_reading(p.key(), text)?;
    }
    Ok(Measurement::from_values(values))
}

#[derive(serde::Deserialize)]
struct CmdInput {
    measurement: Measurement,
}

fn parse_cmd_input_doc(doc: &str) -> Result<Measurement, AppError> {
    let parsed: CmdInput =
        serde_json::from_str(doc).map_err(|source| AppError::ParseCmdInputJson { source })?;
    Ok(parsed.measurement)
}

pub fn parse_measurement(args: &AnalyzeArgs) -> Result<Measurement, AppError> {
    let measurement = match (&args.inputs_json, &args.input) {
        (Some(inputs_json), _) => serde_json::from_str::<Measurement>(inputs_json)
            .map_err(|source| AppError::ParseInputsJson { source })?,
        (None, Some(path)) if path == "-" => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .map_err(|source| AppError::ReadStdin { source })?;
            parse_cmd_input_doc(&s)?
        }
        (None, Some(path)) => {
            let s = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
                path: path.clone(),
                source,
            })?;
            parse_cmd_input_doc(&s)?
        }
        (None, None) if args.readings.is_empty() => return Err(AppError::MissingInputData),
        (None, None) => parse_readings(&args.readings)?,
    };
    measurement.ensure_finite()?;
    Ok(measurement)
}

#[derive(Serialize, Debug)]
pub struct AnalyzeOutput<'a> {
    pub timestamp: &'a str,
    pub measurement: &'a Measurement,
    pub assessment: &'a Assessment,
    pub report_id: Option<i64>,
}

pub fn print_assessment(out: &AnalyzeOutput<'_>, json: bool) -> Result<(), AppError> {
    if json {
        let s = serde_json::to_string_pretty(out)
            .map_err(|source| AppError::SerializeOutput { source })?;
        println!("{}", s);
    } else {
        println!("Water Status: {}", out.assessment.verdict);
        if !out.assessment.flagged.is_empty() {
            let names: Vec<&str> = out.assessment.flagged.iter().map(|p| p.label()).collect();
            println!("Out of range: {}", names.join(", "));
        }
        if let Some(id) = out.report_id {
            println!("Saved as report #{} at {}", id, out.timestamp);
        }
    }
    Ok(())
}

pub fn print_chart(measurement: &Measurement) {
    print!("{}", render_bar_chart(measurement));
}

/// Write the printable report; returns the path written.
pub fn write_report(
    args: &AnalyzeArgs,
    measurement: &Measurement,
    assessment: &Assessment,
    timestamp: &str,
) -> Result<Option<PathBuf>, AppError> {
    let path = match (&args.report_path, args.report) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from(default_report_file_name(&chrono::Local::now())),
        (None, false) => return Ok(None),
    };
    fs::write(&path, render_report(measurement, assessment, timestamp)).map_err(|source| {
        AppError::WriteReport {
            path: path.display().to_string(),
            source,
        }
    })?;
    Ok(Some(path))
}

pub fn print_history(reports: &[Report], json: bool) -> Result<(), AppError> {
    if json {
        let s = serde_json::to_string_pretty(reports)
            .map_err(|source| AppError::SerializeOutput { source })?;
        println!("{}", s);
    } else {
        print!("{}", render_history(reports));
    }
    Ok(())
}
