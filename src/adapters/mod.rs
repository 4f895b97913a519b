#[cfg(feature = "cli")]
pub mod cli;
pub mod render;
pub mod sqlite;
pub mod submission;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
pub fn run() -> Result<(), crate::error::AppError> {
    use crate::adapters::cli::{Args, Command, init_tracing};

    let args = Args::parse();
    init_tracing(args.verbose);

    match &args.command {
        Command::Analyze(analyze) => run_analyze(&args, analyze),
        Command::History(history) => {
            let store = sqlite::ReportStore::open(&args.store_config())?;
            let reports = store.list_recent(history.limit)?;
            cli::print_history(&reports, history.json)
        }
    }
}

#[cfg(feature = "cli")]
fn run_analyze(
    args: &cli::Args,
    analyze: &cli::AnalyzeArgs,
) -> Result<(), crate::error::AppError> {
    use crate::adapters::cli::{AnalyzeOutput, parse_measurement, print_assessment};
    use crate::quality::classifier::assess;
    use crate::adapters::submission::{now_timestamp, submit};

    let measurement = parse_measurement(analyze)?;
    let timestamp = now_timestamp();
    let assessment = assess(&measurement);

    let saved = if analyze.no_save {
        Ok(None)
    } else {
        sqlite::ReportStore::open(&args.store_config())
            .and_then(|store| submit(&store, &measurement, &timestamp))
            .map(|submission| Some(submission.id))
    };

    // The verdict is shown even when saving failed.
    let out = AnalyzeOutput {
        timestamp: &timestamp,
        measurement: &measurement,
        assessment: &assessment,
        report_id: saved.as_ref().ok().copied().flatten(),
    };
    print_assessment(&out, analyze.json)?;
    let report_id = saved.inspect_err(|_| eprintln!("The report was not saved."))?;
    tracing::debug!(?report_id, "analysis complete");

    if analyze.chart {
        cli::print_chart(&measurement);
    }
    if let Some(path) = cli::write_report(analyze, &measurement, &assessment, &timestamp)? {
        if !analyze.json {
            println!("Report written to {}", path.display());
        }
    }
    Ok(())
}
