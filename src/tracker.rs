use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use tracker_core::report::{OverdueItem, RecordFilter, Summary};
use tracker_core::sample::sample_table;
use tracker_core::*;

use crate::args::Args;
use crate::tracker::config_reader::*;
use crate::tracker::io_common::Provider;

pub mod config_reader;
mod export;
mod io_common;
mod io_csv;
mod io_excel;
mod io_pdf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TrackerError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },
    #[snafu(display("Unknown kind of item {kind:?} (expected submittal or rfi)"))]
    UnknownKind { kind: String },
    #[snafu(display("Unknown input type {provider:?} for {path}"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("Could not read the date {value:?} (expected YYYY-MM-DD)"))]
    InvalidDate {
        source: chrono::ParseError,
        value: String,
    },

    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("No worksheet {worksheet:?} in {path}"))]
    MissingWorksheet { worksheet: String, path: String },
    #[snafu(display("The file {path} has no data"))]
    EmptyInput { path: String },
    #[snafu(display("Error reading PDF file {path}: {message}"))]
    ReadingPdf { path: String, message: String },
    #[snafu(display("No table found in PDF file {path}"))]
    NoPdfTable { path: String },
    #[snafu(display("Cannot read {path}: this program was built without PDF support"))]
    MissingPdfSupport { path: String },

    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Where the rows of one kind come from.
#[derive(Eq, PartialEq, Debug, Clone)]
struct SourceSpec {
    path: PathBuf,
    provider: Option<String>,
    worksheet: Option<String>,
}

/// Everything a run needs, once the configuration file and the flags are merged.
#[derive(PartialEq, Debug, Clone)]
struct RunPlan {
    project_name: String,
    submittals: Option<SourceSpec>,
    rfis: Option<SourceSpec>,
    settings: Settings,
    filter: RecordFilter,
    out: Option<String>,
    export_dir: Option<PathBuf>,
    reference: Option<String>,
}

impl RunPlan {
    fn source(&self, kind: RecordKind) -> Option<&SourceSpec> {
        match kind {
            RecordKind::Submittal => self.submittals.as_ref(),
            RecordKind::Rfi => self.rfis.as_ref(),
        }
    }
}

fn parse_report_date(s: &str) -> TrackerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").context(InvalidDateSnafu { value: s })
}

/// Merges the configuration file (if any) and the command line. The command line wins.
fn build_plan(args: &Args, config: Option<(TrackerConfig, PathBuf)>) -> TrackerResult<RunPlan> {
    let mut plan = RunPlan {
        project_name: "Project".to_string(),
        submittals: None,
        rfis: None,
        settings: Settings::default(),
        filter: RecordFilter::default(),
        out: args.out.clone(),
        export_dir: None,
        reference: args.reference.clone(),
    };

    let mut report_date: Option<String> = None;
    if let Some((config, root)) = config {
        plan.project_name = config.output_settings.project_name.clone();
        report_date = config.output_settings.report_date.clone();
        plan.export_dir = config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| root.join(d));
        for cfs in config.file_sources.iter() {
            let src = SourceSpec {
                path: root.join(&cfs.file_path),
                provider: cfs.provider.clone(),
                worksheet: cfs.excel_worksheet_name.clone(),
            };
            match cfs.kind()? {
                RecordKind::Submittal => plan.submittals = Some(src),
                RecordKind::Rfi => plan.rfis = Some(src),
            }
        }
        if let Some(t) = config.thresholds.as_ref() {
            if let Some(x) = t.submittal_days {
                plan.settings.submittal_threshold_days = x;
            }
            if let Some(x) = t.rfi_days {
                plan.settings.rfi_threshold_days = x;
            }
        }
        if let Some(f) = config.filters.as_ref() {
            plan.filter.contractors = f.contractors.clone().unwrap_or_default();
            plan.filter.disciplines = f.disciplines.clone().unwrap_or_default();
        }
        plan.settings.organizations = config.organization_entries();
    }

    // Command line overrides.
    let cli_source = |path: &String| SourceSpec {
        path: PathBuf::from(path),
        provider: None,
        worksheet: None,
    };
    if let Some(p) = args.submittals.as_ref() {
        plan.submittals = Some(cli_source(p));
    }
    if let Some(p) = args.rfis.as_ref() {
        plan.rfis = Some(cli_source(p));
    }
    for src in [plan.submittals.as_mut(), plan.rfis.as_mut()].into_iter().flatten() {
        if args.input_type.is_some() {
            src.provider = args.input_type.clone();
        }
        if args.excel_worksheet_name.is_some() {
            src.worksheet = args.excel_worksheet_name.clone();
        }
    }
    if let Some(x) = args.submittal_threshold {
        plan.settings.submittal_threshold_days = x;
    }
    if let Some(x) = args.rfi_threshold {
        plan.settings.rfi_threshold_days = x;
    }
    if args.report_date.is_some() {
        report_date = args.report_date.clone();
    }
    if let Some(d) = report_date {
        plan.settings.today = parse_report_date(&d)?;
    }
    if !args.contractors.is_empty() {
        plan.filter.contractors = args.contractors.clone();
    }
    if !args.disciplines.is_empty() {
        plan.filter.disciplines = args.disciplines.clone();
    }
    if let Some(d) = args.export_dir.as_ref() {
        plan.export_dir = Some(PathBuf::from(d));
    }
    Ok(plan)
}

/// Reads one input file into a raw table.
fn read_table(src: &SourceSpec) -> TrackerResult<RawTable> {
    let path = src.path.display().to_string();
    let provider = match src.provider.as_ref() {
        Some(name) => Provider::from_name(name),
        None => Provider::from_path(&src.path),
    }
    .context(UnknownProviderSnafu {
        provider: src.provider.clone().unwrap_or_default(),
        path: path.clone(),
    })?;
    info!("read_table: reading {:?} as {:?}", path, provider);
    match provider {
        Provider::Csv => io_csv::read_csv_table(&path),
        Provider::Excel => io_excel::read_excel_table(&path, src.worksheet.as_deref()),
        Provider::Pdf => io_pdf::read_pdf_table(&path),
    }
}

/// The raw table of a kind, and where it comes from.
///
/// Input errors are not fatal: the sample dataset is used instead.
fn load_kind(plan: &RunPlan, kind: RecordKind) -> (RawTable, String) {
    match plan.source(kind) {
        Some(src) => match read_table(src) {
            Ok(raw) => {
                let name = io_common::simplify_file_name(&src.path);
                info!("load_kind: {}: {} rows from {}", kind, raw.num_rows(), name);
                (raw, name)
            }
            Err(e) => {
                warn!(
                    "load_kind: {}: could not read {:?}: {}. Using the sample data instead.",
                    kind, src.path, e
                );
                (sample_table(kind), "sample".to_string())
            }
        },
        None => {
            info!("load_kind: {}: no input file, using the sample data", kind);
            (sample_table(kind), "sample".to_string())
        }
    }
}

fn overdue_item_to_json(item: &OverdueItem) -> JSValue {
    json!({
        "itemId": item.id,
        "description": item.description,
        "contractor": item.contractor,
        "ballInCourt": item.ball_in_court,
        "daysOpen": item.days_open,
    })
}

fn summary_to_json(source: &str, nt: &NormalizedTable, summary: &Summary) -> JSValue {
    let substitutions: Vec<JSValue> = nt
        .substitutions
        .iter()
        .map(|s| json!({"source": s.source, "canonical": s.canonical}))
        .collect();
    let bic: Vec<JSValue> = summary
        .open_by_ball_in_court
        .iter()
        .map(|(name, count)| json!({"ballInCourt": name, "count": count}))
        .collect();
    let contractors: Vec<JSValue> = summary
        .avg_days_open_by_contractor
        .iter()
        .map(|(name, avg)| {
            json!({"contractor": name, "avgDaysOpen": (avg * 10.0).round() / 10.0})
        })
        .collect();
    let overdue: Vec<JSValue> = summary.overdue_items.iter().map(overdue_item_to_json).collect();
    json!({
        "kind": summary.kind.name(),
        "source": source,
        "total": summary.total,
        "open": summary.open,
        "closed": summary.closed,
        "overdue": summary.overdue,
        "openStatuses": nt.statuses.open,
        "closedStatuses": nt.statuses.closed,
        "substitutions": substitutions,
        "openByBallInCourt": bic,
        "avgDaysOpenByContractor": contractors,
        "overdueItems": overdue,
    })
}

fn build_summary_js(plan: &RunPlan, results: &[JSValue]) -> JSValue {
    json!({
        "config": {
            "projectName": plan.project_name,
            "reportDate": plan.settings.today.format("%Y-%m-%d").to_string(),
            "thresholds": {
                "submittalDays": plan.settings.submittal_threshold_days,
                "rfiDays": plan.settings.rfi_threshold_days,
            },
            "filters": {
                "contractors": plan.filter.contractors,
                "disciplines": plan.filter.disciplines,
            },
        },
        "results": results,
    })
}

fn write_summary(out: &Option<String>, pretty_js: &str) -> TrackerResult<()> {
    match out.as_deref() {
        None | Some("stdout") | Some("") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("write_summary: writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> TrackerResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("check_reference: reference: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("check_reference: the summary matches {:?}", reference_path);
    Ok(())
}

/// Runs the whole program: reading, normalization, filtering, exports and summary.
pub fn run(args: &Args) -> TrackerResult<()> {
    let config = match args.config.as_ref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("run: config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            Some((config, root))
        }
        None => None,
    };
    let plan = build_plan(args, config)?;
    info!("run: plan: {:?}", plan);

    let mut tables: Vec<NormalizedTable> = Vec::new();
    let mut results: Vec<JSValue> = Vec::new();
    let mut summaries: Vec<Summary> = Vec::new();
    for kind in RecordKind::ALL {
        let (raw, source) = load_kind(&plan, kind);
        let nt = normalize(raw, kind, &plan.settings);
        let filtered = plan.filter.apply(&nt);
        let summary = Summary::compute(&filtered);
        info!(
            "run: {}: {} items, {} open, {} overdue",
            kind, summary.total, summary.open, summary.overdue
        );
        results.push(summary_to_json(&source, &filtered, &summary));
        summaries.push(summary);
        tables.push(filtered);
    }

    if let Some(dir) = plan.export_dir.as_ref() {
        export::write_exports(dir, &tables, &summaries)?;
    }

    let result_js = build_summary_js(&plan, &results);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&plan.out, &pretty_js_stats)?;

    if let Some(reference_path) = plan.reference.as_ref() {
        check_reference(reference_path, &pretty_js_stats)?;
    }
    debug!(
        "run: done, {} columns in the submittal table",
        tables
            .first()
            .map(|t| t.table.column_names().len())
            .unwrap_or(0)
    );
    Ok(())
}
