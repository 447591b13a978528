//! Writers for analysis reports: stdout summary plus txt/csv/tsv/json files.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;

use crate::analysis::AnalysisReport;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Neutralizes spreadsheet formulas: cells starting with `=`, `+`, `-`, `@`, tab or CR get a leading `'`.
/// # Example
/// ```
/// use word_proximity::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)"), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("crisis"), "crisis");
/// ```
pub fn csv_safe_cell(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

fn format_ratio(ratio: f64) -> String {
    if ratio.is_nan() {
        "NaN".to_string()
    } else {
        format!("{ratio:.6}")
    }
}

/// Human-readable summary, the same text the CLI prints to stdout.
pub fn summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Target: \"{}\" (context ±{}, {} tokens)",
        report.target, report.context, report.total_tokens
    );

    let _ = writeln!(out, "\nRatio of \"{}\" per year:", report.target);
    for r in &report.ratios {
        let _ = writeln!(out, "  {}\t{}", r.year, format_ratio(r.ratio));
    }

    let _ = writeln!(out, "\nTop {} context words:", report.top_words.len());
    for (word, count) in &report.top_words {
        let _ = writeln!(out, "  {word}\t{count}");
    }

    let _ = writeln!(
        out,
        "\nProximity graph: {} nodes, {} edges",
        report.graph.nodes.len(),
        report.graph.edges.len()
    );

    match (&report.neighbor, report.pmi) {
        (Some(neighbor), Some(pmi)) => {
            let _ = writeln!(
                out,
                "\nPMI between \"{}\" and \"{}\": {:.4}",
                report.target, neighbor, pmi
            );
        }
        (Some(neighbor), None) => {
            let _ = writeln!(
                out,
                "\nPMI between \"{}\" and \"{}\" could not be calculated (probabilities are zero or no co-occurrence found).",
                report.target, neighbor
            );
        }
        (None, _) => {
            let _ = writeln!(out, "\nNo neighbor word available for PMI.");
        }
    }

    if let Some(neighbor) = &report.neighbor {
        let _ = writeln!(
            out,
            "\nCount of \"{}\" around \"{}\":",
            neighbor, report.target
        );
        for p in &report.positional {
            let _ = writeln!(out, "  {:+}\t{}", p.offset, p.count);
        }
    }
    out
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn write_table(
    path: &Path,
    format: ExportFormat,
    header: &[&str],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_path(path)?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Serialize)]
struct PmiRow<'a> {
    target: &'a str,
    neighbor: Option<&'a str>,
    context: usize,
    pmi: Option<f64>,
}

/// Writes the report into `out_dir` as `<stem>_<YYYYMMDD_HHMMSS>_<table>.<ext>` files.
///
/// `txt` writes only the summary; `csv`/`tsv` write one table per view;
/// `json` writes the tables plus the whole report. Returns the written paths.
pub fn export_report(
    report: &AnalysisReport,
    format: ExportFormat,
    out_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let ts = timestamp();
    let ext = format.extension();
    let file = |table: &str| out_dir.join(format!("{stem}_{ts}_{table}.{ext}"));
    let mut written = Vec::new();

    let pmi_row = PmiRow {
        target: &report.target,
        neighbor: report.neighbor.as_deref(),
        context: report.context,
        pmi: report.pmi,
    };

    match format {
        ExportFormat::Txt => {
            let path = file("summary");
            fs::write(&path, summary(report))?;
            written.push(path);
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let path = file("ratios");
            write_table(
                &path,
                format,
                &["year", "matches", "tokens", "ratio"],
                report.ratios.iter().map(|r| {
                    vec![
                        r.year.to_string(),
                        r.matches.to_string(),
                        r.tokens.to_string(),
                        r.ratio.to_string(),
                    ]
                }),
            )?;
            written.push(path);

            let path = file("nodes");
            write_table(
                &path,
                format,
                &[
                    "word",
                    "weight",
                    "direct_frequency",
                    "connected_edges",
                    "combined",
                    "x",
                    "y",
                    "z",
                ],
                report
                    .graph
                    .nodes
                    .iter()
                    .zip(&report.positions)
                    .map(|(n, p)| {
                        vec![
                            csv_safe_cell(&n.word),
                            n.weight.to_string(),
                            n.direct_frequency.to_string(),
                            n.connected_edges.to_string(),
                            n.combined.to_string(),
                            p.x.to_string(),
                            p.y.to_string(),
                            p.z.to_string(),
                        ]
                    }),
            )?;
            written.push(path);

            let path = file("edges");
            write_table(
                &path,
                format,
                &["from", "to"],
                report
                    .graph
                    .edges
                    .iter()
                    .map(|e| vec![csv_safe_cell(&e.from), csv_safe_cell(&e.to)]),
            )?;
            written.push(path);

            let path = file("positional");
            write_table(
                &path,
                format,
                &["offset", "count"],
                report
                    .positional
                    .iter()
                    .map(|p| vec![p.offset.to_string(), p.count.to_string()]),
            )?;
            written.push(path);

            let path = file("pmi");
            write_table(
                &path,
                format,
                &["target", "neighbor", "context", "pmi"],
                [vec![
                    csv_safe_cell(pmi_row.target),
                    csv_safe_cell(pmi_row.neighbor.unwrap_or_default()),
                    pmi_row.context.to_string(),
                    pmi_row.pmi.map(|v| v.to_string()).unwrap_or_default(),
                ]],
            )?;
            written.push(path);
        }
        ExportFormat::Json => {
            let path = file("ratios");
            write_json(&path, &report.ratios)?;
            written.push(path);

            let path = file("nodes");
            write_json(&path, &report.graph.nodes)?;
            written.push(path);

            let path = file("edges");
            write_json(&path, &report.graph.edges)?;
            written.push(path);

            let path = file("positional");
            write_json(&path, &report.positional)?;
            written.push(path);

            let path = file("pmi");
            write_json(&path, &pmi_row)?;
            written.push(path);

            let path = file("report");
            write_json(&path, report)?;
            written.push(path);
        }
    }

    info!("Exported {} file(s) to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analysis, AnalysisOptions};
    use crate::corpus::Corpus;

    fn sample_report(neighbor: Option<&str>) -> AnalysisReport {
        let mut corpus = Corpus::new();
        corpus.add_segment(1929, "banks fail crisis spreads").unwrap();
        corpus.add_segment(1930, "").unwrap();
        let mut o = AnalysisOptions::default();
        o.context = 1;
        o.seed = Some(3);
        o.neighbor = neighbor.map(String::from);
        Analysis::new(&corpus, "crisis", o).unwrap().report().unwrap()
    }

    #[test]
    fn test_csv_safe_cell() {
        assert_eq!(csv_safe_cell("+1"), "'+1");
        assert_eq!(csv_safe_cell("@x"), "'@x");
        assert_eq!(csv_safe_cell(""), "");
        assert_eq!(csv_safe_cell("'=already"), "'=already");
    }

    #[test]
    fn test_summary_sections() {
        let out = summary(&sample_report(None));
        assert!(out.contains("  1929\t0.250000"));
        assert!(out.contains("  1930\tNaN"));
        assert!(out.contains("PMI between \"crisis\" and \"fail\":"));
        assert!(out.contains("  -1\t1"));
    }

    #[test]
    fn test_summary_undefined_pmi() {
        let out = summary(&sample_report(Some("absent")));
        assert!(out.contains("could not be calculated"));
    }

    #[test]
    fn test_export_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report(None);

        let csv_files = export_report(&report, ExportFormat::Csv, dir.path(), "corpus").unwrap();
        assert_eq!(csv_files.len(), 5);
        let nodes = csv_files
            .iter()
            .find(|p| p.to_string_lossy().ends_with("_nodes.csv"))
            .unwrap();
        let content = fs::read_to_string(nodes).unwrap();
        assert!(content.starts_with("word,weight,direct_frequency"));
        assert!(content.contains("\ncrisis,"));

        let json_files = export_report(&report, ExportFormat::Json, dir.path(), "corpus").unwrap();
        let report_json = json_files
            .iter()
            .find(|p| p.to_string_lossy().ends_with("_report.json"))
            .unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_json).unwrap()).unwrap();
        assert_eq!(v["target"], "crisis");
        // NaN ratio of the empty year serializes as null
        assert!(v["ratios"][1]["ratio"].is_null());
    }
}
