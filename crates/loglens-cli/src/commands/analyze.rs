use crate::OutputFormat;
use anyhow::{Context, Result};
use loglens_core::access::LogReader;
use loglens_core::analysis::{
    AnalysisReport, Analyzer, ReportBuilder, StreamAggregator, SummaryAnalyzer,
    check_error_ceiling,
};
use std::path::Path;

/// Analyze one access log and return the summary plus the ranked urls
pub fn analyze_log(file: &Path, top_n: usize, max_error_perc: f64) -> Result<AnalysisReport> {
    check_error_ceiling(max_error_perc).context("Invalid --max-error-perc")?;

    tracing::debug!("Reading access log: {}", file.display());

    let reader = LogReader::open_path(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let aggregation = StreamAggregator::new(max_error_perc)
        .aggregate_reader(reader)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    let summary = SummaryAnalyzer.analyze(&aggregation)?;
    let records = ReportBuilder::new(top_n).analyze(&aggregation)?;

    Ok(AnalysisReport { summary, records })
}

pub fn execute(file: &Path, top_n: usize, max_error_perc: f64, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing access log: {}", file.display());

    let report = analyze_log(file, top_n, max_error_perc)?;

    tracing::debug!(
        "Printing {} urls as {}",
        report.records.len(),
        format
    );
    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &AnalysisReport) {
    use console::style;

    println!("\n{}", style("Access Log Report").bold().cyan());
    println!("{}", style("=================").cyan());

    let summary = &report.summary;
    println!("\n{}", style("Summary:").bold());
    println!("  Total Lines:        {}", summary.total_lines);
    println!("  Parsed Lines:       {}", summary.parsed_lines);
    if let Some(error_perc) = summary.error_perc {
        println!("  Unparsed:           {:.3}%", error_perc);
    }
    println!("  Distinct URLs:      {}", summary.distinct_urls);
    println!("  Total Time:         {:.3} s", summary.total_time);

    if !report.records.is_empty() {
        println!("\n{}", style("Slowest URLs:").bold());
        for (i, record) in report.records.iter().enumerate() {
            println!(
                "  {}. [{:.3} s, {:.3}%] {} - {} requests, avg {:.3} s, med {:.3} s, max {:.3} s",
                i + 1,
                record.time_sum,
                record.time_perc,
                style(&record.url).yellow(),
                record.count,
                record.time_avg,
                record.time_med,
                record.time_max
            );
        }
    }

    println!(); // trailing newline
}

fn output_json(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &AnalysisReport) {
    println!("url,count,count_perc,time_sum,time_perc,time_avg,time_max,time_med");
    for record in &report.records {
        println!(
            "{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3}",
            record.url,
            record.count,
            record.count_perc,
            record.time_sum,
            record.time_perc,
            record.time_avg,
            record.time_max,
            record.time_med
        );
    }
}
