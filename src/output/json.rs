use std::io;

use crate::output::Reporter;
use crate::suite::{Case, CaseResult, Outcome, SuiteReport};

pub struct JsonReporter;

#[derive(serde::Serialize)]
struct JsonSummary {
    total: usize,
    passed: usize,
    failed: usize,
    duration_ms: f64,
    success: bool,
}

#[derive(serde::Serialize)]
struct JsonCase {
    id: String,
    module: String,
    name: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    duration_ms: f64,
}

#[derive(serde::Serialize)]
struct JsonRun {
    summary: JsonSummary,
    cases: Vec<JsonCase>,
}

impl JsonReporter {
    fn to_json_summary(report: &SuiteReport) -> JsonSummary {
        let stats = report.stats();
        JsonSummary {
            total: stats.total,
            passed: stats.passed,
            failed: stats.failed,
            duration_ms: report.duration.as_micros() as f64 / 1000.0,
            success: report.success(),
        }
    }

    fn to_json_case(result: &CaseResult) -> JsonCase {
        let message = match &result.outcome {
            Outcome::Passed => None,
            Outcome::Failed(m) => Some(m.clone()),
        };
        JsonCase {
            id: format!("{}::{}", result.module, result.name),
            module: result.module.to_string(),
            name: result.name.to_string(),
            passed: message.is_none(),
            message,
            duration_ms: result.duration.as_micros() as f64 / 1000.0,
        }
    }
}

impl Reporter for JsonReporter {
    fn report_summary(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()> {
        let summary = Self::to_json_summary(report);
        let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
        writeln!(writer, "{json}")
    }

    fn report_cases(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()> {
        let cases: Vec<JsonCase> = report.results.iter().map(Self::to_json_case).collect();
        let json = serde_json::to_string_pretty(&cases).map_err(io::Error::other)?;
        writeln!(writer, "{json}")
    }

    fn report_catalog(&self, cases: &[Case], writer: &mut dyn io::Write) -> io::Result<()> {
        let ids: Vec<String> = cases.iter().map(Case::id).collect();
        let json = serde_json::to_string_pretty(&ids).map_err(io::Error::other)?;
        writeln!(writer, "{json}")
    }

    /// One JSON document holding both the summary and the cases.
    fn report_run(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()> {
        let run = JsonRun {
            summary: Self::to_json_summary(report),
            cases: report.results.iter().map(Self::to_json_case).collect(),
        };
        let json = serde_json::to_string_pretty(&run).map_err(io::Error::other)?;
        writeln!(writer, "{json}")
    }
}
