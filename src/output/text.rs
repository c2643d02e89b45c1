use std::io;
use std::time::Duration;

use crate::output::Reporter;
use crate::suite::{Case, CaseResult, Module, Outcome, SuiteReport};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.3}s")
    } else {
        format!("{:.3}ms", secs * 1000.0)
    }
}

pub struct TextReporter {
    /// Print every case, not only failures.
    pub verbose: bool,
}

impl TextReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn write_case(&self, result: &CaseResult, writer: &mut dyn io::Write) -> io::Result<()> {
        match &result.outcome {
            Outcome::Passed => writeln!(
                writer,
                "  ok      {} ({})",
                result.name,
                format_duration(result.duration)
            ),
            Outcome::Failed(message) => {
                writeln!(
                    writer,
                    "  FAILED  {} ({})",
                    result.name,
                    format_duration(result.duration)
                )?;
                writeln!(writer, "          {message}")
            }
        }
    }
}

impl Reporter for TextReporter {
    fn report_summary(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()> {
        let stats = report.stats();
        writeln!(writer, "Self-check Summary")?;
        writeln!(writer, "==================")?;
        writeln!(writer, "Cases run: {}", stats.total)?;
        writeln!(writer, "Passed:    {}", stats.passed)?;
        writeln!(writer, "Failed:    {}", stats.failed)?;
        writeln!(writer, "Duration:  {}", format_duration(report.duration))?;
        writeln!(
            writer,
            "Status:    {}",
            if report.success() { "PASSED" } else { "FAILED" }
        )?;
        Ok(())
    }

    fn report_cases(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()> {
        if !self.verbose && report.success() {
            return Ok(());
        }

        for module in Module::ALL {
            let results: Vec<&CaseResult> = report
                .results
                .iter()
                .filter(|r| r.module == module)
                .filter(|r| self.verbose || r.outcome.is_failure())
                .collect();
            if results.is_empty() {
                continue;
            }
            writeln!(writer, "{module}")?;
            writeln!(writer, "{}", "-".repeat(module.as_str().len()))?;
            for result in results {
                self.write_case(result, writer)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    fn report_catalog(&self, cases: &[Case], writer: &mut dyn io::Write) -> io::Result<()> {
        if cases.is_empty() {
            writeln!(writer, "No cases selected.")?;
            return Ok(());
        }
        for case in cases {
            writeln!(writer, "{}", case.id())?;
        }
        Ok(())
    }
}
