pub mod json;
pub mod text;

use std::io;

use crate::suite::{Case, SuiteReport};

/// Trait for reporting self-check results.
pub trait Reporter {
    fn report_summary(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()>;
    fn report_cases(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()>;
    fn report_catalog(&self, cases: &[Case], writer: &mut dyn io::Write) -> io::Result<()>;

    /// Full report of a run: summary followed by per-case detail.
    fn report_run(&self, report: &SuiteReport, writer: &mut dyn io::Write) -> io::Result<()> {
        self.report_summary(report, writer)?;
        writeln!(writer)?;
        self.report_cases(report, writer)
    }
}
