//! Plain-text summary of the headline vitals
//!
//! One line per metric with its value and, for scored metrics, its rating.

use anyhow::Result;
use std::fmt::Write;

use crate::report::Report;
use crate::scoring::Rating;

/// Plain-text reporter
pub struct SummaryReporter;

impl SummaryReporter {
    /// Format the headline vitals of a report
    pub fn format(report: &Report) -> Result<String> {
        let vitals = &report.core_web_vitals;
        let scores = &report.performance_scores;
        let mut output = String::new();

        writeln!(output, "Core Web Vitals Report")?;
        writeln!(output, "──────────────────────────────────────────────────────")?;

        Self::format_row(&mut output, "LCP (Largest Contentful Paint)", ms(vitals.lcp), scores.lcp)?;
        Self::format_row(&mut output, "FID (First Input Delay)", ms(vitals.fid), scores.fid)?;
        Self::format_row(
            &mut output,
            "CLS (Cumulative Layout Shift)",
            format!("{:.4}", vitals.cls),
            Some(scores.cls),
        )?;
        Self::format_row(&mut output, "FCP (First Contentful Paint)", ms(vitals.fcp), None)?;
        Self::format_row(&mut output, "TTFB (Time to First Byte)", ms(vitals.ttfb), scores.ttfb)?;

        if let Some(inp) = vitals.inp {
            Self::format_row(&mut output, "INP (Interaction to Next Paint)", ms(Some(inp)), None)?;
        }

        writeln!(output)?;
        writeln!(
            output,
            "Resources: {} total, average {:.2}ms",
            report.resource_summary.total_resources, report.resource_summary.average_resource_time
        )?;
        writeln!(output, "Layout shifts: {}", report.layout_shifts.len())?;

        if let Some(memory) = &report.memory {
            writeln!(output, "Heap usage: {:.1}%", memory.usage_percentage)?;
        }

        Ok(output)
    }

    fn format_row(
        output: &mut String,
        label: &str,
        value: String,
        rating: Option<Rating>,
    ) -> Result<()> {
        match rating {
            Some(rating) => writeln!(output, "  {:<32} {:>12}  [{}]", label, value, rating)?,
            None => writeln!(output, "  {:<32} {:>12}", label, value)?,
        }
        Ok(())
    }
}

fn ms(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}ms", v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CapturedHost;
    use crate::metrics::{ObservationRecord, VitalsAggregator};
    use crate::timing::NavigationTiming;

    #[test]
    fn test_summary_lists_headline_vitals() {
        let host = CapturedHost::new().with_navigation(NavigationTiming {
            request_start: 10.0,
            response_start: 1910.0,
            ..NavigationTiming::default()
        });
        let mut aggregator = VitalsAggregator::new(host);
        aggregator.on_record(&ObservationRecord::largest_contentful_paint(1234.5));
        aggregator.on_record(&ObservationRecord::layout_shift(0.3, 100.0, false));

        let output = SummaryReporter::format(&aggregator.snapshot()).unwrap();

        assert!(output.contains("LCP (Largest Contentful Paint)"));
        assert!(output.contains("1234.50ms"));
        assert!(output.contains("[good]"));
        assert!(output.contains("0.3000"));
        assert!(output.contains("[poor]"));
        assert!(output.contains("1900.00ms"));
        assert!(!output.contains("INP"));
        assert!(output.contains("Layout shifts: 1"));
    }

    #[test]
    fn test_summary_marks_missing_values() {
        let report = VitalsAggregator::new(CapturedHost::new()).snapshot();
        let output = SummaryReporter::format(&report).unwrap();

        assert!(output.contains("FID (First Input Delay)"));
        assert!(output.contains("n/a"));
        assert!(!output.contains("Heap usage"));
    }
}
