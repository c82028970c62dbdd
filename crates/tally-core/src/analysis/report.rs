//! Text renderings of an analysis snapshot.
//!
//! Rounding happens here and only here.

use std::fmt::Write;

use super::{AnalysisSnapshot, Diagnostics};

fn autocorrelation_text(d: &Diagnostics) -> String {
    match d.autocorrelation {
        Some(r) => format!("{:.3}", r),
        None => "undetermined".to_string(),
    }
}

fn stationarity_text(d: &Diagnostics) -> String {
    match d.stationarity.score {
        Some(score) => format!("{} (score {:.3})", d.stationarity.verdict.label(), score),
        None => d.stationarity.verdict.label().to_string(),
    }
}

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Multi-line report shown after every accepted entry.
///
/// An empty snapshot renders as its message alone.
pub fn render_report(snapshot: &AnalysisSnapshot) -> String {
    let d = match snapshot {
        AnalysisSnapshot::NoData { message } => return message.clone(),
        AnalysisSnapshot::Ready(d) => d,
    };

    let mut out = String::new();
    let _ = writeln!(out, "Intervals recorded: {}", d.observations);
    let _ = writeln!(out, "Mean intensity (λ): {:.3}", d.lambda);
    let _ = writeln!(out, "Sample variance: {:.3}", d.variance);
    let _ = writeln!(out, "Dispersion index (var/λ): {}", d.dispersion);
    let _ = writeln!(out, "Autocorrelation (lag 1): {}", autocorrelation_text(d));
    let _ = writeln!(out, "Stationarity (block test): {}", stationarity_text(d));
    let _ = writeln!(out);
    let _ = writeln!(out, "FORECAST (Poisson model):");
    let _ = writeln!(
        out,
        "  expected count next interval: {:.2}",
        d.forecast.expected_count
    );
    let _ = writeln!(
        out,
        "  probability of at least one event: {}",
        percent(d.forecast.prob_at_least_one)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "INTERPRETATION:");
    for sentence in &d.interpretation.sentences {
        let _ = writeln!(out, "  - {}", sentence);
    }
    out
}

/// One-line summary for `--format summary`.
pub fn render_summary(snapshot: &AnalysisSnapshot) -> String {
    match snapshot {
        AnalysisSnapshot::NoData { message } => message.clone(),
        AnalysisSnapshot::Ready(d) => format!(
            "n={} λ={:.3} var={:.3} dispersion={} r1={} stationarity={} P(≥1)={}",
            d.observations,
            d.lambda,
            d.variance,
            d.dispersion,
            autocorrelation_text(d),
            d.stationarity.verdict.label(),
            percent(d.forecast.prob_at_least_one),
        ),
    }
}

/// Markdown rendering for `--format md`.
pub fn render_markdown(snapshot: &AnalysisSnapshot) -> String {
    let d = match snapshot {
        AnalysisSnapshot::NoData { message } => return format!("# Tally analysis\n\n{}\n", message),
        AnalysisSnapshot::Ready(d) => d,
    };

    let mut out = String::new();
    let _ = writeln!(out, "# Tally analysis\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| Intervals | {} |", d.observations);
    let _ = writeln!(out, "| Mean intensity (λ) | {:.3} |", d.lambda);
    let _ = writeln!(out, "| Sample variance | {:.3} |", d.variance);
    let _ = writeln!(out, "| Dispersion index | {} |", d.dispersion);
    let _ = writeln!(out, "| Autocorrelation (lag 1) | {} |", autocorrelation_text(d));
    let _ = writeln!(out, "| Stationarity | {} |", stationarity_text(d));
    let _ = writeln!(
        out,
        "| Expected next count | {:.2} |",
        d.forecast.expected_count
    );
    let _ = writeln!(
        out,
        "| P(at least one) | {} |",
        percent(d.forecast.prob_at_least_one)
    );
    let _ = writeln!(out, "\n## Interpretation\n");
    for sentence in &d.interpretation.sentences {
        let _ = writeln!(out, "- {}", sentence);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisParams};

    fn snapshot(series: &[u64]) -> AnalysisSnapshot {
        analyze(series, &AnalysisParams::default())
    }

    #[test]
    fn empty_report_is_message_only() {
        let text = render_report(&AnalysisSnapshot::empty());
        assert_eq!(text, crate::analysis::NO_DATA_MESSAGE);
        assert_eq!(render_summary(&AnalysisSnapshot::empty()), text);
    }

    #[test]
    fn report_layout() {
        let text = render_report(&snapshot(&[1, 1, 1, 1]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Intervals recorded: 4");
        assert_eq!(lines[1], "Mean intensity (λ): 1.000");
        assert_eq!(lines[2], "Sample variance: 0.000");
        assert_eq!(lines[3], "Dispersion index (var/λ): 0.00");
        assert_eq!(lines[4], "Autocorrelation (lag 1): undetermined");
        assert_eq!(lines[5], "Stationarity (block test): insufficient data");
        assert!(text.contains("  expected count next interval: 1.00"));
        assert!(text.contains("  probability of at least one event: 63.2%"));
        assert!(text.contains("INTERPRETATION:\n  - Too few intervals"));
    }

    #[test]
    fn unbounded_dispersion_renders_infinity() {
        let text = render_report(&snapshot(&[0, 0, 0]));
        assert!(text.contains("Dispersion index (var/λ): ∞"));
    }

    #[test]
    fn stationarity_score_is_shown_when_defined() {
        let series: Vec<u64> = (0..20).map(|i| i % 2).collect();
        let text = render_report(&snapshot(&series));
        assert!(text.contains("Stationarity (block test): stable (score 0.000)"));
    }

    #[test]
    fn markdown_has_table_and_interpretation() {
        let md = render_markdown(&snapshot(&[2, 3, 1, 4, 2, 2]));
        assert!(md.starts_with("# Tally analysis"));
        assert!(md.contains("| Intervals | 6 |"));
        assert!(md.contains("## Interpretation"));
    }

    #[test]
    fn summary_is_one_line() {
        let line = render_summary(&snapshot(&[2, 3, 1, 4, 2, 2]));
        assert!(!line.contains('\n'));
        assert!(line.starts_with("n=6 λ=2.333"));
    }
}
