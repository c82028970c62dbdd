//! Data feed for an interval chart: raw counts, the smoothed curve and the
//! λ reference line.

use std::fmt::Write;

use serde::Serialize;

use crate::analysis::AnalysisSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// 1-based interval number.
    pub interval: usize,
    pub count: u64,
    pub moving_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFeed {
    pub points: Vec<ChartPoint>,
    /// Horizontal reference at λ; absent for an empty series.
    pub reference_mean: Option<f64>,
    pub moving_average_window: Option<usize>,
}

impl ChartFeed {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Pair each count with its smoothed value from the snapshot.
///
/// The snapshot must come from analyzing `series`; a mismatch in length
/// yields an empty feed rather than misaligned points.
pub fn chart_feed(series: &[u64], snapshot: &AnalysisSnapshot) -> ChartFeed {
    let Some(d) = snapshot.diagnostics() else {
        return ChartFeed {
            points: Vec::new(),
            reference_mean: None,
            moving_average_window: None,
        };
    };
    if d.moving_average.len() != series.len() {
        return ChartFeed {
            points: Vec::new(),
            reference_mean: None,
            moving_average_window: None,
        };
    }

    let points = series
        .iter()
        .zip(&d.moving_average)
        .enumerate()
        .map(|(i, (&count, &smoothed))| ChartPoint {
            interval: i + 1,
            count,
            moving_average: smoothed,
        })
        .collect();

    ChartFeed {
        points,
        reference_mean: Some(d.lambda),
        moving_average_window: Some(d.moving_average_window),
    }
}

/// Widest bar drawn, in columns.
pub const MAX_BAR_WIDTH: usize = 60;

/// Horizontal bar chart, one row per interval, for terminal output.
///
/// `#` marks the raw count and `|` where the moving average falls. One
/// column per event until the largest value exceeds [`MAX_BAR_WIDTH`];
/// beyond that every row is scaled by `MAX_BAR_WIDTH / largest`.
pub fn render_chart(feed: &ChartFeed) -> String {
    if feed.is_empty() {
        return String::new();
    }
    let widest = feed
        .points
        .iter()
        .map(|p| p.count as f64)
        .chain(feed.points.iter().map(|p| p.moving_average))
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let scale = if widest > MAX_BAR_WIDTH as f64 {
        MAX_BAR_WIDTH as f64 / widest
    } else {
        1.0
    };
    let columns = |v: f64| ((v * scale).round().max(0.0) as usize).min(MAX_BAR_WIDTH);
    let row_width = columns(widest.ceil()) + 1;
    let label_width = feed.points.len().to_string().len();

    let mut out = String::new();
    for p in &feed.points {
        let bar = "#".repeat(columns(p.count as f64));
        let marker = columns(p.moving_average);
        let mut row: Vec<char> = format!("{:<width$}", bar, width = row_width)
            .chars()
            .collect();
        if let Some(slot) = row.get_mut(marker) {
            *slot = '|';
        }
        let row: String = row.into_iter().collect();
        let _ = writeln!(
            out,
            "{:>lw$} {:>3} {} ma={:.2}",
            p.interval,
            p.count,
            row.trim_end(),
            p.moving_average,
            lw = label_width
        );
    }
    if let Some(lambda) = feed.reference_mean {
        let _ = writeln!(out, "λ = {:.3}", lambda);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisParams};

    #[test]
    fn feed_pairs_counts_with_smoothed_values() {
        let series = [1, 2, 3, 4, 5, 6];
        let snapshot = analyze(&series, &AnalysisParams::default());
        let feed = chart_feed(&series, &snapshot);
        assert_eq!(feed.points.len(), 6);
        assert_eq!(feed.points[0].interval, 1);
        assert_eq!(feed.points[5].count, 6);
        // Window 5 centred at index 2 covers indices 0..=4
        assert!((feed.points[2].moving_average - 3.0).abs() < 1e-12);
        assert_eq!(feed.reference_mean, Some(3.5));
        assert_eq!(feed.moving_average_window, Some(5));
    }

    #[test]
    fn rendered_chart_has_one_row_per_interval() {
        let series = [0, 2, 1];
        let feed = chart_feed(&series, &analyze(&series, &AnalysisParams::default()));
        let text = render_chart(&feed);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2   2 "));
        assert!(lines[1].contains("ma=2.00"));
        assert_eq!(lines[3], "λ = 1.000");
        assert_eq!(render_chart(&chart_feed(&[], &AnalysisSnapshot::empty())), "");
    }

    fn bar_columns(line: &str) -> usize {
        line.matches('#').count()
    }

    #[test]
    fn huge_counts_are_scaled_to_max_width() {
        let series = [u64::MAX];
        let feed = chart_feed(&series, &analyze(&series, &AnalysisParams::default()));
        let text = render_chart(&feed);
        let first = text.lines().next().unwrap();
        assert!(first.contains(&u64::MAX.to_string()));
        assert_eq!(bar_columns(first), MAX_BAR_WIDTH);
        assert!(first.contains("#|"));

        let series = [3, 50_000_000_000_000];
        let feed = chart_feed(&series, &analyze(&series, &AnalysisParams::default()));
        let text = render_chart(&feed);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        // 3 events are far below one column at this scale
        assert!(!lines[0].contains('#'));
        assert_eq!(bar_columns(lines[1]), MAX_BAR_WIDTH);
        assert!(lines
            .iter()
            .all(|l| l.chars().count() < MAX_BAR_WIDTH + 80));
    }

    #[test]
    fn small_counts_keep_one_column_per_event() {
        let series = [4, 60];
        let feed = chart_feed(&series, &analyze(&series, &AnalysisParams::default()));
        let text = render_chart(&feed);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(bar_columns(lines[0]), 4);
        assert_eq!(bar_columns(lines[1]), 60);
    }

    #[test]
    fn empty_snapshot_gives_empty_feed() {
        let feed = chart_feed(&[], &AnalysisSnapshot::empty());
        assert!(feed.is_empty());
        assert_eq!(feed.reference_mean, None);
    }

    #[test]
    fn mismatched_snapshot_gives_empty_feed() {
        let snapshot = analyze(&[1, 2], &AnalysisParams::default());
        assert!(chart_feed(&[1, 2, 3], &snapshot).is_empty());
    }
}
