// 📈 Charts
// Chart data built from summaries + a rendering seam so aggregation never
// depends on a display

use crate::aggregate::{CategoryTotal, DATE_FORMAT};
use anyhow::Result;
use chrono::NaiveDate;
use std::io::Write;

pub const NO_PLOT_DATA: &str = "No data to plot.";

/// Labelled series ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(String, f64)>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }
}

/// Category totals, already sorted largest first
pub fn category_chart(totals: &[CategoryTotal]) -> ChartData {
    ChartData {
        title: "Expenses by Category".to_string(),
        x_label: "Category".to_string(),
        y_label: "Amount".to_string(),
        points: totals
            .iter()
            .map(|t| (t.category.clone(), t.total))
            .collect(),
    }
}

/// Daily totals in chronological order
pub fn daily_chart(days: &[(NaiveDate, f64)]) -> ChartData {
    ChartData {
        title: "Daily Expense Trend".to_string(),
        x_label: "Date".to_string(),
        y_label: "Amount".to_string(),
        points: days
            .iter()
            .map(|(day, total)| (day.format(DATE_FORMAT).to_string(), *total))
            .collect(),
    }
}

// ============================================================================
// RENDERING SEAM
// ============================================================================

/// Displays a chart and returns once the user is done looking at it
pub trait ChartRenderer {
    fn bar_chart(&mut self, chart: &ChartData) -> Result<()>;
    fn line_chart(&mut self, chart: &ChartData) -> Result<()>;
}

/// Width of the longest bar in `TextCharts`
const TEXT_BAR_WIDTH: usize = 40;

/// Plain-text charts written to any writer
///
/// Used when the crate is built without the `tui` feature.
pub struct TextCharts<W: Write> {
    out: W,
}

impl<W: Write> TextCharts<W> {
    pub fn new(out: W) -> Self {
        TextCharts { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar_len(value: f64, max: f64) -> usize {
        if max <= 0.0 || value <= 0.0 {
            return 0;
        }
        ((value / max) * TEXT_BAR_WIDTH as f64).round() as usize
    }

    fn draw(&mut self, chart: &ChartData, glyph: &str) -> Result<()> {
        let max = chart.max_value();
        let label_width = chart
            .points
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
            .max(chart.x_label.chars().count());

        writeln!(self.out, "\n=== {} ===", chart.title)?;
        writeln!(self.out, "{:<w$} | {}", chart.x_label, chart.y_label, w = label_width)?;
        for (label, value) in &chart.points {
            writeln!(
                self.out,
                "{:<w$} | {} {:.2}",
                label,
                glyph.repeat(Self::bar_len(*value, max)),
                value,
                w = label_width
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ChartRenderer for TextCharts<W> {
    fn bar_chart(&mut self, chart: &ChartData) -> Result<()> {
        self.draw(chart, "#")
    }

    /// One row per point, `o` marks the value
    fn line_chart(&mut self, chart: &ChartData) -> Result<()> {
        let max = chart.max_value();
        writeln!(self.out, "\n=== {} ===", chart.title)?;
        writeln!(self.out, "{} / {}", chart.x_label, chart.y_label)?;
        for (label, value) in &chart.points {
            let offset = Self::bar_len(*value, max).saturating_sub(1);
            writeln!(self.out, "{} |{}o {:.2}", label, " ".repeat(offset), value)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> Vec<CategoryTotal> {
        vec![
            CategoryTotal { category: "Travel".to_string(), total: 30.0 },
            CategoryTotal { category: "Food".to_string(), total: 15.0 },
        ]
    }

    #[test]
    fn test_category_chart_keeps_order() {
        let chart = category_chart(&totals());

        assert_eq!(chart.title, "Expenses by Category");
        assert_eq!(chart.points[0], ("Travel".to_string(), 30.0));
        assert_eq!(chart.points[1], ("Food".to_string(), 15.0));
        assert_eq!(chart.max_value(), 30.0);
    }

    #[test]
    fn test_daily_chart_labels_are_iso_dates() {
        let days = vec![
            (NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 10.0),
            (NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(), 15.0),
        ];

        let chart = daily_chart(&days);
        assert_eq!(chart.title, "Daily Expense Trend");
        assert_eq!(chart.points[0].0, "2024-01-05");
        assert_eq!(chart.points[1].0, "2024-01-20");
    }

    #[test]
    fn test_text_bar_chart_scales_to_max() {
        let mut charts = TextCharts::new(Vec::new());
        charts.bar_chart(&category_chart(&totals())).unwrap();
        let text = String::from_utf8(charts.into_inner()).unwrap();

        assert!(text.contains("=== Expenses by Category ==="));
        assert!(text.contains(&format!("Travel   | {} 30.00", "#".repeat(TEXT_BAR_WIDTH))));
        assert!(text.contains(&format!("Food     | {} 15.00", "#".repeat(TEXT_BAR_WIDTH / 2))));
    }

    #[test]
    fn test_text_line_chart_marks_each_point() {
        let days = vec![
            (NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 10.0),
            (NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(), 0.0),
        ];

        let mut charts = TextCharts::new(Vec::new());
        charts.line_chart(&daily_chart(&days)).unwrap();
        let text = String::from_utf8(charts.into_inner()).unwrap();

        let expected_peak = format!("2024-01-05 |{}o 10.00", " ".repeat(TEXT_BAR_WIDTH - 1));
        assert!(text.contains(&expected_peak));
        assert!(text.contains("2024-01-06 |o 0.00"));
    }
}
