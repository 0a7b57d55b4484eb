// 🖥️ Terminal Charts
// ratatui rendering of the category bar chart and the daily trend line chart

use crate::aggregate::DATE_FORMAT;
use crate::chart::{ChartData, ChartRenderer};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

/// Full-screen charts; each call blocks until a key is pressed
#[derive(Debug, Default)]
pub struct TerminalCharts;

impl TerminalCharts {
    pub fn new() -> Self {
        TerminalCharts
    }

    fn show(&mut self, chart: &ChartData, kind: ChartKind) -> Result<()> {
        debug!(title = %chart.title, points = chart.points.len(), "opening chart");

        // Setup terminal; the guard restores it on every exit path, panics included
        enable_raw_mode()?;
        let _guard = TerminalGuard;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        wait_for_key(&mut terminal, chart, kind)?;
        Ok(())
    }
}

/// Leaves raw mode and the alternate screen when dropped
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Nothing useful to do with a failure while unwinding
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

impl ChartRenderer for TerminalCharts {
    fn bar_chart(&mut self, chart: &ChartData) -> Result<()> {
        self.show(chart, ChartKind::Bar)
    }

    fn line_chart(&mut self, chart: &ChartData) -> Result<()> {
        self.show(chart, ChartKind::Line)
    }
}

fn wait_for_key<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    chart: &ChartData,
    kind: ChartKind,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw_chart_screen(f, chart, kind))?;

        // Resize just loops around and redraws
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

/// Chart plus a one-line hint underneath
pub fn draw_chart_screen(f: &mut Frame, chart: &ChartData, kind: ChartKind) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Chart
            Constraint::Length(1), // Hint
        ])
        .split(f.size());

    match kind {
        ChartKind::Bar => render_bar_chart(f, chunks[0], chart),
        ChartKind::Line => render_line_chart(f, chunks[0], chart),
    }

    let hint = Paragraph::new(Line::from(vec![Span::styled(
        "Press any key to return to the menu",
        Style::default().fg(Color::DarkGray),
    )]))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}

fn chart_block(chart: &ChartData) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", chart.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

/// Height of the tallest bar in ratatui value units
const BAR_SCALE: f64 = 10_000.0;

/// Bar height relative to the largest total, bounded by `BAR_SCALE`
///
/// ratatui multiplies bar values by the chart height, so raw amounts can
/// overflow `u64`. The exact amount is shown as the bar's text instead.
fn to_bar_value(amount: f64, max: f64) -> u64 {
    if amount <= 0.0 || max <= 0.0 {
        0
    } else {
        ((amount / max).min(1.0) * BAR_SCALE).round() as u64
    }
}

fn render_bar_chart(f: &mut Frame, area: Rect, chart: &ChartData) {
    let max = chart.max_value();
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .map(|(label, total)| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value(to_bar_value(*total, max))
                .text_value(format!("{:.2}", total))
                .style(Style::default().fg(Color::LightBlue))
                .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue))
        })
        .collect();

    let count = chart.points.len().max(1) as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / count).saturating_sub(1).clamp(3, 12);

    let bar_chart = BarChart::default()
        .block(chart_block(chart))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(BAR_SCALE as u64)
        .label_style(Style::default().fg(Color::White));

    f.render_widget(bar_chart, area);
}

fn render_line_chart(f: &mut Frame, area: Rect, chart: &ChartData) {
    let x_axis = XAxis::for_chart(chart);
    let points: Vec<(f64, f64)> = x_axis
        .positions
        .iter()
        .zip(chart.points.iter())
        .map(|(x, (_, total))| (*x, *total))
        .collect();

    let min_y = chart.points.iter().map(|(_, v)| *v).fold(0.0, f64::min);
    let max_y = match chart.max_value() {
        m if m > 0.0 => m * 1.1,
        _ => 1.0,
    };

    let datasets = vec![
        Dataset::default()
            .name(chart.y_label.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightBlue))
            .data(&points),
        // Point markers on top of the line
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&points),
    ];

    let max_x = x_axis.max;
    let x_labels: Vec<Span> = x_axis.labels.into_iter().map(Span::raw).collect();
    let y_labels = vec![
        Span::raw(format!("{:.2}", min_y)),
        Span::raw(format!("{:.2}", (min_y + max_y) / 2.0)),
        Span::raw(format!("{:.2}", max_y)),
    ];

    let line_chart = Chart::new(datasets)
        .block(chart_block(chart))
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([min_y, max_y])
                .labels(y_labels),
        );

    f.render_widget(line_chart, area);
}

/// Horizontal placement of line chart points
#[derive(Debug, Clone, PartialEq)]
struct XAxis {
    positions: Vec<f64>,
    max: f64,
    labels: Vec<String>,
}

impl XAxis {
    /// Dated series are spaced by calendar days so gaps stay visible;
    /// anything else is spaced by index.
    fn for_chart(chart: &ChartData) -> Self {
        let dates: Option<Vec<NaiveDate>> = chart
            .points
            .iter()
            .map(|(label, _)| NaiveDate::parse_from_str(label, DATE_FORMAT).ok())
            .collect();

        match dates {
            Some(dates) if !dates.is_empty() => Self::by_day(&dates),
            _ => Self::by_index(chart),
        }
    }

    fn by_day(dates: &[NaiveDate]) -> Self {
        let first = dates[0];
        let positions: Vec<f64> = dates
            .iter()
            .map(|day| (*day - first).num_days() as f64)
            .collect();
        let span = positions.iter().copied().fold(0.0, f64::max);

        // Labels sit at both ends and the middle of the axis
        let middle = first + Duration::days((span / 2.0).round() as i64);
        let last = first + Duration::days(span as i64);
        let mut labels: Vec<String> = [first, middle, last]
            .iter()
            .map(|day| day.format(DATE_FORMAT).to_string())
            .collect();
        labels.dedup();

        XAxis {
            positions,
            max: span.max(1.0),
            labels,
        }
    }

    fn by_index(chart: &ChartData) -> Self {
        let n = chart.points.len();
        let mut picks = vec![0, n / 2, n.saturating_sub(1)];
        picks.dedup();

        XAxis {
            positions: (0..n).map(|i| i as f64).collect(),
            max: (n.saturating_sub(1)).max(1) as f64,
            labels: picks
                .into_iter()
                .filter_map(|i| chart.points.get(i).map(|(label, _)| label.clone()))
                .collect(),
        }
    }
}
